use crate::error::LoadError;
use crate::kind::{Field, SyntaxKind};
use crate::parser::Parser;
use std::fmt;
use std::sync::{Arc, Mutex};

const SUPPORTED_OS: &[&str] = &["linux", "macos", "windows"];
const SUPPORTED_ARCH: &[&str] = &["x86_64", "aarch64"];

/// Operating system and CPU architecture a grammar build is keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlatformId {
    pub os: String,
    pub arch: String,
}

impl PlatformId {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    pub fn current() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    pub fn is_supported(&self) -> bool {
        SUPPORTED_OS.contains(&self.os.as_str()) && SUPPORTED_ARCH.contains(&self.arch.as_str())
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

#[derive(Debug)]
struct LanguageInner {
    platform: PlatformId,
}

/// Handle to the loaded XTC grammar. Cloning shares the same grammar.
#[derive(Debug, Clone)]
pub struct Language {
    inner: Arc<LanguageInner>,
}

static LOADED: Mutex<Option<Language>> = Mutex::new(None);

/// The process-wide grammar, loaded and self-tested on first use.
pub fn language() -> Result<Language, LoadError> {
    let mut slot = LOADED.lock().map_err(|_| LoadError::Poisoned)?;
    if let Some(language) = slot.as_ref() {
        return Ok(language.clone());
    }
    let language = Language::load(PlatformId::current())?;
    tracing::info!(
        "Loaded XTC grammar v{} for {}",
        Language::VERSION,
        language.platform()
    );
    *slot = Some(language.clone());
    Ok(language)
}

impl Language {
    pub const NAME: &'static str = "xtc";
    pub const VERSION: u32 = 1;

    /// Resolves the grammar for `platform` and runs the startup self-test.
    pub fn load(platform: PlatformId) -> Result<Language, LoadError> {
        if !platform.is_supported() {
            return Err(LoadError::UnsupportedPlatform(platform.to_string()));
        }
        let language = Language {
            inner: Arc::new(LanguageInner { platform }),
        };
        language.self_test()?;
        Ok(language)
    }

    pub fn platform(&self) -> &PlatformId {
        &self.inner.platform
    }

    /// Parses a known-good snippet and checks the shape of the result.
    pub fn self_test(&self) -> Result<(), LoadError> {
        let tree = Parser::new(self).parse("module selftest {}");
        let root = tree.root_node();
        if root.kind() != "source_file" {
            return Err(LoadError::SelfTest(format!("root is '{}'", root.kind())));
        }
        if tree.has_errors() {
            return Err(LoadError::SelfTest(root.to_sexp()));
        }
        let named_module = root
            .named_child(0)
            .filter(|n| n.kind() == "module_declaration")
            .and_then(|n| n.child_by_field_name("name"))
            .is_some_and(|n| n.text() == "selftest");
        let shape = root.to_sexp();
        tree.release();
        if named_module {
            Ok(())
        } else {
            Err(LoadError::SelfTest(shape))
        }
    }

    pub fn node_kind_count(&self) -> usize {
        SyntaxKind::ALL.len()
    }

    pub fn node_kind_for_id(&self, id: u16) -> Option<&'static str> {
        SyntaxKind::from_id(id).map(SyntaxKind::name)
    }

    pub fn node_kind_is_named(&self, id: u16) -> bool {
        SyntaxKind::from_id(id).is_some_and(SyntaxKind::is_named)
    }

    pub fn id_for_node_kind(&self, name: &str, named: bool) -> Option<u16> {
        SyntaxKind::ALL
            .iter()
            .find(|k| k.is_named() == named && k.name() == name)
            .map(|k| k.id())
    }

    pub fn field_count(&self) -> usize {
        Field::ALL.len()
    }

    pub fn field_id_for_name(&self, name: &str) -> Option<u8> {
        Field::from_name(name).map(|f| f as u8)
    }

    pub fn field_name_for_id(&self, id: u8) -> Option<&'static str> {
        Field::ALL.get(id as usize).map(|f| f.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_loads_once_and_is_shared() {
        let first = language().unwrap();
        let second = language().unwrap();
        assert!(Arc::ptr_eq(&first.inner, &second.inner));
    }

    #[test]
    fn test_unsupported_platform_fails() {
        let err = Language::load(PlatformId::new("plan9", "mips")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedPlatform(ref p) if p == "plan9-mips"));
    }

    #[test]
    fn test_kind_lookup() {
        let language = language().unwrap();
        let id = language.id_for_node_kind("class_declaration", true).unwrap();
        assert_eq!(language.node_kind_for_id(id), Some("class_declaration"));
        assert!(language.node_kind_is_named(id));
        assert!(language.id_for_node_kind("class", false).is_some());
        assert!(language.id_for_node_kind("class", true).is_none());
        let field = language.field_id_for_name("name").unwrap();
        assert_eq!(language.field_name_for_id(field), Some("name"));
    }
}
