use super::position::{Location, Range};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Module,
    Package,
    Class,
    Interface,
    Mixin,
    Service,
    Const,
    Enum,
    Method,
    Constructor,
    Property,
    Parameter,
    TypeParameter,
}

impl SymbolKind {
    /// Lower-case keyword-style name used in hover text and signatures.
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Module => "module",
            SymbolKind::Package => "package",
            SymbolKind::Class => "class",
            SymbolKind::Interface => "interface",
            SymbolKind::Mixin => "mixin",
            SymbolKind::Service => "service",
            SymbolKind::Const => "const",
            SymbolKind::Enum => "enum",
            SymbolKind::Method => "method",
            SymbolKind::Constructor => "constructor",
            SymbolKind::Property => "property",
            SymbolKind::Parameter => "parameter",
            SymbolKind::TypeParameter => "type parameter",
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(
            self,
            SymbolKind::Class
                | SymbolKind::Interface
                | SymbolKind::Mixin
                | SymbolKind::Service
                | SymbolKind::Const
                | SymbolKind::Enum
        )
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declaration extracted from a document.
///
/// `location.range` spans the whole declaration; `selection_range` spans only its name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SymbolInfo {
    pub name: String,
    pub qualified_name: String,
    pub kind: SymbolKind,
    pub location: Location,
    pub selection_range: Range,
    pub type_signature: Option<String>,
    pub documentation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SymbolInfo>,
}

impl SymbolInfo {
    pub fn new(name: impl Into<String>, kind: SymbolKind, location: Location) -> Self {
        let name = name.into();
        let selection_range = location.range;
        Self {
            qualified_name: name.clone(),
            name,
            kind,
            location,
            selection_range,
            type_signature: None,
            documentation: None,
            children: Vec::new(),
        }
    }

    /// Depth-first iterator over this symbol and all of its nested children.
    pub fn walk(&self) -> impl Iterator<Item = &SymbolInfo> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.children.iter().rev());
            Some(next)
        })
    }

    /// Markdown block shown on hover: the signature (or kind and name) in a
    /// code fence, followed by documentation when present.
    pub fn to_hover_markdown(&self) -> String {
        let header = match &self.type_signature {
            Some(sig) => sig.clone(),
            None => format!("{} {}", self.kind.as_str(), self.name),
        };
        let mut text = format!("```xtc\n{}\n```", header);
        if let Some(doc) = &self.documentation {
            text.push_str("\n\n");
            text.push_str(doc);
        }
        text
    }
}
