use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which backend answers editor requests.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum AdapterKind {
    #[default]
    Tree,
    Mock,
    Compiler,
}

impl AdapterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdapterKind::Tree => "tree",
            AdapterKind::Mock => "mock",
            AdapterKind::Compiler => "compiler",
        }
    }

    /// The next simpler backend to try when this one cannot start.
    pub fn fallback(&self) -> Option<AdapterKind> {
        match self {
            AdapterKind::Compiler => Some(AdapterKind::Tree),
            AdapterKind::Tree => Some(AdapterKind::Mock),
            AdapterKind::Mock => None,
        }
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdapterKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tree" | "tree-sitter" | "treesitter" => Ok(AdapterKind::Tree),
            "mock" => Ok(AdapterKind::Mock),
            "compiler" => Ok(AdapterKind::Compiler),
            other => Err(CoreError::Config(format!(
                "unknown adapter '{}', expected one of: tree, mock, compiler",
                other
            ))),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerConfig {
    pub adapter: AdapterKind,
    pub log_to_stderr: bool,
    pub semantic_tokens: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            adapter: AdapterKind::default(),
            log_to_stderr: false,
            semantic_tokens: true,
        }
    }
}

impl ServerConfig {
    /// Applies the fields present in a JSON object (e.g. editor initialization
    /// options) on top of this config. Unknown keys are ignored.
    pub fn merge_json(&self, value: &serde_json::Value) -> Result<ServerConfig> {
        let mut merged = serde_json::to_value(self)?;
        if let (Some(target), Some(source)) = (merged.as_object_mut(), value.as_object()) {
            for (key, v) in source {
                if target.contains_key(key) {
                    target.insert(key.clone(), v.clone());
                }
            }
        }
        Ok(serde_json::from_value(merged)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_adapter_kind_from_str() {
        assert_eq!("tree".parse::<AdapterKind>().unwrap(), AdapterKind::Tree);
        assert_eq!(" Mock ".parse::<AdapterKind>().unwrap(), AdapterKind::Mock);
        assert_eq!("tree-sitter".parse::<AdapterKind>().unwrap(), AdapterKind::Tree);
        assert_eq!("compiler".parse::<AdapterKind>().unwrap(), AdapterKind::Compiler);
        let err = "javac".parse::<AdapterKind>().unwrap_err();
        assert!(err.to_string().contains("unknown adapter 'javac'"));
    }

    #[test]
    fn test_fallback_chain_ends_at_mock() {
        let chain: Vec<_> = std::iter::successors(Some(AdapterKind::Compiler), |k| k.fallback()).collect();
        assert_eq!(chain, vec![AdapterKind::Compiler, AdapterKind::Tree, AdapterKind::Mock]);
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.adapter, AdapterKind::Tree);
        assert!(config.semantic_tokens);
        assert!(!config.log_to_stderr);
    }

    #[test]
    fn test_merge_initialization_options() {
        let config = ServerConfig::default()
            .merge_json(&json!({ "adapter": "mock", "semanticTokens": false, "other": 1 }))
            .unwrap();
        assert_eq!(config.adapter, AdapterKind::Mock);
        assert!(!config.semantic_tokens);
        assert!(!config.log_to_stderr);
    }

    #[test]
    fn test_merge_rejects_bad_values() {
        let result = ServerConfig::default().merge_json(&json!({ "adapter": "javac" }));
        assert!(matches!(result, Err(CoreError::Json(_))));
    }

    #[test]
    fn test_merge_ignores_non_objects() {
        let config = ServerConfig::default().merge_json(&serde_json::Value::Null).unwrap();
        assert_eq!(config, ServerConfig::default());
    }
}
