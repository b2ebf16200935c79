//! Command aliases loaded from `aliases.json`.
//!
//! The file maps a canonical command name to its alternate name:
//!
//! ```json
//! { "install": "i", "uninstall": "rm" }
//! ```

use std::collections::HashMap;
use std::path::Path;

use super::{PluginError, PluginResult, ALIASES_FILE};

/// Bidirectional alias lookup for one plugin root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMap {
    forward: HashMap<String, String>,
    inverse: HashMap<String, String>,
}

impl AliasMap {
    /// Build a map from canonical → alternate pairs.
    pub fn new(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let forward: HashMap<String, String> = pairs.into_iter().collect();
        let inverse = forward.iter().map(|(k, v)| (v.clone(), k.clone())).collect();
        Self { forward, inverse }
    }

    /// Load the alias file at `root`. A missing file yields an empty map.
    pub fn load(root: &Path) -> PluginResult<Self> {
        let path = root.join(ALIASES_FILE);
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "No alias file");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let pairs: HashMap<String, String> = serde_json::from_str(&content)
            .map_err(|e| PluginError::InvalidAliases {
                path: path.clone(),
                message: e.to_string(),
            })?;

        tracing::debug!(path = %path.display(), count = pairs.len(), "Loaded aliases");
        Ok(Self::new(pairs))
    }

    /// Alternate name of a canonical command.
    pub fn forward(&self, name: &str) -> Option<&str> {
        self.forward.get(name).map(String::as_str)
    }

    /// Canonical name of an alternate.
    pub fn inverse(&self, name: &str) -> Option<&str> {
        self.inverse.get(name).map(String::as_str)
    }

    /// Rewrite an incoming command to its canonical name.
    pub fn canonical<'a>(&'a self, name: &'a str) -> &'a str {
        self.inverse(name).unwrap_or(name)
    }

    /// `name|alias` when an alias exists, otherwise `name`.
    pub fn annotate(&self, name: &str) -> String {
        match self.forward(name) {
            Some(alias) => format!("{name}|{alias}"),
            None => name.to_string(),
        }
    }

    /// Number of aliases.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Check if there are no aliases.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Iterate canonical → alternate pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.forward.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let aliases = AliasMap::load(temp_dir.path()).unwrap();
        assert!(aliases.is_empty());
        assert_eq!(aliases.forward("install"), None);
    }

    #[test]
    fn test_load_forward_and_inverse() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(ALIASES_FILE), r#"{"b": "bee", "install": "i"}"#)
            .unwrap();

        let aliases = AliasMap::load(temp_dir.path()).unwrap();
        assert_eq!(aliases.len(), 2);
        assert_eq!(aliases.forward("b"), Some("bee"));
        assert_eq!(aliases.inverse("bee"), Some("b"));
        assert_eq!(aliases.inverse("b"), None);
    }

    #[test]
    fn test_canonical_rewrite() {
        let aliases = AliasMap::new([("b".to_string(), "bee".to_string())]);
        assert_eq!(aliases.canonical("bee"), "b");
        assert_eq!(aliases.canonical("b"), "b");
        assert_eq!(aliases.canonical("a"), "a");
    }

    #[test]
    fn test_annotate() {
        let aliases = AliasMap::new([("install".to_string(), "i".to_string())]);
        assert_eq!(aliases.annotate("install"), "install|i");
        assert_eq!(aliases.annotate("remove"), "remove");
    }

    #[test]
    fn test_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(ALIASES_FILE), "[1, 2]").unwrap();

        let result = AliasMap::load(temp_dir.path());
        assert!(matches!(result, Err(PluginError::InvalidAliases { .. })));
    }
}
