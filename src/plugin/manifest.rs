//! Plugin package descriptor.
//!
//! A plugin root may carry a `plugin.toml` describing the package:
//!
//! ```toml
//! [plugin]
//! name = "deploy"
//! version = "1.2.0"
//! description = "Deployment commands"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{PluginError, PluginResult, MANIFEST_FILE};

/// Package descriptor of a plugin root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Package metadata.
    pub plugin: PluginMetadata,
}

/// The `[plugin]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginMetadata {
    /// Package name.
    pub name: String,
    /// Package version, shown in the start banner.
    #[serde(default)]
    pub version: Option<String>,
    /// Short description.
    #[serde(default)]
    pub description: Option<String>,
}

impl PluginManifest {
    /// Parse a manifest from TOML string.
    pub fn from_toml(content: &str, path: &Path) -> PluginResult<Self> {
        let manifest: Self = toml::from_str(content).map_err(|e| PluginError::InvalidManifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        manifest.validate(path)?;
        Ok(manifest)
    }

    /// Parse a manifest from a file.
    pub fn from_file(path: &Path) -> PluginResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content, path)
    }

    /// Load the descriptor of a plugin root, if it has one.
    pub fn load(root: &Path) -> PluginResult<Option<Self>> {
        let path = Self::path_in(root);
        if !path.is_file() {
            tracing::debug!(root = %root.display(), "No plugin manifest");
            return Ok(None);
        }
        Self::from_file(&path).map(Some)
    }

    /// Location of the descriptor inside `root`.
    pub fn path_in(root: &Path) -> PathBuf {
        root.join(MANIFEST_FILE)
    }

    /// Package version, if declared.
    pub fn version(&self) -> Option<&str> {
        self.plugin.version.as_deref()
    }

    fn validate(&self, path: &Path) -> PluginResult<()> {
        if self.plugin.name.trim().is_empty() {
            return Err(PluginError::InvalidManifest {
                path: path.to_path_buf(),
                message: "Plugin name is required".to_string(),
            });
        }

        if self.plugin.version.as_deref().is_some_and(|v| v.split('.').count() < 2) {
            return Err(PluginError::InvalidManifest {
                path: path.to_path_buf(),
                message: "Version must be in semver format (e.g., 1.0.0)".to_string(),
            });
        }

        Ok(())
    }
}
