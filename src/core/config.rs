//! Configuration management for cmdnest.
//!
//! Handles loading configuration from TOML files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::plugin::{PluginConfig, PluginEntry, PluginResult};

/// Local configuration file name.
pub const LOCAL_CONFIG_FILE: &str = ".cmdnest.toml";

/// Application configuration.
///
/// ```toml
/// [general]
/// color = true
/// plugin_dirs = ["~/work/plugins"]
///
/// [[plugins]]
/// path = "tools/deploy"
/// aliases = ["d"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General settings
    pub general: GeneralConfig,

    /// Configured plugin chain, probed in order
    pub plugins: Vec<PluginEntry>,
}

/// General application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Whether to style terminal output
    pub color: bool,

    /// Extra directories searched for named plugins, before the defaults
    pub plugin_dirs: Vec<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { color: true, plugin_dirs: Vec::new() }
    }
}

impl AppConfig {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.cmdnest.toml` in current directory
    /// 2. `~/.config/cmdnest/config.toml`
    /// 3. Falls back to defaults
    pub fn load() -> anyhow::Result<Self> {
        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(config_dir) = Self::config_dir() {
            let global_config = config_dir.join("config.toml");
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), plugins = config.plugins.len(), "Loaded config");
        Ok(config)
    }

    /// Plugin configurations of the configured chain, in order.
    ///
    /// Named plugins search `plugin_dirs` before the default directories.
    pub fn plugin_configs(&self) -> PluginResult<Vec<PluginConfig>> {
        let search_dirs = crate::plugin::default_search_dirs(&self.general.plugin_dirs);
        self.plugins
            .iter()
            .cloned()
            .map(|entry| {
                PluginConfig::try_from(entry).map(|config| config.search_dirs(search_dirs.clone()))
            })
            .collect()
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(crate::APP_NAME))
    }

    /// Get the data directory path (installed plugins live here).
    pub fn data_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join(crate::APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::{PluginError, PluginIdentity};
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.general.color);
        assert!(config.general.plugin_dirs.is_empty());
        assert!(config.plugins.is_empty());
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            color = false
            plugin_dirs = ["/opt/plugins"]

            [[plugins]]
            name = "deploy"
            aliases = ["d"]

            [[plugins]]
            path = "tools/files"
            commands_path = "commands"
            through = true
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert!(!config.general.color);
        assert_eq!(config.plugins.len(), 2);

        let plugins = config.plugin_configs().unwrap();
        assert_eq!(plugins[0].identity, PluginIdentity::ByName("deploy".to_string()));
        assert_eq!(plugins[0].search_dirs[0], PathBuf::from("/opt/plugins"));
        assert_eq!(plugins[1].commands_path, PathBuf::from("commands"));
        assert!(plugins[1].pass_through);
    }

    #[test]
    fn test_invalid_plugin_entry() {
        let config: AppConfig = toml::from_str(
            r#"
            [[plugins]]
            name = "deploy"
            path = "tools/deploy"
        "#,
        )
        .unwrap();

        assert!(matches!(config.plugin_configs(), Err(PluginError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[general]\ncolor = false\n").unwrap();

        let config = AppConfig::load_from_file(&path).unwrap();
        assert!(!config.general.color);
    }

    #[test]
    fn test_load_from_broken_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[general\n").unwrap();

        assert!(AppConfig::load_from_file(&path).is_err());
    }
}
