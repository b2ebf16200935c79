//! Plugin engine error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;

/// Errors that can occur while building or dispatching a plugin.
///
/// Trigger mismatches and unresolved commands are not errors; they surface as
/// inert instances and help outcomes respectively.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Invalid plugin configuration (identity, trigger pattern, globs).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The declared plugin name disagrees with the package descriptor.
    #[error(
        "Name of the plugin specified '{declared}' has not been matched with '{found}' in {}",
        .manifest.display()
    )]
    NameMismatch { declared: String, found: String, manifest: PathBuf },

    /// A plugin name could not be mapped to an installed plugin root.
    #[error(
        "Plugin '{name}' has not been found. Searched: {}. Install it into one of these \
         directories or configure it by `path` instead of `name`.",
        format_searched(.searched)
    )]
    NotInstalled { name: String, searched: Vec<PathBuf> },

    /// Invalid package descriptor.
    #[error("Invalid plugin manifest {}: {message}", .path.display())]
    InvalidManifest { path: PathBuf, message: String },

    /// Invalid alias file.
    #[error("Invalid alias file {}: {message}", .path.display())]
    InvalidAliases { path: PathBuf, message: String },

    /// A handler or router failed.
    #[error("Command '{command}' failed: {source}")]
    Execution {
        command: String,
        #[source]
        source: anyhow::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_searched(searched: &[PathBuf]) -> String {
    if searched.is_empty() {
        return "(no plugin directories)".to_string();
    }
    searched.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_installed_lists_search_dirs() {
        let err = PluginError::NotInstalled {
            name: "demo".to_string(),
            searched: vec![PathBuf::from("/a/plugins"), PathBuf::from("/b/plugins")],
        };
        let message = err.to_string();
        assert!(message.contains("'demo'"));
        assert!(message.contains("/a/plugins, /b/plugins"));
        assert!(message.contains("by `path`"));
    }

    #[test]
    fn test_not_installed_without_dirs() {
        let err = PluginError::NotInstalled { name: "demo".to_string(), searched: Vec::new() };
        assert!(err.to_string().contains("(no plugin directories)"));
    }

    #[test]
    fn test_name_mismatch_message() {
        let err = PluginError::NameMismatch {
            declared: "demo".to_string(),
            found: "other".to_string(),
            manifest: PathBuf::from("/p/plugin.toml"),
        };
        assert!(err.to_string().contains("'demo'"));
        assert!(err.to_string().contains("'other'"));
    }
}
