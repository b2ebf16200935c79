//! Core plugin types and filesystem conventions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default location of the commands directory, relative to the plugin root.
pub const DEFAULT_COMMANDS_PATH: &str = "src/cli/commands";

/// Commands directory of a nested default group, relative to the group root.
pub const NESTED_COMMANDS_PATH: &str = "commands";

/// Name of the nested default command group directory.
pub const DEFAULT_GROUP_DIR: &str = "default";

/// File stem of a router script (in the parent of the commands directory).
pub const ROUTER_STEM: &str = "_router";

/// Alias file name at a plugin root.
pub const ALIASES_FILE: &str = "aliases.json";

/// Package descriptor file name at a plugin root.
pub const MANIFEST_FILE: &str = "plugin.toml";

/// Extension of help documents.
pub const HELP_EXTENSION: &str = "md";

/// Built-in exclusion for test-only command files.
pub const DEFAULT_IGNORE: &str = "*.cmdnest-test.*";

/// Placeholder kept in otherwise empty command directories.
pub const PLACEHOLDER_COMMAND: &str = ".gitkeep";

/// Command name that explicitly requests help.
pub const HELP_COMMAND: &str = "help";

/// How a plugin is located: by installed name or by an explicit root path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginIdentity {
    /// Installed plugin name, resolved against the plugin search directories.
    ByName(String),
    /// Direct filesystem root.
    ByPath(PathBuf),
}

impl PluginIdentity {
    /// The configured name, if the plugin was declared by name.
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            Self::ByName(name) => Some(name),
            Self::ByPath(_) => None,
        }
    }

    /// Short name used for triggers and help labels.
    ///
    /// Scoped names (`@scope/tool`) keep their last segment; paths keep
    /// their final component.
    pub fn short_name(&self) -> String {
        match self {
            Self::ByName(name) => name.rsplit('/').next().unwrap_or(name).to_string(),
            Self::ByPath(path) => path_short_name(path),
        }
    }
}

fn path_short_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

/// One line of a help listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpEntry {
    /// Plugin and command display names, e.g. `demo install|i`.
    pub label: String,
    /// One-line description taken from the help document.
    pub description: String,
}

impl HelpEntry {
    /// Create a new help entry.
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self { label: label.into(), description: description.into() }
    }
}

/// Which of router and direct handler wins when both exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouterPolicy {
    /// A router intercepts every command of its group.
    #[default]
    RouterFirst,
    /// Direct handlers run before the router is consulted.
    HandlerFirst,
}
