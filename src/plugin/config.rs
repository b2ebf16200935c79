//! Plugin configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{PluginError, PluginIdentity, RouterPolicy, TriggerSpec, DEFAULT_COMMANDS_PATH};

/// Immutable configuration of one plugin instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginConfig {
    /// Installed name or direct root path.
    pub identity: PluginIdentity,

    /// Commands directory, relative to the plugin root.
    pub commands_path: PathBuf,

    /// Alternate trigger names. When set, the plugin activates on its own
    /// name or any of these, and `trigger` is ignored.
    pub aliases: Option<Vec<String>>,

    /// Explicit activation pattern.
    pub trigger: Option<TriggerSpec>,

    /// Value tested against the trigger (defaults to the first CLI argument).
    pub trigger_value: Option<String>,

    /// Report unresolved commands as not handled instead of showing help.
    pub pass_through: bool,

    /// Extra exclusion globs for command files and help documents.
    pub ignore: Vec<String>,

    /// Router vs. direct handler precedence.
    pub router_policy: RouterPolicy,

    /// Directories searched when the plugin is configured by name.
    pub search_dirs: Vec<PathBuf>,
}

impl PluginConfig {
    /// Configuration for an installed plugin.
    pub fn by_name(name: impl Into<String>) -> Self {
        Self::new(PluginIdentity::ByName(name.into()))
    }

    /// Configuration for a plugin at an explicit root.
    pub fn by_path(path: impl Into<PathBuf>) -> Self {
        Self::new(PluginIdentity::ByPath(path.into()))
    }

    fn new(identity: PluginIdentity) -> Self {
        Self {
            identity,
            commands_path: PathBuf::from(DEFAULT_COMMANDS_PATH),
            aliases: None,
            trigger: None,
            trigger_value: None,
            pass_through: false,
            ignore: Vec::new(),
            router_policy: RouterPolicy::default(),
            search_dirs: Vec::new(),
        }
    }

    /// Set the commands directory.
    #[must_use]
    pub fn commands_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.commands_path = path.into();
        self
    }

    /// Activate on the plugin name or any of these aliases.
    #[must_use]
    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = Some(aliases.into_iter().map(Into::into).collect());
        self
    }

    /// Set an explicit trigger.
    #[must_use]
    pub fn trigger(mut self, trigger: TriggerSpec) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Set the value tested against the trigger.
    #[must_use]
    pub fn trigger_value(mut self, value: impl Into<String>) -> Self {
        self.trigger_value = Some(value.into());
        self
    }

    /// Enable or disable pass-through mode.
    #[must_use]
    pub fn pass_through(mut self, pass_through: bool) -> Self {
        self.pass_through = pass_through;
        self
    }

    /// Add exclusion globs.
    #[must_use]
    pub fn ignore<I, S>(mut self, globs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(globs.into_iter().map(Into::into));
        self
    }

    /// Set router precedence.
    #[must_use]
    pub fn router_policy(mut self, policy: RouterPolicy) -> Self {
        self.router_policy = policy;
        self
    }

    /// Set the directories searched for named plugins.
    #[must_use]
    pub fn search_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.search_dirs = dirs;
        self
    }

    /// Drop any activation gating.
    #[must_use]
    pub fn without_trigger(mut self) -> Self {
        self.aliases = None;
        self.trigger = None;
        self
    }

    /// Check whether any activation gating is configured.
    pub fn has_trigger(&self) -> bool {
        self.aliases.is_some() || self.trigger.is_some()
    }
}

/// A plugin as written in the configuration file.
///
/// ```toml
/// [[plugins]]
/// name = "deploy"
/// aliases = ["d"]
/// through = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginEntry {
    /// Installed plugin name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Plugin root directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Commands directory relative to the root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commands_path: Option<PathBuf>,

    /// Alternate trigger names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<String>>,

    /// Explicit trigger
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<TriggerSpec>,

    /// Pass-through mode
    pub through: bool,

    /// Extra exclusion globs
    pub ignore: Vec<String>,

    /// Router precedence
    pub router_policy: RouterPolicy,
}

impl TryFrom<PluginEntry> for PluginConfig {
    type Error = PluginError;

    fn try_from(entry: PluginEntry) -> Result<Self, Self::Error> {
        let mut config = match (entry.name, entry.path) {
            (Some(name), None) => Self::by_name(name),
            (None, Some(path)) => Self::by_path(path),
            (Some(name), Some(path)) => {
                return Err(PluginError::Config(format!(
                    "Please use only one of the properties: name or path (name: {name}, path: {})",
                    path.display()
                )));
            }
            (None, None) => {
                return Err(PluginError::Config(
                    "'name' or 'path' is required for a plugin".to_string(),
                ));
            }
        };

        if let Some(commands_path) = entry.commands_path {
            config = config.commands_path(commands_path);
        }
        config.aliases = entry.aliases;
        config.trigger = entry.trigger;
        config.pass_through = entry.through;
        config.ignore = entry.ignore;
        config.router_policy = entry.router_policy;

        Ok(config)
    }
}
