//! Plugin engine for nested CLI command groups.
//!
//! A plugin is a directory tree of command scripts and markdown help
//! documents. An instance activates when its trigger matches the invocation,
//! then resolves each command through aliases, an optional router, direct
//! handlers and an optional nested `default` group.
//!
//! # Layout
//!
//! ```text
//! deploy/
//! ├── plugin.toml          # optional package descriptor
//! ├── aliases.json         # optional {"install": "i"}
//! └── src/cli/
//!     ├── _router.sh       # optional router for the root group
//!     └── commands/
//!         ├── install.sh
//!         ├── install.md   # help document
//!         └── default/     # nested default group
//!             └── commands/
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [[plugins]]
//! name = "deploy"
//! aliases = ["d"]
//! through = true
//! ```

mod alias;
mod config;
mod context;
mod delegate;
mod error;
mod exclude;
mod handler;
pub mod help;
mod instance;
mod locator;
mod manifest;
mod node;
pub mod resolve;
mod trigger;
mod types;

pub use alias::AliasMap;
pub use config::{PluginConfig, PluginEntry};
pub use context::{ArgCursor, Dispatch, DispatchContext, HelpReason, HELP_HINT};
pub use delegate::delegate;
pub use error::{PluginError, PluginResult};
pub use exclude::ExcludeSet;
pub use handler::{
    handler_fn, router_fn, CommandCall, CommandHandler, CommandRegistry, FnHandler, FnRouter,
    Locals, RouteRequest, Router, ScriptHandler, ScriptRouter,
};
pub use instance::{InstanceState, PluginInstance};
pub use locator::{locate, Resolution};
pub use manifest::{PluginManifest, PluginMetadata};
pub use node::CommandNode;
pub use resolve::{default_search_dirs, plugin_path};
pub use trigger::{evaluate, Trigger, TriggerSpec};
pub use types::{
    HelpEntry, PluginIdentity, RouterPolicy, ALIASES_FILE, DEFAULT_COMMANDS_PATH,
    DEFAULT_GROUP_DIR, DEFAULT_IGNORE, HELP_COMMAND, HELP_EXTENSION, MANIFEST_FILE,
    NESTED_COMMANDS_PATH, PLACEHOLDER_COMMAND, ROUTER_STEM,
};
