//! # cmdnest
//!
//! Nested command plugins for your terminal.
//!
//! A plugin is a directory of command scripts with markdown help documents.
//! cmdnest activates the plugin whose trigger matches the invocation and
//! dispatches the command through aliases, routers, direct handlers and
//! nested `default` command groups.
//!
//! ## Quick Start
//!
//! ```bash
//! # Install
//! cargo install cmdnest
//!
//! # List every plugin's commands
//! cmdnest
//!
//! # Run a plugin command
//! cmdnest deploy install --force
//! ```
//!
//! ## Library use
//!
//! ```no_run
//! use cmdnest::output::ConsolePrinter;
//! use cmdnest::plugin::{handler_fn, DispatchContext, PluginConfig, PluginInstance};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut printer = ConsolePrinter::stdout(true);
//! let mut ctx = DispatchContext::new(&mut printer);
//!
//! let mut plugin = PluginInstance::new(PluginConfig::by_path("tools/deploy"))?;
//! plugin.start(&mut ctx)?;
//! if let Some(commands) = plugin.commands_mut() {
//!     commands.register("ping", handler_fn(|_| Ok(0)));
//! }
//!
//! let outcome = plugin.run_command(Some("ping"), &[], &mut ctx)?;
//! std::process::exit(outcome.exit_code().unwrap_or(0));
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::map_unwrap_or)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::use_self)]

pub mod core;
pub mod output;
pub mod plugin;

// Re-export commonly used types
pub use core::AppConfig;
pub use plugin::{
    Dispatch, DispatchContext, PluginConfig, PluginError, PluginInstance, PluginResult,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "cmdnest";
