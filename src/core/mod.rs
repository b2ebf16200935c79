//! Core functionality for cmdnest.
//!
//! This module contains application configuration and script execution.

mod config;
mod executor;

pub use config::{AppConfig, GeneralConfig, LOCAL_CONFIG_FILE};
pub use executor::{
    interpreter_for, is_script, ExecutionResult, Executor, Script, SCRIPT_EXTENSIONS,
};
