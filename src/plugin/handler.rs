//! Command handlers, routers and the per-group command registry.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use super::{ExcludeSet, PluginResult, HELP_EXTENSION, ROUTER_STEM};
use crate::core::{is_script, Executor, Script};

/// Caller-supplied values forwarded to routers and handlers.
pub type Locals = BTreeMap<String, String>;

/// Arguments of a direct handler call.
#[derive(Debug, Clone, Copy)]
pub struct CommandCall<'a> {
    /// Canonical command name.
    pub command: &'a str,
    /// Arguments after the command.
    pub args: &'a [String],
    /// Command consumed by the enclosing default group, if any.
    pub parent: Option<&'a str>,
    /// Caller-supplied context.
    pub locals: &'a Locals,
}

/// Arguments of a router call.
///
/// A router sees the window shifted: the first argument after the command
/// becomes `first`, the command itself is passed as `command`.
#[derive(Debug, Clone, Copy)]
pub struct RouteRequest<'a> {
    /// First argument after the command.
    pub first: Option<&'a str>,
    /// Remaining arguments.
    pub rest: &'a [String],
    /// Command being routed.
    pub command: Option<&'a str>,
    /// Whether the top-level call runs in pass-through mode.
    pub pass_through: bool,
    /// Caller-supplied context.
    pub locals: &'a Locals,
}

/// A command implementation. Returns the process exit code.
pub trait CommandHandler: Send + Sync {
    /// Run the command.
    fn call(&self, call: &CommandCall<'_>) -> anyhow::Result<i32>;
}

/// A router that takes over dispatch for a whole command group.
pub trait Router: Send + Sync {
    /// Route a command.
    fn route(&self, request: &RouteRequest<'_>) -> anyhow::Result<i32>;
}

/// Adapts a closure into a [`CommandHandler`].
pub struct FnHandler<F>(F);

/// Wrap a closure as a command handler.
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(&CommandCall<'_>) -> anyhow::Result<i32> + Send + Sync,
{
    FnHandler(f)
}

impl<F> CommandHandler for FnHandler<F>
where
    F: Fn(&CommandCall<'_>) -> anyhow::Result<i32> + Send + Sync,
{
    fn call(&self, call: &CommandCall<'_>) -> anyhow::Result<i32> {
        (self.0)(call)
    }
}

/// Adapts a closure into a [`Router`].
pub struct FnRouter<F>(F);

/// Wrap a closure as a router.
pub fn router_fn<F>(f: F) -> FnRouter<F>
where
    F: Fn(&RouteRequest<'_>) -> anyhow::Result<i32> + Send + Sync,
{
    FnRouter(f)
}

impl<F> Router for FnRouter<F>
where
    F: Fn(&RouteRequest<'_>) -> anyhow::Result<i32> + Send + Sync,
{
    fn route(&self, request: &RouteRequest<'_>) -> anyhow::Result<i32> {
        (self.0)(request)
    }
}

/// Runs a command script from the commands directory.
#[derive(Debug, Clone)]
pub struct ScriptHandler {
    path: PathBuf,
}

impl ScriptHandler {
    /// Create a handler for the script at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Script location.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CommandHandler for ScriptHandler {
    fn call(&self, call: &CommandCall<'_>) -> anyhow::Result<i32> {
        let mut script = Script::new(&self.path)
            .args(call.args.iter().cloned())
            .env("CMDNEST_COMMAND", call.command);
        if let Some(parent) = call.parent {
            script = script.env("CMDNEST_PARENT", parent);
        }
        script = with_locals(script, call.locals);

        Ok(Executor::new().execute(&script)?.code())
    }
}

/// Runs a `_router` script.
#[derive(Debug, Clone)]
pub struct ScriptRouter {
    path: PathBuf,
}

impl ScriptRouter {
    /// Create a router for the script at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Find a router script in `dir`.
    pub fn find(dir: &Path) -> Option<Self> {
        let entries = std::fs::read_dir(dir).ok()?;
        let mut candidates: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .filter(|p| p.file_stem().is_some_and(|s| s == ROUTER_STEM))
            .filter(|p| p.extension().is_none_or(|ext| ext != HELP_EXTENSION))
            .collect();
        candidates.sort();
        candidates.into_iter().next().map(Self::new)
    }

    /// Script location.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Router for ScriptRouter {
    fn route(&self, request: &RouteRequest<'_>) -> anyhow::Result<i32> {
        let mut script = Script::new(&self.path)
            .args(request.first.map(str::to_string))
            .args(request.rest.iter().cloned())
            .env("CMDNEST_PASS_THROUGH", request.pass_through.to_string());
        if let Some(command) = request.command {
            script = script.env("CMDNEST_COMMAND", command);
        }
        script = with_locals(script, request.locals);

        Ok(Executor::new().execute(&script)?.code())
    }
}

fn with_locals(mut script: Script, locals: &Locals) -> Script {
    for (key, value) in locals {
        let key = key.to_ascii_uppercase().replace(|c: char| !c.is_ascii_alphanumeric(), "_");
        script = script.env(format!("CMDNEST_LOCAL_{key}"), value);
    }
    script
}

/// Handlers of one command group, keyed by command name.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("CommandRegistry").field("commands", &names).finish()
    }
}

impl CommandRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, replacing any previous one with the same name.
    pub fn register(&mut self, name: impl Into<String>, handler: impl CommandHandler + 'static) {
        self.register_arc(name, Arc::new(handler));
    }

    /// Register a shared handler.
    pub fn register_arc(&mut self, name: impl Into<String>, handler: Arc<dyn CommandHandler>) {
        let name = name.into();
        tracing::trace!(command = %name, "Registered handler");
        self.handlers.insert(name, handler);
    }

    /// Register a script handler for every command script in `commands_dir`.
    ///
    /// Explicitly registered handlers win over scripts of the same name.
    /// Returns the number of scripts registered.
    pub fn scan_scripts(
        &mut self,
        commands_dir: &Path,
        exclude: &ExcludeSet,
    ) -> PluginResult<usize> {
        if !commands_dir.is_dir() {
            return Ok(0);
        }

        let mut count = 0;
        for entry in WalkDir::new(commands_dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::from)?;
            let path = entry.path();

            if !entry.file_type().is_file() || !is_command_file(path) {
                continue;
            }
            if exclude.is_excluded(path) {
                tracing::debug!(path = %path.display(), "Command file excluded");
                continue;
            }

            let Some(name) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            if self.handlers.contains_key(&name) {
                continue;
            }

            self.register(name, ScriptHandler::new(path));
            count += 1;
        }

        tracing::debug!(dir = %commands_dir.display(), count, "Scanned command scripts");
        Ok(count)
    }

    /// Get a handler by command name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn CommandHandler>> {
        self.handlers.get(name)
    }

    /// Check whether a command has a handler.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Get total number of handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// A command file is a visible, non-markdown file; scripts without a known
/// extension must be executable on their own.
fn is_command_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with('.') || name.starts_with(ROUTER_STEM) {
        return false;
    }
    if path.extension().is_some_and(|ext| ext == HELP_EXTENSION) {
        return false;
    }
    is_script(path) || path.extension().is_none()
}
