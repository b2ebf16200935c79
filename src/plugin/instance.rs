//! Plugin instances: activation, start-up and command dispatch.

use std::path::{Path, PathBuf};

use super::delegate::delegate;
use super::locator::{locate, Resolution};
use super::resolve::{absolute, default_search_dirs, plugin_path};
use super::trigger::{evaluate, Trigger};
use super::{
    help, AliasMap, ArgCursor, CommandCall, CommandNode, Dispatch, DispatchContext, HelpEntry,
    HelpReason, PluginConfig, PluginError, PluginIdentity, PluginManifest, PluginResult,
    RouteRequest, RouterPolicy, HELP_COMMAND,
};

/// Lifecycle of a plugin instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceState {
    /// The trigger did not match; every operation is a no-op.
    Inert,
    /// The trigger matched (or there is none); not started yet.
    Activated,
    /// Root resolved and command tree built.
    Started,
}

/// One configured plugin.
#[derive(Debug)]
pub struct PluginInstance {
    config: PluginConfig,
    name: String,
    state: InstanceState,
    root: Option<PathBuf>,
    manifest: Option<PluginManifest>,
    tree: Option<CommandNode>,
}

impl PluginInstance {
    /// Create an instance, evaluating its trigger.
    ///
    /// The trigger value defaults to the first positional command line
    /// argument; leading flags are skipped, so binaries with flags that take
    /// values should set [`PluginConfig::trigger_value`] explicitly. A
    /// trigger that does not match yields an inert instance.
    pub fn new(config: PluginConfig) -> PluginResult<Self> {
        let name = config.identity.short_name();
        let trigger = build_trigger(&config, &name)?;

        let active = match &trigger {
            Some(trigger) => {
                let value = config
                    .trigger_value
                    .clone()
                    .or_else(|| first_positional(std::env::args().skip(1)));
                evaluate(Some(trigger), value.as_deref())
            }
            None => true,
        };

        let state = if active { InstanceState::Activated } else { InstanceState::Inert };
        tracing::debug!(plugin = %name, ?state, "Created plugin instance");

        Ok(Self { config, name, state, root: None, manifest: None, tree: None })
    }

    /// Short plugin name used in labels.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configuration of this instance.
    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> InstanceState {
        self.state
    }

    /// Check whether the trigger matched.
    pub fn is_active(&self) -> bool {
        self.state != InstanceState::Inert
    }

    /// Resolved plugin root, once started.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Package version from the descriptor, once started.
    pub fn version(&self) -> Option<&str> {
        self.manifest.as_ref().and_then(PluginManifest::version)
    }

    /// Command tree, once started.
    pub fn commands(&self) -> Option<&CommandNode> {
        self.tree.as_ref()
    }

    /// Mutable command tree for registering handlers and routers, once started.
    pub fn commands_mut(&mut self) -> Option<&mut CommandNode> {
        self.tree.as_mut()
    }

    /// Resolve the root, read the package descriptor and build the command
    /// tree. Named plugins print a `name@version` banner unless in
    /// pass-through mode. Calling it again does nothing.
    pub fn start(&mut self, ctx: &mut DispatchContext<'_>) -> PluginResult<()> {
        if self.state != InstanceState::Activated {
            return Ok(());
        }

        let root = self.resolve_root()?;
        let manifest = PluginManifest::load(&root)?;

        if let Some(declared) = self.config.identity.declared_name() {
            if let Some(manifest) = &manifest {
                if manifest.plugin.name != declared {
                    return Err(PluginError::NameMismatch {
                        declared: declared.to_string(),
                        found: manifest.plugin.name.clone(),
                        manifest: PluginManifest::path_in(&root),
                    });
                }
            }

            if !self.config.pass_through {
                let version = manifest.as_ref().and_then(PluginManifest::version);
                ctx.printer().banner(declared, version)?;
            }
        }

        let commands_dir = root.join(&self.config.commands_path);
        tracing::debug!(plugin = %self.name, commands = %commands_dir.display(), "Starting plugin");
        let tree = CommandNode::discover(&root, commands_dir, &self.name, &self.config.ignore)?;

        self.root = Some(root);
        self.manifest = manifest;
        self.tree = Some(tree);
        self.state = InstanceState::Started;
        Ok(())
    }

    /// Dispatch a command with its arguments.
    ///
    /// Starts the plugin on first use. Inert instances report
    /// [`Dispatch::NotHandled`] without touching anything.
    pub fn run_command(
        &mut self,
        command: Option<&str>,
        args: &[String],
        ctx: &mut DispatchContext<'_>,
    ) -> PluginResult<Dispatch> {
        if !self.is_active() {
            return Ok(Dispatch::NotHandled);
        }

        self.start(ctx)?;
        ctx.set_pass_through(self.config.pass_through);

        let Some(tree) = self.tree.as_ref() else {
            return Ok(Dispatch::NotHandled);
        };

        tracing::debug!(
            plugin = %self.name,
            command = command.unwrap_or_default(),
            ?args,
            "Running command"
        );
        dispatch(tree, ArgCursor::new(command, args), ctx, self.config.router_policy)
    }

    /// Help documents of the root commands directory.
    pub fn get_help_files(&self) -> PluginResult<Vec<PathBuf>> {
        Ok(self.with_root_node(CommandNode::help_files)?.unwrap_or_default())
    }

    /// Rendered help listing entries.
    pub fn help_content(&self) -> PluginResult<Vec<HelpEntry>> {
        Ok(self.with_root_node(CommandNode::help_entries)?.unwrap_or_default())
    }

    /// Command aliases, or `None` when inert or when the plugin has none.
    pub fn get_aliases(&self) -> PluginResult<Option<AliasMap>> {
        let aliases = self.with_root_node(|node| node.aliases().cloned())?;
        Ok(aliases.filter(|map| !map.is_empty()))
    }

    /// Print the plugin's help listing.
    pub fn display_command_help(&self, ctx: &mut DispatchContext<'_>) -> PluginResult<()> {
        self.with_root_node(|node| node.display_help(ctx))?;
        Ok(())
    }

    fn resolve_root(&self) -> PluginResult<PathBuf> {
        match &self.config.identity {
            PluginIdentity::ByName(name) => {
                let search_dirs = if self.config.search_dirs.is_empty() {
                    default_search_dirs(&[])
                } else {
                    self.config.search_dirs.clone()
                };
                plugin_path(name, &search_dirs)
            }
            PluginIdentity::ByPath(path) => Ok(absolute(path)),
        }
    }

    /// Run `f` on the root group: the started tree, or a bare node over the
    /// resolved commands directory before start.
    fn with_root_node<T>(
        &self,
        f: impl FnOnce(&CommandNode) -> PluginResult<T>,
    ) -> PluginResult<Option<T>> {
        if !self.is_active() {
            return Ok(None);
        }

        if let Some(tree) = &self.tree {
            return f(tree).map(Some);
        }

        let root = self.resolve_root()?;
        let commands_dir = root.join(&self.config.commands_path);
        let node = CommandNode::new(root, commands_dir, &self.name, &self.config.ignore)?;
        f(&node).map(Some)
    }
}

fn first_positional(args: impl IntoIterator<Item = String>) -> Option<String> {
    args.into_iter().find(|arg| !arg.starts_with('-'))
}

fn build_trigger(config: &PluginConfig, name: &str) -> PluginResult<Option<Trigger>> {
    if let Some(aliases) = &config.aliases {
        return Trigger::from_names(name, aliases).map(Some);
    }
    config.trigger.as_ref().map(Trigger::from_spec).transpose()
}

/// Dispatch a command within one group.
///
/// The command is first rewritten to its canonical name, then routed to the
/// group router, the help listing, a direct handler or the default group.
pub(crate) fn dispatch(
    node: &CommandNode,
    cursor: ArgCursor<'_>,
    ctx: &mut DispatchContext<'_>,
    policy: RouterPolicy,
) -> PluginResult<Dispatch> {
    let aliases = node.aliases()?;
    let command = cursor.command.map(|c| aliases.canonical(c));
    if command != cursor.command {
        tracing::debug!(from = cursor.command, to = command, "Rewrote command alias");
    }
    let cursor = ArgCursor { command, ..cursor };

    if command.is_none() && node.is_root() && ctx.pass_through() {
        return Ok(Dispatch::NotHandled);
    }

    let resolution = locate(node, command, policy);
    tracing::debug!(
        command = command.unwrap_or_default(),
        depth = node.depth(),
        resolution = resolution.kind(),
        "Located command"
    );

    match resolution {
        Resolution::Router(router) => {
            let request = RouteRequest {
                first: cursor.first(),
                rest: cursor.tail(),
                command,
                pass_through: ctx.pass_through(),
                locals: ctx.locals(),
            };
            let code = router.route(&request).map_err(|source| execution_error(command, source))?;
            Ok(Dispatch::Routed(code))
        }
        Resolution::HelpRequested => {
            node.display_help(ctx)?;
            Ok(Dispatch::HelpShown(HelpReason::Requested))
        }
        Resolution::DirectHandler(handler) => {
            let name = command.unwrap_or_default();
            if cursor.first() == Some(HELP_COMMAND) {
                return show_command_document(node, name, ctx);
            }

            let call = CommandCall {
                command: name,
                args: cursor.rest,
                parent: cursor.parent,
                locals: ctx.locals(),
            };
            let code = handler.call(&call).map_err(|source| execution_error(command, source))?;
            Ok(Dispatch::Handled(code))
        }
        Resolution::DefaultSubPlugin(child) => delegate(child, cursor, ctx, policy),
        Resolution::NotFound => {
            let name = command.unwrap_or_default().to_string();
            if node.is_root() && ctx.pass_through() {
                tracing::debug!(command = %name, "Command not found, passing through");
                return Ok(Dispatch::NotHandled);
            }

            tracing::warn!(
                command = %name,
                plugin = node.display_name(),
                "Command has not been found"
            );
            node.display_help(ctx)?;
            Ok(Dispatch::HelpShown(HelpReason::NotFound(name)))
        }
    }
}

fn show_command_document(
    node: &CommandNode,
    command: &str,
    ctx: &mut DispatchContext<'_>,
) -> PluginResult<Dispatch> {
    match help::document_for(node.commands_dir(), command) {
        Some(path) => {
            let content = std::fs::read_to_string(&path)?;
            ctx.printer().document(&content)?;
        }
        None => {
            tracing::debug!(command, "No help document, showing listing");
            node.display_help(ctx)?;
        }
    }
    Ok(Dispatch::HelpShown(HelpReason::CommandDoc(command.to_string())))
}

fn execution_error(command: Option<&str>, source: anyhow::Error) -> PluginError {
    PluginError::Execution { command: command.unwrap_or_default().to_string(), source }
}
