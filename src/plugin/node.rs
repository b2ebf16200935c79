//! The command group tree of a started plugin.
//!
//! Each node owns one commands directory. A `default/` directory inside it
//! becomes a child node whose commands live in `default/commands`; the
//! nesting is unbounded.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::unsync::OnceCell;

use super::{
    help, AliasMap, CommandHandler, CommandRegistry, DispatchContext, ExcludeSet, HelpEntry,
    PluginResult, Router, ScriptRouter, DEFAULT_GROUP_DIR, NESTED_COMMANDS_PATH,
};

/// One command group: its handlers, optional router and optional nested
/// default group.
pub struct CommandNode {
    root: PathBuf,
    commands_dir: PathBuf,
    display_name: String,
    ignore: Vec<String>,
    exclude: ExcludeSet,
    aliases: OnceCell<AliasMap>,
    registry: CommandRegistry,
    router: Option<Arc<dyn Router>>,
    default_group: Option<Box<CommandNode>>,
    depth: usize,
}

impl CommandNode {
    /// Create an empty node without touching the filesystem.
    pub fn new(
        root: impl Into<PathBuf>,
        commands_dir: impl Into<PathBuf>,
        display_name: impl Into<String>,
        ignore: &[String],
    ) -> PluginResult<Self> {
        Self::with_depth(root.into(), commands_dir.into(), display_name.into(), ignore, 0)
    }

    fn with_depth(
        root: PathBuf,
        commands_dir: PathBuf,
        display_name: String,
        ignore: &[String],
        depth: usize,
    ) -> PluginResult<Self> {
        let exclude = ExcludeSet::new(&commands_dir, ignore)?;
        Ok(Self {
            root,
            commands_dir,
            display_name,
            ignore: ignore.to_vec(),
            exclude,
            aliases: OnceCell::new(),
            registry: CommandRegistry::new(),
            router: None,
            default_group: None,
            depth,
        })
    }

    /// Build the tree rooted at `commands_dir`, registering command scripts,
    /// router scripts and nested default groups found on disk.
    pub fn discover(
        root: impl Into<PathBuf>,
        commands_dir: impl Into<PathBuf>,
        display_name: impl Into<String>,
        ignore: &[String],
    ) -> PluginResult<Self> {
        let mut node = Self::new(root, commands_dir, display_name, ignore)?;
        node.scan()?;
        Ok(node)
    }

    fn scan(&mut self) -> PluginResult<()> {
        self.registry.scan_scripts(&self.commands_dir, &self.exclude)?;

        if self.router.is_none() {
            if let Some(router) = self.commands_dir.parent().and_then(ScriptRouter::find) {
                tracing::debug!(
                    router = %router.path().display(),
                    depth = self.depth,
                    "Found router"
                );
                self.router = Some(Arc::new(router));
            }
        }

        let group_dir = self.commands_dir.join(DEFAULT_GROUP_DIR);
        if group_dir.is_dir() {
            tracing::debug!(
                dir = %group_dir.display(),
                depth = self.depth + 1,
                "Found default group"
            );
            self.default_group_mut()?.scan()?;
        }

        Ok(())
    }

    /// Root directory of this group (aliases are read from here).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding command files and help documents.
    pub fn commands_dir(&self) -> &Path {
        &self.commands_dir
    }

    /// Name prefixed to help labels.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Nesting depth; the plugin root is 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Check whether this is the plugin root.
    pub fn is_root(&self) -> bool {
        self.depth == 0
    }

    /// Aliases of this group, read on first use.
    pub fn aliases(&self) -> PluginResult<&AliasMap> {
        self.aliases.get_or_try_init(|| AliasMap::load(&self.root))
    }

    /// Direct handlers of this group.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Register a direct handler.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: impl CommandHandler + 'static,
    ) -> &mut Self {
        self.registry.register(name, handler);
        self
    }

    /// Router of this group, if any.
    pub fn router(&self) -> Option<&Arc<dyn Router>> {
        self.router.as_ref()
    }

    /// Attach a router, replacing any router script.
    pub fn set_router(&mut self, router: impl Router + 'static) -> &mut Self {
        self.router = Some(Arc::new(router));
        self
    }

    /// Nested default group, if any.
    pub fn default_group(&self) -> Option<&CommandNode> {
        self.default_group.as_deref()
    }

    /// Nested default group, created empty when missing.
    pub fn default_group_mut(&mut self) -> PluginResult<&mut CommandNode> {
        let child = match self.default_group.take() {
            Some(child) => child,
            None => {
                let root = self.commands_dir.join(DEFAULT_GROUP_DIR);
                let commands_dir = root.join(NESTED_COMMANDS_PATH);
                Box::new(Self::with_depth(
                    root,
                    commands_dir,
                    self.display_name.clone(),
                    &self.ignore,
                    self.depth + 1,
                )?)
            }
        };

        Ok(&mut **self.default_group.insert(child))
    }

    /// Help documents of this group, in file name order.
    pub fn help_files(&self) -> PluginResult<Vec<PathBuf>> {
        help::index(&self.commands_dir, &self.exclude)
    }

    /// Rendered help listing of this group.
    pub fn help_entries(&self) -> PluginResult<Vec<HelpEntry>> {
        let files = self.help_files()?;
        help::render_with(&files, &self.display_name, self.aliases()?)
    }

    /// Print this group's help listing.
    pub fn display_help(&self, ctx: &mut DispatchContext<'_>) -> PluginResult<()> {
        let entries = self.help_entries()?;
        ctx.print_listing(&entries)
    }
}

impl std::fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandNode")
            .field("commands_dir", &self.commands_dir)
            .field("display_name", &self.display_name)
            .field("depth", &self.depth)
            .field("registry", &self.registry)
            .field("router", &self.router.is_some())
            .field("default_group", &self.default_group)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::{handler_fn, router_fn, ALIASES_FILE};
    use tempfile::TempDir;

    fn layout() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let commands = temp_dir.path().join("commands");
        let nested = commands.join("default").join("commands");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(commands.join("install.sh"), "exit 0").unwrap();
        std::fs::write(commands.join("install.md"), "# Install\n\nInstall things").unwrap();
        std::fs::write(nested.join("deep.sh"), "exit 0").unwrap();
        std::fs::write(commands.join("default").join("_router.sh"), "exit 0").unwrap();
        temp_dir
    }

    #[test]
    fn test_discover_tree() {
        let temp_dir = layout();
        let node = CommandNode::discover(
            temp_dir.path(),
            temp_dir.path().join("commands"),
            "demo",
            &[],
        )
        .unwrap();

        assert!(node.is_root());
        assert!(node.registry().contains("install"));
        assert!(node.router().is_none());

        let child = node.default_group().unwrap();
        assert_eq!(child.depth(), 1);
        assert_eq!(child.display_name(), "demo");
        assert!(child.registry().contains("deep"));
        assert!(child.router().is_some());
        assert!(child.default_group().is_none());
    }

    #[test]
    fn test_programmatic_tree() {
        let temp_dir = TempDir::new().unwrap();
        let mut node =
            CommandNode::new(temp_dir.path(), temp_dir.path().join("commands"), "demo", &[])
                .unwrap();

        node.register("one", handler_fn(|_| Ok(1)));
        node.default_group_mut()
            .unwrap()
            .register("two", handler_fn(|_| Ok(2)))
            .set_router(router_fn(|_| Ok(3)));

        assert!(node.registry().contains("one"));
        let child = node.default_group().unwrap();
        assert!(child.registry().contains("two"));
        assert!(child.router().is_some());
        assert_eq!(child.commands_dir(), temp_dir.path().join("commands/default/commands"));
    }

    #[test]
    fn test_help_entries_use_aliases() {
        let temp_dir = layout();
        std::fs::write(temp_dir.path().join(ALIASES_FILE), r#"{"install": "i"}"#).unwrap();

        let node = CommandNode::discover(
            temp_dir.path(),
            temp_dir.path().join("commands"),
            "demo",
            &[],
        )
        .unwrap();

        let entries = node.help_entries().unwrap();
        assert_eq!(entries, vec![HelpEntry::new("demo install|i", "Install things")]);
    }

    #[test]
    fn test_aliases_loaded_once() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(ALIASES_FILE), r#"{"install": "i"}"#).unwrap();

        let node =
            CommandNode::new(temp_dir.path(), temp_dir.path().join("commands"), "demo", &[])
                .unwrap();
        assert_eq!(node.aliases().unwrap().canonical("i"), "install");

        std::fs::remove_file(temp_dir.path().join(ALIASES_FILE)).unwrap();
        assert_eq!(node.aliases().unwrap().canonical("i"), "install");
    }
}
