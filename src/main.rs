//! cmdnest - nested command plugins for your terminal.
//!
//! Probes the configured plugin chain in order and hands the command to the
//! first plugin that takes it.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cmdnest::output::ConsolePrinter;
use cmdnest::plugin::{default_search_dirs, DispatchContext, PluginConfig, PluginInstance};
use cmdnest::{AppConfig, VERSION};

/// Nested command plugins for your terminal
#[derive(Parser)]
#[command(name = "cmdnest")]
#[command(author, version, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file (defaults to .cmdnest.toml, then the user config)
    #[arg(short, long, env = "CMDNEST_CONFIG")]
    config: Option<PathBuf>,

    /// Extra plugin search directory, searched first
    #[arg(short = 'p', long = "plugin-dir")]
    plugin_dirs: Vec<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Plugin to run; lists every plugin's commands when omitted
    plugin: Option<String>,

    /// Command and its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    };

    std::process::exit(code);
}

fn run(cli: &Cli) -> Result<i32> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load()?,
    };
    let mut plugin_dirs = cli.plugin_dirs.clone();
    plugin_dirs.append(&mut config.general.plugin_dirs);
    config.general.plugin_dirs = plugin_dirs;

    let chain = plugin_chain(&config)?;
    tracing::debug!(plugins = chain.len(), "Built plugin chain");

    let mut printer = ConsolePrinter::stdout(config.general.color && !cli.no_color);
    let mut ctx = DispatchContext::new(&mut printer).with_host_version(VERSION);

    let Some(plugin) = cli.plugin.as_deref() else {
        list_plugins(&chain, &mut ctx)?;
        return Ok(0);
    };

    let (command, args) = match cli.args.split_first() {
        Some((command, rest)) => (Some(command.as_str()), rest),
        None => (None, &[][..]),
    };

    for plugin_config in &chain {
        let mut instance = PluginInstance::new(plugin_config.clone().trigger_value(plugin))?;
        if !instance.is_active() {
            continue;
        }

        let outcome = instance.run_command(command, args, &mut ctx)?;
        tracing::debug!(plugin = instance.name(), ?outcome, "Plugin finished");
        if let Some(code) = outcome.exit_code() {
            return Ok(code);
        }
    }

    eprintln!("Plugin '{plugin}' has not been found.");
    list_plugins(&chain, &mut ctx)?;
    Ok(1)
}

/// The configured chain, or one plugin per directory found in the search
/// directories. Plugins without a trigger activate on their own name.
fn plugin_chain(config: &AppConfig) -> Result<Vec<PluginConfig>> {
    let chain = if config.plugins.is_empty() {
        discover_plugins(&default_search_dirs(&config.general.plugin_dirs))?
    } else {
        config.plugin_configs()?
    };

    Ok(chain
        .into_iter()
        .map(|plugin| {
            if plugin.has_trigger() {
                plugin
            } else {
                plugin.aliases(Vec::<String>::new())
            }
        })
        .collect())
}

fn discover_plugins(search_dirs: &[PathBuf]) -> Result<Vec<PluginConfig>> {
    let mut names: Vec<String> = Vec::new();
    let mut chain = Vec::new();

    for dir in search_dirs.iter().filter(|dir| dir.is_dir()) {
        for root in plugin_roots(dir)? {
            let Some(name) = root.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            if names.contains(&name) {
                tracing::debug!(plugin = %name, root = %root.display(), "Plugin shadowed");
                continue;
            }

            tracing::debug!(plugin = %name, root = %root.display(), "Discovered plugin");
            names.push(name);
            chain.push(PluginConfig::by_path(root));
        }
    }

    Ok(chain)
}

fn plugin_roots(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut roots: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter(|path| path.file_name().is_some_and(|n| !n.to_string_lossy().starts_with('.')))
        .collect();
    roots.sort();
    Ok(roots)
}

/// Print every plugin's help listing.
fn list_plugins(chain: &[PluginConfig], ctx: &mut DispatchContext<'_>) -> Result<()> {
    for plugin_config in chain {
        let instance = PluginInstance::new(plugin_config.clone().without_trigger())?;
        if let Err(e) = instance.display_command_help(ctx) {
            tracing::warn!(plugin = instance.name(), error = %e, "Could not list plugin commands");
        }
    }
    Ok(())
}
