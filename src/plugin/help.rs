//! Help document indexing.
//!
//! Every command may ship a markdown document next to its handler. The
//! listing shows one line per document: the plugin/command label and a short
//! description taken from the document itself.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{
    AliasMap, ExcludeSet, HelpEntry, PluginResult, HELP_EXTENSION, PLACEHOLDER_COMMAND,
};
use crate::core::SCRIPT_EXTENSIONS;

/// Find every help document directly inside `commands_dir`.
///
/// Results are in file name order, so the listing is stable for identical
/// filesystem state. A missing directory yields no documents.
pub fn index(commands_dir: &Path, exclude: &ExcludeSet) -> PluginResult<Vec<PathBuf>> {
    if !commands_dir.is_dir() {
        tracing::debug!(dir = %commands_dir.display(), "Commands directory missing, no help");
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(commands_dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();

        if !entry.file_type().is_file() || !is_help_document(path) {
            continue;
        }
        if exclude.is_excluded(path) {
            tracing::debug!(path = %path.display(), "Help document excluded");
            continue;
        }

        files.push(path.to_path_buf());
    }

    Ok(files)
}

/// Render indexed documents into listing entries.
///
/// `plugin` is the display name prefixed to every label; aliases are loaded
/// from `plugin_root`.
pub fn render(paths: &[PathBuf], plugin: &str, plugin_root: &Path) -> PluginResult<Vec<HelpEntry>> {
    let aliases = AliasMap::load(plugin_root)?;
    render_with(paths, plugin, &aliases)
}

/// Render with an already loaded alias map.
pub fn render_with(
    paths: &[PathBuf],
    plugin: &str,
    aliases: &AliasMap,
) -> PluginResult<Vec<HelpEntry>> {
    let plugin_label = aliases.annotate(plugin);

    paths
        .iter()
        .map(|path| {
            let content = String::from_utf8_lossy(&std::fs::read(path)?).into_owned();
            let command = command_name(path);

            let label = if command == PLACEHOLDER_COMMAND || command.is_empty() || command == plugin
            {
                plugin_label.clone()
            } else {
                format!("{plugin_label} {}", aliases.annotate(&command))
            };

            Ok(HelpEntry::new(label, description(&content)))
        })
        .collect()
}

/// Pick the description line of a help document.
///
/// The third line is used when present, so a document can start with a
/// heading and a blank line; otherwise the first line.
pub fn description(content: &str) -> String {
    let lines: Vec<&str> = content.lines().collect();

    lines
        .get(2)
        .filter(|line| !line.is_empty())
        .or_else(|| lines.first())
        .map(|line| (*line).to_string())
        .unwrap_or_default()
}

/// Derive the command name a help document describes.
///
/// `install.md` and `install.sh.md` both describe `install`.
pub fn command_name(path: &Path) -> String {
    let file_name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    let stem = file_name.strip_suffix(&format!(".{HELP_EXTENSION}")).unwrap_or(&file_name);

    SCRIPT_EXTENSIONS
        .iter()
        .find_map(|ext| stem.strip_suffix(&format!(".{ext}")))
        .unwrap_or(stem)
        .to_string()
}

/// Path of the help document for a command in `commands_dir`.
pub fn document_for(commands_dir: &Path, command: &str) -> Option<PathBuf> {
    let plain = commands_dir.join(format!("{command}.{HELP_EXTENSION}"));
    if plain.is_file() {
        return Some(plain);
    }

    SCRIPT_EXTENSIONS
        .iter()
        .map(|ext| commands_dir.join(format!("{command}.{ext}.{HELP_EXTENSION}")))
        .find(|p| p.is_file())
}

fn is_help_document(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == HELP_EXTENSION)
}
