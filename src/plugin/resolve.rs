//! Mapping installed plugin names to filesystem roots.

use std::path::{Path, PathBuf};

use super::{PluginError, PluginResult};

/// Directory name searched for plugins, relative to the working directory
/// and to the user data directory.
pub const PLUGINS_DIR: &str = "plugins";

/// Default plugin search directories, after any configured ones.
///
/// Looks in:
/// 1. `extra`, in order
/// 2. `./plugins`
/// 3. `<data dir>/cmdnest/plugins`
pub fn default_search_dirs(extra: &[PathBuf]) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = extra.to_vec();
    dirs.push(PathBuf::from(PLUGINS_DIR));
    if let Some(data_dir) = crate::core::AppConfig::data_dir() {
        dirs.push(data_dir.join(PLUGINS_DIR));
    }
    dirs.dedup();
    dirs
}

/// Resolve an installed plugin's root directory.
///
/// Scoped names (`@scope/tool`) map to nested directories. The first search
/// directory containing the plugin wins.
pub fn plugin_path(name: &str, search_dirs: &[PathBuf]) -> PluginResult<PathBuf> {
    let relative = relative_path(name);

    for dir in search_dirs {
        let candidate = dir.join(&relative);
        if candidate.is_dir() {
            tracing::debug!(plugin = %name, root = %candidate.display(), "Resolved plugin");
            return Ok(absolute(&candidate));
        }
    }

    Err(PluginError::NotInstalled { name: name.to_string(), searched: search_dirs.to_vec() })
}

/// Make `path` absolute against the working directory.
pub fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn relative_path(name: &str) -> PathBuf {
    name.split('/').filter(|segment| !segment.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolves_first_match() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        std::fs::create_dir_all(second.path().join("demo")).unwrap();

        let dirs = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        assert_eq!(plugin_path("demo", &dirs).unwrap(), second.path().join("demo"));

        std::fs::create_dir_all(first.path().join("demo")).unwrap();
        assert_eq!(plugin_path("demo", &dirs).unwrap(), first.path().join("demo"));
    }

    #[test]
    fn test_scoped_name() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("@acme").join("deploy")).unwrap();

        let dirs = vec![temp_dir.path().to_path_buf()];
        let root = plugin_path("@acme/deploy", &dirs).unwrap();
        assert!(root.ends_with("@acme/deploy"));
    }

    #[test]
    fn test_not_installed() {
        let temp_dir = TempDir::new().unwrap();
        let dirs = vec![temp_dir.path().to_path_buf()];

        match plugin_path("missing", &dirs) {
            Err(PluginError::NotInstalled { name, searched }) => {
                assert_eq!(name, "missing");
                assert_eq!(searched, dirs);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_default_search_dirs_keep_extra_first() {
        let dirs = default_search_dirs(&[PathBuf::from("/opt/cmdnest")]);
        assert_eq!(dirs[0], PathBuf::from("/opt/cmdnest"));
        assert_eq!(dirs[1], PathBuf::from(PLUGINS_DIR));
    }
}
