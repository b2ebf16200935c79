//! Exclusion globs for command files and help documents.

use std::path::Path;

use ignore::overrides::{Override, OverrideBuilder};

use super::{PluginError, PluginResult, DEFAULT_IGNORE};

/// Compiled exclusion patterns, rooted at a commands directory.
///
/// Patterns follow gitignore glob rules: a pattern without a slash matches
/// the file name at any depth.
#[derive(Debug, Clone)]
pub struct ExcludeSet {
    patterns: Vec<String>,
    matcher: Override,
}

impl ExcludeSet {
    /// Build the built-in exclusion merged with caller patterns.
    pub fn new(root: &Path, extra: &[String]) -> PluginResult<Self> {
        let patterns: Vec<String> =
            std::iter::once(DEFAULT_IGNORE.to_string()).chain(extra.iter().cloned()).collect();

        let mut builder = OverrideBuilder::new(root);
        for pattern in &patterns {
            // Overrides whitelist by default; `!` turns a glob into an exclusion.
            builder
                .add(&format!("!{pattern}"))
                .map_err(|e| PluginError::Config(format!("Invalid ignore glob '{pattern}': {e}")))?;
        }
        let matcher = builder
            .build()
            .map_err(|e| PluginError::Config(format!("Invalid ignore globs: {e}")))?;

        Ok(Self { patterns, matcher })
    }

    /// Check whether a file is excluded.
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.matcher.matched(path, false).is_ignore()
    }

    /// The patterns in effect, built-in first.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}
