//! Import configuration

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Configuration for importing 3MF packages
///
/// # Example
///
/// ```
/// use lib3mf_import::ImportConfig;
///
/// let config = ImportConfig::new()
///     .with_style("smooth")
///     .with_staging_root("/var/tmp")
///     .with_cleanup(true);
///
/// assert!(config.styles().contains("smooth"));
/// assert!(config.cleanup());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    /// Style flags requested by the caller
    styles: BTreeSet<String>,
    /// Directory the staging directory is created in
    staging_root: PathBuf,
    /// Remove the staging directory after a successful import
    cleanup: bool,
}

impl ImportConfig {
    /// Create a configuration staging under the system temp directory
    pub fn new() -> Self {
        Self {
            styles: BTreeSet::new(),
            staging_root: std::env::temp_dir(),
            cleanup: false,
        }
    }

    /// Add a style flag
    ///
    /// Style flags are collected and exposed through [`ImportConfig::styles`];
    /// the importer itself does not act on them.
    pub fn with_style(mut self, flag: impl Into<String>) -> Self {
        self.styles.insert(flag.into());
        self
    }

    /// Set the directory in which staging directories are created
    pub fn with_staging_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.staging_root = root.into();
        self
    }

    /// Remove the staging directory once an import succeeds
    pub fn with_cleanup(mut self, cleanup: bool) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Requested style flags
    pub fn styles(&self) -> &BTreeSet<String> {
        &self.styles
    }

    /// Directory in which staging directories are created
    pub fn staging_root(&self) -> &Path {
        &self.staging_root
    }

    /// Whether the staging directory is removed after a successful import
    pub fn cleanup(&self) -> bool {
        self.cleanup
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self::new()
    }
}
