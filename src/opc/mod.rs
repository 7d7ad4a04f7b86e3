//! OPC (Open Packaging Conventions) handling for 3MF files
//!
//! A 3MF file is a ZIP archive following the OPC standard. The package is
//! extracted into a fresh staging directory, then its root relationships
//! part is read to find the 3D model document.

mod relationships;
mod staging;

pub use relationships::{
    MODEL_REL_TYPE, Relationship, find_model_target, part_path, read_relationships,
};
pub use staging::{STAGING_ATTEMPTS, create_staging_dir, create_staging_dir_with, extract};

use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};

/// Relationships file path
pub const RELS_PATH: &str = "_rels/.rels";

/// A package extracted into its own staging directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedPackage {
    root: PathBuf,
    model_path: Option<PathBuf>,
}

impl StagedPackage {
    /// Extract `archive` under a new directory in `staging_root`
    ///
    /// The staging directory is left on disk when this fails, so the
    /// extracted parts can be inspected.
    pub fn stage<R: Read + Seek>(archive: R, staging_root: &Path) -> Result<Self> {
        let root = create_staging_dir(staging_root)?;
        extract(archive, &root)?;
        let model_path = Self::discover_model_path(&root)?;
        Ok(Self { root, model_path })
    }

    /// Extract the package stored at `path`
    pub fn stage_file<P: AsRef<Path>>(path: P, staging_root: &Path) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::stage(BufReader::new(file), staging_root)
    }

    fn discover_model_path(root: &Path) -> Result<Option<PathBuf>> {
        let rels_path = root.join(RELS_PATH);
        let file = File::open(&rels_path).map_err(|_| Error::MissingFile(RELS_PATH.to_string()))?;
        let rels = read_relationships(BufReader::new(file))
            .map_err(|e| Error::unreadable_part(RELS_PATH, e))?;
        relationships::model_part(&rels, root)
    }

    /// Directory the package was extracted into
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the 3D model document, if the package declares one
    pub fn model_path(&self) -> Option<&Path> {
        self.model_path.as_deref()
    }

    /// Delete the staging directory and everything in it
    pub fn remove(self) -> Result<()> {
        fs::remove_dir_all(&self.root)?;
        log::debug!("Removed staging directory {}", self.root.display());
        Ok(())
    }
}
