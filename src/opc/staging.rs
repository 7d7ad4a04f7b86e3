//! Staging directories and archive extraction

use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use zip::ZipArchive;

/// Number of names tried before staging gives up
pub const STAGING_ATTEMPTS: usize = 50;

/// Prefix of every staging directory name
const STAGING_PREFIX: &str = "3mf-import";

/// Staging directory name for one attempt
///
/// Names combine the process id, the current time and the attempt number so
/// concurrent imports in one or several processes land in distinct directories.
pub(super) fn staging_name(attempt: usize) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!(
        "{}-{}-{}-{}",
        STAGING_PREFIX,
        std::process::id(),
        nanos,
        attempt
    )
}

/// Create a fresh, uniquely named directory under `root`
pub fn create_staging_dir(root: &Path) -> Result<PathBuf> {
    create_staging_dir_with(root, STAGING_ATTEMPTS, staging_name)
}

/// Create a fresh directory under `root`, naming attempts with `name`
///
/// A name that already exists is retried with the next attempt number; any
/// other I/O failure aborts immediately.
pub fn create_staging_dir_with<F>(root: &Path, attempts: usize, mut name: F) -> Result<PathBuf>
where
    F: FnMut(usize) -> String,
{
    for attempt in 0..attempts {
        let candidate = root.join(name(attempt));
        match fs::create_dir(&candidate) {
            Ok(()) => {
                log::debug!("Staging directory {}", candidate.display());
                return Ok(candidate);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                log::trace!("Staging name {} taken, retrying", candidate.display());
            }
            Err(e) => return Err(Error::Io(e)),
        }
    }
    Err(Error::StagingExhausted {
        root: root.display().to_string(),
        attempts,
    })
}

/// Extract every entry of a ZIP archive below `root`
///
/// The archive's directory structure is preserved. Entries whose names would
/// land outside `root` are skipped. Returns the number of files written.
pub fn extract<R: Read + Seek>(reader: R, root: &Path) -> Result<usize> {
    let mut archive = ZipArchive::new(reader)?;
    let mut written = 0;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(relative) = entry.enclosed_name() else {
            log::warn!("Skipping archive entry '{}' outside the package", entry.name());
            continue;
        };
        let target = root.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(&target)?;
        io::copy(&mut entry, &mut file)?;
        written += 1;
    }

    log::debug!("Extracted {} file(s) into {}", written, root.display());
    Ok(written)
}
