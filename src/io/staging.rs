//! Staged outputs with atomic promotion.
//!
//! Every output is first written to a temporary file in the destination's
//! directory (same filesystem, so the final rename is atomic) and only
//! renamed onto the destination by [`StagedFile::commit`]. Dropping an
//! uncommitted `StagedFile` deletes the temporary file, leaving the
//! destination untouched. This is what allows an output path to alias one
//! of the inputs.

use crate::error::{FvkitError, Result};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// File name prefix of staging files.
pub const STAGING_PREFIX: &str = ".fvkit-";

/// File name suffix of staging files.
pub const STAGING_SUFFIX: &str = ".staging";

/// A buffered temporary file destined for `target`.
pub struct StagedFile {
    target: PathBuf,
    file: BufWriter<NamedTempFile>,
}

impl StagedFile {
    /// Create a staging file next to `target`.
    pub fn create<P: AsRef<Path>>(target: P) -> Result<Self> {
        let target = target.as_ref().to_path_buf();
        let dir = parent_dir(&target);
        let temp = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(STAGING_SUFFIX)
            .tempfile_in(&dir)
            .map_err(|e| FvkitError::open(&dir, e))?;
        debug!(staging = %temp.path().display(), target = %target.display(), "staging output");

        Ok(Self {
            target,
            file: BufWriter::new(temp),
        })
    }

    /// Final destination.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Path of the temporary file.
    pub fn staging_path(&self) -> &Path {
        self.file.get_ref().path()
    }

    /// Flush, sync, and atomically rename onto the target.
    pub fn commit(self) -> Result<()> {
        let temp = self.file.into_inner().map_err(|e| e.into_error())?;
        temp.as_file().sync_all()?;
        temp.persist(&self.target).map_err(|e| e.error)?;
        debug!(target = %self.target.display(), "promoted staged output");
        Ok(())
    }
}

impl Write for StagedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.file.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Remove staging files left behind by interrupted runs in `dir`.
///
/// Returns the number of files removed. Files that vanish or cannot be
/// removed are skipped with a warning.
pub fn sweep_stale<P: AsRef<Path>>(dir: P) -> Result<usize> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|e| FvkitError::open(dir, e))?;

    let mut removed = 0;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !is_staging_name(name) || !entry.file_type()?.is_file() {
            continue;
        }
        match fs::remove_file(entry.path()) {
            Ok(()) => {
                debug!(path = %entry.path().display(), "removed stale staging file");
                removed += 1;
            }
            Err(e) => warn!(path = %entry.path().display(), error = %e, "cannot remove stale staging file"),
        }
    }
    Ok(removed)
}

/// Directory that will hold the staging file for `target`.
pub fn parent_dir(target: &Path) -> PathBuf {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Where `target` lands once promoted: its canonical directory joined with
/// its file name.
///
/// Two spellings of the same destination (`o.fvecs`, `sub/../o.fvecs`, a
/// symlinked directory) resolve to the same path. The file name itself is
/// not followed, since a rename replaces a symlink rather than its target.
pub fn resolve_target(target: &Path) -> Result<PathBuf> {
    let dir = parent_dir(target);
    let resolved = fs::canonicalize(&dir).map_err(|e| FvkitError::open(&dir, e))?;
    Ok(match target.file_name() {
        Some(name) => resolved.join(name),
        None => resolved,
    })
}

fn is_staging_name(name: &str) -> bool {
    name.starts_with(STAGING_PREFIX) && name.ends_with(STAGING_SUFFIX)
}
