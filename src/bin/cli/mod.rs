//! CLI command modules for the fvkit toolkit
//!
//! - `container`: extract, concat and inspect
//! - `split`: flat split, pair-aware split and pair merge
//!
//! Every writing command sweeps stale staging files from its output
//! directories first, then runs the library operation and logs its
//! diagnostics as warnings.

use fvkit::io::staging::{parent_dir, sweep_stale};
use fvkit::{ErrorKind, FvkitError, Outcome};
use std::path::Path;
use std::process::ExitCode;
use tracing::{info, warn};

pub mod container;
pub mod split;

/// Process exit codes.
///
/// - 0: success
/// - 1: I/O or argument problem, fix the invocation and rerun
/// - 2: input container is malformed or was truncated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CliExitCode {
    Success = 0,
    Usage = 1,
    Corrupt = 2,
}

impl From<CliExitCode> for ExitCode {
    fn from(code: CliExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl From<&FvkitError> for CliExitCode {
    fn from(err: &FvkitError) -> Self {
        match err.kind() {
            ErrorKind::Io | ErrorKind::Range => CliExitCode::Usage,
            ErrorKind::Format | ErrorKind::Truncation => CliExitCode::Corrupt,
        }
    }
}

/// Remove staging files left by interrupted runs next to each output.
pub(crate) fn sweep_outputs(outputs: &[&Path]) {
    let mut swept = Vec::new();
    for output in outputs {
        let dir = parent_dir(output);
        if swept.contains(&dir) {
            continue;
        }
        match sweep_stale(&dir) {
            Ok(0) => {}
            Ok(n) => info!(dir = %dir.display(), removed = n, "removed stale staging files"),
            // A missing directory surfaces later as a proper open error.
            Err(e) => warn!(dir = %dir.display(), error = %e, "cannot sweep staging files"),
        }
        swept.push(dir);
    }
}

/// Log non-fatal diagnostics and hand back the value.
pub(crate) fn report<T>(outcome: Outcome<T>) -> T {
    for diagnostic in &outcome.diagnostics {
        warn!("{}", diagnostic);
    }
    outcome.value
}
