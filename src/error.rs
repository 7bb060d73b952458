//! Error types for fvkit

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for fvkit operations
pub type Result<T> = std::result::Result<T, FvkitError>;

/// Broad error classes.
///
/// Used by the CLI to pick an exit code and by callers that only care
/// whether a failure came from the environment, the input bytes, or the
/// parameters they passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Path missing, unreadable or unwritable
    Io,
    /// Container bytes do not describe a valid (or compatible) container
    Format,
    /// Offset, count, split point or output arguments out of bounds
    Range,
    /// A record promised by a validated record count could not be read
    Truncation,
}

/// Error types that can occur in fvkit
#[derive(Debug, Error)]
pub enum FvkitError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A path could not be opened or inspected
    #[error("cannot open '{}': {source}", path.display())]
    Open {
        /// Path that failed
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Fewer than 4 bytes, so not even a dimension field is present
    #[error("container too small: {byte_len} bytes, need at least 4 for the dimension field")]
    TooSmall {
        /// Byte length of the input
        byte_len: u64,
    },

    /// Declared dimension is zero or negative
    #[error("invalid dimension {dim}: must be positive")]
    InvalidDimension {
        /// Dimension field as read
        dim: i32,
    },

    /// Two containers that must agree on dimension do not
    #[error("dimension mismatch: first container has dimension {first}, second has {second}")]
    DimensionMismatch {
        /// Dimension of the first container
        first: u32,
        /// Dimension of the second container
        second: u32,
    },

    /// A record handed to a writer does not match the container dimension
    #[error("record dimension {found} does not match container dimension {expected}")]
    RecordDimension {
        /// Dimension already established by the container
        expected: u32,
        /// Dimension field of the offending record
        found: i32,
    },

    /// Pair-aware operation on a container with an odd record count
    #[error("record count {total} is odd and cannot be read as (s, e) pairs")]
    OddRecordCount {
        /// Total record count
        total: u64,
    },

    /// Parameter outside its valid bounds
    #[error("out of range: {msg}")]
    OutOfRange {
        /// Description of the violated bound
        msg: String,
    },

    /// Two outputs of one operation name the same path
    #[error("outputs must be distinct paths, got '{}' twice", path.display())]
    ConflictingOutputs {
        /// The duplicated path
        path: PathBuf,
    },

    /// Record could not be fully read although the header promised it
    #[error("truncated record {index}: expected {expected} bytes, read {got}")]
    Truncated {
        /// Zero-based record index (or byte-stream index for raw copies)
        index: u64,
        /// Bytes expected
        expected: u64,
        /// Bytes actually read
        got: u64,
    },
}

impl FvkitError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FvkitError::Io(_) | FvkitError::Open { .. } => ErrorKind::Io,
            FvkitError::TooSmall { .. }
            | FvkitError::InvalidDimension { .. }
            | FvkitError::DimensionMismatch { .. }
            | FvkitError::RecordDimension { .. }
            | FvkitError::OddRecordCount { .. } => ErrorKind::Format,
            FvkitError::OutOfRange { .. } | FvkitError::ConflictingOutputs { .. } => {
                ErrorKind::Range
            }
            FvkitError::Truncated { .. } => ErrorKind::Truncation,
        }
    }

    pub(crate) fn out_of_range(msg: impl Into<String>) -> Self {
        FvkitError::OutOfRange { msg: msg.into() }
    }

    pub(crate) fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        FvkitError::Open {
            path: path.into(),
            source,
        }
    }
}
