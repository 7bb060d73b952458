//! Container operations
//!
//! Each operation comes in two forms:
//!
//! - a stream-level function over `Read`/`Seek`/`Write` values, usable with
//!   in-memory buffers, and
//! - a path-level adapter that opens files, stages every output, and
//!   promotes outputs only after the whole operation succeeded.
//!
//! All structural validation happens before the first output byte is
//! written. Non-fatal findings are returned as [`Diagnostic`]s inside an
//! [`Outcome`] instead of being printed; callers decide how to surface them.

use std::fmt;

pub mod concat;
pub mod extract;
pub mod inspect;
pub mod split;

pub use concat::{concat, concat_streams, ConcatSummary, COPY_CHUNK_SIZE};
pub use extract::{extract, extract_records, ExtractSummary, RangeDescriptor};
pub use inspect::{
    inspect, inspect_stream, InspectReport, RecordPreview, DEFAULT_PREVIEW_COUNT, PREVIEW_WIDTH,
};
pub use split::{
    merge_pairs, merge_pairs_streams, split, split_pairs, split_pairs_stream, split_stream,
    MergeSummary, SplitSummary,
};

/// A non-fatal anomaly found while running an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Container length is not a multiple of the record stride
    TrailingBytes {
        /// Container byte length
        byte_len: u64,
        /// Record stride
        stride: u64,
        /// Bytes past the last complete record
        trailing: u64,
    },
    /// Fewer records could be read than were requested
    ShortRead {
        /// Records requested after clamping
        requested: u64,
        /// Records actually written
        written: u64,
    },
    /// A record's own dimension field differs from the declared dimension
    DimensionMismatch {
        /// Record index
        index: u64,
        /// Dimension field of that record
        found: i32,
        /// Declared container dimension
        expected: u32,
    },
    /// A record could not be fully read
    TruncatedRecord {
        /// Record index
        index: u64,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::TrailingBytes {
                byte_len,
                stride,
                trailing,
            } => write!(
                f,
                "size {} is not a multiple of record stride {} ({} trailing bytes ignored)",
                byte_len, stride, trailing
            ),
            Diagnostic::ShortRead { requested, written } => write!(
                f,
                "input ended early: wrote {} of {} requested records",
                written, requested
            ),
            Diagnostic::DimensionMismatch {
                index,
                found,
                expected,
            } => write!(
                f,
                "record {} has dimension {}, container dimension is {}",
                index, found, expected
            ),
            Diagnostic::TruncatedRecord { index } => {
                write!(f, "record {} could not be fully read", index)
            }
        }
    }
}

/// Result value of an operation plus its non-fatal diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    /// Operation result
    pub value: T,
    /// Anomalies that did not stop the operation
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Outcome<T> {
    /// Outcome with the given diagnostics.
    pub fn with_diagnostics(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }

    /// Whether any anomaly was recorded.
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Transform the value, keeping diagnostics.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }
}
