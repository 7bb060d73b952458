//! Container writer.
//!
//! Writes records in the vector-container layout:
//! - Streaming (one record at a time, constant memory)
//! - Dimension consistency enforced across typed records
//! - Raw record pass-through for copy-style operations
//!
//! # Example
//!
//! ```no_run
//! use fvkit::io::ContainerWriter;
//! use fvkit::VectorRecord;
//!
//! # fn main() -> fvkit::Result<()> {
//! let mut writer = ContainerWriter::create("out.fvecs")?;
//! writer.write_record(&VectorRecord::new(vec![0.1, 0.2, 0.3]))?;
//! writer.write_record(&VectorRecord::new(vec![0.4, 0.5, 0.6]))?;
//! writer.finish()?.commit()?;
//! # Ok(())
//! # }
//! ```

use super::staging::StagedFile;
use crate::error::{FvkitError, Result};
use crate::record::VectorRecord;
use std::io::Write;
use std::path::Path;

/// Record writer over any byte sink.
pub struct ContainerWriter<W: Write> {
    writer: W,
    dimension: Option<u32>,
    records_written: u64,
    buffer: Vec<u8>,
}

impl ContainerWriter<StagedFile> {
    /// Create a writer whose output is staged next to `path`.
    ///
    /// Nothing appears at `path` until the staged file returned by
    /// [`finish`](Self::finish) is committed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(StagedFile::create(path)?))
    }
}

impl<W: Write> ContainerWriter<W> {
    /// Wrap a byte sink.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            dimension: None,
            records_written: 0,
            buffer: Vec::new(),
        }
    }

    /// Write a typed record.
    ///
    /// # Errors
    ///
    /// [`FvkitError::RecordDimension`] if the record's dimension differs from
    /// the first record written.
    pub fn write_record(&mut self, record: &VectorRecord) -> Result<()> {
        match self.dimension {
            Some(expected) if expected as usize != record.dimension() => {
                return Err(FvkitError::RecordDimension {
                    expected,
                    found: i32::try_from(record.dimension()).unwrap_or(i32::MAX),
                });
            }
            _ => {}
        }

        self.buffer.clear();
        record.encode_into(&mut self.buffer)?;
        self.writer.write_all(&self.buffer)?;

        self.dimension.get_or_insert(record.dimension() as u32);
        self.records_written += 1;
        Ok(())
    }

    /// Write one already-encoded record verbatim.
    ///
    /// The caller guarantees `bytes` is exactly one record of the
    /// container's stride.
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.records_written += 1;
        Ok(())
    }

    /// Number of records written so far.
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Flush buffers and return the underlying sink.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
