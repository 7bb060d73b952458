//! Streaming container reader.
//!
//! Reads one record at a time into a reusable buffer, so memory use is a
//! single record regardless of container size.
//!
//! # Usage
//!
//! ```no_run
//! use fvkit::io::ContainerReader;
//!
//! # fn main() -> fvkit::Result<()> {
//! let mut reader = ContainerReader::from_path("base.fvecs")?;
//! println!("dimension {}", reader.header().dimension);
//!
//! for result in reader.records() {
//!     let record = result?;
//!     // Process one record at a time (constant memory)
//! }
//! # Ok(())
//! # }
//! ```

use super::header::ContainerHeader;
use crate::error::{FvkitError, Result};
use crate::record::{decode_values, read_dimension, VectorRecord, DIM_FIELD_SIZE};
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Result of reading one raw record.
#[derive(Debug, PartialEq)]
pub enum RecordRead<'a> {
    /// A full record, `stride` bytes including the dimension field
    Complete(&'a [u8]),
    /// The stream ended after this many bytes of the record
    Partial(usize),
    /// All `total_records` records have been read
    End,
}

/// Record-at-a-time reader over a validated container.
///
/// # Buffer Reuse
///
/// The record buffer is allocated on the first read and reused for every
/// subsequent record.
pub struct ContainerReader<R> {
    reader: R,
    header: ContainerHeader,
    buffer: Vec<u8>,
    position: u64,
}

impl ContainerReader<BufReader<File>> {
    /// Open a container file and validate its header.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be opened, is shorter than 4 bytes,
    /// or declares a non-positive dimension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let (file, header) = ContainerHeader::open(path)?;
        Ok(Self::with_header(BufReader::new(file), header))
    }
}

impl<R: Read + Seek> ContainerReader<R> {
    /// Validate the header of `reader` (positioned at the container start).
    pub fn new(mut reader: R, byte_len: u64) -> Result<Self> {
        let header = ContainerHeader::read(&mut reader, byte_len)?;
        Ok(Self::with_header(reader, header))
    }

    /// Position the reader so the next read returns record `index`.
    pub fn seek_to_record(&mut self, index: u64) -> Result<()> {
        self.reader
            .seek(SeekFrom::Start(self.header.record_offset(index)))?;
        self.position = index;
        Ok(())
    }
}

impl<R: Read> ContainerReader<R> {
    /// Wrap a reader positioned at record 0 of an already validated container.
    pub fn with_header(reader: R, header: ContainerHeader) -> Self {
        Self {
            reader,
            header,
            buffer: Vec::new(),
            position: 0,
        }
    }

    /// Header of the underlying container.
    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    /// Index of the next record to be read.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Read the next record's raw bytes.
    ///
    /// Stops at `total_records`; trailing bytes past the last complete
    /// record are never returned.
    pub fn read_raw(&mut self) -> Result<RecordRead<'_>> {
        if self.position >= self.header.total_records {
            return Ok(RecordRead::End);
        }
        let stride = self.header.stride as usize;
        if self.buffer.len() != stride {
            self.buffer.resize(stride, 0);
        }

        let got = read_full(&mut self.reader, &mut self.buffer)?;
        if got < stride {
            return Ok(RecordRead::Partial(got));
        }
        self.position += 1;
        Ok(RecordRead::Complete(&self.buffer))
    }

    /// Read the next record, treating a short read as fatal.
    ///
    /// Used where the record count was validated up front, so a missing
    /// record means the container changed or lied about its size.
    pub fn read_expected(&mut self) -> Result<&[u8]> {
        let index = self.position;
        let stride = self.header.stride;
        match self.read_raw()? {
            RecordRead::Complete(bytes) => Ok(bytes),
            RecordRead::Partial(got) => Err(FvkitError::Truncated {
                index,
                expected: stride,
                got: got as u64,
            }),
            RecordRead::End => Err(FvkitError::Truncated {
                index,
                expected: stride,
                got: 0,
            }),
        }
    }

    /// Iterate decoded records.
    pub fn records(&mut self) -> Records<'_, R> {
        Records { reader: self }
    }

    /// Consume the reader, returning the underlying stream.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Iterator over decoded records.
///
/// A record whose own dimension field disagrees with the container's
/// declared dimension is reported as [`FvkitError::RecordDimension`].
pub struct Records<'a, R> {
    reader: &'a mut ContainerReader<R>,
}

impl<'a, R: Read> Iterator for Records<'a, R> {
    type Item = Result<VectorRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let expected = self.reader.header.dimension;
        let index = self.reader.position;
        let stride = self.reader.header.stride;
        match self.reader.read_raw() {
            Ok(RecordRead::Complete(bytes)) => Some(decode_checked(bytes, expected)),
            Ok(RecordRead::Partial(got)) => Some(Err(FvkitError::Truncated {
                index,
                expected: stride,
                got: got as u64,
            })),
            Ok(RecordRead::End) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

fn decode_checked(bytes: &[u8], expected: u32) -> Result<VectorRecord> {
    let found = read_dimension(bytes)?;
    if found != expected {
        return Err(FvkitError::RecordDimension {
            expected,
            found: found as i32,
        });
    }
    Ok(VectorRecord::new(decode_values(&bytes[DIM_FIELD_SIZE..])))
}

/// Fill `buf` from `reader`, returning fewer bytes only at end of stream.
pub(crate) fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn container(records: &[&[f32]]) -> Vec<u8> {
        let mut bytes = Vec::new();
        for values in records {
            VectorRecord::new(values.to_vec())
                .encode_into(&mut bytes)
                .unwrap();
        }
        bytes
    }

    fn reader_over(bytes: Vec<u8>) -> ContainerReader<Cursor<Vec<u8>>> {
        let len = bytes.len() as u64;
        ContainerReader::new(Cursor::new(bytes), len).unwrap()
    }

    #[test]
    fn test_records_iterate_in_order() {
        let bytes = container(&[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]);
        let mut reader = reader_over(bytes);

        let records: Vec<_> = reader.records().collect::<Result<_>>().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].values, vec![5.0, 6.0]);
        assert_eq!(reader.position(), 3);
    }

    #[test]
    fn test_trailing_bytes_not_returned() {
        let mut bytes = container(&[&[1.0], &[2.0]]);
        bytes.extend_from_slice(&[0xAA, 0xBB, 0xCC]);
        let mut reader = reader_over(bytes);

        assert!(matches!(reader.read_raw().unwrap(), RecordRead::Complete(_)));
        assert!(matches!(reader.read_raw().unwrap(), RecordRead::Complete(_)));
        assert_eq!(reader.read_raw().unwrap(), RecordRead::End);
    }

    #[test]
    fn test_seek_to_record() {
        let bytes = container(&[&[1.0], &[2.0], &[3.0]]);
        let mut reader = reader_over(bytes);

        reader.seek_to_record(2).unwrap();
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(record.values, vec![3.0]);
    }

    #[test]
    fn test_shrunk_stream_is_partial() {
        let bytes = container(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let header = ContainerHeader::parse(2i32.to_le_bytes(), 24).unwrap();
        // Header claims two records; the stream only holds one and a half.
        let mut reader = ContainerReader::with_header(Cursor::new(bytes[..18].to_vec()), header);

        assert!(reader.read_expected().is_ok());
        assert!(matches!(
            reader.read_expected(),
            Err(FvkitError::Truncated { index: 1, expected: 12, got: 6 })
        ));
    }

    #[test]
    fn test_dimension_mismatch_reported() {
        let mut bytes = container(&[&[1.0, 2.0]]);
        // Second record lies about its dimension but keeps the stride.
        bytes.extend_from_slice(&3i32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 8]);
        let mut reader = reader_over(bytes);

        let results: Vec<_> = reader.records().collect();
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(FvkitError::RecordDimension { expected: 2, found: 3 })
        ));
    }
}
