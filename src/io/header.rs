//! Container header validation.
//!
//! The vector-container format has no header block of its own: the
//! dimension field of the first record doubles as the container's declared
//! dimension, and the record count is derived from the byte length.

use crate::error::{FvkitError, Result};
use crate::operations::Diagnostic;
use crate::record::{record_stride, DIM_FIELD_SIZE};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use tracing::debug;

/// Geometry of a container derived from its first dimension field and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Declared dimension (from the first record)
    pub dimension: u32,
    /// Bytes per record, `4 + 4 * dimension`
    pub stride: u64,
    /// Total byte length of the container
    pub byte_len: u64,
    /// Number of complete records, `byte_len / stride`
    pub total_records: u64,
    /// Bytes past the last complete record, `byte_len % stride`
    pub trailing_bytes: u64,
}

impl ContainerHeader {
    /// Validate a container from its first four bytes and its byte length.
    ///
    /// Pure: performs no I/O.
    ///
    /// # Errors
    ///
    /// - [`FvkitError::TooSmall`] if `byte_len < 4`
    /// - [`FvkitError::InvalidDimension`] if the dimension is not positive
    pub fn parse(prefix: [u8; DIM_FIELD_SIZE], byte_len: u64) -> Result<Self> {
        if byte_len < DIM_FIELD_SIZE as u64 {
            return Err(FvkitError::TooSmall { byte_len });
        }
        let dim = i32::from_le_bytes(prefix);
        if dim <= 0 {
            return Err(FvkitError::InvalidDimension { dim });
        }

        let dimension = dim as u32;
        let stride = record_stride(dimension);
        Ok(Self {
            dimension,
            stride,
            byte_len,
            total_records: byte_len / stride,
            trailing_bytes: byte_len % stride,
        })
    }

    /// Read the header from a reader positioned at the start of a container.
    ///
    /// `byte_len` is the container's total length (file size or buffer
    /// length). The reader is rewound to the start before returning.
    pub fn read<R: Read + Seek>(reader: &mut R, byte_len: u64) -> Result<Self> {
        if byte_len < DIM_FIELD_SIZE as u64 {
            return Err(FvkitError::TooSmall { byte_len });
        }
        let mut prefix = [0u8; DIM_FIELD_SIZE];
        reader.read_exact(&mut prefix)?;
        reader.seek(SeekFrom::Start(0))?;

        let header = Self::parse(prefix, byte_len)?;
        debug!(
            dimension = header.dimension,
            stride = header.stride,
            total_records = header.total_records,
            trailing_bytes = header.trailing_bytes,
            "read container header"
        );
        Ok(header)
    }

    /// Open `path`, validate its header, and return the file rewound to 0.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<(File, Self)> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| FvkitError::open(path, e))?;
        let byte_len = file
            .metadata()
            .map_err(|e| FvkitError::open(path, e))?
            .len();
        let header = Self::read(&mut file, byte_len)?;
        Ok((file, header))
    }

    /// Read only the header of the container at `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open(path).map(|(_, header)| header)
    }

    /// Whether the byte length is an exact multiple of the stride.
    pub fn is_aligned(&self) -> bool {
        self.trailing_bytes == 0
    }

    /// Byte position of record `index`.
    pub fn record_offset(&self, index: u64) -> u64 {
        index * self.stride
    }

    /// Number of pairs when read as a paired container.
    ///
    /// # Errors
    ///
    /// [`FvkitError::OddRecordCount`] if the record count is odd.
    pub fn pair_count(&self) -> Result<u64> {
        if self.total_records % 2 != 0 {
            return Err(FvkitError::OddRecordCount {
                total: self.total_records,
            });
        }
        Ok(self.total_records / 2)
    }

    /// Trailing-bytes anomaly, if any.
    pub fn size_diagnostic(&self) -> Option<Diagnostic> {
        (!self.is_aligned()).then_some(Diagnostic::TrailingBytes {
            byte_len: self.byte_len,
            stride: self.stride,
            trailing: self.trailing_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_geometry() {
        let header = ContainerHeader::parse(4i32.to_le_bytes(), 200).unwrap();
        assert_eq!(header.dimension, 4);
        assert_eq!(header.stride, 20);
        assert_eq!(header.total_records, 10);
        assert!(header.is_aligned());
        assert!(header.size_diagnostic().is_none());
        assert_eq!(header.record_offset(5), 100);
    }

    #[test]
    fn test_trailing_bytes_are_soft() {
        let header = ContainerHeader::parse(4i32.to_le_bytes(), 207).unwrap();
        assert_eq!(header.total_records, 10);
        assert_eq!(header.trailing_bytes, 7);
        assert_eq!(
            header.size_diagnostic(),
            Some(Diagnostic::TrailingBytes {
                byte_len: 207,
                stride: 20,
                trailing: 7
            })
        );
    }

    #[test]
    fn test_too_small() {
        let mut cursor = Cursor::new(vec![4u8, 0, 0]);
        assert!(matches!(
            ContainerHeader::read(&mut cursor, 3),
            Err(FvkitError::TooSmall { byte_len: 3 })
        ));
    }

    #[test]
    fn test_zero_dimension() {
        let mut cursor = Cursor::new(vec![0u8; 16]);
        assert!(matches!(
            ContainerHeader::read(&mut cursor, 16),
            Err(FvkitError::InvalidDimension { dim: 0 })
        ));
    }

    #[test]
    fn test_read_rewinds() {
        let mut bytes = 1i32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&0.5f32.to_le_bytes());
        let mut cursor = Cursor::new(bytes);

        let header = ContainerHeader::read(&mut cursor, 8).unwrap();
        assert_eq!(header.total_records, 1);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_pair_count() {
        let even = ContainerHeader::parse(2i32.to_le_bytes(), 72).unwrap();
        assert_eq!(even.pair_count().unwrap(), 3);

        let odd = ContainerHeader::parse(2i32.to_le_bytes(), 60).unwrap();
        assert!(matches!(
            odd.pair_count(),
            Err(FvkitError::OddRecordCount { total: 5 })
        ));
    }
}
