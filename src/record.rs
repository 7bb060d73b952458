//! Vector record type and its on-disk encoding.
//!
//! # Binary Layout
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 4 | d: dimension, `i32` little-endian |
//! | 4 | 4*d | values: `[f32; d]` little-endian |
//!
//! Records are stored back to back with no padding, so every record of a
//! container with dimension `d` occupies exactly `4 + 4*d` bytes.

use crate::error::{FvkitError, Result};

/// Size of the dimension field in bytes.
pub const DIM_FIELD_SIZE: usize = 4;

/// Size of one encoded value in bytes.
pub const VALUE_SIZE: usize = 4;

/// Bytes occupied by one record of the given dimension.
#[inline]
pub fn record_stride(dimension: u32) -> u64 {
    DIM_FIELD_SIZE as u64 + VALUE_SIZE as u64 * dimension as u64
}

/// One vector: a dimension prefix followed by that many `f32` values.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorRecord {
    /// Vector components
    pub values: Vec<f32>,
}

impl VectorRecord {
    /// Create a record from its values.
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Number of values in the record.
    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    /// Encoded size in bytes.
    pub fn encoded_len(&self) -> usize {
        DIM_FIELD_SIZE + VALUE_SIZE * self.values.len()
    }

    /// Append the encoded record to `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`FvkitError::InvalidDimension`] for an empty record or one
    /// whose length does not fit the `i32` dimension field.
    pub fn encode_into(&self, buf: &mut Vec<u8>) -> Result<()> {
        let dim = i32::try_from(self.values.len())
            .ok()
            .filter(|d| *d > 0)
            .ok_or(FvkitError::InvalidDimension {
                dim: self.values.len().min(i32::MAX as usize) as i32,
            })?;

        buf.reserve(self.encoded_len());
        buf.extend_from_slice(&dim.to_le_bytes());
        for value in &self.values {
            buf.extend_from_slice(&value.to_le_bytes());
        }
        Ok(())
    }

    /// Encode into a fresh buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut buf)?;
        Ok(buf)
    }

    /// Decode a record from exactly one encoded record.
    ///
    /// # Errors
    ///
    /// - [`FvkitError::TooSmall`] if the dimension field is missing
    /// - [`FvkitError::InvalidDimension`] if it is not positive
    /// - [`FvkitError::Truncated`] if `bytes` is shorter than the stride the
    ///   dimension field declares
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let dim = read_dimension(bytes)?;
        let expected = record_stride(dim);
        if (bytes.len() as u64) < expected {
            return Err(FvkitError::Truncated {
                index: 0,
                expected,
                got: bytes.len() as u64,
            });
        }
        Ok(Self {
            values: decode_values(&bytes[DIM_FIELD_SIZE..expected as usize]),
        })
    }
}

/// Read and validate the dimension prefix at the start of `bytes`.
pub(crate) fn read_dimension(bytes: &[u8]) -> Result<u32> {
    let prefix: [u8; DIM_FIELD_SIZE] = bytes
        .get(..DIM_FIELD_SIZE)
        .and_then(|b| b.try_into().ok())
        .ok_or(FvkitError::TooSmall {
            byte_len: bytes.len() as u64,
        })?;
    let dim = i32::from_le_bytes(prefix);
    if dim <= 0 {
        return Err(FvkitError::InvalidDimension { dim });
    }
    Ok(dim as u32)
}

/// Decode little-endian `f32`s; a trailing partial value is ignored.
pub(crate) fn decode_values(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(VALUE_SIZE)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}
