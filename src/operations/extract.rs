//! Range extraction: copy a contiguous run of records into a new container.

use super::{Diagnostic, Outcome};
use crate::error::{FvkitError, Result};
use crate::io::{ContainerHeader, ContainerReader, ContainerWriter, RecordRead};
use std::io::{Read, Seek, Write};
use std::path::Path;
use tracing::info;

/// `(offset, count)` selection of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeDescriptor {
    /// Index of the first record
    pub offset: u64,
    /// Number of records
    pub count: u64,
}

impl RangeDescriptor {
    /// Create a range of `count` records starting at `offset`.
    pub fn new(offset: u64, count: u64) -> Self {
        Self { offset, count }
    }

    /// Validate against `header` and clamp `count` to the records available.
    ///
    /// # Errors
    ///
    /// [`FvkitError::OutOfRange`] if `count` is zero or `offset` is not
    /// below the record count.
    pub fn resolve(&self, header: &ContainerHeader) -> Result<Self> {
        if self.count == 0 {
            return Err(FvkitError::out_of_range("count must be positive"));
        }
        if self.offset >= header.total_records {
            return Err(FvkitError::out_of_range(format!(
                "offset {} is beyond the last record (total {})",
                self.offset, header.total_records
            )));
        }
        Ok(Self {
            offset: self.offset,
            count: self.count.min(header.total_records - self.offset),
        })
    }
}

/// What an extraction did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractSummary {
    /// First record copied
    pub offset: u64,
    /// Count asked for by the caller
    pub requested: u64,
    /// Count after clamping to the records available
    pub clamped: u64,
    /// Records actually written
    pub written: u64,
}

/// Copy `range` from `reader` to `writer`, record by record.
///
/// A stream that ends before the clamped count is reached is not an
/// error: the records fully read are kept and a
/// [`Diagnostic::ShortRead`] reports the shortfall.
pub fn extract_records<R, W>(
    reader: &mut ContainerReader<R>,
    range: RangeDescriptor,
    writer: &mut ContainerWriter<W>,
) -> Result<Outcome<ExtractSummary>>
where
    R: Read + Seek,
    W: Write,
{
    let header = *reader.header();
    let resolved = range.resolve(&header)?;
    let mut diagnostics: Vec<Diagnostic> = header.size_diagnostic().into_iter().collect();

    reader.seek_to_record(resolved.offset)?;
    let mut written = 0;
    while written < resolved.count {
        match reader.read_raw()? {
            RecordRead::Complete(bytes) => writer.write_raw(bytes)?,
            RecordRead::Partial(_) | RecordRead::End => break,
        }
        written += 1;
    }

    if written < resolved.count {
        diagnostics.push(Diagnostic::ShortRead {
            requested: resolved.count,
            written,
        });
    }

    Ok(Outcome::with_diagnostics(
        ExtractSummary {
            offset: resolved.offset,
            requested: range.count,
            clamped: resolved.count,
            written,
        },
        diagnostics,
    ))
}

/// Extract `count` records starting at `offset` from `input` into `output`.
///
/// The input is validated before `output` is created; `output` is replaced
/// atomically and may be the same path as `input`.
///
/// # Example
///
/// ```no_run
/// # fn main() -> fvkit::Result<()> {
/// // Records 300000..302000 of a base file become a query file.
/// let outcome = fvkit::extract("base.fvecs", "query.fvecs", 300_000, 2_000)?;
/// println!("wrote {} records", outcome.value.written);
/// # Ok(())
/// # }
/// ```
pub fn extract<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    offset: u64,
    count: u64,
) -> Result<Outcome<ExtractSummary>> {
    let mut reader = ContainerReader::from_path(input.as_ref())?;
    let range = RangeDescriptor::new(offset, count);
    range.resolve(reader.header())?;

    let mut writer = ContainerWriter::create(output.as_ref())?;
    let outcome = extract_records(&mut reader, range, &mut writer)?;
    writer.finish()?.commit()?;

    let summary = &outcome.value;
    info!(
        input = %input.as_ref().display(),
        output = %output.as_ref().display(),
        offset = summary.offset,
        written = summary.written,
        "extracted records"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::VectorRecord;
    use std::io::Cursor;

    fn container(n: usize, dim: usize) -> Vec<u8> {
        let mut bytes = Vec::new();
        for i in 0..n {
            VectorRecord::new((0..dim).map(|j| (i * dim + j) as f32).collect())
                .encode_into(&mut bytes)
                .unwrap();
        }
        bytes
    }

    fn run(bytes: &[u8], range: RangeDescriptor) -> Result<(Vec<u8>, Outcome<ExtractSummary>)> {
        let mut reader = ContainerReader::new(Cursor::new(bytes.to_vec()), bytes.len() as u64)?;
        let mut writer = ContainerWriter::new(Vec::new());
        let outcome = extract_records(&mut reader, range, &mut writer)?;
        Ok((writer.finish()?, outcome))
    }

    #[test]
    fn test_extract_middle_range() {
        let bytes = container(10, 4);
        assert_eq!(bytes.len(), 200);

        let (out, outcome) = run(&bytes, RangeDescriptor::new(5, 3)).unwrap();
        assert_eq!(out.len(), 60);
        assert_eq!(&out[..], &bytes[100..160]);
        assert_eq!(outcome.value.written, 3);
        assert!(!outcome.has_diagnostics());
    }

    #[test]
    fn test_count_is_clamped() {
        let bytes = container(10, 4);
        let (out, outcome) = run(&bytes, RangeDescriptor::new(8, 50)).unwrap();
        assert_eq!(&out[..], &bytes[160..]);
        assert_eq!(outcome.value.requested, 50);
        assert_eq!(outcome.value.clamped, 2);
        assert_eq!(outcome.value.written, 2);
    }

    #[test]
    fn test_offset_past_end() {
        let bytes = container(10, 4);
        assert!(matches!(
            run(&bytes, RangeDescriptor::new(10, 1)),
            Err(FvkitError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_zero_count() {
        let bytes = container(3, 2);
        assert!(matches!(
            run(&bytes, RangeDescriptor::new(0, 0)),
            Err(FvkitError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_short_read_keeps_complete_records() {
        let bytes = container(10, 4);
        let header = ContainerHeader::parse(4i32.to_le_bytes(), 200).unwrap();
        // Stream holds 7.5 records while the header promises 10.
        let mut reader = ContainerReader::with_header(Cursor::new(bytes[..150].to_vec()), header);
        let mut writer = ContainerWriter::new(Vec::new());

        let outcome = extract_records(&mut reader, RangeDescriptor::new(5, 5), &mut writer).unwrap();
        let out = writer.finish().unwrap();

        assert_eq!(outcome.value.written, 2);
        assert_eq!(&out[..], &bytes[100..140]);
        assert_eq!(
            outcome.diagnostics,
            vec![Diagnostic::ShortRead {
                requested: 5,
                written: 2
            }]
        );
    }

    #[test]
    fn test_trailing_bytes_reported() {
        let mut bytes = container(3, 2);
        bytes.push(0xFF);
        let (out, outcome) = run(&bytes, RangeDescriptor::new(0, 3)).unwrap();
        assert_eq!(&out[..], &bytes[..36]);
        assert!(matches!(
            outcome.diagnostics[0],
            Diagnostic::TrailingBytes { trailing: 1, .. }
        ));
    }
}
