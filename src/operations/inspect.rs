//! Read-only container inspection.
//!
//! Reports the container geometry and previews the first few records. Per
//! record anomalies (dimension field disagreeing with the declared
//! dimension, truncated record) are flagged without failing.

use super::{Diagnostic, Outcome};
use crate::error::Result;
use crate::io::{ContainerHeader, ContainerReader, RecordRead};
use crate::record::{decode_values, DIM_FIELD_SIZE};
use std::fmt;
use std::io::Read;
use std::path::Path;

/// Records previewed when the caller does not say otherwise.
pub const DEFAULT_PREVIEW_COUNT: u64 = 5;

/// Values shown per previewed record.
pub const PREVIEW_WIDTH: usize = 8;

/// Leading values of one record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPreview {
    /// Record index
    pub index: u64,
    /// Dimension field of this record as stored
    pub dimension: i32,
    /// First [`PREVIEW_WIDTH`] values
    pub values: Vec<f32>,
    /// Whether the record has more values than shown
    pub elided: bool,
}

/// Result of [`inspect`].
#[derive(Debug, Clone, PartialEq)]
pub struct InspectReport {
    /// Inspected source (path or caller-supplied label)
    pub source: String,
    /// Declared geometry
    pub header: ContainerHeader,
    /// Previews of the leading records
    pub previews: Vec<RecordPreview>,
}

/// Walk the first `preview_count` records (clamped to the record count).
///
/// The walk stops at the first record that cannot be fully read.
pub fn inspect_stream<R: Read>(
    reader: &mut ContainerReader<R>,
    source: impl Into<String>,
    preview_count: u64,
) -> Result<Outcome<InspectReport>> {
    let header = *reader.header();
    let mut diagnostics: Vec<Diagnostic> = header.size_diagnostic().into_iter().collect();
    let mut previews = Vec::new();

    for index in 0..preview_count.min(header.total_records) {
        let bytes = match reader.read_raw()? {
            RecordRead::Complete(bytes) => bytes,
            RecordRead::Partial(_) | RecordRead::End => {
                diagnostics.push(Diagnostic::TruncatedRecord { index });
                break;
            }
        };

        let dimension = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if dimension != header.dimension as i32 {
            diagnostics.push(Diagnostic::DimensionMismatch {
                index,
                found: dimension,
                expected: header.dimension,
            });
        }

        let shown = PREVIEW_WIDTH.min(header.dimension as usize);
        let end = DIM_FIELD_SIZE + shown * 4;
        previews.push(RecordPreview {
            index,
            dimension,
            values: decode_values(&bytes[DIM_FIELD_SIZE..end]),
            elided: shown < header.dimension as usize,
        });
    }

    let report = InspectReport {
        source: source.into(),
        header,
        previews,
    };
    Ok(Outcome::with_diagnostics(report, diagnostics))
}

/// Inspect the container at `path`, previewing `preview_count` records.
///
/// # Example
///
/// ```no_run
/// # fn main() -> fvkit::Result<()> {
/// let outcome = fvkit::inspect("base.fvecs", fvkit::DEFAULT_PREVIEW_COUNT)?;
/// println!("{}", outcome.value);
/// # Ok(())
/// # }
/// ```
pub fn inspect<P: AsRef<Path>>(path: P, preview_count: u64) -> Result<Outcome<InspectReport>> {
    let path = path.as_ref();
    let mut reader = ContainerReader::from_path(path)?;
    inspect_stream(&mut reader, path.display().to_string(), preview_count)
}

impl fmt::Display for RecordPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vec[{}] = [", self.index)?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.4}", value)?;
        }
        if self.elided {
            write!(f, ", ...")?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "file: {}", self.source)?;
        writeln!(f, "dimension: {}", self.header.dimension)?;
        writeln!(f, "stride: {} bytes", self.header.stride)?;
        writeln!(f, "size: {} bytes", self.header.byte_len)?;
        writeln!(f, "records: {}", self.header.total_records)?;

        if !self.previews.is_empty() {
            writeln!(f)?;
            writeln!(f, "first {} records:", self.previews.len())?;
            for preview in &self.previews {
                writeln!(f, "{}", preview)?;
            }
        }
        Ok(())
    }
}

/// The report followed by the anomalies found while walking it.
impl fmt::Display for Outcome<InspectReport> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        if self.has_diagnostics() {
            writeln!(f)?;
            writeln!(f, "anomalies:")?;
            for diagnostic in &self.diagnostics {
                writeln!(f, "  - {}", diagnostic)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FvkitError;
    use crate::record::VectorRecord;
    use std::io::Cursor;

    fn reader(bytes: Vec<u8>) -> ContainerReader<Cursor<Vec<u8>>> {
        let len = bytes.len() as u64;
        ContainerReader::new(Cursor::new(bytes), len).unwrap()
    }

    #[test]
    fn test_preview_is_clamped() {
        let mut bytes = Vec::new();
        for i in 0..3 {
            VectorRecord::new(vec![i as f32; 2]).encode_into(&mut bytes).unwrap();
        }

        let outcome = inspect_stream(&mut reader(bytes), "mem", 5).unwrap();
        assert!(outcome.diagnostics.is_empty());
        let report = outcome.value;
        assert_eq!(report.previews.len(), 3);
        assert_eq!(report.previews[2].values, vec![2.0, 2.0]);
        assert!(!report.previews[2].elided);
    }

    #[test]
    fn test_wide_records_are_elided() {
        let values: Vec<f32> = (0..12).map(|v| v as f32 * 0.5).collect();
        let bytes = VectorRecord::new(values).to_bytes().unwrap();

        let report = inspect_stream(&mut reader(bytes), "mem", 5).unwrap().value;
        let preview = &report.previews[0];
        assert_eq!(preview.values.len(), PREVIEW_WIDTH);
        assert!(preview.elided);
        assert_eq!(
            preview.to_string(),
            "vec[0] = [0.0000, 0.5000, 1.0000, 1.5000, 2.0000, 2.5000, 3.0000, 3.5000, ...]"
        );
    }

    #[test]
    fn test_dimension_mismatch_flagged() {
        let mut bytes = VectorRecord::new(vec![1.0, 2.0]).to_bytes().unwrap();
        bytes.extend_from_slice(&7i32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 8]);

        let outcome = inspect_stream(&mut reader(bytes), "mem", 5).unwrap();
        assert_eq!(outcome.value.previews.len(), 2);
        assert_eq!(
            outcome.diagnostics,
            vec![Diagnostic::DimensionMismatch {
                index: 1,
                found: 7,
                expected: 2
            }]
        );
    }

    #[test]
    fn test_truncated_record_stops_walk() {
        let mut bytes = Vec::new();
        for _ in 0..3 {
            VectorRecord::new(vec![1.0, 2.0]).encode_into(&mut bytes).unwrap();
        }
        let header = ContainerHeader::parse(2i32.to_le_bytes(), 36).unwrap();
        let mut short = ContainerReader::with_header(Cursor::new(bytes[..30].to_vec()), header);

        let outcome = inspect_stream(&mut short, "mem", 5).unwrap();
        assert_eq!(outcome.value.previews.len(), 2);
        assert_eq!(outcome.diagnostics, vec![Diagnostic::TruncatedRecord { index: 2 }]);
    }

    #[test]
    fn test_report_display() {
        let bytes = VectorRecord::new(vec![0.25]).to_bytes().unwrap();
        let report = inspect_stream(&mut reader(bytes), "one.fvecs", 5).unwrap().value;
        let text = report.to_string();
        assert!(text.contains("file: one.fvecs"));
        assert!(text.contains("dimension: 1"));
        assert!(text.contains("records: 1"));
        assert!(text.contains("vec[0] = [0.2500]"));
    }

    #[test]
    fn test_anomalies_listed_once_after_report() {
        let mut bytes = VectorRecord::new(vec![1.0, 2.0]).to_bytes().unwrap();
        bytes.extend_from_slice(&[9, 9]);

        let outcome = inspect_stream(&mut reader(bytes), "mem", 5).unwrap();
        assert!(!outcome.value.to_string().contains("anomalies:"));

        let text = outcome.to_string();
        assert_eq!(text.matches("anomalies:").count(), 1);
        assert!(text.contains("2 trailing bytes"));
        assert!(text.find("vec[0]").unwrap() < text.find("anomalies:").unwrap());
    }

    #[test]
    fn test_flagged_dimension_matches_reader_error() {
        let mut bytes = VectorRecord::new(vec![1.0, 2.0]).to_bytes().unwrap();
        bytes.extend_from_slice(&1i32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 8]);

        let outcome = inspect_stream(&mut reader(bytes.clone()), "mem", 5).unwrap();
        let err = reader(bytes).records().nth(1).unwrap().unwrap_err();
        match (&outcome.diagnostics[0], err) {
            (
                Diagnostic::DimensionMismatch { found: flagged, .. },
                FvkitError::RecordDimension { found, .. },
            ) => assert_eq!(*flagged, found),
            other => panic!("unexpected {:?}", other),
        }
    }
}
