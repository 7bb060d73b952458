//! Concatenation: append one container's bytes after another's.

use super::Outcome;
use crate::error::{FvkitError, Result};
use crate::io::{ContainerHeader, ContainerReader, StagedFile};
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

/// Chunk size used when copying container bytes (1 MiB).
pub const COPY_CHUNK_SIZE: usize = 1 << 20;

/// What a concatenation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcatSummary {
    /// Shared dimension of both inputs
    pub dimension: u32,
    /// Complete records in the first input
    pub first_records: u64,
    /// Complete records in the second input
    pub second_records: u64,
    /// Total bytes written
    pub bytes_written: u64,
}

/// Write all bytes of `first` followed by all bytes of `second` to `out`.
///
/// Both readers must be positioned at the start of their containers. Bytes
/// are copied in chunks of [`COPY_CHUNK_SIZE`], so memory use does not
/// depend on container size.
///
/// # Errors
///
/// - [`FvkitError::DimensionMismatch`] if the declared dimensions differ
///   (checked before anything is written)
/// - [`FvkitError::Truncated`] if an input yields fewer bytes than its
///   validated length
pub fn concat_streams<A, B, W>(
    first: ContainerReader<A>,
    second: ContainerReader<B>,
    out: &mut W,
) -> Result<Outcome<ConcatSummary>>
where
    A: Read,
    B: Read,
    W: Write,
{
    let first_header = *first.header();
    let second_header = *second.header();
    if first_header.dimension != second_header.dimension {
        return Err(FvkitError::DimensionMismatch {
            first: first_header.dimension,
            second: second_header.dimension,
        });
    }
    let diagnostics = [first_header.size_diagnostic(), second_header.size_diagnostic()]
        .into_iter()
        .flatten()
        .collect();

    let mut chunk = vec![0u8; COPY_CHUNK_SIZE];
    let mut bytes_written = copy_container(first.into_inner(), &first_header, out, &mut chunk)?;
    bytes_written += copy_container(second.into_inner(), &second_header, out, &mut chunk)?;

    Ok(Outcome::with_diagnostics(
        ConcatSummary {
            dimension: first_header.dimension,
            first_records: first_header.total_records,
            second_records: second_header.total_records,
            bytes_written,
        },
        diagnostics,
    ))
}

/// Copy exactly `header.byte_len` bytes from `reader` to `out`.
fn copy_container<R: Read, W: Write>(
    reader: R,
    header: &ContainerHeader,
    out: &mut W,
    chunk: &mut [u8],
) -> Result<u64> {
    let mut limited = reader.take(header.byte_len);
    let mut copied = 0u64;
    loop {
        let n = match limited.read(chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        out.write_all(&chunk[..n])?;
        copied += n as u64;
    }

    if copied < header.byte_len {
        return Err(FvkitError::Truncated {
            index: copied / header.stride,
            expected: header.stride,
            got: copied % header.stride,
        });
    }
    Ok(copied)
}

/// Concatenate `first` and `second` into `output`.
///
/// The output is staged and renamed into place only after both inputs were
/// copied completely, so `output` may be `first` or `second`; on failure it
/// is left untouched and the staging file is removed.
///
/// # Example
///
/// ```no_run
/// # fn main() -> fvkit::Result<()> {
/// // Append new vectors to the base file in place.
/// fvkit::concat("base.fvecs", "new.fvecs", "base.fvecs")?;
/// # Ok(())
/// # }
/// ```
pub fn concat<P, Q, O>(first: P, second: Q, output: O) -> Result<Outcome<ConcatSummary>>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    O: AsRef<Path>,
{
    let first_reader = ContainerReader::from_path(first.as_ref())?;
    let second_reader = ContainerReader::from_path(second.as_ref())?;
    let (d1, d2) = (
        first_reader.header().dimension,
        second_reader.header().dimension,
    );
    if d1 != d2 {
        return Err(FvkitError::DimensionMismatch {
            first: d1,
            second: d2,
        });
    }

    let mut staged = StagedFile::create(output.as_ref())?;
    let outcome = concat_streams(first_reader, second_reader, &mut staged)?;
    staged.commit()?;

    info!(
        first = %first.as_ref().display(),
        second = %second.as_ref().display(),
        output = %output.as_ref().display(),
        records = outcome.value.first_records + outcome.value.second_records,
        bytes = outcome.value.bytes_written,
        "concatenated containers"
    );
    Ok(outcome)
}
