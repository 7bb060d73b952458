//! Splitting containers, flat or pair-aware, and merging pairs back.
//!
//! # Pair layout
//!
//! A paired container holds `2n` records: the s-sequence `s_0..s_{n-1}`
//! followed by the e-sequence `e_0..e_{n-1}`, where `s_i` and `e_i` form
//! pair `i`. Splitting at pair `x` produces two paired containers:
//!
//! ```text
//! input:   s_0 .. s_{x-1} s_x .. s_{n-1} | e_0 .. e_{x-1} e_x .. e_{n-1}
//! output1: s_0 .. s_{x-1}                | e_0 .. e_{x-1}
//! output2:                s_x .. s_{n-1} |                e_x .. e_{n-1}
//! ```
//!
//! [`merge_pairs`] is the inverse: `s(a) ++ s(b) ++ e(a) ++ e(b)`.

use super::Outcome;
use crate::error::{FvkitError, Result};
use crate::io::{resolve_target, ContainerHeader, ContainerReader, ContainerWriter, StagedFile};
use std::io::{Read, Seek, Write};
use std::path::Path;
use tracing::info;

/// What a split did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitSummary {
    /// Container dimension
    pub dimension: u32,
    /// Records written to the first output
    pub first_records: u64,
    /// Records written to the second output
    pub second_records: u64,
}

/// What a pair merge did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeSummary {
    /// Container dimension
    pub dimension: u32,
    /// Pairs taken from the first input
    pub first_pairs: u64,
    /// Pairs taken from the second input
    pub second_pairs: u64,
}

impl MergeSummary {
    /// Records in the merged container.
    pub fn total_records(&self) -> u64 {
        2 * (self.first_pairs + self.second_pairs)
    }
}

fn check_split_point(header: &ContainerHeader, x: u64) -> Result<()> {
    if x == 0 || x >= header.total_records {
        return Err(FvkitError::out_of_range(format!(
            "split point {} must be in (0, {})",
            x, header.total_records
        )));
    }
    Ok(())
}

/// Returns the pair count `n` once `x <= n` holds.
fn check_pair_split(header: &ContainerHeader, x: u64) -> Result<u64> {
    let n = header.pair_count()?;
    if x > n {
        return Err(FvkitError::out_of_range(format!(
            "pair split point {} exceeds pair count {}",
            x, n
        )));
    }
    Ok(n)
}

/// Outputs must name different files once their directories are resolved.
fn check_distinct(first: &Path, second: &Path) -> Result<()> {
    if resolve_target(first)? == resolve_target(second)? {
        return Err(FvkitError::ConflictingOutputs {
            path: first.to_path_buf(),
        });
    }
    Ok(())
}

/// Promote both staged outputs. An output that replaces `input` goes last,
/// so a failed rename of the other one leaves the input intact.
fn commit_both(input: &Path, first: StagedFile, second: StagedFile) -> Result<()> {
    let input = resolve_target(input)?;
    let (early, late) = if resolve_target(first.target())? == input {
        (second, first)
    } else {
        (first, second)
    };
    early.commit()?;
    late.commit()
}

/// Route records `[0, x)` to `first` and `[x, total)` to `rest`.
///
/// `reader` must be positioned at record 0. Requires `0 < x < total`.
pub fn split_stream<R, W1, W2>(
    reader: &mut ContainerReader<R>,
    x: u64,
    first: &mut ContainerWriter<W1>,
    rest: &mut ContainerWriter<W2>,
) -> Result<Outcome<SplitSummary>>
where
    R: Read,
    W1: Write,
    W2: Write,
{
    let header = *reader.header();
    check_split_point(&header, x)?;

    for index in 0..header.total_records {
        let bytes = reader.read_expected()?;
        if index < x {
            first.write_raw(bytes)?;
        } else {
            rest.write_raw(bytes)?;
        }
    }

    Ok(Outcome::with_diagnostics(
        SplitSummary {
            dimension: header.dimension,
            first_records: first.records_written(),
            second_records: rest.records_written(),
        },
        header.size_diagnostic().into_iter().collect(),
    ))
}

/// Split a paired container at pair `x`, keeping each pair together.
///
/// `reader` must be positioned at record 0. Requires an even record count
/// and `0 <= x <= n`; either output may end up empty.
pub fn split_pairs_stream<R, W1, W2>(
    reader: &mut ContainerReader<R>,
    x: u64,
    out1: &mut ContainerWriter<W1>,
    out2: &mut ContainerWriter<W2>,
) -> Result<Outcome<SplitSummary>>
where
    R: Read,
    W1: Write,
    W2: Write,
{
    let header = *reader.header();
    let n = check_pair_split(&header, x)?;

    // s-sequence, then e-sequence, same threshold on the relative index
    for _ in 0..2 {
        for k in 0..n {
            let bytes = reader.read_expected()?;
            if k < x {
                out1.write_raw(bytes)?;
            } else {
                out2.write_raw(bytes)?;
            }
        }
    }

    Ok(Outcome::with_diagnostics(
        SplitSummary {
            dimension: header.dimension,
            first_records: out1.records_written(),
            second_records: out2.records_written(),
        },
        header.size_diagnostic().into_iter().collect(),
    ))
}

/// Merge two paired containers into `s(a) ++ s(b) ++ e(a) ++ e(b)`.
pub fn merge_pairs_streams<A, B, W>(
    first: &mut ContainerReader<A>,
    second: &mut ContainerReader<B>,
    out: &mut ContainerWriter<W>,
) -> Result<Outcome<MergeSummary>>
where
    A: Read + Seek,
    B: Read + Seek,
    W: Write,
{
    let (h1, h2) = (*first.header(), *second.header());
    if h1.dimension != h2.dimension {
        return Err(FvkitError::DimensionMismatch {
            first: h1.dimension,
            second: h2.dimension,
        });
    }
    let n1 = h1.pair_count()?;
    let n2 = h2.pair_count()?;

    copy_records(first, 0, n1, out)?;
    copy_records(second, 0, n2, out)?;
    copy_records(first, n1, n1, out)?;
    copy_records(second, n2, n2, out)?;

    let diagnostics = [h1.size_diagnostic(), h2.size_diagnostic()]
        .into_iter()
        .flatten()
        .collect();
    Ok(Outcome::with_diagnostics(
        MergeSummary {
            dimension: h1.dimension,
            first_pairs: n1,
            second_pairs: n2,
        },
        diagnostics,
    ))
}

fn copy_records<R: Read + Seek, W: Write>(
    reader: &mut ContainerReader<R>,
    start: u64,
    count: u64,
    out: &mut ContainerWriter<W>,
) -> Result<()> {
    reader.seek_to_record(start)?;
    for _ in 0..count {
        let bytes = reader.read_expected()?;
        out.write_raw(bytes)?;
    }
    Ok(())
}

/// Split `input` into its first `x` records and the remaining ones.
///
/// Requires `0 < x < total_records`. Both outputs are staged and promoted
/// only after the whole input was read.
pub fn split<P, Q, O>(input: P, out_first: Q, out_rest: O, x: u64) -> Result<Outcome<SplitSummary>>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    O: AsRef<Path>,
{
    let (out_first, out_rest) = (out_first.as_ref(), out_rest.as_ref());
    check_distinct(out_first, out_rest)?;
    let mut reader = ContainerReader::from_path(input.as_ref())?;
    check_split_point(reader.header(), x)?;

    let mut first = ContainerWriter::create(out_first)?;
    let mut rest = ContainerWriter::create(out_rest)?;
    let outcome = split_stream(&mut reader, x, &mut first, &mut rest)?;
    commit_both(input.as_ref(), first.finish()?, rest.finish()?)?;

    info!(
        input = %input.as_ref().display(),
        first = outcome.value.first_records,
        rest = outcome.value.second_records,
        "split container"
    );
    Ok(outcome)
}

/// Split a paired container at pair `x`.
///
/// `out1` receives pairs `0..x` and `out2` pairs `x..n`, each as a valid
/// paired container (s-records first, then their e-records).
///
/// # Example
///
/// ```no_run
/// # fn main() -> fvkit::Result<()> {
/// // Keep 90000 pairs for the base index, the rest become inserts.
/// let outcome = fvkit::split_pairs("total.fvecs", "base.fvecs", "insert.fvecs", 90_000)?;
/// assert_eq!(outcome.value.first_records, 180_000);
/// # Ok(())
/// # }
/// ```
pub fn split_pairs<P, Q, O>(input: P, out1: Q, out2: O, x: u64) -> Result<Outcome<SplitSummary>>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    O: AsRef<Path>,
{
    let (out1, out2) = (out1.as_ref(), out2.as_ref());
    check_distinct(out1, out2)?;
    let mut reader = ContainerReader::from_path(input.as_ref())?;
    let n = check_pair_split(reader.header(), x)?;

    let mut w1 = ContainerWriter::create(out1)?;
    let mut w2 = ContainerWriter::create(out2)?;
    let outcome = split_pairs_stream(&mut reader, x, &mut w1, &mut w2)?;
    commit_both(input.as_ref(), w1.finish()?, w2.finish()?)?;

    info!(
        input = %input.as_ref().display(),
        pairs = n,
        first_pairs = x,
        second_pairs = n - x,
        "split paired container"
    );
    Ok(outcome)
}

/// Merge two paired containers, the inverse of [`split_pairs`].
///
/// The output is staged, so it may be one of the inputs.
pub fn merge_pairs<P, Q, O>(first: P, second: Q, output: O) -> Result<Outcome<MergeSummary>>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    O: AsRef<Path>,
{
    let mut a = ContainerReader::from_path(first.as_ref())?;
    let mut b = ContainerReader::from_path(second.as_ref())?;
    let (h1, h2) = (*a.header(), *b.header());
    if h1.dimension != h2.dimension {
        return Err(FvkitError::DimensionMismatch {
            first: h1.dimension,
            second: h2.dimension,
        });
    }
    h1.pair_count()?;
    h2.pair_count()?;

    let mut writer = ContainerWriter::create(output.as_ref())?;
    let outcome = merge_pairs_streams(&mut a, &mut b, &mut writer)?;
    writer.finish()?.commit()?;

    info!(
        output = %output.as_ref().display(),
        pairs = outcome.value.first_pairs + outcome.value.second_pairs,
        "merged paired containers"
    );
    Ok(outcome)
}
