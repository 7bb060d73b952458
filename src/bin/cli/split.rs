//! Split and merge commands

use super::{report, sweep_outputs};
use clap::Args;
use std::path::PathBuf;

/// Arguments for `fvkit split`
#[derive(Args)]
pub struct SplitArgs {
    /// Source container
    pub input: PathBuf,
    /// Receives records [0, X)
    pub out_first: PathBuf,
    /// Receives records [X, total)
    pub out_rest: PathBuf,
    /// Split point, 0 < X < total records
    pub x: u64,
}

/// Arguments for `fvkit split-pairs`
#[derive(Args)]
pub struct SplitPairsArgs {
    /// Paired source container (2n records: n s-records, then n e-records)
    pub input: PathBuf,
    /// Receives pairs [0, X)
    pub output1: PathBuf,
    /// Receives pairs [X, n)
    pub output2: PathBuf,
    /// Pair split point, 0 <= X <= n
    pub x: u64,
}

/// Arguments for `fvkit merge-pairs`
#[derive(Args)]
pub struct MergePairsArgs {
    /// Paired container whose pairs come first
    pub first: PathBuf,
    /// Paired container whose pairs follow
    pub second: PathBuf,
    /// Destination; may be FIRST or SECOND
    pub output: PathBuf,
}

pub fn split(args: SplitArgs) -> fvkit::Result<()> {
    sweep_outputs(&[args.out_first.as_path(), args.out_rest.as_path()]);
    let summary = report(fvkit::split(&args.input, &args.out_first, &args.out_rest, args.x)?);
    println!(
        "wrote {} records to {} and {} records to {}",
        summary.first_records,
        args.out_first.display(),
        summary.second_records,
        args.out_rest.display()
    );
    Ok(())
}

pub fn split_pairs(args: SplitPairsArgs) -> fvkit::Result<()> {
    sweep_outputs(&[args.output1.as_path(), args.output2.as_path()]);
    let summary = report(fvkit::split_pairs(
        &args.input,
        &args.output1,
        &args.output2,
        args.x,
    )?);
    println!(
        "wrote {} pairs to {} and {} pairs to {}",
        summary.first_records / 2,
        args.output1.display(),
        summary.second_records / 2,
        args.output2.display()
    );
    Ok(())
}

pub fn merge_pairs(args: MergePairsArgs) -> fvkit::Result<()> {
    sweep_outputs(&[args.output.as_path()]);
    let summary = report(fvkit::merge_pairs(&args.first, &args.second, &args.output)?);
    println!(
        "wrote {} pairs ({} + {}) to {}",
        summary.first_pairs + summary.second_pairs,
        summary.first_pairs,
        summary.second_pairs,
        args.output.display()
    );
    Ok(())
}
