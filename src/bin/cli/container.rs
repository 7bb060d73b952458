//! Range extraction, concatenation and inspection commands

use super::{report, sweep_outputs};
use clap::Args;
use std::path::PathBuf;

/// Arguments for `fvkit extract`
#[derive(Args)]
pub struct ExtractArgs {
    /// Source container
    pub input: PathBuf,
    /// Destination container (replaced atomically)
    pub output: PathBuf,
    /// Number of records to copy (clamped to what is available)
    pub count: u64,
    /// Index of the first record to copy
    #[arg(long, default_value_t = 0)]
    pub offset: u64,
}

/// Arguments for `fvkit concat`
#[derive(Args)]
pub struct ConcatArgs {
    /// Container written first
    pub first: PathBuf,
    /// Container appended after FIRST
    pub second: PathBuf,
    /// Destination; may be FIRST or SECOND
    pub output: PathBuf,
}

/// Arguments for `fvkit inspect`
#[derive(Args)]
pub struct InspectArgs {
    /// Container to inspect
    pub path: PathBuf,
    /// Number of leading records to preview
    #[arg(long, default_value_t = fvkit::DEFAULT_PREVIEW_COUNT)]
    pub show: u64,
}

pub fn extract(args: ExtractArgs) -> fvkit::Result<()> {
    sweep_outputs(&[args.output.as_path()]);
    let summary = report(fvkit::extract(&args.input, &args.output, args.offset, args.count)?);
    println!(
        "wrote {} records [{}, {}) from {} to {}",
        summary.written,
        summary.offset,
        summary.offset + summary.written,
        args.input.display(),
        args.output.display()
    );
    Ok(())
}

pub fn concat(args: ConcatArgs) -> fvkit::Result<()> {
    sweep_outputs(&[args.output.as_path()]);
    let summary = report(fvkit::concat(&args.first, &args.second, &args.output)?);
    println!(
        "wrote {} + {} records (dimension {}, {} bytes) to {}",
        summary.first_records,
        summary.second_records,
        summary.dimension,
        summary.bytes_written,
        args.output.display()
    );
    Ok(())
}

pub fn inspect(args: InspectArgs) -> fvkit::Result<()> {
    // Anomalies are printed after the report rather than logged.
    let outcome = fvkit::inspect(&args.path, args.show)?;
    print!("{}", outcome);
    Ok(())
}
