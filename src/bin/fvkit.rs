//! fvkit CLI - fvecs container toolkit
//!
//! Unix-style tools for preparing vector datasets: slice, join, split and
//! inspect fvecs containers with constant memory and atomic outputs.
//!
//! # Usage
//!
//! ```bash
//! # Take 2000 query vectors starting at record 300000
//! fvkit extract base.fvecs query.fvecs 2000 --offset 300000
//!
//! # Append new vectors in place
//! fvkit concat base.fvecs new.fvecs base.fvecs
//!
//! # Keep 90000 (s, e) pairs, the rest become inserts
//! fvkit split-pairs total.fvecs base.fvecs insert.fvecs 90000
//!
//! # Look inside
//! fvkit inspect base.fvecs --show 3
//! ```

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;

/// fvkit - streaming toolkit for fvecs vector containers
#[derive(Parser)]
#[command(name = "fvkit")]
#[command(version)]
#[command(about = "Slice, join, split and inspect fvecs vector containers")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy COUNT records starting at --offset into a new container
    Extract(cli::container::ExtractArgs),
    /// Append SECOND after FIRST (dimensions must match)
    Concat(cli::container::ConcatArgs),
    /// First X records to OUT_FIRST, the rest to OUT_REST
    Split(cli::split::SplitArgs),
    /// Split a paired container at pair X, keeping pairs together
    SplitPairs(cli::split::SplitPairsArgs),
    /// Merge two paired containers (inverse of split-pairs)
    MergePairs(cli::split::MergePairsArgs),
    /// Report dimension, record count and leading records
    Inspect(cli::container::InspectArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else {
        match cli.verbose {
            0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Extract(args) => cli::container::extract(args),
        Commands::Concat(args) => cli::container::concat(args),
        Commands::Split(args) => cli::split::split(args),
        Commands::SplitPairs(args) => cli::split::split_pairs(args),
        Commands::MergePairs(args) => cli::split::merge_pairs(args),
        Commands::Inspect(args) => cli::container::inspect(args),
    };

    match result {
        Ok(()) => cli::CliExitCode::Success.into(),
        Err(e) => {
            tracing::error!("{}", e);
            cli::CliExitCode::from(&e).into()
        }
    }
}
