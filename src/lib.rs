//! # fvkit
//!
//! Streaming toolkit for fixed-record float vector containers (the *fvecs*
//! layout used by ANN benchmarks): each record is a little-endian `i32`
//! dimension `d` followed by `d` little-endian `f32` values, with no file
//! header and no record count.
//!
//! ## Operations
//!
//! | Operation | What it does |
//! |-----------|--------------|
//! | [`extract`] | Copy records `[offset, offset + count)` into a new container |
//! | [`concat`] | Append one container after another (equal dimensions) |
//! | [`split`] | First `x` records to one file, the rest to another |
//! | [`split_pairs`] | Split a `2n`-record paired container at pair `x` |
//! | [`merge_pairs`] | Inverse of [`split_pairs`] |
//! | [`inspect`] | Report geometry and preview leading records |
//!
//! ## Guarantees
//!
//! - **Constant memory**: records stream one at a time, concatenation in
//!   fixed chunks
//! - **Validate first**: inputs are checked before any output is created
//! - **Atomic outputs**: writes are staged next to the destination and
//!   renamed into place on success, so an output may alias an input
//! - **Byte exact**: records are copied verbatim, so
//!   `split` + `concat` and `split_pairs` + `merge_pairs` reproduce the input
//!
//! ## Example
//!
//! ```no_run
//! # fn main() -> fvkit::Result<()> {
//! let header = fvkit::ContainerHeader::from_path("total.fvecs")?;
//! println!("{} records of dimension {}", header.total_records, header.dimension);
//!
//! let outcome = fvkit::split_pairs("total.fvecs", "base.fvecs", "insert.fvecs", 90_000)?;
//! for diagnostic in &outcome.diagnostics {
//!     eprintln!("warning: {}", diagnostic);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod io;
pub mod operations;
pub mod record;

pub use error::{ErrorKind, FvkitError, Result};
pub use io::{ContainerHeader, ContainerReader, ContainerWriter, StagedFile};
pub use operations::{
    concat, extract, inspect, merge_pairs, split, split_pairs, Diagnostic, InspectReport, Outcome,
    RangeDescriptor, DEFAULT_PREVIEW_COUNT,
};
pub use record::VectorRecord;
