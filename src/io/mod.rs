//! I/O module: container header, streaming reader/writer, staged outputs
//!
//! Reading is record-at-a-time with a single reusable buffer; writing goes
//! through [`StagedFile`] so a destination is replaced atomically or not at
//! all.

pub mod header;
pub mod reader;
pub mod staging;
pub mod writer;

pub use header::ContainerHeader;
pub use reader::{ContainerReader, RecordRead, Records};
pub use staging::{resolve_target, sweep_stale, StagedFile};
pub use writer::ContainerWriter;
