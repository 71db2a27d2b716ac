//! FILENAME: report-engine/src/lib.rs
//! Single-pass control-break report writer.
//!
//! This crate is synchronous and single-threaded along a report's path: a
//! `ReportWriter` is driven by one `handle(row)` call per incoming row, in
//! order, with no suspension points beyond whatever its configured `Sink`
//! performs. It is not meant to be shared across threads without external
//! synchronization.

pub mod encode;
pub mod error;
pub mod event;
pub mod level;
pub mod sink;
pub mod spec;
pub mod writer;

pub use encode::OutputFormat;
pub use error::{SpecError, WriterError};
pub use event::{ReportRow, RowType};
pub use level::ReportLevel;
pub use sink::{MultipartSink, ObjectStoreClient, Sink, WriteSink, MIN_PART_SIZE};
pub use spec::{derive_extra_columns, ColumnSpec, ReportSpec};
pub use writer::ReportWriter;
