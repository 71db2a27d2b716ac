//! FILENAME: rowtypes/src/lib.rs
//! Typed cell, row, and static field/dataset metadata shared by the
//! query builder and the control-break report engine.

pub mod cell;
pub mod error;
pub mod field;
pub mod row;

pub use cell::{Cell, CellType, CellValue};
pub use error::RowError;
pub use field::{DatasetSpec, FieldSpec};
pub use row::Row;
