//! FILENAME: rowtypes/src/error.rs
//! Error type for row/cell construction failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RowError {
    #[error("unknown column name: {0:?}")]
    UnknownColumn(String),
}
