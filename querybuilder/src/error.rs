//! FILENAME: querybuilder/src/error.rs
//! Error type for filter compilation and query assembly failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("unknown field in filter: {0:?}")]
    UnknownField(String),
    #[error("unknown filter operator: {0:?}")]
    UnknownOp(String),
    #[error("value expected for opcode {op:?}: {expected}, value provided: {provided}")]
    ArityMismatch {
        op: String,
        expected: bool,
        provided: bool,
    },
    #[error("op {op:?} requires exactly {required} value(s), got {got}")]
    WrongValueCount {
        op: String,
        required: usize,
        got: usize,
    },
}
