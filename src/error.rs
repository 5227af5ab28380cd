use thiserror::Error;

use crate::column::ColumnType;

/// Error type for all frame, column and grouping operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("construction error: {0}")]
    Construction(String),

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("unsupported operation {operation} for column type {column_type:?}")]
    UnsupportedOperation {
        operation: String,
        column_type: ColumnType,
    },

    #[error("cannot aggregate into column that is part of group by or is already an aggregate: {0}")]
    AggregateNameConflict(String),

    #[error("type mismatch: expected {expected:?}, found {found}")]
    TypeMismatch { expected: ColumnType, found: String },

    #[error("invalid operand: {0}")]
    InvalidOperand(String),

    #[error("index out of bounds: index {index}, size {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    #[error("JSON error: {0}")]
    Json(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn unsupported(operation: impl Into<String>, column_type: ColumnType) -> Self {
        Error::UnsupportedOperation {
            operation: operation.into(),
            column_type,
        }
    }

    pub(crate) fn type_mismatch(expected: ColumnType, found: impl Into<String>) -> Self {
        Error::TypeMismatch {
            expected,
            found: found.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}
