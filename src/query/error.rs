use thiserror::Error;

use crate::error::ClientError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Unknown filter field: {0}")]
    UnknownField(String),

    #[error("Invalid value '{value}' for {field}: expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: &'static str,
    },

    #[error("Field cannot be sorted: {0}")]
    UnsortableField(String),

    #[error("No sort field to apply a direction to")]
    NoSortField,

    #[error("Invalid page: {0}")]
    InvalidPage(u32),

    #[error("Invalid page size: {0}")]
    InvalidPageSize(u32),
}

impl From<QueryError> for ClientError {
    fn from(err: QueryError) -> Self {
        ClientError::InvalidRequest(err.to_string())
    }
}
