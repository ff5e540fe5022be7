//! Field-level validation errors shared by every crate that accepts input.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("field '{field}' is not a valid name: {value:?}")]
    InvalidName { field: String, value: String },

    #[error("field '{field}' exceeds the maximum length of {max}")]
    TooLong { field: String, max: usize },

    #[error("missing required field '{0}'")]
    MissingRequiredField(String),

    #[error("unknown value {value:?} for field '{field}'")]
    UnknownFieldValue { field: String, value: String },
}

impl FieldError {
    pub fn code(&self) -> &'static str {
        "invalid_field"
    }
}
