use loom_plugins::PluginError;
use loom_types::Bytes32;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("unsupported validator kind '{0}'")]
    UnsupportedValidatorKind(String),

    #[error("validator kind '{0}' requires a datatype reference")]
    MissingDatatypeReference(String),

    #[error("datatype '{name}' version '{version}' not found in namespace '{namespace}'")]
    DatatypeNotFound {
        namespace: String,
        name: String,
        version: String,
    },

    #[error("datatype '{name}' version '{version}' has an invalid schema: {message}")]
    InvalidSchema {
        name: String,
        version: String,
        message: String,
    },

    #[error("data does not conform to datatype '{name}' version '{version}': {message}")]
    SchemaValidationFailed {
        name: String,
        version: String,
        message: String,
    },

    #[error("hash mismatch: stored {stored}, computed {computed}")]
    HashVerificationFailed { stored: String, computed: Bytes32 },

    /// Storage failures are passed through with their original text.
    #[error(transparent)]
    Storage(#[from] PluginError),
}

impl DataError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedValidatorKind(_) => "unsupported_validator_kind",
            Self::MissingDatatypeReference(_) => "missing_datatype_reference",
            Self::DatatypeNotFound { .. } => "datatype_not_found",
            Self::InvalidSchema { .. } => "invalid_schema",
            Self::SchemaValidationFailed { .. } => "schema_validation_failed",
            Self::HashVerificationFailed { .. } => "hash_verification_failed",
            Self::Storage(e) => e.code(),
        }
    }
}
