//! Validators bound to a single datatype (or to none).

use loom_types::{Datatype, ValidatorKind};
use serde_json::Value;

use crate::DataError;

/// A compiled check for one validator kind and, where needed, one datatype.
///
/// Instances are created by the data engine and shared for the engine's
/// lifetime, so implementations must be immutable.
pub trait Validator: Send + Sync {
    fn kind(&self) -> ValidatorKind;

    /// The datatype this validator was compiled from, if any.
    fn datatype(&self) -> Option<&Datatype>;

    /// Checks `value` against the validator's rules. Does not look at hashes.
    fn validate_value(&self, value: &Value) -> Result<(), DataError>;
}

/// JSON-schema validator compiled from a datatype's schema value.
pub struct JsonValidator {
    datatype: Datatype,
    schema: jsonschema::Validator,
}

impl JsonValidator {
    pub fn new(datatype: Datatype) -> Result<Self, DataError> {
        let schema =
            jsonschema::validator_for(&datatype.value).map_err(|e| DataError::InvalidSchema {
                name: datatype.name.clone(),
                version: datatype.version.clone(),
                message: e.to_string(),
            })?;
        Ok(Self { datatype, schema })
    }
}

impl Validator for JsonValidator {
    fn kind(&self) -> ValidatorKind {
        ValidatorKind::Json
    }

    fn datatype(&self) -> Option<&Datatype> {
        Some(&self.datatype)
    }

    fn validate_value(&self, value: &Value) -> Result<(), DataError> {
        let violations: Vec<String> = self
            .schema
            .iter_errors(value)
            .map(|e| e.to_string())
            .collect();
        if violations.is_empty() {
            return Ok(());
        }
        Err(DataError::SchemaValidationFailed {
            name: self.datatype.name.clone(),
            version: self.datatype.version.clone(),
            message: violations.join("; "),
        })
    }
}

/// Accepts every value. Used for kinds that carry no datatype.
pub struct PassthroughValidator {
    kind: ValidatorKind,
}

impl PassthroughValidator {
    pub fn new(kind: ValidatorKind) -> Self {
        Self { kind }
    }
}

impl Validator for PassthroughValidator {
    fn kind(&self) -> ValidatorKind {
        self.kind
    }

    fn datatype(&self) -> Option<&Datatype> {
        None
    }

    fn validate_value(&self, _value: &Value) -> Result<(), DataError> {
        Ok(())
    }
}
