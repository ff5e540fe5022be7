//! Content-addressed data records.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use uuid::Uuid;

use crate::hash::{hash_value, Bytes32};
use crate::Timestamp;

/// Tag selecting the validation strategy for a data record.
///
/// Kept as an open string so that records arriving from peers with a tag this
/// node does not understand can still be represented and rejected by name.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidatorType(Cow<'static, str>);

impl ValidatorType {
    pub const JSON: Self = Self(Cow::Borrowed("json"));
    pub const NONE: Self = Self(Cow::Borrowed("none"));
    pub const DEFINITION: Self = Self(Cow::Borrowed("definition"));

    pub fn new(tag: impl Into<String>) -> Self {
        Self(Cow::Owned(tag.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Maps the tag onto a known kind. An empty tag means JSON.
    pub fn kind(&self) -> Option<ValidatorKind> {
        match self.as_str() {
            "" | "json" => Some(ValidatorKind::Json),
            "none" => Some(ValidatorKind::None),
            "definition" => Some(ValidatorKind::Definition),
            _ => None,
        }
    }
}

impl fmt::Debug for ValidatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValidatorType({:?})", self.as_str())
    }
}

impl fmt::Display for ValidatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The validation strategies this node implements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValidatorKind {
    /// JSON-schema check against a published datatype.
    Json,
    /// No schema check.
    None,
    /// System definition payloads; checked by the definition handler.
    Definition,
}

/// Reference from a data record to the datatype that governs it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DatatypeRef {
    pub name: String,
    pub version: String,
}

impl DatatypeRef {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// A reference missing either half cannot be resolved.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() || self.version.is_empty()
    }
}

/// A content-addressable piece of data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Data {
    pub id: Uuid,
    pub namespace: String,
    #[serde(default)]
    pub validator: ValidatorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<DatatypeRef>,
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<Bytes32>,
    pub created: Timestamp,
}

impl Data {
    pub fn new(namespace: impl Into<String>, validator: ValidatorType, value: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            namespace: namespace.into(),
            validator,
            datatype: None,
            value,
            hash: None,
            created: Timestamp::now(),
        }
    }

    pub fn with_datatype(mut self, datatype: DatatypeRef) -> Self {
        self.datatype = Some(datatype);
        self
    }

    /// Computes and attaches the canonical hash of the current value.
    pub fn seal(&mut self) -> Bytes32 {
        let hash = hash_value(&self.value);
        self.hash = Some(hash);
        hash
    }

    /// Recomputes the hash of the value. Returns the computed hash on mismatch.
    pub fn verify_hash(&self) -> Result<(), Bytes32> {
        let computed = hash_value(&self.value);
        match self.hash {
            Some(stored) if stored == computed => Ok(()),
            _ => Err(computed),
        }
    }

    pub fn data_ref(&self) -> DataRef {
        DataRef {
            id: self.id,
            hash: self.hash,
        }
    }
}

/// A message's pointer to one data record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRef {
    pub id: Uuid,
    pub hash: Option<Bytes32>,
}
