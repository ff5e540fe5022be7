//! Published schemas that govern JSON data records.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::data::{DatatypeRef, ValidatorType};
use crate::hash::Bytes32;
use crate::Timestamp;

/// A schema container, immutable once published and looked up by
/// `(namespace, name, version)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Datatype {
    pub id: Uuid,
    #[serde(default)]
    pub validator: ValidatorType,
    #[serde(default)]
    pub namespace: String,
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<Bytes32>,
    pub created: Timestamp,
    #[serde(default)]
    pub value: Value,
}

impl Datatype {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        schema: Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            validator: ValidatorType::JSON,
            namespace: namespace.into(),
            name: name.into(),
            version: version.into(),
            hash: None,
            created: Timestamp::now(),
            value: schema,
        }
    }

    pub fn reference(&self) -> DatatypeRef {
        DatatypeRef::new(self.name.clone(), self.version.clone())
    }
}
