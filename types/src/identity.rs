//! Organization and node identities known to this namespace.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityType {
    Org,
    Node,
    Custom,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub did: String,
    #[serde(rename = "type")]
    pub identity_type: IdentityType,
    pub namespace: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Uuid>,
}

impl Identity {
    pub fn node(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: Uuid::new_v4(),
            did: format!("did:loom:node/{name}"),
            identity_type: IdentityType::Node,
            namespace: namespace.into(),
            name,
            parent: None,
        }
    }
}
