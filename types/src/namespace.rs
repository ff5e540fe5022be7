//! Named scopes that own definitions and data.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::Timestamp;

/// The distinguished namespace reserved for network-wide system operations.
pub const SYSTEM_NAMESPACE: &str = "loom_system";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamespaceType {
    #[default]
    Local,
    Broadcast,
    System,
}

/// One deployment of the system smart contract.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractInfo {
    pub index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Value>,
    #[serde(default)]
    pub first_event: String,
}

/// The system contracts a namespace has used: the active one plus every
/// contract retired by a terminate action.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemContracts {
    #[serde(default)]
    pub active: ContractInfo,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub terminated: Vec<ContractInfo>,
}

impl SystemContracts {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub namespace_type: NamespaceType,
    pub created: Timestamp,
    #[serde(default, skip_serializing_if = "SystemContracts::is_empty")]
    pub contracts: SystemContracts,
}

impl Namespace {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            namespace_type: NamespaceType::Local,
            created: Timestamp::now(),
            contracts: SystemContracts::default(),
        }
    }
}
