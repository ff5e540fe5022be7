//! Message envelopes that reference sealed data.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::data::DataRef;
use crate::Timestamp;

/// Context carried by every system definition message.
pub const SYSTEM_CONTEXT: &str = "loom_definitions";

/// Topic for datatype definitions.
pub const DATATYPE_TOPIC: &str = "loom_datatypes";

/// Topic for namespace definitions.
pub const NAMESPACE_TOPIC: &str = "loom_namespaces";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// A system definition (datatype, namespace, ...).
    Definition,
    /// Ordinary application data broadcast to every member.
    Broadcast,
    /// Data exchanged privately between a subset of members.
    Private,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Anchored on the ledger by a batch pin.
    Pin,
    /// Not anchored.
    None,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRef {
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
}

impl TransactionRef {
    pub fn pin() -> Self {
        Self {
            tx_type: TransactionType::Pin,
            id: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHeader {
    pub id: Uuid,
    pub namespace: String,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub author: String,
    pub topic: String,
    pub context: String,
    pub tx: TransactionRef,
    pub created: Timestamp,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub header: MessageHeader,
    pub data: Vec<DataRef>,
}

impl Message {
    /// A pinned system definition message referencing `data`.
    pub fn definition(
        namespace: impl Into<String>,
        author: impl Into<String>,
        topic: impl Into<String>,
        data: Vec<DataRef>,
    ) -> Self {
        Self {
            header: MessageHeader {
                id: Uuid::new_v4(),
                namespace: namespace.into(),
                message_type: MessageType::Definition,
                author: author.into(),
                topic: topic.into(),
                context: SYSTEM_CONTEXT.to_string(),
                tx: TransactionRef::pin(),
                created: Timestamp::now(),
            },
            data,
        }
    }
}
