//! Core data model for the loom node.
//!
//! Every other crate in the workspace shares these types: data records and
//! their content hashes, datatypes, message envelopes, namespaces, identities
//! and network actions, plus the field checks applied to user input.

pub mod action;
pub mod data;
pub mod datatype;
pub mod error;
pub mod hash;
pub mod identity;
pub mod message;
pub mod namespace;
pub mod time;
pub mod validation;

pub use action::{NetworkAction, NetworkActionType};
pub use data::{Data, DataRef, DatatypeRef, ValidatorKind, ValidatorType};
pub use datatype::Datatype;
pub use error::FieldError;
pub use hash::{hash_value, Bytes32};
pub use identity::{Identity, IdentityType};
pub use message::{
    Message, MessageHeader, MessageType, TransactionRef, TransactionType, DATATYPE_TOPIC,
    NAMESPACE_TOPIC, SYSTEM_CONTEXT,
};
pub use namespace::{ContractInfo, Namespace, NamespaceType, SystemContracts, SYSTEM_NAMESPACE};
pub use time::Timestamp;
pub use validation::{validate_length, validate_name_field, MAX_DESCRIPTION_LENGTH};
