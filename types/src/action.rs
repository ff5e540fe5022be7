//! Network-wide administrative actions submitted through the ledger.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A request as received from a caller; the type is validated on submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAction {
    #[serde(rename = "type")]
    pub action_type: String,
}

impl NetworkAction {
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
        }
    }
}

/// The actions this node knows how to submit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkActionType {
    /// Retire the active system contract and migrate to the next one.
    Terminate,
}

impl NetworkActionType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "terminate" => Some(Self::Terminate),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Terminate => "terminate",
        }
    }

    /// Whether this action may only be submitted in the system namespace.
    pub fn system_only(&self) -> bool {
        matches!(self, Self::Terminate)
    }
}

impl fmt::Display for NetworkActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
