use loom_data::DataError;
use loom_plugins::PluginError;
use loom_types::FieldError;
use thiserror::Error;

use crate::LifecycleState;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Plugin(#[from] PluginError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("required components not configured: {}", .components.join(", "))]
    MissingDependency { components: Vec<&'static str> },

    #[error("unknown network action type '{0}'")]
    UnknownNetworkActionType(String),

    #[error("network action '{action}' may only be submitted in the system namespace, not '{namespace}'")]
    ActionRestrictedToSystemNamespace { action: String, namespace: String },

    #[error("cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: LifecycleState,
    },

    #[error("namespace '{0}' does not exist")]
    NamespaceNotFound(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl OrchestratorError {
    pub(crate) fn missing(component: &'static str) -> Self {
        Self::MissingDependency {
            components: vec![component],
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Plugin(e) => e.code(),
            Self::Data(e) => e.code(),
            Self::Field(e) => e.code(),
            Self::MissingDependency { .. } => "missing_dependency",
            Self::UnknownNetworkActionType(_) => "unknown_network_action_type",
            Self::ActionRestrictedToSystemNamespace { .. } => "network_action_restricted",
            Self::InvalidState { .. } => "invalid_state",
            Self::NamespaceNotFound(_) => "namespace_not_found",
            Self::Config(_) => "config",
            Self::Serialization(_) => "serialization",
        }
    }
}
