//! The loom node core.
//!
//! [`Orchestrator`] owns every plugin and manager for the life of the
//! process, initializes and starts them in dependency order, and publishes
//! datatype and namespace definitions to the network.

pub mod config;
pub mod definitions;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod tracing_spans;

#[cfg(test)]
mod test_support;

pub use config::{NodeConfig, TokenPluginConfig};
pub use error::OrchestratorError;
pub use logging::{init_from_config, init_logging, LogFormat};
pub use orchestrator::{Components, LifecycleState, Orchestrator, Plugins};
