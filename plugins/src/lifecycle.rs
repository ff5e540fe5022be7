//! Lifecycle contracts shared by every plugin and manager.

use async_trait::async_trait;

use crate::PluginError;

/// A pluggable implementation of one capability (database, ledger, data
/// exchange, shared storage, tokens).
///
/// Each capability trait adds its own `init`, because every plugin receives
/// different dependencies at initialization time.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Implementation name, e.g. `"postgres"` or `"ethereum"`.
    fn name(&self) -> &str;

    /// Begin background work. Only called after a successful `init`.
    async fn start(&self) -> Result<(), PluginError> {
        Ok(())
    }
}

/// A higher-level manager composed by the orchestrator.
///
/// Managers own their background execution once started; the orchestrator
/// only waits on `wait_stop` during shutdown.
#[async_trait]
pub trait Component: Send + Sync {
    /// Stable component name, used in logs and dependency errors.
    fn name(&self) -> &'static str;

    async fn start(&self) -> Result<(), PluginError> {
        Ok(())
    }

    /// Resolves once every background task owned by this component has exited.
    async fn wait_stop(&self) {}
}
