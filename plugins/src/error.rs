use thiserror::Error;

/// Failure reported by a plugin or manager.
///
/// Callers in this workspace pass these through untouched, so the text a
/// collaborator produces is the text the end caller sees.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PluginError {
    #[error("{0}")]
    Failed(String),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("{0} plugin has not been initialized")]
    NotInitialized(String),
}

impl PluginError {
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }

    pub fn code(&self) -> &'static str {
        "plugin"
    }
}
