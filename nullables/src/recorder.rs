//! Call recording and failure injection shared by every nullable.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use loom_plugins::PluginError;

/// Ordered log of calls made against one or more nullables.
///
/// Clone it into several nullables to assert cross-component ordering.
#[derive(Clone, Debug, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, call: impl Into<String>) {
        self.entries.lock().unwrap().push(call.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.as_str() == call)
            .count()
    }

    pub fn contains(&self, call: &str) -> bool {
        self.count(call) > 0
    }

    /// Index of the first occurrence of `call`.
    pub fn position(&self, call: &str) -> Option<usize> {
        self.entries.lock().unwrap().iter().position(|c| c == call)
    }
}

/// Errors to return from named operations.
#[derive(Debug, Default)]
pub struct FailurePlan {
    failures: Mutex<HashMap<String, PluginError>>,
}

impl FailurePlan {
    pub fn fail_on(&self, operation: &str, error: PluginError) {
        self.failures
            .lock()
            .unwrap()
            .insert(operation.to_string(), error);
    }

    pub fn check(&self, operation: &str) -> Result<(), PluginError> {
        match self.failures.lock().unwrap().get(operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// Records `prefix.operation` and returns any injected failure for it.
pub(crate) fn enter(
    log: &CallLog,
    plan: &FailurePlan,
    prefix: &str,
    operation: &str,
) -> Result<(), PluginError> {
    log.record(format!("{prefix}.{operation}"));
    plan.check(operation)
}
