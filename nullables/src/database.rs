//! Nullable database: thread-safe in-memory storage for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use loom_plugins::{Database, Plugin, PluginConfig, PluginError};
use loom_types::{Data, Datatype, Identity, IdentityType, Namespace};
use uuid::Uuid;

use crate::recorder::{enter, CallLog, FailurePlan};

type DatatypeKey = (String, String, String);

/// An in-memory [`Database`] that records every call as `database.<op>`.
pub struct NullDatabase {
    calls: CallLog,
    failures: FailurePlan,
    datatypes: Mutex<HashMap<DatatypeKey, Datatype>>,
    data: Mutex<HashMap<Uuid, Data>>,
    data_upserts: Mutex<Vec<(Uuid, bool, bool)>>,
    namespaces: Mutex<HashMap<String, Namespace>>,
    identities: Mutex<Vec<Identity>>,
}

impl NullDatabase {
    pub fn new() -> Self {
        Self::with_log(CallLog::new())
    }

    pub fn with_log(calls: CallLog) -> Self {
        Self {
            calls,
            failures: FailurePlan::default(),
            datatypes: Mutex::new(HashMap::new()),
            data: Mutex::new(HashMap::new()),
            data_upserts: Mutex::new(Vec::new()),
            namespaces: Mutex::new(HashMap::new()),
            identities: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> &CallLog {
        &self.calls
    }

    /// Makes every later call to `operation` fail with `error`.
    pub fn fail_on(&self, operation: &str, error: PluginError) {
        self.failures.fail_on(operation, error);
    }

    pub fn insert_datatype(&self, datatype: Datatype) {
        let key = (
            datatype.namespace.clone(),
            datatype.name.clone(),
            datatype.version.clone(),
        );
        self.datatypes.lock().unwrap().insert(key, datatype);
    }

    pub fn insert_namespace(&self, namespace: Namespace) {
        self.namespaces
            .lock()
            .unwrap()
            .insert(namespace.name.clone(), namespace);
    }

    pub fn insert_identity(&self, identity: Identity) {
        self.identities.lock().unwrap().push(identity);
    }

    pub fn data(&self, id: &Uuid) -> Option<Data> {
        self.data.lock().unwrap().get(id).cloned()
    }

    pub fn data_count(&self) -> usize {
        self.data.lock().unwrap().len()
    }

    /// `(id, allow_existing, is_update)` for every `upsert_data` call.
    pub fn data_upserts(&self) -> Vec<(Uuid, bool, bool)> {
        self.data_upserts.lock().unwrap().clone()
    }

    pub fn namespace(&self, name: &str) -> Option<Namespace> {
        self.namespaces.lock().unwrap().get(name).cloned()
    }
}

impl Default for NullDatabase {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for NullDatabase {
    fn name(&self) -> &str {
        "null"
    }

    async fn start(&self) -> Result<(), PluginError> {
        enter(&self.calls, &self.failures, "database", "start")
    }
}

#[async_trait]
impl Database for NullDatabase {
    async fn init(&self, _config: &PluginConfig) -> Result<(), PluginError> {
        enter(&self.calls, &self.failures, "database", "init")
    }

    async fn get_datatype_by_name(
        &self,
        namespace: &str,
        name: &str,
        version: &str,
    ) -> Result<Option<Datatype>, PluginError> {
        enter(&self.calls, &self.failures, "database", "get_datatype_by_name")?;
        let key = (namespace.to_string(), name.to_string(), version.to_string());
        Ok(self.datatypes.lock().unwrap().get(&key).cloned())
    }

    async fn upsert_data(
        &self,
        data: &Data,
        allow_existing: bool,
        is_update: bool,
    ) -> Result<(), PluginError> {
        enter(&self.calls, &self.failures, "database", "upsert_data")?;
        self.data_upserts
            .lock()
            .unwrap()
            .push((data.id, allow_existing, is_update));
        let mut stored = self.data.lock().unwrap();
        if !allow_existing && stored.contains_key(&data.id) {
            return Err(PluginError::Backend(format!("data {} already exists", data.id)));
        }
        stored.insert(data.id, data.clone());
        Ok(())
    }

    async fn get_namespace(&self, name: &str) -> Result<Option<Namespace>, PluginError> {
        enter(&self.calls, &self.failures, "database", "get_namespace")?;
        Ok(self.namespace(name))
    }

    async fn upsert_namespace(
        &self,
        namespace: &Namespace,
        allow_existing: bool,
    ) -> Result<(), PluginError> {
        enter(&self.calls, &self.failures, "database", "upsert_namespace")?;
        let mut stored = self.namespaces.lock().unwrap();
        if !allow_existing && stored.contains_key(&namespace.name) {
            return Err(PluginError::Backend(format!(
                "namespace {} already exists",
                namespace.name
            )));
        }
        stored.insert(namespace.name.clone(), namespace.clone());
        Ok(())
    }

    async fn get_identities(
        &self,
        namespace: &str,
        identity_type: IdentityType,
    ) -> Result<Vec<Identity>, PluginError> {
        enter(&self.calls, &self.failures, "database", "get_identities")?;
        Ok(self
            .identities
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.namespace == namespace && i.identity_type == identity_type)
            .cloned()
            .collect())
    }
}
