//! Validator resolution and data verification.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use loom_plugins::{Component, Database, Metrics};
use loom_types::{Data, DatatypeRef, ValidatorKind, ValidatorType};
use tokio::sync::RwLock;
use tracing::Instrument;

use crate::validator::{JsonValidator, PassthroughValidator, Validator};
use crate::DataError;

/// The data integrity capability consumed by the orchestrator and by every
/// component that accepts inbound data.
#[async_trait]
pub trait DataManager: Component {
    /// Resolves the validator for a record's kind and datatype reference.
    ///
    /// Repeated calls with the same `(namespace, name, version)` return the
    /// same instance.
    async fn get_validator_for(
        &self,
        namespace: &str,
        validator: &ValidatorType,
        datatype: Option<&DatatypeRef>,
    ) -> Result<Arc<dyn Validator>, DataError>;

    /// Schema check followed by hash verification. Never mutates `data`.
    async fn validate(&self, data: &Data) -> Result<(), DataError>;
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ValidatorKey {
    namespace: String,
    name: String,
    version: String,
}

/// Default [`DataManager`].
///
/// Validators are cached forever: a datatype is immutable once published, so
/// an update made after first use is not observed by this engine.
pub struct DataEngine {
    database: Arc<dyn Database>,
    metrics: Arc<Metrics>,
    validators: RwLock<HashMap<ValidatorKey, Arc<dyn Validator>>>,
    passthrough_none: Arc<dyn Validator>,
    passthrough_definition: Arc<dyn Validator>,
}

impl DataEngine {
    pub fn new(database: Arc<dyn Database>, metrics: Arc<Metrics>) -> Self {
        Self {
            database,
            metrics,
            validators: RwLock::new(HashMap::new()),
            passthrough_none: Arc::new(PassthroughValidator::new(ValidatorKind::None)),
            passthrough_definition: Arc::new(PassthroughValidator::new(ValidatorKind::Definition)),
        }
    }

    pub async fn cached_validators(&self) -> usize {
        self.validators.read().await.len()
    }

    async fn resolve_json(
        &self,
        namespace: &str,
        datatype: &DatatypeRef,
    ) -> Result<Arc<dyn Validator>, DataError> {
        let key = ValidatorKey {
            namespace: namespace.to_string(),
            name: datatype.name.clone(),
            version: datatype.version.clone(),
        };
        if let Some(cached) = self.validators.read().await.get(&key) {
            return Ok(Arc::clone(cached));
        }

        let found = self
            .database
            .get_datatype_by_name(namespace, &datatype.name, &datatype.version)
            .await?;
        let Some(found) = found else {
            return Err(DataError::DatatypeNotFound {
                namespace: namespace.to_string(),
                name: datatype.name.clone(),
                version: datatype.version.clone(),
            });
        };
        let compiled: Arc<dyn Validator> = Arc::new(JsonValidator::new(found)?);

        // A concurrent caller may have inserted first; keep whichever landed.
        let mut validators = self.validators.write().await;
        let winner = Arc::clone(validators.entry(key).or_insert(compiled));
        self.metrics.validator_cache_size.set(validators.len() as i64);
        tracing::debug!(
            namespace,
            name = %datatype.name,
            version = %datatype.version,
            "validator cached"
        );
        Ok(winner)
    }

    async fn check(&self, data: &Data) -> Result<(), DataError> {
        let validator = self
            .get_validator_for(&data.namespace, &data.validator, data.datatype.as_ref())
            .await?;
        validator.validate_value(&data.value)?;
        data.verify_hash()
            .map_err(|computed| DataError::HashVerificationFailed {
                stored: data
                    .hash
                    .map(|h| h.to_string())
                    .unwrap_or_else(|| "<none>".to_string()),
                computed,
            })
    }
}

#[async_trait]
impl Component for DataEngine {
    fn name(&self) -> &'static str {
        "data"
    }
}

#[async_trait]
impl DataManager for DataEngine {
    async fn get_validator_for(
        &self,
        namespace: &str,
        validator: &ValidatorType,
        datatype: Option<&DatatypeRef>,
    ) -> Result<Arc<dyn Validator>, DataError> {
        let kind = validator
            .kind()
            .ok_or_else(|| DataError::UnsupportedValidatorKind(validator.to_string()))?;
        match kind {
            ValidatorKind::None => Ok(Arc::clone(&self.passthrough_none)),
            ValidatorKind::Definition => Ok(Arc::clone(&self.passthrough_definition)),
            ValidatorKind::Json => match datatype.filter(|d| !d.is_empty()) {
                Some(datatype) => self.resolve_json(namespace, datatype).await,
                None => Err(DataError::MissingDatatypeReference(
                    ValidatorType::JSON.to_string(),
                )),
            },
        }
    }

    async fn validate(&self, data: &Data) -> Result<(), DataError> {
        let span = tracing::debug_span!("validate", namespace = %data.namespace, data = %data.id);
        let result = self.check(data).instrument(span).await;
        match &result {
            Ok(()) => self.metrics.data_validated.inc(),
            Err(e) => {
                self.metrics.data_validation_failures.inc();
                tracing::debug!(data = %data.id, code = e.code(), error = %e, "data rejected");
            }
        }
        result
    }
}
