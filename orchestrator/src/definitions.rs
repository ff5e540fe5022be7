//! Publishing datatype and namespace definitions to the network.
//!
//! A definition is sealed into a data record of kind `definition`, stored
//! locally, then referenced from a pinned message on a system topic.

use loom_types::{
    hash_value, validate_length, validate_name_field, Data, Datatype, FieldError, Message,
    Namespace, Timestamp, ValidatorType, DATATYPE_TOPIC, MAX_DESCRIPTION_LENGTH, NAMESPACE_TOPIC,
};
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::orchestrator::required;
use crate::tracing_spans::definition_span;
use crate::{Orchestrator, OrchestratorError};

impl Orchestrator {
    /// Seals `definition` as a new data record, persists it, and broadcasts a
    /// message referencing it on `topic`.
    pub async fn broadcast_definition<T: Serialize + ?Sized>(
        &self,
        namespace: &str,
        definition: &T,
        topic: &str,
    ) -> Result<Message, OrchestratorError> {
        let database = required(&self.plugins.database, "database")?;
        let broadcast = required(&self.components.broadcast, "broadcast")?;
        async {
            let value = serde_json::to_value(definition)?;
            let mut data = Data::new(namespace, ValidatorType::DEFINITION, value);
            data.seal();

            // Freshly generated id: allow existing, not an update.
            database.upsert_data(&data, true, false).await?;

            let mut message = Message::definition(
                namespace,
                self.config.node_identity.as_str(),
                topic,
                vec![data.data_ref()],
            );
            broadcast.broadcast_message(&mut message).await?;
            self.metrics.definitions_broadcast.inc();
            tracing::info!(message = %message.header.id, data = %data.id, "definition broadcast");
            Ok::<_, OrchestratorError>(message)
        }
        .instrument(definition_span(namespace, topic))
        .await
    }

    /// Publishes a JSON-schema datatype into `namespace`. Assigns the
    /// datatype's id, creation time, namespace and schema hash.
    pub async fn broadcast_datatype(
        &self,
        namespace: &str,
        datatype: &mut Datatype,
    ) -> Result<Message, OrchestratorError> {
        datatype.id = Uuid::new_v4();
        datatype.created = Timestamp::now();
        datatype.namespace = namespace.to_string();
        if datatype.validator.is_empty() {
            datatype.validator = ValidatorType::JSON;
        }
        if datatype.validator != ValidatorType::JSON {
            return Err(FieldError::UnknownFieldValue {
                field: "validator".into(),
                value: datatype.validator.to_string(),
            }
            .into());
        }
        self.verify_namespace_exists(namespace).await?;
        validate_name_field(&datatype.name, "name")?;
        validate_name_field(&datatype.version, "version")?;
        if datatype.value.is_null() {
            return Err(FieldError::MissingRequiredField("value".into()).into());
        }
        datatype.hash = Some(hash_value(&datatype.value));

        let datatype: &Datatype = datatype;
        self.broadcast_definition(namespace, datatype, DATATYPE_TOPIC)
            .await
    }

    /// Publishes a namespace definition. The message is sent within the
    /// namespace being defined.
    pub async fn broadcast_namespace(
        &self,
        namespace: &mut Namespace,
    ) -> Result<Message, OrchestratorError> {
        namespace.id = Uuid::new_v4();
        namespace.created = Timestamp::now();
        validate_name_field(&namespace.name, "name")?;
        validate_length(&namespace.description, "description", MAX_DESCRIPTION_LENGTH)?;

        let namespace: &Namespace = namespace;
        self.broadcast_definition(&namespace.name, namespace, NAMESPACE_TOPIC)
            .await
    }

    async fn verify_namespace_exists(&self, namespace: &str) -> Result<(), OrchestratorError> {
        let database = required(&self.plugins.database, "database")?;
        match database.get_namespace(namespace).await? {
            Some(_) => Ok(()),
            None => Err(OrchestratorError::NamespaceNotFound(namespace.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestNode;
    use loom_plugins::PluginError;
    use loom_types::{MessageType, TransactionType, SYSTEM_CONTEXT};
    use serde_json::json;

    #[derive(Serialize)]
    struct Widget {
        zeta: u32,
        alpha: &'static str,
    }

    fn customer() -> Datatype {
        Datatype::new(
            "",
            "customer",
            "0.0.1",
            json!({"properties": {"field1": {"type": "string"}}}),
        )
    }

    fn seeded() -> TestNode {
        let node = TestNode::new();
        node.database.insert_namespace(Namespace::new("ns1", ""));
        node
    }

    #[tokio::test]
    async fn same_definition_twice_gives_two_records_with_equal_hashes() {
        let node = TestNode::new();
        let or = node.orchestrator();
        let widget = Widget {
            zeta: 1,
            alpha: "a",
        };

        let first = or
            .broadcast_definition("ns1", &widget, "widgets")
            .await
            .unwrap();
        let second = or
            .broadcast_definition("ns1", &widget, "widgets")
            .await
            .unwrap();

        let expected = hash_value(&json!({"alpha": "a", "zeta": 1}));
        assert_ne!(first.data[0].id, second.data[0].id);
        assert_eq!(first.data[0].hash, Some(expected));
        assert_eq!(second.data[0].hash, Some(expected));

        let stored = node.database.data(&first.data[0].id).unwrap();
        assert_eq!(stored.validator, ValidatorType::DEFINITION);
        assert_eq!(stored.namespace, "ns1");
        assert!(stored.verify_hash().is_ok());
        assert_eq!(node.database.data_count(), 2);
        assert!(node
            .database
            .data_upserts()
            .iter()
            .all(|(_, allow_existing, is_update)| *allow_existing && !*is_update));
        assert_eq!(node.manager("broadcast").broadcasts().len(), 2);
        assert_eq!(or.metrics().definitions_broadcast.get(), 2);
    }

    #[tokio::test]
    async fn message_header_is_a_pinned_system_definition() {
        let node = TestNode::new();
        let or = node.orchestrator();
        let msg = or
            .broadcast_definition("ns1", &json!({"a": 1}), "topic1")
            .await
            .unwrap();
        assert_eq!(msg.header.namespace, "ns1");
        assert_eq!(msg.header.message_type, MessageType::Definition);
        assert_eq!(msg.header.author, "did:loom:node/node1");
        assert_eq!(msg.header.topic, "topic1");
        assert_eq!(msg.header.context, SYSTEM_CONTEXT);
        assert_eq!(msg.header.tx.tx_type, TransactionType::Pin);
        assert_eq!(msg.data.len(), 1);
        assert_eq!(node.manager("broadcast").broadcasts()[0], msg);
    }

    #[tokio::test]
    async fn upsert_failure_is_returned_unchanged() {
        let node = TestNode::new();
        node.database.fail_on("upsert_data", PluginError::failed("pop"));
        let or = node.orchestrator();
        let err = or
            .broadcast_definition("ns1", &json!({}), "topic1")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "pop");
        assert!(node.manager("broadcast").broadcasts().is_empty());
    }

    #[tokio::test]
    async fn broadcast_failure_is_returned_unchanged() {
        let node = TestNode::new();
        node.manager("broadcast")
            .fail_on("broadcast_message", PluginError::failed("pop"));
        let or = node.orchestrator();
        let err = or
            .broadcast_definition("ns1", &json!({}), "topic1")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "pop");
        assert_eq!(or.metrics().definitions_broadcast.get(), 0);
    }

    #[tokio::test]
    async fn datatype_ok() {
        let node = seeded();
        let or = node.orchestrator();
        let mut dt = customer();
        dt.validator = ValidatorType::new("");
        let msg = or.broadcast_datatype("ns1", &mut dt).await.unwrap();

        assert_eq!(dt.namespace, "ns1");
        assert_eq!(dt.validator, ValidatorType::JSON);
        assert_eq!(dt.hash, Some(hash_value(&dt.value)));
        assert_eq!(msg.header.topic, DATATYPE_TOPIC);

        let stored = node.database.data(&msg.data[0].id).unwrap();
        let published: Datatype = serde_json::from_value(stored.value).unwrap();
        assert_eq!(published, dt);
    }

    #[tokio::test]
    async fn datatype_bad_validator() {
        let node = seeded();
        let or = node.orchestrator();
        let mut dt = customer();
        dt.validator = ValidatorType::NONE;
        let err = or.broadcast_datatype("ns1", &mut dt).await.unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::Field(FieldError::UnknownFieldValue { ref field, .. }) if field == "validator"
        ));
        assert!(!node.log.contains("database.get_namespace"));
    }

    #[tokio::test]
    async fn datatype_namespace_missing() {
        let node = TestNode::new();
        let or = node.orchestrator();
        let err = or
            .broadcast_datatype("nope", &mut customer())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "namespace_not_found");
    }

    #[tokio::test]
    async fn datatype_namespace_lookup_fails() {
        let node = TestNode::new();
        node.database
            .fail_on("get_namespace", PluginError::failed("pop"));
        let or = node.orchestrator();
        let err = or
            .broadcast_datatype("ns1", &mut customer())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "pop");
    }

    #[tokio::test]
    async fn datatype_bad_name_and_version() {
        let node = seeded();
        let or = node.orchestrator();

        let mut dt = customer();
        dt.name = "!bad".into();
        let err = or.broadcast_datatype("ns1", &mut dt).await.unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::Field(FieldError::InvalidName { ref field, .. }) if field == "name"
        ));

        let mut dt = customer();
        dt.version = String::new();
        let err = or.broadcast_datatype("ns1", &mut dt).await.unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::Field(FieldError::InvalidName { ref field, .. }) if field == "version"
        ));
        assert_eq!(node.database.data_count(), 0);
    }

    #[tokio::test]
    async fn datatype_missing_value() {
        let node = seeded();
        let or = node.orchestrator();
        let mut dt = customer();
        dt.value = serde_json::Value::Null;
        let err = or.broadcast_datatype("ns1", &mut dt).await.unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::Field(FieldError::MissingRequiredField(ref f)) if f == "value"
        ));
    }

    #[tokio::test]
    async fn namespace_ok() {
        let node = TestNode::new();
        let or = node.orchestrator();
        let mut ns = Namespace::new("ns2", "a new namespace");
        let before = ns.id;
        let msg = or.broadcast_namespace(&mut ns).await.unwrap();
        assert_ne!(ns.id, before);
        assert_eq!(msg.header.namespace, "ns2");
        assert_eq!(msg.header.topic, NAMESPACE_TOPIC);
        let stored = node.database.data(&msg.data[0].id).unwrap();
        assert_eq!(stored.value["name"], "ns2");
    }

    #[tokio::test]
    async fn namespace_bad_name() {
        let node = TestNode::new();
        let or = node.orchestrator();
        let mut ns = Namespace::new("_bad", "");
        let err = or.broadcast_namespace(&mut ns).await.unwrap_err();
        assert_eq!(err.code(), "invalid_field");
    }

    #[tokio::test]
    async fn namespace_description_too_long() {
        let node = TestNode::new();
        let or = node.orchestrator();
        let mut ns = Namespace::new("ns2", "x".repeat(MAX_DESCRIPTION_LENGTH + 1));
        let err = or.broadcast_namespace(&mut ns).await.unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::Field(FieldError::TooLong { max: MAX_DESCRIPTION_LENGTH, .. })
        ));
        assert!(node.manager("broadcast").broadcasts().is_empty());
    }
}
