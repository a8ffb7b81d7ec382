//! Console session holding the configuration and dashboard schemas.

use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::codec::{decode, encode};
use crate::feed::Feed;
use crate::framing::{self, PushMessage};
use crate::history::RetentionPolicy;
use crate::source::MessageSource;
use crate::types::{Record, Schema};
use crate::{CodecError, Result};

const DEFAULT_PROJECT_NAME: &str = "ESP8266";
const DEFAULT_LANGUAGE: &str = "en";

/// Schemas of one device session.
///
/// Both schemas are loaded once and shared read-only for the lifetime of the
/// session, so a `Session` can be cloned cheaply and used from any thread.
#[derive(Debug, Clone)]
pub struct Session {
    config: Arc<Schema>,
    dashboard: Arc<Schema>,
}

impl Session {
    pub fn new(config: Schema, dashboard: Schema) -> Self {
        Self { config: Arc::new(config), dashboard: Arc::new(dashboard) }
    }

    /// Load both schema artifacts from disk.
    pub fn load<P, Q>(config_path: P, dashboard_path: Q) -> Result<Self>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let config = Schema::from_path(config_path)?;
        let dashboard = Schema::from_path(dashboard_path)?;
        info!(
            config_fields = config.len(),
            config_bytes = config.byte_width(),
            dashboard_fields = dashboard.len(),
            dashboard_bytes = dashboard.byte_width(),
            "Session schemas loaded"
        );
        Ok(Self::new(config, dashboard))
    }

    pub fn config_schema(&self) -> &Arc<Schema> {
        &self.config
    }

    pub fn dashboard_schema(&self) -> &Arc<Schema> {
        &self.dashboard
    }

    /// Size in bytes of the configuration record the device exchanges.
    pub fn config_size(&self) -> usize {
        self.config.byte_width()
    }

    /// Decode a configuration buffer fetched from the device.
    pub fn decode_config(&self, buffer: &[u8]) -> Result<Record> {
        decode(buffer, &self.config)
    }

    /// Encode an edited configuration record for upload.
    pub fn encode_config(&self, record: &Record) -> Result<Vec<u8>> {
        encode(record, &self.config)
    }

    /// Decode a timestamped push message against the dashboard schema.
    pub fn decode_push(&self, message: &[u8]) -> Result<PushMessage> {
        framing::decode_push(message, &self.dashboard)
    }

    /// Build a complete configuration record in schema order, taking values
    /// from `record` and falling back to the schema defaults.
    pub fn complete_record(&self, record: &Record) -> Result<Record> {
        let mut complete = Record::with_capacity(self.config.len());
        for field in self.config.iter() {
            let value = record
                .value(&field.name)
                .or(field.default.as_ref())
                .ok_or_else(|| CodecError::missing_field(&field.name))?;
            complete.insert(field.name.as_str(), value.clone());
        }
        Ok(complete)
    }

    /// Configuration record made of schema defaults only.
    pub fn default_config(&self) -> Result<Record> {
        self.complete_record(&Record::new())
    }

    /// Project name from the record, else the schema default, else `"ESP8266"`.
    pub fn project_name(&self, record: &Record) -> String {
        self.config_string(record, "projectName").unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string())
    }

    /// Project version from the record, else the schema default, else empty.
    pub fn project_version(&self, record: &Record) -> String {
        self.config_string(record, "projectVersion").unwrap_or_default()
    }

    /// Console language code from the schema default, else `"en"`.
    pub fn language(&self) -> String {
        self.config_string(&Record::new(), "language")
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
    }

    fn config_string(&self, record: &Record, name: &str) -> Option<String> {
        record.get::<String>(name).or_else(|| {
            self.config
                .field(name)
                .and_then(|field| field.default.as_ref())
                .and_then(|value| value.as_str().map(str::to_string))
        })
    }

    /// Start decoding push messages from `source` into a bounded display log.
    pub fn attach_feed<S: MessageSource>(&self, source: S, policy: RetentionPolicy) -> Feed {
        Feed::spawn(source, Arc::clone(&self.dashboard), policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ReplaySource;
    use crate::types::{FieldDescriptor, FieldType, Value};

    fn session() -> Session {
        let config = Schema::new(vec![
            FieldDescriptor::string("projectName", 16).with_default("Greenhouse"),
            FieldDescriptor::string("projectVersion", 8),
            FieldDescriptor::new("interval", FieldType::UInt16).with_default(1000u16),
            FieldDescriptor::select("mode", ["off", "on"]),
        ])
        .unwrap();
        let dashboard = Schema::new(vec![
            FieldDescriptor::new("temperature", FieldType::Float32),
            FieldDescriptor::new("heater", FieldType::Bool),
        ])
        .unwrap();
        Session::new(config, dashboard)
    }

    #[test]
    fn shared_types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<Schema>();
        assert_send_sync::<Record>();
        assert_send_sync::<Session>();
        assert_send_sync::<PushMessage>();
        assert_send_sync::<Feed>();
        assert_send_sync::<crate::history::DisplayLog>();
    }

    #[test]
    fn config_codec_is_usable_across_threads() {
        let session = session();
        let mut record = Record::new();
        record.insert("projectName", "Shed");
        record.insert("projectVersion", "2.1");
        record.insert("interval", 250u16);
        record.insert("mode", 1u8);
        let bytes = session.encode_config(&record).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let session = session.clone();
                let bytes = bytes.clone();
                std::thread::spawn(move || session.decode_config(&bytes).unwrap())
            })
            .collect();
        for handle in handles {
            let decoded = handle.join().unwrap();
            assert_eq!(decoded.get::<u16>("interval"), Some(250));
            assert_eq!(decoded.get::<u8>("mode"), Some(1));
        }
    }

    #[test]
    fn config_round_trip() {
        let session = session();
        assert_eq!(session.config_size(), 16 + 8 + 2 + 1);

        let mut record = Record::new();
        record.insert("projectName", "Shed");
        record.insert("projectVersion", "2.1");
        record.insert("interval", 250u16);
        record.insert("mode", Value::Select { index: 1, known: true });

        let bytes = session.encode_config(&record).unwrap();
        assert_eq!(bytes.len(), session.config_size());
        assert_eq!(session.decode_config(&bytes).unwrap(), record);
    }

    #[test]
    fn complete_record_fills_defaults_in_schema_order() {
        let session = session();
        let mut partial = Record::new();
        partial.insert("mode", 0u8);
        partial.insert("projectVersion", "0.9");

        let complete = session.complete_record(&partial).unwrap();
        assert_eq!(
            complete.names().collect::<Vec<_>>(),
            ["projectName", "projectVersion", "interval", "mode"]
        );
        assert_eq!(complete.get::<String>("projectName").as_deref(), Some("Greenhouse"));
        assert_eq!(complete.get::<u16>("interval"), Some(1000));

        let err = session.default_config().unwrap_err();
        assert!(matches!(err, CodecError::MissingField { ref field } if field == "projectVersion"));
    }

    #[test]
    fn project_identity_falls_back_to_defaults() {
        let session = session();
        let empty = Record::new();
        assert_eq!(session.project_name(&empty), "Greenhouse");
        assert_eq!(session.project_version(&empty), "");
        assert_eq!(session.language(), "en");

        let mut record = Record::new();
        record.insert("projectName", "Shed");
        record.insert("projectVersion", "2.1");
        assert_eq!(session.project_name(&record), "Shed");
        assert_eq!(session.project_version(&record), "2.1");

        let bare = Session::new(Schema::new(Vec::new()).unwrap(), Schema::new(Vec::new()).unwrap());
        assert_eq!(bare.project_name(&empty), "ESP8266");
    }

    #[test]
    fn push_messages_use_dashboard_schema() {
        let session = session();
        let mut message = 100u32.to_le_bytes().to_vec();
        message.extend_from_slice(&18.25f32.to_le_bytes());
        message.push(0);

        let push = session.decode_push(&message).unwrap();
        assert_eq!(push.timestamp, 100);
        assert_eq!(push.record.get::<f32>("temperature"), Some(18.25));
        assert_eq!(push.record.get::<bool>("heater"), Some(false));
    }

    #[tokio::test]
    async fn attached_feed_decodes_against_dashboard() {
        let session = session();
        let mut message = 7u32.to_le_bytes().to_vec();
        message.extend_from_slice(&21.0f32.to_le_bytes());
        message.push(1);

        let feed = session.attach_feed(ReplaySource::new(vec![message]), RetentionPolicy::new(8));
        feed.finished().await;
        let latest = feed.latest().unwrap();
        assert_eq!(latest.timestamp, 7);
        assert_eq!(latest.record.get::<bool>("heater"), Some(true));
    }
}
