//! Test utilities: representative device schemas and records
//!
//! Shared by unit tests and the benchmarks so both exercise the same layouts
//! the firmware ships.

#![cfg(any(test, feature = "benchmark"))]

use crate::types::{FieldDescriptor, FieldType, Record, Schema, Value};

/// Configuration layout resembling a typical device `configuration.json`.
pub fn sample_config_schema() -> Schema {
    Schema::new(vec![
        FieldDescriptor::string("projectName", 32).with_default("ESP8266"),
        FieldDescriptor::string("projectVersion", 8).with_default("1.0"),
        FieldDescriptor::string("language", 3).with_default("en"),
        FieldDescriptor::string("mqttServer", 64),
        FieldDescriptor::new("mqttPort", FieldType::UInt16).with_default(1883u16),
        FieldDescriptor::new("sampleInterval", FieldType::UInt32).with_default(1000u32),
        FieldDescriptor::new("calibration", FieldType::Float32).with_default(1.0f32),
        FieldDescriptor::new("offset", FieldType::Int16).with_default(0i16),
        FieldDescriptor::new("ledEnabled", FieldType::Bool).with_default(true),
        FieldDescriptor::select("mode", ["off", "manual", "auto"]),
        FieldDescriptor::new("retries", FieldType::Int8),
    ])
    .expect("sample config schema is valid")
}

/// Matching configuration record with every field populated.
pub fn sample_config_record() -> Record {
    let mut record = Record::new();
    record.insert("projectName", "Greenhouse");
    record.insert("projectVersion", "2.3.1");
    record.insert("language", "nl");
    record.insert("mqttServer", "broker.local");
    record.insert("mqttPort", 1883u16);
    record.insert("sampleInterval", 60_000u32);
    record.insert("calibration", 0.975f32);
    record.insert("offset", -12i16);
    record.insert("ledEnabled", false);
    record.insert("mode", Value::Select { index: 2, known: true });
    record.insert("retries", -1i8);
    record
}

/// Dashboard layout carried by push messages.
pub fn sample_dashboard_schema() -> Schema {
    Schema::new(vec![
        FieldDescriptor::new("temperature", FieldType::Float32),
        FieldDescriptor::new("humidity", FieldType::Float32),
        FieldDescriptor::new("uptime", FieldType::UInt32),
        FieldDescriptor::new("relay", FieldType::Bool),
        FieldDescriptor::string("status", 16),
    ])
    .expect("sample dashboard schema is valid")
}

/// Build a push message: little-endian timestamp followed by `payload`.
pub fn push_message(timestamp: u32, payload: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(4 + payload.len());
    message.extend_from_slice(&timestamp.to_le_bytes());
    message.extend_from_slice(payload);
    message
}
