//! Configuration artifact parsing
//!
//! The device firmware build ships its record layouts as JSON arrays such as
//!
//! ```json
//! [
//!     {"name": "projectName", "type": "char", "length": 32, "value": "ESP8266"},
//!     {"name": "port", "type": "uint16_t", "value": 80},
//!     {"name": "mode", "type": "select", "options": ["off", "on"]}
//! ]
//! ```
//!
//! Entries may carry UI hints (`control`, `min`, `max`, ...) which are ignored.

use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use crate::types::{FieldDescriptor, FieldType, Schema, Value};
use crate::{CodecError, Result};

/// One entry of a configuration artifact.
#[derive(Debug, Deserialize)]
struct RawField {
    name: String,
    #[serde(rename = "type")]
    type_tag: String,
    #[serde(default, alias = "size")]
    length: Option<usize>,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    value: Option<serde_json::Value>,
    #[serde(default)]
    label: Option<String>,
}

impl RawField {
    fn into_descriptor(self) -> Result<FieldDescriptor> {
        let field_type = parse_type_tag(&self.name, &self.type_tag, self.length)?;

        let mut field = FieldDescriptor::new(self.name, field_type);
        field.options = self.options;
        field.label = self.label;
        if let Some(raw) = &self.value {
            field.default = Some(default_value(&field, raw)?);
        }

        Ok(field)
    }
}

/// Map an artifact type tag to a [`FieldType`]. Both the plain names and the
/// C type names used by the firmware are accepted.
fn parse_type_tag(name: &str, tag: &str, length: Option<usize>) -> Result<FieldType> {
    let field_type = match tag {
        "int8" | "int8_t" => FieldType::Int8,
        "uint8" | "uint8_t" => FieldType::UInt8,
        "int16" | "int16_t" => FieldType::Int16,
        "uint16" | "uint16_t" => FieldType::UInt16,
        "int32" | "int32_t" => FieldType::Int32,
        "uint32" | "uint32_t" => FieldType::UInt32,
        "float32" | "float" => FieldType::Float32,
        "bool" => FieldType::Bool,
        "select" => FieldType::Select,
        "string" | "char" => match length {
            Some(length) => FieldType::String { length },
            None => {
                return Err(CodecError::parse_error(
                    "Schema artifact",
                    format!("String field '{name}' has no length"),
                ));
            }
        },
        other => {
            return Err(CodecError::parse_error(
                "Schema artifact",
                format!("Field '{name}' has unknown type '{other}'"),
            ));
        }
    };

    Ok(field_type)
}

/// Convert an artifact default into a value of the field's type.
fn default_value(field: &FieldDescriptor, raw: &serde_json::Value) -> Result<Value> {
    let invalid = || {
        CodecError::parse_error(
            "Schema artifact",
            format!("Default {raw} does not fit {} field '{}'", field.field_type.tag(), field.name),
        )
    };

    let integer = || -> Result<i64> {
        let number = raw.as_i64().ok_or_else(invalid)?;
        match field.field_type.integer_range() {
            Some((min, max)) if (min..=max).contains(&number) => Ok(number),
            _ => Err(invalid()),
        }
    };

    let value = match field.field_type {
        FieldType::Int8 => Value::Int8(integer()? as i8),
        FieldType::UInt8 => Value::UInt8(integer()? as u8),
        FieldType::Int16 => Value::Int16(integer()? as i16),
        FieldType::UInt16 => Value::UInt16(integer()? as u16),
        FieldType::Int32 => Value::Int32(integer()? as i32),
        FieldType::UInt32 => Value::UInt32(integer()? as u32),
        FieldType::Float32 => Value::Float32(raw.as_f64().ok_or_else(invalid)? as f32),
        FieldType::Bool => Value::Bool(raw.as_bool().ok_or_else(invalid)?),
        FieldType::String { length } => {
            let text = raw.as_str().ok_or_else(invalid)?;
            if text.len() > length {
                return Err(invalid());
            }
            Value::String(text.to_string())
        }
        FieldType::Select => {
            let index = match raw.as_str() {
                Some(label) => field.option_index(label).ok_or_else(invalid)? as i64,
                None => integer()?,
            };
            let index = u8::try_from(index).map_err(|_| invalid())?;
            Value::Select { index, known: (index as usize) < field.options.len() }
        }
    };

    Ok(value)
}

fn build(raw_fields: Vec<RawField>) -> Result<Schema> {
    let fields = raw_fields.into_iter().map(RawField::into_descriptor).collect::<Result<Vec<_>>>()?;
    let schema = Schema::new(fields)?;
    debug!(fields = schema.len(), bytes = schema.byte_width(), "Loaded schema");
    Ok(schema)
}

impl Schema {
    /// Parse a schema from the device's JSON artifact format.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: Vec<RawField> = serde_json::from_str(json).map_err(|e| {
            CodecError::parse_error("Schema JSON deserialization", e.to_string())
        })?;
        build(raw)
    }

    /// Parse a schema from a YAML list using the same entry keys as the JSON format.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let raw: Vec<RawField> = serde_yaml_ng::from_str(yaml).map_err(|e| {
            CodecError::parse_error("Schema YAML deserialization", e.to_string())
        })?;
        build(raw)
    }

    /// Load a schema file. `.yaml`/`.yml` files are read as YAML, anything else as JSON.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| CodecError::file_error(path.to_path_buf(), e))?;

        debug!("Loading schema from {}", path.display());
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&text),
            _ => Self::from_json_str(&text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIGURATION: &str = r#"[
        {"name": "projectName", "label": "Project name", "type": "char", "length": 32, "value": "ESP8266"},
        {"name": "projectVersion", "type": "char", "length": 8, "value": "1.0"},
        {"name": "language", "type": "char", "length": 3, "value": "en"},
        {"name": "port", "type": "uint16_t", "value": 80, "control": "number", "min": 1},
        {"name": "offset", "type": "int8", "value": -3},
        {"name": "gain", "type": "float", "value": 1.5},
        {"name": "enabled", "type": "bool", "value": true},
        {"name": "mode", "type": "select", "options": ["off", "on", "auto"], "value": "auto"}
    ]"#;

    #[test]
    fn device_json_format_loads_with_defaults() {
        let schema = Schema::from_json_str(CONFIGURATION).unwrap();
        assert_eq!(schema.len(), 8);
        assert_eq!(schema.byte_width(), 32 + 8 + 3 + 2 + 1 + 4 + 1 + 1);

        let name = schema.field("projectName").unwrap();
        assert_eq!(name.field_type, FieldType::String { length: 32 });
        assert_eq!(name.default, Some(Value::from("ESP8266")));
        assert_eq!(name.label.as_deref(), Some("Project name"));

        assert_eq!(schema.field("port").unwrap().default, Some(Value::UInt16(80)));
        assert_eq!(schema.field("offset").unwrap().default, Some(Value::Int8(-3)));
        assert_eq!(schema.field("gain").unwrap().default, Some(Value::Float32(1.5)));
        assert_eq!(schema.field("enabled").unwrap().default, Some(Value::Bool(true)));
        assert_eq!(
            schema.field("mode").unwrap().default,
            Some(Value::Select { index: 2, known: true })
        );
    }

    #[test]
    fn yaml_uses_the_same_entry_keys() {
        let yaml = "- name: x\n  type: uint16\n- name: s\n  type: string\n  size: 8\n  value: abc\n";
        let schema = Schema::from_yaml_str(yaml).unwrap();
        assert_eq!(schema.offset_of("s"), Some(2));
        assert_eq!(schema.field("s").unwrap().default, Some(Value::from("abc")));
    }

    #[test]
    fn invalid_artifacts_are_parse_errors() {
        let cases = [
            r#"[{"name": "s", "type": "char"}]"#,
            r#"[{"name": "x", "type": "uint64_t"}]"#,
            r#"[{"name": "x", "type": "uint8_t", "value": 300}]"#,
            r#"[{"name": "x", "type": "bool", "value": "yes"}]"#,
            r#"[{"name": "s", "type": "char", "length": 2, "value": "abc"}]"#,
            r#"[{"name": "m", "type": "select", "options": ["a"], "value": "b"}]"#,
            r#"[{"name": "m", "type": "select"}]"#,
            r#"[{"name": "x", "type": "uint8_t"}, {"name": "s", "type": "char", "length": 18446744073709551615}]"#,
            r#"[{"name": "s", "type": "char", "length": 65536}]"#,
            r#"{"name": "x"}"#,
        ];
        for case in cases {
            let result = Schema::from_json_str(case);
            assert!(matches!(result, Err(CodecError::Parse { .. })), "expected parse error for {case}");
        }
    }

    #[test]
    fn missing_file_is_a_file_error() {
        let err = Schema::from_path("/nonexistent/configuration.json").unwrap_err();
        assert!(matches!(err, CodecError::File { .. }));
    }

    #[test]
    fn extension_selects_the_parser() -> anyhow::Result<()> {
        use anyhow::Context;

        let dir = std::env::temp_dir().join(format!("confwire-loader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).context("creating schema directory")?;

        let yaml_path = dir.join("dashboard.yml");
        std::fs::write(&yaml_path, "- name: level\n  type: uint8\n").context("writing YAML")?;
        let json_path = dir.join("dashboard.json");
        std::fs::write(&json_path, r#"[{"name": "level", "type": "uint8_t"}]"#)
            .context("writing JSON")?;

        let from_yaml = Schema::from_path(&yaml_path).context("loading YAML schema")?;
        let from_json = Schema::from_path(&json_path).context("loading JSON schema")?;
        assert_eq!(from_yaml, from_json);
        Ok(())
    }
}
