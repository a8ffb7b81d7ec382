//! Field descriptor and schema types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use super::{FieldType, Value};

/// Description of a single field in a binary record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct FieldDescriptor {
    /// Lookup key of the field
    pub name: String,
    /// Binary type, which also fixes the field width
    pub field_type: FieldType,
    /// Option labels of a select field, in index order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Value shipped with the configuration artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Human-facing label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self { name: name.into(), field_type, options: Vec::new(), default: None, label: None }
    }

    /// Fixed-length, NUL-padded string field.
    pub fn string(name: impl Into<String>, length: usize) -> Self {
        Self::new(name, FieldType::String { length })
    }

    /// Select field with the given option labels.
    pub fn select<I, S>(name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut field = Self::new(name, FieldType::Select);
        field.options = options.into_iter().map(Into::into).collect();
        field
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Number of bytes the field occupies.
    pub fn width(&self) -> usize {
        self.field_type.width()
    }

    /// Label of a select option, if the index is declared.
    pub fn option_label(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    /// Index of a select option label.
    pub fn option_index(&self, label: &str) -> Option<usize> {
        self.options.iter().position(|option| option == label)
    }
}

/// Ordered list of field descriptors defining a binary record layout.
///
/// Field order determines byte offsets: each field starts where the previous
/// one ends. A schema is immutable once built and is shared as `Arc<Schema>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
    /// Last position of every field name
    index: HashMap<String, usize>,
    byte_width: usize,
}

impl Schema {
    /// Longest string slot a schema may declare.
    pub const MAX_STRING_LENGTH: usize = u16::MAX as usize;

    /// Create a new Schema with validation.
    pub fn new(fields: Vec<FieldDescriptor>) -> crate::Result<Self> {
        let mut index = HashMap::with_capacity(fields.len());
        for (position, field) in fields.iter().enumerate() {
            if index.insert(field.name.clone(), position).is_some() {
                warn!(name = %field.name, "Duplicate field name in schema");
            }
        }

        let mut schema = Self { fields, index, byte_width: 0 };
        schema.validate()?;
        schema.byte_width = schema
            .fields
            .iter()
            .try_fold(0usize, |total, field| total.checked_add(field.width()))
            .ok_or_else(|| {
                crate::CodecError::parse_error("Schema validation", "Record width overflows usize")
            })?;
        Ok(schema)
    }

    /// Validate the parts of the schema decoding depends on.
    pub fn validate(&self) -> crate::Result<()> {
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(crate::CodecError::parse_error(
                    "Schema validation",
                    "Field with empty name",
                ));
            }

            match field.field_type {
                FieldType::String { length: 0 } => {
                    return Err(crate::CodecError::parse_error(
                        "Schema validation",
                        format!("String field '{}' has length 0", field.name),
                    ));
                }
                FieldType::String { length } if length > Self::MAX_STRING_LENGTH => {
                    return Err(crate::CodecError::parse_error(
                        "Schema validation",
                        format!(
                            "String field '{}' length {length} exceeds {}",
                            field.name,
                            Self::MAX_STRING_LENGTH
                        ),
                    ));
                }
                FieldType::Select if field.options.is_empty() => {
                    return Err(crate::CodecError::parse_error(
                        "Schema validation",
                        format!("Select field '{}' declares no options", field.name),
                    ));
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Fields in layout order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }

    /// Get a field by name. With duplicate names the last one wins, matching
    /// the decoded record.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.index.get(name).map(|&position| &self.fields[position])
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Byte offset of a field, computed from the widths before it.
    pub fn offset_of(&self, name: &str) -> Option<usize> {
        let position = *self.index.get(name)?;
        Some(self.fields[..position].iter().map(FieldDescriptor::width).sum())
    }

    /// Total number of bytes a record of this schema occupies.
    pub fn byte_width(&self) -> usize {
        self.byte_width
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
