//! Positional binary encoder

use tracing::{debug, trace};

use crate::types::{FieldDescriptor, FieldType, Record, Schema, Value};
use crate::{CodecError, Result};

/// Encode a record into the schema's positional binary layout.
///
/// The output is always exactly `schema.byte_width()` bytes. Every schema
/// field must be present in the record; nothing is defaulted here. Values
/// that do not fit their field are rejected rather than truncated.
pub fn encode(record: &Record, schema: &Schema) -> Result<Vec<u8>> {
    let mut buffer = vec![0u8; schema.byte_width()];
    let mut cursor = 0usize;

    for field in schema {
        let end = cursor + field.width();
        let value = record.value(&field.name).ok_or_else(|| CodecError::missing_field(&field.name))?;

        encode_field(field, value, &mut buffer[cursor..end])?;
        trace!(field = %field.name, offset = cursor, width = field.width(), %value, "Encoded field");

        cursor = end;
    }

    debug!(fields = schema.len(), bytes = buffer.len(), "Encoded record");
    Ok(buffer)
}

/// Write one value into its zeroed slot of exactly `field.width()` bytes.
fn encode_field(field: &FieldDescriptor, value: &Value, out: &mut [u8]) -> Result<()> {
    match field.field_type {
        FieldType::Int8 => out.copy_from_slice(&(integer(field, value)? as i8).to_le_bytes()),
        FieldType::UInt8 => out.copy_from_slice(&(integer(field, value)? as u8).to_le_bytes()),
        FieldType::Int16 => out.copy_from_slice(&(integer(field, value)? as i16).to_le_bytes()),
        FieldType::UInt16 => out.copy_from_slice(&(integer(field, value)? as u16).to_le_bytes()),
        FieldType::Int32 => out.copy_from_slice(&(integer(field, value)? as i32).to_le_bytes()),
        FieldType::UInt32 => out.copy_from_slice(&(integer(field, value)? as u32).to_le_bytes()),
        FieldType::Float32 => {
            let float = match value {
                Value::Float32(v) => *v,
                Value::Select { .. } => return Err(mismatch(field, "a number", value)),
                other => other
                    .as_f64()
                    .ok_or_else(|| mismatch(field, "a number", other))?
                    as f32,
            };
            out.copy_from_slice(&float.to_le_bytes());
        }
        FieldType::Bool => {
            let flag = value.as_bool().ok_or_else(|| mismatch(field, "a bool", value))?;
            out[0] = flag as u8;
        }
        FieldType::String { length } => {
            let text = value.as_str().ok_or_else(|| mismatch(field, "a string", value))?;
            let bytes = text.as_bytes();
            if bytes.len() > length {
                return Err(CodecError::out_of_range(
                    &field.name,
                    format!("string of {} bytes exceeds slot of {length}", bytes.len()),
                ));
            }
            if bytes.contains(&0) {
                return Err(CodecError::out_of_range(&field.name, "string contains a NUL byte"));
            }
            out[..bytes.len()].copy_from_slice(bytes);
        }
        FieldType::Select => out[0] = select_index(field, value)?,
    }

    Ok(())
}

/// Integer value of any integer variant, checked against the field's range.
fn integer(field: &FieldDescriptor, value: &Value) -> Result<i64> {
    let number = value.as_i64().ok_or_else(|| mismatch(field, "an integer", value))?;
    match field.field_type.integer_range() {
        Some((min, max)) if (min..=max).contains(&number) => Ok(number),
        Some((min, max)) => Err(CodecError::out_of_range(
            &field.name,
            format!("{number} is outside {min}..={max} of {}", field.field_type.tag()),
        )),
        None => Err(mismatch(field, "an integer field", value)),
    }
}

/// Resolve a select value given as an index, a plain integer or an option label.
///
/// Indices past the option list are written as-is so that a record decoded
/// with an unknown option can be sent back unchanged.
fn select_index(field: &FieldDescriptor, value: &Value) -> Result<u8> {
    match value {
        Value::Select { index, .. } => Ok(*index),
        Value::String(label) => field
            .option_index(label)
            .and_then(|index| u8::try_from(index).ok())
            .ok_or_else(|| {
                CodecError::out_of_range(&field.name, format!("'{label}' is not a declared option"))
            }),
        other => Ok(integer(field, other)? as u8),
    }
}

fn mismatch(field: &FieldDescriptor, expected: &str, value: &Value) -> CodecError {
    CodecError::out_of_range(
        &field.name,
        format!("expected {expected} for {} field, got {}", field.field_type.tag(), value.kind()),
    )
}
