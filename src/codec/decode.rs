//! Positional binary decoder

use tracing::{debug, trace};

use crate::types::{FieldDescriptor, FieldType, Record, Schema, Value};
use crate::{CodecError, Result};

/// Decode a raw buffer into a record, walking the schema in order.
///
/// Every field is read at the running offset of the widths before it, using
/// little-endian byte order. The decode is atomic: if any field cannot be
/// fully read, no record is produced and the error names that field.
/// Bytes past the schema's width are ignored.
pub fn decode(buffer: &[u8], schema: &Schema) -> Result<Record> {
    let mut record = Record::with_capacity(schema.len());
    let mut cursor = 0usize;

    for field in schema {
        let end = cursor
            .checked_add(field.width())
            .ok_or_else(|| CodecError::truncated(&field.name, field.width()))?;
        let bytes = buffer
            .get(cursor..end)
            .ok_or_else(|| CodecError::truncated(&field.name, end - buffer.len()))?;

        let value = decode_field(field, bytes);
        trace!(field = %field.name, offset = cursor, width = field.width(), %value, "Decoded field");

        if value.is_unknown_option() {
            debug!(field = %field.name, %value, "Select index outside declared options");
        }

        record.insert(field.name.as_str(), value);
        cursor = end;
    }

    if cursor < buffer.len() {
        trace!(trailing = buffer.len() - cursor, "Ignoring bytes past schema width");
    }

    debug!(fields = record.len(), bytes = cursor, "Decoded record");
    Ok(record)
}

/// Interpret exactly `field.width()` bytes according to the field type.
fn decode_field(field: &FieldDescriptor, bytes: &[u8]) -> Value {
    match field.field_type {
        FieldType::Int8 => Value::Int8(bytes[0] as i8),
        FieldType::UInt8 => Value::UInt8(bytes[0]),
        FieldType::Int16 => Value::Int16(i16::from_le_bytes(le(bytes))),
        FieldType::UInt16 => Value::UInt16(u16::from_le_bytes(le(bytes))),
        FieldType::Int32 => Value::Int32(i32::from_le_bytes(le(bytes))),
        FieldType::UInt32 => Value::UInt32(u32::from_le_bytes(le(bytes))),
        FieldType::Float32 => Value::Float32(f32::from_le_bytes(le(bytes))),
        FieldType::Bool => Value::Bool(bytes[0] != 0),
        FieldType::String { .. } => Value::String(c_string_to_string(bytes)),
        FieldType::Select => {
            let index = bytes[0];
            Value::Select { index, known: (index as usize) < field.options.len() }
        }
    }
}

fn le<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}

/// Convert a NUL-padded character slot to a Rust `String`.
fn c_string_to_string(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
