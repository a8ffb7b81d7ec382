//! Field type definitions

use serde::{Deserialize, Serialize};

/// Closed set of field types a device record can carry.
///
/// The width of every variant is fixed by the type itself; strings carry
/// their declared slot length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum FieldType {
    /// 8-bit signed integer (`int8_t`)
    Int8,
    /// 8-bit unsigned integer (`uint8_t`)
    UInt8,
    /// 16-bit signed integer (`int16_t`)
    Int16,
    /// 16-bit unsigned integer (`uint16_t`)
    UInt16,
    /// 32-bit signed integer (`int32_t`)
    Int32,
    /// 32-bit unsigned integer (`uint32_t`)
    UInt32,
    /// 32-bit IEEE-754 float (`float`)
    Float32,
    /// Single byte boolean, nonzero is true
    Bool,
    /// NUL-padded character slot of a fixed length (`char[length]`)
    String { length: usize },
    /// Single byte index into the field's option labels
    Select,
}

impl FieldType {
    /// Returns the size in bytes this type occupies in a record.
    pub const fn width(&self) -> usize {
        match self {
            FieldType::Int8 | FieldType::UInt8 | FieldType::Bool | FieldType::Select => 1,
            FieldType::Int16 | FieldType::UInt16 => 2,
            FieldType::Int32 | FieldType::UInt32 | FieldType::Float32 => 4,
            FieldType::String { length } => *length,
        }
    }

    /// Inclusive integer range representable by this type, if it is an integer type.
    pub const fn integer_range(&self) -> Option<(i64, i64)> {
        match self {
            FieldType::Int8 => Some((i8::MIN as i64, i8::MAX as i64)),
            FieldType::UInt8 | FieldType::Select => Some((0, u8::MAX as i64)),
            FieldType::Int16 => Some((i16::MIN as i64, i16::MAX as i64)),
            FieldType::UInt16 => Some((0, u16::MAX as i64)),
            FieldType::Int32 => Some((i32::MIN as i64, i32::MAX as i64)),
            FieldType::UInt32 => Some((0, u32::MAX as i64)),
            FieldType::Float32 | FieldType::Bool | FieldType::String { .. } => None,
        }
    }

    /// Tag used by the device's configuration artifacts.
    pub fn tag(&self) -> &'static str {
        match self {
            FieldType::Int8 => "int8_t",
            FieldType::UInt8 => "uint8_t",
            FieldType::Int16 => "int16_t",
            FieldType::UInt16 => "uint16_t",
            FieldType::Int32 => "int32_t",
            FieldType::UInt32 => "uint32_t",
            FieldType::Float32 => "float",
            FieldType::Bool => "bool",
            FieldType::String { .. } => "char",
            FieldType::Select => "select",
        }
    }
}
