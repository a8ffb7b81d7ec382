//! Runtime values held by decoded records

use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime value type that can hold any decoded field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum Value {
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Float32(f32),
    Bool(bool),
    String(String),
    /// Option index of a select field. `known` is false when the device sent
    /// an index outside the declared option list.
    Select { index: u8, known: bool },
}

impl Value {
    /// Integer view of any integer variant, including select indices.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int8(v) => Some(v as i64),
            Value::UInt8(v) => Some(v as i64),
            Value::Int16(v) => Some(v as i64),
            Value::UInt16(v) => Some(v as i64),
            Value::Int32(v) => Some(v as i64),
            Value::UInt32(v) => Some(v as i64),
            Value::Select { index, .. } => Some(index as i64),
            Value::Float32(_) | Value::Bool(_) | Value::String(_) => None,
        }
    }

    /// Floating point view of numeric variants.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float32(v) => Some(*v as f64),
            other => other.as_i64().map(|v| v as f64),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    /// True for select values whose index has no matching option label.
    pub fn is_unknown_option(&self) -> bool {
        matches!(self, Value::Select { known: false, .. })
    }

    /// Short name of the variant, used in error details.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int8(_) => "int8",
            Value::UInt8(_) => "uint8",
            Value::Int16(_) => "int16",
            Value::UInt16(_) => "uint16",
            Value::Int32(_) => "int32",
            Value::UInt32(_) => "uint32",
            Value::Float32(_) => "float32",
            Value::Bool(_) => "bool",
            Value::String(_) => "string",
            Value::Select { .. } => "select",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Float32(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v),
            Value::Select { index, known: true } => write!(f, "{index}"),
            Value::Select { index, known: false } => write!(f, "{index} (unknown)"),
            other => match other.as_i64() {
                Some(v) => write!(f, "{v}"),
                None => Ok(()),
            },
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float32(value)
    }
}

macro_rules! value_from_int {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

value_from_int! {
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
}
