//! Typed extraction from decoded values

use super::Value;
use crate::{CodecError, Result};

/// Trait for types that can be read out of a decoded [`Value`].
///
/// Integer targets accept any integer variant whose value fits the target,
/// so `u32` can be read from a `UInt16` field without caring about the
/// exact width the device uses.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self>;
}

fn conversion_error(expected: &str, value: &Value) -> CodecError {
    CodecError::parse_error(
        "Value conversion",
        format!("Expected {expected}, got {} ({value})", value.kind()),
    )
}

macro_rules! from_value_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Result<Self> {
                    value
                        .as_i64()
                        .and_then(|v| <$ty>::try_from(v).ok())
                        .ok_or_else(|| conversion_error(stringify!($ty), value))
                }
            }
        )*
    };
}

from_value_int!(i8, u8, i16, u16, i32, u32, i64);

impl FromValue for f32 {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_f64().map(|v| v as f32).ok_or_else(|| conversion_error("f32", value))
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_f64().ok_or_else(|| conversion_error("f64", value))
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_bool().ok_or_else(|| conversion_error("bool", value))
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self> {
        value.as_str().map(str::to_string).ok_or_else(|| conversion_error("string", value))
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}
