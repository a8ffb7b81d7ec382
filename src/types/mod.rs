//! Core types for schema-driven binary records.
//!
//! ## Architecture
//!
//! - [`FieldType`] is the closed set of binary field types, each with a fixed width
//! - [`FieldDescriptor`] names a field and carries its type, select options and default
//! - [`Schema`] is the ordered descriptor list; offsets are running width sums
//! - [`Value`] holds one decoded scalar
//! - [`Record`] maps field names to values in schema order
//! - [`FromValue`] provides typed reads out of a record
//!
//! ## Usage Example
//!
//! ```rust
//! use confwire::types::{FieldDescriptor, FieldType, Schema};
//!
//! let schema = Schema::new(vec![
//!     FieldDescriptor::string("ssid", 32),
//!     FieldDescriptor::new("port", FieldType::UInt16),
//! ])
//! .unwrap();
//!
//! let mut data = vec![0u8; schema.byte_width()];
//! data[..4].copy_from_slice(b"home");
//! data[32..34].copy_from_slice(&8080u16.to_le_bytes());
//!
//! let record = confwire::decode(&data, &schema).unwrap();
//! assert_eq!(record.get::<String>("ssid").as_deref(), Some("home"));
//! assert_eq!(record.get::<u16>("port"), Some(8080));
//! ```

mod field_type;
mod from_value;
mod record;
mod schema;
mod value;

// Re-export all public types
pub use field_type::FieldType;
pub use from_value::FromValue;
pub use record::Record;
pub use schema::{FieldDescriptor, Schema};
pub use value::Value;

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn all_fixed_types() -> Vec<FieldType> {
        vec![
            FieldType::Int8,
            FieldType::UInt8,
            FieldType::Int16,
            FieldType::UInt16,
            FieldType::Int32,
            FieldType::UInt32,
            FieldType::Float32,
            FieldType::Bool,
            FieldType::Select,
        ]
    }

    proptest! {
        #[test]
        fn prop_field_type_widths_correct(field_type in prop::sample::select(all_fixed_types())) {
            let width = field_type.width();
            prop_assert!(width > 0);
            prop_assert!(width <= 4);

            match field_type {
                FieldType::Int8 | FieldType::UInt8 | FieldType::Bool | FieldType::Select => {
                    prop_assert_eq!(width, 1);
                }
                FieldType::Int16 | FieldType::UInt16 => prop_assert_eq!(width, 2),
                FieldType::Int32 | FieldType::UInt32 | FieldType::Float32 => {
                    prop_assert_eq!(width, 4);
                }
                FieldType::String { .. } => unreachable!(),
            }
        }

        #[test]
        fn prop_schema_width_is_sum_of_field_widths(lengths in prop::collection::vec(1usize..64, 0..16)) {
            let fields: Vec<FieldDescriptor> = lengths
                .iter()
                .enumerate()
                .map(|(i, &len)| FieldDescriptor::string(format!("s{i}"), len))
                .collect();
            let schema = Schema::new(fields).unwrap();
            prop_assert_eq!(schema.byte_width(), lengths.iter().sum::<usize>());
        }

        #[test]
        fn prop_integer_range_matches_width(field_type in prop::sample::select(all_fixed_types())) {
            if let Some((min, max)) = field_type.integer_range() {
                let span = (max - min) as u64 + 1;
                prop_assert_eq!(span, 1u64 << (8 * field_type.width()));
            }
        }
    }

    #[test]
    fn string_width_is_declared_length() {
        assert_eq!(FieldType::String { length: 33 }.width(), 33);
        assert_eq!(FieldType::String { length: 33 }.tag(), "char");
    }
}
