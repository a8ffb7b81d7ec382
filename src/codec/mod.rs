//! Schema-driven positional binary codec.
//!
//! Records travel without tags or length prefixes: a field's offset is the
//! sum of the widths of the fields before it, and every multi-byte number is
//! little-endian, matching the device's native layout.
//!
//! - [`decode`] walks the schema with a read cursor and builds a [`Record`]
//! - [`encode`] mirrors it, writing each value at its implicit offset
//!
//! Both are synchronous, allocate only their own output, and never retry.
//!
//! ```rust
//! use confwire::types::{FieldDescriptor, FieldType, Schema};
//! use confwire::{decode, encode};
//!
//! let schema = Schema::new(vec![
//!     FieldDescriptor::string("s", 8),
//!     FieldDescriptor::new("x", FieldType::UInt16),
//! ])
//! .unwrap();
//!
//! let record = decode(b"abc\0\0\0\0\0\x01\x02", &schema).unwrap();
//! assert_eq!(record.get::<u16>("x"), Some(513));
//! assert_eq!(encode(&record, &schema).unwrap(), b"abc\0\0\0\0\0\x01\x02");
//! ```
//!
//! [`Record`]: crate::types::Record

mod decode;
mod encode;

pub use decode::decode;
pub use encode::encode;
