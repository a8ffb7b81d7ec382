//! Schema-driven binary codec for embedded device consoles.
//!
//! Confwire converts the densely packed records an embedded device exchanges
//! with its browser console into named key/value records and back, driven by
//! a field schema supplied at runtime rather than generated code.
//!
//! # Features
//!
//! - **Positional codec**: implicit offsets, little-endian numbers, NUL-padded strings
//! - **Runtime schemas**: loaded from the device's JSON (or YAML) artifacts
//! - **Push framing**: timestamp-prefixed dashboard messages
//! - **Bounded history**: decoded push messages kept in a ring buffer
//!
//! ## Example
//!
//! ```rust
//! use confwire::{Record, Schema, Session};
//!
//! let config = Schema::from_json_str(r#"[
//!     {"name": "projectName", "type": "char", "length": 16, "value": "Greenhouse"},
//!     {"name": "interval", "type": "uint16_t", "value": 1000},
//!     {"name": "mode", "type": "select", "options": ["off", "on"]}
//! ]"#)?;
//! let dashboard = Schema::from_json_str(r#"[{"name": "temperature", "type": "float"}]"#)?;
//! let session = Session::new(config, dashboard);
//!
//! let mut record = Record::new();
//! record.insert("projectName", "Shed");
//! record.insert("interval", 250u16);
//! record.insert("mode", "on");
//!
//! let bytes = session.encode_config(&record)?;
//! assert_eq!(bytes.len(), session.config_size());
//!
//! let decoded = session.decode_config(&bytes)?;
//! assert_eq!(decoded.get::<u16>("interval"), Some(250));
//! assert_eq!(decoded.get::<u8>("mode"), Some(1));
//! # Ok::<(), confwire::CodecError>(())
//! ```

// Core types and error handling
pub mod codec;
mod error;
pub mod framing;
pub mod schema;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Push stream handling
pub mod feed;
pub mod history;
pub mod session;
pub mod source;

// Core exports
pub use codec::{decode, encode};
pub use error::*;
pub use types::*;

pub use feed::Feed;
pub use framing::{PushMessage, decode_push, split_header};
pub use history::{DisplayLog, RetentionPolicy};
pub use session::Session;
pub use source::{ChannelSource, MessageSource, ReplaySource};
