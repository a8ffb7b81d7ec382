//! Push message framing.
//!
//! Push-style messages carry a 4-byte little-endian timestamp followed
//! directly by a record encoded against the dashboard schema. Message
//! boundaries come from the transport; there is no length field.

use serde::Serialize;

use crate::codec::decode;
use crate::types::{Record, Schema};
use crate::{CodecError, Result};

/// Size of the timestamp header in bytes.
pub const HEADER_LEN: usize = 4;

/// A decoded push message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushMessage {
    /// Device timestamp (millisecond counter, wraps at `u32::MAX`)
    pub timestamp: u32,
    /// Dashboard record carried by the message
    pub record: Record,
}

/// Split a push message into its timestamp and payload.
pub fn split_header(message: &[u8]) -> Result<(u32, &[u8])> {
    if message.len() < HEADER_LEN {
        return Err(CodecError::truncated("timestamp", HEADER_LEN - message.len()));
    }

    let (header, payload) = message.split_at(HEADER_LEN);
    let timestamp = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    Ok((timestamp, payload))
}

/// Strip the timestamp header and decode the payload against `schema`.
pub fn decode_push(message: &[u8], schema: &Schema) -> Result<PushMessage> {
    let (timestamp, payload) = split_header(message)?;
    let record = decode(payload, schema)?;
    Ok(PushMessage { timestamp, record })
}
