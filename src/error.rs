//! Error types for the binary codec.
//!
//! All errors implement `std::error::Error` and carry the field or artifact
//! they relate to, so a console can point the user at the offending entry.
//!
//! ## Error Categories
//!
//! - **Decode Errors**: buffer shorter than the schema requires
//! - **Encode Errors**: missing record keys, values that do not fit their field
//! - **Schema Errors**: malformed configuration artifacts or unreadable files
//! - **Source Errors**: failures reported by a push message source
//!
//! Binary mismatches are never transient, so only source failures are
//! classified as retryable:
//!
//! ```rust
//! use confwire::CodecError;
//!
//! let error = CodecError::truncated("port", 2);
//! assert!(!error.is_retryable());
//! for suggestion in error.recovery_suggestions() {
//!     println!("  - {}", suggestion);
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T, E = CodecError> = std::result::Result<T, E>;

/// Main error type for codec operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CodecError {
    #[error("Buffer truncated at field '{field}': {missing} byte(s) missing")]
    TruncatedBuffer { field: String, missing: usize },

    #[error("Record is missing field '{field}'")]
    MissingField { field: String },

    #[error("Value for field '{field}' is out of range: {details}")]
    ValueOutOfRange { field: String, details: String },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("Schema file error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Message source failed: {reason}")]
    Source {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl CodecError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            CodecError::TruncatedBuffer { .. } => false,
            CodecError::MissingField { .. } => false,
            CodecError::ValueOutOfRange { .. } => false,
            CodecError::Parse { .. } => false,
            CodecError::File { .. } => false,
            CodecError::Source { .. } => true,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            CodecError::TruncatedBuffer { .. } => vec![
                "Re-fetch the buffer from the device",
                "Check that the schema matches the device firmware",
                "Compare the schema byte width with the received length",
            ],
            CodecError::MissingField { .. } => vec![
                "Start from a record decoded from the device",
                "Fill missing fields from schema defaults",
            ],
            CodecError::ValueOutOfRange { .. } => vec![
                "Check the value against the field's type and width",
                "Shorten strings to fit the declared length",
                "Pick one of the declared options for select fields",
            ],
            CodecError::Parse { .. } => vec![
                "Check the configuration artifact syntax",
                "Verify every entry has a name and a known type",
                "Declare a length for string fields and options for select fields",
            ],
            CodecError::File { .. } => vec![
                "Check file exists and is readable",
                "Check file permissions",
            ],
            CodecError::Source { .. } => vec![
                "Check the device is reachable",
                "Reconnect the push socket",
            ],
        }
    }

    /// Helper constructor for truncated buffer errors.
    pub fn truncated(field: impl Into<String>, missing: usize) -> Self {
        CodecError::TruncatedBuffer { field: field.into(), missing }
    }

    /// Helper constructor for missing record fields.
    pub fn missing_field(field: impl Into<String>) -> Self {
        CodecError::MissingField { field: field.into() }
    }

    /// Helper constructor for values that do not fit their field.
    pub fn out_of_range(field: impl Into<String>, details: impl Into<String>) -> Self {
        CodecError::ValueOutOfRange { field: field.into(), details: details.into() }
    }

    /// Helper constructor for schema artifact parse errors.
    pub fn parse_error(context: impl Into<String>, details: impl Into<String>) -> Self {
        CodecError::Parse { context: context.into(), details: details.into() }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        CodecError::File { path, source }
    }

    /// Helper constructor for message source failures.
    pub fn source_failed(reason: impl Into<String>) -> Self {
        CodecError::Source { reason: reason.into(), source: None }
    }

    /// Helper constructor for message source failures with an underlying cause.
    pub fn source_failed_with(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        CodecError::Source { reason: reason.into(), source: Some(source) }
    }

    /// Name of the schema field this error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            CodecError::TruncatedBuffer { field, .. }
            | CodecError::MissingField { field }
            | CodecError::ValueOutOfRange { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        CodecError::File { path: PathBuf::from("<unknown>"), source: err }
    }
}
