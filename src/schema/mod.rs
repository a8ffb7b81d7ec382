//! Schema loading from configuration artifacts.
//!
//! A session loads two layouts once at startup: the configuration record
//! fetched and written back over HTTP, and the dashboard record carried by
//! push messages. Both use the same artifact format, parsed here into
//! immutable [`Schema`](crate::types::Schema) values.
//!
//! Loading validates only what decoding depends on (known types, string
//! lengths, select options, defaults that fit their field). Duplicate names
//! are accepted and logged.

mod loader;
