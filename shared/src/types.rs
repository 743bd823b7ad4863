//! Common types for the shared crate

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;

/// Server-assigned row identifier
pub type RowId = i64;
