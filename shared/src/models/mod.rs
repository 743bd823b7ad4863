//! Data models
//!
//! Shared between cafe-server and cafe-client (via the table API).
//! All IDs are `i64` assigned by the server on insert, `created_at` is
//! Unix millis. Neither is ever sent by the client.

pub mod admin;
pub mod category;
pub mod contact_message;
pub mod product;
pub mod reservation;

// Re-exports
pub use admin::*;
pub use category::*;
pub use contact_message::*;
pub use product::*;
pub use reservation::*;

use serde::{Deserialize, Deserializer};

use crate::types::RowId;

/// A row of a named remote table
pub trait Record {
    /// Remote table name
    const TABLE: &'static str;

    fn id(&self) -> RowId;
}

/// Patch field for a nullable column: absent keeps it, `null` clears it
///
/// Use on `Option<Option<T>>` with `default` and
/// `skip_serializing_if = "Option::is_none"`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
