//! Admin Account Model
//!
//! The password only ever travels in [`crate::client::RegisterRequest`] and
//! [`crate::client::LoginRequest`]. Rows never carry it, hashed or not.

use serde::{Deserialize, Serialize};

use super::Record;
use crate::types::{RowId, Timestamp};

/// Admin account entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    pub id: RowId,
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub phone: Option<String>,
    pub created_at: Timestamp,
}

impl Record for Admin {
    const TABLE: &'static str = "admin";

    fn id(&self) -> RowId {
        self.id
    }
}
