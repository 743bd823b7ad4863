//! Contact Message Model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Record;
use crate::types::{RowId, Timestamp};
use crate::validation::{self, Validate, ValidationErrors};

/// Contact message handling status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    Pending,
    Read,
    Replied,
}

impl ContactStatus {
    pub const ALL: [ContactStatus; 3] = [Self::Pending, Self::Read, Self::Replied];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Read => "read",
            Self::Replied => "replied",
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown contact status string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid contact status: {0}")]
pub struct InvalidContactStatus(pub String);

impl FromStr for ContactStatus {
    type Err = InvalidContactStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "read" => Ok(Self::Read),
            "replied" => Ok(Self::Replied),
            _ => Err(InvalidContactStatus(s.to_string())),
        }
    }
}

/// Contact message entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: RowId,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(default)]
    pub status: ContactStatus,
    pub created_at: Timestamp,
}

impl Record for ContactMessage {
    const TABLE: &'static str = "contact_messages";

    fn id(&self) -> RowId {
        self.id
    }
}

/// Create contact message payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactMessageCreate {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl Validate for ContactMessageCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::person_name(&mut errors, "name", &self.name);
        validation::email(&mut errors, "email", &self.email);
        validation::required_text(
            &mut errors,
            "message",
            &self.message,
            validation::MIN_MESSAGE_LEN,
            validation::MAX_MESSAGE_LEN,
        );
        errors.into_result()
    }
}

/// Update contact message payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactMessageUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ContactStatus>,
}

impl ContactMessageUpdate {
    pub fn status(status: ContactStatus) -> Self {
        Self {
            status: Some(status),
        }
    }
}

impl Validate for ContactMessageUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_length_bounds() {
        let mut msg = ContactMessageCreate {
            name: "Sari".to_string(),
            email: "sari@example.com".to_string(),
            message: "Halo, apakah buka saat libur?".to_string(),
        };
        assert!(msg.validate().is_ok());

        msg.message = "short".to_string();
        assert!(msg.validate().unwrap_err().get("message").is_some());

        msg.message = "x".repeat(1001);
        assert!(msg.validate().is_err());
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&ContactStatus::Replied).unwrap(),
            "\"replied\""
        );
        assert_eq!("READ".parse::<ContactStatus>(), Ok(ContactStatus::Read));
        assert!("archived".parse::<ContactStatus>().is_err());
    }
}
