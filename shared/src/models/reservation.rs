//! Reservation Model

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Record;
use crate::types::{RowId, Timestamp};
use crate::validation::{self, Validate, ValidationErrors};

/// Reservation status
///
/// Stored with the Indonesian labels used by the back-office. The English
/// names are accepted on input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReservationStatus {
    #[default]
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "diterima", alias = "accepted")]
    Accepted,
    #[serde(rename = "dialihkan", alias = "redirected")]
    Redirected,
    #[serde(rename = "ditolak", alias = "rejected")]
    Rejected,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 4] = [
        Self::Pending,
        Self::Accepted,
        Self::Redirected,
        Self::Rejected,
    ];

    /// Stored value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "diterima",
            Self::Redirected => "dialihkan",
            Self::Rejected => "ditolak",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown reservation status string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid reservation status: {0}")]
pub struct InvalidReservationStatus(pub String);

impl FromStr for ReservationStatus {
    type Err = InvalidReservationStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "diterima" | "accepted" => Ok(Self::Accepted),
            "dialihkan" | "redirected" => Ok(Self::Redirected),
            "ditolak" | "rejected" => Ok(Self::Rejected),
            _ => Err(InvalidReservationStatus(s.to_string())),
        }
    }
}

/// Reservation entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: RowId,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`, kept exactly as submitted
    pub time: String,
    pub guests: i32,
    pub special_request: Option<String>,
    #[serde(default)]
    pub status: ReservationStatus,
    pub created_at: Timestamp,
}

impl Record for Reservation {
    const TABLE: &'static str = "reservations";

    fn id(&self) -> RowId {
        self.id
    }
}

/// Create reservation payload (status is always assigned by the server)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReservationCreate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    pub guests: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_request: Option<String>,
}

impl ReservationCreate {
    /// Validate against a fixed "today"
    pub fn validate_on(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::person_name(&mut errors, "name", &self.name);
        validation::email(&mut errors, "email", &self.email);
        validation::phone(&mut errors, "phone", &self.phone);
        validation::reservation_date(&mut errors, "date", &self.date, today);
        validation::reservation_time(&mut errors, "time", &self.time);
        validation::guests(&mut errors, "guests", self.guests);
        validation::optional_text(
            &mut errors,
            "special_request",
            self.special_request.as_deref(),
            validation::MAX_NOTE_LEN,
        );
        errors.into_result()
    }
}

impl Validate for ReservationCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.validate_on(validation::today())
    }
}

/// Update reservation payload (admin status changes)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReservationUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReservationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guests: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_request: Option<String>,
}

impl ReservationUpdate {
    pub fn status(status: ReservationStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

impl Validate for ReservationUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        // Admins may move a booking to any date, past dates included
        if let Some(date) = &self.date {
            validation::reservation_date(&mut errors, "date", date, NaiveDate::MIN);
        }
        if let Some(time) = &self.time {
            validation::reservation_time(&mut errors, "time", time);
        }
        if let Some(guests) = self.guests {
            validation::guests(&mut errors, "guests", guests);
        }
        validation::optional_text(
            &mut errors,
            "special_request",
            self.special_request.as_deref(),
            validation::MAX_NOTE_LEN,
        );
        errors.into_result()
    }
}
