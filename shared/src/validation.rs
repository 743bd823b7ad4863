//! Input validation rules
//!
//! One set of field rules shared by the form screens (before any remote call)
//! and the table service (before any write). Limits:
//! - Names: 2..=100 chars
//! - Notes / descriptions / special requests: at most 500 chars
//! - Contact messages: 10..=1000 chars
//! - Passwords: 8..=128 chars
//! - Guests: 1..=12

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::{AppError, ErrorCode};

// ── Limits ──────────────────────────────────────────────────────────

pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Descriptions, special requests
pub const MAX_NOTE_LEN: usize = 500;

pub const MIN_MESSAGE_LEN: usize = 10;
pub const MAX_MESSAGE_LEN: usize = 1000;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 30;

/// Passwords (before hashing)
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

pub const MIN_GUESTS: i32 = 1;
pub const MAX_GUESTS: i32 = 12;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

// Indonesian mobile numbers: 08xx, 628xx or +628xx
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+62|62|0)8[1-9][0-9]{6,10}$").expect("valid phone regex")
});

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid username regex"));

// ── Error collection ────────────────────────────────────────────────

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub code: ErrorCode,
    pub message: String,
}

/// All field errors found in one validation pass, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field`. Only the first error per field is kept.
    pub fn add(&mut self, field: &'static str, code: ErrorCode, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.errors.push(FieldError {
                field,
                code,
                message: message.into(),
            });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Error for a given field, if any
    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Field name to message map, as shown next to each input
    pub fn to_field_map(&self) -> HashMap<String, String> {
        self.errors
            .iter()
            .map(|e| (e.field.to_string(), e.message.clone()))
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", joined.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let code = errors
            .errors
            .first()
            .map(|e| e.code)
            .unwrap_or(ErrorCode::ValidationFailed);
        let mut err = AppError::with_message(code, errors.to_string());
        for e in &errors.errors {
            err = err.with_detail(e.field, Value::String(e.message.clone()));
        }
        err
    }
}

/// Types that can check themselves against the field rules
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

// ── Field rules ─────────────────────────────────────────────────────

/// Required text: non-blank and within `min..=max` chars.
pub fn required_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if trimmed.is_empty() {
        errors.add(field, ErrorCode::RequiredField, format!("{field} is required"));
    } else if len < min {
        errors.add(
            field,
            ErrorCode::ValidationFailed,
            format!("{field} must be at least {min} characters"),
        );
    } else if len > max {
        errors.add(
            field,
            ErrorCode::ValidationFailed,
            format!("{field} is too long ({len} chars, max {max})"),
        );
    }
}

/// Optional text: if present, within the length limit.
pub fn optional_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<&str>,
    max: usize,
) {
    if let Some(v) = value {
        let len = v.chars().count();
        if len > max {
            errors.add(
                field,
                ErrorCode::ValidationFailed,
                format!("{field} is too long ({len} chars, max {max})"),
            );
        }
    }
}

pub fn person_name(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    required_text(errors, field, value, MIN_NAME_LEN, MAX_NAME_LEN);
}

pub fn email(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, ErrorCode::RequiredField, format!("{field} is required"));
    } else if value.len() > MAX_EMAIL_LEN || !EMAIL_RE.is_match(value) {
        errors.add(field, ErrorCode::InvalidFormat, "Invalid email format");
    }
}

pub fn phone(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    let compact: String = value.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
    if compact.is_empty() {
        errors.add(field, ErrorCode::RequiredField, format!("{field} is required"));
    } else if !PHONE_RE.is_match(&compact) {
        errors.add(field, ErrorCode::InvalidFormat, "Invalid phone number");
    }
}

/// Optional phone: empty means "not given".
pub fn optional_phone(errors: &mut ValidationErrors, field: &'static str, value: Option<&str>) {
    if let Some(v) = value
        && !v.trim().is_empty()
    {
        phone(errors, field, v);
    }
}

pub fn guests(errors: &mut ValidationErrors, field: &'static str, value: i32) {
    if !(MIN_GUESTS..=MAX_GUESTS).contains(&value) {
        errors.add(
            field,
            ErrorCode::GuestCountOutOfRange,
            format!("Guests must be between {MIN_GUESTS} and {MAX_GUESTS}"),
        );
    }
}

/// `YYYY-MM-DD`, not before `today`.
pub fn reservation_date(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    today: NaiveDate,
) {
    if value.trim().is_empty() {
        errors.add(field, ErrorCode::RequiredField, format!("{field} is required"));
        return;
    }
    match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
        Ok(date) if date < today => errors.add(
            field,
            ErrorCode::ReservationDateInPast,
            "Date cannot be in the past",
        ),
        Ok(_) => {}
        Err(_) => errors.add(field, ErrorCode::InvalidFormat, "Date must be YYYY-MM-DD"),
    }
}

/// `HH:MM`, 24-hour clock.
pub fn reservation_time(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, ErrorCode::RequiredField, format!("{field} is required"));
        return;
    }
    if value.len() != 5 || NaiveTime::parse_from_str(value, "%H:%M").is_err() {
        errors.add(field, ErrorCode::InvalidFormat, "Time must be HH:MM");
    }
}

pub fn username(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    let len = value.chars().count();
    if value.trim().is_empty() {
        errors.add(field, ErrorCode::RequiredField, format!("{field} is required"));
    } else if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        errors.add(
            field,
            ErrorCode::ValidationFailed,
            format!("Username must be {MIN_USERNAME_LEN}-{MAX_USERNAME_LEN} characters"),
        );
    } else if !USERNAME_RE.is_match(value) {
        errors.add(
            field,
            ErrorCode::InvalidFormat,
            "Username may only contain letters, digits and underscores",
        );
    }
}

pub fn password(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    let len = value.chars().count();
    if value.is_empty() {
        errors.add(field, ErrorCode::RequiredField, format!("{field} is required"));
    } else if len < MIN_PASSWORD_LEN {
        errors.add(field, ErrorCode::PasswordTooShort, ErrorCode::PasswordTooShort.message());
    } else if len > MAX_PASSWORD_LEN {
        errors.add(
            field,
            ErrorCode::ValidationFailed,
            format!("Password is too long (max {MAX_PASSWORD_LEN})"),
        );
    }
}

pub fn price(errors: &mut ValidationErrors, field: &'static str, value: Decimal) {
    if value.is_sign_negative() && !value.is_zero() {
        errors.add(field, ErrorCode::ProductInvalidPrice, "Price cannot be negative");
    }
}

pub fn stock(errors: &mut ValidationErrors, field: &'static str, value: Option<i64>) {
    if let Some(v) = value
        && v < 0
    {
        errors.add(field, ErrorCode::ProductInvalidStock, "Stock cannot be negative");
    }
}

pub fn image_url(errors: &mut ValidationErrors, field: &'static str, value: Option<&str>) {
    if let Some(v) = value {
        let v = v.trim();
        if v.is_empty() {
            return;
        }
        if v.len() > MAX_URL_LEN || !(v.starts_with("http://") || v.starts_with("https://")) {
            errors.add(field, ErrorCode::InvalidFormat, "Image URL must start with http(s)://");
        }
    }
}

/// Today's date on the local clock
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(f: impl FnOnce(&mut ValidationErrors)) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        f(&mut errors);
        errors
    }

    #[test]
    fn test_required_text() {
        assert!(collect(|e| required_text(e, "name", "Budi", 2, 100)).is_empty());

        let errors = collect(|e| required_text(e, "name", "   ", 2, 100));
        assert_eq!(errors.get("name").unwrap().code, ErrorCode::RequiredField);

        let errors = collect(|e| required_text(e, "name", "B", 2, 100));
        assert_eq!(errors.get("name").unwrap().code, ErrorCode::ValidationFailed);

        let long = "x".repeat(101);
        assert!(!collect(|e| required_text(e, "name", &long, 2, 100)).is_empty());
    }

    #[test]
    fn test_email() {
        assert!(collect(|e| email(e, "email", "budi@x.com")).is_empty());
        assert!(!collect(|e| email(e, "email", "budi@x")).is_empty());
        assert!(!collect(|e| email(e, "email", "budi x@x.com")).is_empty());
        assert_eq!(
            collect(|e| email(e, "email", "")).get("email").unwrap().code,
            ErrorCode::RequiredField
        );
    }

    #[test]
    fn test_phone() {
        assert!(collect(|e| phone(e, "phone", "081234567890")).is_empty());
        assert!(collect(|e| phone(e, "phone", "+6281234567890")).is_empty());
        assert!(collect(|e| phone(e, "phone", "0812-3456-7890")).is_empty());
        assert!(!collect(|e| phone(e, "phone", "021555")).is_empty());
        assert!(!collect(|e| phone(e, "phone", "08abc")).is_empty());
        assert!(collect(|e| optional_phone(e, "phone", Some(""))).is_empty());
    }

    #[test]
    fn test_guests_bounds() {
        assert!(collect(|e| guests(e, "guests", 1)).is_empty());
        assert!(collect(|e| guests(e, "guests", 12)).is_empty());
        assert_eq!(
            collect(|e| guests(e, "guests", 0)).get("guests").unwrap().code,
            ErrorCode::GuestCountOutOfRange
        );
        assert!(!collect(|e| guests(e, "guests", 13)).is_empty());
    }

    #[test]
    fn test_reservation_date() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert!(collect(|e| reservation_date(e, "date", "2026-10-19", today)).is_empty());
        assert!(collect(|e| reservation_date(e, "date", "2026-10-20", today)).is_empty());
        assert_eq!(
            collect(|e| reservation_date(e, "date", "2026-10-18", today))
                .get("date")
                .unwrap()
                .code,
            ErrorCode::ReservationDateInPast
        );
        assert!(!collect(|e| reservation_date(e, "date", "19/10/2026", today)).is_empty());
    }

    #[test]
    fn test_reservation_time() {
        assert!(collect(|e| reservation_time(e, "time", "19:00")).is_empty());
        assert!(!collect(|e| reservation_time(e, "time", "25:00")).is_empty());
        assert!(!collect(|e| reservation_time(e, "time", "7:00")).is_empty());
    }

    #[test]
    fn test_username_and_password() {
        assert!(collect(|e| username(e, "username", "admin_01")).is_empty());
        assert!(!collect(|e| username(e, "username", "ab")).is_empty());
        assert!(!collect(|e| username(e, "username", "bad name")).is_empty());

        assert!(collect(|e| password(e, "password", "rahasia123")).is_empty());
        assert_eq!(
            collect(|e| password(e, "password", "short"))
                .get("password")
                .unwrap()
                .code,
            ErrorCode::PasswordTooShort
        );
    }

    #[test]
    fn test_price_and_stock() {
        assert!(collect(|e| price(e, "price", Decimal::ZERO)).is_empty());
        assert!(collect(|e| price(e, "price", Decimal::new(25000, 0))).is_empty());
        assert!(!collect(|e| price(e, "price", Decimal::new(-1, 0))).is_empty());
        assert!(collect(|e| stock(e, "stock", None)).is_empty());
        assert!(!collect(|e| stock(e, "stock", Some(-3))).is_empty());
    }

    #[test]
    fn test_first_error_per_field_wins() {
        let mut errors = ValidationErrors::new();
        errors.add("email", ErrorCode::RequiredField, "first");
        errors.add("email", ErrorCode::InvalidFormat, "second");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email").unwrap().message, "first");
    }

    #[test]
    fn test_into_app_error_keeps_field_details() {
        let mut errors = ValidationErrors::new();
        guests(&mut errors, "guests", 20);
        email(&mut errors, "email", "nope");
        let err: AppError = errors.into();
        assert_eq!(err.code, ErrorCode::GuestCountOutOfRange);
        let details = err.details.unwrap();
        assert!(details.contains_key("guests"));
        assert!(details.contains_key("email"));
    }
}
