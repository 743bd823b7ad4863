//! Unified error codes for the café back-office
//!
//! This module defines all error codes used across cafe-server, cafe-client and the UI.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Table API errors
//! - 4xxx: Reservation errors
//! - 5xxx: Contact message errors
//! - 6xxx: Product / category errors
//! - 8xxx: Admin account errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Session has expired
    SessionExpired = 1005,
    /// Too many failed login attempts
    AccountLocked = 1006,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,
    /// Registration is closed
    RegistrationClosed = 2004,
    /// Cannot delete own admin account
    CannotDeleteSelf = 2005,

    // ==================== 3xxx: Table API ====================
    /// Unknown table name
    TableNotFound = 3001,
    /// Unknown column name
    ColumnNotFound = 3002,
    /// Malformed filter / order / limit
    InvalidFilter = 3003,
    /// Column cannot be written by this operation
    ColumnNotWritable = 3004,
    /// Update or delete issued without any filter
    FilterRequired = 3005,
    /// Operation not available on this table
    OperationNotAllowed = 3006,

    // ==================== 4xxx: Reservation ====================
    /// Reservation not found
    ReservationNotFound = 4001,
    /// Guest count outside the allowed range
    GuestCountOutOfRange = 4002,
    /// Unknown reservation status
    InvalidReservationStatus = 4003,
    /// Reservation date is in the past
    ReservationDateInPast = 4004,

    // ==================== 5xxx: Contact ====================
    /// Contact message not found
    ContactMessageNotFound = 5001,
    /// Unknown contact message status
    InvalidContactStatus = 5002,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product has invalid price
    ProductInvalidPrice = 6002,
    /// Product has invalid stock
    ProductInvalidStock = 6003,
    /// Category not found
    CategoryNotFound = 6101,
    /// Category name already exists
    CategoryNameExists = 6102,

    // ==================== 8xxx: Admin ====================
    /// Admin account not found
    AdminNotFound = 8001,
    /// Username already taken
    AdminUsernameExists = 8002,
    /// Email already registered
    AdminEmailExists = 8003,
    /// Password too short
    PasswordTooShort = 8004,
    /// Password confirmation does not match
    PasswordMismatch = 8005,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Local storage read/write failed
    StorageError = 9401,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::SessionExpired => "Session has expired",
            ErrorCode::AccountLocked => "Too many failed login attempts",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator login is required",
            ErrorCode::RegistrationClosed => "Registration is closed",
            ErrorCode::CannotDeleteSelf => "Cannot delete own account",

            // Table API
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::ColumnNotFound => "Column not found",
            ErrorCode::InvalidFilter => "Invalid filter",
            ErrorCode::ColumnNotWritable => "Column is not writable",
            ErrorCode::FilterRequired => "A filter is required for this operation",
            ErrorCode::OperationNotAllowed => "Operation not allowed on this table",

            // Reservation
            ErrorCode::ReservationNotFound => "Reservation not found",
            ErrorCode::GuestCountOutOfRange => "Guest count must be between 1 and 12",
            ErrorCode::InvalidReservationStatus => "Invalid reservation status",
            ErrorCode::ReservationDateInPast => "Reservation date is in the past",

            // Contact
            ErrorCode::ContactMessageNotFound => "Contact message not found",
            ErrorCode::InvalidContactStatus => "Invalid contact message status",

            // Product
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Product has invalid price",
            ErrorCode::ProductInvalidStock => "Product has invalid stock",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryNameExists => "Category name already exists",

            // Admin
            ErrorCode::AdminNotFound => "Admin account not found",
            ErrorCode::AdminUsernameExists => "Username is already taken",
            ErrorCode::AdminEmailExists => "Email is already registered",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",
            ErrorCode::PasswordMismatch => "Password confirmation does not match",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::StorageError => "Local storage error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::SessionExpired),
            1006 => Ok(ErrorCode::AccountLocked),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),
            2004 => Ok(ErrorCode::RegistrationClosed),
            2005 => Ok(ErrorCode::CannotDeleteSelf),

            // Table API
            3001 => Ok(ErrorCode::TableNotFound),
            3002 => Ok(ErrorCode::ColumnNotFound),
            3003 => Ok(ErrorCode::InvalidFilter),
            3004 => Ok(ErrorCode::ColumnNotWritable),
            3005 => Ok(ErrorCode::FilterRequired),
            3006 => Ok(ErrorCode::OperationNotAllowed),

            // Reservation
            4001 => Ok(ErrorCode::ReservationNotFound),
            4002 => Ok(ErrorCode::GuestCountOutOfRange),
            4003 => Ok(ErrorCode::InvalidReservationStatus),
            4004 => Ok(ErrorCode::ReservationDateInPast),

            // Contact
            5001 => Ok(ErrorCode::ContactMessageNotFound),
            5002 => Ok(ErrorCode::InvalidContactStatus),

            // Product
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInvalidPrice),
            6003 => Ok(ErrorCode::ProductInvalidStock),
            6101 => Ok(ErrorCode::CategoryNotFound),
            6102 => Ok(ErrorCode::CategoryNameExists),

            // Admin
            8001 => Ok(ErrorCode::AdminNotFound),
            8002 => Ok(ErrorCode::AdminUsernameExists),
            8003 => Ok(ErrorCode::AdminEmailExists),
            8004 => Ok(ErrorCode::PasswordTooShort),
            8005 => Ok(ErrorCode::PasswordMismatch),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9401 => Ok(ErrorCode::StorageError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
