//! Unified error system for the café back-office
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ErrorBody`]: JSON body of every failed request
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Table API errors
//! - 4xxx: Reservation errors
//! - 5xxx: Contact message errors
//! - 6xxx: Product errors
//! - 8xxx: Admin account errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorBody, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::FilterRequired).with_detail("table", "reservations");
//!
//! let body = ErrorBody::from(&err);
//! assert_eq!(body.code, 3005);
//! assert_eq!(body.error_code(), ErrorCode::FilterRequired);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorBody};
