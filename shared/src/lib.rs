//! Shared types for the café back-office
//!
//! Data model, table query wire format, field validation rules and the
//! unified error system used by both cafe-server and cafe-client.

pub mod client;
pub mod error;
pub mod models;
pub mod query;
pub mod types;
pub mod util;
pub mod validation;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorBody, ErrorCode};
pub use query::{Direction, Filter, FilterOp, OrderBy, TableQuery};
pub use validation::{Validate, ValidationErrors};
