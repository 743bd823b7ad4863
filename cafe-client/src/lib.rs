//! Cafe Client - table client and screen state for the café site
//!
//! Talks to the cafe-server table service over HTTP and holds the state of
//! the public pages and the admin dashboard.

pub mod config;
pub mod error;
pub mod http;
pub mod routes;
pub mod screens;
pub mod session;
pub mod storage;
pub mod table;
pub mod theme;

#[cfg(test)]
mod mock;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient, RemoteRequest};
pub use routes::Route;
pub use session::{GuardDecision, Session, SessionGuard, SessionStore};
pub use storage::LocalStorage;
pub use table::{CafeClient, FilterBuilder, TableRef};
pub use theme::ThemeStore;

// Re-export shared types for convenience
pub use shared::client::{LoginResponse, RegisterRequest};
pub use shared::query::Direction;
