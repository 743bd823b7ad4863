// cafe-client/src/session.rs
// 会话存储与路由守卫

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use shared::client::LoginResponse;
use shared::models::Admin;

use crate::routes::Route;
use crate::storage::LocalStorage;
use crate::{CafeClient, ClientResult};

pub const IS_ADMIN_LOGGED_IN_KEY: &str = "isAdminLoggedIn";
pub const ADMIN_DATA_KEY: &str = "adminData";
pub const LOGIN_TIME_KEY: &str = "loginTime";
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Delay before redirecting to the login screen after logout
pub const LOGOUT_REDIRECT_DELAY: Duration = Duration::from_secs(2);

/// A signed-in admin session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub admin: Admin,
    pub token: String,
    /// Unix milliseconds
    pub login_time: i64,
}

/// `exp` claim of a JWT (seconds), without verifying the signature
pub fn token_expiry(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    claims.get("exp")?.as_i64()
}

/// Session persisted in local storage
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: LocalStorage,
}

impl SessionStore {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    /// Persist a login/registration result
    pub fn save(&self, resp: &LoginResponse) -> ClientResult<Session> {
        let session = Session {
            admin: resp.admin.clone(),
            token: resp.token.clone(),
            login_time: chrono::Utc::now().timestamp_millis(),
        };
        self.storage
            .set(ADMIN_DATA_KEY, serde_json::to_string(&session.admin)?)?;
        self.storage.set(ACCESS_TOKEN_KEY, session.token.as_str())?;
        self.storage
            .set(LOGIN_TIME_KEY, session.login_time.to_string())?;
        self.storage.set(IS_ADMIN_LOGGED_IN_KEY, "true")?;
        Ok(session)
    }

    /// Current session; missing pieces or an expired token mean logged out
    pub fn load(&self) -> Option<Session> {
        if self.storage.get(IS_ADMIN_LOGGED_IN_KEY).as_deref() != Some("true") {
            return None;
        }
        let admin: Admin = serde_json::from_str(&self.storage.get(ADMIN_DATA_KEY)?).ok()?;
        let token = self.storage.get(ACCESS_TOKEN_KEY)?;
        let exp = token_expiry(&token)?;
        if exp <= chrono::Utc::now().timestamp() {
            tracing::debug!(username = %admin.username, "Stored session expired");
            return None;
        }
        let login_time = self
            .storage
            .get(LOGIN_TIME_KEY)
            .and_then(|t| t.parse().ok())
            .unwrap_or_default();
        Some(Session {
            admin,
            token,
            login_time,
        })
    }

    pub fn is_logged_in(&self) -> bool {
        self.load().is_some()
    }

    pub fn clear(&self) -> ClientResult<()> {
        for key in [
            IS_ADMIN_LOGGED_IN_KEY,
            ADMIN_DATA_KEY,
            LOGIN_TIME_KEY,
            ACCESS_TOKEN_KEY,
        ] {
            self.storage.remove(key)?;
        }
        Ok(())
    }

    /// Put a stored token back on the client (app start)
    pub fn restore(&self, client: &CafeClient) -> Option<Session> {
        let session = self.load()?;
        client.set_token(Some(session.token.clone()));
        Some(session)
    }
}

/// Outcome of a route check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect { to: Route, return_to: String },
}

/// Route guard for the admin screens
#[derive(Debug, Clone)]
pub struct SessionGuard {
    store: SessionStore,
}

impl SessionGuard {
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }

    /// Unknown paths are not guarded
    pub fn check(&self, path: &str) -> GuardDecision {
        let protected = path
            .parse::<Route>()
            .map(|r| r.is_protected())
            .unwrap_or(false);
        if !protected || self.store.is_logged_in() {
            return GuardDecision::Allow;
        }
        tracing::debug!(path, "Redirecting to login");
        GuardDecision::Redirect {
            to: Route::Login,
            return_to: path.to_string(),
        }
    }
}

/// Clear the session, wait the redirect delay, land on the login screen
pub async fn logout(client: &CafeClient, store: &SessionStore) -> ClientResult<Route> {
    logout_after(client, store, LOGOUT_REDIRECT_DELAY).await
}

pub async fn logout_after(
    client: &CafeClient,
    store: &SessionStore,
    delay: Duration,
) -> ClientResult<Route> {
    client.logout();
    store.clear()?;
    tokio::time::sleep(delay).await;
    Ok(Route::Login)
}
