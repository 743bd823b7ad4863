// cafe-client/src/screens/forms/login.rs
// 登录表单 - 失败次数锁定 + 10 秒超时竞争 (仅客户端)

use std::time::Duration;

use shared::error::ErrorCode;
use shared::validation::ValidationErrors;

use super::{FormError, FormResult, FormState};
use crate::routes::Route;
use crate::session::{Session, SessionStore};
use crate::{CafeClient, ClientError};

/// Failed credential attempts before the form locks
pub const MAX_ATTEMPTS: u32 = 5;
/// Client-side deadline for the login call
pub const LOGIN_TIMEOUT: Duration = Duration::from_secs(10);

const LOCKED_MESSAGE: &str = "Too many failed attempts, please try again later";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginFields {
    pub username: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginForm {
    pub fields: LoginFields,
    state: FormState,
    failed_attempts: u32,
    timeout: Duration,
    return_to: Option<String>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            fields: LoginFields::default(),
            state: FormState::default(),
            failed_attempts: 0,
            timeout: LOGIN_TIMEOUT,
            return_to: None,
        }
    }
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Path the guard redirected from
    pub fn with_return_to(mut self, path: impl Into<String>) -> Self {
        self.return_to = Some(path.into());
        self
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    pub fn remaining_attempts(&self) -> u32 {
        MAX_ATTEMPTS.saturating_sub(self.failed_attempts)
    }

    pub fn is_locked(&self) -> bool {
        self.failed_attempts >= MAX_ATTEMPTS
    }

    pub fn reset_attempts(&mut self) {
        self.failed_attempts = 0;
        self.state = FormState::default();
    }

    pub fn validate(&mut self) -> FormResult<()> {
        let mut errors = ValidationErrors::new();
        if self.fields.username.trim().is_empty() {
            errors.add("username", ErrorCode::RequiredField, "username is required");
        }
        if self.fields.password.is_empty() {
            errors.add("password", ErrorCode::RequiredField, "password is required");
        }
        self.state.check(errors.into_result())
    }

    /// Protected route to land on after login
    fn landing(&self) -> Route {
        self.return_to
            .as_deref()
            .and_then(|p| p.parse::<Route>().ok())
            .filter(Route::is_protected)
            .unwrap_or(Route::Dashboard)
    }

    pub async fn submit(
        &mut self,
        client: &CafeClient,
        store: &SessionStore,
    ) -> FormResult<(Session, Route)> {
        if self.is_locked() {
            self.state.failed(LOCKED_MESSAGE);
            return Err(FormError::Locked);
        }
        self.validate()?;
        self.state.submitting();

        let username = self.fields.username.trim().to_string();
        let call = client.login(&username, &self.fields.password);
        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(username = %username, timeout_ms = self.timeout.as_millis() as u64, "Login timed out");
                Err(ClientError::Timeout)
            }
        };

        match result {
            Ok(resp) => {
                let session = store.save(&resp)?;
                self.failed_attempts = 0;
                self.state.succeeded();
                self.fields = LoginFields::default();
                tracing::info!(username = %resp.admin.username, "Admin logged in");
                Ok((session, self.landing()))
            }
            Err(e) => {
                if e.is_invalid_credentials() || e.is_not_found() {
                    self.failed_attempts += 1;
                }
                tracing::warn!(
                    username = %username,
                    failed_attempts = self.failed_attempts,
                    error = %e,
                    "Login failed"
                );
                if self.is_locked() {
                    self.state.failed(LOCKED_MESSAGE);
                } else {
                    self.state.failed(e.user_message());
                }
                Err(e.into())
            }
        }
    }
}
