// cafe-client/src/screens/forms/mod.rs
// 表单通用状态 - 先校验，校验通过才发起一次远程调用

mod contact;
mod login;
mod product;
mod register;
mod reservation;

pub use contact::{ContactFields, ContactForm};
pub use login::{LOGIN_TIMEOUT, LoginFields, LoginForm, MAX_ATTEMPTS};
pub use product::{ProductFields, ProductForm};
pub use register::{RegisterFields, RegisterForm};
pub use reservation::{ReservationConfirmation, ReservationFields, ReservationForm};

use std::collections::HashMap;

use shared::validation::ValidationErrors;
use thiserror::Error;

use crate::ClientError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    /// Message shown above the form
    Failed(String),
}

/// Why a submit did not go through
#[derive(Debug, Error)]
pub enum FormError {
    /// Local validation failed; nothing was sent
    #[error("validation failed: {0}")]
    Invalid(ValidationErrors),

    #[error(transparent)]
    Remote(#[from] ClientError),

    /// Too many failed login attempts
    #[error("too many failed attempts")]
    Locked,
}

pub type FormResult<T> = Result<T, FormError>;

/// Status plus per-field messages
#[derive(Debug, Clone, Default)]
pub struct FormState {
    status: FormStatus,
    field_errors: HashMap<String, String>,
}

impl FormState {
    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn field_errors(&self) -> &HashMap<String, String> {
        &self.field_errors
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors.get(field).map(String::as_str)
    }

    pub fn is_submitting(&self) -> bool {
        self.status == FormStatus::Submitting
    }

    /// Record a validation pass
    pub(crate) fn check(&mut self, result: Result<(), ValidationErrors>) -> FormResult<()> {
        match result {
            Ok(()) => {
                self.field_errors.clear();
                Ok(())
            }
            Err(errors) => Err(self.reject(errors)),
        }
    }

    pub(crate) fn reject(&mut self, errors: ValidationErrors) -> FormError {
        self.field_errors = errors.to_field_map();
        FormError::Invalid(errors)
    }

    pub(crate) fn submitting(&mut self) {
        self.status = FormStatus::Submitting;
    }

    pub(crate) fn succeeded(&mut self) {
        self.status = FormStatus::Succeeded;
    }

    pub(crate) fn failed(&mut self, message: impl Into<String>) {
        self.status = FormStatus::Failed(message.into());
    }

    /// Settle a remote call: success or a user-facing failure message
    pub(crate) fn settle<T>(&mut self, result: Result<T, ClientError>) -> FormResult<T> {
        match result {
            Ok(value) => {
                self.succeeded();
                Ok(value)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Form submit failed");
                self.failed(e.user_message());
                Err(e.into())
            }
        }
    }
}

/// Blank input becomes `None`
pub(crate) fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    #[test]
    fn test_check_fills_field_errors() {
        let mut state = FormState::default();
        let mut errors = ValidationErrors::new();
        errors.add("email", ErrorCode::InvalidFormat, "email is not valid");
        assert!(matches!(state.check(Err(errors)), Err(FormError::Invalid(_))));
        assert_eq!(state.field_error("email"), Some("email is not valid"));

        state.check(Ok(())).unwrap();
        assert!(state.field_errors().is_empty());
    }

    #[test]
    fn test_optional() {
        assert_eq!(optional("   "), None);
        assert_eq!(optional(" kopi "), Some("kopi".to_string()));
    }
}
