// cafe-client/src/screens/forms/register.rs
// 管理员注册表单

use shared::client::RegisterRequest;
use shared::error::ErrorCode;
use shared::validation::{Validate, ValidationErrors};

use super::{FormResult, FormState, optional};
use crate::CafeClient;
use crate::routes::Route;
use crate::session::{Session, SessionStore};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterFields {
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterFields {
    fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            username: self.username.trim().to_string(),
            phone: optional(&self.phone),
            password: self.password.clone(),
        }
    }

    fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.to_request().validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        if self.password != self.confirm_password {
            errors.add(
                "confirm_password",
                ErrorCode::PasswordMismatch,
                ErrorCode::PasswordMismatch.message(),
            );
        }
        errors.into_result()
    }
}

#[derive(Debug, Default)]
pub struct RegisterForm {
    pub fields: RegisterFields,
    state: FormState,
}

impl RegisterForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn validate(&mut self) -> FormResult<()> {
        self.state.check(self.fields.check())
    }

    /// Create the account and sign it in; returns the landing route
    pub async fn submit(
        &mut self,
        client: &CafeClient,
        store: &SessionStore,
    ) -> FormResult<(Session, Route)> {
        self.validate()?;
        self.state.submitting();
        let result = client.register(&self.fields.to_request()).await;
        let resp = self.state.settle(result)?;
        let session = store.save(&resp)?;
        tracing::info!(username = %resp.admin.username, "Admin registered");
        self.fields = RegisterFields::default();
        Ok((session, Route::Dashboard))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockHttpClient, login_body};
    use crate::screens::forms::FormStatus;
    use crate::storage::LocalStorage;

    fn filled() -> RegisterForm {
        let mut form = RegisterForm::new();
        form.fields = RegisterFields {
            full_name: "Dewi Lestari".into(),
            email: "dewi@cafe.id".into(),
            username: "dewi".into(),
            phone: String::new(),
            password: "kopi-susu-2024".into(),
            confirm_password: "kopi-susu-2024".into(),
        };
        form
    }

    #[tokio::test]
    async fn test_password_mismatch_sends_nothing() {
        let mock = MockHttpClient::new();
        let client = CafeClient::with_http(mock.clone());
        let store = SessionStore::new(LocalStorage::in_memory());
        let mut form = filled();
        form.fields.confirm_password = "kopi-susu-2025".into();

        assert!(form.submit(&client, &store).await.is_err());
        assert_eq!(
            form.state().field_error("confirm_password"),
            Some(ErrorCode::PasswordMismatch.message())
        );
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_register_persists_session() {
        let mock = MockHttpClient::new();
        mock.push_ok(login_body());
        let client = CafeClient::with_http(mock.clone());
        let store = SessionStore::new(LocalStorage::in_memory());
        let mut form = filled();

        let (session, route) = form.submit(&client, &store).await.unwrap();
        assert_eq!(route, Route::Dashboard);
        assert_eq!(session.admin.username, "dewi");
        assert!(store.is_logged_in());
        assert!(client.is_authenticated());
        assert_eq!(form.fields, RegisterFields::default());

        let body = mock.last_request().unwrap().body.unwrap();
        assert!(body.get("confirm_password").is_none());
        assert!(body.get("phone").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_keeps_fields() {
        let mock = MockHttpClient::new();
        mock.push_api_error(409, ErrorCode::AdminUsernameExists);
        let client = CafeClient::with_http(mock);
        let store = SessionStore::new(LocalStorage::in_memory());
        let mut form = filled();

        assert!(form.submit(&client, &store).await.is_err());
        assert_eq!(form.fields.username, "dewi");
        assert!(matches!(form.state().status(), FormStatus::Failed(_)));
        assert!(!store.is_logged_in());
    }
}
