//! JWT Extractors
//!
//! - [`CurrentAdmin`]: handlers that always require a signed-in admin
//! - [`Caller`]: handlers whose requirement depends on the table policy

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{CurrentAdmin, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// Resolve the bearer token of a request, if one was sent
fn authenticate(parts: &mut Parts, state: &ServerState) -> Option<Result<CurrentAdmin, AppError>> {
    if let Some(admin) = parts.extensions.get::<CurrentAdmin>() {
        return Some(Ok(admin.clone()));
    }

    let auth_header = parts
        .headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;

    let Some(token) = JwtService::extract_from_header(auth_header) else {
        return Some(Err(AppError::invalid_token("Invalid authorization header")));
    };

    let jwt_service = state.get_jwt_service();
    let result = jwt_service
        .validate_token(token)
        .and_then(CurrentAdmin::try_from);

    match result {
        Ok(admin) => {
            parts.extensions.insert(admin.clone());
            Some(Ok(admin))
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", parts.uri)
            );
            match e {
                JwtError::ExpiredToken => Some(Err(AppError::token_expired())),
                _ => Some(Err(AppError::invalid_token("Invalid token"))),
            }
        }
    }
}

/// JWT Auth Extractor
///
/// Use this extractor in protected handlers to validate the JWT and
/// extract the signed-in admin
impl FromRequestParts<ServerState> for CurrentAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        match authenticate(parts, state) {
            Some(result) => result,
            None => {
                security_log!("WARN", "auth_missing", uri = format!("{:?}", parts.uri));
                Err(AppError::unauthorized())
            }
        }
    }
}

/// Who is calling: anonymous visitor, signed-in admin, or a caller whose
/// token was rejected
#[derive(Debug, Clone)]
pub enum Caller {
    Anonymous,
    Admin(CurrentAdmin),
    Rejected(AppError),
}

impl Caller {
    pub fn admin(&self) -> Option<&CurrentAdmin> {
        match self {
            Caller::Admin(admin) => Some(admin),
            _ => None,
        }
    }

    /// The admin, or the reason there is none
    pub fn require_admin(&self) -> Result<&CurrentAdmin, AppError> {
        match self {
            Caller::Admin(admin) => Ok(admin),
            Caller::Rejected(err) => Err(err.clone()),
            Caller::Anonymous => Err(AppError::unauthorized()),
        }
    }
}

impl FromRequestParts<ServerState> for Caller {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        Ok(match authenticate(parts, state) {
            None => Caller::Anonymous,
            Some(Ok(admin)) => Caller::Admin(admin),
            Some(Err(err)) => Caller::Rejected(err),
        })
    }
}
