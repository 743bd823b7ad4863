//! Authentication Handlers
//!
//! Handles registration, login and the current admin profile

use std::time::Duration;

use axum::{Json, extract::State};

use crate::auth::{Caller, CurrentAdmin, hash_password, verify_password};
use crate::core::ServerState;
use crate::db::admins;
use crate::security_log;
use crate::utils::{AppError, ErrorCode};

use shared::client::{LoginRequest, LoginResponse, RegisterRequest};
use shared::models::Admin;
use shared::validation::Validate;

fn db_error(e: sqlx::Error) -> AppError {
    AppError::database(format!("Query failed: {}", e))
}

/// Register handler
///
/// Allowed for the very first account, for signed-in admins, or when
/// open registration is enabled. Returns a token for the new account.
pub async fn register(
    State(state): State<ServerState>,
    caller: Caller,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let db = state.get_db();

    let bootstrap = admins::count(db).await.map_err(db_error)? == 0;
    if !bootstrap && !state.config.open_registration {
        match &caller {
            Caller::Admin(_) => {}
            Caller::Rejected(err) => return Err(err.clone()),
            Caller::Anonymous => {
                security_log!("WARN", "register_closed", username = req.username.as_str());
                return Err(AppError::new(ErrorCode::RegistrationClosed));
            }
        }
    }

    req.validate()?;

    if admins::username_exists(db, &req.username)
        .await
        .map_err(db_error)?
    {
        return Err(AppError::new(ErrorCode::AdminUsernameExists).with_detail("field", "username"));
    }
    if admins::email_exists(db, req.email.trim())
        .await
        .map_err(db_error)?
    {
        return Err(AppError::new(ErrorCode::AdminEmailExists).with_detail("field", "email"));
    }

    let password_hash = hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let admin = admins::create(db, &req, &password_hash)
        .await
        .map_err(|e| match e.as_database_error() {
            // Lost a race with a concurrent registration
            Some(db_err) if db_err.is_unique_violation() => {
                AppError::new(ErrorCode::AdminUsernameExists)
            }
            _ => db_error(e),
        })?;

    let token = state
        .get_jwt_service()
        .generate_token(admin.id, &admin.username)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    security_log!(
        "INFO",
        "admin_registered",
        username = admin.username.as_str(),
        bootstrap = bootstrap,
        created_by = caller.admin().map(|a| a.username.as_str()).unwrap_or("-")
    );

    Ok(Json(LoginResponse { token, admin }))
}

/// Login handler
///
/// Authenticates admin credentials and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let db = state.get_db();
    let username = req.username.trim().to_string();

    let row = admins::find_by_username(db, &username)
        .await
        .map_err(db_error)?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(state.config.auth_delay_ms)).await;

    // Unified error message to prevent username enumeration
    let row = match row {
        Some(row) if verify_password(&req.password, &row.password_hash) => row,
        Some(_) => {
            security_log!(
                "WARN",
                "login_failed",
                username = username.as_str(),
                reason = "invalid_password"
            );
            return Err(AppError::invalid_credentials());
        }
        None => {
            security_log!(
                "WARN",
                "login_failed",
                username = username.as_str(),
                reason = "user_not_found"
            );
            return Err(AppError::invalid_credentials());
        }
    };

    let admin = row.into_admin();
    let token = state
        .get_jwt_service()
        .generate_token(admin.id, &admin.username)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        admin_id = admin.id,
        username = %admin.username,
        "Admin logged in successfully"
    );

    Ok(Json(LoginResponse { token, admin }))
}

/// Get current admin info
pub async fn me(
    State(state): State<ServerState>,
    current: CurrentAdmin,
) -> Result<Json<Admin>, AppError> {
    let admin = admins::find_by_id(state.get_db(), current.id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| AppError::new(ErrorCode::AdminNotFound))?;

    Ok(Json(admin))
}
