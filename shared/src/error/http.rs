//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::TableNotFound
            | Self::ReservationNotFound
            | Self::ContactMessageNotFound
            | Self::ProductNotFound
            | Self::CategoryNotFound
            | Self::AdminNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::CategoryNameExists
            | Self::AdminUsernameExists
            | Self::AdminEmailExists => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::SessionExpired => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied
            | Self::AdminRequired
            | Self::RegistrationClosed
            | Self::CannotDeleteSelf
            | Self::OperationNotAllowed => StatusCode::FORBIDDEN,

            // 429 Too Many Requests
            Self::AccountLocked => StatusCode::TOO_MANY_REQUESTS,

            // 503 Service Unavailable (transient errors)
            Self::NetworkError | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::StorageError
            | Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ErrorCode::Success, StatusCode::OK),
            (ErrorCode::TableNotFound, StatusCode::NOT_FOUND),
            (ErrorCode::ReservationNotFound, StatusCode::NOT_FOUND),
            (ErrorCode::CategoryNameExists, StatusCode::CONFLICT),
            (ErrorCode::AdminUsernameExists, StatusCode::CONFLICT),
            (ErrorCode::TokenExpired, StatusCode::UNAUTHORIZED),
            (ErrorCode::RegistrationClosed, StatusCode::FORBIDDEN),
            (ErrorCode::OperationNotAllowed, StatusCode::FORBIDDEN),
            (ErrorCode::AccountLocked, StatusCode::TOO_MANY_REQUESTS),
            (ErrorCode::InvalidFilter, StatusCode::BAD_REQUEST),
            (ErrorCode::FilterRequired, StatusCode::BAD_REQUEST),
            (ErrorCode::GuestCountOutOfRange, StatusCode::BAD_REQUEST),
            (ErrorCode::TimeoutError, StatusCode::SERVICE_UNAVAILABLE),
            (ErrorCode::DatabaseError, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (code, status) in cases {
            assert_eq!(code.http_status(), status, "{code:?}");
        }
    }
}
