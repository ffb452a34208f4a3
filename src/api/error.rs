use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde_json::json;
use tracing::error;

/// The primary error type for the HTTP layer. Every handler returns
/// `Result<_, ApiError>`; the `IntoResponse` impl maps each variant to a
/// status code and a `{"error": <code>, "message": <text>}` body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or constraint-violating input (400).
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid credentials (401).
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed (403).
    #[error("{0}")]
    Forbidden(String),

    /// Row missing, or hidden from the caller by visibility scoping (404).
    #[error("{0} not found")]
    NotFound(&'static str),

    /// State the request assumed no longer holds (409, code `conflict`).
    #[error("{0}")]
    Conflict(String),

    /// Event is at max_participants (409, code `capacity_exceeded`).
    #[error("{0}")]
    CapacityExceeded(String),

    /// Anything the database layer refused (500). Details are logged, the
    /// response body stays opaque.
    #[error("database error: {0}")]
    Database(#[from] DbErr),

    /// A catch-all for unexpected internal failures (500).
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) | ApiError::CapacityExceeded(_) => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::CapacityExceeded(_) => "capacity_exceeded",
            ApiError::Database(_) | ApiError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Database(e) => {
                error!("database error: {}", e);
                "Internal server error".to_string()
            }
            ApiError::Internal(e) => {
                error!("internal error: {}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (
            self.status(),
            Json(json!({"error": self.code(), "message": message})),
        )
            .into_response()
    }
}

/// Maps a failed insert/update to `Validation` when it tripped a unique
/// constraint (duplicate username, registration number, ...), otherwise to
/// `Database`.
pub fn on_unique_violation(err: DbErr, message: &str) -> ApiError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ApiError::Validation(message.to_string()),
        _ => ApiError::Database(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_variants_share_status_but_not_code() {
        let conflict = ApiError::Conflict("already registered".into());
        let capacity = ApiError::CapacityExceeded("event is full".into());
        assert_eq!(conflict.status(), StatusCode::CONFLICT);
        assert_eq!(capacity.status(), StatusCode::CONFLICT);
        assert_ne!(conflict.code(), capacity.code());
    }

    #[test]
    fn not_found_message_names_the_resource() {
        assert_eq!(
            ApiError::NotFound("Appointment").to_string(),
            "Appointment not found"
        );
    }
}
