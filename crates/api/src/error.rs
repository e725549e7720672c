use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;
use shared::jwt::JwtError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Rate limited")]
    RateLimited,

    /// Database or other backing-service failure. The cause is logged, never returned.
    #[error("Upstream error: {0}")]
    Upstream(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    message: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        match self {
            ApiError::Validation(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => msg.clone(),
            ApiError::RateLimited => "Too many requests. Please try again later.".into(),
            ApiError::Upstream(_) => "An internal error occurred".into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Upstream(cause) = &self {
            tracing::error!(error = %cause, "Upstream failure");
        }

        let body = ErrorBody {
            status: "error",
            message: self.client_message(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some("23505") => ApiError::Conflict("Resource already exists".into()),
                Some("23503") => ApiError::NotFound("Referenced resource not found".into()),
                _ => ApiError::Upstream(format!("Database error: {}", db_err)),
            },
            _ => ApiError::Upstream(format!("Database error: {}", err)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field))
                })
            })
            .collect();
        messages.sort();

        let message = match messages.len() {
            0 => "Validation failed".to_string(),
            1 => messages.remove(0),
            _ => messages.join("; "),
        };

        ApiError::Validation(message)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::UnsupportedStandard(_) | DomainError::Validation(_) => {
                ApiError::Validation(err.to_string())
            }
            DomainError::InvalidTransition { .. } => ApiError::Conflict(err.to_string()),
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::TokenExpired => ApiError::Unauthorized("Token has expired".into()),
            JwtError::InvalidToken | JwtError::DecodingError(_) => {
                ApiError::Unauthorized("Invalid or expired token".into())
            }
            JwtError::EncodingError(_) | JwtError::InvalidKey(_) => {
                ApiError::Upstream(format!("Token error: {}", err))
            }
        }
    }
}
