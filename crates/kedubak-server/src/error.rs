use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kedubak_store::StoreError;
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;

/// API error taxonomy. Store and token failures are translated here at the
/// boundary and never leaked raw to clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("unauthenticated: {0}")]
    Unauthenticated(AuthError),

    #[error("identity no longer exists")]
    IdentityNotFound,

    #[error("not allowed to modify this resource")]
    Forbidden,

    #[error("email already registered")]
    Conflict,

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("data layer timed out")]
    Timeout,

    #[error("data layer unavailable")]
    Unavailable,

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(err: impl std::fmt::Display) -> Self {
        Self::Validation(err.to_string())
    }

    /// Stable machine-readable code, part of the response contract.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Unauthenticated(_) => "unauthenticated",
            Self::IdentityNotFound => "identity_not_found",
            Self::Forbidden => "forbidden",
            Self::Conflict => "conflict",
            Self::Validation(_) => "validation",
            Self::Timeout => "timeout",
            Self::Unavailable => "unavailable",
            Self::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidCredentials | Self::Unauthenticated(_) | Self::IdentityNotFound => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound,
            StoreError::Duplicate(_) => Self::Conflict,
            StoreError::Unavailable(reason) => {
                tracing::error!("store unavailable: {}", reason);
                Self::Unavailable
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::Unauthenticated(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(source) = &self {
            // The cause stays in the logs; the client gets a generic body.
            tracing::error!("internal error: {:#}", source);
        }
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        });
        (self.status(), Json(body)).into_response()
    }
}
