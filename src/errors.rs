use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Domain errors surfaced by the auth and payment operations.
///
/// The four token-validation variants stay distinct for logging, but all of
/// them reach the client as the same generic 401 detail.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("incorrect email or password")]
    InvalidCredentials,
    #[error("token invalid")]
    TokenInvalid,
    #[error("token expired")]
    TokenExpired,
    #[error("user is inactive")]
    UserInactive,
    #[error("user not found")]
    UserNotFound,
    #[error("{0} does not reference an existing row")]
    ReferentialIntegrity(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(e.into())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::DuplicateEmail => StatusCode::CONFLICT,
            ApiError::InvalidCredentials
            | ApiError::TokenInvalid
            | ApiError::TokenExpired
            | ApiError::UserInactive
            | ApiError::UserNotFound => StatusCode::UNAUTHORIZED,
            ApiError::ReferentialIntegrity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing detail. Token failures collapse to one message and
    /// internal errors never leak their cause.
    fn detail(&self) -> String {
        match self {
            ApiError::TokenInvalid
            | ApiError::TokenExpired
            | ApiError::UserInactive
            | ApiError::UserNotFound => "could not validate credentials".into(),
            ApiError::Internal(_) => "internal server error".into(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(e) = &self {
            error!(error = %e, "internal error");
        }
        let status = self.status();
        let body = Json(json!({ "detail": self.detail() }));
        if status == StatusCode::UNAUTHORIZED {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}
