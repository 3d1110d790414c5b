use axum::{
    extract::{FromRef, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Form, Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument};

use crate::auth::{
    dto::{LoginForm, PublicUser, RegisterRequest, TokenForm, TokenResponse},
    extractors::CurrentUser,
    jwt::JwtKeys,
    service,
};
use crate::errors::ApiError;
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/token", post(issue_token))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/users/me", get(get_me))
}

pub fn login_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    let email = normalize_email(&payload.email);

    if !is_valid_email(&email) {
        return Err(ApiError::Validation("invalid email".into()));
    }
    if payload.password.len() < 8 {
        return Err(ApiError::Validation("password too short".into()));
    }

    let user = service::register(&state.db, &email, &payload.password).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// OAuth2 password grant: the form's `username` field carries the email.
#[instrument(skip(state, form))]
pub async fn issue_token(
    State(state): State<AppState>,
    Form(form): Form<TokenForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = normalize_email(&form.username);
    let user = service::authenticate(&state.db, &email, &form.password).await?;

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(&user.email)?;

    info!(user_id = %user.id, "access token issued");
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}

/// Browser form login. On success the token travels as an httpOnly cookie and
/// the client is redirected to the landing page.
#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, ApiError> {
    let email = normalize_email(&form.email);
    let user = service::authenticate(&state.db, &email, &form.password).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(&user.email)?;

    info!(user_id = %user.id, "browser login");
    Ok((
        StatusCode::SEE_OTHER,
        [
            (
                header::SET_COOKIE,
                format!("access_token=Bearer {token}; HttpOnly; Path=/"),
            ),
            (header::LOCATION, "/".to_string()),
        ],
    ))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<PublicUser> {
    Json(user.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_normalization_trims_and_lowercases() {
        assert_eq!(normalize_email("  Pilot@Example.COM "), "pilot@example.com");
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("pilot@example.com"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("two words@example.com"));
        assert!(!is_valid_email("pilot@nodot"));
    }
}
