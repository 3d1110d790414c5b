use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};

use crate::auth::{jwt::JwtKeys, repo::User, service};
use crate::errors::ApiError;
use crate::state::AppState;

/// Authenticated user for a request. Validates the bearer token and
/// re-resolves the user from the store, so stale tokens for deactivated or
/// deleted users are rejected.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ApiError::TokenInvalid)?;
        let keys = JwtKeys::from_ref(state);
        let user = service::resolve_token(&state.db, &keys, &token).await?;
        Ok(CurrentUser(user))
    }
}

/// Token from the Authorization header, or from the browser-login cookie
/// `access_token` whose value is "Bearer <token>".
fn bearer_token(parts: &Parts) -> Option<String> {
    if let Some(v) = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        if let Some(token) = v.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    parts
        .headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())?
        .split("; ")
        .find_map(|c| c.strip_prefix("access_token="))
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(name: header::HeaderName, value: &str) -> Parts {
        let (parts, _) = Request::builder()
            .header(name, value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn reads_authorization_header() {
        let parts = parts_with(header::AUTHORIZATION, "Bearer abc.def.ghi");
        assert_eq!(bearer_token(&parts).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn reads_access_token_cookie() {
        let parts = parts_with(header::COOKIE, "theme=dark; access_token=Bearer abc.def.ghi");
        assert_eq!(bearer_token(&parts).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn rejects_non_bearer_scheme() {
        let parts = parts_with(header::AUTHORIZATION, "Basic dXNlcjpwdw==");
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn missing_credentials_yield_none() {
        let (parts, _) = Request::builder().body(()).unwrap().into_parts();
        assert_eq!(bearer_token(&parts), None);
    }
}
