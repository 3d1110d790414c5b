use sqlx::PgPool;
use tracing::{info, warn};

use crate::auth::{jwt::JwtKeys, password, repo::User};
use crate::errors::ApiError;

const UNIQUE_VIOLATION: &str = "23505";

/// Create a user from a plaintext password. The email must not already be
/// registered; the password is stored only as a salted argon2 hash.
pub async fn register(db: &PgPool, email: &str, plain_password: &str) -> Result<User, ApiError> {
    if User::find_by_email(db, email).await?.is_some() {
        warn!(email, "email already registered");
        return Err(ApiError::DuplicateEmail);
    }

    let hash = password::hash_password(plain_password)?;

    // The pre-check above races with concurrent signups; the unique index is
    // the authority.
    let user = User::create(db, email, &hash).await.map_err(|e| {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                return ApiError::DuplicateEmail;
            }
        }
        ApiError::from(e)
    })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user)
}

/// Verify a credential pair. Unknown email and wrong password are deliberately
/// indistinguishable to the caller.
pub async fn authenticate(
    db: &PgPool,
    email: &str,
    plain_password: &str,
) -> Result<User, ApiError> {
    let user = match User::find_by_email(db, email).await? {
        Some(u) => u,
        None => {
            warn!(email, "login for unknown email");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !password::verify_password(plain_password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    Ok(user)
}

/// Validate a bearer token and resolve it back to a live user. The store is
/// re-queried on every call so deactivating a user revokes tokens that are
/// otherwise still within their ttl.
pub async fn resolve_token(db: &PgPool, keys: &JwtKeys, token: &str) -> Result<User, ApiError> {
    let claims = keys.verify(token)?;

    let user = User::find_by_email(db, &claims.sub)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    if !user.is_active {
        warn!(user_id = %user.id, "token presented for inactive user");
        return Err(ApiError::UserInactive);
    }

    Ok(user)
}
