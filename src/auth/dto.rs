use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo::User;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// OAuth2-style password grant form posted to /token.
#[derive(Debug, Deserialize)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
}

/// Browser login form; sets the access_token cookie instead of returning JSON.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub is_active: bool,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            is_active: u.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_serializes_without_hash() {
        let user = PublicUser {
            id: Uuid::new_v4(),
            email: "pilot@example.com".into(),
            is_active: true,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("pilot@example.com"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn token_form_uses_oauth_field_names() {
        let form: TokenForm = serde_json::from_value(serde_json::json!({
            "username": "pilot@example.com",
            "password": "pw",
        }))
        .unwrap();
        assert_eq!(form.username, "pilot@example.com");
        assert_eq!(form.password, "pw");
    }
}
