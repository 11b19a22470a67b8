//! Login payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful login response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub user: User,
}

/// The account a token was issued for
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// String or integer depending on the deployment
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub profile_image: String,
    #[serde(default)]
    pub first_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_decodes() {
        let response: LoginResponse = serde_json::from_str(
            r#"{"token":"tok","expires_at":"2099-01-01T00:00:00Z","user":{"id":"1","email":"a@b.io","firstName":"Ada"}}"#,
        )
        .unwrap();
        assert_eq!(response.token, "tok");
        assert_eq!(response.user.first_name, "Ada");
        assert_eq!(response.expires_at.to_rfc3339(), "2099-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_login_response_without_user() {
        let response: LoginResponse =
            serde_json::from_str(r#"{"token":"tok","expires_at":"2099-01-01T00:00:00Z"}"#)
                .unwrap();
        assert_eq!(response.user, User::default());
    }

    #[test]
    fn test_login_request_shape() {
        let body = serde_json::to_value(LoginRequest {
            email: "a@b.io",
            password: "pw",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"email": "a@b.io", "password": "pw"}));
    }
}
