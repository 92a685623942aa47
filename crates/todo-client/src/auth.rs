//! Auth endpoints
//!
//! Typed wrappers over the identity provider's login and signup endpoints.
//! The backend owns credential verification; this client only exchanges
//! credentials for tokens and never stores passwords.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rest::{ApiError, ApiRequest, RestClient};

/// Credentials submitted to login/signup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Email address
    pub email: String,
    /// Password (sent, never persisted)
    pub password: String,
}

/// Token response from a successful login or signup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    /// Server-assigned user identifier
    pub user_id: String,
    /// Email the account is registered under
    pub email: String,
    /// Optional display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Access token for authenticated calls
    pub access_token: String,
    /// Refresh token
    pub refresh_token: String,
    /// When the access token expires
    pub expires_at: DateTime<Utc>,
}

/// Typed client for the auth endpoints
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: RestClient,
}

impl AuthApi {
    /// Create a new auth API over a REST client
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a session
    ///
    /// The backend answers 401 with error code `InvalidCredentials` on a
    /// bad email/password pair.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthSession, ApiError> {
        self.post_credentials("/auth/login", credentials).await
    }

    /// Register a new account and return its session
    ///
    /// The backend answers 409 with error code `EmailTaken` when the email
    /// is already registered.
    pub async fn signup(&self, credentials: &Credentials) -> Result<AuthSession, ApiError> {
        self.post_credentials("/auth/signup", credentials).await
    }

    async fn post_credentials(
        &self,
        path: &str,
        credentials: &Credentials,
    ) -> Result<AuthSession, ApiError> {
        let request = ApiRequest::post(path)
            .json_body(credentials)
            .map_err(|e| ApiError::new(0, "SerializationError", e.to_string()))?;

        let response = self.client.send::<AuthSession>(request).await?;
        Ok(response.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_session_wire_format() {
        let json = r#"{
            "userId": "u-1",
            "email": "alice@example.com",
            "accessToken": "access",
            "refreshToken": "refresh",
            "expiresAt": "2024-05-01T12:00:00Z"
        }"#;

        let session: AuthSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.user_id, "u-1");
        assert_eq!(session.email, "alice@example.com");
        assert!(session.display_name.is_none());
    }
}
