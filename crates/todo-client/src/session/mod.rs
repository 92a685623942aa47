//! Session management
//!
//! The signed-in identity lives here: an opaque account record with the
//! tokens the auth endpoints returned, persisted to disk so the app can
//! resume a session across restarts.

mod manager;

pub use manager::{SessionManager, SessionManagerError, SessionStorage};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::AuthSession;

/// A persisted account with authentication tokens
///
/// Contains everything needed to restore a user's session. Tokens are
/// treated as opaque strings; the backend decides whether they are still
/// acceptable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    /// Server-assigned user identifier
    pub user_id: String,

    /// Email the account is registered under
    pub email: String,

    /// Optional display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Access token (cleared on logout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Refresh token (cleared on logout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// When the access token expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_expires_at: Option<DateTime<Utc>>,
}

impl UserAccount {
    /// Build an account record from a token response
    pub fn from_session(session: AuthSession) -> Self {
        Self {
            user_id: session.user_id,
            email: session.email,
            display_name: session.display_name,
            access_token: Some(session.access_token),
            refresh_token: Some(session.refresh_token),
            token_expires_at: Some(session.expires_at),
        }
    }

    /// Whether the account still holds an unexpired access token
    pub fn has_valid_token(&self) -> bool {
        match (&self.access_token, self.token_expires_at) {
            (Some(_), Some(expires_at)) => expires_at > Utc::now(),
            (Some(_), None) => true,
            _ => false,
        }
    }

    /// Whether the token expires within the given window
    pub fn expires_within(&self, window: Duration) -> bool {
        match self.token_expires_at {
            Some(expires_at) => expires_at <= Utc::now() + window,
            None => false,
        }
    }
}
