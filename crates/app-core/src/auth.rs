//! Auth service
//!
//! Validation-gated sign-in flows. Form-level rules (non-blank fields,
//! password length, confirmation match) are checked before any request goes
//! out; wire errors from the auth endpoints are mapped to typed variants the
//! forms can display.

use thiserror::Error;

use app_state::session::{AuthState, CurrentUser, SessionStateError};
use todo_client::session::SessionManagerError;
use todo_client::ApiError;

/// Minimum accepted password length for signup
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Errors that can occur during auth operations
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password was left blank
    #[error("Email and password are required")]
    MissingCredentials,

    /// Password shorter than the minimum
    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,

    /// Password and confirmation differ
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Backend rejected the credentials
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// An account with this email already exists
    #[error("An account with this email already exists")]
    EmailTaken,

    /// Session state error
    #[error("Session error: {0}")]
    Session(SessionStateError),
}

impl From<SessionStateError> for AuthError {
    fn from(error: SessionStateError) -> Self {
        // Pull the wire errors the forms care about out of the session layer
        if let SessionStateError::SessionManager(SessionManagerError::Api(api)) = &error {
            if let Some(mapped) = AuthError::from_api_error(api) {
                return mapped;
            }
        }
        AuthError::Session(error)
    }
}

impl AuthError {
    fn from_api_error(error: &ApiError) -> Option<Self> {
        match error.error() {
            "InvalidCredentials" => Some(AuthError::InvalidCredentials),
            "EmailTaken" => Some(AuthError::EmailTaken),
            _ => None,
        }
    }
}

/// Result type for auth operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Auth service
pub struct AuthService {
    state: AuthState,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(state: AuthState) -> Self {
        Self { state }
    }

    /// Sign in
    ///
    /// Blank email or password is rejected without calling the endpoint.
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentUser> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let user = self.state.login(email.trim(), password).await?;
        tracing::debug!(user_id = %user.user_id, "login succeeded");
        Ok(user)
    }

    /// Create an account and sign in
    ///
    /// Rejected without calling the endpoint when the email is blank, the
    /// password is shorter than [`MIN_PASSWORD_LENGTH`], or the confirmation
    /// does not match.
    pub async fn signup(&self, email: &str, password: &str, confirm: &str) -> Result<CurrentUser> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::PasswordTooShort);
        }
        if password != confirm {
            return Err(AuthError::PasswordMismatch);
        }

        let user = self.state.signup(email.trim(), password).await?;
        tracing::debug!(user_id = %user.user_id, "signup succeeded");
        Ok(user)
    }

    /// Sign out
    pub async fn logout(&self) -> Result<()> {
        self.state.logout().await?;
        Ok(())
    }

    /// Resume a persisted session
    pub async fn resume(&self) -> Result<Option<CurrentUser>> {
        Ok(self.state.resume().await?)
    }

    /// Current signed-in user, if any
    pub async fn current_user(&self) -> Result<Option<CurrentUser>> {
        Ok(self.state.current_user().await?)
    }

    /// Whether a user is signed in
    pub async fn is_authenticated(&self) -> bool {
        self.state.is_authenticated().await
    }
}

impl Clone for AuthService {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}
