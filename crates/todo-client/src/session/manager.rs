//! Session manager
//!
//! Owns the current signed-in account, performs login/signup/logout through
//! the auth endpoints, and persists the account atomically so a restarted
//! app can resume without re-authenticating.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use storage::{PersistedState, PersistenceConfig, PersistenceError};
use thiserror::Error;

use crate::auth::{AuthApi, Credentials};
use crate::rest::ApiError;
use crate::session::UserAccount;

/// Errors that can occur during session manager operations
#[derive(Debug, Error)]
pub enum SessionManagerError {
    /// Auth endpoint error
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Persistence error
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// No current account
    #[error("No current account")]
    NoCurrentAccount,
}

/// Result type for session manager operations
pub type Result<T> = std::result::Result<T, SessionManagerError>;

/// Storage structure for persisted session data
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SessionStorage {
    /// The signed-in account, if any
    pub account: Option<UserAccount>,
}

/// Session manager for the signed-in user
///
/// One account can be signed in at a time. Every state change is written
/// through to the session file before the call returns.
pub struct SessionManager {
    account: Option<UserAccount>,
    storage: PersistedState<SessionStorage>,
    auth: AuthApi,
}

impl SessionManager {
    /// Create a new session manager, loading any persisted account
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the session file
    /// * `auth` - Auth API used for login and signup
    pub async fn new(path: impl Into<PathBuf>, auth: AuthApi) -> Result<Self> {
        let config = PersistenceConfig::new(path).version(1).atomic_writes(true);
        let storage = PersistedState::new(config);
        storage.init().await?;

        let persisted: SessionStorage = storage.get().await?;

        Ok(Self {
            account: persisted.account,
            storage,
            auth,
        })
    }

    async fn persist(&self) -> Result<()> {
        self.storage
            .set(SessionStorage {
                account: self.account.clone(),
            })
            .await?;
        Ok(())
    }

    /// Get the currently signed-in account
    pub fn current_account(&self) -> Option<&UserAccount> {
        self.account.as_ref()
    }

    /// Whether an account with a usable token is signed in
    pub fn is_authenticated(&self) -> bool {
        self.account
            .as_ref()
            .map(|a| a.has_valid_token())
            .unwrap_or(false)
    }

    /// Sign in with credentials and persist the resulting account
    pub async fn login(&mut self, email: &str, password: &str) -> Result<UserAccount> {
        let session = self
            .auth
            .login(&Credentials {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        let account = UserAccount::from_session(session);
        tracing::debug!(user_id = %account.user_id, "signed in");

        self.account = Some(account.clone());
        self.persist().await?;

        Ok(account)
    }

    /// Create an account, sign in as it, and persist it
    pub async fn signup(&mut self, email: &str, password: &str) -> Result<UserAccount> {
        let session = self
            .auth
            .signup(&Credentials {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        let account = UserAccount::from_session(session);
        tracing::debug!(user_id = %account.user_id, "account created");

        self.account = Some(account.clone());
        self.persist().await?;

        Ok(account)
    }

    /// Sign out, dropping the account and its tokens from disk
    pub async fn logout(&mut self) -> Result<()> {
        if self.account.is_none() {
            return Err(SessionManagerError::NoCurrentAccount);
        }

        self.account = None;
        self.persist().await?;
        Ok(())
    }

    /// Resume the persisted session if its token is still valid
    ///
    /// Returns the account on success. An account with an expired token is
    /// dropped; the user has to sign in again.
    pub async fn resume(&mut self) -> Result<Option<UserAccount>> {
        match &self.account {
            Some(account) if account.has_valid_token() => Ok(Some(account.clone())),
            Some(_) => {
                tracing::debug!("persisted session expired, clearing");
                self.account = None;
                self.persist().await?;
                Ok(None)
            }
            None => Ok(None),
        }
    }
}
