//! Session state
//!
//! Exposes the signed-in user as application state: a query for the current
//! user and an [`AuthState`] wrapper whose login/signup/logout calls keep the
//! query cache consistent with the session manager.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use todo_client::session::{SessionManager, SessionManagerError, UserAccount};
use tokio::sync::RwLock;

use crate::query::{Query, QueryClient, QueryConfig, QueryError, QueryKey};

/// Errors that can occur in session state operations
#[derive(Debug, Error)]
pub enum SessionStateError {
    /// Session manager error
    #[error("Session error: {0}")]
    SessionManager(#[from] SessionManagerError),

    /// Query error
    #[error("Query error: {0}")]
    Query(#[from] QueryError),
}

/// Result type for session state operations
pub type Result<T> = std::result::Result<T, SessionStateError>;

/// The signed-in user as seen by the rest of the app
///
/// Tokens stay inside the session manager; this is the displayable subset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentUser {
    /// User identifier
    pub user_id: String,

    /// Email address
    pub email: String,

    /// Optional display name
    pub display_name: Option<String>,
}

impl From<&UserAccount> for CurrentUser {
    fn from(account: &UserAccount) -> Self {
        Self {
            user_id: account.user_id.clone(),
            email: account.email.clone(),
            display_name: account.display_name.clone(),
        }
    }
}

/// Query resolving to the currently signed-in user, if any
#[derive(Clone)]
pub struct CurrentUserQuery {
    manager: Arc<RwLock<SessionManager>>,
}

impl CurrentUserQuery {
    /// Create a new current-user query
    pub fn new(manager: Arc<RwLock<SessionManager>>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl Query for CurrentUserQuery {
    type Data = Option<CurrentUser>;

    async fn fetch(&self) -> crate::query::Result<Self::Data> {
        let manager = self.manager.read().await;
        Ok(manager
            .current_account()
            .filter(|a| a.has_valid_token())
            .map(CurrentUser::from))
    }

    fn key(&self) -> QueryKey {
        QueryKey::new("session", "current")
    }

    fn config(&self) -> QueryConfig {
        QueryConfig {
            stale_time: Duration::from_secs(0),
            refetch_on_stale: false,
            retry: false,
            ..Default::default()
        }
    }
}

/// Authentication state
///
/// Wraps the session manager so every sign-in state change also invalidates
/// the relevant queries. Logout additionally drops the whole query cache,
/// since nothing fetched for the old user should survive.
pub struct AuthState {
    manager: Arc<RwLock<SessionManager>>,
    query_client: QueryClient,
}

impl AuthState {
    /// Create new authentication state
    pub fn new(manager: Arc<RwLock<SessionManager>>, query_client: QueryClient) -> Self {
        Self {
            manager,
            query_client,
        }
    }

    /// Sign in with credentials
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentUser> {
        let account = {
            let mut manager = self.manager.write().await;
            manager.login(email, password).await?
        };

        self.query_client.invalidate_scope("session").await;
        Ok(CurrentUser::from(&account))
    }

    /// Create an account and sign in as it
    pub async fn signup(&self, email: &str, password: &str) -> Result<CurrentUser> {
        let account = {
            let mut manager = self.manager.write().await;
            manager.signup(email, password).await?
        };

        self.query_client.invalidate_scope("session").await;
        Ok(CurrentUser::from(&account))
    }

    /// Sign out
    pub async fn logout(&self) -> Result<()> {
        {
            let mut manager = self.manager.write().await;
            manager.logout().await?;
        }

        // Everything cached belonged to the signed-out user
        self.query_client.clear().await;
        Ok(())
    }

    /// Resume a persisted session, if one exists and is still valid
    pub async fn resume(&self) -> Result<Option<CurrentUser>> {
        let resumed = {
            let mut manager = self.manager.write().await;
            manager.resume().await?
        };

        if resumed.is_some() {
            self.query_client.invalidate_scope("session").await;
        }

        Ok(resumed.as_ref().map(CurrentUser::from))
    }

    /// Get the current user through the query cache
    pub async fn current_user(&self) -> Result<Option<CurrentUser>> {
        let query = CurrentUserQuery::new(Arc::clone(&self.manager));
        Ok(self.query_client.get(&query).await?)
    }

    /// Whether a user is currently signed in
    pub async fn is_authenticated(&self) -> bool {
        let manager = self.manager.read().await;
        manager.is_authenticated()
    }

    /// Access the shared session manager
    pub fn manager(&self) -> Arc<RwLock<SessionManager>> {
        Arc::clone(&self.manager)
    }
}

impl Clone for AuthState {
    fn clone(&self) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
            query_client: self.query_client.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::CacheConfig;
    use tempfile::TempDir;
    use todo_client::auth::AuthApi;
    use todo_client::rest::{RestClient, RestClientConfig};

    async fn offline_auth_state(temp_dir: &TempDir) -> AuthState {
        let auth = AuthApi::new(RestClient::new(RestClientConfig::new("http://127.0.0.1:1")));
        let manager = SessionManager::new(temp_dir.path().join("session.json"), auth)
            .await
            .unwrap();
        AuthState::new(
            Arc::new(RwLock::new(manager)),
            QueryClient::new(CacheConfig::default()),
        )
    }

    #[tokio::test]
    async fn test_no_user_when_signed_out() {
        let temp_dir = TempDir::new().unwrap();
        let state = offline_auth_state(&temp_dir).await;

        assert!(!state.is_authenticated().await);
        assert!(state.current_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_logout_without_session_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let state = offline_auth_state(&temp_dir).await;

        assert!(matches!(
            state.logout().await,
            Err(SessionStateError::SessionManager(
                SessionManagerError::NoCurrentAccount
            ))
        ));
    }

    #[tokio::test]
    async fn test_login_against_unreachable_backend_fails() {
        let temp_dir = TempDir::new().unwrap();
        let state = offline_auth_state(&temp_dir).await;

        let result = state.login("alice@example.com", "hunter22").await;
        assert!(result.is_err());
        assert!(!state.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_resume_with_no_persisted_session() {
        let temp_dir = TempDir::new().unwrap();
        let state = offline_auth_state(&temp_dir).await;

        assert!(state.resume().await.unwrap().is_none());
    }
}
