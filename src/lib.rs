//! Taskdeck application shell
//!
//! Wires the REST client, session manager, query/mutation clients, domain
//! services, and view models together, and decides which root view to show.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use app_core::auth::AuthService;
use app_core::health::HealthService;
use app_core::todos::TodoService;
use app_state::session::AuthState;
use app_state::{MutationClient, QueryClient};
use app_ui::notifications::NotificationQueue;
use app_ui::theme::ThemeState;
use storage::CacheConfig;
use todo_client::auth::AuthApi;
use todo_client::health::HealthApi;
use todo_client::rest::{RestClient, RestClientConfig, API_URL_ENV, DEFAULT_API_URL};
use todo_client::session::SessionManager;
use todo_client::todos::TodoApi;

/// Environment variable selecting where the session file lives
pub const DATA_DIR_ENV: &str = "TASKDECK_DATA_DIR";

/// Application configuration, read from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the todo API
    pub api_url: String,

    /// Directory holding the session file
    pub data_dir: PathBuf,
}

impl AppConfig {
    /// Read configuration from `TODO_API_URL` and `TASKDECK_DATA_DIR`
    ///
    /// Missing variables fall back to `http://localhost:8080` and the
    /// current directory.
    pub fn from_env() -> Self {
        let api_url =
            std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let data_dir = std::env::var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        Self { api_url, data_dir }
    }

    /// Path of the session file inside the data directory
    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }
}

/// Which root view to render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootView {
    /// No valid session: show the login/signup screen
    Auth,
    /// Signed in: show the todo list
    Todos,
}

/// The assembled application
pub struct App {
    config: AppConfig,

    /// Query cache shared by all services
    pub queries: QueryClient,

    /// Mutation runner over the query cache
    pub mutations: MutationClient,

    /// Todo service
    pub todos: TodoService,

    /// Health service
    pub health: HealthService,

    /// Auth service
    pub auth: AuthService,

    /// Transient notifications
    pub notifications: NotificationQueue,

    /// Active theme
    pub theme: ThemeState,
}

impl App {
    /// Build the application from configuration
    ///
    /// Loads any persisted session and attempts to resume it, so
    /// [`App::root_view`] is accurate immediately after this returns.
    pub async fn initialize(config: AppConfig) -> anyhow::Result<Self> {
        tracing::info!(api_url = %config.api_url, "initializing");

        let client = RestClient::new(RestClientConfig::new(&config.api_url));

        let manager =
            SessionManager::new(config.session_path(), AuthApi::new(client.clone())).await?;
        let manager = Arc::new(RwLock::new(manager));

        let queries = QueryClient::new(CacheConfig::default());
        let mutations = MutationClient::new(queries.clone());

        let auth_state = AuthState::new(manager, queries.clone());
        let auth = AuthService::new(auth_state);
        if let Some(user) = auth.resume().await? {
            tracing::info!(user_id = %user.user_id, "session resumed");
        }

        let todos = TodoService::new(
            TodoApi::new(client.clone()),
            queries.clone(),
            mutations.clone(),
        );
        let health = HealthService::new(HealthApi::new(client), queries.clone());

        Ok(Self {
            config,
            queries,
            mutations,
            todos,
            health,
            auth,
            notifications: NotificationQueue::new(),
            theme: ThemeState::new(),
        })
    }

    /// Read from the environment and build the application
    pub async fn from_env() -> anyhow::Result<Self> {
        Self::initialize(AppConfig::from_env()).await
    }

    /// The application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Which root view should render right now
    pub async fn root_view(&self) -> RootView {
        if self.auth.is_authenticated().await {
            RootView::Todos
        } else {
            RootView::Auth
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_initialize_without_session_shows_auth() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig {
            api_url: "http://127.0.0.1:1".to_string(),
            data_dir: temp_dir.path().to_path_buf(),
        };

        let app = App::initialize(config).await.unwrap();
        assert_eq!(app.root_view().await, RootView::Auth);
    }

    #[tokio::test]
    async fn test_session_path_is_inside_data_dir() {
        let config = AppConfig {
            api_url: "http://localhost:8080".to_string(),
            data_dir: PathBuf::from("/tmp/taskdeck"),
        };

        assert_eq!(
            config.session_path(),
            PathBuf::from("/tmp/taskdeck/session.json")
        );
    }
}
