//! Typed client for the todo backend
//!
//! This crate wraps the backend's REST endpoints in typed Rust calls. It
//! provides the HTTP plumbing (request/response types, error classification,
//! retry with backoff), one thin wrapper per endpoint group (health, todos,
//! auth), and a session manager that keeps the signed-in account on disk.
//!
//! The backend is the sole source of truth; nothing in this crate caches
//! responses. Caching and invalidation live in the `app-state` crate.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod health;
pub mod rest;
pub mod session;
pub mod todos;

pub use auth::{AuthApi, AuthSession, Credentials};
pub use health::{HealthApi, HealthResponse};
pub use rest::{ApiError, ApiRequest, ApiResponse, RestClient, RestClientConfig};
pub use session::{SessionManager, SessionManagerError, UserAccount};
pub use todos::{CreateTodoRequest, Todo, TodoApi, UpdateTodoRequest};
