//! Domain services for Taskdeck
//!
//! The services in this crate sit between the typed REST client and the view
//! models: they define the queries and mutations for each domain area,
//! enforce the client-side validation rules, and translate wire errors into
//! typed domain errors.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod health;
pub mod todos;

pub use auth::{AuthError, AuthService};
pub use health::{HealthService, HealthStatus};
pub use todos::{TodoError, TodoService, TodosQuery};
