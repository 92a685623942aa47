//! Application state management for Taskdeck
//!
//! This crate provides reactive server-state management: queries with
//! caching and invalidation, mutations that invalidate on success, and
//! session state wired over the session manager.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod mutation;
pub mod query;
pub mod session;

pub use mutation::{Mutation, MutationClient, MutationConfig, MutationError, MutationState};
pub use query::{Query, QueryClient, QueryConfig, QueryError, QueryKey, QueryState};
pub use session::{AuthState, CurrentUser, SessionStateError};
