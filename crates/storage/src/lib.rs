//! Local storage for Taskdeck
//!
//! This crate provides the two pieces of client-side state the app keeps:
//! an in-memory cache with LRU eviction and TTL expiry (backing the query
//! layer), and atomic JSON file persistence (backing the session store).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod persistence;

pub use cache::{CacheConfig, MemoryCache};
pub use persistence::{PersistedState, PersistenceConfig, PersistenceError};
