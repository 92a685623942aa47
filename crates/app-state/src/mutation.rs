//! Mutation management
//!
//! Mutations are server writes. They are deliberately simple: run the
//! request, and on success invalidate the query scopes it affects so the
//! next read refetches. There is no local write-ahead of the server state
//! and nothing to roll back; a failed mutation leaves the cache untouched.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use todo_client::ApiError;
use tokio::sync::RwLock;

use crate::query::{QueryClient, QueryKey};

/// Mutation errors
#[derive(Debug, Error)]
pub enum MutationError {
    /// Mutation execution failed
    #[error("Mutation failed: {0}")]
    ExecutionError(String),

    /// API error from the backend
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for mutation operations
pub type Result<T> = std::result::Result<T, MutationError>;

/// Mutation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    /// Mutation has not been run
    Idle,

    /// Mutation is in flight
    Pending,

    /// Mutation succeeded
    Success,

    /// Mutation failed
    Error,
}

/// Mutation configuration
#[derive(Debug, Clone, Default)]
pub struct MutationConfig {
    /// Query scopes to invalidate after the mutation succeeds
    pub invalidate_scopes: Vec<String>,

    /// Specific query keys to invalidate after the mutation succeeds
    pub invalidate_keys: Vec<QueryKey>,
}

impl MutationConfig {
    /// Create a new mutation configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate an entire query scope on success
    pub fn invalidate_scope(mut self, scope: impl Into<String>) -> Self {
        self.invalidate_scopes.push(scope.into());
        self
    }

    /// Invalidate a specific query key on success
    pub fn invalidate_key(mut self, key: QueryKey) -> Self {
        self.invalidate_keys.push(key);
        self
    }
}

/// Mutation trait for defining server writes
#[async_trait]
pub trait Mutation: Send + Sync {
    /// Input type for the mutation
    type Input: Send + Sync;

    /// Output type returned by the server
    type Output: Send + Sync;

    /// Execute the mutation against the server
    async fn mutate(&self, input: Self::Input) -> Result<Self::Output>;

    /// Get the mutation configuration
    fn config(&self) -> MutationConfig {
        MutationConfig::default()
    }
}

/// Mutation client tracking state and driving cache invalidation
///
/// Mutations are never retried; the caller decides whether to run them
/// again. Successful mutations invalidate the configured scopes and keys
/// before `run` returns, so a read issued afterwards always refetches.
pub struct MutationClient {
    query_client: QueryClient,
    states: Arc<RwLock<HashMap<String, MutationState>>>,
    errors: Arc<RwLock<HashMap<String, String>>>,
}

impl MutationClient {
    /// Create a new mutation client
    ///
    /// # Arguments
    ///
    /// * `query_client` - Query client whose cache the mutations invalidate
    pub fn new(query_client: QueryClient) -> Self {
        Self {
            query_client,
            states: Arc::new(RwLock::new(HashMap::new())),
            errors: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Run a mutation
    ///
    /// # Arguments
    ///
    /// * `mutation` - The mutation to run
    /// * `input` - Input passed to the mutation
    /// * `mutation_id` - Identifier used for state tracking
    pub async fn run<M: Mutation>(
        &self,
        mutation: &M,
        input: M::Input,
        mutation_id: impl Into<String>,
    ) -> Result<M::Output> {
        let mutation_id = mutation_id.into();
        let config = mutation.config();

        {
            let mut states = self.states.write().await;
            states.insert(mutation_id.clone(), MutationState::Pending);
        }
        {
            let mut errors = self.errors.write().await;
            errors.remove(&mutation_id);
        }

        match mutation.mutate(input).await {
            Ok(output) => {
                for scope in &config.invalidate_scopes {
                    self.query_client.invalidate_scope(scope).await;
                }
                for key in &config.invalidate_keys {
                    self.query_client.invalidate(key).await;
                }

                let mut states = self.states.write().await;
                states.insert(mutation_id, MutationState::Success);

                Ok(output)
            }
            Err(error) => {
                tracing::warn!(mutation = %mutation_id, error = %error, "mutation failed");

                {
                    let mut errors = self.errors.write().await;
                    errors.insert(mutation_id.clone(), error.to_string());
                }
                let mut states = self.states.write().await;
                states.insert(mutation_id, MutationState::Error);

                Err(error)
            }
        }
    }

    /// Get the state of a mutation
    pub async fn state(&self, mutation_id: &str) -> MutationState {
        let states = self.states.read().await;
        states
            .get(mutation_id)
            .copied()
            .unwrap_or(MutationState::Idle)
    }

    /// Get the last error message for a mutation, if any
    pub async fn last_error(&self, mutation_id: &str) -> Option<String> {
        let errors = self.errors.read().await;
        errors.get(mutation_id).cloned()
    }

    /// Reset a mutation back to idle
    pub async fn reset(&self, mutation_id: &str) {
        let mut states = self.states.write().await;
        states.remove(mutation_id);
        let mut errors = self.errors.write().await;
        errors.remove(mutation_id);
    }

    /// Clear all mutation state
    pub async fn clear(&self) {
        let mut states = self.states.write().await;
        states.clear();
        let mut errors = self.errors.write().await;
        errors.clear();
    }

    /// Get the underlying query client
    pub fn query_client(&self) -> &QueryClient {
        &self.query_client
    }
}

impl Clone for MutationClient {
    fn clone(&self) -> Self {
        Self {
            query_client: self.query_client.clone(),
            states: Arc::clone(&self.states),
            errors: Arc::clone(&self.errors),
        }
    }
}
