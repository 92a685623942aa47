//! Todo service
//!
//! List reads go through the query cache under the "todos" scope; every
//! write invalidates that scope on success so the next list refetches.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use todo_client::todos::{CreateTodoRequest, Todo, TodoApi, UpdateTodoRequest};
use todo_client::ApiError;

use app_state::mutation::{Mutation, MutationClient, MutationConfig, MutationError};
use app_state::query::{Query, QueryClient, QueryConfig, QueryError, QueryKey};

/// Errors that can occur during todo operations
#[derive(Debug, Error)]
pub enum TodoError {
    /// Title is empty after trimming
    #[error("Todo title cannot be empty")]
    EmptyTitle,

    /// API error from the backend
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Query error
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// Mutation error
    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),
}

/// Result type for todo operations
pub type Result<T> = std::result::Result<T, TodoError>;

/// Query for the full todo collection
#[derive(Clone)]
pub struct TodosQuery {
    api: TodoApi,
}

impl TodosQuery {
    /// Create a new todos query
    pub fn new(api: TodoApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Query for TodosQuery {
    type Data = Vec<Todo>;

    async fn fetch(&self) -> app_state::query::Result<Self::Data> {
        Ok(self.api.list().await?)
    }

    fn key(&self) -> QueryKey {
        QueryKey::new("todos", "all")
    }

    fn config(&self) -> QueryConfig {
        QueryConfig {
            stale_time: Duration::from_secs(30),
            ..Default::default()
        }
    }
}

/// Mutation creating a todo
pub struct CreateTodoMutation {
    api: TodoApi,
}

#[async_trait]
impl Mutation for CreateTodoMutation {
    type Input = CreateTodoRequest;
    type Output = Todo;

    async fn mutate(&self, input: Self::Input) -> app_state::mutation::Result<Self::Output> {
        Ok(self.api.create(input).await?)
    }

    fn config(&self) -> MutationConfig {
        MutationConfig::new().invalidate_scope("todos")
    }
}

/// Mutation updating fields of a todo
pub struct UpdateTodoMutation {
    api: TodoApi,
}

#[async_trait]
impl Mutation for UpdateTodoMutation {
    type Input = (String, UpdateTodoRequest);
    type Output = Todo;

    async fn mutate(&self, input: Self::Input) -> app_state::mutation::Result<Self::Output> {
        let (id, request) = input;
        Ok(self.api.update(&id, request).await?)
    }

    fn config(&self) -> MutationConfig {
        MutationConfig::new().invalidate_scope("todos")
    }
}

/// Mutation deleting a todo
pub struct DeleteTodoMutation {
    api: TodoApi,
}

#[async_trait]
impl Mutation for DeleteTodoMutation {
    type Input = String;
    type Output = ();

    async fn mutate(&self, input: Self::Input) -> app_state::mutation::Result<Self::Output> {
        Ok(self.api.delete(&input).await?)
    }

    fn config(&self) -> MutationConfig {
        MutationConfig::new().invalidate_scope("todos")
    }
}

/// Todo service
///
/// # Examples
///
/// ```no_run
/// # use app_core::todos::TodoService;
/// # use app_state::{MutationClient, QueryClient};
/// # use storage::CacheConfig;
/// # use todo_client::rest::{RestClient, RestClientConfig};
/// # use todo_client::todos::TodoApi;
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let api = TodoApi::new(RestClient::new(RestClientConfig::from_env()));
/// let queries = QueryClient::new(CacheConfig::default());
/// let service = TodoService::new(api, queries.clone(), MutationClient::new(queries));
///
/// let todo = service.create("Buy milk").await?;
/// service.set_completed(&todo.id, true).await?;
/// # Ok(())
/// # }
/// ```
pub struct TodoService {
    api: TodoApi,
    queries: QueryClient,
    mutations: MutationClient,
}

impl TodoService {
    /// Create a new todo service
    pub fn new(api: TodoApi, queries: QueryClient, mutations: MutationClient) -> Self {
        Self {
            api,
            queries,
            mutations,
        }
    }

    /// The query used for the todo collection
    pub fn query(&self) -> TodosQuery {
        TodosQuery::new(self.api.clone())
    }

    /// List all todos, served from the cache when fresh
    pub async fn list(&self) -> Result<Vec<Todo>> {
        Ok(self.queries.get(&self.query()).await?)
    }

    /// Create a todo
    ///
    /// The title is trimmed first; a title that is empty after trimming is
    /// rejected without issuing a request.
    pub async fn create(&self, title: &str) -> Result<Todo> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TodoError::EmptyTitle);
        }

        let mutation = CreateTodoMutation {
            api: self.api.clone(),
        };
        let todo = self
            .mutations
            .run(
                &mutation,
                CreateTodoRequest {
                    title: title.to_string(),
                },
                "todos.create",
            )
            .await?;

        tracing::debug!(id = %todo.id, "todo created");
        Ok(todo)
    }

    /// Rename a todo
    pub async fn rename(&self, id: &str, title: &str) -> Result<Todo> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TodoError::EmptyTitle);
        }

        self.update(id, UpdateTodoRequest::title(title)).await
    }

    /// Set a todo's completed flag, sending only that field
    pub async fn set_completed(&self, id: &str, completed: bool) -> Result<Todo> {
        self.update(id, UpdateTodoRequest::completed(completed))
            .await
    }

    /// Apply a partial update to a todo
    pub async fn update(&self, id: &str, request: UpdateTodoRequest) -> Result<Todo> {
        let mutation = UpdateTodoMutation {
            api: self.api.clone(),
        };
        Ok(self
            .mutations
            .run(&mutation, (id.to_string(), request), "todos.update")
            .await?)
    }

    /// Delete a todo
    pub async fn delete(&self, id: &str) -> Result<()> {
        let mutation = DeleteTodoMutation {
            api: self.api.clone(),
        };
        self.mutations
            .run(&mutation, id.to_string(), "todos.delete")
            .await?;

        tracing::debug!(id, "todo deleted");
        Ok(())
    }
}

impl Clone for TodoService {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            queries: self.queries.clone(),
            mutations: self.mutations.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::CacheConfig;
    use todo_client::rest::{RestClient, RestClientConfig};

    fn offline_service() -> TodoService {
        let api = TodoApi::new(RestClient::new(RestClientConfig::new("http://127.0.0.1:1")));
        let queries = QueryClient::new(CacheConfig::default());
        let mutations = MutationClient::new(queries.clone());
        TodoService::new(api, queries, mutations)
    }

    #[tokio::test]
    async fn test_create_rejects_empty_title_without_request() {
        let service = offline_service();

        // Would fail with a network error if a request were issued
        assert!(matches!(
            service.create("").await,
            Err(TodoError::EmptyTitle)
        ));
        assert!(matches!(
            service.create("   ").await,
            Err(TodoError::EmptyTitle)
        ));
    }

    #[tokio::test]
    async fn test_rename_rejects_empty_title() {
        let service = offline_service();

        assert!(matches!(
            service.rename("1", "  \t ").await,
            Err(TodoError::EmptyTitle)
        ));
    }

    #[tokio::test]
    async fn test_todos_query_key_scope() {
        let api = TodoApi::new(RestClient::new(RestClientConfig::new("http://127.0.0.1:1")));
        let query = TodosQuery::new(api);

        assert_eq!(query.key().scope, "todos");
    }
}
