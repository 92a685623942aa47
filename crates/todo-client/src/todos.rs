//! Todo endpoints
//!
//! Typed wrappers over `GET /todos`, `POST /todos`, `PATCH /todos/{id}`,
//! and `DELETE /todos/{id}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rest::{ApiError, ApiRequest, RestClient};

/// A todo item as stored on the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Server-assigned identifier
    pub id: String,
    /// Todo title
    pub title: String,
    /// Whether the todo is done
    pub completed: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Body for `POST /todos`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodoRequest {
    /// Title of the new todo
    pub title: String,
}

/// Body for `PATCH /todos/{id}`
///
/// Fields left as `None` are omitted from the serialized body, so the server
/// only touches what the caller actually changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    /// New title, if changing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New completed flag, if changing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl UpdateTodoRequest {
    /// Update only the title
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Update only the completed flag
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Default::default()
        }
    }
}

/// Typed client for the todo endpoints
#[derive(Debug, Clone)]
pub struct TodoApi {
    client: RestClient,
}

impl TodoApi {
    /// Create a new todo API over a REST client
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    /// Fetch the full todo collection
    pub async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        let response = self.client.send::<Vec<Todo>>(ApiRequest::get("/todos")).await?;
        Ok(response.data)
    }

    /// Create a todo
    pub async fn create(&self, body: CreateTodoRequest) -> Result<Todo, ApiError> {
        let request = ApiRequest::post("/todos")
            .json_body(&body)
            .map_err(|e| ApiError::new(0, "SerializationError", e.to_string()))?;

        let response = self.client.send::<Todo>(request).await?;
        Ok(response.data)
    }

    /// Update a todo's title and/or completed flag
    pub async fn update(&self, id: &str, body: UpdateTodoRequest) -> Result<Todo, ApiError> {
        let request = ApiRequest::patch(format!("/todos/{}", id))
            .json_body(&body)
            .map_err(|e| ApiError::new(0, "SerializationError", e.to_string()))?;

        let response = self.client.send::<Todo>(request).await?;
        Ok(response.data)
    }

    /// Delete a todo
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .send_no_content(ApiRequest::delete(format!("/todos/{}", id)))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todo_wire_format() {
        let json = r#"{
            "id": "1",
            "title": "Buy milk",
            "completed": false,
            "createdAt": "2024-05-01T12:00:00Z"
        }"#;

        let todo: Todo = serde_json::from_str(json).unwrap();
        assert_eq!(todo.id, "1");
        assert_eq!(todo.title, "Buy milk");
        assert!(!todo.completed);
    }

    #[test]
    fn test_update_request_omits_unset_fields() {
        let body = UpdateTodoRequest::completed(true);
        let json = serde_json::to_string(&body).unwrap();

        assert_eq!(json, r#"{"completed":true}"#);
    }

    #[test]
    fn test_update_request_title_only() {
        let body = UpdateTodoRequest::title("Buy oat milk");
        let json = serde_json::to_string(&body).unwrap();

        assert_eq!(json, r#"{"title":"Buy oat milk"}"#);
    }
}
