//! Health endpoint
//!
//! `GET /health` returns `{ "status": "ok" }` when the backend is up.

use serde::{Deserialize, Serialize};

use crate::rest::{ApiError, ApiRequest, RestClient};

/// Response from `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Backend status string; "ok" means healthy
    pub status: String,
}

impl HealthResponse {
    /// Whether the backend reported itself healthy
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Typed client for the health endpoint
#[derive(Debug, Clone)]
pub struct HealthApi {
    client: RestClient,
}

impl HealthApi {
    /// Create a new health API over a REST client
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    /// Fetch the backend's health status
    pub async fn get(&self) -> Result<HealthResponse, ApiError> {
        let response = self
            .client
            .send::<HealthResponse>(ApiRequest::get("/health"))
            .await?;
        Ok(response.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ok() {
        assert!(HealthResponse { status: "ok".to_string() }.is_ok());
        assert!(!HealthResponse { status: "degraded".to_string() }.is_ok());
    }
}
