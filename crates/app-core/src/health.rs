//! Health service
//!
//! Wraps `GET /health` in a query with a 5-second stale window, matching the
//! header's poll interval. Transport failures are reported as a distinct
//! status instead of an error so the header can show "unreachable".

use async_trait::async_trait;
use std::time::Duration;
use todo_client::health::HealthApi;

use app_state::query::{Query, QueryClient, QueryConfig, QueryKey};

/// Backend health as shown in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// Backend responded with `status: "ok"`
    Healthy,

    /// Backend responded, but not with `status: "ok"`
    Unhealthy,

    /// Backend could not be reached
    Unreachable,
}

/// Query for the backend health endpoint
#[derive(Clone)]
pub struct HealthQuery {
    api: HealthApi,
}

#[async_trait]
impl Query for HealthQuery {
    type Data = String;

    async fn fetch(&self) -> app_state::query::Result<Self::Data> {
        let response = self.api.get().await?;
        Ok(response.status)
    }

    fn key(&self) -> QueryKey {
        QueryKey::new("health", "status")
    }

    fn config(&self) -> QueryConfig {
        QueryConfig {
            stale_time: Duration::from_secs(5),
            refetch_on_stale: true,
            ..Default::default()
        }
    }
}

/// Health service
pub struct HealthService {
    api: HealthApi,
    queries: QueryClient,
}

impl HealthService {
    /// Create a new health service
    pub fn new(api: HealthApi, queries: QueryClient) -> Self {
        Self { api, queries }
    }

    /// Current backend health
    pub async fn status(&self) -> HealthStatus {
        let query = HealthQuery {
            api: self.api.clone(),
        };

        match self.queries.get(&query).await {
            Ok(status) if status == "ok" => HealthStatus::Healthy,
            Ok(status) => {
                tracing::warn!(status, "backend reported non-ok health");
                HealthStatus::Unhealthy
            }
            Err(e) => {
                tracing::warn!(error = %e, "health check failed");
                HealthStatus::Unreachable
            }
        }
    }
}

impl Clone for HealthService {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            queries: self.queries.clone(),
        }
    }
}
