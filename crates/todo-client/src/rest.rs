//! REST client implementation
//!
//! HTTP plumbing shared by every endpoint wrapper: request/response types,
//! error classification, retry with exponential backoff, and the reqwest
//! based client itself.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Environment variable selecting the API origin
pub const API_URL_ENV: &str = "TODO_API_URL";

/// Fallback API origin when `TODO_API_URL` is unset
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

// =============================================================================
// Error Types
// =============================================================================

/// API error with HTTP status and message
///
/// Covers both transport failures (status 0) and application-level errors
/// returned by the backend as `{ "error": ..., "message": ... }`.
///
/// # Examples
/// ```
/// use todo_client::rest::ApiError;
///
/// let error = ApiError::new(404, "NotFound", "Todo not found");
/// assert_eq!(error.status(), 404);
/// assert!(!error.is_network_error());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code (0 for transport failures)
    status: u16,
    /// Error code (e.g., "InvalidRequest", "NotFound")
    error: String,
    /// Human-readable error message
    message: String,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: u16, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            message: message.into(),
        }
    }

    /// Get the HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Get the error code
    pub fn error(&self) -> &str {
        &self.error
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if this is a network-related error that may succeed on retry
    ///
    /// Status 0 is a transport failure (connect error, timeout); the rest are
    /// the transient HTTP statuses.
    pub fn is_network_error(&self) -> bool {
        matches!(self.status, 0 | 408 | 429 | 500 | 502 | 503 | 504)
    }

    /// Check if this error is recoverable (can be retried)
    pub fn is_recoverable(&self) -> bool {
        self.is_network_error()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "API error {}: {} - {}",
            self.status, self.error, self.message
        )
    }
}

impl std::error::Error for ApiError {}

/// Standard error response body returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Error code
    pub error: String,
    /// Error message
    pub message: String,
}

// =============================================================================
// Request Types
// =============================================================================

/// HTTP method for API requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET request
    Get,
    /// POST request
    Post,
    /// PATCH request
    Patch,
    /// DELETE request
    Delete,
}

impl HttpMethod {
    /// Method name as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An API request: method, path, query parameters, headers, optional body
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Path relative to the base URL (e.g., "/todos")
    pub path: String,
    /// Query parameters
    pub params: HashMap<String, String>,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Request body (for POST/PATCH)
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: HashMap::new(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Create a GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Create a POST request
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Create a PATCH request
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    /// Create a DELETE request
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set a JSON body
    pub fn json_body<T: Serialize>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_vec(value)?);
        Ok(self)
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// API response with status, headers, and decoded data
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HashMap<String, String>,
    /// Response data
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Create a new response
    pub fn new(status: u16, headers: HashMap<String, String>, data: T) -> Self {
        Self {
            status,
            headers,
            data,
        }
    }

    /// Get a header value
    pub fn header(&self, key: &str) -> Option<&String> {
        self.headers.get(key)
    }

    /// Check if the response is successful (2xx status)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// =============================================================================
// Client Configuration
// =============================================================================

/// Configuration for the REST client
#[derive(Debug, Clone)]
pub struct RestClientConfig {
    /// Base URL of the API (e.g., "http://localhost:8080")
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Custom headers to include in all requests
    pub default_headers: HashMap<String, String>,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("Taskdeck/{}", env!("CARGO_PKG_VERSION")),
            default_headers: HashMap::new(),
        }
    }
}

impl RestClientConfig {
    /// Create a new config with a base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Read the base URL from `TODO_API_URL`, falling back to localhost
    pub fn from_env() -> Self {
        let base_url = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a default header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }
}

// =============================================================================
// Retry Logic with Exponential Backoff
// =============================================================================

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: usize,
    /// Initial delay between retries
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Backoff multiplier
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 1,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration
    pub fn new(max_retries: usize) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Set the initial delay
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    fn calculate_delay(&self, attempt: usize) -> Duration {
        let delay_ms =
            self.initial_delay.as_millis() as f64 * self.backoff_multiplier.powi(attempt as i32);
        let delay = Duration::from_millis(delay_ms as u64);

        if delay > self.max_delay {
            self.max_delay
        } else {
            delay
        }
    }
}

/// Retry an async operation with a configurable retry policy
///
/// # Arguments
/// * `config` - Retry configuration
/// * `should_retry` - Function deciding whether an error is worth retrying
/// * `operation` - The async operation to retry
pub async fn retry<F, Fut, T, E>(
    config: RetryConfig,
    should_retry: impl Fn(&E) -> bool,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempts = 0;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(err) => {
                attempts += 1;

                if !should_retry(&err) || attempts > config.max_retries {
                    return Err(err);
                }

                let delay = config.calculate_delay(attempts - 1);
                tracing::debug!(attempt = attempts, ?delay, "retrying request");
                sleep(delay).await;
            }
        }
    }
}

/// Retry network errors only
pub async fn network_retry<F, Fut, T>(max_retries: usize, operation: F) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let config = RetryConfig::new(max_retries);
    retry(config, |err: &ApiError| err.is_network_error(), operation).await
}

// =============================================================================
// REST Client Implementation
// =============================================================================

use reqwest::{Client as ReqwestClient, Response as ReqwestResponse};

/// REST client for the todo backend
///
/// # Examples
/// ```no_run
/// use todo_client::rest::{ApiRequest, RestClient, RestClientConfig};
///
/// async fn example() -> Result<(), Box<dyn std::error::Error>> {
///     let client = RestClient::new(RestClientConfig::from_env());
///     let response = client.send::<serde_json::Value>(ApiRequest::get("/health")).await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RestClient {
    client: ReqwestClient,
    config: RestClientConfig,
}

impl RestClient {
    /// Create a new REST client
    pub fn new(config: RestClientConfig) -> Self {
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .expect("Failed to build HTTP client");

        Self { client, config }
    }

    /// Send a request and decode a JSON response body
    pub async fn send<T>(&self, request: ApiRequest) -> Result<ApiResponse<T>, ApiError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self.execute(request).await?;
        let (status, headers) = Self::split_meta(&response);

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::new(0, "ParseError", format!("Failed to read response: {}", e)))?;

        let data: T = serde_json::from_str(&body)
            .map_err(|e| ApiError::new(0, "ParseError", format!("Failed to parse JSON: {}", e)))?;

        Ok(ApiResponse::new(status, headers, data))
    }

    /// Send a request and ignore the response body (e.g., DELETE)
    pub async fn send_no_content(&self, request: ApiRequest) -> Result<ApiResponse<()>, ApiError> {
        let response = self.execute(request).await?;
        let (status, headers) = Self::split_meta(&response);
        Ok(ApiResponse::new(status, headers, ()))
    }

    /// Send a request with retry on network errors
    pub async fn send_with_retry<T>(
        &self,
        request: ApiRequest,
        max_retries: usize,
    ) -> Result<ApiResponse<T>, ApiError>
    where
        T: for<'de> Deserialize<'de>,
    {
        network_retry(max_retries, || self.send(request.clone())).await
    }

    async fn execute(&self, request: ApiRequest) -> Result<ReqwestResponse, ApiError> {
        let url = format!("{}{}", self.config.base_url, request.path);

        let mut req = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Patch => self.client.patch(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (key, value) in &request.params {
            req = req.query(&[(key, value)]);
        }

        for (key, value) in &self.config.default_headers {
            req = req.header(key, value);
        }

        for (key, value) in &request.headers {
            req = req.header(key, value);
        }

        if let Some(body) = &request.body {
            req = req.header("Content-Type", "application/json").body(body.clone());
        }

        tracing::debug!(method = request.method.as_str(), %url, "sending request");

        let response = req
            .send()
            .await
            .map_err(|e| ApiError::new(0, "NetworkError", format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        Ok(response)
    }

    async fn error_from_response(response: ReqwestResponse) -> ApiError {
        let status = response.status().as_u16();
        let error_body = response.text().await.unwrap_or_default();

        match serde_json::from_str::<ApiErrorBody>(&error_body) {
            Ok(parsed) => ApiError::new(status, parsed.error, parsed.message),
            Err(_) => ApiError::new(status, "Unknown", format!("HTTP {}: {}", status, error_body)),
        }
    }

    fn split_meta(response: &ReqwestResponse) -> (u16, HashMap<String, String>) {
        let status = response.status().as_u16();

        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(value_str) = value.to_str() {
                headers.insert(key.to_string(), value_str.to_string());
            }
        }

        (status, headers)
    }

    /// Get the client configuration
    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

// =============================================================================
// Tests
// =============================================================================
