//! Integration tests for the REST client and endpoint wrappers
//!
//! These use wiremock to stand in for the backend and exercise the full
//! request/response cycle, error mapping, and retry behavior.

use serde_json::json;
use todo_client::auth::AuthApi;
use todo_client::health::HealthApi;
use todo_client::rest::{ApiRequest, RestClient, RestClientConfig};
use todo_client::session::SessionManager;
use todo_client::todos::{CreateTodoRequest, TodoApi, UpdateTodoRequest};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> RestClient {
    RestClient::new(RestClientConfig::new(server.uri()))
}

fn sample_todo(id: &str, title: &str, completed: bool) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "completed": completed,
        "createdAt": "2024-05-01T12:00:00Z"
    })
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_ok() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    let api = HealthApi::new(client_for(&server));
    let health = api.get().await.unwrap();

    assert!(health.is_ok());
}

#[tokio::test]
async fn test_health_unreachable() {
    let client = RestClient::new(RestClientConfig::new("http://127.0.0.1:1"));
    let api = HealthApi::new(client);

    let error = api.get().await.unwrap_err();
    assert_eq!(error.status(), 0);
    assert!(error.is_network_error());
}

// =============================================================================
// Todos
// =============================================================================

#[tokio::test]
async fn test_list_todos() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            sample_todo("1", "Buy milk", false),
            sample_todo("2", "Walk dog", true),
        ])))
        .mount(&server)
        .await;

    let api = TodoApi::new(client_for(&server));
    let todos = api.list().await.unwrap();

    assert_eq!(todos.len(), 2);
    assert_eq!(todos[0].title, "Buy milk");
    assert!(todos[1].completed);
}

#[tokio::test]
async fn test_create_todo_sends_title() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/todos"))
        .and(body_json(json!({"title": "Buy milk"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(sample_todo("1", "Buy milk", false)))
        .expect(1)
        .mount(&server)
        .await;

    let api = TodoApi::new(client_for(&server));
    let todo = api
        .create(CreateTodoRequest {
            title: "Buy milk".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(todo.id, "1");
    assert!(!todo.completed);
}

#[tokio::test]
async fn test_update_todo_patches_only_completed() {
    let server = MockServer::start().await;

    // The body must contain exactly the changed field
    Mock::given(method("PATCH"))
        .and(path("/todos/1"))
        .and(body_json(json!({"completed": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_todo("1", "Buy milk", true)))
        .expect(1)
        .mount(&server)
        .await;

    let api = TodoApi::new(client_for(&server));
    let todo = api.update("1", UpdateTodoRequest::completed(true)).await.unwrap();

    assert!(todo.completed);
    assert_eq!(todo.title, "Buy milk");
}

#[tokio::test]
async fn test_delete_todo() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/todos/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = TodoApi::new(client_for(&server));
    api.delete("1").await.unwrap();
}

#[tokio::test]
async fn test_backend_error_body_is_mapped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "NotFound",
            "message": "no such collection"
        })))
        .mount(&server)
        .await;

    let api = TodoApi::new(client_for(&server));
    let error = api.list().await.unwrap_err();

    assert_eq!(error.status(), 404);
    assert_eq!(error.error(), "NotFound");
    assert_eq!(error.message(), "no such collection");
}

#[tokio::test]
async fn test_malformed_json_is_a_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
        .mount(&server)
        .await;

    let api = TodoApi::new(client_for(&server));
    let error = api.list().await.unwrap_err();

    assert_eq!(error.error(), "ParseError");
}

// =============================================================================
// Retry
// =============================================================================

#[tokio::test]
async fn test_send_with_retry_recovers_from_503() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": "ServiceUnavailable",
            "message": "temporarily down"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .send_with_retry::<Vec<todo_client::Todo>>(ApiRequest::get("/todos"), 2)
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert!(response.data.is_empty());
}

#[tokio::test]
async fn test_no_retry_on_application_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "InvalidRequest",
            "message": "title required"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = ApiRequest::post("/todos")
        .json_body(&json!({"title": ""}))
        .unwrap();

    let result = client
        .send_with_retry::<todo_client::Todo>(request, 3)
        .await;

    assert!(result.is_err());
    assert_eq!(result.unwrap_err().status(), 400);
}

// =============================================================================
// Session
// =============================================================================

fn auth_session_body(user_id: &str, email: &str) -> serde_json::Value {
    json!({
        "userId": user_id,
        "email": email,
        "accessToken": "access-token",
        "refreshToken": "refresh-token",
        "expiresAt": "2999-01-01T00:00:00Z"
    })
}

#[tokio::test]
async fn test_login_persists_account() {
    let server = MockServer::start().await;
    let temp_dir = tempfile::TempDir::new().unwrap();
    let session_path = temp_dir.path().join("session.json");

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({
            "email": "alice@example.com",
            "password": "hunter22"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(auth_session_body("u-1", "alice@example.com")),
        )
        .expect(1)
        .mount(&server)
        .await;

    {
        let auth = AuthApi::new(client_for(&server));
        let mut manager = SessionManager::new(&session_path, auth).await.unwrap();

        let account = manager.login("alice@example.com", "hunter22").await.unwrap();
        assert_eq!(account.user_id, "u-1");
        assert!(manager.is_authenticated());
    }

    // Session survives a restart
    let auth = AuthApi::new(client_for(&server));
    let mut manager = SessionManager::new(&session_path, auth).await.unwrap();
    let resumed = manager.resume().await.unwrap();

    assert_eq!(resumed.unwrap().email, "alice@example.com");
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let server = MockServer::start().await;
    let temp_dir = tempfile::TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "InvalidCredentials",
            "message": "wrong email or password"
        })))
        .mount(&server)
        .await;

    let auth = AuthApi::new(client_for(&server));
    let mut manager = SessionManager::new(temp_dir.path().join("session.json"), auth)
        .await
        .unwrap();

    let result = manager.login("alice@example.com", "wrong").await;
    assert!(result.is_err());
    assert!(!manager.is_authenticated());
}

#[tokio::test]
async fn test_signup_then_logout() {
    let server = MockServer::start().await;
    let temp_dir = tempfile::TempDir::new().unwrap();
    let session_path = temp_dir.path().join("session.json");

    Mock::given(method("POST"))
        .and(path("/auth/signup"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(auth_session_body("u-2", "bob@example.com")),
        )
        .mount(&server)
        .await;

    let auth = AuthApi::new(client_for(&server));
    let mut manager = SessionManager::new(&session_path, auth).await.unwrap();

    manager.signup("bob@example.com", "secret99").await.unwrap();
    assert!(manager.is_authenticated());

    manager.logout().await.unwrap();
    assert!(manager.current_account().is_none());

    // Logout is persisted too
    let auth = AuthApi::new(client_for(&server));
    let reloaded = SessionManager::new(&session_path, auth).await.unwrap();
    assert!(reloaded.current_account().is_none());
}
