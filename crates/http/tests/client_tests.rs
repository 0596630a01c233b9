//! Integration tests for the Stockroom HTTP client

use serde_json::json;
use std::sync::Arc;
use stockroom_core::{MemoryTokenStorage, SessionStore};
use stockroom_http::client::{ApiRequest, ClientError, StockroomClient};
use stockroom_http::types::{Credentials, ListParams, StockMovement};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn signed_out() -> Arc<SessionStore> {
    SessionStore::shared(MemoryTokenStorage::new())
}

fn signed_in(token: &str) -> Arc<SessionStore> {
    SessionStore::shared(MemoryTokenStorage::with_token(token))
}

fn credentials() -> Credentials {
    Credentials {
        email: "ana@example.com".to_string(),
        password: "secret".to_string(),
    }
}

async fn only_request(server: &MockServer) -> Request {
    let mut requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "expected exactly one request");
    requests.remove(0)
}

#[tokio::test]
async fn test_client_builder() {
    let client = StockroomClient::builder()
        .base_url("http://localhost:3333/")
        .session(signed_out())
        .build()
        .unwrap();

    assert_eq!(client.base_url(), "http://localhost:3333");
}

#[tokio::test]
async fn test_client_builder_requires_base_url() {
    let result = StockroomClient::builder().session(signed_out()).build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));

    let result = StockroomClient::new("   ", signed_out());
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn test_client_builder_requires_session() {
    let result = StockroomClient::builder()
        .base_url("http://localhost:3333")
        .build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn test_bearer_token_injected_when_signed_in() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/inventory"))
        .and(header("authorization", "Bearer abc"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = StockroomClient::new(mock_server.uri(), signed_in("abc")).unwrap();

    let response = client.get_inventory(&ListParams::default()).await.unwrap();
    assert_eq!(response, Some(json!({"items": []})));
}

#[tokio::test]
async fn test_no_authorization_header_when_signed_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let client = StockroomClient::new(mock_server.uri(), signed_out()).unwrap();
    client.get_sessions(&json!({"page": 1})).await.unwrap();

    let request = only_request(&mock_server).await;
    assert!(!request.headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_token_changes_apply_to_next_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let session = signed_out();
    let client = StockroomClient::new(mock_server.uri(), session.clone()).unwrap();

    session.set_token("first").unwrap();
    client.get_users(&()).await.unwrap();
    session.clear().unwrap();
    client.get_users(&()).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests[0].headers["authorization"], "Bearer first");
    assert!(!requests[1].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_signin_never_sends_authorization() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/signin"))
        .and(body_json(json!({"email": "ana@example.com", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "fresh"})))
        .mount(&mock_server)
        .await;

    let client = StockroomClient::new(mock_server.uri(), signed_in("stale")).unwrap();

    let response = client.signin_for_token(&credentials()).await.unwrap();
    assert_eq!(response.token, "fresh");

    let request = only_request(&mock_server).await;
    assert!(!request.headers.contains_key("authorization"));
    assert_eq!(request.headers["content-type"], "application/json");
    // The client reads the session but never writes it
    assert_eq!(client.session().token().as_deref(), Some("stale"));
}

#[tokio::test]
async fn test_signup_never_sends_authorization() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/signup"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "c1"})))
        .mount(&mock_server)
        .await;

    let client = StockroomClient::new(mock_server.uri(), signed_in("abc")).unwrap();

    let response = client
        .signup(&json!({"name": "Ana", "company": "Acme"}))
        .await
        .unwrap();
    assert_eq!(response, Some(json!({"id": "c1"})));

    let request = only_request(&mock_server).await;
    assert!(!request.headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_signin_failure_uses_server_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/signin"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Wrong password"})),
        )
        .mount(&mock_server)
        .await;

    let client = StockroomClient::new(mock_server.uri(), signed_out()).unwrap();

    let err = client.signin(&credentials()).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidCredentials { status: 401, .. }));
    assert_eq!(err.to_string(), "Wrong password");
}

#[tokio::test]
async fn test_signin_failure_without_body_uses_credentials_fallback() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/signin"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let client = StockroomClient::new(mock_server.uri(), signed_out()).unwrap();

    let err = client.signin(&credentials()).await.unwrap_err();
    assert_eq!(err.to_string(), "invalid credentials");
}

#[tokio::test]
async fn test_signup_failure_fallback_mentions_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/signup"))
        .respond_with(ResponseTemplate::new(422).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = StockroomClient::new(mock_server.uri(), signed_out()).unwrap();

    let err = client.signup(&json!({})).await.unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert!(err.to_string().contains("422"));
}

#[tokio::test]
async fn test_no_content_yields_no_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/inventory/42"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = StockroomClient::new(mock_server.uri(), signed_in("abc")).unwrap();

    let response = client.delete_inventory_item("42").await.unwrap();
    assert_eq!(response, None);
}

#[tokio::test]
async fn test_error_message_taken_from_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/users/7"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({"message": "X"})))
        .mount(&mock_server)
        .await;

    let client = StockroomClient::new(mock_server.uri(), signed_in("abc")).unwrap();

    let err = client.delete_user("7").await.unwrap_err();
    assert_eq!(err.to_string(), "X");
    assert_eq!(err.status(), Some(409));
}

#[tokio::test]
async fn test_error_without_parseable_body_mentions_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/inventory"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = StockroomClient::new(mock_server.uri(), signed_in("abc")).unwrap();

    let err = client.get_inventory(&()).await.unwrap_err();
    assert_eq!(err.to_string(), "request failed with status 500");

    let err = client.get_users(&()).await.unwrap_err();
    assert_eq!(err.to_string(), "request failed with status 503");
}

#[tokio::test]
async fn test_unauthorized_is_reported_as_auth_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Token expired"})))
        .mount(&mock_server)
        .await;

    let session = signed_in("old");
    let client = StockroomClient::new(mock_server.uri(), session.clone()).unwrap();

    let err = client.get_sessions(&()).await.unwrap_err();
    assert!(err.is_auth_failure());
    assert_eq!(err.to_string(), "Token expired");
    // Clearing the session is the caller's decision
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn test_transport_error() {
    // Nothing listens on port 1
    let client = StockroomClient::new("http://127.0.0.1:1", signed_out()).unwrap();

    let err = client.get_users(&()).await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}

#[tokio::test]
async fn test_create_inventory_item_returns_created_object() {
    let mock_server = MockServer::start().await;

    let created = json!({"id": "i1", "name": "X", "qty": 5});
    Mock::given(method("POST"))
        .and(path("/inventory"))
        .and(body_json(json!({"name": "X", "qty": 5})))
        .respond_with(ResponseTemplate::new(201).set_body_json(&created))
        .mount(&mock_server)
        .await;

    let client = StockroomClient::new(mock_server.uri(), signed_in("abc")).unwrap();

    let response = client
        .create_inventory_item(&json!({"name": "X", "qty": 5}))
        .await
        .unwrap();
    assert_eq!(response, Some(created));
}

#[tokio::test]
async fn test_get_users_drops_empty_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&mock_server)
        .await;

    let client = StockroomClient::new(mock_server.uri(), signed_in("abc")).unwrap();

    client
        .get_users(&json!({"search": "", "page": 1, "limit": 10}))
        .await
        .unwrap();

    let request = only_request(&mock_server).await;
    assert_eq!(request.url.query(), Some("page=1&limit=10"));
}

#[tokio::test]
async fn test_list_without_params_sends_no_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let client = StockroomClient::new(mock_server.uri(), signed_in("abc")).unwrap();
    client
        .get_sessions(&ListParams {
            search: Some(String::new()),
            ..ListParams::default()
        })
        .await
        .unwrap();

    let request = only_request(&mock_server).await;
    assert_eq!(request.url.query(), None);
}

#[tokio::test]
async fn test_stock_adjustments() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/inventory/i1/input"))
        .and(body_json(json!({"quantity": 4, "obs": "restock"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"qty": 9})))
        .mount(&mock_server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/inventory/i1/output"))
        .and(body_json(json!({"quantity": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"qty": 7})))
        .mount(&mock_server)
        .await;

    let client = StockroomClient::new(mock_server.uri(), signed_in("abc")).unwrap();

    let added = client
        .add_stock(
            "i1",
            &StockMovement {
                quantity: 4,
                obs: Some("restock".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(added, Some(json!({"qty": 9})));

    let removed = client
        .remove_stock(
            "i1",
            &StockMovement {
                quantity: 2,
                obs: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(removed, Some(json!({"qty": 7})));
}

#[tokio::test]
async fn test_user_and_session_mutations() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "u1"})))
        .mount(&mock_server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/users/u1"))
        .and(body_json(json!({"name": "Bea"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "u1", "name": "Bea"})))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "s1"})))
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/session/s1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = StockroomClient::new(mock_server.uri(), signed_in("abc")).unwrap();

    let user = client
        .create_user(&json!({"name": "Ana", "email": "ana@example.com", "password": "pw"}))
        .await
        .unwrap();
    assert_eq!(user, Some(json!({"id": "u1"})));

    let updated = client.update_user("u1", &json!({"name": "Bea"})).await.unwrap();
    assert_eq!(updated, Some(json!({"id": "u1", "name": "Bea"})));

    let session = client.create_session(&json!({"name": "Morning"})).await.unwrap();
    assert_eq!(session, Some(json!({"id": "s1"})));

    assert_eq!(client.delete_session("s1").await.unwrap(), None);
}

#[tokio::test]
async fn test_caller_headers_override_defaults() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/inventory"))
        .and(header("content-type", "application/merge-patch+json"))
        .and(header("x-request-id", "r-1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = StockroomClient::new(mock_server.uri(), signed_in("abc")).unwrap();

    let request = ApiRequest::post("/inventory")
        .json(&json!({"name": "X"}))
        .unwrap()
        .header(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/merge-patch+json"),
        )
        .header(
            reqwest::header::HeaderName::from_static("x-request-id"),
            reqwest::header::HeaderValue::from_static("r-1"),
        );

    let response = client.send(request).await.unwrap();
    assert_eq!(response, Some(json!({"ok": true})));
}

#[tokio::test]
async fn test_undecodable_success_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/inventory"))
        .respond_with(ResponseTemplate::new(200).set_body_string("definitely not json"))
        .mount(&mock_server)
        .await;

    let client = StockroomClient::new(mock_server.uri(), signed_in("abc")).unwrap();

    let err = client.get_inventory_items(&()).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn test_ids_are_escaped_in_paths() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/users/a%2Fb"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = StockroomClient::new(mock_server.uri(), signed_in("abc")).unwrap();

    assert_eq!(client.delete_user("a/b").await.unwrap(), None);
}
