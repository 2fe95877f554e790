// Integration tests for the HubSpot HTTP endpoints

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use hubspot_link::api::{create_app, IntegrationAppState};
use hubspot_link::config::{HubSpotConfig, StoreConfig};
use hubspot_link::integrations::hubspot::CONTACTS_PATH;
use hubspot_link::integrations::HubSpotIntegration;
use hubspot_link::store::{KeyValueStore, MemoryStore};
use mockito::{Server, ServerGuard};
use std::sync::Arc;
use tower::ServiceExt;

const TOKEN_BODY: &str =
    r#"{"access_token": "access-123", "expires_in": 1800, "token_type": "bearer"}"#;

fn create_test_app(server: &ServerGuard, store: &MemoryStore) -> Router {
    let config = HubSpotConfig {
        client_id: "test_client_id".to_string(),
        client_secret: "test_secret".to_string(),
        token_url: format!("{}/oauth/v1/token", server.url()),
        api_base_url: server.url(),
        ..Default::default()
    };
    let hubspot = HubSpotIntegration::new(config, &StoreConfig::default(), Arc::new(store.clone()));

    create_app(
        IntegrationAppState {
            hubspot: Arc::new(hubspot),
        },
        &["http://localhost:3000".to_string()],
    )
    .unwrap()
}

fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

/// Run /authorize and return the still-percent-encoded `state` parameter
async fn start_authorization(app: &Router, user_id: &str, org_id: &str) -> String {
    let response = app
        .clone()
        .oneshot(form_request(
            "/integrations/hubspot/authorize",
            &format!("user_id={}&org_id={}", user_id, org_id),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let url = body_json(response).await;
    let url = url.as_str().unwrap().to_string();
    url.split("&state=").nth(1).unwrap().to_string()
}

#[tokio::test]
async fn test_ping() {
    let server = Server::new_async().await;
    let app = create_test_app(&server, &MemoryStore::new());

    let response = app.oneshot(get_request("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["Ping"], "Pong");
}

#[tokio::test]
async fn test_authorize_returns_hubspot_url() {
    let server = Server::new_async().await;
    let store = MemoryStore::new();
    let app = create_test_app(&server, &store);

    let response = app
        .oneshot(form_request(
            "/integrations/hubspot/authorize",
            "user_id=TestUser&org_id=TestOrg",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let url = body_json(response).await;
    let url = url.as_str().unwrap();
    assert!(url.starts_with("https://app.hubspot.com/oauth/authorize?"));
    assert!(url.contains("client_id=test_client_id"));
    assert!(url.contains("&state="));

    assert!(store
        .get("hubspot_state:TestOrg:TestUser")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_full_flow_over_http() {
    let mut server = Server::new_async().await;
    let _token_mock = server
        .mock("POST", "/oauth/v1/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TOKEN_BODY)
        .create_async()
        .await;
    let _contacts_mock = server
        .mock("GET", CONTACTS_PATH)
        .match_header("authorization", "Bearer access-123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"results": [{"id": "7", "properties": {"firstname": "Ada", "lastname": "Lovelace", "email": "ada@example.com"}}]}"#,
        )
        .create_async()
        .await;
    let store = MemoryStore::new();
    let app = create_test_app(&server, &store);

    let state = start_authorization(&app, "TestUser", "TestOrg").await;

    // Callback closes the window
    let response = app
        .clone()
        .oneshot(get_request(&format!(
            "/integrations/hubspot/oauth2callback?code=abc&state={}",
            state
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("window.close()"));

    // Credentials handed out once
    let response = app
        .clone()
        .oneshot(form_request(
            "/integrations/hubspot/credentials",
            "user_id=TestUser&org_id=TestOrg",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let credentials = body_json(response).await;
    assert_eq!(credentials["access_token"], "access-123");

    let response = app
        .clone()
        .oneshot(form_request(
            "/integrations/hubspot/credentials",
            "user_id=TestUser&org_id=TestOrg",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["detail"], "No credentials found.");

    // Load items with the credential blob
    let blob = credentials.to_string();
    let response = app
        .oneshot(form_request(
            "/integrations/hubspot/load",
            &format!("credentials={}", urlencoding::encode(&blob)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let items = body_json(response).await;
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], "7");
    assert_eq!(items[0]["type"], "unknown");
    assert_eq!(items[0]["name"], "Unnamed Item");
    assert_eq!(items[0]["firstname"], "Ada");
    assert_eq!(items[0]["email"], "ada@example.com");
    assert!(items[0]["parent_id"].is_null());
}

#[tokio::test]
async fn test_callback_with_provider_error() {
    let server = Server::new_async().await;
    let app = create_test_app(&server, &MemoryStore::new());

    let response = app
        .oneshot(get_request(
            "/integrations/hubspot/oauth2callback?error=access_denied&state=whatever",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["detail"], "access_denied");
}

#[tokio::test]
async fn test_callback_with_invalid_state() {
    let server = Server::new_async().await;
    let app = create_test_app(&server, &MemoryStore::new());

    let response = app
        .oneshot(get_request(
            "/integrations/hubspot/oauth2callback?code=abc&state=%21%21not-base64",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["detail"], "Invalid state parameter.");
}

#[tokio::test]
async fn test_callback_with_failed_exchange() {
    let mut server = Server::new_async().await;
    let _token_mock = server
        .mock("POST", "/oauth/v1/token")
        .with_status(400)
        .with_body(r#"{"status": "BAD_AUTH_CODE"}"#)
        .create_async()
        .await;
    let store = MemoryStore::new();
    let app = create_test_app(&server, &store);

    let state = start_authorization(&app, "TestUser", "TestOrg").await;

    let response = app
        .oneshot(get_request(&format!(
            "/integrations/hubspot/oauth2callback?code=bad&state={}",
            state
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["detail"],
        "Failed to obtain access token."
    );
    assert_eq!(store.count(), 0);
}

#[tokio::test]
async fn test_load_with_upstream_failure() {
    let mut server = Server::new_async().await;
    let _contacts_mock = server
        .mock("GET", CONTACTS_PATH)
        .with_status(500)
        .create_async()
        .await;
    let app = create_test_app(&server, &MemoryStore::new());

    let blob = urlencoding::encode(TOKEN_BODY).into_owned();
    let response = app
        .oneshot(form_request(
            "/integrations/hubspot/load",
            &format!("credentials={}", blob),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["detail"],
        "Failed to fetch data from HubSpot"
    );
}

#[tokio::test]
async fn test_cors_allows_frontend_origin() {
    let server = Server::new_async().await;
    let app = create_test_app(&server, &MemoryStore::new());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header(header::ORIGIN, "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:3000"
    );
}
