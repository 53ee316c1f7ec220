use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use helpdesk::config::Config;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.security.secret_key = "integration-test-secret".to_string();
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let state = helpdesk::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    helpdesk::api::router(state).await
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

async fn signup(app: &Router, name: &str, email: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/auth/signup",
        None,
        Some(json!({"name": name, "email": email, "password": "secret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "signup failed: {body}");
    body
}

async fn login(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"email": email, "password": "secret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    assert_eq!(body["token_type"], "bearer");
    body["access_token"].as_str().unwrap().to_string()
}

async fn client_token(app: &Router, name: &str, email: &str) -> String {
    signup(app, name, email).await;
    login(app, email).await
}

async fn create_request(app: &Router, token: &str, kind: i32, priority: i32) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/client/request/",
        Some(token),
        Some(json!({"type": kind, "request": "Printer on fire", "priority": priority})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create failed: {body}");
    body
}

#[tokio::test]
async fn test_signup_assigns_role_from_email() {
    let app = spawn_app().await;

    let client = signup(&app, "Ann", "ann@example.com").await;
    assert_eq!(client["userType"], 0);
    assert_eq!(client["email"], "ann@example.com");
    assert!(client.get("password_hash").is_none());

    let agent = signup(&app, "Sam", "Sam@SUPPORT.example.com").await;
    assert_eq!(agent["userType"], 1);
}

#[tokio::test]
async fn test_duplicate_signup_is_rejected() {
    let app = spawn_app().await;
    signup(&app, "Ann", "ann@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/auth/signup",
        None,
        Some(json!({"name": "Other", "email": "ann@example.com", "password": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
    assert_eq!(body["detail"], "This email address is already in use");
}

#[tokio::test]
async fn test_signup_rejects_malformed_email() {
    let app = spawn_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/auth/signup",
        None,
        Some(json!({"name": "Ann", "email": "not-an-email", "password": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_and_me() {
    let app = spawn_app().await;
    let token = client_token(&app, "Ann", "ann@example.com").await;

    let (status, body) = send(&app, "GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ann");
    assert_eq!(body["userType"], 0);
}

#[tokio::test]
async fn test_login_with_wrong_password_fails() {
    let app = spawn_app().await;
    signup(&app, "Ann", "ann@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"email": "ann@example.com", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid email or password");
}

#[tokio::test]
async fn test_protected_routes_require_bearer_token() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );

    let (status, body) = send(&app, "GET", "/client/my-requests/", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Could not validate credentials");
}

#[tokio::test]
async fn test_roles_are_enforced() {
    let app = spawn_app().await;
    let client = client_token(&app, "Ann", "ann@example.com").await;
    let agent = client_token(&app, "Sam", "sam@support.example.com").await;

    let (status, body) = send(&app, "GET", "/support/requests/", Some(&client), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Support Authorization required");

    let (status, body) = send(&app, "GET", "/client/my-requests/", Some(&agent), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Client Authorization required");
}

#[tokio::test]
async fn test_client_request_lifecycle() {
    let app = spawn_app().await;
    let token = client_token(&app, "Ann", "ann@example.com").await;

    let created = create_request(&app, &token, 1, 2).await;
    assert_eq!(created["type"], 1);
    assert_eq!(created["request"], "Printer on fire");
    assert_eq!(created["status"], 0);
    assert_eq!(created["priority"], 2);
    assert_eq!(created["viewed"], false);
    assert!(created["created_at"].is_string());
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", "/client/my-requests/", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/client/request/{id}"),
        Some(&token),
        Some(json!({"request": "Printer still on fire", "status": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["request"], "Printer still on fire");
    assert_eq!(body["status"], 0);
    assert_eq!(body["type"], 1);

    let (status, body) = send(&app, "GET", &format!("/client/request/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["request"], "Printer still on fire");
}

#[tokio::test]
async fn test_clients_cannot_see_each_others_requests() {
    let app = spawn_app().await;
    let ann = client_token(&app, "Ann", "ann@example.com").await;
    let bob = client_token(&app, "Bob", "bob@example.com").await;

    let created = create_request(&app, &ann, 0, 1).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", &format!("/client/request/{id}"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Couldn't find request");

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/client/request/{id}"),
        Some(&bob),
        Some(json!({"priority": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", "/client/my-requests/", Some(&bob), None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_out_of_range_enum_in_body_is_rejected() {
    let app = spawn_app().await;
    let token = client_token(&app, "Ann", "ann@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/client/request/",
        Some(&token),
        Some(json!({"type": 7, "request": "x", "priority": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_support_workflow() {
    let app = spawn_app().await;
    let client = client_token(&app, "Ann", "ann@example.com").await;
    let agent = client_token(&app, "Sam", "sam@support.example.com").await;

    let created = create_request(&app, &client, 2, 0).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", "/support/clients/", Some(&agent), None).await;
    assert_eq!(status, StatusCode::OK);
    let clients = body.as_array().unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0]["email"], "ann@example.com");

    let (_, body) = send(&app, "GET", "/support/requests/?viewed=false", Some(&agent), None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "GET", &format!("/support/request/{id}"), Some(&agent), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["viewed"], true);

    let (_, body) = send(&app, "GET", "/support/requests/?viewed=false", Some(&agent), None).await;
    assert!(body.as_array().unwrap().is_empty());

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/support/request/{id}/status"),
        Some(&agent),
        Some(json!({"status": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], 2);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/support/request/{id}/status"),
        Some(&agent),
        Some(json!({"status": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], 0);

    let (status, _) = send(&app, "GET", "/support/request/9999", Some(&agent), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_listing_filters_and_sorting() {
    let app = spawn_app().await;
    let client = client_token(&app, "Ann", "ann@example.com").await;
    let agent = client_token(&app, "Sam", "sam@support.example.com").await;

    let low = create_request(&app, &client, 1, 0).await;
    let high = create_request(&app, &client, 1, 2).await;
    create_request(&app, &client, 0, 1).await;

    let (status, body) = send(
        &app,
        "GET",
        "/support/requests/?type=1&sort_by=priority&sort_order=desc",
        Some(&agent),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].clone())
        .collect();
    assert_eq!(ids, vec![high["id"].clone(), low["id"].clone()]);

    let (_, odd) = send(
        &app,
        "GET",
        "/client/my-requests/?sort_by=foo&sort_order=sideways",
        Some(&client),
        None,
    )
    .await;
    let (_, explicit) = send(
        &app,
        "GET",
        "/client/my-requests/?sort_by=created_at&sort_order=desc",
        Some(&client),
        None,
    )
    .await;
    assert_eq!(odd, explicit);

    let (status, body) = send(&app, "GET", "/support/requests/?status=5", Some(&agent), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_non_positive_request_ids_are_not_found() {
    let app = spawn_app().await;
    let client = client_token(&app, "Ann", "ann@example.com").await;
    let agent = client_token(&app, "Sam", "sam@support.example.com").await;

    let (status, body) = send(&app, "GET", "/client/request/0", Some(&client), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Couldn't find request"}));

    let (status, body) = send(&app, "GET", "/support/request/-1", Some(&agent), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Couldn't find request"}));

    let (status, _) = send(
        &app,
        "PUT",
        "/support/request/0/status",
        Some(&agent),
        Some(json!({"status": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_listings_are_bare_arrays() {
    let app = spawn_app().await;
    let client = client_token(&app, "Ann", "ann@example.com").await;
    create_request(&app, &client, 0, 0).await;

    let (status, body) = send(&app, "GET", "/client/my-requests/", Some(&client), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_array());
    assert!(body[0]["id"].is_i64());
}
