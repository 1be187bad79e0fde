//! End-to-end tests of the accounts routes over in-memory SQLite.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use accounts::Accounts;
use appkit::db::{connect, DbConnConfig, MEMORY_DSN};
use appkit::{ConfigProvider, ModuleCtxBuilder, ModuleRegistry};

struct MapProvider(HashMap<String, Value>);

impl ConfigProvider for MapProvider {
    fn get_module_config(&self, module_name: &str) -> Option<&Value> {
        self.0.get(module_name)
    }
}

async fn app() -> Router {
    let db = connect(
        &DbConnConfig {
            url: MEMORY_DSN.to_string(),
            max_conns: None,
            busy_timeout_ms: None,
        },
        &std::env::temp_dir(),
    )
    .await
    .unwrap();

    let cfg = MapProvider(HashMap::from([(
        "accounts".to_string(),
        json!({ "bcrypt_cost": 4 }),
    )]));
    let ctx = ModuleCtxBuilder::new(CancellationToken::new())
        .with_db(db)
        .with_config_provider(Arc::new(cfg))
        .build();
    let registry = ModuleRegistry::new().with_full_module(Arc::new(Accounts::default()));

    appkit::runtime::build_router(&registry, &ctx, None)
        .await
        .unwrap()
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let req = match body {
        Some(b) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string())),
        None => req.body(Body::empty()),
    }
    .unwrap();

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register_and_login(app: &Router, username: &str) -> String {
    let (status, _) = send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "s3cret",
            "password_confirm": "s3cret",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "username": username, "password": "s3cret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn session_lifecycle() {
    let app = app().await;
    let token = register_and_login(&app, "fern").await;

    let (status, body) = send(&app, Method::GET, "/users/fern", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "fern");
    assert!(body["last_seen_at"].is_string());
    // no plant counter is registered in this app
    assert!(body.get("plant_count").is_none());

    let (status, _) = send(&app, Method::POST, "/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, "/users/fern", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "ACCOUNTS_UNAUTHENTICATED");
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/users/fern", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);
}

#[tokio::test]
async fn registration_conflicts_and_validation() {
    let app = app().await;
    register_and_login(&app, "fern").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "username": "fern",
            "email": "other@example.com",
            "password": "x",
            "password_confirm": "x",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ACCOUNTS_USERNAME_TAKEN");

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "username": "moss",
            "email": "moss@example.com",
            "password": "x",
            "password_confirm": "y",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "ACCOUNTS_VALIDATION");

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "username": "fern", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "ACCOUNTS_INVALID_CREDENTIALS");
}

#[tokio::test]
async fn profiles_are_private_and_editable() {
    let app = app().await;
    let fern = register_and_login(&app, "fern").await;
    register_and_login(&app, "moss").await;

    let (status, _) = send(&app, Method::GET, "/users/moss", Some(&fern), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/users/fern",
        Some(&fern),
        Some(json!({ "username": "fern_b", "description": "<i>green</i> thumb" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "fern_b");
    assert_eq!(body["description"], "green thumb");

    // the session follows the renamed user
    let (status, _) = send(&app, Method::GET, "/users/fern_b", Some(&fern), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/users/fern_b",
        Some(&fern),
        Some(json!({ "username": "moss" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ACCOUNTS_USERNAME_TAKEN");
}
