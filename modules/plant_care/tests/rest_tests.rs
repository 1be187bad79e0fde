//! End-to-end tests of the plant_care routes with the accounts module,
//! over in-memory SQLite.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Days, Utc};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use accounts::Accounts;
use appkit::db::{connect, DbConnConfig, MEMORY_DSN};
use appkit::{ConfigProvider, ModuleCtxBuilder, ModuleRegistry};
use plant_care::contract::model::CatalogPlant;
use plant_care::domain::repo::CatalogRepository;
use plant_care::infra::storage::SeaOrmCatalogRepository;
use plant_care::PlantCare;

struct MapProvider(HashMap<String, Value>);

impl ConfigProvider for MapProvider {
    fn get_module_config(&self, module_name: &str) -> Option<&Value> {
        self.0.get(module_name)
    }
}

struct TestApp {
    router: Router,
    _home: TempDir,
}

async fn seed_catalog(db: &DatabaseConnection) {
    let repo = SeaOrmCatalogRepository::new(db.clone());
    for (plant_id, common_name, min, max) in [
        (1, "Boston Fern", 300, 600),
        (2, "Hedgehog Cactus", 0, 0),
        (3, "Fern Leaf Lavender", 200, 400),
    ] {
        repo.upsert(CatalogPlant {
            plant_id,
            botanical_name: format!("Botanica {plant_id}"),
            common_name: common_name.to_string(),
            min_water_consumption: min,
            max_water_consumption: max,
            image_location: format!("img/{plant_id}.jpg"),
            ..CatalogPlant::default()
        })
        .await
        .unwrap();
    }
}

async fn app() -> TestApp {
    let home = tempfile::tempdir().unwrap();
    let db = connect(
        &DbConnConfig {
            url: MEMORY_DSN.to_string(),
            max_conns: None,
            busy_timeout_ms: None,
        },
        home.path(),
    )
    .await
    .unwrap();

    let cfg = MapProvider(HashMap::from([
        ("accounts".to_string(), json!({ "bcrypt_cost": 4 })),
        (
            "plant_care".to_string(),
            json!({ "plants_per_page": 2, "max_upload_bytes": 1024 }),
        ),
    ]));
    let ctx = ModuleCtxBuilder::new(CancellationToken::new())
        .with_db(db.clone())
        .with_config_provider(Arc::new(cfg))
        .with_home_dir(home.path())
        .build();
    let registry = ModuleRegistry::new()
        .with_full_module(Arc::new(Accounts::default()))
        .with_full_module(Arc::new(PlantCare::default()));

    let router = appkit::runtime::build_router(&registry, &ctx, None)
        .await
        .unwrap();
    seed_catalog(&db).await;

    TestApp {
        router,
        _home: home,
    }
}

async fn call(app: &TestApp, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.router.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn send(
    app: &TestApp,
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
    call(app, req).await
}

async fn login_as(app: &TestApp, username: &str) -> String {
    let (status, _) = send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "pw",
            "password_confirm": "pw",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "username": username, "password": "pw" })),
    )
    .await;
    body["token"].as_str().unwrap().to_string()
}

fn plant_body(plant_id: i32, days_ago: u64) -> Value {
    let last = Utc::now()
        .date_naive()
        .checked_sub_days(Days::new(days_ago))
        .unwrap();
    json!({
        "plant_id": plant_id,
        "size": 40.0,
        "sun_exposure": "medium",
        "pot_diameter_cm": 20.0,
        "last_watered": last.to_string(),
        "watered_amount_l": 0.3,
        "position": "window",
    })
}

async fn add(app: &TestApp, token: &str, plant_id: i32, days_ago: u64) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/plants",
        Some(token),
        Some(plant_body(plant_id, days_ago)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().unwrap().to_string()
}

fn multipart(boundary: &str, filename: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

fn upload_request(uri: &str, token: &str, filename: &str, bytes: &[u8]) -> Request<Body> {
    let boundary = "plantcareboundary";
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(multipart(boundary, filename, bytes)))
        .unwrap()
}

#[tokio::test]
async fn catalog_is_public_and_searchable() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/catalog?name=fern", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let (status, body) = send(&app, Method::GET, "/catalog/1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["common_name"], "Boston Fern");

    let (status, body) = send(&app, Method::GET, "/catalog/404", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "PLANTS_CATALOG_NOT_FOUND");
}

#[tokio::test]
async fn collection_requires_a_session() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/plants", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "ACCOUNTS_UNAUTHENTICATED");
}

#[tokio::test]
async fn listing_pages_and_notifications() {
    let app = app().await;
    let token = login_as(&app, "fern").await;

    add(&app, &token, 1, 30).await;
    add(&app, &token, 1, 0).await;
    add(&app, &token, 2, 0).await;

    let (status, body) = send(&app, Method::GET, "/plants", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["per_page"], 2);
    assert_eq!(body["page_count"], 2);
    assert_eq!(body["plants"].as_array().unwrap().len(), 2);
    assert_eq!(body["notification_count"], 1);

    let (_, page2) = send(&app, Method::GET, "/plants?page=2", Some(&token), None).await;
    assert_eq!(page2["page"], 2);
    assert_eq!(page2["plants"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, Method::GET, "/notifications", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["page_count"], 1);
    assert_eq!(body["notifications"][0]["plant_name"], "Boston Fern");
    assert_eq!(body["notifications"][0]["overdue_days"], 23);

    // the zero-water cactus reports a schedule error instead of failing the list
    let mut all = body_plants(&app, &token, 1).await;
    all.extend(body_plants(&app, &token, 2).await);
    let cactus = all.iter().find(|p| p["plant_id"] == 2).unwrap();
    assert!(cactus["schedule"].is_null());
    assert_eq!(cactus["schedule_error"]["code"], "INVALID_SCHEDULE");

    // profile shows the count from plant_care
    let (status, profile) = send(&app, Method::GET, "/users/fern", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["plant_count"], 3);
}

async fn body_plants(app: &TestApp, token: &str, page: usize) -> Vec<Value> {
    let (_, body) = send(
        app,
        Method::GET,
        &format!("/plants?page={page}"),
        Some(token),
        None,
    )
    .await;
    body["plants"].as_array().cloned().unwrap_or_default()
}

#[tokio::test]
async fn listing_is_newest_registration_first() {
    let app = app().await;
    let token = login_as(&app, "fern").await;
    let mut added = Vec::new();
    for plant_id in [3, 1, 2] {
        added.push(add(&app, &token, plant_id, 1).await);
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let mut listed = Vec::new();
    for page in [1, 2] {
        for p in body_plants(&app, &token, page).await {
            listed.push(p["id"].as_str().unwrap().to_string());
        }
    }
    added.reverse();
    assert_eq!(listed, added);
}

#[tokio::test]
async fn ownership_is_enforced() {
    let app = app().await;
    let fern = login_as(&app, "fern").await;
    let moss = login_as(&app, "moss").await;
    let id = add(&app, &fern, 1, 0).await;
    let uri = format!("/plants/{id}");

    let (status, body) = send(&app, Method::GET, &uri, Some(&moss), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "PLANTS_FORBIDDEN");

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&moss), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        Method::GET,
        "/plants/00000000-0000-0000-0000-000000000000",
        Some(&fern),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "PLANTS_NOT_FOUND");

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&fern),
        Some(json!({ "nickname": "Ferdinand" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nickname"], "Ferdinand");
    assert_eq!(body["schedule"]["needs_watering"], false);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&fern), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &uri, Some(&fern), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn validation_errors_are_bad_requests() {
    let app = app().await;
    let token = login_as(&app, "fern").await;

    let mut body = plant_body(1, 0);
    body["sun_exposure"] = json!("blinding");
    let (status, res) = send(&app, Method::POST, "/plants", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(res["code"], "PLANTS_VALIDATION");

    let (status, res) = send(
        &app,
        Method::POST,
        "/plants",
        Some(&token),
        Some(plant_body(77, 0)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(res["code"], "PLANTS_CATALOG_NOT_FOUND");
}

#[tokio::test]
async fn photo_upload_and_download() {
    let app = app().await;
    let token = login_as(&app, "fern").await;
    let id = add(&app, &token, 1, 0).await;
    let uri = format!("/plants/{id}/photo");

    let (status, body) = call(&app, upload_request(&uri, &token, "leaf.txt", b"nope")).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["code"], "PLANTS_UNSUPPORTED_FILE_TYPE");

    let (status, body) = call(&app, upload_request(&uri, &token, "leaf.png", &[7u8; 2048])).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["code"], "PLANTS_PAYLOAD_TOO_LARGE");

    let (status, body) = call(&app, upload_request(&uri, &token, "leaf.png", b"\x89PNG fake")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["has_photo"], true);

    let req = Request::builder()
        .uri(&uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let res = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "image/png");
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"\x89PNG fake");
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = app().await;
    let req = Request::builder()
        .uri("/healthz")
        .body(Body::empty())
        .unwrap();
    let res = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
}
