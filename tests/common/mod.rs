#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use fake::{faker::internet::en::SafeEmail, Fake};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use theatre_api::{app, config::Config, AppState};

/// Поднимает приложение поверх базы из DATABASE_URL.
/// Тесты с базой помечены `#[ignore]` и запускаются через `cargo test -- --ignored`.
pub async fn spawn_app() -> Router {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for database tests");

    let config = Config::from_lookup(|name| match name {
        "DATABASE_URL" => Some(url.clone()),
        "JWT_SECRET" => Some("integration-test-secret".to_string()),
        "DB_POOL_SIZE" => Some("5".to_string()),
        _ => None,
    })
    .expect("test config");

    let state = AppState::new(config).await.expect("Failed to create app state");
    app(state)
}

pub fn unique(prefix: &str) -> String {
    format!("{} {}", prefix, uuid::Uuid::new_v4().simple())
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
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
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

pub async fn get(app: &Router, uri: &str, auth: Option<&str>) -> (StatusCode, Value) {
    send(app, Method::GET, uri, auth, None).await
}

pub async fn post(app: &Router, uri: &str, auth: Option<&str>, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, auth, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, auth: Option<&str>, body: Value) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, auth, Some(body)).await
}

pub async fn patch(app: &Router, uri: &str, auth: Option<&str>, body: Value) -> (StatusCode, Value) {
    send(app, Method::PATCH, uri, auth, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, auth: Option<&str>) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, auth, None).await
}

pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub bearer: String,
}

/// Регистрирует нового пользователя и получает для него токен.
pub async fn register_user(app: &Router) -> TestUser {
    let local: String = SafeEmail().fake();
    let email = format!("{}.{}", uuid::Uuid::new_v4().simple(), local).to_lowercase();
    let password = "testpassword".to_string();

    let (status, body) = post(
        app,
        "/users/register/",
        None,
        json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    let id = body["id"].as_i64().unwrap();

    let (status, body) = post(
        app,
        "/users/token/",
        None,
        json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "token failed: {body}");
    let bearer = format!("Bearer {}", body["access"].as_str().unwrap());

    TestUser { id, email, password, bearer }
}

pub async fn create(app: &Router, user: &TestUser, uri: &str, body: Value) -> Value {
    let (status, body) = post(app, uri, Some(&user.bearer), body).await;
    assert_eq!(status, StatusCode::CREATED, "POST {uri} failed: {body}");
    body
}

pub fn id_of(value: &Value) -> i64 {
    value["id"].as_i64().expect("id in response")
}
