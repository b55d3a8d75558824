#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use cursos_api::auth::jwt::{generate_access_token, JwtConfig};
use cursos_api::config::{PaginationConfig, ServerConfig};
use cursos_api::router::{build_app_router, App};
use cursos_api::state::AppState;
use cursos_core::permissions::Principal;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        pagination: PaginationConfig::default(),
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
            leeway_secs: 60,
        },
    }
}

/// Build the application router with the production middleware stack.
pub fn build_test_app(pool: PgPool) -> App {
    build_app_with_config(pool, test_config())
}

pub fn build_app_with_config(pool: PgPool, config: ServerConfig) -> App {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Principals
// ---------------------------------------------------------------------------

/// Authenticated, no model permissions.
pub fn plain_user() -> Principal {
    Principal {
        user_id: 1,
        username: "aluno".into(),
        is_superuser: false,
        permissions: vec![],
    }
}

/// Holds every `cursos.curso` model permission, including delete.
pub fn editor() -> Principal {
    Principal {
        user_id: 2,
        username: "editor".into(),
        is_superuser: false,
        permissions: vec![
            "cursos.add_curso".into(),
            "cursos.change_curso".into(),
            "cursos.delete_curso".into(),
        ],
    }
}

pub fn superuser() -> Principal {
    Principal {
        user_id: 3,
        username: "admin".into(),
        is_superuser: true,
        permissions: vec![],
    }
}

pub fn token_for(principal: &Principal) -> String {
    generate_access_token(principal, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(
    app: App,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: App, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: App, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: App, uri: &str, token: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json(app: App, uri: &str, token: &str, body: serde_json::Value) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json(app: App, uri: &str, token: &str, body: serde_json::Value) -> Response {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete(app: App, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a course through V1 and return its id.
pub async fn create_curso(pool: &PgPool, titulo: &str) -> i64 {
    let token = token_for(&plain_user());
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/cursos",
        &token,
        serde_json::json!({
            "titulo": titulo,
            "url": format!("https://cursos.example.com/{}", titulo.to_lowercase()),
        }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Create a review under `curso_id` through V1 and return its id.
pub async fn create_avaliacao(pool: &PgPool, curso_id: i64, email: &str, score: i64) -> i64 {
    let token = token_for(&plain_user());
    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/cursos/{curso_id}/avaliacoes"),
        &token,
        serde_json::json!({
            "nome": "Reviewer",
            "email": email,
            "avaliacao": score,
        }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}
