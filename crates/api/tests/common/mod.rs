//! Shared helpers for HTTP-level integration tests.
//!
//! Uses Axum's `tower::ServiceExt` to send requests directly to the router
//! without an actual TCP listener. The router is built by the same
//! [`build_app_router`] the production binary uses, so tests exercise the
//! full middleware stack.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use stockpile_api::auth::{ROLE_HEADER, ROLE_MANAGER};
use stockpile_api::config::ServerConfig;
use stockpile_api::router::build_app_router;
use stockpile_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request"),
    )
    .await
    .expect("response")
}

/// Send a JSON request with the manager role header (authorized mutation).
pub async fn send_json(app: Router, method: &str, uri: &str, body: serde_json::Value) -> Response {
    send_json_as(app, method, uri, body, Some(ROLE_MANAGER)).await
}

/// Send a JSON request with an explicit (or absent) role header.
pub async fn send_json_as(
    app: Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
    role: Option<&str>,
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(role) = role {
        builder = builder.header(ROLE_HEADER, role);
    }
    app.oneshot(
        builder
            .body(Body::from(body.to_string()))
            .expect("request"),
    )
    .await
    .expect("response")
}

/// Send a POST with a JSON body as the manager role.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, "POST", uri, body).await
}

/// Send a PUT with a JSON body as the manager role.
pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, "PUT", uri, body).await
}

/// Send a DELETE as the manager role.
pub async fn delete(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .header(ROLE_HEADER, ROLE_MANAGER)
            .body(Body::empty())
            .expect("request"),
    )
    .await
    .expect("response")
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("valid JSON body")
}

/// Create a category through the API and return its id.
pub async fn seed_category(pool: &PgPool, name: &str) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/categories",
        serde_json::json!({ "name": name }),
    )
    .await;
    let json = body_json(response).await;
    json["data"]["id"].as_i64().expect("category id")
}

/// Create a product through the API and return its id.
pub async fn seed_product(
    pool: &PgPool,
    category_id: Option<i64>,
    name: &str,
    quantity: i64,
    price: &str,
) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/products",
        serde_json::json!({
            "name": name,
            "category_id": category_id,
            "quantity": quantity,
            "price": price,
        }),
    )
    .await;
    let json = body_json(response).await;
    json["data"]["id"].as_i64().expect("product id")
}
