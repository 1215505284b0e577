// tests/auth_api.rs

mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::json;

use rent_backend::{common::error::AppError, db::UserRepository, services::AuthService};

use common::spawn_app;

#[tokio::test]
async fn first_registered_user_is_flagged_and_can_log_in() {
    let app = spawn_app().await;

    let (status, me) = app.authed(Method::GET, "/api/auth/me", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "owner@example.com");
    assert_eq!(me["is_first"], true);
    assert!(me.get("password_hash").is_none());

    let (status, second) = app
        .call(
            Method::POST,
            "/api/auth/register",
            Some(json!({ "email": "  Second@Example.com ", "password": "another1", "name": "Ana" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second["user"]["email"], "second@example.com");
    assert_eq!(second["user"]["is_first"], false);

    let (status, login) = app
        .call(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": "SECOND@example.com", "password": "another1" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(login["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn register_rejects_duplicates_and_short_passwords() {
    let app = spawn_app().await;

    let (status, _) = app
        .call(
            Method::POST,
            "/api/auth/register",
            Some(json!({ "email": "owner@example.com", "password": "secret123" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .call(Method::POST, "/api/auth/register", Some(json!({ "email": "x@example.com", "password": "123" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["password"].is_array());

    let (status, _) = app.call(Method::POST, "/api/auth/register", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = spawn_app().await;

    let (status, _) = app
        .call(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": "owner@example.com", "password": "wrong-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .call(Method::POST, "/api/auth/login", Some(json!({ "email": "nobody@example.com", "password": "whatever" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_require_a_valid_bearer_token() {
    let app = spawn_app().await;

    let (status, body) = app.call(Method::GET, "/api/properties", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let request = Request::builder()
        .uri("/api/units")
        .header("authorization", "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.raw(request).await.status(), StatusCode::UNAUTHORIZED);

    let (status, _) = app.call(Method::GET, "/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_is_public_and_unknown_api_paths_are_json_404() {
    let app = spawn_app().await;

    let (status, body) = app.call(Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = app.call(Method::GET, "/api/nothing-here", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["path"], "/api/nothing-here");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn errors_follow_accept_language() {
    let app = spawn_app().await;

    let request = Request::builder()
        .uri("/api/does-not-exist")
        .header("accept-language", "pt-BR,pt;q=0.9")
        .body(Body::empty())
        .unwrap();
    let response = app.raw(request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Rota não encontrada");
}

#[tokio::test]
async fn reset_password_replaces_the_hash() {
    let app = spawn_app().await;
    let auth = AuthService::new(UserRepository::new(), "reset-secret".to_string(), 30, 4);

    let short = auth.reset_password(&app.pool, "owner@example.com", "12345").await;
    assert!(matches!(short, Err(AppError::ValidationError(_))));

    let missing = auth.reset_password(&app.pool, "ghost@example.com", "newpass1").await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    let user = auth
        .reset_password(&app.pool, "  OWNER@example.com ", "newpass1")
        .await
        .expect("senha redefinida");
    assert_eq!(user.email, "owner@example.com");

    let (status, _) = app
        .call(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": "owner@example.com", "password": "secret123" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .call(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": "owner@example.com", "password": "newpass1" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}
