// tests/common/mod.rs

#![allow(dead_code)]

use std::str::FromStr;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tower::ServiceExt;

use rent_backend::{
    config::{AppState, Config},
    db::MIGRATOR,
    routes::build_router,
};

/// App completo sobre um SQLite em memória, já migrado.
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub token: String,
}

pub async fn spawn_app() -> TestApp {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("opções do sqlite")
        .foreign_keys(true);

    // Uma única conexão que nunca expira: o banco em memória vive nela
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("pool em memória");
    MIGRATOR.run(&pool).await.expect("migrações");

    let config = Config {
        bcrypt_cost: 4,
        fonts_dir: "./fonts-inexistentes".to_string(),
        ..Default::default()
    };
    let router = build_router(AppState::from_pool(pool.clone(), config));

    let mut app = TestApp { router, pool, token: String::new() };
    let (status, body) = app
        .call(
            Method::POST,
            "/api/auth/register",
            Some(json!({ "email": "owner@example.com", "password": "secret123" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    app.token = body["token"].as_str().expect("token").to_string();
    app
}

impl TestApp {
    /// Requisição sem autenticação.
    pub async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(method, uri, body, None).await
    }

    /// Requisição com o token do usuário registrado.
    pub async fn authed(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(method, uri, body, Some(&self.token)).await
    }

    pub async fn raw(&self, request: Request<Body>) -> axum::response::Response {
        self.router.clone().oneshot(request).await.expect("resposta")
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };

        let response = self.raw(request).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
        };
        (status, value)
    }

    // --- Fixtures ---

    pub async fn create_property(&self, name: &str) -> i64 {
        let (status, body) = self
            .authed(Method::POST, "/api/properties", Some(json!({ "name": name, "address": "Rua A, 1" })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().expect("id")
    }

    pub async fn create_unit(&self, property_id: i64, number: &str, area: f64, price: f64) -> i64 {
        let (status, body) = self
            .authed(
                Method::POST,
                "/api/units",
                Some(json!({
                    "property_id": property_id,
                    "unit_number": number,
                    "area": area,
                    "price_per_sqm": price
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().expect("id")
    }

    pub async fn create_tenant(&self, name: &str) -> i64 {
        let (status, body) = self
            .authed(Method::POST, "/api/tenants", Some(json!({ "name": name, "email": "t@example.com" })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().expect("id")
    }

    pub async fn create_lease(&self, unit_id: i64, tenant_id: i64, rent: f64) -> (StatusCode, Value) {
        self.authed(
            Method::POST,
            "/api/leases",
            Some(json!({
                "unit_id": unit_id,
                "tenant_id": tenant_id,
                "start_date": "2025-01-01",
                "end_date": "2030-12-31",
                "monthly_rent": rent
            })),
        )
        .await
    }
}

/// Compara números JSON vindos de decimais.
pub fn num(value: &Value) -> f64 {
    value.as_f64().unwrap_or_else(|| panic!("não é número: {value}"))
}
