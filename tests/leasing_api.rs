// tests/leasing_api.rs

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{num, spawn_app};

#[tokio::test]
async fn unit_rent_is_area_times_price_and_follows_updates() {
    let app = spawn_app().await;
    let property = app.create_property("Centro Empresarial").await;
    let unit = app.create_unit(property, "101", 50.0, 100.0).await;

    let (status, body) = app.authed(Method::GET, &format!("/api/units/{unit}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(num(&body["monthly_rent"]), 5000.0);
    assert_eq!(body["status"], "vacant");
    assert_eq!(body["property_name"], "Centro Empresarial");

    let (status, body) = app
        .authed(Method::PUT, &format!("/api/units/{unit}"), Some(json!({ "price_per_sqm": 120.5 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(num(&body["monthly_rent"]), 6025.0);

    let (status, _) = app
        .authed(
            Method::POST,
            "/api/units",
            Some(json!({ "property_id": 999, "unit_number": "X", "area": 1, "price_per_sqm": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.authed(Method::POST, "/api/units", Some(json!({ "property_id": property }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["unit_number"].is_array());
}

#[tokio::test]
async fn unit_rent_overflow_is_rejected() {
    let app = spawn_app().await;
    let property = app.create_property("Galpão").await;

    let (status, body) = app
        .authed(
            Method::POST,
            "/api/units",
            Some(json!({ "property_id": property, "unit_number": "G1", "area": 1e20, "price_per_sqm": 1e20 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert!(body["details"]["area"].is_array());

    let unit = app.create_unit(property, "G2", 1e20, 1.0).await;
    let (status, _) = app
        .authed(Method::PUT, &format!("/api/units/{unit}"), Some(json!({ "price_per_sqm": 1e20 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // O registro continua com os valores anteriores
    let (_, body) = app.authed(Method::GET, &format!("/api/units/{unit}"), None).await;
    assert_eq!(num(&body["price_per_sqm"]), 1.0);
}

#[tokio::test]
async fn lease_lifecycle_occupies_and_releases_the_unit() {
    let app = spawn_app().await;
    let property = app.create_property("Torre Norte").await;
    let unit = app.create_unit(property, "201", 40.0, 50.0).await;
    let tenant = app.create_tenant("ACME Ltda").await;
    let other = app.create_tenant("Beta SA").await;

    let (status, lease) = app.create_lease(unit, tenant, 2500.0).await;
    assert_eq!(status, StatusCode::CREATED, "{lease}");
    let lease_id = lease["id"].as_i64().unwrap();
    assert_eq!(lease["status"], "active");

    let (_, body) = app.authed(Method::GET, &format!("/api/units/{unit}"), None).await;
    assert_eq!(body["status"], "rented");
    assert_eq!(body["current_tenant_name"], "ACME Ltda");
    assert_eq!(body["current_lease_id"], lease_id);
    assert_eq!(num(&body["monthly_rent"]), 2500.0);

    // A unidade ocupada não aceita outro contrato
    let (status, _) = app.create_lease(unit, other, 1000.0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, detail) = app.authed(Method::GET, &format!("/api/leases/{lease_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["tenant"]["name"], "ACME Ltda");
    assert_eq!(detail["property"]["name"], "Torre Norte");

    // Renomear o inquilino atualiza a unidade
    let (status, _) = app
        .authed(Method::PUT, &format!("/api/tenants/{tenant}"), Some(json!({ "name": "ACME Holding" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.authed(Method::GET, &format!("/api/units/{unit}"), None).await;
    assert_eq!(body["current_tenant_name"], "ACME Holding");

    let (status, ended) = app
        .authed(Method::PUT, &format!("/api/leases/{lease_id}"), Some(json!({ "status": "completed" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ended["status"], "completed");

    let (_, body) = app.authed(Method::GET, &format!("/api/units/{unit}"), None).await;
    assert_eq!(body["status"], "vacant");
    assert!(body["current_tenant_id"].is_null());

    // Livre de novo: outro inquilino pode alugar
    let (status, second) = app.create_lease(unit, other, 1800.0).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .authed(Method::DELETE, &format!("/api/leases/{}", second["id"].as_i64().unwrap()), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, body) = app.authed(Method::GET, &format!("/api/units/{unit}"), None).await;
    assert_eq!(body["status"], "vacant");
}

#[tokio::test]
async fn lease_creation_validates_references() {
    let app = spawn_app().await;
    let property = app.create_property("P").await;
    let unit = app.create_unit(property, "1", 10.0, 10.0).await;
    let tenant = app.create_tenant("T").await;

    let (status, _) = app.create_lease(999, tenant, 100.0).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.create_lease(unit, 999, 100.0).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.authed(Method::POST, "/api/leases", Some(json!({ "unit_id": unit }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["tenant_id"].is_array());
}

#[tokio::test]
async fn tenant_with_active_lease_cannot_be_deleted() {
    let app = spawn_app().await;
    let property = app.create_property("P").await;
    let unit = app.create_unit(property, "1", 10.0, 10.0).await;
    let tenant = app.create_tenant("Locatário").await;
    let (_, lease) = app.create_lease(unit, tenant, 100.0).await;
    let lease_id = lease["id"].as_i64().unwrap();

    let (status, list) = app.authed(Method::GET, "/api/tenants", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list[0]["active_leases_count"], 1);
    assert_eq!(list[0]["active_units"], json!(["1"]));

    let (status, _) = app.authed(Method::DELETE, &format!("/api/tenants/{tenant}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.authed(Method::PUT, &format!("/api/leases/{lease_id}"), Some(json!({ "status": "terminated" })))
        .await;

    let (status, _) = app.authed(Method::DELETE, &format!("/api/tenants/{tenant}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.authed(Method::DELETE, &format!("/api/tenants/{tenant}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn property_stats_and_documents() {
    let app = spawn_app().await;
    let property = app.create_property("Galeria").await;
    let rented = app.create_unit(property, "A", 10.0, 10.0).await;
    app.create_unit(property, "B", 20.0, 10.0).await;
    let tenant = app.create_tenant("Loja").await;
    app.create_lease(rented, tenant, 300.0).await;

    let (status, body) = app.authed(Method::GET, &format!("/api/properties/{property}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["units_count"], 2);
    assert_eq!(body["occupied_units"], 1);
    assert_eq!(num(&body["monthly_revenue"]), 300.0);

    let (status, units) = app.authed(Method::GET, &format!("/api/properties/{property}/units"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(units.as_array().unwrap().len(), 2);

    let docs = format!("/api/properties/{property}/documents");
    let (status, _) = app
        .authed(
            Method::POST,
            &docs,
            Some(json!({ "name": "Planta", "type": "blueprint", "file_name": "p.pdf", "content": "aGVsbG8=" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, doc) = app
        .authed(
            Method::POST,
            &docs,
            Some(json!({
                "name": "Planta",
                "type": "plan",
                "file_name": "p.txt",
                "mime_type": "text/plain",
                "content": "aGVsbG8="
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{doc}");
    assert_eq!(doc["size"], 5);
    assert_eq!(doc["type"], "plan");
    assert!(doc.get("content").is_none());
    let doc_id = doc["id"].as_i64().unwrap();

    let (status, full) = app.authed(Method::GET, &format!("{docs}/{doc_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(full["content"], "aGVsbG8=");

    let (status, _) = app.authed(Method::DELETE, &format!("/api/properties/{property}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.authed(Method::GET, &docs, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
