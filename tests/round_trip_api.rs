// tests/round_trip_api.rs

mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::{spawn_app, TestApp};

/// Cada campo enviado volta igual no GET (números comparados como f64).
fn assert_same_fields(sent: &Value, fetched: &Value) {
    for (field, expected) in sent.as_object().expect("payload é objeto") {
        let actual = &fetched[field];
        match (expected.as_f64(), actual.as_f64()) {
            (Some(e), Some(a)) => assert_eq!(e, a, "campo {field}"),
            _ => assert_eq!(expected, actual, "campo {field}"),
        }
    }
    assert!(fetched["id"].as_i64().is_some(), "sem id: {fetched}");
    assert!(fetched["created_at"].is_string(), "sem created_at: {fetched}");
    assert!(fetched["updated_at"].is_string(), "sem updated_at: {fetched}");
}

/// POST no recurso e GET em `{base}/{id}`; devolve o id criado.
async fn post_then_get(app: &TestApp, base: &str, payload: Value) -> i64 {
    let (status, created) = app.authed(Method::POST, base, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    let id = created["id"].as_i64().expect("id");

    let (status, fetched) = app.authed(Method::GET, &format!("{base}/{id}"), None).await;
    assert_eq!(status, StatusCode::OK, "{fetched}");
    assert_eq!(fetched["id"], created["id"]);
    assert_eq!(fetched["created_at"], created["created_at"]);
    assert_same_fields(&payload, &fetched);
    id
}

#[tokio::test]
async fn created_records_read_back_unchanged() {
    let app = spawn_app().await;

    let property = post_then_get(
        &app,
        "/api/properties",
        json!({ "name": "Edifício Aurora", "address": "Av. Paulista, 1000", "total_area": 1250.75 }),
    )
    .await;

    let unit = post_then_get(
        &app,
        "/api/units",
        json!({
            "property_id": property,
            "unit_number": "305",
            "area": 45.5,
            "price_per_sqm": 80,
            "status": "vacant",
            "category": "office"
        }),
    )
    .await;

    let tenant = post_then_get(
        &app,
        "/api/tenants",
        json!({
            "name": "Café Central Ltda",
            "contact_person": "Marina Souza",
            "phone": "+55 11 99999-0000",
            "email": "contato@cafecentral.com",
            "tax_id": "12.345.678/0001-90"
        }),
    )
    .await;

    post_then_get(
        &app,
        "/api/leases",
        json!({
            "unit_id": unit,
            "tenant_id": tenant,
            "start_date": "2025-02-01",
            "end_date": "2027-01-31",
            "monthly_rent": 3640,
            "deposit": 7280
        }),
    )
    .await;

    post_then_get(
        &app,
        "/api/mandatory-payments",
        json!({
            "unit_id": unit,
            "payment_type": "condominium",
            "amount": 420.3,
            "frequency": "quarterly",
            "start_date": "2025-01-01",
            "end_date": "2025-12-31",
            "is_cost": false
        }),
    )
    .await;

    post_then_get(
        &app,
        "/api/transactions",
        json!({
            "unit_id": unit,
            "property_id": property,
            "type": "income",
            "category": "rent",
            "amount": 3640,
            "date": "2025-03-05",
            "description": "Aluguel de março",
            "is_planned": true,
            "payer": "Café Central Ltda",
            "status": "invoiced"
        }),
    )
    .await;
}
