// tests/payments_api.rs

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{num, spawn_app, TestApp};

async fn rented_unit(app: &TestApp, rent: f64) -> (i64, i64, i64) {
    let property = app.create_property("Edifício Sul").await;
    let unit = app.create_unit(property, "301", 100.0, 50.0).await;
    let tenant = app.create_tenant("Inquilino").await;
    let (status, lease) = app.create_lease(unit, tenant, rent).await;
    assert_eq!(status, StatusCode::CREATED);
    (unit, tenant, lease["id"].as_i64().unwrap())
}

#[tokio::test]
async fn mandatory_plan_needs_a_target_and_drives_profitability() {
    let app = spawn_app().await;
    let property = app.create_property("P").await;
    let unit = app.create_unit(property, "1", 50.0, 100.0).await;

    let (status, _) = app
        .authed(
            Method::POST,
            "/api/mandatory-payments",
            Some(json!({ "payment_type": "tax", "amount": 100, "start_date": "2025-01-01" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, plan) = app
        .authed(
            Method::POST,
            "/api/mandatory-payments",
            Some(json!({ "unit_id": unit, "payment_type": "utilities", "amount": 500, "start_date": "2025-01-01" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{plan}");
    assert_eq!(plan["frequency"], "monthly");
    assert_eq!(plan["is_cost"], true);

    let (status, body) = app.authed(Method::GET, &format!("/api/units/{unit}/profitability"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(num(&body["planned"]["monthly_rent"]), 5000.0);
    assert_eq!(num(&body["planned"]["mandatory_payments"]), 500.0);
    assert_eq!(num(&body["planned"]["net_profit"]), 4500.0);
    assert_eq!(num(&body["planned"]["profitability"]), 90.0);
    assert!(body["actual"].is_null());

    let (status, list) = app
        .authed(Method::GET, &format!("/api/mandatory-payments?unit_id={unit}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list[0]["unit_number"], "1");
}

#[tokio::test]
async fn actual_mandatory_payment_upsert_returns_201_then_200() {
    let app = spawn_app().await;
    let property = app.create_property("P").await;
    let (_, plan) = app
        .authed(
            Method::POST,
            "/api/mandatory-payments",
            Some(json!({ "property_id": property, "payment_type": "tax", "amount": 250, "start_date": "2025-01-01" })),
        )
        .await;
    let plan_id = plan["id"].as_i64().unwrap();

    let body = json!({ "mandatory_payment_id": plan_id, "month": 3, "year": 2025 });
    let (status, created) = app.authed(Method::POST, "/api/actual-mandatory-payments", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert_eq!(num(&created["planned_amount"]), 250.0);
    assert_eq!(created["status"], "planned");

    let body = json!({ "mandatory_payment_id": plan_id, "month": 3, "year": 2025, "is_paid": true, "actual_amount": 260 });
    let (status, updated) = app.authed(Method::POST, "/api/actual-mandatory-payments", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["status"], "paid");
    assert_eq!(num(&updated["actual_amount"]), 260.0);

    let (_, actuals) = app
        .authed(Method::GET, &format!("/api/mandatory-payments/{plan_id}/actual"), None)
        .await;
    assert_eq!(actuals.as_array().unwrap().len(), 1);

    let (status, _) = app
        .authed(
            Method::POST,
            "/api/actual-mandatory-payments",
            Some(json!({ "mandatory_payment_id": 999, "month": 3, "year": 2025 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .authed(
            Method::POST,
            "/api/actual-mandatory-payments",
            Some(json!({ "mandatory_payment_id": plan_id, "month": 13, "year": 2025 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn mark_paid_accepts_an_empty_body() {
    let app = spawn_app().await;
    let property = app.create_property("P").await;
    let (_, plan) = app
        .authed(
            Method::POST,
            "/api/mandatory-payments",
            Some(json!({ "property_id": property, "payment_type": "tax", "amount": 10, "start_date": "2025-01-01" })),
        )
        .await;
    let (_, actual) = app
        .authed(
            Method::POST,
            "/api/actual-mandatory-payments",
            Some(json!({ "mandatory_payment_id": plan["id"], "month": 1, "year": 2025 })),
        )
        .await;
    let id = actual["id"].as_i64().unwrap();

    let (status, paid) = app
        .authed(Method::POST, &format!("/api/actual-mandatory-payments/{id}/mark-paid"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(paid["is_paid"], true);
    assert_eq!(paid["status"], "paid");
    assert!(paid["payment_date"].is_string());

    let (status, _) = app
        .authed(Method::POST, "/api/actual-mandatory-payments/999/mark-paid", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn generate_monthly_is_idempotent() {
    let app = spawn_app().await;
    let (_, _, lease_id) = rented_unit(&app, 3200.0).await;

    let body = json!({ "month": 10, "year": 2025 });
    let (status, first) = app
        .authed(Method::POST, "/api/tenant-payments/generate-monthly", Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["message"], "Generated 1 planned payments for 10/2025");
    assert_eq!(first["generated"][0]["lease_id"], lease_id);
    assert_eq!(num(&first["generated"][0]["planned_amount"]), 3200.0);
    assert_eq!(first["generated"][0]["status"], "expected");

    let (_, second) = app
        .authed(Method::POST, "/api/tenant-payments/generate-monthly", Some(body))
        .await;
    assert_eq!(second["generated"].as_array().unwrap().len(), 0);

    let (status, _) = app
        .authed(Method::POST, "/api/tenant-payments/generate-monthly", Some(json!({ "month": 10 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn tenant_payment_upsert_mark_paid_and_actual_profitability() {
    let app = spawn_app().await;
    let (unit, tenant, lease_id) = rented_unit(&app, 2000.0).await;

    let body = json!({ "lease_id": lease_id, "unit_id": unit, "tenant_id": tenant, "month": 5, "year": 2025 });
    let (status, created) = app.authed(Method::POST, "/api/tenant-payments", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert_eq!(num(&created["planned_amount"]), 2000.0);

    let (status, again) = app.authed(Method::POST, "/api/tenant-payments", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["id"], created["id"]);

    let id = created["id"].as_i64().unwrap();
    let (status, paid) = app
        .authed(
            Method::POST,
            &format!("/api/tenant-payments/{id}/mark-paid"),
            Some(json!({ "actual_amount": 1900, "payment_date": "2025-05-10", "payment_method": "pix" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(paid["status"], "received");
    assert_eq!(paid["payment_date"], "2025-05-10");
    assert_eq!(paid["payment_method"], "pix");

    let (_, profit) = app
        .authed(Method::GET, &format!("/api/units/{unit}/profitability?month=5&year=2025"), None)
        .await;
    assert_eq!(num(&profit["actual"]["monthly_rent"]), 1900.0);
    assert_eq!(num(&profit["actual"]["net_profit"]), 1900.0);

    let (_, listed) = app
        .authed(Method::GET, &format!("/api/tenant-payments?month=5&year=2025&tenant_id={tenant}"), None)
        .await;
    assert_eq!(listed[0]["tenant_name"], "Inquilino");
    assert_eq!(listed[0]["unit_number"], "301");

    let (status, _) = app
        .authed(
            Method::POST,
            "/api/tenant-payments",
            Some(json!({ "lease_id": 999, "unit_id": unit, "tenant_id": tenant, "month": 6, "year": 2025 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unpaid_rent_shows_up_in_debts() {
    let app = spawn_app().await;
    let (unit, tenant, lease_id) = rented_unit(&app, 1000.0).await;

    for month in [1, 2] {
        let body = json!({ "lease_id": lease_id, "unit_id": unit, "tenant_id": tenant, "month": month, "year": 2025 });
        app.authed(Method::POST, "/api/tenant-payments", Some(body)).await;
    }

    let (status, report) = app.authed(Method::GET, "/api/dashboard/debts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(num(&report["total_debt"]), 2000.0);
    let debt = &report["debts"][0];
    assert_eq!(debt["tenant_name"], "Inquilino");
    assert_eq!(debt["payment_count"], 2);
    assert_eq!(debt["oldest_debt_date"], "2025-01-01");
    assert!(debt["overdue_months"].as_i64().unwrap() >= 12);

    let (_, filtered) = app.authed(Method::GET, "/api/dashboard/debts?property_id=999", None).await;
    assert_eq!(filtered["debts"].as_array().unwrap().len(), 0);
}
