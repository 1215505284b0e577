// tests/finance_api.rs

mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use chrono::Utc;
use serde_json::json;

use common::{num, spawn_app};

#[tokio::test]
async fn deferred_transactions_need_a_scheduled_date() {
    let app = spawn_app().await;

    let (status, _) = app
        .authed(
            Method::POST,
            "/api/transactions",
            Some(json!({ "type": "expense", "amount": 100, "date": "2025-06-01", "status": "deferred" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, tr) = app
        .authed(
            Method::POST,
            "/api/transactions",
            Some(json!({
                "type": "expense",
                "amount": 100,
                "date": "2025-06-01",
                "status": "deferred",
                "scheduled_pay_date": "2025-06-20"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{tr}");
    assert_eq!(tr["status"], "deferred");
    assert_eq!(tr["scheduled_pay_date"], "2025-06-20");
    let id = tr["id"].as_i64().unwrap();

    // Sair de "deferred" limpa a data agendada
    let (status, tr) = app
        .authed(Method::PUT, &format!("/api/transactions/{id}"), Some(json!({ "status": "whatever" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tr["status"], "paid");
    assert!(tr["scheduled_pay_date"].is_null());

    // Data agendada sem status adiado é descartada
    let (status, tr) = app
        .authed(
            Method::POST,
            "/api/transactions",
            Some(json!({
                "type": "income",
                "amount": 5,
                "date": "2025-06-02",
                "status": "invoiced",
                "scheduled_pay_date": "2025-07-01"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tr["status"], "invoiced");
    assert!(tr["scheduled_pay_date"].is_null());

    let (status, _) = app.authed(Method::DELETE, &format!("/api/transactions/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.authed(Method::GET, &format!("/api/transactions/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn calendar_groups_planned_and_deferred_by_display_date() {
    let app = spawn_app().await;

    let transactions = [
        json!({ "type": "income", "amount": 1000, "date": "2025-06-10", "is_planned": true }),
        json!({ "type": "expense", "amount": 200, "date": "2025-06-01", "status": "deferred", "scheduled_pay_date": "2025-06-20" }),
        json!({ "type": "expense", "amount": 50, "date": "2025-06-15" }),
        json!({ "type": "expense", "amount": 70, "date": "2025-08-01", "is_planned": true }),
    ];
    for body in transactions {
        let (status, _) = app.authed(Method::POST, "/api/transactions", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, calendar) = app
        .authed(Method::GET, "/api/transactions/calendar?start_date=2025-06-01&end_date=2025-06-30", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(calendar["dates"], json!(["2025-06-10", "2025-06-20"]));
    assert_eq!(calendar["by_date"]["2025-06-10"][0]["calendar_type"], "planned_income");
    assert_eq!(calendar["by_date"]["2025-06-20"][0]["calendar_type"], "deferred");
    assert_eq!(calendar["by_date"]["2025-06-20"][0]["display_date"], "2025-06-20");

    let (_, planned) = app.authed(Method::GET, "/api/transactions/planned", None).await;
    assert_eq!(planned.as_array().unwrap().len(), 2);
    let (_, actual) = app.authed(Method::GET, "/api/transactions/actual", None).await;
    assert_eq!(actual.as_array().unwrap().len(), 2);

    let (_, filtered) = app
        .authed(Method::GET, "/api/transactions?type=expense&is_planned=false", None)
        .await;
    assert_eq!(filtered.as_array().unwrap().len(), 2);
    // Mais recentes primeiro
    assert_eq!(filtered[0]["date"], "2025-06-15");
}

#[tokio::test]
async fn dashboard_summary_and_monthly_chart() {
    let app = spawn_app().await;
    let property = app.create_property("Centro").await;
    let rented = app.create_unit(property, "1", 10.0, 100.0).await;
    app.create_unit(property, "2", 10.0, 200.0).await;
    let tenant = app.create_tenant("T").await;
    app.create_lease(rented, tenant, 900.0).await;

    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    for body in [
        json!({ "type": "income", "amount": 900, "date": today }),
        json!({ "type": "expense", "amount": 300, "date": today, "unit_id": rented }),
        json!({ "type": "expense", "amount": 40, "date": today, "is_planned": true }),
    ] {
        app.authed(Method::POST, "/api/transactions", Some(body)).await;
    }

    let (status, summary) = app.authed(Method::GET, "/api/dashboard/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_units"], 2);
    assert_eq!(summary["occupied_units"], 1);
    assert_eq!(summary["occupancy_rate"], 50);
    assert_eq!(num(&summary["planned_revenue"]), 900.0);
    assert_eq!(num(&summary["average_price_per_sqm"]), 150.0);
    assert_eq!(summary["planned_payments_count"], 1);
    assert_eq!(num(&summary["planned_payments_total"]), 40.0);

    let (status, chart) = app.authed(Method::GET, "/api/dashboard/monthly-chart?months=3", None).await;
    assert_eq!(status, StatusCode::OK);
    let chart = chart.as_array().unwrap();
    assert_eq!(chart.len(), 3);
    let current = &chart[2];
    assert_eq!(current["month"], Utc::now().date_naive().format("%Y-%m").to_string());
    assert_eq!(num(&current["income"]), 900.0);
    assert_eq!(num(&current["expense"]), 340.0);
    assert_eq!(num(&current["profit"]), 560.0);

    let (_, capped) = app.authed(Method::GET, "/api/dashboard/monthly-chart?months=100", None).await;
    assert_eq!(capped.as_array().unwrap().len(), 24);

    let (status, forecasts) = app.authed(Method::GET, "/api/dashboard/unit-forecasts?months=1", None).await;
    assert_eq!(status, StatusCode::OK);
    let unit = forecasts
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["unit_id"] == rented)
        .cloned()
        .unwrap();
    assert_eq!(num(&unit["average_expense"]), 300.0);
    assert_eq!(num(&unit["forecast_profit"]), 600.0);
}

#[tokio::test]
async fn invoices_require_an_active_lease() {
    let app = spawn_app().await;

    let (status, _) = app.authed(Method::POST, "/api/invoices/generate", Some(json!({ "leaseId": 999 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.authed(Method::POST, "/api/invoices/generate", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let property = app.create_property("P").await;
    let unit = app.create_unit(property, "9", 10.0, 10.0).await;
    let tenant = app.create_tenant("T").await;
    let (_, lease) = app.create_lease(unit, tenant, 100.0).await;
    let lease_id = lease["id"].as_i64().unwrap();
    app.authed(Method::PUT, &format!("/api/leases/{lease_id}"), Some(json!({ "status": "terminated" })))
        .await;

    let (status, _) = app
        .authed(Method::POST, "/api/invoices/generate", Some(json!({ "lease_id": lease_id })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .uri("/api/invoices/999/pdf")
        .header("authorization", format!("Bearer {}", app.token))
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.raw(request).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = spawn_app().await;

    let (status, doc) = app.call(Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/leases"].is_object());
    assert!(doc["components"]["securitySchemes"]["api_jwt"].is_object());
}
