// src/routes.rs

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::AppState,
    docs::ApiDoc,
    handlers,
    middleware::{auth::auth_guard, i18n::Locale},
};

/// Monta o router completo da API.
pub fn build_router(app_state: AppState) -> Router {
    // Define as rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .merge(
            Router::new()
                .route("/me", get(handlers::auth::get_me))
                .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard)),
        );

    let property_routes = Router::new()
        .route(
            "/",
            get(handlers::properties::list_properties).post(handlers::properties::create_property),
        )
        .route(
            "/{id}",
            get(handlers::properties::get_property)
                .put(handlers::properties::update_property)
                .delete(handlers::properties::delete_property),
        )
        .route("/{id}/units", get(handlers::properties::list_property_units))
        .route(
            "/{id}/documents",
            get(handlers::properties::list_documents).post(handlers::properties::upload_document),
        )
        .route(
            "/{id}/documents/{doc_id}",
            get(handlers::properties::get_document).delete(handlers::properties::delete_document),
        );

    let unit_routes = Router::new()
        .route("/", get(handlers::units::list_units).post(handlers::units::create_unit))
        .route(
            "/{id}",
            get(handlers::units::get_unit)
                .put(handlers::units::update_unit)
                .delete(handlers::units::delete_unit),
        )
        .route("/{id}/profitability", get(handlers::units::unit_profitability));

    let tenant_routes = Router::new()
        .route("/", get(handlers::tenants::list_tenants).post(handlers::tenants::create_tenant))
        .route(
            "/{id}",
            get(handlers::tenants::get_tenant)
                .put(handlers::tenants::update_tenant)
                .delete(handlers::tenants::delete_tenant),
        );

    let lease_routes = Router::new()
        .route("/", get(handlers::leases::list_leases).post(handlers::leases::create_lease))
        .route(
            "/{id}",
            get(handlers::leases::get_lease)
                .put(handlers::leases::update_lease)
                .delete(handlers::leases::delete_lease),
        );

    let mandatory_payment_routes = Router::new()
        .route(
            "/",
            get(handlers::payments::list_mandatory_payments).post(handlers::payments::create_mandatory_payment),
        )
        .route(
            "/{id}",
            get(handlers::payments::get_mandatory_payment)
                .put(handlers::payments::update_mandatory_payment)
                .delete(handlers::payments::delete_mandatory_payment),
        )
        .route("/{id}/actual", get(handlers::payments::list_plan_actuals));

    let actual_payment_routes = Router::new()
        .route(
            "/",
            get(handlers::payments::list_actual_payments).post(handlers::payments::upsert_actual_payment),
        )
        .route("/{id}", put(handlers::payments::update_actual_payment))
        .route("/{id}/mark-paid", post(handlers::payments::mark_actual_payment_paid));

    let tenant_payment_routes = Router::new()
        .route(
            "/",
            get(handlers::tenant_payments::list_tenant_payments).post(handlers::tenant_payments::upsert_tenant_payment),
        )
        .route("/generate-monthly", post(handlers::tenant_payments::generate_monthly_payments))
        .route("/{id}", put(handlers::tenant_payments::update_tenant_payment))
        .route("/{id}/mark-paid", post(handlers::tenant_payments::mark_tenant_payment_paid));

    let transaction_routes = Router::new()
        .route(
            "/",
            get(handlers::transactions::list_transactions).post(handlers::transactions::create_transaction),
        )
        .route("/calendar", get(handlers::transactions::payment_calendar))
        .route("/planned", get(handlers::transactions::list_planned_transactions))
        .route("/actual", get(handlers::transactions::list_actual_transactions))
        .route(
            "/{id}",
            get(handlers::transactions::get_transaction)
                .put(handlers::transactions::update_transaction)
                .delete(handlers::transactions::delete_transaction),
        );

    let invoice_routes = Router::new()
        .route("/generate", post(handlers::invoices::generate_invoice))
        .route("/{lease_id}/pdf", get(handlers::invoices::download_invoice_pdf));

    let dashboard_routes = Router::new()
        .route("/summary", get(handlers::dashboard::get_summary))
        .route("/monthly-chart", get(handlers::dashboard::get_monthly_chart))
        .route("/unit-forecasts", get(handlers::dashboard::get_unit_forecasts))
        .route("/debts", get(handlers::dashboard::get_debts));

    // Tudo aqui exige "Authorization: Bearer <token>"
    let protected_routes = Router::new()
        .nest("/properties", property_routes)
        .nest("/units", unit_routes)
        .nest("/tenants", tenant_routes)
        .nest("/leases", lease_routes)
        .nest("/mandatory-payments", mandatory_payment_routes)
        .nest("/actual-mandatory-payments", actual_payment_routes)
        .nest("/tenant-payments", tenant_payment_routes)
        .nest("/transactions", transaction_routes)
        .nest("/invoices", invoice_routes)
        .nest("/dashboard", dashboard_routes)
        .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(handlers::auth::health))
        .nest("/api/auth", auth_routes)
        .nest("/api", protected_routes)
        .fallback(not_found)
        .with_state(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

// Qualquer rota desconhecida vira 404 em JSON
async fn not_found(State(app_state): State<AppState>, locale: Locale, uri: Uri) -> impl IntoResponse {
    let error = app_state.i18n_store.translate(&locale.0, "route_not_found");
    (StatusCode::NOT_FOUND, Json(json!({ "error": error, "path": uri.path() })))
}
