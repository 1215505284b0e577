// src/handlers/tenant_payments.rs

use axum::{
    body::Bytes,
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        extract::{optional_json, AppJson, AppQuery},
    },
    config::AppState,
    handlers::payments::upserted_response,
    middleware::i18n::Locale,
    models::{
        payment::MarkPaidPayload,
        tenant_payment::{
            GenerateMonthlyPayload, GenerateMonthlyResponse, TenantPayment, TenantPaymentListQuery,
            TenantPaymentSummary, UpdateTenantPaymentPayload, UpsertTenantPaymentPayload,
        },
    },
};

#[utoipa::path(
    get,
    path = "/api/tenant-payments",
    tag = "Tenant Payments",
    params(TenantPaymentListQuery),
    responses((status = 200, body = Vec<TenantPaymentSummary>)),
    security(("api_jwt" = []))
)]
pub async fn list_tenant_payments(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<TenantPaymentListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let payments = app_state
        .tenant_payment_service
        .list(&app_state.db_pool, query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(payments))
}

#[utoipa::path(
    post,
    path = "/api/tenant-payments",
    tag = "Tenant Payments",
    request_body = UpsertTenantPaymentPayload,
    responses(
        (status = 201, description = "Pagamento do mês criado", body = TenantPayment),
        (status = 200, description = "Pagamento existente atualizado", body = TenantPayment),
        (status = 404, description = "Contrato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn upsert_tenant_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<UpsertTenantPaymentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let upserted = app_state
        .tenant_payment_service
        .upsert(&app_state.db_pool, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(upserted_response(upserted))
}

#[utoipa::path(
    put,
    path = "/api/tenant-payments/{id}",
    tag = "Tenant Payments",
    params(("id" = i64, Path, description = "ID do pagamento")),
    request_body = UpdateTenantPaymentPayload,
    responses(
        (status = 200, body = TenantPayment),
        (status = 404, description = "Pagamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_tenant_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<UpdateTenantPaymentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let payment = app_state
        .tenant_payment_service
        .update(&app_state.db_pool, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(payment))
}

#[utoipa::path(
    post,
    path = "/api/tenant-payments/{id}/mark-paid",
    tag = "Tenant Payments",
    params(("id" = i64, Path, description = "ID do pagamento")),
    request_body = MarkPaidPayload,
    responses(
        (status = 200, description = "Pagamento recebido", body = TenantPayment),
        (status = 404, description = "Pagamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn mark_tenant_payment_paid(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let payload = optional_json::<MarkPaidPayload>(&body)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let payment = app_state
        .tenant_payment_service
        .mark_paid(&app_state.db_pool, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(payment))
}

#[utoipa::path(
    post,
    path = "/api/tenant-payments/generate-monthly",
    tag = "Tenant Payments",
    request_body = GenerateMonthlyPayload,
    responses(
        (status = 200, description = "Pagamentos esperados gerados para os contratos ativos", body = GenerateMonthlyResponse),
        (status = 400, description = "Mês ou ano ausente")
    ),
    security(("api_jwt" = []))
)]
pub async fn generate_monthly_payments(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<GenerateMonthlyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let month = payload.month.unwrap_or_default();
    let year = payload.year.unwrap_or_default();

    let response = app_state
        .tenant_payment_service
        .generate_monthly(&app_state.db_pool, month, year)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(response))
}
