// src/handlers/payments.rs

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        extract::{optional_json, AppJson, AppQuery},
    },
    config::AppState,
    middleware::i18n::Locale,
    models::payment::{
        ActualMandatoryPayment, ActualPaymentListQuery, CreateMandatoryPaymentPayload, MandatoryPayment,
        MandatoryPaymentListQuery, MandatoryPaymentSummary, MarkPaidPayload, UpdateActualPaymentPayload,
        UpdateMandatoryPaymentPayload, UpsertActualPaymentPayload,
    },
    services::payment_service::Upserted,
};

/// 201 quando o registro foi criado, 200 quando foi atualizado.
pub fn upserted_response<T: Serialize>(upserted: Upserted<T>) -> impl IntoResponse {
    let status = if upserted.created { StatusCode::CREATED } else { StatusCode::OK };
    (status, Json(upserted.record))
}

// =============================================================================
//  PAGAMENTOS OBRIGATÓRIOS (planos)
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/mandatory-payments",
    tag = "Mandatory Payments",
    params(MandatoryPaymentListQuery),
    responses((status = 200, body = Vec<MandatoryPaymentSummary>)),
    security(("api_jwt" = []))
)]
pub async fn list_mandatory_payments(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<MandatoryPaymentListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let plans = app_state
        .payment_service
        .list_plans(&app_state.db_pool, query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(plans))
}

#[utoipa::path(
    get,
    path = "/api/mandatory-payments/{id}",
    tag = "Mandatory Payments",
    params(("id" = i64, Path, description = "ID do plano")),
    responses(
        (status = 200, body = MandatoryPayment),
        (status = 404, description = "Plano não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_mandatory_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let plan = app_state
        .payment_service
        .get_plan(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(plan))
}

#[utoipa::path(
    post,
    path = "/api/mandatory-payments",
    tag = "Mandatory Payments",
    request_body = CreateMandatoryPaymentPayload,
    responses(
        (status = 201, body = MandatoryPayment),
        (status = 400, description = "Campos ausentes ou sem unidade/imóvel")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_mandatory_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<CreateMandatoryPaymentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let plan = app_state
        .payment_service
        .create_plan(&app_state.db_pool, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(plan)))
}

#[utoipa::path(
    put,
    path = "/api/mandatory-payments/{id}",
    tag = "Mandatory Payments",
    params(("id" = i64, Path, description = "ID do plano")),
    request_body = UpdateMandatoryPaymentPayload,
    responses(
        (status = 200, body = MandatoryPayment),
        (status = 404, description = "Plano não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_mandatory_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<UpdateMandatoryPaymentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let plan = app_state
        .payment_service
        .update_plan(&app_state.db_pool, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(plan))
}

#[utoipa::path(
    delete,
    path = "/api/mandatory-payments/{id}",
    tag = "Mandatory Payments",
    params(("id" = i64, Path, description = "ID do plano")),
    responses(
        (status = 204, description = "Plano e instâncias mensais removidos"),
        (status = 404, description = "Plano não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_mandatory_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .payment_service
        .delete_plan(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/mandatory-payments/{id}/actual",
    tag = "Mandatory Payments",
    params(("id" = i64, Path, description = "ID do plano")),
    responses(
        (status = 200, body = Vec<ActualMandatoryPayment>),
        (status = 404, description = "Plano não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_plan_actuals(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let actuals = app_state
        .payment_service
        .list_plan_actuals(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(actuals))
}

// =============================================================================
//  PAGAMENTOS EFETIVOS
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/actual-mandatory-payments",
    tag = "Actual Payments",
    params(ActualPaymentListQuery),
    responses((status = 200, body = Vec<ActualMandatoryPayment>)),
    security(("api_jwt" = []))
)]
pub async fn list_actual_payments(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<ActualPaymentListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let payments = app_state
        .payment_service
        .list_actual(&app_state.db_pool, query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(payments))
}

#[utoipa::path(
    post,
    path = "/api/actual-mandatory-payments",
    tag = "Actual Payments",
    request_body = UpsertActualPaymentPayload,
    responses(
        (status = 201, description = "Instância criada", body = ActualMandatoryPayment),
        (status = 200, description = "Instância existente atualizada", body = ActualMandatoryPayment),
        (status = 404, description = "Plano não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn upsert_actual_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<UpsertActualPaymentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let upserted = app_state
        .payment_service
        .upsert_actual(&app_state.db_pool, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(upserted_response(upserted))
}

#[utoipa::path(
    put,
    path = "/api/actual-mandatory-payments/{id}",
    tag = "Actual Payments",
    params(("id" = i64, Path, description = "ID da instância")),
    request_body = UpdateActualPaymentPayload,
    responses(
        (status = 200, body = ActualMandatoryPayment),
        (status = 404, description = "Instância não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_actual_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<UpdateActualPaymentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let payment = app_state
        .payment_service
        .update_actual(&app_state.db_pool, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(payment))
}

#[utoipa::path(
    post,
    path = "/api/actual-mandatory-payments/{id}/mark-paid",
    tag = "Actual Payments",
    params(("id" = i64, Path, description = "ID da instância")),
    request_body = MarkPaidPayload,
    responses(
        (status = 200, body = ActualMandatoryPayment),
        (status = 404, description = "Instância não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn mark_actual_payment_paid(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let payload = optional_json::<MarkPaidPayload>(&body)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let payment = app_state
        .payment_service
        .mark_actual_paid(&app_state.db_pool, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(payment))
}
