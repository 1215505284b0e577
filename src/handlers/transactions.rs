// src/handlers/transactions.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        extract::{AppJson, AppQuery},
    },
    config::AppState,
    middleware::i18n::Locale,
    models::transaction::{
        CalendarQuery, CreateTransactionPayload, PaymentCalendar, Transaction, TransactionListQuery,
        TransactionSummary, UpdateTransactionPayload,
    },
};

#[utoipa::path(
    get,
    path = "/api/transactions",
    tag = "Transactions",
    params(TransactionListQuery),
    responses((status = 200, description = "Mais recentes primeiro", body = Vec<TransactionSummary>)),
    security(("api_jwt" = []))
)]
pub async fn list_transactions(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<TransactionListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let transactions = app_state
        .transaction_service
        .list(&app_state.db_pool, query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(transactions))
}

#[utoipa::path(
    get,
    path = "/api/transactions/calendar",
    tag = "Transactions",
    params(CalendarQuery),
    responses((status = 200, description = "Planejadas e adiadas agrupadas por data", body = PaymentCalendar)),
    security(("api_jwt" = []))
)]
pub async fn payment_calendar(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<CalendarQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let calendar = app_state
        .transaction_service
        .calendar(&app_state.db_pool, query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(calendar))
}

#[utoipa::path(
    get,
    path = "/api/transactions/planned",
    tag = "Transactions",
    responses((status = 200, body = Vec<TransactionSummary>)),
    security(("api_jwt" = []))
)]
pub async fn list_planned_transactions(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let transactions = app_state
        .transaction_service
        .list_planned(&app_state.db_pool, true)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(transactions))
}

#[utoipa::path(
    get,
    path = "/api/transactions/actual",
    tag = "Transactions",
    responses((status = 200, body = Vec<TransactionSummary>)),
    security(("api_jwt" = []))
)]
pub async fn list_actual_transactions(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let transactions = app_state
        .transaction_service
        .list_planned(&app_state.db_pool, false)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(transactions))
}

#[utoipa::path(
    get,
    path = "/api/transactions/{id}",
    tag = "Transactions",
    params(("id" = i64, Path, description = "ID da transação")),
    responses(
        (status = 200, body = Transaction),
        (status = 404, description = "Transação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_transaction(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let transaction = app_state
        .transaction_service
        .get(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(transaction))
}

#[utoipa::path(
    post,
    path = "/api/transactions",
    tag = "Transactions",
    request_body = CreateTransactionPayload,
    responses(
        (status = 201, body = Transaction),
        (status = 400, description = "Campos ausentes ou adiada sem data")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_transaction(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<CreateTransactionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let transaction = app_state
        .transaction_service
        .create(&app_state.db_pool, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

#[utoipa::path(
    put,
    path = "/api/transactions/{id}",
    tag = "Transactions",
    params(("id" = i64, Path, description = "ID da transação")),
    request_body = UpdateTransactionPayload,
    responses(
        (status = 200, body = Transaction),
        (status = 400, description = "Adiada sem data"),
        (status = 404, description = "Transação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_transaction(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<UpdateTransactionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let transaction = app_state
        .transaction_service
        .update(&app_state.db_pool, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(transaction))
}

#[utoipa::path(
    delete,
    path = "/api/transactions/{id}",
    tag = "Transactions",
    params(("id" = i64, Path, description = "ID da transação")),
    responses(
        (status = 204, description = "Transação removida"),
        (status = 404, description = "Transação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_transaction(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .transaction_service
        .delete(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
