// src/handlers/leases.rs

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
    models::lease::{CreateLeasePayload, Lease, LeaseDetail, LeaseListQuery, LeaseSummary, UpdateLeasePayload},
};

#[utoipa::path(
    get,
    path = "/api/leases",
    tag = "Leases",
    params(LeaseListQuery),
    responses((status = 200, body = Vec<LeaseSummary>)),
    security(("api_jwt" = []))
)]
pub async fn list_leases(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<LeaseListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let leases = app_state
        .lease_service
        .list(&app_state.db_pool, query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(leases))
}

#[utoipa::path(
    get,
    path = "/api/leases/{id}",
    tag = "Leases",
    params(("id" = i64, Path, description = "ID do contrato")),
    responses(
        (status = 200, body = LeaseDetail),
        (status = 404, description = "Contrato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_lease(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let lease = app_state
        .lease_service
        .get(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(lease))
}

#[utoipa::path(
    post,
    path = "/api/leases",
    tag = "Leases",
    request_body = CreateLeasePayload,
    responses(
        (status = 201, description = "Contrato criado e unidade ocupada", body = Lease),
        (status = 400, description = "Campos ausentes ou unidade não está livre"),
        (status = 404, description = "Unidade ou inquilino não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_lease(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<CreateLeasePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let lease = app_state
        .lease_service
        .create(&app_state.db_pool, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(lease)))
}

#[utoipa::path(
    put,
    path = "/api/leases/{id}",
    tag = "Leases",
    params(("id" = i64, Path, description = "ID do contrato")),
    request_body = UpdateLeasePayload,
    responses(
        (status = 200, body = Lease),
        (status = 400, description = "Reativação com unidade ocupada"),
        (status = 404, description = "Contrato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_lease(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<UpdateLeasePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let lease = app_state
        .lease_service
        .update(&app_state.db_pool, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(lease))
}

#[utoipa::path(
    delete,
    path = "/api/leases/{id}",
    tag = "Leases",
    params(("id" = i64, Path, description = "ID do contrato")),
    responses(
        (status = 204, description = "Contrato removido e unidade liberada"),
        (status = 404, description = "Contrato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_lease(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .lease_service
        .delete(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
