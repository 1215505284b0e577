// src/handlers/tenants.rs

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
        extract::AppJson,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::tenant::{CreateTenantPayload, Tenant, TenantDetail, TenantSummary, UpdateTenantPayload},
};

#[utoipa::path(
    get,
    path = "/api/tenants",
    tag = "Tenants",
    responses((status = 200, body = Vec<TenantSummary>)),
    security(("api_jwt" = []))
)]
pub async fn list_tenants(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let tenants = app_state
        .tenant_service
        .list(&app_state.db_pool)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(tenants))
}

#[utoipa::path(
    get,
    path = "/api/tenants/{id}",
    tag = "Tenants",
    params(("id" = i64, Path, description = "ID do inquilino")),
    responses(
        (status = 200, description = "Inquilino com histórico de contratos", body = TenantDetail),
        (status = 404, description = "Inquilino não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_tenant(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let tenant = app_state
        .tenant_service
        .get(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(tenant))
}

#[utoipa::path(
    post,
    path = "/api/tenants",
    tag = "Tenants",
    request_body = CreateTenantPayload,
    responses(
        (status = 201, body = Tenant),
        (status = 400, description = "Nome obrigatório")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_tenant(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<CreateTenantPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let tenant = app_state
        .tenant_service
        .create(&app_state.db_pool, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(tenant)))
}

#[utoipa::path(
    put,
    path = "/api/tenants/{id}",
    tag = "Tenants",
    params(("id" = i64, Path, description = "ID do inquilino")),
    request_body = UpdateTenantPayload,
    responses(
        (status = 200, body = Tenant),
        (status = 404, description = "Inquilino não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_tenant(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<UpdateTenantPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let tenant = app_state
        .tenant_service
        .update(&app_state.db_pool, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(tenant))
}

#[utoipa::path(
    delete,
    path = "/api/tenants/{id}",
    tag = "Tenants",
    params(("id" = i64, Path, description = "ID do inquilino")),
    responses(
        (status = 204, description = "Inquilino removido"),
        (status = 400, description = "Inquilino com contratos ativos"),
        (status = 404, description = "Inquilino não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_tenant(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .tenant_service
        .delete(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
