// src/handlers/units.rs

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
    models::unit::{
        CreateUnitPayload, ProfitabilityQuery, Unit, UnitDetail, UnitListQuery, UnitProfitability, UpdateUnitPayload,
    },
};

#[utoipa::path(
    get,
    path = "/api/units",
    tag = "Units",
    params(UnitListQuery),
    responses((status = 200, body = Vec<UnitDetail>)),
    security(("api_jwt" = []))
)]
pub async fn list_units(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<UnitListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let units = app_state
        .unit_service
        .list(&app_state.db_pool, query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(units))
}

#[utoipa::path(
    get,
    path = "/api/units/{id}",
    tag = "Units",
    params(("id" = i64, Path, description = "ID da unidade")),
    responses(
        (status = 200, body = UnitDetail),
        (status = 404, description = "Unidade não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_unit(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let unit = app_state
        .unit_service
        .get(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(unit))
}

#[utoipa::path(
    post,
    path = "/api/units",
    tag = "Units",
    request_body = CreateUnitPayload,
    responses(
        (status = 201, description = "Aluguel calculado como área × preço do m²", body = Unit),
        (status = 400, description = "Campos obrigatórios ausentes ou negativos"),
        (status = 404, description = "Imóvel não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_unit(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<CreateUnitPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let unit = app_state
        .unit_service
        .create(&app_state.db_pool, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(unit)))
}

#[utoipa::path(
    put,
    path = "/api/units/{id}",
    tag = "Units",
    params(("id" = i64, Path, description = "ID da unidade")),
    request_body = UpdateUnitPayload,
    responses(
        (status = 200, body = Unit),
        (status = 404, description = "Unidade não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_unit(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<UpdateUnitPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let unit = app_state
        .unit_service
        .update(&app_state.db_pool, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(unit))
}

#[utoipa::path(
    delete,
    path = "/api/units/{id}",
    tag = "Units",
    params(("id" = i64, Path, description = "ID da unidade")),
    responses(
        (status = 204, description = "Unidade removida"),
        (status = 404, description = "Unidade não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_unit(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .unit_service
        .delete(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/units/{id}/profitability",
    tag = "Units",
    params(("id" = i64, Path, description = "ID da unidade"), ProfitabilityQuery),
    responses(
        (status = 200, body = UnitProfitability),
        (status = 404, description = "Unidade não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn unit_profitability(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
    AppQuery(query): AppQuery<ProfitabilityQuery>,
) -> Result<impl IntoResponse, ApiError> {
    // O realizado só é calculado com mês e ano juntos
    let period = match (query.month, query.year) {
        (Some(month), Some(year)) => Some((month as i32, year)),
        _ => None,
    };

    let profitability = app_state
        .unit_service
        .profitability(&app_state.db_pool, id, period)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(profitability))
}
