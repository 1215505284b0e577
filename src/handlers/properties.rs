// src/handlers/properties.rs

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
    models::{
        property::{
            CreatePropertyPayload, Property, PropertyDocument, PropertyDocumentContent, PropertyWithStats,
            UpdatePropertyPayload, UploadDocumentPayload,
        },
        unit::UnitDetail,
    },
};

// =============================================================================
//  IMÓVEIS
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/properties",
    tag = "Properties",
    responses((status = 200, body = Vec<PropertyWithStats>)),
    security(("api_jwt" = []))
)]
pub async fn list_properties(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let properties = app_state
        .property_service
        .list(&app_state.db_pool)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(properties))
}

#[utoipa::path(
    get,
    path = "/api/properties/{id}",
    tag = "Properties",
    params(("id" = i64, Path, description = "ID do imóvel")),
    responses(
        (status = 200, body = PropertyWithStats),
        (status = 404, description = "Imóvel não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_property(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let property = app_state
        .property_service
        .get(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(property))
}

#[utoipa::path(
    post,
    path = "/api/properties",
    tag = "Properties",
    request_body = CreatePropertyPayload,
    responses(
        (status = 201, body = Property),
        (status = 400, description = "Nome obrigatório")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_property(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<CreatePropertyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let property = app_state
        .property_service
        .create(&app_state.db_pool, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(property)))
}

#[utoipa::path(
    put,
    path = "/api/properties/{id}",
    tag = "Properties",
    params(("id" = i64, Path, description = "ID do imóvel")),
    request_body = UpdatePropertyPayload,
    responses(
        (status = 200, body = Property),
        (status = 404, description = "Imóvel não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_property(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<UpdatePropertyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let property = app_state
        .property_service
        .update(&app_state.db_pool, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(property))
}

#[utoipa::path(
    delete,
    path = "/api/properties/{id}",
    tag = "Properties",
    params(("id" = i64, Path, description = "ID do imóvel")),
    responses(
        (status = 204, description = "Imóvel e documentos removidos"),
        (status = 404, description = "Imóvel não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_property(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .property_service
        .delete(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/properties/{id}/units",
    tag = "Properties",
    params(("id" = i64, Path, description = "ID do imóvel")),
    responses(
        (status = 200, body = Vec<UnitDetail>),
        (status = 404, description = "Imóvel não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_property_units(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let units = app_state
        .property_service
        .list_units(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(units))
}

// =============================================================================
//  DOCUMENTOS
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/properties/{id}/documents",
    tag = "Properties",
    params(("id" = i64, Path, description = "ID do imóvel")),
    responses((status = 200, body = Vec<PropertyDocument>)),
    security(("api_jwt" = []))
)]
pub async fn list_documents(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let documents = app_state
        .property_service
        .list_documents(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(documents))
}

#[utoipa::path(
    get,
    path = "/api/properties/{id}/documents/{doc_id}",
    tag = "Properties",
    params(
        ("id" = i64, Path, description = "ID do imóvel"),
        ("doc_id" = i64, Path, description = "ID do documento")
    ),
    responses(
        (status = 200, description = "Documento com o conteúdo em base64", body = PropertyDocumentContent),
        (status = 404, description = "Imóvel ou documento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_document(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((id, doc_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    let document = app_state
        .property_service
        .get_document(&app_state.db_pool, id, doc_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(document))
}

#[utoipa::path(
    post,
    path = "/api/properties/{id}/documents",
    tag = "Properties",
    params(("id" = i64, Path, description = "ID do imóvel")),
    request_body = UploadDocumentPayload,
    responses(
        (status = 201, body = PropertyDocument),
        (status = 400, description = "Campos ausentes, tipo ou base64 inválido"),
        (status = 404, description = "Imóvel não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_document(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<UploadDocumentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let document = app_state
        .property_service
        .upload_document(&app_state.db_pool, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(document)))
}

#[utoipa::path(
    delete,
    path = "/api/properties/{id}/documents/{doc_id}",
    tag = "Properties",
    params(
        ("id" = i64, Path, description = "ID do imóvel"),
        ("doc_id" = i64, Path, description = "ID do documento")
    ),
    responses(
        (status = 204, description = "Documento removido"),
        (status = 404, description = "Documento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_document(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((id, doc_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .property_service
        .delete_document(&app_state.db_pool, id, doc_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
