// src/handlers/invoices.rs

use axum::{
    extract::{Path, State},
    http::header,
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
    models::invoice::{GenerateInvoicePayload, GenerateInvoiceResponse, InvoicePdfQuery},
};

#[utoipa::path(
    post,
    path = "/api/invoices/generate",
    tag = "Invoices",
    request_body = GenerateInvoicePayload,
    responses(
        (status = 200, description = "Fatura em HTML e PDF (base64)", body = GenerateInvoiceResponse),
        (status = 400, description = "Contrato não está ativo"),
        (status = 404, description = "Contrato, inquilino, unidade ou imóvel não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn generate_invoice(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<GenerateInvoicePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let lease_id = payload.lease_id.unwrap_or_default();

    let response = app_state
        .invoice_service
        .generate(&app_state.db_pool, lease_id, payload.period, &app_state.i18n_store, &locale.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/invoices/{lease_id}/pdf",
    tag = "Invoices",
    params(("lease_id" = i64, Path, description = "ID do contrato"), InvoicePdfQuery),
    responses(
        (status = 200, description = "Arquivo PDF", content_type = "application/pdf", body = Vec<u8>),
        (status = 400, description = "Contrato não está ativo"),
        (status = 404, description = "Contrato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn download_invoice_pdf(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(lease_id): Path<i64>,
    AppQuery(query): AppQuery<InvoicePdfQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let service = &app_state.invoice_service;

    let data = service
        .prepare(&app_state.db_pool, lease_id, query.period, &app_state.i18n_store, &locale.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let pdf = service
        .render_pdf(&data, &app_state.i18n_store, &locale.0)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let disposition = format!("attachment; filename=\"{}.pdf\"", data.number);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    ))
}
