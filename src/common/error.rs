// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

/// Recursos que podem aparecer num 404.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    User,
    Property,
    Unit,
    Tenant,
    Lease,
    MandatoryPayment,
    ActualMandatoryPayment,
    TenantPayment,
    Transaction,
    Document,
}

impl Resource {
    fn key(self) -> &'static str {
        match self {
            Resource::User => "resource.user",
            Resource::Property => "resource.property",
            Resource::Unit => "resource.unit",
            Resource::Tenant => "resource.tenant",
            Resource::Lease => "resource.lease",
            Resource::MandatoryPayment => "resource.mandatory_payment",
            Resource::ActualMandatoryPayment => "resource.actual_mandatory_payment",
            Resource::TenantPayment => "resource.tenant_payment",
            Resource::Transaction => "resource.transaction",
            Resource::Document => "resource.document",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Corpo da requisição inválido: {0}")]
    InvalidBody(String),

    // Carrega a chave da mensagem no catálogo de i18n
    #[error("Requisição inválida: {0}")]
    BadRequest(&'static str),

    #[error("{0:?} não encontrado")]
    NotFound(Resource),

    #[error("Unidade não está livre")]
    UnitNotVacant,

    #[error("Inquilino possui contratos ativos")]
    TenantHasActiveLeases,

    #[error("Contrato não está ativo")]
    LeaseNotActive,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro ao gerar PDF: {0}")]
    PdfError(#[from] genpdf::error::Error),
}

/// Erro já traduzido, pronto para virar resposta HTTP.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self { status, error: error.into(), details: None }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidBody(_)
            | AppError::BadRequest(_)
            | AppError::UnitNotVacant
            | AppError::TenantHasActiveLeases
            | AppError::LeaseNotActive
            | AppError::EmailAlreadyExists => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();
        let status = self.status();

        let error = match self {
            AppError::ValidationError(errors) => {
                // Detalhes por campo, com as mensagens traduzidas
                let mut details: BTreeMap<String, Vec<String>> = BTreeMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages = field_errors
                        .iter()
                        .map(|e| {
                            let key = e.message.as_deref().unwrap_or(&*e.code);
                            store.translate(lang, key)
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                return ApiError {
                    status,
                    error: store.translate(lang, "validation_failed"),
                    details: Some(json!(details)),
                };
            }
            AppError::InvalidBody(detail) => store.format(lang, "invalid_body", &[("detail", detail.as_str())]),
            AppError::BadRequest(key) => store.translate(lang, key),
            AppError::NotFound(resource) => {
                let name = store.translate(lang, resource.key());
                store.format(lang, "not_found", &[("resource", name.as_str())])
            }
            AppError::UnitNotVacant => store.translate(lang, "unit_not_vacant"),
            AppError::TenantHasActiveLeases => store.translate(lang, "tenant_has_active_leases"),
            AppError::LeaseNotActive => store.translate(lang, "lease_not_active"),
            AppError::EmailAlreadyExists => store.translate(lang, "email_already_exists"),
            AppError::InvalidCredentials => store.translate(lang, "invalid_credentials"),
            AppError::InvalidToken => store.translate(lang, "invalid_token"),
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                store.translate(lang, "internal_error")
            }
        };

        ApiError { status, error, details: None }
    }
}

/// Constrói um `ValidationErrors` de um único campo, para regras que o derive não cobre.
pub fn field_error(field: &'static str, code: &'static str) -> AppError {
    let mut errors = validator::ValidationErrors::new();
    errors.add(field, validator::ValidationError::new(code));
    AppError::ValidationError(errors)
}

/// Texto obrigatório: aparado, e vazio conta como ausente.
pub fn required_text(field: &'static str, value: Option<&str>) -> Result<String, AppError> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(field_error(field, "required")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locale(lang: &str) -> Locale {
        Locale(lang.to_string())
    }

    #[test]
    fn not_found_is_localized() {
        let store = I18nStore::new();
        let api = AppError::NotFound(Resource::Unit).to_api_error(&locale("pt"), &store);
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.error, "Unidade não encontrado(a)");
    }

    #[test]
    fn validation_details_are_grouped_by_field() {
        let store = I18nStore::new();
        let api = field_error("amount", "non_negative").to_api_error(&locale("en"), &store);
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.unwrap();
        assert_eq!(details["amount"][0], "Value cannot be negative");
    }

    #[test]
    fn database_errors_hide_details() {
        let store = I18nStore::new();
        let api = AppError::DatabaseError(sqlx::Error::RowNotFound).to_api_error(&locale("en"), &store);
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.error, "An unexpected error occurred.");
    }
}
