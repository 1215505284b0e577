// src/models/invoice.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::numeric::Numeric;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateInvoicePayload {
    #[serde(alias = "lease_id")]
    #[validate(required(message = "required"))]
    pub lease_id: Option<i64>,
    /// Texto livre; padrão: mês e ano atuais
    #[schema(example = "October 2025")]
    pub period: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InvoicePdfQuery {
    pub period: Option<String>,
}

/// Dados do emissor (vêm da configuração).
#[derive(Debug, Clone)]
pub struct CompanyInfo {
    pub name: String,
    pub address: Option<String>,
    pub tax_id: Option<String>,
    pub currency_symbol: String,
}

/// Tudo o que a fatura precisa, já resolvido a partir do contrato.
#[derive(Debug, Clone)]
pub struct InvoiceData {
    pub number: String,
    pub lease_id: i64,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    pub period: String,
    pub tenant_name: String,
    pub tenant_email: Option<String>,
    pub tenant_phone: Option<String>,
    pub tenant_tax_id: Option<String>,
    pub unit_number: String,
    pub property_name: String,
    pub amount: Numeric,
    pub company: CompanyInfo,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDocument {
    #[schema(example = "INV-12-1760000000000")]
    pub number: String,
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub due_date: NaiveDate,
    pub html: String,
    // PDF em base64
    pub pdf: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateInvoiceResponse {
    pub success: bool,
    pub invoice: InvoiceDocument,
}
