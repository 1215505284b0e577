// src/models/tenant.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::{common::patch::double_option, models::lease::Lease};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Tenant {
    pub id: i64,
    #[schema(example = "ООО Ромашка")]
    pub name: String,
    #[schema(example = "Иван Петров")]
    pub contact_person: Option<String>,
    #[schema(example = "+7 900 000-00-00")]
    pub phone: Option<String>,
    #[schema(example = "office@romashka.ru")]
    pub email: Option<String>,
    #[schema(example = "7701234567")]
    pub tax_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inquilino na listagem, com os contratos ativos resumidos.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TenantSummary {
    #[serde(flatten)]
    pub tenant: Tenant,
    pub active_leases_count: i64,
    // Números das unidades com contrato ativo
    pub active_units: Vec<String>,
}

/// Contrato do histórico do inquilino.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct TenantLease {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub lease: Lease,
    pub unit_number: Option<String>,
    pub property_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TenantDetail {
    #[serde(flatten)]
    pub tenant: Tenant,
    pub leases: Vec<TenantLease>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTenantPayload {
    #[validate(required(message = "required"))]
    pub name: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub tax_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTenantPayload {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub contact_person: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub tax_id: Option<Option<String>>,
}
