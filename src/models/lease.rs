// src/models/lease.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    common::{numeric::Numeric, patch::double_option},
    models::{property::Property, tenant::Tenant, unit::Unit},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LeaseStatus {
    Active,     // Vigente
    Completed,  // Encerrado no prazo
    Terminated, // Rescindido
}

impl LeaseStatus {
    /// Encerrado ou rescindido: a unidade volta a ficar livre.
    pub fn is_ended(self) -> bool {
        matches!(self, LeaseStatus::Completed | LeaseStatus::Terminated)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Lease {
    pub id: i64,
    pub unit_id: i64,
    pub tenant_id: i64,
    #[schema(value_type = String, format = Date, example = "2025-01-01")]
    pub start_date: NaiveDate,
    #[schema(value_type = Option<String>, format = Date, example = "2025-12-31")]
    pub end_date: Option<NaiveDate>,
    pub monthly_rent: Numeric,
    pub deposit: Option<Numeric>,
    pub status: LeaseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Contrato na listagem, com dados da unidade, imóvel e inquilino.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct LeaseSummary {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub lease: Lease,
    pub unit_number: Option<String>,
    pub property_name: Option<String>,
    pub tenant_name: Option<String>,
    pub tenant_email: Option<String>,
    pub tenant_phone: Option<String>,
}

/// Contrato com as entidades relacionadas embutidas.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaseDetail {
    #[serde(flatten)]
    pub lease: Lease,
    pub unit: Option<Unit>,
    pub tenant: Option<Tenant>,
    pub property: Option<Property>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaseListQuery {
    /// active | completed | terminated
    pub status: Option<LeaseStatus>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLeasePayload {
    #[validate(required(message = "required"))]
    pub unit_id: Option<i64>,

    #[validate(required(message = "required"))]
    pub tenant_id: Option<i64>,

    #[validate(required(message = "required"))]
    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,

    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,

    #[validate(required(message = "required"))]
    pub monthly_rent: Option<Numeric>,

    pub deposit: Option<Numeric>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateLeasePayload {
    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<Option<NaiveDate>>,
    pub monthly_rent: Option<Numeric>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub deposit: Option<Option<Numeric>>,
    pub status: Option<LeaseStatus>,
}
