// src/models/unit.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::{numeric::Numeric, patch::double_option};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    #[default]
    Vacant,      // Livre
    Rented,      // Alugada
    Maintenance, // Em manutenção
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Unit {
    pub id: i64,
    pub property_id: i64,
    #[schema(example = "101")]
    pub unit_number: String,
    #[schema(example = 45.5)]
    pub area: Numeric,
    #[schema(example = 1200.0)]
    pub price_per_sqm: Numeric,
    // Sempre area × price_per_sqm, ou o aluguel do contrato vigente
    pub monthly_rent: Numeric,
    pub status: UnitStatus,
    #[schema(example = "office")]
    pub category: Option<String>,

    // Referências desnormalizadas do contrato vigente
    pub current_tenant_id: Option<i64>,
    pub current_tenant_name: Option<String>,
    pub current_lease_id: Option<i64>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Unidade com os nomes do imóvel e do inquilino atual.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct UnitDetail {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub unit: Unit,
    pub property_name: Option<String>,
    pub tenant_name: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UnitListQuery {
    /// Filtra pelas unidades de um imóvel
    pub property_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUnitPayload {
    #[validate(required(message = "required"))]
    pub property_id: Option<i64>,

    #[validate(required(message = "required"))]
    pub unit_number: Option<String>,

    #[validate(required(message = "required"))]
    pub area: Option<Numeric>,

    #[validate(required(message = "required"))]
    pub price_per_sqm: Option<Numeric>,

    pub status: Option<UnitStatus>,
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUnitPayload {
    pub property_id: Option<i64>,
    pub unit_number: Option<String>,
    pub area: Option<Numeric>,
    pub price_per_sqm: Option<Numeric>,
    pub status: Option<UnitStatus>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub category: Option<Option<String>>,
}

// --- Rentabilidade ---

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProfitabilityQuery {
    /// Mês (1-12) do cálculo realizado
    pub month: Option<u32>,
    /// Ano do cálculo realizado
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfitabilityFigures {
    pub monthly_rent: Numeric,
    pub mandatory_payments: Numeric,
    pub net_profit: Numeric,
    // Percentual sobre o aluguel, 2 casas decimais
    pub profitability: Numeric,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UnitProfitability {
    pub unit_id: i64,
    pub unit_number: String,
    pub planned: ProfitabilityFigures,
    // Só presente quando mês e ano são informados
    pub actual: Option<ProfitabilityFigures>,
}
