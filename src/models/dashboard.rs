// src/models/dashboard.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::{
    common::numeric::Numeric,
    models::{lease::LeaseSummary, tenant_payment::TenantPayment},
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    /// Mês da receita realizada (padrão: mês atual)
    pub month: Option<u32>,
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthsQuery {
    /// Quantidade de meses (1-24, padrão 6)
    pub months: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DebtQuery {
    pub property_id: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardSummary {
    pub total_units: i64,
    pub occupied_units: i64,
    // Percentual arredondado
    pub occupancy_rate: i64,
    pub planned_revenue: Numeric,
    pub actual_revenue: Numeric,
    pub average_price_per_sqm: Numeric,
    pub planned_payments_count: i64,
    pub planned_payments_total: Numeric,
    // Contratos ativos terminando nos próximos 60 dias
    pub expiring_leases: Vec<LeaseSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthlyChartEntry {
    // YYYY-MM
    #[schema(example = "2025-10")]
    pub month: String,
    pub income: Numeric,
    pub expense: Numeric,
    pub profit: Numeric,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UnitForecast {
    pub unit_id: i64,
    pub unit_number: String,
    pub property_name: Option<String>,
    pub planned_rent: Numeric,
    pub average_expense: Numeric,
    pub forecast_profit: Numeric,
}

/// Pagamento em aberto com os dados necessários para o aging.
#[derive(Debug, Clone, FromRow)]
pub struct OutstandingPaymentRow {
    #[sqlx(flatten)]
    pub payment: TenantPayment,
    pub tenant_name: Option<String>,
    // None quando o contrato não existe mais
    pub lease_ref: Option<i64>,
    pub unit_number: Option<String>,
    pub property_id: Option<i64>,
    pub property_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TenantDebt {
    pub tenant_id: i64,
    pub tenant_name: String,
    pub lease_id: i64,
    pub unit_id: i64,
    pub unit_number: Option<String>,
    pub property_name: Option<String>,
    pub total_debt: Numeric,
    pub overdue_months: i32,
    #[schema(value_type = Option<String>, format = Date)]
    pub oldest_debt_date: Option<NaiveDate>,
    pub payment_count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DebtReport {
    pub debts: Vec<TenantDebt>,
    pub total_debt: Numeric,
}
