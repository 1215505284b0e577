// src/models/payment.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::{numeric::Numeric, patch::double_option};

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActualPaymentStatus {
    Planned, // Previsto
    Paid,    // Pago
}

impl ActualPaymentStatus {
    pub fn from_paid(is_paid: bool) -> Self {
        if is_paid { ActualPaymentStatus::Paid } else { ActualPaymentStatus::Planned }
    }
}

// =========================================================================
//  PAGAMENTOS OBRIGATÓRIOS (planos recorrentes)
// =========================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MandatoryPayment {
    pub id: i64,
    pub unit_id: Option<i64>,
    pub property_id: Option<i64>,
    #[schema(example = "utilities")]
    pub payment_type: String,
    pub amount: Numeric,
    pub frequency: Frequency,
    #[schema(value_type = String, format = Date, example = "2025-01-01")]
    pub start_date: NaiveDate,
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
    // Custo (saída) ou receita
    pub is_cost: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct MandatoryPaymentSummary {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub payment: MandatoryPayment,
    pub unit_number: Option<String>,
    pub property_name: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MandatoryPaymentListQuery {
    /// Tem prioridade sobre property_id
    pub unit_id: Option<i64>,
    pub property_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMandatoryPaymentPayload {
    pub unit_id: Option<i64>,
    pub property_id: Option<i64>,

    #[validate(required(message = "required"))]
    pub payment_type: Option<String>,

    #[validate(required(message = "required"))]
    pub amount: Option<Numeric>,

    pub frequency: Option<Frequency>,

    #[validate(required(message = "required"))]
    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,

    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,

    pub is_cost: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateMandatoryPaymentPayload {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i64>)]
    pub unit_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i64>)]
    pub property_id: Option<Option<i64>>,
    pub payment_type: Option<String>,
    pub amount: Option<Numeric>,
    pub frequency: Option<Frequency>,
    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<Option<NaiveDate>>,
    pub is_cost: Option<bool>,
}

// =========================================================================
//  PAGAMENTOS OBRIGATÓRIOS EFETIVOS (instância mensal de um plano)
// =========================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ActualMandatoryPayment {
    pub id: i64,
    pub mandatory_payment_id: i64,
    pub unit_id: Option<i64>,
    pub property_id: Option<i64>,
    pub payment_type: String,
    pub planned_amount: Numeric,
    pub actual_amount: Option<Numeric>,
    #[schema(value_type = Option<String>, format = Date)]
    pub payment_date: Option<NaiveDate>,
    #[schema(example = 10)]
    pub month: i32,
    #[schema(example = 2025)]
    pub year: i32,
    pub status: ActualPaymentStatus,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActualPaymentListQuery {
    /// Só aplicado junto com `year`
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub unit_id: Option<i64>,
    pub property_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpsertActualPaymentPayload {
    #[validate(required(message = "required"))]
    pub mandatory_payment_id: Option<i64>,

    #[validate(required(message = "required"), range(min = 1, max = 12, message = "out_of_range"))]
    pub month: Option<i32>,

    #[validate(required(message = "required"), range(min = 1900, max = 9999, message = "out_of_range"))]
    pub year: Option<i32>,

    pub unit_id: Option<i64>,
    pub property_id: Option<i64>,
    pub payment_type: Option<String>,
    pub planned_amount: Option<Numeric>,
    pub actual_amount: Option<Numeric>,
    #[schema(value_type = Option<String>, format = Date)]
    pub payment_date: Option<NaiveDate>,
    pub is_paid: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateActualPaymentPayload {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub actual_amount: Option<Option<Numeric>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub payment_date: Option<Option<NaiveDate>>,
    pub is_paid: Option<bool>,
}

/// Corpo opcional dos endpoints `mark-paid`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct MarkPaidPayload {
    pub actual_amount: Option<Numeric>,
    #[schema(value_type = Option<String>, format = Date)]
    pub payment_date: Option<NaiveDate>,
    // Usados apenas por pagamentos de inquilinos
    pub payment_method: Option<String>,
    pub description: Option<String>,
}
