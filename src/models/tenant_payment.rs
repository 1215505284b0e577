// src/models/tenant_payment.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::{numeric::Numeric, patch::double_option};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TenantPaymentStatus {
    Expected,      // Aguardando
    Received,      // Recebido
    Overdue,       // Em atraso
    PartiallyPaid, // Pago parcialmente
}

impl TenantPaymentStatus {
    pub fn from_paid(is_paid: bool) -> Self {
        if is_paid { TenantPaymentStatus::Received } else { TenantPaymentStatus::Expected }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TenantPayment {
    pub id: i64,
    pub lease_id: i64,
    pub unit_id: i64,
    pub tenant_id: i64,
    pub planned_amount: Numeric,
    pub actual_amount: Option<Numeric>,
    #[schema(value_type = Option<String>, format = Date)]
    pub payment_date: Option<NaiveDate>,
    #[schema(example = 10)]
    pub month: i32,
    #[schema(example = 2025)]
    pub year: i32,
    pub status: TenantPaymentStatus,
    pub is_paid: bool,
    #[schema(example = "bank_transfer")]
    pub payment_method: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct TenantPaymentSummary {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub payment: TenantPayment,
    pub unit_number: Option<String>,
    pub tenant_name: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TenantPaymentListQuery {
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub lease_id: Option<i64>,
    pub unit_id: Option<i64>,
    pub tenant_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpsertTenantPaymentPayload {
    #[validate(required(message = "required"))]
    pub lease_id: Option<i64>,

    #[validate(required(message = "required"))]
    pub unit_id: Option<i64>,

    #[validate(required(message = "required"))]
    pub tenant_id: Option<i64>,

    #[validate(required(message = "required"), range(min = 1, max = 12, message = "out_of_range"))]
    pub month: Option<i32>,

    #[validate(required(message = "required"), range(min = 1900, max = 9999, message = "out_of_range"))]
    pub year: Option<i32>,

    pub planned_amount: Option<Numeric>,
    pub actual_amount: Option<Numeric>,
    #[schema(value_type = Option<String>, format = Date)]
    pub payment_date: Option<NaiveDate>,
    pub is_paid: Option<bool>,
    pub payment_method: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTenantPaymentPayload {
    pub planned_amount: Option<Numeric>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub actual_amount: Option<Option<Numeric>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub payment_date: Option<Option<NaiveDate>>,
    pub is_paid: Option<bool>,
    pub status: Option<TenantPaymentStatus>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub payment_method: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GenerateMonthlyPayload {
    #[validate(required(message = "required"), range(min = 1, max = 12, message = "out_of_range"))]
    pub month: Option<i32>,
    #[validate(required(message = "required"), range(min = 1900, max = 9999, message = "out_of_range"))]
    pub year: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateMonthlyResponse {
    #[schema(example = "Generated 3 planned payments for 10/2025")]
    pub message: String,
    pub generated: Vec<TenantPayment>,
}
