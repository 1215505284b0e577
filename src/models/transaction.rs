// src/models/transaction.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::{numeric::Numeric, patch::double_option};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,  // Entrada
    Expense, // Saída
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Invoiced, // Faturado
    Paid,     // Pago
    Deferred, // Adiado
}

impl PaymentStatus {
    /// "invoiced" e "deferred" são mantidos; qualquer outro valor vira "paid".
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("invoiced") => PaymentStatus::Invoiced,
            Some("deferred") => PaymentStatus::Deferred,
            _ => PaymentStatus::Paid,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Transaction {
    pub id: i64,
    pub unit_id: Option<i64>,
    pub property_id: Option<i64>,
    pub lease_id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[schema(example = "rent")]
    pub category: Option<String>,
    pub category_detail: Option<String>,
    pub amount: Numeric,
    #[schema(value_type = String, format = Date, example = "2025-10-01")]
    pub date: NaiveDate,
    pub description: Option<String>,
    pub is_planned: bool,
    pub is_tenant_payment: bool,
    pub related_payment_id: Option<i64>,
    pub payer: Option<String>,
    pub status: PaymentStatus,
    // Só preenchido quando status = deferred
    #[schema(value_type = Option<String>, format = Date)]
    pub scheduled_pay_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct TransactionSummary {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub transaction: Transaction,
    pub unit_number: Option<String>,
    pub property_name: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TransactionListQuery {
    /// income | expense
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    /// "true"/"1" ou "false"/"0"
    pub is_planned: Option<String>,
    pub unit_id: Option<i64>,
    pub property_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Filtros já interpretados, usados pelo repositório.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    pub is_planned: Option<bool>,
    pub unit_id: Option<i64>,
    pub property_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    // Planejadas OU adiadas (calendário)
    pub planned_or_deferred: bool,
}

impl From<TransactionListQuery> for TransactionFilter {
    fn from(query: TransactionListQuery) -> Self {
        let is_planned = query.is_planned.as_deref().and_then(|v| match v.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        });
        Self {
            kind: query.kind,
            is_planned,
            unit_id: query.unit_id,
            property_id: query.property_id,
            start_date: query.start_date,
            end_date: query.end_date,
            planned_or_deferred: false,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTransactionPayload {
    pub unit_id: Option<i64>,
    pub property_id: Option<i64>,
    pub lease_id: Option<i64>,

    #[serde(rename = "type")]
    #[validate(required(message = "required"))]
    pub kind: Option<TransactionType>,

    pub category: Option<String>,
    pub category_detail: Option<String>,

    #[validate(required(message = "required"))]
    pub amount: Option<Numeric>,

    #[validate(required(message = "required"))]
    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,

    pub description: Option<String>,
    pub is_planned: Option<bool>,
    pub is_tenant_payment: Option<bool>,
    pub related_payment_id: Option<i64>,
    pub payer: Option<String>,
    // Texto livre; normalizado por PaymentStatus::normalize
    #[schema(example = "deferred")]
    pub status: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub scheduled_pay_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTransactionPayload {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i64>)]
    pub unit_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i64>)]
    pub property_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i64>)]
    pub lease_id: Option<Option<i64>>,
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub category_detail: Option<Option<String>>,
    pub amount: Option<Numeric>,
    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub is_planned: Option<bool>,
    pub is_tenant_payment: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i64>)]
    pub related_payment_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub payer: Option<Option<String>>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub scheduled_pay_date: Option<Option<NaiveDate>>,
}

// --- Calendário de pagamentos ---

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CalendarQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CalendarType {
    PlannedIncome,
    PlannedExpense,
    Deferred,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CalendarEntry {
    #[serde(flatten)]
    pub transaction: TransactionSummary,
    pub calendar_type: CalendarType,
    #[schema(value_type = String, format = Date)]
    pub display_date: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct PaymentCalendar {
    // Chave: data no formato YYYY-MM-DD
    pub by_date: BTreeMap<String, Vec<CalendarEntry>>,
    pub dates: Vec<String>,
}
