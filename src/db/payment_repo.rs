// src/db/payment_repo.rs

use chrono::{NaiveDate, Utc};
use sqlx::{Executor, QueryBuilder, Sqlite};

use crate::{
    common::{error::AppError, numeric::Numeric},
    models::payment::{
        ActualMandatoryPayment, ActualPaymentStatus, Frequency, MandatoryPayment, MandatoryPaymentSummary,
    },
};

const PLAN_SUMMARY_SELECT: &str = r#"
    SELECT mp.*, u.unit_number, p.name AS property_name
    FROM mandatory_payments mp
    LEFT JOIN units u ON u.id = mp.unit_id
    LEFT JOIN properties p ON p.id = COALESCE(mp.property_id, u.property_id)
"#;

/// Campos de um plano de pagamento (criação e update).
pub struct PlanFields<'a> {
    pub unit_id: Option<i64>,
    pub property_id: Option<i64>,
    pub payment_type: &'a str,
    pub amount: Numeric,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_cost: bool,
}

pub struct NewActualPayment<'a> {
    pub mandatory_payment_id: i64,
    pub unit_id: Option<i64>,
    pub property_id: Option<i64>,
    pub payment_type: &'a str,
    pub planned_amount: Numeric,
    pub actual_amount: Option<Numeric>,
    pub payment_date: Option<NaiveDate>,
    pub month: i32,
    pub year: i32,
    pub is_paid: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ActualPaymentFilter {
    pub period: Option<(i32, i32)>,
    pub unit_id: Option<i64>,
    pub property_id: Option<i64>,
    pub mandatory_payment_id: Option<i64>,
}

#[derive(Clone, Default)]
pub struct PaymentRepository;

impl PaymentRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  PLANOS
    // =========================================================================

    pub async fn list_plans<'e, E>(
        &self,
        executor: E,
        unit_id: Option<i64>,
        property_id: Option<i64>,
    ) -> Result<Vec<MandatoryPaymentSummary>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut query = QueryBuilder::<Sqlite>::new(PLAN_SUMMARY_SELECT);
        // Filtro por unidade tem prioridade
        if let Some(unit_id) = unit_id {
            query.push(" WHERE mp.unit_id = ").push_bind(unit_id);
        } else if let Some(property_id) = property_id {
            query.push(" WHERE mp.property_id = ").push_bind(property_id);
        }
        query.push(" ORDER BY mp.created_at DESC, mp.id DESC");

        let plans = query.build_query_as::<MandatoryPaymentSummary>().fetch_all(executor).await?;
        Ok(plans)
    }

    /// Planos mensais de custo de uma unidade (base da rentabilidade planejada).
    pub async fn monthly_costs_for_unit<'e, E>(&self, executor: E, unit_id: i64) -> Result<Vec<MandatoryPayment>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let plans = sqlx::query_as::<_, MandatoryPayment>(
            "SELECT * FROM mandatory_payments WHERE unit_id = ? AND is_cost = 1 AND frequency = ?",
        )
            .bind(unit_id)
            .bind(Frequency::Monthly)
            .fetch_all(executor)
            .await?;
        Ok(plans)
    }

    pub async fn find_plan<'e, E>(&self, executor: E, id: i64) -> Result<Option<MandatoryPayment>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let plan = sqlx::query_as::<_, MandatoryPayment>("SELECT * FROM mandatory_payments WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(plan)
    }

    pub async fn create_plan<'e, E>(&self, executor: E, fields: PlanFields<'_>) -> Result<MandatoryPayment, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        let plan = sqlx::query_as::<_, MandatoryPayment>(
            r#"
            INSERT INTO mandatory_payments
                (unit_id, property_id, payment_type, amount, frequency, start_date, end_date, is_cost, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
            .bind(fields.unit_id)
            .bind(fields.property_id)
            .bind(fields.payment_type)
            .bind(fields.amount)
            .bind(fields.frequency)
            .bind(fields.start_date)
            .bind(fields.end_date)
            .bind(fields.is_cost)
            .bind(now)
            .bind(now)
            .fetch_one(executor)
            .await?;
        Ok(plan)
    }

    pub async fn update_plan<'e, E>(
        &self,
        executor: E,
        id: i64,
        fields: PlanFields<'_>,
    ) -> Result<Option<MandatoryPayment>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let plan = sqlx::query_as::<_, MandatoryPayment>(
            r#"
            UPDATE mandatory_payments
            SET unit_id = ?, property_id = ?, payment_type = ?, amount = ?, frequency = ?,
                start_date = ?, end_date = ?, is_cost = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
            .bind(fields.unit_id)
            .bind(fields.property_id)
            .bind(fields.payment_type)
            .bind(fields.amount)
            .bind(fields.frequency)
            .bind(fields.start_date)
            .bind(fields.end_date)
            .bind(fields.is_cost)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(plan)
    }

    pub async fn delete_plan<'e, E>(&self, executor: E, id: i64) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM mandatory_payments WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  PAGAMENTOS EFETIVOS
    // =========================================================================

    pub async fn list_actual<'e, E>(
        &self,
        executor: E,
        filter: &ActualPaymentFilter,
    ) -> Result<Vec<ActualMandatoryPayment>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM actual_mandatory_payments WHERE 1 = 1");
        if let Some((month, year)) = filter.period {
            query.push(" AND month = ").push_bind(month);
            query.push(" AND year = ").push_bind(year);
        }
        if let Some(unit_id) = filter.unit_id {
            query.push(" AND unit_id = ").push_bind(unit_id);
        }
        if let Some(property_id) = filter.property_id {
            query.push(" AND property_id = ").push_bind(property_id);
        }
        if let Some(plan_id) = filter.mandatory_payment_id {
            query.push(" AND mandatory_payment_id = ").push_bind(plan_id);
        }
        query.push(" ORDER BY year DESC, month DESC, id DESC");

        let payments = query.build_query_as::<ActualMandatoryPayment>().fetch_all(executor).await?;
        Ok(payments)
    }

    pub async fn find_actual<'e, E>(&self, executor: E, id: i64) -> Result<Option<ActualMandatoryPayment>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let payment = sqlx::query_as::<_, ActualMandatoryPayment>("SELECT * FROM actual_mandatory_payments WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(payment)
    }

    pub async fn find_actual_for_period<'e, E>(
        &self,
        executor: E,
        mandatory_payment_id: i64,
        month: i32,
        year: i32,
    ) -> Result<Option<ActualMandatoryPayment>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let payment = sqlx::query_as::<_, ActualMandatoryPayment>(
            "SELECT * FROM actual_mandatory_payments WHERE mandatory_payment_id = ? AND month = ? AND year = ?",
        )
            .bind(mandatory_payment_id)
            .bind(month)
            .bind(year)
            .fetch_optional(executor)
            .await?;
        Ok(payment)
    }

    pub async fn create_actual<'e, E>(&self, executor: E, new: NewActualPayment<'_>) -> Result<ActualMandatoryPayment, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        let payment = sqlx::query_as::<_, ActualMandatoryPayment>(
            r#"
            INSERT INTO actual_mandatory_payments
                (mandatory_payment_id, unit_id, property_id, payment_type, planned_amount, actual_amount,
                 payment_date, month, year, status, is_paid, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
            .bind(new.mandatory_payment_id)
            .bind(new.unit_id)
            .bind(new.property_id)
            .bind(new.payment_type)
            .bind(new.planned_amount)
            .bind(new.actual_amount)
            .bind(new.payment_date)
            .bind(new.month)
            .bind(new.year)
            .bind(ActualPaymentStatus::from_paid(new.is_paid))
            .bind(new.is_paid)
            .bind(now)
            .bind(now)
            .fetch_one(executor)
            .await?;
        Ok(payment)
    }

    /// Grava o estado de pagamento (valor realizado, data, quitação).
    pub async fn update_actual<'e, E>(
        &self,
        executor: E,
        payment: &ActualMandatoryPayment,
    ) -> Result<Option<ActualMandatoryPayment>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let updated = sqlx::query_as::<_, ActualMandatoryPayment>(
            r#"
            UPDATE actual_mandatory_payments
            SET actual_amount = ?, payment_date = ?, status = ?, is_paid = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
            .bind(payment.actual_amount)
            .bind(payment.payment_date)
            .bind(payment.status)
            .bind(payment.is_paid)
            .bind(Utc::now())
            .bind(payment.id)
            .fetch_optional(executor)
            .await?;
        Ok(updated)
    }

    /// Pagamentos quitados de uma unidade no mês.
    pub async fn paid_actuals_for_unit<'e, E>(
        &self,
        executor: E,
        unit_id: i64,
        month: i32,
        year: i32,
    ) -> Result<Vec<ActualMandatoryPayment>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let payments = sqlx::query_as::<_, ActualMandatoryPayment>(
            "SELECT * FROM actual_mandatory_payments WHERE unit_id = ? AND month = ? AND year = ? AND is_paid = 1",
        )
            .bind(unit_id)
            .bind(month)
            .bind(year)
            .fetch_all(executor)
            .await?;
        Ok(payments)
    }
}
