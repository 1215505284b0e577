// src/db/tenant_payment_repo.rs

use chrono::{NaiveDate, Utc};
use sqlx::{Executor, QueryBuilder, Sqlite};

use crate::{
    common::{error::AppError, numeric::Numeric},
    models::{
        dashboard::OutstandingPaymentRow,
        tenant_payment::{TenantPayment, TenantPaymentListQuery, TenantPaymentStatus, TenantPaymentSummary},
    },
};

pub struct NewTenantPayment<'a> {
    pub lease_id: i64,
    pub unit_id: i64,
    pub tenant_id: i64,
    pub planned_amount: Numeric,
    pub actual_amount: Option<Numeric>,
    pub payment_date: Option<NaiveDate>,
    pub month: i32,
    pub year: i32,
    pub is_paid: bool,
    pub payment_method: Option<&'a str>,
    pub description: Option<&'a str>,
}

#[derive(Clone, Default)]
pub struct TenantPaymentRepository;

impl TenantPaymentRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(&self, executor: E, filter: &TenantPaymentListQuery) -> Result<Vec<TenantPaymentSummary>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut query = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT tp.*, u.unit_number, t.name AS tenant_name
            FROM tenant_payments tp
            LEFT JOIN units u ON u.id = tp.unit_id
            LEFT JOIN tenants t ON t.id = tp.tenant_id
            WHERE 1 = 1
            "#,
        );
        if let Some(month) = filter.month {
            query.push(" AND tp.month = ").push_bind(month);
        }
        if let Some(year) = filter.year {
            query.push(" AND tp.year = ").push_bind(year);
        }
        if let Some(lease_id) = filter.lease_id {
            query.push(" AND tp.lease_id = ").push_bind(lease_id);
        }
        if let Some(unit_id) = filter.unit_id {
            query.push(" AND tp.unit_id = ").push_bind(unit_id);
        }
        if let Some(tenant_id) = filter.tenant_id {
            query.push(" AND tp.tenant_id = ").push_bind(tenant_id);
        }
        query.push(" ORDER BY tp.year DESC, tp.month DESC, tp.id DESC");

        let payments = query.build_query_as::<TenantPaymentSummary>().fetch_all(executor).await?;
        Ok(payments)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<TenantPayment>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let payment = sqlx::query_as::<_, TenantPayment>("SELECT * FROM tenant_payments WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(payment)
    }

    pub async fn find_for_period<'e, E>(
        &self,
        executor: E,
        lease_id: i64,
        month: i32,
        year: i32,
    ) -> Result<Option<TenantPayment>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let payment = sqlx::query_as::<_, TenantPayment>(
            "SELECT * FROM tenant_payments WHERE lease_id = ? AND month = ? AND year = ?",
        )
            .bind(lease_id)
            .bind(month)
            .bind(year)
            .fetch_optional(executor)
            .await?;
        Ok(payment)
    }

    pub async fn create<'e, E>(&self, executor: E, new: NewTenantPayment<'_>) -> Result<TenantPayment, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        let payment = sqlx::query_as::<_, TenantPayment>(
            r#"
            INSERT INTO tenant_payments
                (lease_id, unit_id, tenant_id, planned_amount, actual_amount, payment_date, month, year,
                 status, is_paid, payment_method, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
            .bind(new.lease_id)
            .bind(new.unit_id)
            .bind(new.tenant_id)
            .bind(new.planned_amount)
            .bind(new.actual_amount)
            .bind(new.payment_date)
            .bind(new.month)
            .bind(new.year)
            .bind(TenantPaymentStatus::from_paid(new.is_paid))
            .bind(new.is_paid)
            .bind(new.payment_method)
            .bind(new.description)
            .bind(now)
            .bind(now)
            .fetch_one(executor)
            .await?;
        Ok(payment)
    }

    /// Grava o estado completo (já mesclado pelo serviço).
    pub async fn update<'e, E>(&self, executor: E, payment: &TenantPayment) -> Result<Option<TenantPayment>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let updated = sqlx::query_as::<_, TenantPayment>(
            r#"
            UPDATE tenant_payments
            SET planned_amount = ?, actual_amount = ?, payment_date = ?, status = ?, is_paid = ?,
                payment_method = ?, description = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
            .bind(payment.planned_amount)
            .bind(payment.actual_amount)
            .bind(payment.payment_date)
            .bind(payment.status)
            .bind(payment.is_paid)
            .bind(&payment.payment_method)
            .bind(&payment.description)
            .bind(Utc::now())
            .bind(payment.id)
            .fetch_optional(executor)
            .await?;
        Ok(updated)
    }

    /// Recebimentos quitados de uma unidade no mês.
    pub async fn paid_for_unit<'e, E>(
        &self,
        executor: E,
        unit_id: i64,
        month: i32,
        year: i32,
    ) -> Result<Vec<TenantPayment>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let payments = sqlx::query_as::<_, TenantPayment>(
            "SELECT * FROM tenant_payments WHERE unit_id = ? AND month = ? AND year = ? AND is_paid = 1",
        )
            .bind(unit_id)
            .bind(month)
            .bind(year)
            .fetch_all(executor)
            .await?;
        Ok(payments)
    }

    /// Recebimentos quitados de todas as unidades no mês.
    pub async fn paid_for_period<'e, E>(&self, executor: E, month: i32, year: i32) -> Result<Vec<TenantPayment>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let payments = sqlx::query_as::<_, TenantPayment>(
            "SELECT * FROM tenant_payments WHERE month = ? AND year = ? AND is_paid = 1",
        )
            .bind(month)
            .bind(year)
            .fetch_all(executor)
            .await?;
        Ok(payments)
    }

    /// Pagamentos em aberto, com inquilino, contrato, unidade e imóvel resolvidos.
    pub async fn list_outstanding<'e, E>(&self, executor: E) -> Result<Vec<OutstandingPaymentRow>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, OutstandingPaymentRow>(
            r#"
            SELECT tp.*, t.name AS tenant_name, l.id AS lease_ref,
                   u.unit_number, u.property_id, p.name AS property_name
            FROM tenant_payments tp
            LEFT JOIN tenants t ON t.id = tp.tenant_id
            LEFT JOIN leases l ON l.id = tp.lease_id
            LEFT JOIN units u ON u.id = tp.unit_id
            LEFT JOIN properties p ON p.id = u.property_id
            WHERE tp.is_paid = 0 OR tp.status IN ('expected', 'overdue', 'partially_paid')
            ORDER BY tp.year, tp.month, tp.id
            "#,
        )
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }
}
