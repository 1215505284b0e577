// src/db/transaction_repo.rs

use chrono::{NaiveDate, Utc};
use sqlx::{Executor, QueryBuilder, Sqlite};

use crate::{
    common::error::AppError,
    models::transaction::{Transaction, TransactionFilter, TransactionSummary},
};

const SUMMARY_SELECT: &str = r#"
    SELECT tr.*, u.unit_number, p.name AS property_name
    FROM transactions tr
    LEFT JOIN units u ON u.id = tr.unit_id
    LEFT JOIN properties p ON p.id = COALESCE(tr.property_id, u.property_id)
    WHERE 1 = 1
"#;

#[derive(Clone, Default)]
pub struct TransactionRepository;

impl TransactionRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(&self, executor: E, filter: &TransactionFilter) -> Result<Vec<TransactionSummary>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut query = QueryBuilder::<Sqlite>::new(SUMMARY_SELECT);
        if let Some(kind) = filter.kind {
            query.push(" AND tr.kind = ").push_bind(kind);
        }
        if let Some(is_planned) = filter.is_planned {
            query.push(" AND tr.is_planned = ").push_bind(is_planned);
        }
        if let Some(unit_id) = filter.unit_id {
            query.push(" AND tr.unit_id = ").push_bind(unit_id);
        }
        if let Some(property_id) = filter.property_id {
            query.push(" AND tr.property_id = ").push_bind(property_id);
        }
        if let Some(start) = filter.start_date {
            query.push(" AND tr.date >= ").push_bind(start);
        }
        if let Some(end) = filter.end_date {
            query.push(" AND tr.date <= ").push_bind(end);
        }
        if filter.planned_or_deferred {
            query.push(" AND (tr.is_planned = 1 OR tr.status = 'deferred')");
        }
        query.push(" ORDER BY tr.date DESC, tr.id DESC");

        let transactions = query.build_query_as::<TransactionSummary>().fetch_all(executor).await?;
        Ok(transactions)
    }

    /// Transações com data a partir de `since` (gráfico mensal e previsões).
    pub async fn list_since<'e, E>(&self, executor: E, since: NaiveDate) -> Result<Vec<Transaction>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let transactions = sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE date >= ? ORDER BY date, id")
            .bind(since)
            .fetch_all(executor)
            .await?;
        Ok(transactions)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Transaction>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let transaction = sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(transaction)
    }

    /// Insere a partir de um registro montado pelo serviço (id e datas são ignorados).
    pub async fn create<'e, E>(&self, executor: E, tr: &Transaction) -> Result<Transaction, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        let created = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions
                (unit_id, property_id, lease_id, kind, category, category_detail, amount, date, description,
                 is_planned, is_tenant_payment, related_payment_id, payer, status, scheduled_pay_date,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
            .bind(tr.unit_id)
            .bind(tr.property_id)
            .bind(tr.lease_id)
            .bind(tr.kind)
            .bind(&tr.category)
            .bind(&tr.category_detail)
            .bind(tr.amount)
            .bind(tr.date)
            .bind(&tr.description)
            .bind(tr.is_planned)
            .bind(tr.is_tenant_payment)
            .bind(tr.related_payment_id)
            .bind(&tr.payer)
            .bind(tr.status)
            .bind(tr.scheduled_pay_date)
            .bind(now)
            .bind(now)
            .fetch_one(executor)
            .await?;
        Ok(created)
    }

    pub async fn update<'e, E>(&self, executor: E, tr: &Transaction) -> Result<Option<Transaction>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let updated = sqlx::query_as::<_, Transaction>(
            r#"
            UPDATE transactions
            SET unit_id = ?, property_id = ?, lease_id = ?, kind = ?, category = ?, category_detail = ?,
                amount = ?, date = ?, description = ?, is_planned = ?, is_tenant_payment = ?,
                related_payment_id = ?, payer = ?, status = ?, scheduled_pay_date = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
            .bind(tr.unit_id)
            .bind(tr.property_id)
            .bind(tr.lease_id)
            .bind(tr.kind)
            .bind(&tr.category)
            .bind(&tr.category_detail)
            .bind(tr.amount)
            .bind(tr.date)
            .bind(&tr.description)
            .bind(tr.is_planned)
            .bind(tr.is_tenant_payment)
            .bind(tr.related_payment_id)
            .bind(&tr.payer)
            .bind(tr.status)
            .bind(tr.scheduled_pay_date)
            .bind(Utc::now())
            .bind(tr.id)
            .fetch_optional(executor)
            .await?;
        Ok(updated)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
