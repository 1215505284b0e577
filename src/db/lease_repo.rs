// src/db/lease_repo.rs

use chrono::{NaiveDate, Utc};
use sqlx::{Executor, QueryBuilder, Sqlite};

use crate::{
    common::{error::AppError, numeric::Numeric},
    models::lease::{Lease, LeaseStatus, LeaseSummary},
};

const SUMMARY_SELECT: &str = r#"
    SELECT l.*, u.unit_number, p.name AS property_name,
           t.name AS tenant_name, t.email AS tenant_email, t.phone AS tenant_phone
    FROM leases l
    LEFT JOIN units u ON u.id = l.unit_id
    LEFT JOIN properties p ON p.id = u.property_id
    LEFT JOIN tenants t ON t.id = l.tenant_id
"#;

pub struct NewLease {
    pub unit_id: i64,
    pub tenant_id: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub monthly_rent: Numeric,
    pub deposit: Option<Numeric>,
}

// O índice parcial de contrato ativo por unidade dispara violação de unicidade
fn map_active_conflict(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::UnitNotVacant;
        }
    }
    e.into()
}

#[derive(Clone, Default)]
pub struct LeaseRepository;

impl LeaseRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(&self, executor: E, status: Option<LeaseStatus>) -> Result<Vec<LeaseSummary>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut query = QueryBuilder::<Sqlite>::new(SUMMARY_SELECT);
        if let Some(status) = status {
            query.push(" WHERE l.status = ").push_bind(status);
        }
        query.push(" ORDER BY l.created_at DESC, l.id DESC");

        let leases = query.build_query_as::<LeaseSummary>().fetch_all(executor).await?;
        Ok(leases)
    }

    /// Contratos ativos cujo fim cai entre `from` e `until` (inclusive).
    pub async fn list_expiring<'e, E>(
        &self,
        executor: E,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<LeaseSummary>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!(
            "{SUMMARY_SELECT} WHERE l.status = 'active' AND l.end_date IS NOT NULL AND l.end_date >= ? AND l.end_date <= ? ORDER BY l.end_date, l.id"
        );
        let leases = sqlx::query_as::<_, LeaseSummary>(&sql)
            .bind(from)
            .bind(until)
            .fetch_all(executor)
            .await?;
        Ok(leases)
    }

    pub async fn list_active<'e, E>(&self, executor: E) -> Result<Vec<Lease>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let leases = sqlx::query_as::<_, Lease>("SELECT * FROM leases WHERE status = 'active' ORDER BY id")
            .fetch_all(executor)
            .await?;
        Ok(leases)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Lease>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let lease = sqlx::query_as::<_, Lease>("SELECT * FROM leases WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(lease)
    }

    pub async fn create<'e, E>(&self, executor: E, new: &NewLease) -> Result<Lease, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        let lease = sqlx::query_as::<_, Lease>(
            r#"
            INSERT INTO leases
                (unit_id, tenant_id, start_date, end_date, monthly_rent, deposit, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
            .bind(new.unit_id)
            .bind(new.tenant_id)
            .bind(new.start_date)
            .bind(new.end_date)
            .bind(new.monthly_rent)
            .bind(new.deposit)
            .bind(LeaseStatus::Active)
            .bind(now)
            .bind(now)
            .fetch_one(executor)
            .await
            .map_err(map_active_conflict)?;
        Ok(lease)
    }

    pub async fn update<'e, E>(&self, executor: E, lease: &Lease) -> Result<Option<Lease>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let updated = sqlx::query_as::<_, Lease>(
            r#"
            UPDATE leases
            SET start_date = ?, end_date = ?, monthly_rent = ?, deposit = ?, status = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
            .bind(lease.start_date)
            .bind(lease.end_date)
            .bind(lease.monthly_rent)
            .bind(lease.deposit)
            .bind(lease.status)
            .bind(Utc::now())
            .bind(lease.id)
            .fetch_optional(executor)
            .await
            .map_err(map_active_conflict)?;
        Ok(updated)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM leases WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
