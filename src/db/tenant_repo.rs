// src/db/tenant_repo.rs

use chrono::Utc;
use sqlx::{Executor, FromRow, Sqlite};

use crate::{
    common::error::AppError,
    models::tenant::{Tenant, TenantLease},
};

/// Par (inquilino, número da unidade) de um contrato ativo.
#[derive(Debug, FromRow)]
pub struct ActiveUnitRow {
    pub tenant_id: i64,
    pub unit_number: Option<String>,
}

/// Campos de contato de um inquilino (criação e update).
pub struct TenantFields<'a> {
    pub name: &'a str,
    pub contact_person: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub tax_id: Option<&'a str>,
}

#[derive(Clone, Default)]
pub struct TenantRepository;

impl TenantRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<Tenant>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let tenants = sqlx::query_as::<_, Tenant>("SELECT * FROM tenants ORDER BY created_at DESC, id DESC")
            .fetch_all(executor)
            .await?;
        Ok(tenants)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Tenant>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let tenant = sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(tenant)
    }

    /// Unidades com contrato ativo, de todos os inquilinos.
    pub async fn active_units<'e, E>(&self, executor: E) -> Result<Vec<ActiveUnitRow>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, ActiveUnitRow>(
            r#"
            SELECT l.tenant_id, u.unit_number
            FROM leases l
            LEFT JOIN units u ON u.id = l.unit_id
            WHERE l.status = 'active'
            ORDER BY l.id
            "#,
        )
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    pub async fn lease_history<'e, E>(&self, executor: E, tenant_id: i64) -> Result<Vec<TenantLease>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let leases = sqlx::query_as::<_, TenantLease>(
            r#"
            SELECT l.*, u.unit_number, p.name AS property_name
            FROM leases l
            LEFT JOIN units u ON u.id = l.unit_id
            LEFT JOIN properties p ON p.id = u.property_id
            WHERE l.tenant_id = ?
            ORDER BY l.start_date DESC, l.id DESC
            "#,
        )
            .bind(tenant_id)
            .fetch_all(executor)
            .await?;
        Ok(leases)
    }

    pub async fn count_active_leases<'e, E>(&self, executor: E, tenant_id: i64) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM leases WHERE tenant_id = ? AND status = 'active'")
            .bind(tenant_id)
            .fetch_one(executor)
            .await?;
        Ok(total)
    }

    pub async fn create<'e, E>(&self, executor: E, fields: TenantFields<'_>) -> Result<Tenant, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (name, contact_person, phone, email, tax_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
            .bind(fields.name)
            .bind(fields.contact_person)
            .bind(fields.phone)
            .bind(fields.email)
            .bind(fields.tax_id)
            .bind(now)
            .bind(now)
            .fetch_one(executor)
            .await?;
        Ok(tenant)
    }

    pub async fn update<'e, E>(&self, executor: E, id: i64, fields: TenantFields<'_>) -> Result<Option<Tenant>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            UPDATE tenants
            SET name = ?, contact_person = ?, phone = ?, email = ?, tax_id = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
            .bind(fields.name)
            .bind(fields.contact_person)
            .bind(fields.phone)
            .bind(fields.email)
            .bind(fields.tax_id)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(tenant)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM tenants WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
