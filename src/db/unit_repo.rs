// src/db/unit_repo.rs

use chrono::Utc;
use sqlx::{Executor, QueryBuilder, Sqlite};

use crate::{
    common::{error::AppError, numeric::Numeric},
    models::unit::{Unit, UnitDetail, UnitStatus},
};

// Nomes do imóvel e do inquilino do contrato vigente
const DETAIL_SELECT: &str = r#"
    SELECT u.*, p.name AS property_name, t.name AS tenant_name
    FROM units u
    LEFT JOIN properties p ON p.id = u.property_id
    LEFT JOIN leases l ON l.id = u.current_lease_id
    LEFT JOIN tenants t ON t.id = l.tenant_id
"#;

/// Campos de uma nova unidade (aluguel já calculado).
pub struct NewUnit<'a> {
    pub property_id: i64,
    pub unit_number: &'a str,
    pub area: Numeric,
    pub price_per_sqm: Numeric,
    pub monthly_rent: Numeric,
    pub status: UnitStatus,
    pub category: Option<&'a str>,
}

#[derive(Clone, Default)]
pub struct UnitRepository;

impl UnitRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(&self, executor: E, property_id: Option<i64>) -> Result<Vec<UnitDetail>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut query = QueryBuilder::<Sqlite>::new(DETAIL_SELECT);
        if let Some(property_id) = property_id {
            query.push(" WHERE u.property_id = ").push_bind(property_id);
        }
        query.push(" ORDER BY u.property_id, u.unit_number, u.id");

        let units = query.build_query_as::<UnitDetail>().fetch_all(executor).await?;
        Ok(units)
    }

    /// Todas as unidades, sem junções (usado nas agregações).
    pub async fn list_plain<'e, E>(&self, executor: E) -> Result<Vec<Unit>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let units = sqlx::query_as::<_, Unit>("SELECT * FROM units ORDER BY property_id, unit_number, id")
            .fetch_all(executor)
            .await?;
        Ok(units)
    }

    pub async fn find_detail<'e, E>(&self, executor: E, id: i64) -> Result<Option<UnitDetail>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("{DETAIL_SELECT} WHERE u.id = ?");
        let unit = sqlx::query_as::<_, UnitDetail>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(unit)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Unit>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let unit = sqlx::query_as::<_, Unit>("SELECT * FROM units WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(unit)
    }

    pub async fn create<'e, E>(&self, executor: E, new: NewUnit<'_>) -> Result<Unit, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        let unit = sqlx::query_as::<_, Unit>(
            r#"
            INSERT INTO units
                (property_id, unit_number, area, price_per_sqm, monthly_rent, status, category, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
            .bind(new.property_id)
            .bind(new.unit_number)
            .bind(new.area)
            .bind(new.price_per_sqm)
            .bind(new.monthly_rent)
            .bind(new.status)
            .bind(new.category)
            .bind(now)
            .bind(now)
            .fetch_one(executor)
            .await?;
        Ok(unit)
    }

    /// Grava os campos editáveis (estado já mesclado pelo serviço).
    pub async fn update<'e, E>(&self, executor: E, unit: &Unit) -> Result<Option<Unit>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let updated = sqlx::query_as::<_, Unit>(
            r#"
            UPDATE units
            SET property_id = ?, unit_number = ?, area = ?, price_per_sqm = ?,
                monthly_rent = ?, status = ?, category = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
            .bind(unit.property_id)
            .bind(&unit.unit_number)
            .bind(unit.area)
            .bind(unit.price_per_sqm)
            .bind(unit.monthly_rent)
            .bind(unit.status)
            .bind(&unit.category)
            .bind(Utc::now())
            .bind(unit.id)
            .fetch_optional(executor)
            .await?;
        Ok(updated)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM units WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  OCUPAÇÃO (chamados pelo serviço de contratos, dentro da transação)
    // =========================================================================

    pub async fn occupy<'e, E>(
        &self,
        executor: E,
        unit_id: i64,
        tenant_id: i64,
        tenant_name: &str,
        lease_id: i64,
        monthly_rent: Numeric,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            UPDATE units
            SET status = ?, current_tenant_id = ?, current_tenant_name = ?,
                current_lease_id = ?, monthly_rent = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
            .bind(UnitStatus::Rented)
            .bind(tenant_id)
            .bind(tenant_name)
            .bind(lease_id)
            .bind(monthly_rent)
            .bind(Utc::now())
            .bind(unit_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Libera a unidade, mas só se ela ainda aponta para este contrato.
    pub async fn release<'e, E>(&self, executor: E, unit_id: i64, lease_id: i64) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            UPDATE units
            SET status = ?, current_tenant_id = NULL, current_tenant_name = NULL,
                current_lease_id = NULL, updated_at = ?
            WHERE id = ? AND current_lease_id = ?
            "#,
        )
            .bind(UnitStatus::Vacant)
            .bind(Utc::now())
            .bind(unit_id)
            .bind(lease_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Acompanha o aluguel do contrato vigente.
    pub async fn set_lease_rent<'e, E>(
        &self,
        executor: E,
        unit_id: i64,
        lease_id: i64,
        monthly_rent: Numeric,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query("UPDATE units SET monthly_rent = ?, updated_at = ? WHERE id = ? AND current_lease_id = ?")
            .bind(monthly_rent)
            .bind(Utc::now())
            .bind(unit_id)
            .bind(lease_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Atualiza o nome desnormalizado quando o inquilino é renomeado.
    pub async fn rename_current_tenant<'e, E>(&self, executor: E, tenant_id: i64, tenant_name: &str) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query("UPDATE units SET current_tenant_name = ? WHERE current_tenant_id = ?")
            .bind(tenant_name)
            .bind(tenant_id)
            .execute(executor)
            .await?;
        Ok(())
    }
}
