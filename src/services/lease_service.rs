// src/services/lease_service.rs

use sqlx::{Acquire, Executor, Sqlite};

use crate::{
    common::{
        error::{field_error, AppError, Resource},
        patch::merge_nullable,
    },
    db::{lease_repo::NewLease, LeaseRepository, PropertyRepository, TenantRepository, UnitRepository},
    models::{
        lease::{CreateLeasePayload, Lease, LeaseDetail, LeaseListQuery, LeaseStatus, LeaseSummary, UpdateLeasePayload},
        unit::UnitStatus,
    },
};

#[derive(Clone)]
pub struct LeaseService {
    repo: LeaseRepository,
    unit_repo: UnitRepository,
    tenant_repo: TenantRepository,
    property_repo: PropertyRepository,
}

impl LeaseService {
    pub fn new(
        repo: LeaseRepository,
        unit_repo: UnitRepository,
        tenant_repo: TenantRepository,
        property_repo: PropertyRepository,
    ) -> Self {
        Self { repo, unit_repo, tenant_repo, property_repo }
    }

    pub async fn list<'e, E>(&self, executor: E, query: LeaseListQuery) -> Result<Vec<LeaseSummary>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.repo.list(executor, query.status).await
    }

    pub async fn get<'e, E>(&self, executor: E, id: i64) -> Result<LeaseDetail, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Copy,
    {
        let lease = self.find(executor, id).await?;
        let unit = self.unit_repo.find_by_id(executor, lease.unit_id).await?;
        let tenant = self.tenant_repo.find_by_id(executor, lease.tenant_id).await?;
        let property = match &unit {
            Some(unit) => self.property_repo.find_by_id(executor, unit.property_id).await?,
            None => None,
        };

        Ok(LeaseDetail { lease, unit, tenant, property })
    }

    /// Cria o contrato e ocupa a unidade na mesma transação.
    pub async fn create<'e, A>(&self, conn: A, payload: CreateLeasePayload) -> Result<Lease, AppError>
    where
        A: Acquire<'e, Database = Sqlite>,
    {
        let new = NewLease {
            unit_id: payload.unit_id.ok_or_else(|| field_error("unit_id", "required"))?,
            tenant_id: payload.tenant_id.ok_or_else(|| field_error("tenant_id", "required"))?,
            start_date: payload.start_date.ok_or_else(|| field_error("start_date", "required"))?,
            end_date: payload.end_date,
            monthly_rent: payload.monthly_rent.ok_or_else(|| field_error("monthly_rent", "required"))?,
            deposit: payload.deposit,
        };
        if new.monthly_rent.is_negative() {
            return Err(field_error("monthly_rent", "non_negative"));
        }

        let mut tx = conn.begin().await?;

        let unit = self.unit_repo
            .find_by_id(&mut *tx, new.unit_id)
            .await?
            .ok_or(AppError::NotFound(Resource::Unit))?;
        let tenant = self.tenant_repo
            .find_by_id(&mut *tx, new.tenant_id)
            .await?
            .ok_or(AppError::NotFound(Resource::Tenant))?;

        // Alugada ou em manutenção: não aceita contrato
        if unit.status != UnitStatus::Vacant {
            return Err(AppError::UnitNotVacant);
        }

        let lease = self.repo.create(&mut *tx, &new).await?;
        self.unit_repo
            .occupy(&mut *tx, unit.id, tenant.id, &tenant.name, lease.id, lease.monthly_rent)
            .await?;

        tx.commit().await?;

        tracing::info!("📝 Contrato {} criado: unidade {} para {}", lease.id, unit.unit_number, tenant.name);
        Ok(lease)
    }

    pub async fn update<'e, A>(&self, conn: A, id: i64, payload: UpdateLeasePayload) -> Result<Lease, AppError>
    where
        A: Acquire<'e, Database = Sqlite>,
    {
        let mut tx = conn.begin().await?;

        let current = self.find(&mut *tx, id).await?;
        let mut lease = current.clone();

        if let Some(start_date) = payload.start_date {
            lease.start_date = start_date;
        }
        lease.end_date = merge_nullable(lease.end_date, payload.end_date);
        if let Some(rent) = payload.monthly_rent {
            if rent.is_negative() {
                return Err(field_error("monthly_rent", "non_negative"));
            }
            lease.monthly_rent = rent;
        }
        lease.deposit = merge_nullable(lease.deposit, payload.deposit);
        if let Some(status) = payload.status {
            lease.status = status;
        }

        let ended = lease.status.is_ended() && !current.status.is_ended();
        let reactivated = lease.status == LeaseStatus::Active && current.status != LeaseStatus::Active;

        // Reativação volta a ocupar a unidade, que precisa estar livre
        let reoccupied = if reactivated {
            let unit = self.unit_repo
                .find_by_id(&mut *tx, lease.unit_id)
                .await?
                .ok_or(AppError::NotFound(Resource::Unit))?;
            if unit.status != UnitStatus::Vacant {
                return Err(AppError::UnitNotVacant);
            }
            let tenant = self.tenant_repo
                .find_by_id(&mut *tx, lease.tenant_id)
                .await?
                .ok_or(AppError::NotFound(Resource::Tenant))?;
            Some((unit, tenant))
        } else {
            None
        };

        let updated = self.repo
            .update(&mut *tx, &lease)
            .await?
            .ok_or(AppError::NotFound(Resource::Lease))?;

        if ended {
            self.unit_repo.release(&mut *tx, updated.unit_id, updated.id).await?;
            tracing::info!("🔚 Contrato {} encerrado ({:?})", updated.id, updated.status);
        } else if let Some((unit, tenant)) = reoccupied {
            self.unit_repo
                .occupy(&mut *tx, unit.id, tenant.id, &tenant.name, updated.id, updated.monthly_rent)
                .await?;
        } else if updated.status == LeaseStatus::Active && updated.monthly_rent != current.monthly_rent {
            self.unit_repo
                .set_lease_rent(&mut *tx, updated.unit_id, updated.id, updated.monthly_rent)
                .await?;
        }

        tx.commit().await?;
        Ok(updated)
    }

    /// Libera a unidade (se ainda aponta para este contrato) e remove o contrato.
    pub async fn delete<'e, A>(&self, conn: A, id: i64) -> Result<(), AppError>
    where
        A: Acquire<'e, Database = Sqlite>,
    {
        let mut tx = conn.begin().await?;

        let lease = self.find(&mut *tx, id).await?;
        self.unit_repo.release(&mut *tx, lease.unit_id, lease.id).await?;
        self.repo.delete(&mut *tx, id).await?;

        tx.commit().await?;

        tracing::info!("🗑️ Contrato {} removido", id);
        Ok(())
    }

    async fn find<'e, E>(&self, executor: E, id: i64) -> Result<Lease, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.repo
            .find_by_id(executor, id)
            .await?
            .ok_or(AppError::NotFound(Resource::Lease))
    }
}
