// src/services/tenant_service.rs

use std::collections::HashMap;

use sqlx::{Acquire, Executor, Sqlite};

use crate::{
    common::{
        error::{required_text, AppError, Resource},
        patch::{blank_to_none, merge_text},
    },
    db::{tenant_repo::TenantFields, TenantRepository, UnitRepository},
    models::tenant::{CreateTenantPayload, Tenant, TenantDetail, TenantSummary, UpdateTenantPayload},
};

#[derive(Clone)]
pub struct TenantService {
    repo: TenantRepository,
    unit_repo: UnitRepository,
}

impl TenantService {
    pub fn new(repo: TenantRepository, unit_repo: UnitRepository) -> Self {
        Self { repo, unit_repo }
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<TenantSummary>, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Copy,
    {
        let tenants = self.repo.list(executor).await?;

        // Agrupa as unidades com contrato ativo por inquilino
        let mut active: HashMap<i64, Vec<String>> = HashMap::new();
        for row in self.repo.active_units(executor).await? {
            active
                .entry(row.tenant_id)
                .or_default()
                .push(row.unit_number.unwrap_or_default());
        }

        Ok(tenants
            .into_iter()
            .map(|tenant| {
                let active_units = active.remove(&tenant.id).unwrap_or_default();
                TenantSummary {
                    active_leases_count: active_units.len() as i64,
                    active_units,
                    tenant,
                }
            })
            .collect())
    }

    pub async fn get<'e, E>(&self, executor: E, id: i64) -> Result<TenantDetail, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Copy,
    {
        let tenant = self.find(executor, id).await?;
        let leases = self.repo.lease_history(executor, id).await?;
        Ok(TenantDetail { tenant, leases })
    }

    pub async fn create<'e, E>(&self, executor: E, payload: CreateTenantPayload) -> Result<Tenant, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let name = required_text("name", payload.name.as_deref())?;
        let contact_person = blank_to_none(payload.contact_person);
        let phone = blank_to_none(payload.phone);
        let email = blank_to_none(payload.email);
        let tax_id = blank_to_none(payload.tax_id);

        let fields = TenantFields {
            name: &name,
            contact_person: contact_person.as_deref(),
            phone: phone.as_deref(),
            email: email.as_deref(),
            tax_id: tax_id.as_deref(),
        };
        self.repo.create(executor, fields).await
    }

    /// Atualiza o inquilino e o nome desnormalizado nas unidades que ele ocupa.
    pub async fn update<'e, A>(&self, conn: A, id: i64, payload: UpdateTenantPayload) -> Result<Tenant, AppError>
    where
        A: Acquire<'e, Database = Sqlite>,
    {
        let mut tx = conn.begin().await?;

        let current = self.find(&mut *tx, id).await?;
        let name = match payload.name.as_deref() {
            Some(name) => required_text("name", Some(name))?,
            None => current.name.clone(),
        };
        let contact_person = merge_text(current.contact_person, payload.contact_person);
        let phone = merge_text(current.phone, payload.phone);
        let email = merge_text(current.email, payload.email);
        let tax_id = merge_text(current.tax_id, payload.tax_id);

        let fields = TenantFields {
            name: &name,
            contact_person: contact_person.as_deref(),
            phone: phone.as_deref(),
            email: email.as_deref(),
            tax_id: tax_id.as_deref(),
        };
        let tenant = self.repo
            .update(&mut *tx, id, fields)
            .await?
            .ok_or(AppError::NotFound(Resource::Tenant))?;

        if tenant.name != current.name {
            self.unit_repo.rename_current_tenant(&mut *tx, id, &tenant.name).await?;
        }

        tx.commit().await?;
        Ok(tenant)
    }

    pub async fn delete<'e, A>(&self, conn: A, id: i64) -> Result<(), AppError>
    where
        A: Acquire<'e, Database = Sqlite>,
    {
        let mut tx = conn.begin().await?;

        self.find(&mut *tx, id).await?;
        if self.repo.count_active_leases(&mut *tx, id).await? > 0 {
            return Err(AppError::TenantHasActiveLeases);
        }
        self.repo.delete(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn find<'e, E>(&self, executor: E, id: i64) -> Result<Tenant, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.repo
            .find_by_id(executor, id)
            .await?
            .ok_or(AppError::NotFound(Resource::Tenant))
    }
}
