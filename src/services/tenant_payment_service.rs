// src/services/tenant_payment_service.rs

use chrono::Utc;
use sqlx::{Acquire, Executor, Sqlite};

use crate::{
    common::{
        error::{field_error, AppError, Resource},
        patch::{blank_to_none, merge_nullable, merge_text},
    },
    db::{tenant_payment_repo::NewTenantPayment, LeaseRepository, TenantPaymentRepository},
    models::{
        payment::MarkPaidPayload,
        tenant_payment::{
            GenerateMonthlyResponse, TenantPayment, TenantPaymentListQuery, TenantPaymentStatus,
            TenantPaymentSummary, UpdateTenantPaymentPayload, UpsertTenantPaymentPayload,
        },
    },
    services::payment_service::Upserted,
};

#[derive(Clone)]
pub struct TenantPaymentService {
    repo: TenantPaymentRepository,
    lease_repo: LeaseRepository,
}

impl TenantPaymentService {
    pub fn new(repo: TenantPaymentRepository, lease_repo: LeaseRepository) -> Self {
        Self { repo, lease_repo }
    }

    pub async fn list<'e, E>(&self, executor: E, query: TenantPaymentListQuery) -> Result<Vec<TenantPaymentSummary>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.repo.list(executor, &query).await
    }

    /// Cria o pagamento do mês ou atualiza o existente para (contrato, mês, ano).
    pub async fn upsert<'e, A>(
        &self,
        conn: A,
        payload: UpsertTenantPaymentPayload,
    ) -> Result<Upserted<TenantPayment>, AppError>
    where
        A: Acquire<'e, Database = Sqlite>,
    {
        let lease_id = payload.lease_id.ok_or_else(|| field_error("lease_id", "required"))?;
        let unit_id = payload.unit_id.ok_or_else(|| field_error("unit_id", "required"))?;
        let tenant_id = payload.tenant_id.ok_or_else(|| field_error("tenant_id", "required"))?;
        let month = payload.month.ok_or_else(|| field_error("month", "required"))?;
        let year = payload.year.ok_or_else(|| field_error("year", "required"))?;

        let mut tx = conn.begin().await?;

        let upserted = match self.repo.find_for_period(&mut *tx, lease_id, month, year).await? {
            Some(mut existing) => {
                if payload.actual_amount.is_some() {
                    existing.actual_amount = payload.actual_amount;
                }
                if payload.payment_date.is_some() {
                    existing.payment_date = payload.payment_date;
                }
                if let Some(is_paid) = payload.is_paid {
                    existing.is_paid = is_paid;
                    existing.status = TenantPaymentStatus::from_paid(is_paid);
                }
                if let Some(method) = blank_to_none(payload.payment_method) {
                    existing.payment_method = Some(method);
                }
                if let Some(description) = blank_to_none(payload.description) {
                    existing.description = Some(description);
                }
                let record = self.repo
                    .update(&mut *tx, &existing)
                    .await?
                    .ok_or(AppError::NotFound(Resource::TenantPayment))?;
                Upserted { record, created: false }
            }
            None => {
                let lease = self.lease_repo
                    .find_by_id(&mut *tx, lease_id)
                    .await?
                    .ok_or(AppError::NotFound(Resource::Lease))?;
                let payment_method = blank_to_none(payload.payment_method);
                let description = blank_to_none(payload.description);

                let new = NewTenantPayment {
                    lease_id,
                    unit_id,
                    tenant_id,
                    planned_amount: payload.planned_amount.unwrap_or(lease.monthly_rent),
                    actual_amount: payload.actual_amount,
                    payment_date: payload.payment_date,
                    month,
                    year,
                    is_paid: payload.is_paid.unwrap_or(false),
                    payment_method: payment_method.as_deref(),
                    description: description.as_deref(),
                };
                let record = self.repo.create(&mut *tx, new).await?;
                Upserted { record, created: true }
            }
        };

        tx.commit().await?;
        Ok(upserted)
    }

    pub async fn update<'e, E>(&self, executor: E, id: i64, payload: UpdateTenantPaymentPayload) -> Result<TenantPayment, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Copy,
    {
        let mut payment = self.find(executor, id).await?;

        if let Some(planned) = payload.planned_amount {
            payment.planned_amount = planned;
        }
        payment.actual_amount = merge_nullable(payment.actual_amount, payload.actual_amount);
        payment.payment_date = merge_nullable(payment.payment_date, payload.payment_date);
        if let Some(is_paid) = payload.is_paid {
            payment.is_paid = is_paid;
            payment.status = TenantPaymentStatus::from_paid(is_paid);
        }
        // Status explícito prevalece sobre o derivado de is_paid
        if let Some(status) = payload.status {
            payment.status = status;
        }
        payment.payment_method = merge_text(payment.payment_method, payload.payment_method);
        payment.description = merge_text(payment.description, payload.description);

        self.repo
            .update(executor, &payment)
            .await?
            .ok_or(AppError::NotFound(Resource::TenantPayment))
    }

    pub async fn mark_paid<'e, E>(&self, executor: E, id: i64, payload: MarkPaidPayload) -> Result<TenantPayment, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Copy,
    {
        let mut payment = self.find(executor, id).await?;

        payment.is_paid = true;
        payment.status = TenantPaymentStatus::Received;
        if payload.actual_amount.is_some() {
            payment.actual_amount = payload.actual_amount;
        }
        payment.payment_date = Some(payload.payment_date.unwrap_or_else(|| Utc::now().date_naive()));
        if let Some(method) = blank_to_none(payload.payment_method) {
            payment.payment_method = Some(method);
        }
        if let Some(description) = blank_to_none(payload.description) {
            payment.description = Some(description);
        }

        self.repo
            .update(executor, &payment)
            .await?
            .ok_or(AppError::NotFound(Resource::TenantPayment))
    }

    /// Um pagamento esperado por contrato ativo que ainda não tem registro no mês.
    pub async fn generate_monthly<'e, A>(&self, conn: A, month: i32, year: i32) -> Result<GenerateMonthlyResponse, AppError>
    where
        A: Acquire<'e, Database = Sqlite>,
    {
        let mut tx = conn.begin().await?;

        let mut generated = Vec::new();
        for lease in self.lease_repo.list_active(&mut *tx).await? {
            if self.repo.find_for_period(&mut *tx, lease.id, month, year).await?.is_some() {
                continue;
            }
            let new = NewTenantPayment {
                lease_id: lease.id,
                unit_id: lease.unit_id,
                tenant_id: lease.tenant_id,
                planned_amount: lease.monthly_rent,
                actual_amount: None,
                payment_date: None,
                month,
                year,
                is_paid: false,
                payment_method: None,
                description: None,
            };
            generated.push(self.repo.create(&mut *tx, new).await?);
        }

        tx.commit().await?;

        tracing::info!("📅 {} pagamentos gerados para {:02}/{}", generated.len(), month, year);
        Ok(GenerateMonthlyResponse {
            message: format!("Generated {} planned payments for {}/{}", generated.len(), month, year),
            generated,
        })
    }

    async fn find<'e, E>(&self, executor: E, id: i64) -> Result<TenantPayment, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.repo
            .find_by_id(executor, id)
            .await?
            .ok_or(AppError::NotFound(Resource::TenantPayment))
    }
}
