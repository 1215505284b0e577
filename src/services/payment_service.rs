// src/services/payment_service.rs

use chrono::Utc;
use sqlx::{Acquire, Executor, Sqlite};

use crate::{
    common::{
        error::{field_error, required_text, AppError, Resource},
        patch::merge_nullable,
    },
    db::{
        payment_repo::{ActualPaymentFilter, NewActualPayment, PlanFields},
        PaymentRepository,
    },
    models::payment::{
        ActualMandatoryPayment, ActualPaymentListQuery, ActualPaymentStatus, CreateMandatoryPaymentPayload,
        MandatoryPayment, MandatoryPaymentListQuery, MandatoryPaymentSummary, MarkPaidPayload,
        UpdateActualPaymentPayload, UpdateMandatoryPaymentPayload, UpsertActualPaymentPayload,
    },
};

/// Resultado de um upsert: `created` distingue 201 de 200.
#[derive(Debug)]
pub struct Upserted<T> {
    pub record: T,
    pub created: bool,
}

#[derive(Clone)]
pub struct PaymentService {
    repo: PaymentRepository,
}

impl PaymentService {
    pub fn new(repo: PaymentRepository) -> Self {
        Self { repo }
    }

    // =========================================================================
    //  PLANOS
    // =========================================================================

    pub async fn list_plans<'e, E>(
        &self,
        executor: E,
        query: MandatoryPaymentListQuery,
    ) -> Result<Vec<MandatoryPaymentSummary>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.repo.list_plans(executor, query.unit_id, query.property_id).await
    }

    pub async fn get_plan<'e, E>(&self, executor: E, id: i64) -> Result<MandatoryPayment, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.repo
            .find_plan(executor, id)
            .await?
            .ok_or(AppError::NotFound(Resource::MandatoryPayment))
    }

    pub async fn create_plan<'e, E>(
        &self,
        executor: E,
        payload: CreateMandatoryPaymentPayload,
    ) -> Result<MandatoryPayment, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if payload.unit_id.is_none() && payload.property_id.is_none() {
            return Err(AppError::BadRequest("payment_target_required"));
        }
        let payment_type = required_text("payment_type", payload.payment_type.as_deref())?;

        let fields = PlanFields {
            unit_id: payload.unit_id,
            property_id: payload.property_id,
            payment_type: &payment_type,
            amount: payload.amount.ok_or_else(|| field_error("amount", "required"))?,
            frequency: payload.frequency.unwrap_or_default(),
            start_date: payload.start_date.ok_or_else(|| field_error("start_date", "required"))?,
            end_date: payload.end_date,
            is_cost: payload.is_cost.unwrap_or(true),
        };
        self.repo.create_plan(executor, fields).await
    }

    pub async fn update_plan<'e, E>(
        &self,
        executor: E,
        id: i64,
        payload: UpdateMandatoryPaymentPayload,
    ) -> Result<MandatoryPayment, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Copy,
    {
        let current = self.get_plan(executor, id).await?;

        let unit_id = merge_nullable(current.unit_id, payload.unit_id);
        let property_id = merge_nullable(current.property_id, payload.property_id);
        if unit_id.is_none() && property_id.is_none() {
            return Err(AppError::BadRequest("payment_target_required"));
        }
        let payment_type = match payload.payment_type.as_deref() {
            Some(value) => required_text("payment_type", Some(value))?,
            None => current.payment_type,
        };

        let fields = PlanFields {
            unit_id,
            property_id,
            payment_type: &payment_type,
            amount: payload.amount.unwrap_or(current.amount),
            frequency: payload.frequency.unwrap_or(current.frequency),
            start_date: payload.start_date.unwrap_or(current.start_date),
            end_date: merge_nullable(current.end_date, payload.end_date),
            is_cost: payload.is_cost.unwrap_or(current.is_cost),
        };
        self.repo
            .update_plan(executor, id, fields)
            .await?
            .ok_or(AppError::NotFound(Resource::MandatoryPayment))
    }

    pub async fn delete_plan<'e, E>(&self, executor: E, id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if !self.repo.delete_plan(executor, id).await? {
            return Err(AppError::NotFound(Resource::MandatoryPayment));
        }
        Ok(())
    }

    /// Instâncias mensais de um plano.
    pub async fn list_plan_actuals<'e, E>(&self, executor: E, id: i64) -> Result<Vec<ActualMandatoryPayment>, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Copy,
    {
        self.get_plan(executor, id).await?;
        let filter = ActualPaymentFilter { mandatory_payment_id: Some(id), ..Default::default() };
        self.repo.list_actual(executor, &filter).await
    }

    // =========================================================================
    //  PAGAMENTOS EFETIVOS
    // =========================================================================

    pub async fn list_actual<'e, E>(
        &self,
        executor: E,
        query: ActualPaymentListQuery,
    ) -> Result<Vec<ActualMandatoryPayment>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        // Mês e ano só filtram juntos
        let period = match (query.month, query.year) {
            (Some(month), Some(year)) => Some((month, year)),
            _ => None,
        };
        let filter = ActualPaymentFilter {
            period,
            unit_id: query.unit_id,
            property_id: query.property_id,
            mandatory_payment_id: None,
        };
        self.repo.list_actual(executor, &filter).await
    }

    /// Cria a instância do mês ou atualiza a existente para (plano, mês, ano).
    pub async fn upsert_actual<'e, A>(
        &self,
        conn: A,
        payload: UpsertActualPaymentPayload,
    ) -> Result<Upserted<ActualMandatoryPayment>, AppError>
    where
        A: Acquire<'e, Database = Sqlite>,
    {
        let plan_id = payload.mandatory_payment_id.ok_or_else(|| field_error("mandatory_payment_id", "required"))?;
        let month = payload.month.ok_or_else(|| field_error("month", "required"))?;
        let year = payload.year.ok_or_else(|| field_error("year", "required"))?;

        let mut tx = conn.begin().await?;

        let plan = self.repo
            .find_plan(&mut *tx, plan_id)
            .await?
            .ok_or(AppError::NotFound(Resource::MandatoryPayment))?;

        let upserted = match self.repo.find_actual_for_period(&mut *tx, plan_id, month, year).await? {
            Some(mut existing) => {
                if payload.actual_amount.is_some() {
                    existing.actual_amount = payload.actual_amount;
                }
                if payload.payment_date.is_some() {
                    existing.payment_date = payload.payment_date;
                }
                if let Some(is_paid) = payload.is_paid {
                    existing.is_paid = is_paid;
                    existing.status = ActualPaymentStatus::from_paid(is_paid);
                }
                let record = self.repo
                    .update_actual(&mut *tx, &existing)
                    .await?
                    .ok_or(AppError::NotFound(Resource::ActualMandatoryPayment))?;
                Upserted { record, created: false }
            }
            None => {
                let payment_type = payload
                    .payment_type
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .unwrap_or(&plan.payment_type)
                    .to_string();
                let new = NewActualPayment {
                    mandatory_payment_id: plan.id,
                    unit_id: payload.unit_id.or(plan.unit_id),
                    property_id: payload.property_id.or(plan.property_id),
                    payment_type: &payment_type,
                    planned_amount: payload.planned_amount.unwrap_or(plan.amount),
                    actual_amount: payload.actual_amount,
                    payment_date: payload.payment_date,
                    month,
                    year,
                    is_paid: payload.is_paid.unwrap_or(false),
                };
                let record = self.repo.create_actual(&mut *tx, new).await?;
                Upserted { record, created: true }
            }
        };

        tx.commit().await?;
        Ok(upserted)
    }

    pub async fn update_actual<'e, E>(
        &self,
        executor: E,
        id: i64,
        payload: UpdateActualPaymentPayload,
    ) -> Result<ActualMandatoryPayment, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Copy,
    {
        let mut payment = self.find_actual(executor, id).await?;

        payment.actual_amount = merge_nullable(payment.actual_amount, payload.actual_amount);
        payment.payment_date = merge_nullable(payment.payment_date, payload.payment_date);
        if let Some(is_paid) = payload.is_paid {
            payment.is_paid = is_paid;
            payment.status = ActualPaymentStatus::from_paid(is_paid);
        }

        self.repo
            .update_actual(executor, &payment)
            .await?
            .ok_or(AppError::NotFound(Resource::ActualMandatoryPayment))
    }

    pub async fn mark_actual_paid<'e, E>(
        &self,
        executor: E,
        id: i64,
        payload: MarkPaidPayload,
    ) -> Result<ActualMandatoryPayment, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Copy,
    {
        let mut payment = self.find_actual(executor, id).await?;

        payment.is_paid = true;
        payment.status = ActualPaymentStatus::Paid;
        if payload.actual_amount.is_some() {
            payment.actual_amount = payload.actual_amount;
        }
        payment.payment_date = Some(payload.payment_date.unwrap_or_else(|| Utc::now().date_naive()));

        self.repo
            .update_actual(executor, &payment)
            .await?
            .ok_or(AppError::NotFound(Resource::ActualMandatoryPayment))
    }

    async fn find_actual<'e, E>(&self, executor: E, id: i64) -> Result<ActualMandatoryPayment, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.repo
            .find_actual(executor, id)
            .await?
            .ok_or(AppError::NotFound(Resource::ActualMandatoryPayment))
    }
}
