// src/services/transaction_service.rs

use chrono::{NaiveDate, Utc};
use sqlx::{Executor, Sqlite};

use crate::{
    common::{
        error::{field_error, AppError, Resource},
        patch::{blank_to_none, merge_nullable, merge_text},
    },
    db::TransactionRepository,
    models::transaction::{
        CalendarEntry, CalendarQuery, CalendarType, CreateTransactionPayload, PaymentCalendar, PaymentStatus,
        Transaction, TransactionFilter, TransactionListQuery, TransactionSummary, TransactionType,
        UpdateTransactionPayload,
    },
};

/// Monta o calendário: planejadas na `date`, adiadas na `scheduled_pay_date` (ou `date`).
///
/// Uma transação planejada e adiada aparece nas duas formas.
pub fn build_calendar(
    transactions: Vec<TransactionSummary>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> PaymentCalendar {
    let in_range = |d: NaiveDate| start.is_none_or(|s| d >= s) && end.is_none_or(|e| d <= e);

    let mut entries: Vec<(NaiveDate, CalendarType, TransactionSummary)> = Vec::new();
    for tr in transactions.iter().filter(|t| t.transaction.is_planned) {
        let calendar_type = match tr.transaction.kind {
            TransactionType::Income => CalendarType::PlannedIncome,
            TransactionType::Expense => CalendarType::PlannedExpense,
        };
        entries.push((tr.transaction.date, calendar_type, tr.clone()));
    }
    for tr in transactions.into_iter().filter(|t| t.transaction.status == PaymentStatus::Deferred) {
        let date = tr.transaction.scheduled_pay_date.unwrap_or(tr.transaction.date);
        entries.push((date, CalendarType::Deferred, tr));
    }

    let mut calendar = PaymentCalendar::default();
    for (display_date, calendar_type, transaction) in entries {
        if !in_range(display_date) {
            continue;
        }
        calendar
            .by_date
            .entry(display_date.format("%Y-%m-%d").to_string())
            .or_default()
            .push(CalendarEntry { transaction, calendar_type, display_date });
    }
    // BTreeMap já ordena as chaves ISO
    calendar.dates = calendar.by_date.keys().cloned().collect();
    calendar
}

/// Aplica a regra de status: `scheduled_pay_date` só existe em transações adiadas.
fn apply_status(status: PaymentStatus, scheduled: Option<NaiveDate>) -> Result<Option<NaiveDate>, AppError> {
    match status {
        PaymentStatus::Deferred => match scheduled {
            Some(date) => Ok(Some(date)),
            None => Err(AppError::BadRequest("deferred_requires_date")),
        },
        _ => Ok(None),
    }
}

#[derive(Clone)]
pub struct TransactionService {
    repo: TransactionRepository,
}

impl TransactionService {
    pub fn new(repo: TransactionRepository) -> Self {
        Self { repo }
    }

    pub async fn list<'e, E>(&self, executor: E, query: TransactionListQuery) -> Result<Vec<TransactionSummary>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.repo.list(executor, &TransactionFilter::from(query)).await
    }

    pub async fn list_planned<'e, E>(&self, executor: E, is_planned: bool) -> Result<Vec<TransactionSummary>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let filter = TransactionFilter { is_planned: Some(is_planned), ..Default::default() };
        self.repo.list(executor, &filter).await
    }

    pub async fn calendar<'e, E>(&self, executor: E, query: CalendarQuery) -> Result<PaymentCalendar, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        // O intervalo vale para a data exibida, então é aplicado depois
        let filter = TransactionFilter { planned_or_deferred: true, ..Default::default() };
        let transactions = self.repo.list(executor, &filter).await?;
        Ok(build_calendar(transactions, query.start_date, query.end_date))
    }

    pub async fn get<'e, E>(&self, executor: E, id: i64) -> Result<Transaction, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.repo
            .find_by_id(executor, id)
            .await?
            .ok_or(AppError::NotFound(Resource::Transaction))
    }

    pub async fn create<'e, E>(&self, executor: E, payload: CreateTransactionPayload) -> Result<Transaction, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let kind = payload.kind.ok_or_else(|| field_error("type", "required"))?;
        let amount = payload.amount.ok_or_else(|| field_error("amount", "required"))?;
        let date = payload.date.ok_or_else(|| field_error("date", "required"))?;

        let status = PaymentStatus::normalize(payload.status.as_deref());
        let scheduled_pay_date = apply_status(status, payload.scheduled_pay_date)?;

        let now = Utc::now();
        let draft = Transaction {
            id: 0,
            unit_id: payload.unit_id,
            property_id: payload.property_id,
            lease_id: payload.lease_id,
            kind,
            category: blank_to_none(payload.category),
            category_detail: blank_to_none(payload.category_detail),
            amount,
            date,
            description: blank_to_none(payload.description),
            is_planned: payload.is_planned.unwrap_or(false),
            is_tenant_payment: payload.is_tenant_payment.unwrap_or(false),
            related_payment_id: payload.related_payment_id,
            payer: blank_to_none(payload.payer),
            status,
            scheduled_pay_date,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(executor, &draft).await
    }

    pub async fn update<'e, E>(&self, executor: E, id: i64, payload: UpdateTransactionPayload) -> Result<Transaction, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Copy,
    {
        let mut tr = self.get(executor, id).await?;

        tr.unit_id = merge_nullable(tr.unit_id, payload.unit_id);
        tr.property_id = merge_nullable(tr.property_id, payload.property_id);
        tr.lease_id = merge_nullable(tr.lease_id, payload.lease_id);
        if let Some(kind) = payload.kind {
            tr.kind = kind;
        }
        tr.category = merge_text(tr.category, payload.category);
        tr.category_detail = merge_text(tr.category_detail, payload.category_detail);
        if let Some(amount) = payload.amount {
            tr.amount = amount;
        }
        if let Some(date) = payload.date {
            tr.date = date;
        }
        tr.description = merge_text(tr.description, payload.description);
        if let Some(is_planned) = payload.is_planned {
            tr.is_planned = is_planned;
        }
        if let Some(is_tenant_payment) = payload.is_tenant_payment {
            tr.is_tenant_payment = is_tenant_payment;
        }
        tr.related_payment_id = merge_nullable(tr.related_payment_id, payload.related_payment_id);
        tr.payer = merge_text(tr.payer, payload.payer);

        if payload.status.is_some() {
            tr.status = PaymentStatus::normalize(payload.status.as_deref());
        }
        let scheduled = merge_nullable(tr.scheduled_pay_date, payload.scheduled_pay_date);
        tr.scheduled_pay_date = apply_status(tr.status, scheduled)?;

        self.repo
            .update(executor, &tr)
            .await?
            .ok_or(AppError::NotFound(Resource::Transaction))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if !self.repo.delete(executor, id).await? {
            return Err(AppError::NotFound(Resource::Transaction));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::numeric::Numeric;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn summary(id: i64, kind: TransactionType, on: &str, planned: bool, status: PaymentStatus, scheduled: Option<&str>) -> TransactionSummary {
        let now = Utc::now();
        TransactionSummary {
            transaction: Transaction {
                id,
                unit_id: None,
                property_id: None,
                lease_id: None,
                kind,
                category: None,
                category_detail: None,
                amount: Numeric::from(100),
                date: date(on),
                description: None,
                is_planned: planned,
                is_tenant_payment: false,
                related_payment_id: None,
                payer: None,
                status,
                scheduled_pay_date: scheduled.map(date),
                created_at: now,
                updated_at: now,
            },
            unit_number: None,
            property_name: None,
        }
    }

    #[test]
    fn calendar_places_entries_and_sorts_dates() {
        let calendar = build_calendar(
            vec![
                summary(1, TransactionType::Income, "2025-03-10", true, PaymentStatus::Paid, None),
                summary(2, TransactionType::Expense, "2025-03-01", false, PaymentStatus::Deferred, Some("2025-03-20")),
                summary(3, TransactionType::Expense, "2025-03-05", true, PaymentStatus::Invoiced, None),
                summary(4, TransactionType::Expense, "2025-02-27", false, PaymentStatus::Deferred, None),
            ],
            None,
            None,
        );

        assert_eq!(calendar.dates, vec!["2025-02-27", "2025-03-05", "2025-03-10", "2025-03-20"]);
        assert_eq!(calendar.by_date["2025-03-10"][0].calendar_type, CalendarType::PlannedIncome);
        assert_eq!(calendar.by_date["2025-03-05"][0].calendar_type, CalendarType::PlannedExpense);
        assert_eq!(calendar.by_date["2025-03-20"][0].calendar_type, CalendarType::Deferred);
        // Sem data agendada, a adiada cai na própria data
        assert_eq!(calendar.by_date["2025-02-27"][0].transaction.transaction.id, 4);
    }

    #[test]
    fn calendar_range_applies_to_display_date() {
        let calendar = build_calendar(
            vec![
                summary(1, TransactionType::Expense, "2025-01-15", false, PaymentStatus::Deferred, Some("2025-03-02")),
                summary(2, TransactionType::Income, "2025-04-01", true, PaymentStatus::Paid, None),
            ],
            Some(date("2025-03-01")),
            Some(date("2025-03-31")),
        );
        assert_eq!(calendar.dates, vec!["2025-03-02"]);
    }

    #[test]
    fn planned_and_deferred_appears_twice() {
        let calendar = build_calendar(
            vec![summary(1, TransactionType::Expense, "2025-05-01", true, PaymentStatus::Deferred, Some("2025-05-09"))],
            None,
            None,
        );
        assert_eq!(calendar.dates.len(), 2);
    }

    #[test]
    fn status_rules_for_scheduled_date() {
        assert!(matches!(
            apply_status(PaymentStatus::Deferred, None),
            Err(AppError::BadRequest("deferred_requires_date"))
        ));
        assert_eq!(apply_status(PaymentStatus::Paid, Some(date("2025-01-01"))).unwrap(), None);
        assert_eq!(
            apply_status(PaymentStatus::Deferred, Some(date("2025-01-01"))).unwrap(),
            Some(date("2025-01-01"))
        );
    }
}
