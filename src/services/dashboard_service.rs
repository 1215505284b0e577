// src/services/dashboard_service.rs

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate, Utc};
use sqlx::{Executor, Sqlite};

use crate::{
    common::{error::AppError, numeric::Numeric},
    db::{LeaseRepository, PropertyRepository, TenantPaymentRepository, TransactionRepository, UnitRepository},
    models::{
        dashboard::{DashboardSummary, DebtReport, MonthlyChartEntry, OutstandingPaymentRow, TenantDebt, UnitForecast},
        property::Property,
        transaction::{Transaction, TransactionFilter, TransactionType},
        unit::{Unit, UnitStatus},
    },
};

pub const DEFAULT_CHART_MONTHS: u32 = 6;
pub const MAX_CHART_MONTHS: u32 = 24;
const EXPIRING_WINDOW_DAYS: i64 = 60;

// =========================================================================
//  FUNÇÕES PURAS (agregações)
// =========================================================================

/// Desloca (ano, mês) em `delta` meses.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + delta;
    (index.div_euclid(12), (index.rem_euclid(12) + 1) as u32)
}

fn first_day(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

/// Percentual de ocupação arredondado; 0 sem unidades.
pub fn occupancy_rate(total: i64, occupied: i64) -> i64 {
    if total == 0 {
        return 0;
    }
    (occupied as f64 / total as f64 * 100.0).round() as i64
}

/// Receita, despesa e lucro dos últimos `months` meses, do mais antigo ao atual.
pub fn monthly_buckets(transactions: &[Transaction], today: NaiveDate, months: u32) -> Vec<MonthlyChartEntry> {
    (0..months as i32)
        .rev()
        .map(|back| {
            let (year, month) = shift_month(today.year(), today.month(), -back);
            let in_month: Vec<&Transaction> = transactions
                .iter()
                .filter(|t| t.date.year() == year && t.date.month() == month)
                .collect();
            let income: Numeric = in_month
                .iter()
                .filter(|t| t.kind == TransactionType::Income)
                .map(|t| t.amount)
                .sum();
            let expense: Numeric = in_month
                .iter()
                .filter(|t| t.kind == TransactionType::Expense)
                .map(|t| t.amount)
                .sum();
            MonthlyChartEntry { month: format!("{year}-{month:02}"), income, expense, profit: income - expense }
        })
        .collect()
}

/// Previsão por unidade: aluguel planejado menos a despesa média mensal da janela.
pub fn unit_forecasts(units: &[Unit], properties: &[Property], transactions: &[Transaction], months: u32) -> Vec<UnitForecast> {
    let names: HashMap<i64, &str> = properties.iter().map(|p| (p.id, p.name.as_str())).collect();
    let months = Numeric::from(i64::from(months.max(1)));

    units
        .iter()
        .map(|unit| {
            let expenses: Numeric = transactions
                .iter()
                .filter(|t| t.unit_id == Some(unit.id) && t.kind == TransactionType::Expense)
                .map(|t| t.amount)
                .sum();
            let average_expense = (expenses / months).round_dp(2);
            UnitForecast {
                unit_id: unit.id,
                unit_number: unit.unit_number.clone(),
                property_name: names.get(&unit.property_id).map(|n| n.to_string()),
                planned_rent: unit.monthly_rent,
                average_expense,
                forecast_profit: unit.monthly_rent - average_expense,
            }
        })
        .collect()
}

/// Aging das dívidas: agrupa pagamentos em aberto por (inquilino, contrato).
pub fn compute_debts(rows: Vec<OutstandingPaymentRow>, today: NaiveDate, property_id: Option<i64>) -> DebtReport {
    let (this_year, this_month) = (today.year(), today.month() as i32);

    let mut order: Vec<(i64, i64)> = Vec::new();
    let mut groups: HashMap<(i64, i64), TenantDebt> = HashMap::new();

    for row in rows {
        let payment = &row.payment;
        if !(1..=12).contains(&payment.month) {
            continue;
        }
        let (Some(tenant_name), Some(lease_id), Some(unit_number)) = (row.tenant_name, row.lease_ref, row.unit_number) else {
            continue;
        };
        if property_id.is_some() && row.property_id != property_id {
            continue;
        }

        let owed = payment.planned_amount - payment.actual_amount.unwrap_or(Numeric::ZERO);
        if owed.is_negative() || owed.is_zero() {
            continue;
        }

        let is_past = (payment.year, payment.month) < (this_year, this_month);
        let overdue = if is_past { (this_year - payment.year) * 12 + (this_month - payment.month) } else { 0 };

        let key = (payment.tenant_id, lease_id);
        let month_start = NaiveDate::from_ymd_opt(payment.year, payment.month as u32, 1);
        let debt = groups.entry(key).or_insert_with(|| {
            order.push(key);
            TenantDebt {
                tenant_id: payment.tenant_id,
                tenant_name,
                lease_id,
                unit_id: payment.unit_id,
                unit_number: Some(unit_number),
                property_name: row.property_name,
                total_debt: Numeric::ZERO,
                overdue_months: 0,
                // Mês do primeiro pagamento do grupo; o mais atrasado prevalece
                oldest_debt_date: month_start,
                payment_count: 0,
            }
        });

        debt.total_debt += owed;
        debt.payment_count += 1;
        if overdue > debt.overdue_months {
            debt.overdue_months = overdue;
            debt.oldest_debt_date = month_start;
        }
    }

    let mut debts: Vec<TenantDebt> = order.into_iter().filter_map(|key| groups.remove(&key)).collect();
    debts.sort_by(|a, b| b.total_debt.cmp(&a.total_debt));
    let total_debt = debts.iter().map(|d| d.total_debt).sum();

    DebtReport { debts, total_debt }
}

// =========================================================================
//  SERVIÇO
// =========================================================================

#[derive(Clone)]
pub struct DashboardService {
    property_repo: PropertyRepository,
    unit_repo: UnitRepository,
    lease_repo: LeaseRepository,
    tenant_payment_repo: TenantPaymentRepository,
    transaction_repo: TransactionRepository,
}

impl DashboardService {
    pub fn new(
        property_repo: PropertyRepository,
        unit_repo: UnitRepository,
        lease_repo: LeaseRepository,
        tenant_payment_repo: TenantPaymentRepository,
        transaction_repo: TransactionRepository,
    ) -> Self {
        Self { property_repo, unit_repo, lease_repo, tenant_payment_repo, transaction_repo }
    }

    pub async fn summary<'e, E>(&self, executor: E, month: Option<u32>, year: Option<i32>) -> Result<DashboardSummary, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Copy,
    {
        let today = Utc::now().date_naive();
        let units = self.unit_repo.list_plain(executor).await?;

        let total_units = units.len() as i64;
        let rented: Vec<&Unit> = units.iter().filter(|u| u.status == UnitStatus::Rented).collect();
        let occupied_units = rented.len() as i64;
        let planned_revenue: Numeric = rented.iter().map(|u| u.monthly_rent).sum();
        let average_price_per_sqm = if units.is_empty() {
            Numeric::ZERO
        } else {
            let total: Numeric = units.iter().map(|u| u.price_per_sqm).sum();
            (total / Numeric::from(total_units)).round_dp(2)
        };

        // Receita realizada do mês pedido (padrão: mês atual)
        let month = month.filter(|m| (1..=12).contains(m)).unwrap_or(today.month());
        let year = year.unwrap_or(today.year());
        let actual_revenue: Numeric = self.tenant_payment_repo
            .paid_for_period(executor, month as i32, year)
            .await?
            .iter()
            .filter_map(|p| p.actual_amount)
            .sum();

        // Transações planejadas do mês corrente
        let (next_year, next_month) = shift_month(today.year(), today.month(), 1);
        let filter = TransactionFilter {
            is_planned: Some(true),
            start_date: Some(first_day(today.year(), today.month())),
            end_date: first_day(next_year, next_month).pred_opt(),
            ..Default::default()
        };
        let planned = self.transaction_repo.list(executor, &filter).await?;
        let planned_payments_total = planned.iter().map(|t| t.transaction.amount).sum();

        let expiring_leases = self.lease_repo
            .list_expiring(executor, today, today + Duration::days(EXPIRING_WINDOW_DAYS))
            .await?;

        Ok(DashboardSummary {
            total_units,
            occupied_units,
            occupancy_rate: occupancy_rate(total_units, occupied_units),
            planned_revenue,
            actual_revenue,
            average_price_per_sqm,
            planned_payments_count: planned.len() as i64,
            planned_payments_total,
            expiring_leases,
        })
    }

    pub async fn monthly_chart<'e, E>(&self, executor: E, months: u32) -> Result<Vec<MonthlyChartEntry>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let today = Utc::now().date_naive();
        let transactions = self.transaction_repo.list_since(executor, window_start(today, months)).await?;
        Ok(monthly_buckets(&transactions, today, months))
    }

    pub async fn unit_forecasts<'e, E>(&self, executor: E, months: u32) -> Result<Vec<UnitForecast>, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Copy,
    {
        let today = Utc::now().date_naive();
        let units = self.unit_repo.list_plain(executor).await?;
        let properties = self.property_repo.list(executor).await?;
        let transactions = self.transaction_repo.list_since(executor, window_start(today, months)).await?;
        Ok(unit_forecasts(&units, &properties, &transactions, months))
    }

    pub async fn debts<'e, E>(&self, executor: E, property_id: Option<i64>) -> Result<DebtReport, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = self.tenant_payment_repo.list_outstanding(executor).await?;
        Ok(compute_debts(rows, Utc::now().date_naive(), property_id))
    }
}

/// Primeiro dia do mês mais antigo da janela de `months` meses.
fn window_start(today: NaiveDate, months: u32) -> NaiveDate {
    let (year, month) = shift_month(today.year(), today.month(), 1 - months.max(1) as i32);
    first_day(year, month)
}

/// Limita a quantidade de meses a 1..=24.
pub fn clamp_months(months: Option<u32>) -> u32 {
    months.unwrap_or(DEFAULT_CHART_MONTHS).clamp(1, MAX_CHART_MONTHS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{tenant_payment::TenantPayment, tenant_payment::TenantPaymentStatus};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn transaction(kind: TransactionType, on: &str, amount: i64, unit_id: Option<i64>) -> Transaction {
        let now = Utc::now();
        Transaction {
            id: 0,
            unit_id,
            property_id: None,
            lease_id: None,
            kind,
            category: None,
            category_detail: None,
            amount: Numeric::from(amount),
            date: date(on),
            description: None,
            is_planned: false,
            is_tenant_payment: false,
            related_payment_id: None,
            payer: None,
            status: crate::models::transaction::PaymentStatus::Paid,
            scheduled_pay_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn outstanding(tenant_id: i64, lease_id: i64, month: i32, year: i32, planned: i64, actual: Option<i64>) -> OutstandingPaymentRow {
        let now = Utc::now();
        OutstandingPaymentRow {
            payment: TenantPayment {
                id: 0,
                lease_id,
                unit_id: 10,
                tenant_id,
                planned_amount: Numeric::from(planned),
                actual_amount: actual.map(Numeric::from),
                payment_date: None,
                month,
                year,
                status: TenantPaymentStatus::Expected,
                is_paid: false,
                payment_method: None,
                description: None,
                created_at: now,
                updated_at: now,
            },
            tenant_name: Some(format!("Tenant {tenant_id}")),
            lease_ref: Some(lease_id),
            unit_number: Some("101".into()),
            property_id: Some(1),
            property_name: Some("BC".into()),
        }
    }

    #[test]
    fn shift_month_crosses_years() {
        assert_eq!(shift_month(2025, 1, -1), (2024, 12));
        assert_eq!(shift_month(2025, 12, 1), (2026, 1));
        assert_eq!(shift_month(2025, 3, -14), (2024, 1));
    }

    #[test]
    fn occupancy_is_rounded() {
        assert_eq!(occupancy_rate(0, 0), 0);
        assert_eq!(occupancy_rate(3, 2), 67);
        assert_eq!(occupancy_rate(4, 4), 100);
    }

    #[test]
    fn chart_lists_oldest_month_first() {
        let txs = vec![
            transaction(TransactionType::Income, "2025-03-05", 1000, None),
            transaction(TransactionType::Expense, "2025-03-20", 300, None),
            transaction(TransactionType::Income, "2025-01-10", 500, None),
            transaction(TransactionType::Income, "2024-12-31", 999, None),
        ];
        let chart = monthly_buckets(&txs, date("2025-03-15"), 3);

        let months: Vec<&str> = chart.iter().map(|c| c.month.as_str()).collect();
        assert_eq!(months, vec!["2025-01", "2025-02", "2025-03"]);
        assert_eq!(chart[0].income, Numeric::from(500));
        assert!(chart[1].income.is_zero());
        assert_eq!(chart[2].profit, Numeric::from(700));
    }

    #[test]
    fn forecast_averages_expenses_over_the_window() {
        let now = Utc::now();
        let unit = Unit {
            id: 7,
            property_id: 1,
            unit_number: "7".into(),
            area: Numeric::from(10),
            price_per_sqm: Numeric::from(100),
            monthly_rent: Numeric::from(1000),
            status: UnitStatus::Rented,
            category: None,
            current_tenant_id: None,
            current_tenant_name: None,
            current_lease_id: None,
            created_at: now,
            updated_at: now,
        };
        let txs = vec![
            transaction(TransactionType::Expense, "2025-03-01", 300, Some(7)),
            transaction(TransactionType::Expense, "2025-02-01", 300, Some(7)),
            transaction(TransactionType::Income, "2025-02-01", 5000, Some(7)),
            transaction(TransactionType::Expense, "2025-02-01", 999, Some(8)),
        ];
        let forecasts = unit_forecasts(&[unit], &[], &txs, 6);
        assert_eq!(forecasts[0].average_expense, Numeric::from(100));
        assert_eq!(forecasts[0].forecast_profit, Numeric::from(900));
        assert_eq!(forecasts[0].property_name, None);
    }

    #[test]
    fn debts_sum_and_age_per_lease() {
        let rows = vec![
            outstanding(1, 100, 1, 2025, 1000, None),
            outstanding(1, 100, 2, 2025, 1000, Some(400)),
            outstanding(2, 200, 3, 2025, 300, None),
        ];
        let report = compute_debts(rows, date("2025-03-10"), None);

        assert_eq!(report.debts.len(), 2);
        let first = &report.debts[0];
        assert_eq!(first.tenant_id, 1);
        assert_eq!(first.total_debt, Numeric::from(1600));
        assert_eq!(first.overdue_months, 2);
        assert_eq!(first.oldest_debt_date, Some(date("2025-01-01")));
        assert_eq!(first.payment_count, 2);

        // Mês corrente não conta como atraso, mas a data da dívida é preenchida
        assert_eq!(report.debts[1].overdue_months, 0);
        assert_eq!(report.debts[1].oldest_debt_date, Some(date("2025-03-01")));
        assert_eq!(report.total_debt, Numeric::from(1900));
    }

    #[test]
    fn debts_skip_orphans_settled_and_other_properties() {
        let mut orphan = outstanding(3, 300, 1, 2025, 500, None);
        orphan.lease_ref = None;
        let mut elsewhere = outstanding(4, 400, 1, 2025, 500, None);
        elsewhere.property_id = Some(2);
        let rows = vec![
            orphan,
            elsewhere,
            outstanding(5, 500, 1, 2025, 500, Some(500)),
            outstanding(6, 600, 13, 2025, 500, None),
            outstanding(7, 700, 2, 2025, 250, None),
        ];
        let report = compute_debts(rows, date("2025-03-10"), Some(1));

        assert_eq!(report.debts.len(), 1);
        assert_eq!(report.debts[0].tenant_id, 7);
        assert_eq!(report.total_debt, Numeric::from(250));
    }

    #[test]
    fn months_are_clamped() {
        assert_eq!(clamp_months(None), 6);
        assert_eq!(clamp_months(Some(0)), 1);
        assert_eq!(clamp_months(Some(99)), 24);
    }
}
