// src/services/unit_service.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Sqlite};

use crate::{
    common::{
        error::{field_error, required_text, AppError, Resource},
        numeric::Numeric,
        patch::{blank_to_none, merge_text},
    },
    db::{unit_repo::NewUnit, PaymentRepository, PropertyRepository, TenantPaymentRepository, UnitRepository},
    models::unit::{
        CreateUnitPayload, ProfitabilityFigures, Unit, UnitDetail, UnitListQuery, UnitProfitability,
        UpdateUnitPayload,
    },
};

/// Lucro e rentabilidade (% sobre o aluguel, 2 casas; 0 sem aluguel).
pub fn profitability(monthly_rent: Numeric, mandatory_payments: Numeric) -> ProfitabilityFigures {
    let net_profit = monthly_rent - mandatory_payments;
    let profitability = if monthly_rent.is_zero() {
        Numeric::ZERO
    } else {
        (net_profit / monthly_rent * Numeric::from(Decimal::ONE_HUNDRED)).round_dp(2)
    };

    ProfitabilityFigures { monthly_rent, mandatory_payments, net_profit, profitability }
}

/// Aluguel mensal = área × preço do m².
fn monthly_rent(area: Numeric, price_per_sqm: Numeric) -> Result<Numeric, AppError> {
    area.checked_mul(price_per_sqm).ok_or_else(|| field_error("area", "out_of_range"))
}

fn non_negative(field: &'static str, value: Numeric) -> Result<Numeric, AppError> {
    if value.is_negative() {
        return Err(field_error(field, "non_negative"));
    }
    Ok(value)
}

#[derive(Clone)]
pub struct UnitService {
    repo: UnitRepository,
    property_repo: PropertyRepository,
    payment_repo: PaymentRepository,
    tenant_payment_repo: TenantPaymentRepository,
}

impl UnitService {
    pub fn new(
        repo: UnitRepository,
        property_repo: PropertyRepository,
        payment_repo: PaymentRepository,
        tenant_payment_repo: TenantPaymentRepository,
    ) -> Self {
        Self { repo, property_repo, payment_repo, tenant_payment_repo }
    }

    pub async fn list<'e, E>(&self, executor: E, query: UnitListQuery) -> Result<Vec<UnitDetail>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.repo.list(executor, query.property_id).await
    }

    pub async fn get<'e, E>(&self, executor: E, id: i64) -> Result<UnitDetail, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.repo
            .find_detail(executor, id)
            .await?
            .ok_or(AppError::NotFound(Resource::Unit))
    }

    pub async fn create<'e, E>(&self, executor: E, payload: CreateUnitPayload) -> Result<Unit, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Copy,
    {
        let unit_number = required_text("unit_number", payload.unit_number.as_deref())?;
        let property_id = payload.property_id.ok_or_else(|| field_error("property_id", "required"))?;
        let area = non_negative("area", payload.area.ok_or_else(|| field_error("area", "required"))?)?;
        let price_per_sqm = non_negative(
            "price_per_sqm",
            payload.price_per_sqm.ok_or_else(|| field_error("price_per_sqm", "required"))?,
        )?;

        self.property_repo
            .find_by_id(executor, property_id)
            .await?
            .ok_or(AppError::NotFound(Resource::Property))?;

        let category = blank_to_none(payload.category);
        let new = NewUnit {
            property_id,
            unit_number: &unit_number,
            area,
            price_per_sqm,
            monthly_rent: monthly_rent(area, price_per_sqm)?,
            status: payload.status.unwrap_or_default(),
            category: category.as_deref(),
        };

        self.repo.create(executor, new).await
    }

    pub async fn update<'e, E>(&self, executor: E, id: i64, payload: UpdateUnitPayload) -> Result<Unit, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Copy,
    {
        let mut unit = self.repo
            .find_by_id(executor, id)
            .await?
            .ok_or(AppError::NotFound(Resource::Unit))?;

        if let Some(property_id) = payload.property_id {
            self.property_repo
                .find_by_id(executor, property_id)
                .await?
                .ok_or(AppError::NotFound(Resource::Property))?;
            unit.property_id = property_id;
        }
        if let Some(unit_number) = payload.unit_number.as_deref() {
            unit.unit_number = required_text("unit_number", Some(unit_number))?;
        }
        if let Some(area) = payload.area {
            unit.area = non_negative("area", area)?;
        }
        if let Some(price) = payload.price_per_sqm {
            unit.price_per_sqm = non_negative("price_per_sqm", price)?;
        }
        if let Some(status) = payload.status {
            unit.status = status;
        }
        unit.category = merge_text(unit.category, payload.category);

        // Recalculado a partir dos valores novos ou atuais
        unit.monthly_rent = monthly_rent(unit.area, unit.price_per_sqm)?;

        self.repo
            .update(executor, &unit)
            .await?
            .ok_or(AppError::NotFound(Resource::Unit))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if !self.repo.delete(executor, id).await? {
            return Err(AppError::NotFound(Resource::Unit));
        }
        Ok(())
    }

    pub async fn profitability<'e, E>(
        &self,
        executor: E,
        id: i64,
        period: Option<(i32, i32)>,
    ) -> Result<UnitProfitability, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Copy,
    {
        let unit = self.repo
            .find_by_id(executor, id)
            .await?
            .ok_or(AppError::NotFound(Resource::Unit))?;

        let monthly_costs: Numeric = self.payment_repo
            .monthly_costs_for_unit(executor, id)
            .await?
            .iter()
            .map(|p| p.amount)
            .sum();
        let planned = profitability(unit.monthly_rent, monthly_costs);

        let actual = match period {
            Some((month, year)) => {
                let income: Numeric = self.tenant_payment_repo
                    .paid_for_unit(executor, id, month, year)
                    .await?
                    .iter()
                    .filter_map(|p| p.actual_amount)
                    .sum();
                let costs: Numeric = self.payment_repo
                    .paid_actuals_for_unit(executor, id, month, year)
                    .await?
                    .iter()
                    .filter_map(|p| p.actual_amount)
                    .sum();
                Some(profitability(income, costs))
            }
            None => None,
        };

        Ok(UnitProfitability { unit_id: unit.id, unit_number: unit.unit_number, planned, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn profitability_is_a_rounded_percentage() {
        let figures = profitability(Numeric::from(3000), Numeric::from(1000));
        assert_eq!(figures.net_profit, Numeric::from(2000));
        assert_eq!(figures.profitability, Numeric::from_str("66.67").unwrap());
    }

    #[test]
    fn zero_rent_has_zero_profitability() {
        let figures = profitability(Numeric::ZERO, Numeric::from(500));
        assert_eq!(figures.net_profit, Numeric::from(-500));
        assert!(figures.profitability.is_zero());
    }

    #[test]
    fn overflowing_rent_is_a_validation_error() {
        let huge = Numeric::from_str("1e20").unwrap();
        assert!(matches!(monthly_rent(huge, huge), Err(AppError::ValidationError(_))));
        assert_eq!(monthly_rent(Numeric::from(20), Numeric::from(50)).unwrap(), Numeric::from(1000));
    }

    #[test]
    fn negative_values_are_rejected() {
        assert!(non_negative("area", Numeric::from(-1)).is_err());
        assert!(non_negative("area", Numeric::ZERO).is_ok());
    }
}
