// src/common/numeric.rs

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Sub};
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{Sqlite, SqliteTypeInfo, SqliteValueRef};
use sqlx::{Database, Decode, Encode, Type};
use utoipa::ToSchema;

/// Valor decimal exato (áreas, preços, valores em dinheiro).
///
/// No JSON trafega como número; no SQLite é gravado como TEXT para não perder
/// precisão.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = f64, example = 1250.5)]
pub struct Numeric(pub Decimal);

impl Numeric {
    pub const ZERO: Numeric = Numeric(Decimal::ZERO);

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Arredonda para `dp` casas decimais, meio para longe do zero.
    pub fn round_dp(self, dp: u32) -> Numeric {
        Numeric(self.0.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
    }

    pub fn inner(self) -> Decimal {
        self.0
    }

    /// Produto exato, ou `None` se estourar o intervalo do `Decimal`.
    pub fn checked_mul(self, rhs: Numeric) -> Option<Numeric> {
        self.0.checked_mul(rhs.0).map(Numeric)
    }
}

impl From<Decimal> for Numeric {
    fn from(value: Decimal) -> Self {
        Numeric(value)
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Numeric(Decimal::from(value))
    }
}

impl FromStr for Numeric {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map(|d| Numeric(d.normalize()))
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// Operadores saturam no limite do Decimal em vez de entrar em pânico
impl Add for Numeric {
    type Output = Numeric;
    fn add(self, rhs: Numeric) -> Numeric {
        Numeric(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Numeric {
    fn add_assign(&mut self, rhs: Numeric) {
        *self = *self + rhs;
    }
}

impl Sub for Numeric {
    type Output = Numeric;
    fn sub(self, rhs: Numeric) -> Numeric {
        Numeric(self.0.saturating_sub(rhs.0))
    }
}

impl Mul for Numeric {
    type Output = Numeric;
    fn mul(self, rhs: Numeric) -> Numeric {
        Numeric(self.0.saturating_mul(rhs.0))
    }
}

// Divisão por zero resulta em zero
impl Div for Numeric {
    type Output = Numeric;
    fn div(self, rhs: Numeric) -> Numeric {
        Numeric(self.0.checked_div(rhs.0).unwrap_or(Decimal::ZERO))
    }
}

impl Sum for Numeric {
    fn sum<I: Iterator<Item = Numeric>>(iter: I) -> Numeric {
        iter.fold(Numeric::ZERO, |acc, n| acc + n)
    }
}

impl<'a> Sum<&'a Numeric> for Numeric {
    fn sum<I: Iterator<Item = &'a Numeric>>(iter: I) -> Numeric {
        iter.fold(Numeric::ZERO, |acc, n| acc + *n)
    }
}

// ---
// Integração com o SQLite (TEXT <-> Decimal)
// ---

impl Type<Sqlite> for Numeric {
    fn type_info() -> SqliteTypeInfo {
        <&str as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <&str as Type<Sqlite>>::compatible(ty)
            || <f64 as Type<Sqlite>>::compatible(ty)
            || <i64 as Type<Sqlite>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Sqlite> for Numeric {
    fn encode_by_ref(
        &self,
        buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        <String as Encode<'q, Sqlite>>::encode(self.0.normalize().to_string(), buf)
    }
}

impl<'r> Decode<'r, Sqlite> for Numeric {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let text = <&str as Decode<Sqlite>>::decode(value)?;
        Ok(text.parse::<Numeric>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_multiplies_exactly() {
        let area: Numeric = "12.5".parse().unwrap();
        let price: Numeric = "100.10".parse().unwrap();
        assert_eq!((area * price).to_string(), "1251.25");
        assert_eq!((area * price).round_dp(1).to_string(), "1251.3");
    }

    #[test]
    fn division_by_zero_is_zero() {
        assert_eq!(Numeric::from(10) / Numeric::ZERO, Numeric::ZERO);
    }

    #[test]
    fn serializes_as_json_number() {
        let value: Numeric = "42.75".parse().unwrap();
        assert_eq!(serde_json::to_string(&value).unwrap(), "42.75");
        let back: Numeric = serde_json::from_str("42.75").unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn overflow_saturates_or_is_reported() {
        let huge: Numeric = "1e20".parse().unwrap();
        assert_eq!(huge.checked_mul(huge), None);
        assert_eq!(huge * huge, Numeric(Decimal::MAX));

        let total: Numeric = [Numeric(Decimal::MAX), Numeric(Decimal::MAX)].iter().sum();
        assert_eq!(total, Numeric(Decimal::MAX));
        assert_eq!(Numeric(Decimal::MIN) - Numeric::from(1), Numeric(Decimal::MIN));
    }

    #[test]
    fn negative_zero_is_not_negative() {
        assert!(!Numeric::ZERO.is_negative());
        assert!("-0.5".parse::<Numeric>().unwrap().is_negative());
    }
}
