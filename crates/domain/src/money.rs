//! Currency-safe monetary amounts.
//!
//! `Money` pairs a non-negative decimal amount with a 3-letter currency
//! code. Every operation is pure and returns a new instance; arithmetic
//! across currencies fails instead of silently mixing units.

use std::cmp::Ordering;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by [`Currency`] and [`Money`] construction and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// Amount is negative or otherwise not representable.
    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: Decimal },

    /// Currency code is not three ASCII letters.
    #[error("Invalid currency code: {code:?}")]
    InvalidCurrency { code: String },

    /// Two amounts with different currencies were combined.
    #[error("Currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: Currency, right: Currency },

    /// Subtraction would produce a negative amount.
    #[error("Subtracting {subtrahend} from {minuend} would go negative")]
    NegativeResult { minuend: Decimal, subtrahend: Decimal },

    /// Division by a zero factor.
    #[error("Division by zero")]
    DivideByZero,
}

/// ISO 4217-style currency code: exactly three ASCII letters, stored
/// uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency([u8; 3]);

impl Currency {
    /// Parses a currency code, normalizing to uppercase.
    pub fn new(code: &str) -> Result<Self, MoneyError> {
        let bytes = code.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(|b| b.is_ascii_alphabetic()) {
            return Err(MoneyError::InvalidCurrency {
                code: code.to_string(),
            });
        }
        let mut upper = [0u8; 3];
        for (i, b) in bytes.iter().enumerate() {
            upper[i] = b.to_ascii_uppercase();
        }
        Ok(Self(upper))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        // Invariant: constructed from ASCII letters only.
        std::str::from_utf8(&self.0).expect("currency code is ASCII")
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for Currency {
    type Error = MoneyError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Currency::new(&code)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.as_str().to_string()
    }
}

/// An immutable monetary amount in a single currency.
///
/// Amounts are non-negative and held at exactly two decimal places,
/// rounded half-away-from-zero at every construction and re-rounded after
/// multiplication and division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a monetary amount, validating sign and rounding to 2 dp.
    pub fn new(amount: Decimal, currency: Currency) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::InvalidAmount { amount });
        }
        Ok(Self {
            amount: Self::round(amount),
            currency,
        })
    }

    /// Returns a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Self::round(Decimal::ZERO),
            currency,
        }
    }

    /// Returns the amount, always at 2 decimal places.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Adds another amount of the same currency.
    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.require_same_currency(other)?;
        Ok(Self {
            amount: Self::round(self.amount + other.amount),
            currency: self.currency,
        })
    }

    /// Subtracts another amount of the same currency.
    ///
    /// Fails with [`MoneyError::NegativeResult`] if the subtrahend exceeds
    /// the minuend; use [`Money::saturating_subtract`] where a floor at
    /// zero is the documented behavior.
    pub fn subtract(&self, other: &Money) -> Result<Money, MoneyError> {
        self.require_same_currency(other)?;
        if other.amount > self.amount {
            return Err(MoneyError::NegativeResult {
                minuend: self.amount,
                subtrahend: other.amount,
            });
        }
        Ok(Self {
            amount: Self::round(self.amount - other.amount),
            currency: self.currency,
        })
    }

    /// Subtracts another amount of the same currency, flooring at zero.
    pub fn saturating_subtract(&self, other: &Money) -> Result<Money, MoneyError> {
        self.require_same_currency(other)?;
        let result = (self.amount - other.amount).max(Decimal::ZERO);
        Ok(Self {
            amount: Self::round(result),
            currency: self.currency,
        })
    }

    /// Multiplies by a non-negative factor, re-rounding the result.
    pub fn multiply(&self, factor: Decimal) -> Result<Money, MoneyError> {
        if factor.is_sign_negative() && !factor.is_zero() {
            return Err(MoneyError::InvalidAmount { amount: factor });
        }
        Ok(Self {
            amount: Self::round(self.amount * factor),
            currency: self.currency,
        })
    }

    /// Divides by a positive factor, re-rounding the result.
    pub fn divide(&self, factor: Decimal) -> Result<Money, MoneyError> {
        if factor.is_zero() {
            return Err(MoneyError::DivideByZero);
        }
        if factor.is_sign_negative() {
            return Err(MoneyError::InvalidAmount { amount: factor });
        }
        Ok(Self {
            amount: Self::round(self.amount / factor),
            currency: self.currency,
        })
    }

    /// Compares two amounts of the same currency.
    pub fn try_cmp(&self, other: &Money) -> Result<Ordering, MoneyError> {
        self.require_same_currency(other)?;
        Ok(self.amount.cmp(&other.amount))
    }

    /// Returns true if this amount is strictly greater than `other`.
    pub fn is_greater_than(&self, other: &Money) -> Result<bool, MoneyError> {
        Ok(self.try_cmp(other)? == Ordering::Greater)
    }

    /// Returns true if this amount is strictly less than `other`.
    pub fn is_less_than(&self, other: &Money) -> Result<bool, MoneyError> {
        Ok(self.try_cmp(other)? == Ordering::Less)
    }

    fn require_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch {
                left: self.currency,
                right: other.currency,
            });
        }
        Ok(())
    }

    fn round(amount: Decimal) -> Decimal {
        let mut rounded =
            amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);
        rounded
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usd() -> Currency {
        Currency::new("USD").unwrap()
    }

    fn eur() -> Currency {
        Currency::new("EUR").unwrap()
    }

    #[test]
    fn test_currency_normalizes_to_uppercase() {
        assert_eq!(Currency::new("usd").unwrap().as_str(), "USD");
    }

    #[test]
    fn test_currency_rejects_bad_codes() {
        for code in ["US", "USDX", "U$D", "", "12A"] {
            assert!(matches!(
                Currency::new(code),
                Err(MoneyError::InvalidCurrency { .. })
            ));
        }
    }

    #[test]
    fn test_new_rejects_negative_amounts() {
        let result = Money::new(dec!(-0.01), usd());
        assert!(matches!(result, Err(MoneyError::InvalidAmount { .. })));
    }

    #[test]
    fn test_new_rounds_half_away_from_zero() {
        assert_eq!(Money::new(dec!(1.005), usd()).unwrap().amount(), dec!(1.01));
        assert_eq!(Money::new(dec!(1.004), usd()).unwrap().amount(), dec!(1.00));
        assert_eq!(Money::new(dec!(2.675), usd()).unwrap().amount(), dec!(2.68));
    }

    #[test]
    fn test_amount_always_two_decimal_places() {
        let money = Money::new(dec!(10), usd()).unwrap();
        assert_eq!(money.amount().scale(), 2);
        assert_eq!(money.to_string(), "10.00 USD");
    }

    #[test]
    fn test_add_and_subtract_round_trip() {
        let a = Money::new(dec!(19.99), usd()).unwrap();
        let b = Money::new(dec!(4.37), usd()).unwrap();
        assert_eq!(a.add(&b).unwrap().subtract(&b).unwrap(), a);
    }

    #[test]
    fn test_add_rejects_currency_mismatch() {
        let a = Money::new(dec!(1.00), usd()).unwrap();
        let b = Money::new(dec!(1.00), eur()).unwrap();
        assert!(matches!(
            a.add(&b),
            Err(MoneyError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_subtract_rejects_negative_result() {
        let a = Money::new(dec!(1.00), usd()).unwrap();
        let b = Money::new(dec!(2.00), usd()).unwrap();
        assert!(matches!(
            a.subtract(&b),
            Err(MoneyError::NegativeResult { .. })
        ));
    }

    #[test]
    fn test_saturating_subtract_floors_at_zero() {
        let a = Money::new(dec!(1.00), usd()).unwrap();
        let b = Money::new(dec!(2.00), usd()).unwrap();
        assert!(a.saturating_subtract(&b).unwrap().is_zero());
    }

    #[test]
    fn test_multiply_rounds_result() {
        let price = Money::new(dec!(0.33), usd()).unwrap();
        assert_eq!(price.multiply(dec!(3)).unwrap().amount(), dec!(0.99));

        let odd = Money::new(dec!(1.11), usd()).unwrap();
        // 1.11 * 1.5 = 1.665 -> 1.67 half-away-from-zero
        assert_eq!(odd.multiply(dec!(1.5)).unwrap().amount(), dec!(1.67));
    }

    #[test]
    fn test_multiply_rejects_negative_factor() {
        let price = Money::new(dec!(1.00), usd()).unwrap();
        assert!(matches!(
            price.multiply(dec!(-1)),
            Err(MoneyError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_divide_by_zero_fails() {
        let price = Money::new(dec!(1.00), usd()).unwrap();
        assert!(matches!(
            price.divide(Decimal::ZERO),
            Err(MoneyError::DivideByZero)
        ));
    }

    #[test]
    fn test_divide_rounds_result() {
        let price = Money::new(dec!(10.00), usd()).unwrap();
        assert_eq!(price.divide(dec!(3)).unwrap().amount(), dec!(3.33));
    }

    #[test]
    fn test_comparison_requires_same_currency() {
        let a = Money::new(dec!(2.00), usd()).unwrap();
        let b = Money::new(dec!(1.00), usd()).unwrap();
        let c = Money::new(dec!(1.00), eur()).unwrap();

        assert!(a.is_greater_than(&b).unwrap());
        assert!(b.is_less_than(&a).unwrap());
        assert!(matches!(
            a.try_cmp(&c),
            Err(MoneyError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let money = Money::new(dec!(12.34), usd()).unwrap();
        let json = serde_json::to_string(&money).unwrap();
        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(money, deserialized);
    }

    #[test]
    fn test_currency_serializes_as_string() {
        let json = serde_json::to_string(&usd()).unwrap();
        assert_eq!(json, "\"USD\"");
        let parsed: Currency = serde_json::from_str("\"eur\"").unwrap();
        assert_eq!(parsed, eur());
    }
}
