//! Money and currency value objects.

use outcome::Outcome;
use serde::{Deserialize, Serialize};

use crate::fault::Fault;

/// The whitelist of supported currencies.
///
/// A closed enum rather than a free-form code: an amount in an unsupported
/// currency is unrepresentable, and matches stay exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Jpy,
    Chf,
    Cad,
    Aud,
}

impl Currency {
    /// Parses a currency code, normalizing case.
    ///
    /// Codes outside the whitelist are rejected.
    pub fn parse(code: &str) -> Result<Self, Fault> {
        match code.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            "JPY" => Ok(Currency::Jpy),
            "CHF" => Ok(Currency::Chf),
            "CAD" => Ok(Currency::Cad),
            "AUD" => Ok(Currency::Aud),
            _ => Err(Fault::UnknownCurrency {
                code: code.to_string(),
            }),
        }
    }

    /// Safe form of [`Currency::parse`].
    pub fn try_parse(code: &str) -> Outcome<Self> {
        Outcome::from_result(Self::parse(code))
    }

    /// Returns the ISO-style uppercase code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Chf => "CHF",
            Currency::Cad => "CAD",
            Currency::Aud => "AUD",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A non-negative amount of money in a whitelisted currency.
///
/// Amounts are stored in cents to avoid floating point issues. Arithmetic
/// returns new instances and rejects mixed currencies rather than coercing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    cents: i64,
    currency: Currency,
}

impl Money {
    /// Creates a money amount, rejecting negative values.
    pub fn new(cents: i64, currency: Currency) -> Result<Self, Fault> {
        if cents < 0 {
            return Err(Fault::NegativeAmount { amount: cents });
        }
        Ok(Self { cents, currency })
    }

    /// Safe form of [`Money::new`].
    pub fn try_new(cents: i64, currency: Currency) -> Outcome<Self> {
        Outcome::from_result(Self::new(cents, currency))
    }

    /// Creates a money amount from whole currency units (e.g. dollars).
    pub fn from_major_units(units: i64, currency: Currency) -> Result<Self, Fault> {
        Self::new(units * 100, currency)
    }

    /// Returns zero in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self { cents: 0, currency }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns the currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    fn require_same_currency(&self, other: &Money) -> Result<(), Fault> {
        if self.currency != other.currency {
            return Err(Fault::CurrencyMismatch {
                left: self.currency,
                right: other.currency,
            });
        }
        Ok(())
    }

    /// Adds another amount, rejecting mixed currencies.
    pub fn add(&self, other: Money) -> Result<Money, Fault> {
        self.require_same_currency(&other)?;
        Ok(Money {
            cents: self.cents + other.cents,
            currency: self.currency,
        })
    }

    /// Safe form of [`Money::add`].
    pub fn try_add(&self, other: Money) -> Outcome<Money> {
        Outcome::from_result(self.add(other))
    }

    /// Subtracts another amount, rejecting mixed currencies and results
    /// below zero.
    pub fn subtract(&self, other: Money) -> Result<Money, Fault> {
        self.require_same_currency(&other)?;
        if other.cents > self.cents {
            return Err(Fault::InsufficientBalance {
                available: self.cents,
                requested: other.cents,
                currency: self.currency,
            });
        }
        Ok(Money {
            cents: self.cents - other.cents,
            currency: self.currency,
        })
    }

    /// Safe form of [`Money::subtract`].
    pub fn try_subtract(&self, other: Money) -> Outcome<Money> {
        Outcome::from_result(self.subtract(other))
    }

    /// Multiplies by a quantity.
    pub fn multiply(&self, quantity: u32) -> Money {
        Money {
            cents: self.cents * quantity as i64,
            currency: self.currency,
        }
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{:02} {}",
            self.cents / 100,
            self.cents % 100,
            self.currency
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outcome::ErrorCategory;

    fn usd(cents: i64) -> Money {
        Money::new(cents, Currency::Usd).unwrap()
    }

    #[test]
    fn parse_normalizes_case() {
        assert_eq!(Currency::parse("usd").unwrap(), Currency::Usd);
        assert_eq!(Currency::parse(" EUR ").unwrap(), Currency::Eur);
    }

    #[test]
    fn parse_rejects_unknown_code() {
        let fault = Currency::parse("XXX").unwrap_err();
        assert!(matches!(fault, Fault::UnknownCurrency { .. }));

        let outcome = Currency::try_parse("XXX");
        assert_eq!(outcome.error().code(), fault.code());
        assert_eq!(outcome.error().category(), ErrorCategory::Validation);
    }

    #[test]
    fn negative_amount_rejected_by_both_forms() {
        let fault = Money::new(-5, Currency::Usd).unwrap_err();
        assert!(matches!(fault, Fault::NegativeAmount { amount: -5 }));

        let outcome = Money::try_new(-5, Currency::Usd);
        let error = outcome.error();
        assert_eq!(error.code(), fault.code());
        assert_eq!(error.category(), ErrorCategory::Validation);
        assert_eq!(error.field(), Some("amount"));
    }

    #[test]
    fn zero_amount_is_valid() {
        assert!(Money::new(0, Currency::Usd).is_ok());
        assert!(Money::zero(Currency::Eur).is_zero());
    }

    #[test]
    fn add_same_currency() {
        let sum = usd(1000).add(usd(500)).unwrap();
        assert_eq!(sum.cents(), 1500);
        assert_eq!(sum.currency(), Currency::Usd);
    }

    #[test]
    fn add_rejects_currency_mismatch_in_both_forms() {
        let eur = Money::new(500, Currency::Eur).unwrap();

        let fault = usd(1000).add(eur).unwrap_err();
        assert!(matches!(fault, Fault::CurrencyMismatch { .. }));

        let outcome = usd(1000).try_add(eur);
        assert_eq!(outcome.error().code(), "money.currency_mismatch");
    }

    #[test]
    fn subtract_rejects_negative_result_with_amounts() {
        let fault = usd(100).subtract(usd(250)).unwrap_err();
        assert_eq!(
            fault,
            Fault::InsufficientBalance {
                available: 100,
                requested: 250,
                currency: Currency::Usd,
            }
        );

        let outcome = usd(100).try_subtract(usd(250));
        let error = outcome.error();
        assert_eq!(error.code(), "money.insufficient_balance");
        assert_eq!(error.metadata()["available"], serde_json::json!(100));
        assert_eq!(error.metadata()["requested"], serde_json::json!(250));
    }

    #[test]
    fn subtract_to_exactly_zero_is_valid() {
        let result = usd(100).subtract(usd(100)).unwrap();
        assert!(result.is_zero());
    }

    #[test]
    fn subtract_rejects_currency_mismatch() {
        let eur = Money::new(50, Currency::Eur).unwrap();
        assert!(matches!(
            usd(100).subtract(eur),
            Err(Fault::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn arithmetic_returns_new_instances() {
        let original = usd(1000);
        let _ = original.add(usd(1)).unwrap();
        assert_eq!(original.cents(), 1000);
    }

    #[test]
    fn equality_is_amount_and_currency() {
        assert_eq!(usd(100), usd(100));
        assert_ne!(usd(100), usd(101));
        assert_ne!(usd(100), Money::new(100, Currency::Eur).unwrap());
    }

    #[test]
    fn multiply_scales_cents() {
        assert_eq!(usd(1050).multiply(3).cents(), 3150);
    }

    #[test]
    fn display_formats_units_and_currency() {
        assert_eq!(usd(1234).to_string(), "12.34 USD");
        assert_eq!(usd(5).to_string(), "0.05 USD");
    }

    #[test]
    fn from_major_units_scales_by_hundred() {
        assert_eq!(
            Money::from_major_units(10_000, Currency::Usd).unwrap().cents(),
            1_000_000
        );
    }

    #[test]
    fn serialization_roundtrip() {
        let money = usd(1234);
        let json = serde_json::to_string(&money).unwrap();
        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(money, deserialized);
    }
}
