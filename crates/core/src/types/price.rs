//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when parsing a [`CurrencyCode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyCodeError {
    /// The input is not three uppercase ASCII letters.
    #[error("currency code must be three uppercase letters (got {0:?})")]
    Invalid(String),
}

/// ISO 4217 currency code (e.g., "USD", "EUR").
///
/// Shopify supports far more currencies than a closed enum would cover, so
/// the code is kept as a validated string. The default is `USD`, which is
/// what an empty cart displays.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse a currency code.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyCodeError::Invalid`] unless the input is exactly
    /// three uppercase ASCII letters.
    pub fn parse(code: &str) -> Result<Self, CurrencyCodeError> {
        if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) {
            Ok(Self(code.to_owned()))
        } else {
            Err(CurrencyCodeError::Invalid(code.to_owned()))
        }
    }

    /// US dollars.
    #[must_use]
    pub fn usd() -> Self {
        Self("USD".to_owned())
    }

    /// Get the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::usd()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = CurrencyCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = CurrencyCodeError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Self::parse(&code)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

/// A monetary amount with currency information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Format for display with two decimal places (e.g., "19.99 USD").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{:.2} {}", self.amount, self.currency_code)
    }
}
