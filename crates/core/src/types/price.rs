//! Type-safe price representation using decimal arithmetic.
//!
//! The Storefront API returns money as `{ amount: "19.9", currencyCode: "USD" }`
//! with the amount as a decimal string. [`Price`] parses that pair and formats
//! it for display with the currency's symbol and minor-unit precision.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is not a decimal number.
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),
    /// The currency code is not a three-letter ISO 4217 code.
    #[error("invalid currency code: {0:?}")]
    InvalidCurrency(String),
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Parse an amount string and currency code as returned by the API.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not a decimal or the currency code is
    /// not a three-letter code.
    pub fn parse(amount: &str, currency_code: &str) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(amount.trim())
            .map_err(|_| PriceError::InvalidAmount(amount.to_string()))?;
        let currency_code = currency_code.parse()?;
        Ok(Self::new(amount, currency_code))
    }

    /// Whether the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Format for display (e.g., `"$19.99"`, `"€5.00"`, `"¥1,200"`).
    ///
    /// Amounts are rounded half-even to the currency's minor units and
    /// grouped in thousands. Currencies without a known symbol render with
    /// their code as a suffix (`"12.00 CHF"`).
    #[must_use]
    pub fn display(&self) -> String {
        let places = self.currency_code.minor_units();
        let rounded = self
            .amount
            .round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let abs = rounded.abs();

        let text = format!("{abs:.prec$}", prec = places as usize);
        let (whole, fraction) = text.split_once('.').map_or((text.as_str(), None), |(w, f)| (w, Some(f)));
        let mut number = group_thousands(whole);
        if let Some(fraction) = fraction {
            number.push('.');
            number.push_str(fraction);
        }

        let sign = if negative { "-" } else { "" };
        match self.currency_code.symbol() {
            Some(symbol) => format!("{sign}{symbol}{number}"),
            None => format!("{sign}{number} {}", self.currency_code),
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// ISO 4217 currency code.
///
/// Common storefront currencies get a symbol; any other valid three-letter
/// code is carried through as [`CurrencyCode::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum CurrencyCode {
    #[default]
    USD,
    CAD,
    AUD,
    EUR,
    GBP,
    JPY,
    /// Any other ISO 4217 code, stored as three ASCII uppercase bytes.
    Other([u8; 3]),
}

impl CurrencyCode {
    /// Display symbol, if the currency has a conventional one.
    #[must_use]
    pub const fn symbol(self) -> Option<&'static str> {
        match self {
            Self::USD | Self::CAD | Self::AUD => Some("$"),
            Self::EUR => Some("€"),
            Self::GBP => Some("£"),
            Self::JPY => Some("¥"),
            Self::Other(_) => None,
        }
    }

    /// Number of minor-unit digits shown for this currency.
    #[must_use]
    pub const fn minor_units(self) -> u32 {
        match self {
            Self::JPY => 0,
            _ => 2,
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::USD => f.write_str("USD"),
            Self::CAD => f.write_str("CAD"),
            Self::AUD => f.write_str("AUD"),
            Self::EUR => f.write_str("EUR"),
            Self::GBP => f.write_str("GBP"),
            Self::JPY => f.write_str("JPY"),
            Self::Other(bytes) => f.write_str(std::str::from_utf8(bytes).unwrap_or("XXX")),
        }
    }
}

impl FromStr for CurrencyCode {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Ok(match upper.as_str() {
            "USD" => Self::USD,
            "CAD" => Self::CAD,
            "AUD" => Self::AUD,
            "EUR" => Self::EUR,
            "GBP" => Self::GBP,
            "JPY" => Self::JPY,
            other => match <[u8; 3]>::try_from(other.as_bytes()) {
                Ok(bytes) if bytes.iter().all(u8::is_ascii_uppercase) => Self::Other(bytes),
                _ => return Err(PriceError::InvalidCurrency(s.to_string())),
            },
        })
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = PriceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_usd() {
        let price = Price::parse("19.9", "USD").unwrap();
        assert_eq!(price.display(), "$19.90");
    }

    #[test]
    fn test_display_groups_thousands() {
        let price = Price::parse("1234567.5", "CAD").unwrap();
        assert_eq!(price.display(), "$1,234,567.50");
        let price = Price::parse("999", "EUR").unwrap();
        assert_eq!(price.display(), "€999.00");
    }

    #[test]
    fn test_display_zero_decimal_currency() {
        let price = Price::parse("1200.0", "JPY").unwrap();
        assert_eq!(price.display(), "¥1,200");
    }

    #[test]
    fn test_display_rounds_half_even() {
        assert_eq!(Price::parse("2.345", "GBP").unwrap().display(), "£2.34");
        assert_eq!(Price::parse("2.355", "GBP").unwrap().display(), "£2.36");
    }

    #[test]
    fn test_display_unknown_currency_uses_code() {
        let price = Price::parse("12", "chf").unwrap();
        assert_eq!(price.display(), "12.00 CHF");
    }

    #[test]
    fn test_display_negative() {
        let price = Price::parse("-5", "USD").unwrap();
        assert_eq!(price.display(), "-$5.00");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            Price::parse("abc", "USD"),
            Err(PriceError::InvalidAmount(_))
        ));
        assert!(matches!(
            Price::parse("1.00", "DOLLARS"),
            Err(PriceError::InvalidCurrency(_))
        ));
        assert!(matches!(
            Price::parse("1.00", "U1D"),
            Err(PriceError::InvalidCurrency(_))
        ));
    }

    #[test]
    fn test_is_zero() {
        assert!(Price::parse("0.0", "USD").unwrap().is_zero());
        assert!(!Price::parse("0.01", "USD").unwrap().is_zero());
    }

    #[test]
    fn test_currency_code_serde() {
        let json = serde_json::to_string(&CurrencyCode::EUR).unwrap();
        assert_eq!(json, "\"EUR\"");
        let code: CurrencyCode = serde_json::from_str("\"SEK\"").unwrap();
        assert_eq!(code.to_string(), "SEK");
    }
}
