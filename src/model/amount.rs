//! Amount type for handling monetary values as they appear in statements.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles parsing values that
//! may or may not include a rupee sign and comma thousands separators.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents how amounts were (or should be) formatted.
///
/// # Examples
///  - `AmountFormat{ rupee: true, commas: true }` -> `-₹60,000.00`
///  - `AmountFormat{ rupee: false, commas: true }` -> `-60,000.00`
///  - `AmountFormat{ rupee: false, commas: false }` -> `-60000.00`
///  - `AmountFormat{ rupee: true, commas: false }` -> `-₹60000.00`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AmountFormat {
    /// Whether a rupee sign is present in the formatting.
    rupee: bool,
    /// Whether commas are present as thousands separators in the formatting.
    commas: bool,
}

impl Default for AmountFormat {
    fn default() -> Self {
        DEFAULT_FORMAT
    }
}

/// The default format is the plain one, as values usually arrive from exported statements:
/// e.g. `-60000.00`.
const DEFAULT_FORMAT: AmountFormat = AmountFormat {
    rupee: false,
    commas: false,
};

/// Represents a monetary amount from an invoice or a bank statement line.
///
/// This type wraps `Decimal` and provides custom serialization/deserialization to handle amounts
/// that may be formatted with or without a rupee sign or commas. An amount is re-rendered the way
/// it was parsed, so values copied from an input table survive a round trip unchanged.
///
/// Formatting is considered significant for the purposes of equality, so for numeric comparisons,
/// you should access the `Decimal` value and use that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    /// The parsed numerical value.
    value: Decimal,
    /// The way the numerical value was parsed from, or should be written to, a `String`.
    format: AmountFormat,
}

impl Amount {
    /// Creates a new Amount from a Decimal value with default `String` formatting.
    pub const fn new(value: Decimal) -> Self {
        Self {
            value,
            format: DEFAULT_FORMAT,
        }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value().is_zero()
    }

    /// Returns true if the amount is positive. Positive invoice amounts are what make an invoice
    /// "open" for payment application.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.value().is_sign_positive()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.value().is_sign_negative()
    }
}

/// An error that can occur when parsing strings into `Decimal` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rupee_sign = false;

        let trimmed = s.trim();

        // An empty cell is a zero amount
        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        // Remove the rupee sign if present, remembering where it was relative to a minus
        let without_rupee = if let Some(after_minus) = trimmed.strip_prefix('-') {
            // Negative number: could be "-₹50.00" or "-50.00"
            if let Some(after_rupee) = after_minus.strip_prefix('₹') {
                rupee_sign = true;
                format!("-{after_rupee}")
            } else {
                trimmed.to_string()
            }
        } else if let Some(after_rupee) = trimmed.strip_prefix('₹') {
            // Positive number with rupee sign: "₹50.00"
            rupee_sign = true;
            after_rupee.to_string()
        } else {
            trimmed.to_string()
        };

        // Remove commas (thousand separators)
        let without_commas = without_rupee.replace(',', "");
        let commas = without_commas.len() < without_rupee.len();

        let value = Decimal::from_str(&without_commas).map_err(AmountError)?;
        Ok(Amount {
            value,
            format: AmountFormat {
                rupee: rupee_sign,
                commas,
            },
        })
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sign, num) = if self.is_negative() {
            (String::from("-"), self.value().abs())
        } else {
            (String::new(), self.value())
        };

        let rupee = if self.format.rupee {
            String::from("₹")
        } else {
            String::new()
        };

        if self.format.commas {
            write!(
                f,
                "{sign}{rupee}{}",
                format_num::format_num!(",.2", num.to_f64().unwrap_or_default())
            )
        } else {
            write!(f, "{sign}{rupee}{num}")
        }
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Serialize as a string in the parsed formatting
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_rupee_sign() {
        let amount = Amount::from_str("₹50.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("50.00").unwrap());
    }

    #[test]
    fn test_parse_without_rupee_sign() {
        let amount = Amount::from_str("50.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("50.00").unwrap());
    }

    #[test]
    fn test_parse_negative_with_rupee_sign() {
        let amount = Amount::from_str("-₹50.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("-50.00").unwrap());
    }

    #[test]
    fn test_parse_empty_string() {
        let amount = Amount::from_str("").unwrap();
        assert_eq!(amount.value(), Decimal::ZERO);
    }

    #[test]
    fn test_parse_whitespace() {
        let amount = Amount::from_str("  ₹50.00  ").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("50.00").unwrap());
    }

    #[test]
    fn test_parse_malformed() {
        assert!(Amount::from_str("fifty").is_err());
    }

    #[test]
    fn test_display_plain() {
        let amount = Amount::from_str("100").unwrap();
        assert_eq!(amount.to_string(), "100");
    }

    #[test]
    fn test_display_retains_rupee_sign() {
        let amount = Amount::from_str("-₹50.00").unwrap();
        assert_eq!(amount.to_string(), "-₹50.00");
    }

    #[test]
    fn test_display_retains_commas() {
        let s = "1,000,000.00";
        let amount = Amount::from_str(s).unwrap();
        assert_eq!(amount.to_string(), s);
    }

    #[test]
    fn test_display_no_commas_retains_rupee_sign() {
        let s = "-₹1000000.00";
        let amount = Amount::from_str(s).unwrap();
        assert_eq!(amount.to_string(), s);
    }

    #[test]
    fn test_parse_with_commas() {
        let amount = Amount::from_str("₹1,234,567.89").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("1234567.89").unwrap());
    }

    #[test]
    fn test_serialize() {
        let amount = Amount::from_str("₹50.00").unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"₹50.00\"");
    }

    #[test]
    fn test_deserialize() {
        let amount: Amount = serde_json::from_str("\"-₹50.00\"").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("-50.00").unwrap());
    }

    #[test]
    fn test_equality() {
        let a1 = Amount::from_str("₹50.00").unwrap();
        let a2 = Amount::from_str("50.00").unwrap();
        assert_ne!(a1, a2);
        assert_eq!(a1.value(), a2.value());
    }

    #[test]
    fn test_zero_is_not_positive_or_negative() {
        let zero = Amount::from_str("0.00").unwrap();
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());
        assert!(zero.is_zero());
    }

    #[test]
    fn test_is_positive() {
        let positive = Amount::from_str("₹50.00").unwrap();
        assert!(positive.is_positive());

        let negative = Amount::from_str("-₹50.00").unwrap();
        assert!(!negative.is_positive());
    }
}
