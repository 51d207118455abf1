//! Amount coercion.
//!
//! Partners encode amounts either as JSON numbers or as decimal strings. Both
//! are coerced into [`BigDecimal`] so downstream consumers never see floats.

use crate::error::ModelError;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::Number;
use std::str::FromStr;

/// Parses a decimal string such as `"0.0153"` or `"1e-3"`.
pub fn parse_decimal(s: &str) -> Result<BigDecimal, ModelError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ModelError::InvalidAmount(s.to_string()));
    }
    BigDecimal::from_str(trimmed).map_err(|_| ModelError::InvalidAmount(s.to_string()))
}

/// Converts a JSON number without going through `f64`.
pub fn decimal_from_number(n: &Number) -> Result<BigDecimal, ModelError> {
    parse_decimal(&n.to_string())
}

/// `deserialize_with` helper for amounts sent as decimal strings.
pub fn de_decimal_str<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_decimal(&raw).map_err(D::Error::custom)
}

/// `deserialize_with` helper for amounts sent as JSON numbers.
pub fn de_decimal_number<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Number::deserialize(deserializer)?;
    decimal_from_number(&raw).map_err(D::Error::custom)
}
