//! Lenient decoding of monetary fields
//!
//! The API sends amounts as JSON numbers, but hand-edited or legacy rows can
//! carry numeric strings, `null`, or junk. Anything that is not a finite number
//! decodes to `None`; callers decide what "no value" means (usually zero).

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Interpret a JSON value as an amount
pub fn amount_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// `deserialize_with` helper for optional amounts
pub fn lenient<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(amount_from_value(&value))
}

/// `deserialize_with` helper for amounts that default to zero
pub fn lenient_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    lenient(deserializer).map(|v| v.unwrap_or(0.0))
}

/// Two-decimal currency display, e.g. `R$ 1234.50`
pub fn format_currency(value: f64) -> String {
    format!("R$ {:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_amount_from_value() {
        assert_eq!(amount_from_value(&json!(100)), Some(100.0));
        assert_eq!(amount_from_value(&json!(-30.5)), Some(-30.5));
        assert_eq!(amount_from_value(&json!(" 12.25 ")), Some(12.25));
        assert_eq!(amount_from_value(&json!("abc")), None);
        assert_eq!(amount_from_value(&json!(null)), None);
        assert_eq!(amount_from_value(&json!({"v": 1})), None);
        assert_eq!(amount_from_value(&json!("NaN")), None);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234.5), "R$ 1234.50");
        assert_eq!(format_currency(-30.0), "R$ -30.00");
        assert_eq!(format_currency(0.0), "R$ 0.00");
    }
}
