//! Lenient numeric coercion.
//!
//! Amounts and quantities reach the ledger as free text (form input, old
//! snapshots, hand-edited JSON). Anything that does not read as a number
//! counts as zero; coercion never fails.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Text to amount. Blank, textual or otherwise non-numeric input is zero.
pub fn amount(text: &str) -> Decimal {
    let t = text.trim();
    if t.is_empty() {
        return Decimal::ZERO;
    }
    t.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(t))
        .unwrap_or(Decimal::ZERO)
}

/// Text to stock quantity: non-negative whole units, fractions truncated.
pub fn quantity(text: &str) -> u32 {
    let a = amount(text);
    if a.is_sign_negative() {
        return 0;
    }
    a.trunc().to_u32().unwrap_or(0)
}

fn value_text(v: &Value) -> Option<String> {
    match v {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Strings pass through, numbers and booleans print as text, null and
/// anything structured become empty.
pub(crate) fn lenient_text<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    Ok(match v {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Like [`lenient_text`], with blank text as `None`.
pub(crate) fn lenient_note<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = lenient_text(d)?;
    Ok(if text.trim().is_empty() { None } else { Some(text) })
}

pub(crate) fn lenient_amount<'de, D>(d: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    Ok(value_text(&v).map(|s| amount(&s)).unwrap_or(Decimal::ZERO))
}

pub(crate) fn lenient_quantity<'de, D>(d: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    Ok(value_text(&v).map(|s| quantity(&s)).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_text_parses() {
        assert_eq!(amount("1000"), Decimal::new(1000, 0));
        assert_eq!(amount(" 45.50 "), Decimal::new(4550, 2));
        assert_eq!(amount("1e3"), Decimal::new(1000, 0));
    }

    #[test]
    fn junk_is_zero() {
        assert_eq!(amount(""), Decimal::ZERO);
        assert_eq!(amount("abc"), Decimal::ZERO);
        assert_eq!(amount("12abc"), Decimal::ZERO);
    }

    #[test]
    fn quantity_clamps() {
        assert_eq!(quantity("3"), 3);
        assert_eq!(quantity("3.9"), 3);
        assert_eq!(quantity("-2"), 0);
        assert_eq!(quantity("lots"), 0);
    }
}
