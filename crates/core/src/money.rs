//! Amount normalization at the API boundary.
//!
//! The payroll backend and the dashboard forms send amounts either as JSON
//! numbers or as numeric strings (`"1200.50"`). Everything is normalized here
//! into a single exact [`Amount`] and negative values are rejected before they
//! reach any calculation.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::CoreError;
use crate::types::Amount;

/// Number of decimal places kept for displayed and forwarded amounts.
pub const MONEY_SCALE: u32 = 2;

/// Largest accepted amount in either direction (one quadrillion).
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

fn max_amount() -> Decimal {
    Decimal::from(MAX_AMOUNT)
}

/// Parse a loosely typed JSON amount into a non-negative [`Amount`].
///
/// Accepts JSON numbers and trimmed numeric strings, including scientific
/// notation. `field` names the offending input in the error message.
pub fn parse_amount(value: &Value, field: &str) -> Result<Amount, CoreError> {
    let parsed = match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    };
    let amount =
        parsed.ok_or_else(|| CoreError::Validation(format!("{field} must be a number")))?;
    if amount > max_amount() {
        return Err(CoreError::Validation(format!(
            "{field} must not exceed {MAX_AMOUNT}"
        )));
    }
    ensure_non_negative(amount, field)
}

/// Reject negative amounts. Zero is allowed.
pub fn ensure_non_negative(amount: Amount, field: &str) -> Result<Amount, CoreError> {
    if amount < Decimal::ZERO {
        return Err(CoreError::Validation(format!(
            "{field} must not be negative, got {amount}"
        )));
    }
    Ok(amount)
}

/// Round to cents using banker's rounding.
pub fn round_money(amount: Amount) -> Amount {
    amount.round_dp(MONEY_SCALE)
}

/// Parse a loosely typed JSON amount without the sign check, for computed
/// upstream figures (a payslip's net can be negative).
pub fn parse_signed_amount(value: &Value) -> Option<Amount> {
    let amount = match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    }?;
    (amount.abs() <= max_amount()).then_some(amount)
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Serde adapter for required amounts: lenient on input, a JSON number on output.
///
/// Output goes through `f64` and is for display only. Arithmetic and every
/// comparison stay in `Decimal`.
///
/// ```ignore
/// #[serde(with = "agentpay_core::money::lenient")]
/// pub amount: Amount,
/// ```
pub mod lenient {
    use rust_decimal::prelude::ToPrimitive;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    use crate::types::Amount;

    pub fn serialize<S: Serializer>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(amount.to_f64().unwrap_or_default())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        let value = Value::deserialize(deserializer)?;
        super::parse_amount(&value, "amount").map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for optional amounts. `null`, a missing field and `""` all
/// map to `None`. Pair with `#[serde(default)]`.
pub mod lenient_opt {
    use rust_decimal::prelude::ToPrimitive;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    use crate::types::Amount;

    pub fn serialize<S: Serializer>(
        amount: &Option<Amount>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match amount {
            Some(a) => serializer.serialize_some(&a.to_f64().unwrap_or_default()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Amount>, D::Error> {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(value) => super::parse_amount(&value, "amount")
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// Serde adapter like [`lenient`] that also accepts negative values.
pub mod lenient_signed {
    use rust_decimal::prelude::ToPrimitive;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    use crate::types::Amount;

    pub fn serialize<S: Serializer>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(amount.to_f64().unwrap_or_default())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        let value = Value::deserialize(deserializer)?;
        super::parse_signed_amount(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("expected a number, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(with = "lenient")]
        amount: Amount,
        #[serde(default, with = "lenient_opt")]
        bonus: Option<Amount>,
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_amount(&json!(12.5), "amount").unwrap(), Decimal::new(125, 1));
        assert_eq!(parse_amount(&json!("12.50"), "amount").unwrap(), Decimal::new(1250, 2));
        assert_eq!(parse_amount(&json!(" 800 "), "amount").unwrap(), Decimal::from(800));
        assert_eq!(parse_amount(&json!(1000), "amount").unwrap(), Decimal::from(1000));
    }

    #[test]
    fn accepts_scientific_notation() {
        assert_eq!(parse_amount(&json!("1e3"), "amount").unwrap(), Decimal::from(1000));
    }

    #[test]
    fn rejects_negative_amounts() {
        let err = parse_amount(&json!("-1"), "salary").unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("salary"));
        assert!(parse_amount(&json!(-0.01), "amount").is_err());
    }

    #[test]
    fn zero_is_allowed() {
        assert_eq!(parse_amount(&json!(0), "amount").unwrap(), Decimal::ZERO);
        assert_eq!(parse_amount(&json!("-0"), "amount").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn rejects_non_numeric_values() {
        for value in [json!("abc"), json!(""), json!(null), json!(true), json!([1])] {
            assert_matches!(parse_amount(&value, "amount"), Err(CoreError::Validation(_)));
        }
    }

    #[test]
    fn serde_adapters_normalize_mixed_payloads() {
        let row: Row = serde_json::from_value(json!({ "amount": "250.75", "bonus": 10 })).unwrap();
        assert_eq!(row.amount, Decimal::new(25075, 2));
        assert_eq!(row.bonus, Some(Decimal::from(10)));

        let row: Row = serde_json::from_value(json!({ "amount": 3 })).unwrap();
        assert_eq!(row.bonus, None);

        let row: Row = serde_json::from_value(json!({ "amount": 3, "bonus": "" })).unwrap();
        assert_eq!(row.bonus, None);
    }

    #[test]
    fn serde_adapter_rejects_negative_payloads() {
        let result = serde_json::from_value::<Row>(json!({ "amount": "-5" }));
        assert!(result.is_err());
    }

    #[test]
    fn signed_parsing_keeps_negatives() {
        assert_eq!(parse_signed_amount(&json!("-12.5")), Some(Decimal::new(-125, 1)));
        assert_eq!(parse_signed_amount(&json!(null)), None);
    }

    #[test]
    fn amounts_beyond_the_ceiling_are_rejected() {
        assert_matches!(
            parse_amount(&json!("79228162514264337593543950335"), "amount"),
            Err(CoreError::Validation(msg)) if msg.contains("must not exceed")
        );
        assert_eq!(
            parse_amount(&json!(MAX_AMOUNT), "amount").unwrap(),
            Decimal::from(MAX_AMOUNT)
        );
        assert_eq!(parse_signed_amount(&json!("-1e20")), None);
    }

    #[test]
    fn output_is_a_display_number_while_sums_stay_exact() {
        #[derive(serde::Serialize)]
        struct Out {
            #[serde(with = "lenient")]
            amount: Amount,
        }

        let tenth = parse_amount(&json!("0.1"), "amount").unwrap();
        let fifth = parse_amount(&json!("0.2"), "amount").unwrap();
        let sum = tenth + fifth;
        assert_eq!(sum, Decimal::new(3, 1));

        let out = serde_json::to_value(Out { amount: sum }).unwrap();
        assert_eq!(out, json!({ "amount": 0.3 }));
        let out = serde_json::to_value(Out { amount: Decimal::new(25075, 2) }).unwrap();
        assert_eq!(out["amount"].as_f64(), Some(250.75));
    }

    #[test]
    fn round_money_uses_two_places() {
        assert_eq!(round_money(Decimal::new(5631991666, 6)), Decimal::new(563199, 2));
    }
}
