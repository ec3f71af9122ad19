use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};

use crate::errors::{LookupError, Result};
use crate::settings::JsonSettings;

/// A JSON node tagged with the semantic type the lookup engine sees.
///
/// Objects and lists keep their child nodes as raw JSON so path traversal
/// can continue into them.
#[derive(Debug, Clone, PartialEq)]
pub enum WrappedValue {
    String(String),
    Integer(i64),
    Decimal(Decimal),
    Boolean(bool),
    ByteArray(Vec<u8>),
    Date(NaiveDate),
    Object(Map<String, Value>),
    List(Vec<Value>),
}

impl WrappedValue {
    /// Type name used in diagnostics (`actualType`).
    pub fn type_name(&self) -> &'static str {
        match self {
            WrappedValue::String(_) => "string",
            WrappedValue::Integer(_) => "integer",
            WrappedValue::Decimal(_) => "decimal",
            WrappedValue::Boolean(_) => "boolean",
            WrappedValue::ByteArray(_) => "byteArray",
            WrappedValue::Date(_) => "date",
            WrappedValue::Object(_) => "object",
            WrappedValue::List(_) => "list",
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, WrappedValue::Object(_) | WrappedValue::List(_))
    }

    /// Convert back to plain JSON. Dates render as `YYYY-MM-DD`, byte arrays
    /// as standard base64 strings.
    pub fn to_json(&self) -> Value {
        match self {
            WrappedValue::String(s) => Value::String(s.clone()),
            WrappedValue::Integer(i) => Value::from(*i),
            WrappedValue::Decimal(d) => Number::from_str(&d.normalize().to_string())
                .map(Value::Number)
                .unwrap_or_else(|_| Value::String(d.to_string())),
            WrappedValue::Boolean(b) => Value::Bool(*b),
            WrappedValue::ByteArray(bytes) => Value::String(STANDARD.encode(bytes)),
            WrappedValue::Date(date) => Value::String(date.format("%Y-%m-%d").to_string()),
            WrappedValue::Object(map) => Value::Object(map.clone()),
            WrappedValue::List(items) => Value::Array(items.clone()),
        }
    }
}

impl From<String> for WrappedValue {
    fn from(s: String) -> Self {
        WrappedValue::String(s)
    }
}

impl From<&str> for WrappedValue {
    fn from(s: &str) -> Self {
        WrappedValue::String(s.to_string())
    }
}

impl From<i64> for WrappedValue {
    fn from(i: i64) -> Self {
        WrappedValue::Integer(i)
    }
}

impl From<Decimal> for WrappedValue {
    fn from(d: Decimal) -> Self {
        WrappedValue::Decimal(d)
    }
}

impl From<bool> for WrappedValue {
    fn from(b: bool) -> Self {
        WrappedValue::Boolean(b)
    }
}

impl From<NaiveDate> for WrappedValue {
    fn from(d: NaiveDate) -> Self {
        WrappedValue::Date(d)
    }
}

/// Wrap a raw JSON node. `Ok(None)` means the node is JSON null, which is a
/// present value and not the same thing as a missing one.
pub fn wrap(node: &Value, settings: &JsonSettings) -> Result<Option<WrappedValue>> {
    let wrapped = match node {
        Value::Null => return Ok(None),
        Value::Bool(b) => WrappedValue::Boolean(*b),
        Value::Number(n) => wrap_number(n)?,
        Value::String(s) => match settings.parse_dates.then(|| settings.parse_date(s)).flatten() {
            Some(date) => WrappedValue::Date(date),
            None => WrappedValue::String(s.clone()),
        },
        Value::Array(items) => WrappedValue::List(items.clone()),
        Value::Object(map) => match tagged_bytes(map, &settings.byte_array_tag) {
            Some(encoded) => WrappedValue::ByteArray(STANDARD.decode(encoded).map_err(|e| {
                LookupError::conversion(format!("invalid base64 byte payload: {e}"))
            })?),
            None => WrappedValue::Object(map.clone()),
        },
    };
    Ok(Some(wrapped))
}

/// Numbers keep their source text (`arbitrary_precision`), so decimals are
/// built from the digits as written and never pass through `f64`.
fn wrap_number(n: &Number) -> Result<WrappedValue> {
    if let Some(i) = n.as_i64() {
        return Ok(WrappedValue::Integer(i));
    }
    let text = n.to_string();
    if !text.contains(['.', 'e', 'E']) {
        return Err(LookupError::conversion(format!(
            "integer {text} is outside the 64-bit signed range"
        )));
    }
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map(WrappedValue::Decimal)
        .map_err(|e| LookupError::conversion(format!("number {text} is not a representable decimal: {e}")))
}

fn tagged_bytes<'a>(map: &'a Map<String, Value>, tag: &str) -> Option<&'a str> {
    if map.len() != 1 {
        return None;
    }
    map.get(tag).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn w(v: Value) -> Option<WrappedValue> {
        wrap(&v, &JsonSettings::default()).unwrap()
    }

    #[test]
    fn scalars_wrap_to_their_variant() {
        assert_eq!(w(json!("abc")), Some(WrappedValue::String("abc".into())));
        assert_eq!(w(json!(42)), Some(WrappedValue::Integer(42)));
        assert_eq!(w(json!(true)), Some(WrappedValue::Boolean(true)));
        assert_eq!(w(json!(0.1)), Some(WrappedValue::Decimal(Decimal::from_str("0.1").unwrap())));
        assert_eq!(w(Value::Null), None);
    }

    #[test]
    fn containers_keep_raw_children() {
        assert_eq!(w(json!([1, 2])), Some(WrappedValue::List(vec![json!(1), json!(2)])));
        let wrapped = w(json!({"a": {"b": 1}})).unwrap();
        assert_eq!(wrapped.type_name(), "object");
        assert!(wrapped.is_container());
    }

    #[test]
    fn integer_beyond_i64_is_a_conversion_error() {
        let err = wrap(&json!(u64::MAX), &JsonSettings::default()).unwrap_err();
        assert_eq!(err.code(), "automation.providers.value.conversion.failed");
        let negative: Value = serde_json::from_str("-99999999999999999999").unwrap();
        assert!(wrap(&negative, &JsonSettings::default()).is_err());
    }

    #[test]
    fn decimals_keep_every_digit() {
        let node: Value = serde_json::from_str("12345678901234.123456").unwrap();
        assert_eq!(
            w(node),
            Some(WrappedValue::Decimal(Decimal::from_str("12345678901234.123456").unwrap()))
        );
        let exp: Value = serde_json::from_str("1.5e3").unwrap();
        assert_eq!(w(exp), Some(WrappedValue::Decimal(Decimal::from(1500))));
    }

    #[test]
    fn base64_tagged_object_wraps_as_bytes() {
        assert_eq!(w(json!({"$base64": "aGk="})), Some(WrappedValue::ByteArray(b"hi".to_vec())));
        // a second key makes it an ordinary object
        assert_eq!(w(json!({"$base64": "aGk=", "x": 1})).unwrap().type_name(), "object");
        assert!(wrap(&json!({"$base64": "!!"}), &JsonSettings::default()).is_err());
    }

    #[test]
    fn date_strings_only_wrap_as_dates_when_enabled() {
        assert_eq!(w(json!("2024-01-31")).unwrap().type_name(), "string");
        let settings = JsonSettings { parse_dates: true, ..JsonSettings::default() };
        assert_eq!(
            wrap(&json!("2024-01-31"), &settings).unwrap(),
            Some(WrappedValue::Date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()))
        );
    }

    #[test]
    fn decimal_round_trips_to_json_number() {
        let d = WrappedValue::Decimal(Decimal::from_str("12.50").unwrap());
        assert_eq!(d.to_json(), json!(12.5));
    }
}
