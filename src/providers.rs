//! Typed path lookups. Each target type fixes how a wrapped value coerces;
//! resolution and policy handling are shared through [`PathLookup`].

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::lookup::{PathLookup, TargetType};
use crate::settings::JsonSettings;
use crate::value::WrappedValue;

pub type ConditionPathLookup = PathLookup<bool>;
pub type DatePathLookup = PathLookup<NaiveDate>;
pub type IntegerPathLookup = PathLookup<i64>;
pub type NumberPathLookup = PathLookup<Decimal>;
pub type TextPathLookup = PathLookup<String>;
pub type ObjectPathLookup = PathLookup<Value>;
pub type ValuePathLookup = PathLookup<WrappedValue>;

impl TargetType for bool {
    const TYPE_NAME: &'static str = "boolean";
    const SCHEMA_KEY: &'static str = "objectPathLookupCondition";

    fn coerce(value: WrappedValue, _settings: &JsonSettings) -> Option<Self> {
        match value {
            WrappedValue::Boolean(b) => Some(b),
            _ => None,
        }
    }
}

impl TargetType for i64 {
    const TYPE_NAME: &'static str = "integer";
    const SCHEMA_KEY: &'static str = "objectPathLookupInteger";

    /// Exact integers only; strings never parse.
    fn coerce(value: WrappedValue, _settings: &JsonSettings) -> Option<Self> {
        match value {
            WrappedValue::Integer(i) => Some(i),
            WrappedValue::Decimal(d) if d.fract().is_zero() => d.to_i64(),
            _ => None,
        }
    }
}

impl TargetType for Decimal {
    const TYPE_NAME: &'static str = "number";
    const SCHEMA_KEY: &'static str = "objectPathLookupNumber";

    fn coerce(value: WrappedValue, _settings: &JsonSettings) -> Option<Self> {
        match value {
            WrappedValue::Integer(i) => Some(Decimal::from(i)),
            WrappedValue::Decimal(d) => Some(d),
            _ => None,
        }
    }
}

impl TargetType for NaiveDate {
    const TYPE_NAME: &'static str = "date";
    const SCHEMA_KEY: &'static str = "objectPathLookupDate";

    fn coerce(value: WrappedValue, settings: &JsonSettings) -> Option<Self> {
        match value {
            WrappedValue::Date(d) => Some(d),
            WrappedValue::String(s) => settings.parse_date(&s),
            _ => None,
        }
    }
}

impl TargetType for String {
    const TYPE_NAME: &'static str = "string";
    const SCHEMA_KEY: &'static str = "objectPathLookupText";

    fn coerce(value: WrappedValue, _settings: &JsonSettings) -> Option<Self> {
        match value {
            WrappedValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Objects and lists, handed back as raw JSON so they can feed another lookup.
impl TargetType for Value {
    const TYPE_NAME: &'static str = "object";
    const SCHEMA_KEY: &'static str = "objectPathLookup";

    fn coerce(value: WrappedValue, _settings: &JsonSettings) -> Option<Self> {
        match value {
            WrappedValue::Object(map) => Some(Value::Object(map)),
            WrappedValue::List(items) => Some(Value::Array(items)),
            _ => None,
        }
    }
}

/// Dynamic lookups accept whatever variant the path reaches.
impl TargetType for WrappedValue {
    const TYPE_NAME: &'static str = "value";
    const SCHEMA_KEY: &'static str = "objectPathLookupValue";

    fn coerce(value: WrappedValue, _settings: &JsonSettings) -> Option<Self> {
        Some(value)
    }
}
