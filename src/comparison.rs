use std::cmp::Ordering;

use rust_decimal::Decimal;

use crate::value::WrappedValue;

impl PartialOrd for WrappedValue {
    /// Values only order against values of the same variant. Objects and
    /// lists are comparable for equality alone.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        use WrappedValue::*;
        match (self, other) {
            (String(a), String(b)) => Some(a.cmp(b)),
            (Integer(a), Integer(b)) => Some(a.cmp(b)),
            (Decimal(a), Decimal(b)) => Some(a.cmp(b)),
            (Boolean(a), Boolean(b)) => Some(a.cmp(b)),
            (ByteArray(a), ByteArray(b)) => Some(a.cmp(b)),
            (Date(a), Date(b)) => Some(a.cmp(b)),
            (Object(a), Object(b)) if a == b => Some(Ordering::Equal),
            (List(a), List(b)) if a == b => Some(Ordering::Equal),
            _ => None,
        }
    }
}

/// Ordering used by conditions: like `partial_cmp`, except integers and
/// decimals compare numerically.
pub fn compare(a: &WrappedValue, b: &WrappedValue) -> Option<Ordering> {
    match (a, b) {
        (WrappedValue::Integer(i), WrappedValue::Decimal(d)) => Some(Decimal::from(*i).cmp(d)),
        (WrappedValue::Decimal(d), WrappedValue::Integer(i)) => Some(d.cmp(&Decimal::from(*i))),
        _ => a.partial_cmp(b),
    }
}

/// Apply `pred_on_ord` to the ordering of `a` and `b`; incomparable values
/// never satisfy the predicate.
pub fn cmp_values<F>(a: &WrappedValue, b: &WrappedValue, pred_on_ord: F) -> bool
where
    F: Fn(Ordering) -> bool,
{
    compare(a, b).map(pred_on_ord).unwrap_or(false)
}
