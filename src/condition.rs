use std::cmp::Ordering;

use tracing::trace;

use crate::comparison::cmp_values;
use crate::context::ProviderContext;
use crate::errors::Result;
use crate::provider::{BoxedProvider, Provider};
use crate::value::WrappedValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl ComparisonOp {
    fn holds(self, a: &WrappedValue, b: &WrappedValue) -> bool {
        match self {
            ComparisonOp::Eq => cmp_values(a, b, |o| o == Ordering::Equal),
            ComparisonOp::Ne => !cmp_values(a, b, |o| o == Ordering::Equal),
            ComparisonOp::Lt => cmp_values(a, b, |o| o == Ordering::Less),
            ComparisonOp::Lte => cmp_values(a, b, |o| o != Ordering::Greater),
            ComparisonOp::Gt => cmp_values(a, b, |o| o == Ordering::Greater),
            ComparisonOp::Gte => cmp_values(a, b, |o| o != Ordering::Less),
        }
    }

    fn key(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "isEqualToCondition",
            ComparisonOp::Ne => "isNotEqualToCondition",
            ComparisonOp::Lt => "isLessThanCondition",
            ComparisonOp::Lte => "isLessThanOrEqualToCondition",
            ComparisonOp::Gt => "isGreaterThanCondition",
            ComparisonOp::Gte => "isGreaterThanOrEqualToCondition",
        }
    }
}

/// Compares two dynamically-typed values. Values of different variants are
/// never equal and never ordered.
pub struct ComparisonCondition {
    op: ComparisonOp,
    left: BoxedProvider<WrappedValue>,
    right: BoxedProvider<WrappedValue>,
}

impl ComparisonCondition {
    pub fn new(
        op: ComparisonOp,
        left: impl Provider<WrappedValue> + 'static,
        right: impl Provider<WrappedValue> + 'static,
    ) -> Self {
        Self { op, left: Box::new(left), right: Box::new(right) }
    }
}

impl Provider<bool> for ComparisonCondition {
    fn resolve(&self, ctx: &ProviderContext) -> Result<bool> {
        let a = self.left.resolve(ctx)?;
        let b = self.right.resolve(ctx)?;
        let holds = self.op.holds(&a, &b);
        trace!(op = ?self.op, holds, "comparison condition");
        Ok(holds)
    }

    fn schema_reference_key(&self) -> &str {
        self.op.key()
    }
}

/// True when every condition is; stops at the first false one.
pub struct AndCondition {
    conditions: Vec<BoxedProvider<bool>>,
}

impl AndCondition {
    pub fn new(conditions: Vec<BoxedProvider<bool>>) -> Self {
        Self { conditions }
    }
}

impl Provider<bool> for AndCondition {
    fn resolve(&self, ctx: &ProviderContext) -> Result<bool> {
        for condition in &self.conditions {
            if !condition.resolve(ctx)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn schema_reference_key(&self) -> &str {
        "andCondition"
    }
}

/// True when any condition is; stops at the first true one.
pub struct OrCondition {
    conditions: Vec<BoxedProvider<bool>>,
}

impl OrCondition {
    pub fn new(conditions: Vec<BoxedProvider<bool>>) -> Self {
        Self { conditions }
    }
}

impl Provider<bool> for OrCondition {
    fn resolve(&self, ctx: &ProviderContext) -> Result<bool> {
        for condition in &self.conditions {
            if condition.resolve(ctx)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn schema_reference_key(&self) -> &str {
        "orCondition"
    }
}

pub struct NotCondition {
    inner: BoxedProvider<bool>,
}

impl NotCondition {
    pub fn new(inner: impl Provider<bool> + 'static) -> Self {
        Self { inner: Box::new(inner) }
    }
}

impl Provider<bool> for NotCondition {
    fn resolve(&self, ctx: &ProviderContext) -> Result<bool> {
        Ok(!self.inner.resolve(ctx)?)
    }

    fn schema_reference_key(&self) -> &str {
        "notCondition"
    }
}
