use std::sync::Arc;

use serde_json::Value;

use crate::context::ProviderContext;
use crate::errors::Result;

/// Something that produces a `T` for a given evaluation context.
///
/// Providers hold only their configuration; every call is independent, so a
/// single provider can serve concurrent evaluations.
pub trait Provider<T>: Send + Sync {
    fn resolve(&self, ctx: &ProviderContext) -> Result<T>;

    /// Names the configured field this provider came from, for diagnostics.
    fn schema_reference_key(&self) -> &str;
}

pub type BoxedProvider<T> = Box<dyn Provider<T>>;

impl<T, P: Provider<T> + ?Sized> Provider<T> for Box<P> {
    fn resolve(&self, ctx: &ProviderContext) -> Result<T> {
        (**self).resolve(ctx)
    }

    fn schema_reference_key(&self) -> &str {
        (**self).schema_reference_key()
    }
}

impl<T, P: Provider<T> + ?Sized> Provider<T> for Arc<P> {
    fn resolve(&self, ctx: &ProviderContext) -> Result<T> {
        (**self).resolve(ctx)
    }

    fn schema_reference_key(&self) -> &str {
        (**self).schema_reference_key()
    }
}

/// Always yields the configured literal.
#[derive(Debug, Clone)]
pub struct StaticProvider<T> {
    value: T,
    key: String,
}

impl<T> StaticProvider<T> {
    pub fn new(value: T) -> Self {
        Self { value, key: "static".to_string() }
    }

    pub fn with_schema_reference_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }
}

impl<T: Clone + Send + Sync> Provider<T> for StaticProvider<T> {
    fn resolve(&self, _ctx: &ProviderContext) -> Result<T> {
        Ok(self.value.clone())
    }

    fn schema_reference_key(&self) -> &str {
        &self.key
    }
}

/// Yields the context's automation data.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutomationDataProvider;

impl Provider<Value> for AutomationDataProvider {
    fn resolve(&self, ctx: &ProviderContext) -> Result<Value> {
        Ok(ctx.data.clone())
    }

    fn schema_reference_key(&self) -> &str {
        "automationData"
    }
}
