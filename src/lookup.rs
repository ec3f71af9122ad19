use std::marker::PhantomData;

use serde_json::Value;
use tracing::{debug, warn};

use crate::context::ProviderContext;
use crate::errors::{ErrorData, ErrorKind, LookupError, Result};
use crate::path::PathExpression;
use crate::policy::LookupPolicy;
use crate::provider::{BoxedProvider, Provider};
use crate::resolver::{resolve_in, Resolved};
use crate::settings::JsonSettings;
use crate::value::{wrap, WrappedValue};

/// A type a path lookup can produce.
pub trait TargetType: Sized + Send + Sync {
    /// Type name used in diagnostics (`expectedType`).
    const TYPE_NAME: &'static str;
    /// Schema reference key used when none is configured.
    const SCHEMA_KEY: &'static str;

    /// Convert a wrapped value, or `None` if its type does not fit.
    fn coerce(value: WrappedValue, settings: &JsonSettings) -> Option<Self>;
}

/// Looks up a path in a source object and coerces the result to `T`,
/// applying a [`LookupPolicy`] to missing, null and mistyped values.
///
/// Without a configured source the context's automation data is searched.
/// Relative paths (`0/alias`) always address the context's execution trail.
pub struct PathLookup<T> {
    path: PathExpression,
    source: Option<BoxedProvider<Value>>,
    policy: LookupPolicy,
    key: String,
    _target: PhantomData<fn() -> T>,
}

impl<T: TargetType> PathLookup<T> {
    pub fn new(path: PathExpression) -> Self {
        Self {
            path,
            source: None,
            policy: LookupPolicy::default(),
            key: T::SCHEMA_KEY.to_string(),
            _target: PhantomData,
        }
    }

    /// Parse `path` and build a lookup with the default policy.
    pub fn parse(path: &str) -> Result<Self> {
        Ok(Self::new(PathExpression::parse(path)?))
    }

    pub fn with_source(mut self, source: impl Provider<Value> + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn with_policy(mut self, policy: LookupPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_schema_reference_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn path(&self) -> &PathExpression {
        &self.path
    }

    pub fn policy(&self) -> &LookupPolicy {
        &self.policy
    }

    fn evaluate(&self, ctx: &ProviderContext) -> Result<T> {
        let loaded;
        let source = match &self.source {
            Some(provider) if !self.path.is_relative() => {
                loaded = provider.resolve(ctx)?;
                &loaded
            }
            _ => &ctx.data,
        };

        match resolve_in(ctx, source, &self.path) {
            Ok(Resolved::Value(value)) => {
                let actual = value.type_name();
                match T::coerce(value, &ctx.settings) {
                    Some(coerced) => Ok(coerced),
                    None => self.substitute(
                        ctx,
                        ErrorKind::TypeMismatch,
                        ErrorData::default().with_types(actual, T::TYPE_NAME),
                    ),
                }
            }
            Ok(Resolved::Null) => {
                self.substitute(ctx, ErrorKind::NullValueEncountered, ErrorData::default())
            }
            Err(failure) if failure.kind == ErrorKind::PathNotFound => {
                let data = ErrorData { reason: Some(format!("stopped at `{}`", failure.at)), ..ErrorData::default() };
                self.substitute(ctx, ErrorKind::PathNotFound, data)
            }
            Err(failure) => Err(failure.into_error(&self.path)),
        }
    }

    /// Raise `kind` or return the policy's fallback for it.
    fn substitute(&self, ctx: &ProviderContext, kind: ErrorKind, data: ErrorData) -> Result<T> {
        let (raise, fallback, field) = match kind {
            ErrorKind::PathNotFound => (
                self.policy.raise_error_if_not_found,
                &self.policy.value_if_not_found,
                "valueIfNotFound",
            ),
            ErrorKind::NullValueEncountered => {
                (self.policy.raise_error_if_null, &self.policy.value_if_null, "valueIfNull")
            }
            _ => (
                self.policy.raise_error_if_type_mismatch,
                &self.policy.value_if_type_mismatch,
                "valueIfTypeMismatch",
            ),
        };
        if raise {
            return Err(LookupError::new(kind, data.with_path(self.path.as_str())));
        }
        let fallback = fallback.as_ref().ok_or_else(|| {
            LookupError::configuration(format!("`{field}` must be set when its raise flag is false"))
        })?;
        debug!(path = %self.path, field, "substituting fallback value");
        coerce_fallback::<T>(fallback, field, &ctx.settings)
    }
}

fn coerce_fallback<T: TargetType>(fallback: &Value, field: &str, settings: &JsonSettings) -> Result<T> {
    let wrapped = wrap(fallback, settings)
        .map_err(|e| LookupError::configuration(format!("`{field}` is not a usable value: {e}")))?
        .ok_or_else(|| LookupError::configuration(format!("`{field}` must not be null")))?;
    let actual = wrapped.type_name();
    T::coerce(wrapped, settings).ok_or_else(|| {
        LookupError::Configuration(
            ErrorData::default()
                .with_types(actual, T::TYPE_NAME)
                .with_reason(format!("`{field}` of type `{actual}` cannot be used as `{}`", T::TYPE_NAME)),
        )
    })
}

impl<T: TargetType> Provider<T> for PathLookup<T> {
    fn resolve(&self, ctx: &ProviderContext) -> Result<T> {
        debug!(path = %self.path, key = %self.key, target = T::TYPE_NAME, "resolving path lookup");
        self.evaluate(ctx).map_err(|e| {
            let e = e.with_context(ctx.tenant(), Some(&self.key), Some(self.path.as_str()));
            warn!(code = e.code(), path = %self.path, key = %self.key, "path lookup failed");
            e
        })
    }

    fn schema_reference_key(&self) -> &str {
        &self.key
    }
}
