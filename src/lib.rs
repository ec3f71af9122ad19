//! Typed path lookups over automation data.
//!
//! A [`PathLookup`] walks a JSON pointer (`/foo/bar/2`), a dotted path
//! (`$.foo.bar[2]`) or a relative action path (`0/alias`) through a JSON
//! document, wraps what it finds as a [`WrappedValue`], coerces it to the
//! requested type and applies a [`LookupPolicy`] to missing, null and
//! mistyped values.

pub mod comparison;
pub mod condition;
pub mod config;
pub mod context;
pub mod errors;
pub mod lookup;
mod parser;
pub mod path;
pub mod policy;
pub mod provider;
pub mod providers;
pub mod resolver;
pub mod settings;
pub mod value;

use serde_json::Value;

pub use condition::{AndCondition, ComparisonCondition, ComparisonOp, NotCondition, OrCondition};
pub use config::{DataObjectConfig, NestedLookupConfig, PathLookupConfig};
pub use context::ProviderContext;
pub use errors::{ErrorData, ErrorKind, LookupError, Result};
pub use lookup::{PathLookup, TargetType};
pub use path::{PathExpression, PathForm, Segment};
pub use policy::LookupPolicy;
pub use provider::{AutomationDataProvider, BoxedProvider, Provider, StaticProvider};
pub use providers::{
    ConditionPathLookup, DatePathLookup, IntegerPathLookup, NumberPathLookup, ObjectPathLookup,
    TextPathLookup, ValuePathLookup,
};
pub use resolver::{resolve, PathFailure, ResolutionOutcome, Resolved};
pub use settings::JsonSettings;
pub use value::{wrap, WrappedValue};

/// Convenience: look up `path` in `data` as `T` with the default policy.
pub fn lookup<T: TargetType>(data: &Value, path: &str) -> Result<T> {
    lookup_with_policy(data, path, LookupPolicy::default())
}

/// Look up `path` in `data` as `T` with an explicit policy.
pub fn lookup_with_policy<T: TargetType>(data: &Value, path: &str, policy: LookupPolicy) -> Result<T> {
    let ctx = ProviderContext::new(data.clone());
    PathLookup::<T>::parse(path)?.with_policy(policy).resolve(&ctx)
}
