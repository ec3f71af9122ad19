use serde::Deserialize;
use serde_json::Value;

use crate::errors::{LookupError, Result};
use crate::lookup::{PathLookup, TargetType};
use crate::path::PathExpression;
use crate::policy::LookupPolicy;
use crate::provider::StaticProvider;

/// JSON model of a path lookup as it appears in automation configuration:
///
/// ```json
/// {
///   "path": "/quote/premium",
///   "dataObject": { "objectPathLookup": { "path": "/entities/0" } },
///   "raiseErrorIfNotFound": false,
///   "valueIfNotFound": 0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathLookupConfig {
    pub path: String,
    #[serde(default)]
    pub data_object: Option<DataObjectConfig>,
    #[serde(default)]
    pub schema_reference_key: Option<String>,
    #[serde(flatten)]
    pub policy: LookupPolicy,
}

/// Where a lookup reads from when it does not use the automation data.
///
/// An object is a nested lookup only when `objectPathLookup` is its single
/// key; anything else is literal data.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DataObjectConfig {
    Lookup(NestedLookupConfig),
    Literal(Value),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NestedLookupConfig {
    #[serde(rename = "objectPathLookup")]
    pub object_path_lookup: Box<PathLookupConfig>,
}

impl PathLookupConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| LookupError::configuration(format!("invalid path lookup configuration: {e}")))
    }

    /// Build a lookup producing `T`. Path syntax is checked here, fallback
    /// values only when they are needed.
    pub fn build<T: TargetType>(&self) -> Result<PathLookup<T>> {
        let mut lookup = PathLookup::<T>::new(PathExpression::parse(&self.path)?)
            .with_policy(self.policy.clone());
        if let Some(key) = &self.schema_reference_key {
            lookup = lookup.with_schema_reference_key(key.clone());
        }
        lookup = match &self.data_object {
            None => lookup,
            Some(DataObjectConfig::Literal(value)) => lookup.with_source(StaticProvider::new(value.clone())),
            Some(DataObjectConfig::Lookup(nested)) => {
                lookup.with_source(nested.object_path_lookup.build::<Value>()?)
            }
        };
        Ok(lookup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ProviderContext;
    use crate::provider::Provider;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn policy_fields_are_flattened() {
        let config = PathLookupConfig::from_json(
            r#"{"path": "/a", "raiseErrorIfNull": false, "valueIfNull": true}"#,
        )
        .unwrap();
        assert_eq!(config.data_object, None);
        assert!(!config.policy.raise_error_if_null);
        assert!(config.policy.raise_error_if_not_found);
        assert_eq!(config.policy.value_if_null, Some(json!(true)));
    }

    #[test]
    fn literal_and_nested_data_objects() {
        let literal = PathLookupConfig::from_json(r#"{"path": "/n", "dataObject": {"n": 4}}"#).unwrap();
        assert_eq!(literal.data_object, Some(DataObjectConfig::Literal(json!({"n": 4}))));
        let ctx = ProviderContext::new(json!({"n": 1}));
        assert_eq!(literal.build::<i64>().unwrap().resolve(&ctx).unwrap(), 4);

        let nested = PathLookupConfig::from_json(
            r#"{"path": "/n", "dataObject": {"objectPathLookup": {"path": "/inner"}}}"#,
        )
        .unwrap();
        let ctx = ProviderContext::new(json!({"n": 1, "inner": {"n": 9}}));
        assert_eq!(nested.build::<i64>().unwrap().resolve(&ctx).unwrap(), 9);
    }

    #[test]
    fn object_with_extra_keys_is_literal_data() {
        let config = PathLookupConfig::from_json(
            r#"{"path": "/other", "dataObject": {"objectPathLookup": {"path": "/x"}, "other": 1}}"#,
        )
        .unwrap();
        assert_eq!(
            config.data_object,
            Some(DataObjectConfig::Literal(json!({"objectPathLookup": {"path": "/x"}, "other": 1})))
        );
        let ctx = ProviderContext::new(json!({"x": {"other": 7}}));
        assert_eq!(config.build::<i64>().unwrap().resolve(&ctx).unwrap(), 1);
    }

    #[test]
    fn bad_path_fails_at_build_time() {
        let config = PathLookupConfig::from_json(r#"{"path": "$..x"}"#).unwrap();
        let err = config.build::<bool>().err().unwrap();
        assert_eq!(err.code(), "automation.providers.path.invalid");
    }

    #[test]
    fn missing_path_is_rejected() {
        let err = PathLookupConfig::from_json(r#"{"valueIfNull": 1}"#).unwrap_err();
        assert_eq!(err.code(), "automation.providers.configuration.error");
    }
}
