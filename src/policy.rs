use serde::Deserialize;
use serde_json::Value;

/// How a lookup reacts to the recoverable failures: a missing path, a null
/// value, or a value of the wrong type.
///
/// Every flag defaults to `true` (raise). A fallback value is only consulted
/// when its flag is `false`, and is coerced to the lookup's target type at
/// resolution time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LookupPolicy {
    pub raise_error_if_not_found: bool,
    pub value_if_not_found: Option<Value>,
    pub raise_error_if_null: bool,
    pub value_if_null: Option<Value>,
    pub raise_error_if_type_mismatch: bool,
    pub value_if_type_mismatch: Option<Value>,
}

impl Default for LookupPolicy {
    fn default() -> Self {
        Self {
            raise_error_if_not_found: true,
            value_if_not_found: None,
            raise_error_if_null: true,
            value_if_null: None,
            raise_error_if_type_mismatch: true,
            value_if_type_mismatch: None,
        }
    }
}

impl LookupPolicy {
    pub fn builder() -> LookupPolicyBuilder {
        LookupPolicyBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct LookupPolicyBuilder {
    policy: LookupPolicy,
}

impl LookupPolicyBuilder {
    pub fn raise_error_if_not_found(mut self, raise: bool) -> Self {
        self.policy.raise_error_if_not_found = raise;
        self
    }

    /// Substitute `value` for a missing path instead of raising.
    pub fn value_if_not_found(mut self, value: Value) -> Self {
        self.policy.raise_error_if_not_found = false;
        self.policy.value_if_not_found = Some(value);
        self
    }

    pub fn raise_error_if_null(mut self, raise: bool) -> Self {
        self.policy.raise_error_if_null = raise;
        self
    }

    pub fn value_if_null(mut self, value: Value) -> Self {
        self.policy.raise_error_if_null = false;
        self.policy.value_if_null = Some(value);
        self
    }

    pub fn raise_error_if_type_mismatch(mut self, raise: bool) -> Self {
        self.policy.raise_error_if_type_mismatch = raise;
        self
    }

    pub fn value_if_type_mismatch(mut self, value: Value) -> Self {
        self.policy.raise_error_if_type_mismatch = false;
        self.policy.value_if_type_mismatch = Some(value);
        self
    }

    pub fn build(self) -> LookupPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn absent_flags_default_to_raise() {
        let policy: LookupPolicy = serde_json::from_value(json!({"valueIfNull": 3})).unwrap();
        assert!(policy.raise_error_if_null);
        assert!(policy.raise_error_if_not_found);
        assert_eq!(policy.value_if_null, Some(json!(3)));
    }

    #[test]
    fn builder_fallback_turns_off_raising() {
        let policy = LookupPolicy::builder().value_if_not_found(json!(0)).build();
        assert!(!policy.raise_error_if_not_found);
        assert!(policy.raise_error_if_type_mismatch);
    }
}
