use serde_json::Value;

use crate::settings::JsonSettings;

/// Runtime data a lookup evaluates against: one per trigger or event instance.
///
/// `data` is the automation data (trigger payload, loaded entities) used as
/// the default source object. `trail` holds the action records produced so
/// far, oldest first, for relative paths such as `0/alias`.
#[derive(Debug, Clone, Default)]
pub struct ProviderContext {
    pub tenant: Option<String>,
    pub data: Value,
    pub trail: Vec<Value>,
    pub settings: JsonSettings,
}

impl ProviderContext {
    pub fn new(data: Value) -> Self {
        Self { data, ..Self::default() }
    }

    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    pub fn with_trail(mut self, trail: Vec<Value>) -> Self {
        self.trail = trail;
        self
    }

    pub fn with_settings(mut self, settings: JsonSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Record a finished action at the head of the trail.
    pub fn push_action(&mut self, record: Value) {
        self.trail.push(record);
    }

    /// The action record `steps_back` positions before the most recent one.
    pub fn action(&self, steps_back: usize) -> Option<&Value> {
        let back = steps_back.checked_add(1)?;
        self.trail
            .len()
            .checked_sub(back)
            .and_then(|idx| self.trail.get(idx))
    }

    pub fn tenant(&self) -> Option<&str> {
        self.tenant.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn steps_count_back_from_latest_action() {
        let mut ctx = ProviderContext::new(json!({}));
        ctx.push_action(json!({"alias": "first"}));
        ctx.push_action(json!({"alias": "second"}));
        assert_eq!(ctx.action(0), Some(&json!({"alias": "second"})));
        assert_eq!(ctx.action(1), Some(&json!({"alias": "first"})));
        assert_eq!(ctx.action(2), None);
        assert_eq!(ctx.action(usize::MAX), None);
    }
}
