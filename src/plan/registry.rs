//! Plan registry.
//!
//! Read-only lookups and quota decisions over a validated
//! [`PricingConfig`]. No lookup fails: an unknown tier resolves to the
//! baseline plan or the default limits, an unknown billing id resolves to
//! `None`, and an unknown limit key is denied.

use crate::error::ConfigError;
use crate::plan::loader::validate_pricing;
use crate::plan::types::{Limits, Plan, PricingConfig, PricingModel, Quota};
use std::collections::HashMap;

/// Immutable registry over the configured plans
#[derive(Debug, Clone)]
pub struct PlanRegistry {
    config: PricingConfig,
    /// Plan id -> position in `config.plans`
    index: HashMap<String, usize>,
}

impl PlanRegistry {
    /// Validate the configuration and build the id index
    pub fn new(config: PricingConfig) -> Result<Self, ConfigError> {
        validate_pricing(&config)?;

        let index = config
            .plans
            .iter()
            .enumerate()
            .map(|(i, plan)| (plan.id.clone(), i))
            .collect();

        Ok(Self { config, index })
    }

    pub fn plans(&self) -> &[Plan] {
        &self.config.plans
    }

    pub fn default_limits(&self) -> &Limits {
        &self.config.default_limits
    }

    pub fn model(&self) -> PricingModel {
        self.config.model
    }

    pub fn trial_days(&self) -> Option<u32> {
        self.config.trial_days
    }

    fn find(&self, tier: &str) -> Option<&Plan> {
        self.index.get(tier).map(|&i| &self.config.plans[i])
    }

    /// Plan for a tier; unknown tiers get the first configured plan.
    pub fn plan(&self, tier: &str) -> &Plan {
        match self.find(tier) {
            Some(plan) => plan,
            None => {
                tracing::debug!("Unknown tier '{}', using baseline plan", tier);
                &self.config.plans[0]
            }
        }
    }

    /// Tier bound to an external billing identifier
    pub fn plan_by_billing_id(&self, billing_id: &str) -> Option<&str> {
        self.config
            .plans
            .iter()
            .find(|plan| plan.has_billing_id(billing_id))
            .map(|plan| plan.id.as_str())
    }

    /// Limits for a tier.
    ///
    /// No tier, an unknown tier, or a plan that omits `limits` all yield the
    /// default limits. A plan with an explicitly empty map keeps it.
    pub fn limits(&self, tier: Option<&str>) -> &Limits {
        tier.and_then(|t| self.find(t))
            .and_then(|plan| plan.limits.as_ref())
            .unwrap_or(&self.config.default_limits)
    }

    /// Quota configured for `limit_key` under a tier
    pub fn quota(&self, tier: Option<&str>, limit_key: &str) -> Option<Quota> {
        self.limits(tier).get(limit_key).copied()
    }

    /// Whether one more unit of `limit_key` is allowed at `current_usage`.
    ///
    /// Keys missing from the resolved limits are denied.
    pub fn check_limit(&self, tier: Option<&str>, limit_key: &str, current_usage: u64) -> bool {
        match self.quota(tier, limit_key) {
            Some(quota) => quota.allows(current_usage),
            None => {
                tracing::debug!("Limit '{}' not configured for tier {:?}, denying", limit_key, tier);
                false
            }
        }
    }

    /// Headroom before the cap for `limit_key`, if the key is configured
    pub fn remaining(&self, tier: Option<&str>, limit_key: &str, current_usage: u64) -> Option<Quota> {
        self.quota(tier, limit_key).map(|q| q.remaining(current_usage))
    }

    pub fn is_paid_tier(&self, tier: Option<&str>) -> bool {
        tier.and_then(|t| self.find(t)).is_some_and(Plan::is_paid)
    }

    /// First plan without a monthly charge
    pub fn free_plan(&self) -> Option<&Plan> {
        self.config.plans.iter().find(|p| !p.is_paid())
    }

    pub fn paid_plans(&self) -> Vec<&Plan> {
        self.config.plans.iter().filter(|p| p.is_paid()).collect()
    }

    /// The recommended plan, if one is marked
    pub fn highlighted_plan(&self) -> Option<&Plan> {
        self.config.plans.iter().find(|p| p.highlighted)
    }

    /// Monthly price of a tier; 0 for no tier or an unknown tier
    pub fn plan_price(&self, tier: Option<&str>) -> f64 {
        tier.and_then(|t| self.find(t))
            .map(|p| p.price.monthly)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::types::Price;

    fn plan(id: &str, monthly: f64, limits: &[(&str, Quota)]) -> Plan {
        Plan {
            id: id.to_string(),
            name: id.to_uppercase(),
            description: String::new(),
            price: Price { monthly, yearly: None },
            price_id: None,
            yearly_price_id: None,
            price_id_env: None,
            yearly_price_id_env: None,
            limits: Some(limits.iter().map(|(k, q)| (k.to_string(), *q)).collect()),
            features: vec![],
            highlighted: false,
            cta: String::new(),
        }
    }

    fn registry() -> PlanRegistry {
        let mut pro = plan("pro", 20.0, &[("dashboards", Quota::Unlimited)]);
        pro.price_id = Some("price_123".to_string());
        pro.yearly_price_id = Some("price_123_yearly".to_string());
        pro.highlighted = true;
        let mut legacy = plan("legacy", 5.0, &[]);
        legacy.limits = None;

        PlanRegistry::new(PricingConfig {
            model: PricingModel::Freemium,
            trial_days: None,
            default_limits: [("dashboards".to_string(), Quota::Max(1))].into_iter().collect(),
            plans: vec![
                plan("free", 0.0, &[("dashboards", Quota::Max(1))]),
                pro,
                legacy,
                plan("frozen", 0.0, &[]),
            ],
        })
        .unwrap()
    }

    #[test]
    fn test_plan_lookup_falls_back_to_first() {
        let registry = registry();
        assert_eq!(registry.plan("pro").id, "pro");
        assert_eq!(registry.plan("doesnotexist").id, "free");
        assert_eq!(registry.plan("doesnotexist"), registry.plan("free"));
    }

    #[test]
    fn test_plan_by_billing_id() {
        let registry = registry();
        assert_eq!(registry.plan_by_billing_id("price_123"), Some("pro"));
        assert_eq!(registry.plan_by_billing_id("price_123_yearly"), Some("pro"));
        assert_eq!(registry.plan_by_billing_id("price_999"), None);
    }

    #[test]
    fn test_limits_fallbacks() {
        let registry = registry();
        assert_eq!(registry.limits(None), registry.default_limits());
        assert_eq!(registry.limits(Some("unknown")), registry.default_limits());
        assert_eq!(registry.limits(Some("legacy")), registry.default_limits());
        assert_eq!(registry.limits(Some("pro"))["dashboards"], Quota::Unlimited);
    }

    #[test]
    fn test_explicitly_empty_limits_deny_everything() {
        let registry = registry();
        assert!(registry.limits(Some("frozen")).is_empty());
        assert!(!registry.check_limit(Some("frozen"), "dashboards", 0));
        assert_eq!(registry.remaining(Some("frozen"), "dashboards", 0), None);
    }

    #[test]
    fn test_check_limit_decisions() {
        let registry = registry();
        assert!(registry.check_limit(Some("free"), "dashboards", 0));
        assert!(!registry.check_limit(Some("free"), "dashboards", 1));
        assert!(registry.check_limit(Some("pro"), "dashboards", 1000));
        assert!(registry.check_limit(None, "dashboards", 0));
        assert!(!registry.check_limit(None, "dashboards", 1));
        assert!(!registry.check_limit(Some("pro"), "nonexistent_key", 0));
    }

    #[test]
    fn test_remaining() {
        let registry = registry();
        assert_eq!(registry.remaining(Some("free"), "dashboards", 0), Some(Quota::Max(1)));
        assert_eq!(registry.remaining(Some("free"), "dashboards", 4), Some(Quota::Max(0)));
        assert_eq!(registry.remaining(Some("pro"), "dashboards", 4), Some(Quota::Unlimited));
        assert_eq!(registry.remaining(Some("pro"), "seats", 0), None);
    }

    #[test]
    fn test_paid_tier_and_price() {
        let registry = registry();
        assert!(registry.is_paid_tier(Some("pro")));
        assert!(!registry.is_paid_tier(Some("free")));
        assert!(!registry.is_paid_tier(Some("unknown")));
        assert!(!registry.is_paid_tier(None));

        assert_eq!(registry.plan_price(Some("pro")), 20.0);
        assert_eq!(registry.plan_price(Some("free")), 0.0);
        assert_eq!(registry.plan_price(Some("unknown")), 0.0);
        assert_eq!(registry.plan_price(None), 0.0);
    }

    #[test]
    fn test_derived_plan_queries() {
        let registry = registry();
        assert_eq!(registry.free_plan().map(|p| p.id.as_str()), Some("free"));
        let paid: Vec<&str> = registry.paid_plans().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(paid, vec!["pro", "legacy"]);
        assert_eq!(registry.highlighted_plan().map(|p| p.id.as_str()), Some("pro"));
    }
}
