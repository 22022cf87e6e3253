//! Type definitions for pricing configuration.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Quota value used in configuration to mean "no cap"
pub const UNLIMITED_SENTINEL: i64 = -1;

/// Well-known limit key for the number of managed entities
pub const LIMIT_DASHBOARDS: &str = "dashboards";

/// Numeric bound for one limit key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Quota {
    Unlimited,
    Max(u64),
}

impl Quota {
    /// Whether one more unit is allowed when `usage` units are already used
    pub fn allows(&self, usage: u64) -> bool {
        match self {
            Quota::Unlimited => true,
            Quota::Max(max) => usage < *max,
        }
    }

    /// Headroom left after `usage`, saturating at zero
    pub fn remaining(&self, usage: u64) -> Quota {
        match self {
            Quota::Unlimited => Quota::Unlimited,
            Quota::Max(max) => Quota::Max(max.saturating_sub(usage)),
        }
    }
}

impl TryFrom<i64> for Quota {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            UNLIMITED_SENTINEL => Ok(Quota::Unlimited),
            n if n >= 0 => Ok(Quota::Max(n as u64)),
            n => Err(format!("invalid quota {} (use {} for unlimited)", n, UNLIMITED_SENTINEL)),
        }
    }
}

impl From<Quota> for i64 {
    fn from(quota: Quota) -> Self {
        match quota {
            Quota::Unlimited => UNLIMITED_SENTINEL,
            Quota::Max(n) => i64::try_from(n).unwrap_or(i64::MAX),
        }
    }
}

impl fmt::Display for Quota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quota::Unlimited => f.write_str("unlimited"),
            Quota::Max(n) => write!(f, "{}", n),
        }
    }
}

/// Limit key -> quota, in authoring order
pub type Limits = IndexMap<String, Quota>;

/// How the product is sold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PricingModel {
    Freemium,
    FreeTrial,
    PaidOnly,
}

/// Plan price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Price {
    pub monthly: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yearly: Option<f64>,
}

/// One subscription tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Plan {
    /// Stable tier identifier
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    /// Billing identifier of the monthly price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yearly_price_id: Option<String>,
    /// Environment variable supplying `price_id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_id_env: Option<String>,
    /// Environment variable supplying `yearly_price_id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yearly_price_id_env: Option<String>,
    /// Absent means the default limits apply; an empty map denies every key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<Limits>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub highlighted: bool,
    #[serde(default)]
    pub cta: String,
}

impl Plan {
    pub fn is_paid(&self) -> bool {
        self.price.monthly > 0.0
    }

    /// Billing identifiers bound to this plan
    pub fn billing_ids(&self) -> impl Iterator<Item = &str> {
        self.price_id
            .as_deref()
            .into_iter()
            .chain(self.yearly_price_id.as_deref())
    }

    /// Whether `billing_id` is one of this plan's billing identifiers
    pub fn has_billing_id(&self, billing_id: &str) -> bool {
        self.billing_ids().any(|id| id == billing_id)
    }
}

/// Pricing configuration as authored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PricingConfig {
    pub model: PricingModel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_days: Option<u32>,
    /// Limits applied when no tier can be resolved
    #[serde(default)]
    pub default_limits: Limits,
    pub plans: Vec<Plan>,
}

impl PricingConfig {
    /// Fill billing identifiers from the variables named by `price_id_env`
    /// and `yearly_price_id_env`.
    ///
    /// Identifiers already present are kept. Empty lookups are ignored.
    pub fn resolve_billing_ids<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for plan in &mut self.plans {
            resolve_one(&plan.id, &mut plan.price_id, plan.price_id_env.as_deref(), &lookup);
            resolve_one(
                &plan.id,
                &mut plan.yearly_price_id,
                plan.yearly_price_id_env.as_deref(),
                &lookup,
            );
        }
    }
}

fn resolve_one<F>(plan_id: &str, slot: &mut Option<String>, var: Option<&str>, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    let Some(var) = var else { return };
    if slot.is_some() {
        return;
    }
    match lookup(var).filter(|v| !v.trim().is_empty()) {
        Some(value) => *slot = Some(value),
        None => tracing::warn!("Billing id variable {} for plan '{}' is not set", var, plan_id),
    }
}

/// Wrapper for pricing YAML structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PricingSpec {
    pub pricing: PricingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_from_config_value() {
        assert_eq!(Quota::try_from(-1_i64), Ok(Quota::Unlimited));
        assert_eq!(Quota::try_from(0_i64), Ok(Quota::Max(0)));
        assert_eq!(Quota::try_from(10_i64), Ok(Quota::Max(10)));
        assert!(Quota::try_from(-2_i64).is_err());
        assert_eq!(i64::from(Quota::Unlimited), -1);
    }

    #[test]
    fn test_quota_allows_strictly_below_max() {
        assert!(Quota::Max(1).allows(0));
        assert!(!Quota::Max(1).allows(1));
        assert!(!Quota::Max(0).allows(0));
        assert!(Quota::Unlimited.allows(u64::MAX));
    }

    #[test]
    fn test_quota_remaining_saturates() {
        assert_eq!(Quota::Max(10).remaining(3), Quota::Max(7));
        assert_eq!(Quota::Max(10).remaining(30), Quota::Max(0));
        assert_eq!(Quota::Unlimited.remaining(30), Quota::Unlimited);
    }

    #[test]
    fn test_limits_parse_sentinel_and_keep_order() {
        let yaml = "projects: 3\ndashboards: -1\nseats: 5\n";
        let limits: Limits = serde_yaml::from_str(yaml).unwrap();
        let keys: Vec<&str> = limits.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["projects", "dashboards", "seats"]);
        assert_eq!(limits["dashboards"], Quota::Unlimited);

        assert!(serde_yaml::from_str::<Limits>("dashboards: -3\n").is_err());
    }

    #[test]
    fn test_plan_limits_omitted_differs_from_empty() {
        let omitted: Plan = serde_yaml::from_str("id: a\nname: A\nprice: { monthly: 0 }\n").unwrap();
        assert_eq!(omitted.limits, None);

        let empty: Plan = serde_yaml::from_str("id: a\nname: A\nprice: { monthly: 0 }\nlimits: {}\n").unwrap();
        assert_eq!(empty.limits, Some(Limits::new()));
    }

    #[test]
    fn test_resolve_billing_ids_from_lookup() {
        let yaml = r#"
model: freemium
plans:
  - id: free
    name: Free
    price: { monthly: 0 }
  - id: pro
    name: Pro
    price: { monthly: 20, yearly: 200 }
    price_id_env: PRICE_PRO
    yearly_price_id_env: PRICE_PRO_YEARLY
  - id: team
    name: Team
    price: { monthly: 50 }
    price_id: price_team_fixed
    price_id_env: PRICE_TEAM
"#;
        let mut config: PricingConfig = serde_yaml::from_str(yaml).unwrap();
        config.resolve_billing_ids(|var| match var {
            "PRICE_PRO" => Some("price_123".to_string()),
            "PRICE_PRO_YEARLY" => Some("  ".to_string()),
            "PRICE_TEAM" => Some("price_override".to_string()),
            _ => None,
        });

        assert_eq!(config.plans[1].price_id.as_deref(), Some("price_123"));
        assert_eq!(config.plans[1].yearly_price_id, None);
        assert_eq!(config.plans[2].price_id.as_deref(), Some("price_team_fixed"));
        assert!(config.plans[1].has_billing_id("price_123"));
        assert!(!config.plans[0].has_billing_id("price_123"));
    }
}
