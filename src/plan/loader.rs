//! YAML pricing configuration loader.
//!
//! Reads the plan table, resolves billing identifiers through an injected
//! lookup and runs the startup validation pass.

use crate::error::ConfigError;
use crate::plan::registry::PlanRegistry;
use crate::plan::types::{PricingConfig, PricingModel, PricingSpec};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Load pricing from a YAML file, resolving billing ids from the process
/// environment.
pub fn load_pricing<P: AsRef<Path>>(path: P) -> Result<PlanRegistry, ConfigError> {
    load_pricing_with(path, |var| std::env::var(var).ok())
}

/// Load pricing from a YAML file, resolving billing ids with `lookup`.
///
/// # Example
///
/// ```ignore
/// use tenantcfg::plan::load_pricing_with;
///
/// let registry = load_pricing_with("config/pricing.yaml", |_| None)?;
/// assert!(registry.free_plan().is_some());
/// ```
pub fn load_pricing_with<P, F>(path: P, lookup: F) -> Result<PlanRegistry, ConfigError>
where
    P: AsRef<Path>,
    F: Fn(&str) -> Option<String>,
{
    let path = path.as_ref();

    let yaml_content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    pricing_from_str(&yaml_content, path, lookup)
}

/// Parse pricing YAML text, resolve billing ids with `lookup` and validate.
///
/// `origin` is only used to label errors and log lines.
pub fn pricing_from_str<F>(yaml_content: &str, origin: &Path, lookup: F) -> Result<PlanRegistry, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let spec: PricingSpec = serde_yaml::from_str(yaml_content).map_err(|source| ConfigError::Parse {
        path: origin.to_path_buf(),
        source,
    })?;

    let mut config = spec.pricing;
    config.resolve_billing_ids(lookup);

    let registry = PlanRegistry::new(config)?;
    tracing::info!("Loaded {} plans from {}", registry.plans().len(), origin.display());

    Ok(registry)
}

/// Validate pricing configuration
///
/// Checks for:
/// - At least one plan, with unique non-empty ids
/// - Finite, non-negative prices
/// - Non-blank billing ids, each bound to a single plan
/// - At most one highlighted plan
/// - Trial length when the model is free-trial
pub fn validate_pricing(config: &PricingConfig) -> Result<(), ConfigError> {
    if config.plans.is_empty() {
        return Err(ConfigError::NoPlans);
    }

    if config.model == PricingModel::FreeTrial && config.trial_days.is_none() {
        return Err(ConfigError::MissingTrialDays);
    }

    let mut ids = HashSet::new();
    let mut billing_owners: HashMap<&str, &str> = HashMap::new();
    let mut highlighted: Option<&str> = None;

    for plan in &config.plans {
        if plan.id.is_empty() {
            return Err(ConfigError::EmptyPlanId);
        }
        if !ids.insert(plan.id.as_str()) {
            return Err(ConfigError::DuplicatePlan(plan.id.clone()));
        }

        let prices = [("monthly", Some(plan.price.monthly)), ("yearly", plan.price.yearly)];
        for (period, price) in prices {
            if let Some(price) = price {
                if !price.is_finite() || price < 0.0 {
                    return Err(ConfigError::InvalidPrice {
                        plan: plan.id.clone(),
                        period,
                        price,
                    });
                }
            }
        }

        for billing_id in plan.billing_ids() {
            if billing_id.trim().is_empty() {
                return Err(ConfigError::EmptyBillingId { plan: plan.id.clone() });
            }
            match billing_owners.get(billing_id) {
                // Monthly and yearly may share an id within one plan
                Some(&owner) if owner != plan.id => {
                    return Err(ConfigError::DuplicateBillingId {
                        billing_id: billing_id.to_string(),
                        first: owner.to_string(),
                        second: plan.id.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    billing_owners.insert(billing_id, plan.id.as_str());
                }
            }
        }

        if !plan.is_paid() && plan.billing_ids().next().is_some() {
            tracing::warn!("Free plan '{}' is bound to a billing id", plan.id);
        }

        if plan.highlighted {
            if let Some(first) = highlighted {
                return Err(ConfigError::MultipleHighlighted {
                    first: first.to_string(),
                    second: plan.id.clone(),
                });
            }
            highlighted = Some(plan.id.as_str());
        }
    }

    Ok(())
}
