//! Plans and limits: subscription tiers, their quotas and billing
//! identifiers, plus the access-gating decisions built on them.

pub mod types;
pub mod registry;
pub mod loader;

pub use types::{Limits, Plan, Price, PricingConfig, PricingModel, PricingSpec, Quota, LIMIT_DASHBOARDS, UNLIMITED_SENTINEL};
pub use registry::PlanRegistry;
pub use loader::{load_pricing, load_pricing_with, pricing_from_str, validate_pricing};
