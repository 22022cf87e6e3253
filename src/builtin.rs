//! Bundled default configuration.
//!
//! The YAML files under `config/` are embedded at compile time so a binary
//! can start without a config directory. Each call builds a fresh registry.

use crate::entity::{entity_from_str, EntitySchemaRegistry};
use crate::error::ConfigError;
use crate::plan::{pricing_from_str, PlanRegistry};
use std::path::Path;

pub const ENTITY_YAML: &str = include_str!("../config/entity.yaml");
pub const PRICING_YAML: &str = include_str!("../config/pricing.yaml");

/// Registry for the bundled entity definition
pub fn entity_registry() -> Result<EntitySchemaRegistry, ConfigError> {
    entity_from_str(ENTITY_YAML, Path::new("<builtin>/entity.yaml"))
}

/// Registry for the bundled plans, billing ids resolved from the environment
pub fn plan_registry() -> Result<PlanRegistry, ConfigError> {
    plan_registry_with(|var| std::env::var(var).ok())
}

/// Registry for the bundled plans, billing ids resolved with `lookup`
pub fn plan_registry_with<F>(lookup: F) -> Result<PlanRegistry, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    pricing_from_str(PRICING_YAML, Path::new("<builtin>/pricing.yaml"), lookup)
}
