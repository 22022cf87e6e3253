//! Process settings read from the environment.
//!
//! Precedence is CLI flag > environment (including `.env`) > default.

use std::path::PathBuf;

pub const ENTITY_CONFIG_VAR: &str = "TENANTCFG_ENTITY_CONFIG";
pub const PRICING_CONFIG_VAR: &str = "TENANTCFG_PRICING_CONFIG";
pub const LOG_VAR: &str = "TENANTCFG_LOG";

pub const DEFAULT_ENTITY_CONFIG: &str = "config/entity.yaml";
pub const DEFAULT_PRICING_CONFIG: &str = "config/pricing.yaml";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub entity_config: PathBuf,
    pub pricing_config: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            entity_config: PathBuf::from(DEFAULT_ENTITY_CONFIG),
            pricing_config: PathBuf::from(DEFAULT_PRICING_CONFIG),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Settings {
    /// Load `.env` if present, then read settings from the environment
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read settings through `lookup`, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        Self {
            entity_config: get(ENTITY_CONFIG_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.entity_config),
            pricing_config: get(PRICING_CONFIG_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.pricing_config),
            log_filter: get(LOG_VAR).unwrap_or(defaults.log_filter),
        }
    }
}
