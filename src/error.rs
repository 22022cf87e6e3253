//! Configuration errors.
//!
//! Every variant describes an authoring defect in the entity or pricing
//! tables. They are raised by the startup validation pass and never by a
//! runtime lookup.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Entity name cannot be empty")]
    EmptyEntityName,

    #[error("Entity '{entity}' has invalid slug '{slug}' (expected lowercase letters, digits, '-' or '_', starting with a letter)")]
    InvalidSlug { entity: String, slug: String },

    #[error("Entity '{entity}' has a field with an empty name")]
    EmptyFieldName { entity: String },

    #[error("Entity '{entity}' has invalid field name '{field}' (expected a lowercase, non-reserved SQL identifier that is not a system column)")]
    InvalidFieldName { entity: String, field: String },

    #[error("Entity '{entity}' defines field '{field}' more than once")]
    DuplicateField { entity: String, field: String },

    #[error("Entity '{entity}': {role} references unknown field '{field}'")]
    DanglingFieldReference {
        entity: String,
        role: &'static str,
        field: String,
    },

    #[error("Field '{field}' of type {field_type} requires a non-empty options list")]
    MissingOptions { field: String, field_type: String },

    #[error("Field '{field}' of type {field_type} cannot declare options")]
    UnexpectedOptions { field: String, field_type: String },

    #[error("Field '{field}' has a default value incompatible with type {field_type}: {value}")]
    IncompatibleDefault {
        field: String,
        field_type: String,
        value: String,
    },

    #[error("Pricing configuration must define at least one plan")]
    NoPlans,

    #[error("Plan id cannot be empty")]
    EmptyPlanId,

    #[error("Plan id '{0}' is defined more than once")]
    DuplicatePlan(String),

    #[error("Plan '{plan}' has an invalid {period} price: {price}")]
    InvalidPrice {
        plan: String,
        period: &'static str,
        price: f64,
    },

    #[error("Billing id '{billing_id}' is used by both '{first}' and '{second}'")]
    DuplicateBillingId {
        billing_id: String,
        first: String,
        second: String,
    },

    #[error("Plan '{plan}' has an empty billing id")]
    EmptyBillingId { plan: String },

    #[error("Only one plan may be highlighted, found '{first}' and '{second}'")]
    MultipleHighlighted { first: String, second: String },

    #[error("Pricing model free-trial requires trial_days")]
    MissingTrialDays,
}
