//! # tenantcfg: Entity Schema and Plan Registries
//!
//! tenantcfg holds the declarative configuration of a multi-tenant SaaS
//! product and the pure functions that project it into derived artifacts.
//!
//! ## Features
//!
//! - **Entity schema**: one managed resource described by its fields, from
//!   which list/form field sets, storage column types and validation rules
//!   are derived
//! - **Plans and limits**: subscription tiers with quotas and billing
//!   identifiers, plus quota checks and tier classification
//! - **Startup validation**: authoring defects are rejected when the
//!   configuration is loaded, never on a request path
//!
//! ## Example: Entity
//!
//! ```yaml
//! entity:
//!   name: Dashboard
//!   plural_name: Dashboards
//!   slug: dashboards
//!   fields:
//!     - name: dashboard_name
//!       label: Dashboard Name
//!       type: text
//!       required: true
//!     - name: alert_channels
//!       label: Alert Channels
//!       type: multi-select
//!       options: [Slack, Discord, Email]
//!       show_in_list: false
//!   title_field: dashboard_name
//!   default_sort:
//!     field: created_at
//!     direction: desc
//! ```
//!
//! ## Example: Plans
//!
//! ```yaml
//! pricing:
//!   model: freemium
//!   default_limits:
//!     dashboards: 1
//!   plans:
//!     - id: free
//!       name: Free
//!       price: { monthly: 0 }
//!       limits: { dashboards: 1 }
//!     - id: pro
//!       name: Pro
//!       price: { monthly: 20 }
//!       price_id_env: STRIPE_PRICE_PRO
//!       limits: { dashboards: -1 }
//! ```
//!
//! Both registries are immutable once built and can be shared freely
//! across threads.

pub mod error;
pub mod utils;
pub mod entity;
pub mod plan;
pub mod builtin;
pub mod settings;

pub use error::ConfigError;
pub use entity::{
    EntityDef, EntitySchemaRegistry, FieldDef, FieldType, ValidationRule,
    field_type_to_storage_type, field_type_to_validation_rule, load_entity,
};
pub use plan::{Limits, Plan, PlanRegistry, PricingConfig, Quota, load_pricing, load_pricing_with};
pub use settings::Settings;
