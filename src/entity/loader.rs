//! YAML entity configuration loader.
//!
//! Loads the entity definition from a YAML file and runs the startup
//! validation pass over it. Any authoring defect is reported as a
//! [`ConfigError`] so the process can refuse to start.

use crate::entity::registry::EntitySchemaRegistry;
use crate::entity::types::{DefaultValue, EntityDef, EntitySpec, FieldDef, FieldType, SYSTEM_COLUMNS};
use crate::entity::validation::BaseRule;
use crate::error::ConfigError;
use crate::utils::{is_sql_identifier, table_name};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_-]*$").expect("valid slug pattern"));

/// Largest magnitude a `NUMERIC(10,2)` column holds
const MAX_CURRENCY: f64 = 99_999_999.99;

/// Load an entity definition from a YAML file and build its registry.
///
/// # Example
///
/// ```ignore
/// use tenantcfg::entity::load_entity;
///
/// let registry = load_entity("config/entity.yaml")?;
/// println!("{} list fields", registry.list_fields().len());
/// ```
pub fn load_entity<P: AsRef<Path>>(path: P) -> Result<EntitySchemaRegistry, ConfigError> {
    let path = path.as_ref();

    let yaml_content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    entity_from_str(&yaml_content, path)
}

/// Parse and validate an entity definition from YAML text.
///
/// `origin` is only used to label errors and log lines.
pub fn entity_from_str(yaml_content: &str, origin: &Path) -> Result<EntitySchemaRegistry, ConfigError> {
    let spec: EntitySpec = serde_yaml::from_str(yaml_content).map_err(|source| ConfigError::Parse {
        path: origin.to_path_buf(),
        source,
    })?;

    let registry = EntitySchemaRegistry::new(spec.entity)?;
    tracing::info!(
        "Loaded entity '{}' with {} fields from {}",
        registry.entity().name,
        registry.entity().fields.len(),
        origin.display()
    );

    Ok(registry)
}

/// Validate entity definition
///
/// Checks for:
/// - Non-empty entity name and URL-safe slug that maps to a usable table name
/// - Unique, non-empty field names that are plain SQL identifiers
/// - Valid field definitions (options, default values)
/// - Title, description and sort references resolving to known columns
pub fn validate_entity(entity: &EntityDef) -> Result<(), ConfigError> {
    if entity.name.is_empty() {
        return Err(ConfigError::EmptyEntityName);
    }

    if !SLUG_PATTERN.is_match(&entity.slug) || !is_sql_identifier(&table_name(&entity.slug)) {
        return Err(ConfigError::InvalidSlug {
            entity: entity.name.clone(),
            slug: entity.slug.clone(),
        });
    }

    let mut seen = HashSet::new();
    for field in &entity.fields {
        if field.name.is_empty() {
            return Err(ConfigError::EmptyFieldName {
                entity: entity.name.clone(),
            });
        }
        if !is_sql_identifier(&field.name) || SYSTEM_COLUMNS.contains(&field.name.as_str()) {
            return Err(ConfigError::InvalidFieldName {
                entity: entity.name.clone(),
                field: field.name.clone(),
            });
        }
        if !seen.insert(field.name.as_str()) {
            return Err(ConfigError::DuplicateField {
                entity: entity.name.clone(),
                field: field.name.clone(),
            });
        }
        validate_field(field)?;
    }

    let dangling = |role: &'static str, field: &str| ConfigError::DanglingFieldReference {
        entity: entity.name.clone(),
        role,
        field: field.to_string(),
    };

    if !seen.contains(entity.title_field.as_str()) {
        return Err(dangling("title_field", &entity.title_field));
    }

    if let Some(ref description) = entity.description_field {
        if !seen.contains(description.as_str()) {
            return Err(dangling("description_field", description));
        }
    }

    let sort_field = entity.default_sort.field.as_str();
    if !seen.contains(sort_field) && !SYSTEM_COLUMNS.contains(&sort_field) {
        return Err(dangling("default_sort.field", sort_field));
    }

    Ok(())
}

/// Validate field definition
fn validate_field(field: &FieldDef) -> Result<(), ConfigError> {
    let field_type = field.field_type;

    match (&field.options, field_type.takes_options()) {
        (Some(options), true) if !options.is_empty() => {}
        (_, true) => {
            return Err(ConfigError::MissingOptions {
                field: field.name.clone(),
                field_type: field_type.to_string(),
            })
        }
        (Some(_), false) => {
            return Err(ConfigError::UnexpectedOptions {
                field: field.name.clone(),
                field_type: field_type.to_string(),
            })
        }
        (None, false) => {}
    }

    if let Some(ref value) = field.default_value {
        if !default_is_compatible(field, value) {
            return Err(ConfigError::IncompatibleDefault {
                field: field.name.clone(),
                field_type: field_type.to_string(),
                value: value.to_string(),
            });
        }
    }

    Ok(())
}

/// Whether a default value can be stored in, and passes validation for, the field
fn default_is_compatible(field: &FieldDef, value: &DefaultValue) -> bool {
    match (field.field_type, value) {
        (FieldType::Text | FieldType::RichText, DefaultValue::String(_)) => true,
        (FieldType::Date, DefaultValue::String(s)) => NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok(),
        (FieldType::Datetime, DefaultValue::String(s)) => is_timestamp(s),
        (FieldType::Url, DefaultValue::String(s)) => {
            BaseRule::Url.check(&serde_json::Value::String(s.clone())).is_ok()
        }
        (FieldType::Email, DefaultValue::String(s)) => {
            BaseRule::Email.check(&serde_json::Value::String(s.clone())).is_ok()
        }
        (FieldType::Number, DefaultValue::Int(n)) => i32::try_from(*n).is_ok(),
        (FieldType::Currency, DefaultValue::Int(n)) => (*n as f64).abs() <= MAX_CURRENCY,
        (FieldType::Currency, DefaultValue::Float(f)) => f.is_finite() && f.abs() <= MAX_CURRENCY,
        (FieldType::Boolean, DefaultValue::Bool(_)) => true,
        (FieldType::Select, DefaultValue::String(s)) => field
            .options
            .as_ref()
            .is_some_and(|options| options.contains(s)),
        _ => false,
    }
}

/// RFC 3339, or a naive `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS` timestamp
fn is_timestamp(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").is_ok()
}
