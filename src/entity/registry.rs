//! Entity schema registry.
//!
//! Holds one validated [`EntityDef`] and exposes the field projections used
//! by list renderers, form generators and the storage schema generator.

use crate::entity::loader::validate_entity;
use crate::entity::storage::field_type_to_storage_type;
use crate::entity::types::{EntityDef, FieldDef, FieldType};
use crate::entity::validation::{field_type_to_validation_rule, ValidationRule};
use crate::error::ConfigError;

/// Immutable registry over a single entity definition
#[derive(Debug, Clone)]
pub struct EntitySchemaRegistry {
    entity: EntityDef,
}

impl EntitySchemaRegistry {
    /// Validate the definition and wrap it in a registry
    pub fn new(entity: EntityDef) -> Result<Self, ConfigError> {
        validate_entity(&entity)?;
        Ok(Self { entity })
    }

    pub fn entity(&self) -> &EntityDef {
        &self.entity
    }

    /// Fields shown in list views, in definition order
    pub fn list_fields(&self) -> Vec<&FieldDef> {
        self.entity.fields.iter().filter(|f| f.is_listed()).collect()
    }

    /// Fields shown in forms, in definition order
    pub fn form_fields(&self) -> Vec<&FieldDef> {
        self.entity.fields.iter().filter(|f| f.is_in_form()).collect()
    }

    /// Fields explicitly hidden from list views
    pub fn hidden_list_fields(&self) -> Vec<&FieldDef> {
        self.entity.fields.iter().filter(|f| !f.is_listed()).collect()
    }

    /// Fields explicitly hidden from forms
    pub fn hidden_form_fields(&self) -> Vec<&FieldDef> {
        self.entity.fields.iter().filter(|f| !f.is_in_form()).collect()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.entity.fields.iter().find(|f| f.name == name)
    }

    /// Field used as the record's display title
    pub fn title_field(&self) -> Option<&FieldDef> {
        self.field(&self.entity.title_field)
    }

    pub fn description_field(&self) -> Option<&FieldDef> {
        self.entity
            .description_field
            .as_deref()
            .and_then(|name| self.field(name))
    }

    /// Column type for a field type
    pub fn field_type_to_storage_type(&self, field_type: FieldType) -> &'static str {
        field_type_to_storage_type(field_type)
    }

    /// Validation rule for a field
    pub fn field_type_to_validation_rule(&self, field: &FieldDef) -> ValidationRule {
        field_type_to_validation_rule(field)
    }

    /// Validation rules for every form field, keyed by field name
    pub fn form_rules(&self) -> Vec<(&str, ValidationRule)> {
        self.form_fields()
            .into_iter()
            .map(|f| (f.name.as_str(), field_type_to_validation_rule(f)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::types::{SortDirection, SortSpec};

    fn registry() -> EntitySchemaRegistry {
        EntitySchemaRegistry::new(EntityDef {
            name: "Dashboard".to_string(),
            plural_name: "Dashboards".to_string(),
            slug: "dashboards".to_string(),
            icon: Some("layout-dashboard".to_string()),
            fields: vec![
                FieldDef::new("dashboard_name", "Dashboard Name", FieldType::Text).required(),
                FieldDef::new("last_updated", "Last Updated", FieldType::Datetime).hidden_in_form(),
                FieldDef::new("ai_insights_enabled", "AI Insights", FieldType::Boolean)
                    .required()
                    .hidden_in_list(),
                FieldDef::new("connected_accounts", "Connected Accounts", FieldType::MultiSelect)
                    .with_options(["Stripe", "GitHub"]),
            ],
            title_field: "dashboard_name".to_string(),
            description_field: Some("connected_accounts".to_string()),
            default_sort: SortSpec {
                field: "created_at".to_string(),
                direction: SortDirection::Desc,
            },
            allow_create: true,
            allow_edit: true,
            allow_delete: true,
            allow_export: false,
        })
        .unwrap()
    }

    fn names(fields: Vec<&FieldDef>) -> Vec<&str> {
        fields.into_iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_list_fields_preserve_order() {
        let registry = registry();
        assert_eq!(
            names(registry.list_fields()),
            vec!["dashboard_name", "last_updated", "connected_accounts"]
        );
        assert_eq!(names(registry.hidden_list_fields()), vec!["ai_insights_enabled"]);
    }

    #[test]
    fn test_form_fields_preserve_order() {
        let registry = registry();
        assert_eq!(
            names(registry.form_fields()),
            vec!["dashboard_name", "ai_insights_enabled", "connected_accounts"]
        );
        assert_eq!(names(registry.hidden_form_fields()), vec!["last_updated"]);
    }

    #[test]
    fn test_title_and_description_lookup() {
        let registry = registry();
        assert_eq!(registry.title_field().map(|f| f.label.as_str()), Some("Dashboard Name"));
        assert_eq!(
            registry.description_field().map(|f| f.name.as_str()),
            Some("connected_accounts")
        );
        assert!(registry.field("missing").is_none());
    }

    #[test]
    fn test_form_rules() {
        let registry = registry();
        let rules: Vec<(String, String)> = registry
            .form_rules()
            .into_iter()
            .map(|(name, rule)| (name.to_string(), rule.to_string()))
            .collect();

        assert_eq!(
            rules,
            vec![
                ("dashboard_name".to_string(), "z.string()".to_string()),
                ("ai_insights_enabled".to_string(), "z.boolean()".to_string()),
                ("connected_accounts".to_string(), "z.array(z.string()).optional()".to_string()),
            ]
        );
    }

    #[test]
    fn test_new_rejects_invalid_definition() {
        let mut def = registry().entity().clone();
        def.title_field = "nope".to_string();
        assert!(EntitySchemaRegistry::new(def).is_err());
    }
}
