//! Type definitions for entity configuration.
//!
//! These types mirror the structure of the entity YAML file and are
//! consumed by the registry, storage and validation projections.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Implicit columns every generated table carries.
///
/// They are valid sort targets even though they are not declared as fields.
pub const SYSTEM_COLUMNS: &[&str] = &["id", "created_at", "updated_at"];

/// Field type in entity definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Text,
    RichText,
    Number,
    Currency,
    Date,
    Datetime,
    Boolean,
    Select,
    MultiSelect,
    Tags,
    Url,
    Email,
}

impl FieldType {
    /// All field types, in declaration order.
    pub const ALL: [FieldType; 12] = [
        FieldType::Text,
        FieldType::RichText,
        FieldType::Number,
        FieldType::Currency,
        FieldType::Date,
        FieldType::Datetime,
        FieldType::Boolean,
        FieldType::Select,
        FieldType::MultiSelect,
        FieldType::Tags,
        FieldType::Url,
        FieldType::Email,
    ];

    /// Configuration spelling of this type (e.g. `multi-select`)
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::RichText => "rich-text",
            FieldType::Number => "number",
            FieldType::Currency => "currency",
            FieldType::Date => "date",
            FieldType::Datetime => "datetime",
            FieldType::Boolean => "boolean",
            FieldType::Select => "select",
            FieldType::MultiSelect => "multi-select",
            FieldType::Tags => "tags",
            FieldType::Url => "url",
            FieldType::Email => "email",
        }
    }

    /// Whether fields of this type must carry an options list
    pub fn takes_options(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::MultiSelect)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown field type: {}", s))
    }
}

/// Scalar default value for a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Bool(b) => write!(f, "{}", b),
            DefaultValue::Int(i) => write!(f, "{}", i),
            DefaultValue::Float(fl) => write!(f, "{}", fl),
            DefaultValue::String(s) => write!(f, "{:?}", s),
        }
    }
}

/// Field definition in entity YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDef {
    /// Field name, also the storage column key
    pub name: String,
    /// Display label
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    /// Allowed values (select and multi-select only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<DefaultValue>,
    /// Absent means shown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_in_list: Option<bool>,
    /// Absent means shown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_in_form: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldDef {
    /// Create a field with no options, no default and default visibility
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            field_type,
            required: false,
            options: None,
            default_value: None,
            show_in_list: None,
            show_in_form: None,
            placeholder: None,
            description: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_default(mut self, value: DefaultValue) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn hidden_in_list(mut self) -> Self {
        self.show_in_list = Some(false);
        self
    }

    pub fn hidden_in_form(mut self) -> Self {
        self.show_in_form = Some(false);
        self
    }

    pub fn is_listed(&self) -> bool {
        self.show_in_list != Some(false)
    }

    pub fn is_in_form(&self) -> bool {
        self.show_in_form != Some(false)
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Default ordering of list views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

/// Entity definition from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityDef {
    pub name: String,
    pub plural_name: String,
    /// URL-safe identifier, also the source of the table name
    pub slug: String,
    /// Opaque icon identifier for UI consumers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Entity fields, in display order
    pub fields: Vec<FieldDef>,
    pub title_field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_field: Option<String>,
    pub default_sort: SortSpec,
    #[serde(default)]
    pub allow_create: bool,
    #[serde(default)]
    pub allow_edit: bool,
    #[serde(default)]
    pub allow_delete: bool,
    #[serde(default)]
    pub allow_export: bool,
}

/// Wrapper for entity YAML structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EntitySpec {
    pub entity: EntityDef,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_parses_config_spelling() {
        assert_eq!("multi-select".parse::<FieldType>(), Ok(FieldType::MultiSelect));
        assert_eq!("rich-text".parse::<FieldType>(), Ok(FieldType::RichText));
        assert!("richtext".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_field_type_spelling_matches_serde() {
        for field_type in FieldType::ALL {
            let yaml = serde_yaml::to_string(&field_type).unwrap();
            assert_eq!(yaml.trim(), field_type.as_str());
        }
    }

    #[test]
    fn test_field_visibility_defaults_to_shown() {
        let field = FieldDef::new("title", "Title", FieldType::Text);
        assert!(field.is_listed());
        assert!(field.is_in_form());

        let hidden = field.hidden_in_list();
        assert!(!hidden.is_listed());
        assert!(hidden.is_in_form());
    }

    #[test]
    fn test_entity_def_from_yaml() {
        let yaml = r#"
entity:
  name: Note
  plural_name: Notes
  slug: notes
  fields:
    - name: title
      label: Title
      type: text
      required: true
    - name: status
      label: Status
      type: select
      options: [draft, published]
      default_value: draft
      show_in_list: false
  title_field: title
  default_sort:
    field: created_at
    direction: desc
  allow_create: true
"#;
        let spec: EntitySpec = serde_yaml::from_str(yaml).unwrap();
        let entity = spec.entity;

        assert_eq!(entity.slug, "notes");
        assert_eq!(entity.fields.len(), 2);
        assert_eq!(entity.fields[1].field_type, FieldType::Select);
        assert_eq!(
            entity.fields[1].default_value,
            Some(DefaultValue::String("draft".to_string()))
        );
        assert_eq!(entity.default_sort.direction, SortDirection::Desc);
        assert!(entity.allow_create);
        assert!(!entity.allow_export);
    }

    #[test]
    fn test_unknown_field_type_is_rejected_by_loader_types() {
        let yaml = "name: x\nlabel: X\ntype: colour\n";
        assert!(serde_yaml::from_str::<FieldDef>(yaml).is_err());
    }
}
