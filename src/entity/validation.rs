//! Validation rule projection.
//!
//! Each field maps to a [`ValidationRule`]. Its `Display` form is the rule
//! expression handed to the form layer (`z.string().email().optional()`),
//! and [`ValidationRule::check`] evaluates the same rule against a submitted
//! JSON value.

use crate::entity::types::{FieldDef, FieldType};
use crate::utils::rule_string_literal;
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Enumeration used for a select field that reached rule generation
/// without options.
pub const PLACEHOLDER_OPTION: &str = "draft";

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^\s/?#]+(?:[/?#]\S*)?$").expect("valid url pattern")
});

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@(?:[A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("valid email pattern")
});

/// Base constraint of a rule, before optionality is applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseRule {
    String,
    /// Numbers, booleans and numeric strings
    CoercedNumber,
    Boolean,
    Url,
    Email,
    /// One of a fixed set of strings
    Enum(Vec<String>),
    StringArray,
}

/// Validation rule for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRule {
    pub base: BaseRule,
    /// When true an absent value is accepted
    pub optional: bool,
}

/// Why a value was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Value is required")]
    Missing,
    #[error("Expected {expected}")]
    WrongType { expected: &'static str },
    #[error("Invalid url: {0}")]
    InvalidUrl(String),
    #[error("Invalid email: {0}")]
    InvalidEmail(String),
    #[error("'{value}' is not one of {allowed:?}")]
    NotAnOption { value: String, allowed: Vec<String> },
}

/// Build the validation rule for a field.
pub fn field_type_to_validation_rule(field: &FieldDef) -> ValidationRule {
    let base = match field.field_type {
        FieldType::Text | FieldType::RichText | FieldType::Date | FieldType::Datetime => {
            BaseRule::String
        }
        FieldType::Number | FieldType::Currency => BaseRule::CoercedNumber,
        FieldType::Boolean => BaseRule::Boolean,
        FieldType::Select => match field.options.as_ref().filter(|o| !o.is_empty()) {
            Some(options) => BaseRule::Enum(options.clone()),
            None => {
                tracing::warn!(
                    "Select field '{}' has no options, using placeholder enumeration",
                    field.name
                );
                BaseRule::Enum(vec![PLACEHOLDER_OPTION.to_string()])
            }
        },
        FieldType::MultiSelect | FieldType::Tags => BaseRule::StringArray,
        FieldType::Url => BaseRule::Url,
        FieldType::Email => BaseRule::Email,
    };

    ValidationRule {
        base,
        optional: !field.required,
    }
}

impl BaseRule {
    /// Check a present value against the base constraint
    pub fn check(&self, value: &Value) -> Result<(), ValidationError> {
        match self {
            BaseRule::String => expect_str(value, "a string").map(|_| ()),
            BaseRule::CoercedNumber => match value {
                Value::Number(_) | Value::Bool(_) => Ok(()),
                Value::String(s) => match s.trim().parse::<f64>() {
                    Ok(n) if n.is_finite() => Ok(()),
                    _ => Err(ValidationError::WrongType { expected: "a number" }),
                },
                _ => Err(ValidationError::WrongType { expected: "a number" }),
            },
            BaseRule::Boolean => match value {
                Value::Bool(_) => Ok(()),
                _ => Err(ValidationError::WrongType { expected: "a boolean" }),
            },
            BaseRule::Url => {
                let s = expect_str(value, "a string")?;
                if URL_PATTERN.is_match(s) {
                    Ok(())
                } else {
                    Err(ValidationError::InvalidUrl(s.to_string()))
                }
            }
            BaseRule::Email => {
                let s = expect_str(value, "a string")?;
                if is_email(s) {
                    Ok(())
                } else {
                    Err(ValidationError::InvalidEmail(s.to_string()))
                }
            }
            BaseRule::Enum(allowed) => {
                let s = expect_str(value, "a string")?;
                if allowed.iter().any(|o| o == s) {
                    Ok(())
                } else {
                    Err(ValidationError::NotAnOption {
                        value: s.to_string(),
                        allowed: allowed.clone(),
                    })
                }
            }
            BaseRule::StringArray => match value {
                Value::Array(items) if items.iter().all(Value::is_string) => Ok(()),
                _ => Err(ValidationError::WrongType { expected: "an array of strings" }),
            },
        }
    }
}

fn expect_str<'a>(value: &'a Value, expected: &'static str) -> Result<&'a str, ValidationError> {
    value
        .as_str()
        .ok_or(ValidationError::WrongType { expected })
}

fn is_email(s: &str) -> bool {
    !s.starts_with('.') && !s.contains("..") && EMAIL_PATTERN.is_match(s)
}

impl ValidationRule {
    /// Check a submitted value. `None` and JSON `null` both count as absent.
    pub fn check(&self, value: Option<&Value>) -> Result<(), ValidationError> {
        match value {
            None | Some(Value::Null) => {
                if self.optional {
                    Ok(())
                } else {
                    Err(ValidationError::Missing)
                }
            }
            Some(v) => self.base.check(v),
        }
    }
}

impl fmt::Display for BaseRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseRule::String => f.write_str("z.string()"),
            BaseRule::CoercedNumber => f.write_str("z.coerce.number()"),
            BaseRule::Boolean => f.write_str("z.boolean()"),
            BaseRule::Url => f.write_str("z.string().url()"),
            BaseRule::Email => f.write_str("z.string().email()"),
            BaseRule::Enum(options) => {
                let quoted: Vec<String> = options.iter().map(|o| rule_string_literal(o)).collect();
                write!(f, "z.enum([{}])", quoted.join(", "))
            }
            BaseRule::StringArray => f.write_str("z.array(z.string())"),
        }
    }
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        if self.optional {
            f.write_str(".optional()")?;
        }
        Ok(())
    }
}
