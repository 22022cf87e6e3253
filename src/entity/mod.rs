//! Entity schema: the declarative description of the managed resource and
//! its projections (list/form fields, storage types, validation rules).

pub mod types;
pub mod registry;
pub mod storage;
pub mod validation;
pub mod loader;

pub use types::{DefaultValue, EntityDef, EntitySpec, FieldDef, FieldType, SortDirection, SortSpec};
pub use registry::EntitySchemaRegistry;
pub use storage::{create_table_sql, field_type_to_storage_type, storage_type_for_name, write_schema};
pub use validation::{field_type_to_validation_rule, BaseRule, ValidationError, ValidationRule};
pub use loader::{entity_from_str, load_entity, validate_entity};
