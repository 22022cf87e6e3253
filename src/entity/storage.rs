//! Storage schema projection.
//!
//! Maps field types to PostgreSQL column types and emits the `CREATE TABLE`
//! statement for an entity.

use crate::entity::registry::EntitySchemaRegistry;
use crate::entity::types::{DefaultValue, FieldDef, FieldType};
use crate::utils::{sql_comment_text, sql_string_literal, table_name};
use std::io::{self, Write};

/// Token used for anything without a more specific column type
pub const GENERIC_STORAGE_TYPE: &str = "TEXT";

/// Column type for a field type.
pub fn field_type_to_storage_type(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Text
        | FieldType::RichText
        | FieldType::Select
        | FieldType::Url
        | FieldType::Email => GENERIC_STORAGE_TYPE,
        FieldType::Number => "INTEGER",
        FieldType::Currency => "NUMERIC(10,2)",
        FieldType::Date => "DATE",
        FieldType::Datetime => "TIMESTAMPTZ",
        FieldType::Boolean => "BOOLEAN DEFAULT FALSE",
        FieldType::MultiSelect | FieldType::Tags => "TEXT[]",
    }
}

/// Column type for a raw type name.
///
/// Unrecognised names map to [`GENERIC_STORAGE_TYPE`] instead of failing.
pub fn storage_type_for_name(type_name: &str) -> &'static str {
    match type_name.parse::<FieldType>() {
        Ok(field_type) => field_type_to_storage_type(field_type),
        Err(_) => {
            tracing::debug!("Unknown field type '{}', storing as {}", type_name, GENERIC_STORAGE_TYPE);
            GENERIC_STORAGE_TYPE
        }
    }
}

/// Column definition for one field (without trailing comma)
pub fn column_definition(field: &FieldDef) -> String {
    let not_null = if field.required { " NOT NULL" } else { "" };

    match (&field.default_value, field.field_type) {
        (Some(value), FieldType::Boolean) => {
            format!("{} BOOLEAN{} DEFAULT {}", field.name, not_null, sql_default(value))
        }
        (Some(value), field_type) => format!(
            "{} {}{} DEFAULT {}",
            field.name,
            field_type_to_storage_type(field_type),
            not_null,
            sql_default(value)
        ),
        (None, field_type) => format!(
            "{} {}{}",
            field.name,
            field_type_to_storage_type(field_type),
            not_null
        ),
    }
}

fn sql_default(value: &DefaultValue) -> String {
    match value {
        DefaultValue::Bool(true) => "TRUE".to_string(),
        DefaultValue::Bool(false) => "FALSE".to_string(),
        DefaultValue::Int(i) => i.to_string(),
        DefaultValue::Float(f) => f.to_string(),
        DefaultValue::String(s) => sql_string_literal(s),
    }
}

/// Generate the `CREATE TABLE` statement for an entity, followed by an
/// index supporting its default sort.
pub fn create_table_sql(registry: &EntitySchemaRegistry) -> String {
    let entity = registry.entity();
    let table = table_name(&entity.slug);

    let mut columns = vec!["id UUID PRIMARY KEY DEFAULT gen_random_uuid()".to_string()];
    columns.extend(entity.fields.iter().map(column_definition));
    columns.push("created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()".to_string());
    columns.push("updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()".to_string());

    let mut sql = format!(
        "-- {} ({})\n",
        sql_comment_text(&entity.name),
        sql_comment_text(&entity.plural_name)
    );
    sql.push_str(&format!("CREATE TABLE IF NOT EXISTS {} (\n", table));
    sql.push_str(
        &columns
            .iter()
            .map(|c| format!("    {}", c))
            .collect::<Vec<_>>()
            .join(",\n"),
    );
    sql.push_str("\n);\n");

    let sort = &entity.default_sort;
    if sort.field != "id" {
        sql.push_str(&format!(
            "CREATE INDEX IF NOT EXISTS idx_{}_{} ON {} ({} {});\n",
            table,
            sort.field,
            table,
            sort.field,
            sort.direction.as_sql()
        ));
    }

    sql
}

/// Write the schema for an entity to `output`
pub fn write_schema<W: Write>(registry: &EntitySchemaRegistry, output: &mut W) -> io::Result<()> {
    writeln!(output, "-- @generated by tenantcfg\n")?;
    output.write_all(create_table_sql(registry).as_bytes())?;
    Ok(())
}
