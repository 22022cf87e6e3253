//! Naming and quoting helpers shared by the storage and validation projections.

use convert_case::{Case, Casing};
use regex::Regex;
use std::sync::LazyLock;

/// Convert a string to snake_case
pub fn to_snake_case(s: &str) -> String {
    s.to_case(Case::Snake)
}

/// Table name for an entity slug (`saved-reports` -> `saved_reports`)
pub fn table_name(slug: &str) -> String {
    to_snake_case(slug)
}

/// Quote a string as a SQL literal
pub fn sql_string_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Words PostgreSQL reserves outright; they cannot be bare column or table names
pub const SQL_RESERVED_WORDS: &[&str] = &[
    "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "asymmetric", "both",
    "case", "cast", "check", "collate", "column", "constraint", "create", "current_catalog",
    "current_date", "current_role", "current_time", "current_timestamp", "current_user",
    "default", "deferrable", "desc", "distinct", "do", "else", "end", "except", "false",
    "fetch", "for", "foreign", "from", "grant", "group", "having", "in", "initially",
    "intersect", "into", "lateral", "leading", "limit", "localtime", "localtimestamp", "not",
    "null", "offset", "on", "only", "or", "order", "placing", "primary", "references",
    "returning", "select", "session_user", "some", "symmetric", "system_user", "table", "then",
    "to", "trailing", "true", "union", "unique", "user", "using", "variadic", "when", "where",
    "window", "with",
];

/// Longest identifier PostgreSQL keeps without truncation
pub const MAX_IDENTIFIER_LEN: usize = 63;

static IDENTIFIER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").expect("valid identifier pattern"));

/// Whether `name` can be used unquoted as a column or table name
pub fn is_sql_identifier(name: &str) -> bool {
    name.len() <= MAX_IDENTIFIER_LEN
        && IDENTIFIER_PATTERN.is_match(name)
        && !SQL_RESERVED_WORDS.contains(&name)
}

/// Text safe to place after `--` on a single SQL comment line
pub fn sql_comment_text(s: &str) -> String {
    s.chars().map(|c| if c.is_control() { ' ' } else { c }).collect()
}

/// Quote a string for a single-quoted rule expression
pub fn rule_string_literal(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}
