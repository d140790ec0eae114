//! SQL text for every statement the connector runs.
//!
//! Identifiers and text values are interpolated as given. Nothing here quotes
//! or escapes, so names must come from trusted code (see
//! [`SqliteConfig::strict_identifiers`](crate::SqliteConfig)).

use crate::sqlite::{ColumnSpec, RowValues, Value};

pub fn drop_table(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", table)
}

pub fn create_table(table: &str, columns: &[ColumnSpec]) -> String {
    let clauses = columns
        .iter()
        .map(ColumnSpec::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE {}({})", table, clauses)
}

pub fn insert(table: &str, values: &RowValues) -> String {
    let columns = values
        .iter()
        .map(|(column, _)| column.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let literals = values
        .iter()
        .map(|(_, value)| literal(value))
        .collect::<Vec<_>>()
        .join(", ");
    format!("INSERT INTO {}({}) VALUES({})", table, columns, literals)
}

pub fn select_all(table: &str) -> String {
    format!("SELECT * FROM {}", table)
}

pub fn column_type(table: &str, column: &str) -> String {
    format!(
        "SELECT type FROM pragma_table_info('{}') WHERE name == '{}'",
        table, column
    )
}

/// SQL literal for a value. Text is single-quoted verbatim, embedded quotes
/// included.
pub fn literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => format!("{:?}", r),
        Value::Text(s) => format!("'{}'", s),
        Value::Boolean(true) => "TRUE".to_string(),
        Value::Boolean(false) => "FALSE".to_string(),
        Value::Blob(bytes) => {
            let hex: String = bytes.iter().map(|b| format!("{:02X}", b)).collect();
            format!("X'{}'", hex)
        }
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
