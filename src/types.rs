//! SQL type catalog.
//!
//! A closed set of the type names and column constraint keywords accepted in a
//! column definition. Most entries render to a fixed string; a handful take a
//! single argument (`VARCHAR(255)`, `DECIMAL(10,5)`) and fall back to a default
//! when none is given.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{ConnectorError, Result};

/// Storage-class family a declared type maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Affinity {
    Integer,
    Text,
    Blob,
    Real,
    Numeric,
}

/// How a catalog entry renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeForm {
    Fixed(&'static str),
    /// Renders as `name(arg)`, using `default_arg` when no argument is given.
    Parametric {
        name: &'static str,
        default_arg: &'static str,
    },
}

/// Catalog entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    // INTEGER affinity
    Integer,
    Int,
    TinyInt,
    SmallInt,
    MediumInt,
    BigInt,
    UnsignedBigInt,
    Int2,
    Int8,
    // TEXT affinity
    Text,
    Character,
    Varchar,
    VaryingCharacter,
    NChar,
    NativeCharacter,
    NVarchar,
    Clob,
    Char,
    // BLOB affinity
    Blob,
    // REAL affinity
    Real,
    Double,
    DoublePrecision,
    Float,
    // NUMERIC affinity
    Numeric,
    Decimal,
    Boolean,
    Date,
    DateTime,
    Uuid,
    Array,
    Json,
    // Column constraints
    Null,
    NotNull,
    PrimaryKey,
}

impl SqlType {
    pub const ALL: [SqlType; 34] = [
        SqlType::Integer,
        SqlType::Int,
        SqlType::TinyInt,
        SqlType::SmallInt,
        SqlType::MediumInt,
        SqlType::BigInt,
        SqlType::UnsignedBigInt,
        SqlType::Int2,
        SqlType::Int8,
        SqlType::Text,
        SqlType::Character,
        SqlType::Varchar,
        SqlType::VaryingCharacter,
        SqlType::NChar,
        SqlType::NativeCharacter,
        SqlType::NVarchar,
        SqlType::Clob,
        SqlType::Char,
        SqlType::Blob,
        SqlType::Real,
        SqlType::Double,
        SqlType::DoublePrecision,
        SqlType::Float,
        SqlType::Numeric,
        SqlType::Decimal,
        SqlType::Boolean,
        SqlType::Date,
        SqlType::DateTime,
        SqlType::Uuid,
        SqlType::Array,
        SqlType::Json,
        SqlType::Null,
        SqlType::NotNull,
        SqlType::PrimaryKey,
    ];

    pub const fn form(self) -> TypeForm {
        use TypeForm::{Fixed, Parametric};
        match self {
            SqlType::Integer => Fixed("INTEGER"),
            SqlType::Int => Fixed("INT"),
            SqlType::TinyInt => Fixed("TINYINT"),
            SqlType::SmallInt => Fixed("SMALLINT"),
            SqlType::MediumInt => Fixed("MEDIUMINT"),
            SqlType::BigInt => Fixed("BIGINT"),
            SqlType::UnsignedBigInt => Fixed("UNSIGNED BIG INT"),
            SqlType::Int2 => Fixed("INT2"),
            SqlType::Int8 => Fixed("INT8"),
            SqlType::Text => Fixed("TEXT"),
            SqlType::Character => Parametric {
                name: "CHARACTER",
                default_arg: "20",
            },
            SqlType::Varchar => Parametric {
                name: "VARCHAR",
                default_arg: "255",
            },
            SqlType::VaryingCharacter => Parametric {
                name: "VARYINGCHARACTER",
                default_arg: "255",
            },
            SqlType::NChar => Parametric {
                name: "NCHAR",
                default_arg: "55",
            },
            SqlType::NativeCharacter => Parametric {
                name: "NATIVECHARACTER",
                default_arg: "70",
            },
            SqlType::NVarchar => Parametric {
                name: "NVARCHAR",
                default_arg: "100",
            },
            SqlType::Clob => Fixed("CLOB"),
            SqlType::Char => Fixed("CHAR"),
            SqlType::Blob => Fixed("BLOB"),
            SqlType::Real => Fixed("REAL"),
            SqlType::Double => Fixed("DOUBLE"),
            SqlType::DoublePrecision => Fixed("DOUBLE PRECISION"),
            SqlType::Float => Fixed("FLOAT"),
            SqlType::Numeric => Fixed("NUMERIC"),
            SqlType::Decimal => Parametric {
                name: "DECIMAL",
                default_arg: "10,5",
            },
            SqlType::Boolean => Fixed("BOOLEAN"),
            SqlType::Date => Fixed("DATE"),
            SqlType::DateTime => Fixed("DATETIME"),
            SqlType::Uuid => Fixed("UUID"),
            SqlType::Array => Fixed("ARRAY"),
            SqlType::Json => Fixed("JSON"),
            SqlType::Null => Fixed("NULL"),
            SqlType::NotNull => Fixed("NOT NULL"),
            SqlType::PrimaryKey => Fixed("PRIMARY KEY"),
        }
    }

    /// Catalog name: the full text of a fixed entry, the bare name of a
    /// parametric one.
    pub fn name(self) -> &'static str {
        match self.form() {
            TypeForm::Fixed(text) => text,
            TypeForm::Parametric { name, .. } => name,
        }
    }

    pub fn default_arg(self) -> Option<&'static str> {
        match self.form() {
            TypeForm::Fixed(_) => None,
            TypeForm::Parametric { default_arg, .. } => Some(default_arg),
        }
    }

    pub fn is_parametric(self) -> bool {
        matches!(self.form(), TypeForm::Parametric { .. })
    }

    /// Render the SQL fragment. Fixed entries ignore `arg`.
    pub fn render(self, arg: Option<&str>) -> String {
        match self.form() {
            TypeForm::Fixed(text) => text.to_string(),
            TypeForm::Parametric { name, default_arg } => {
                format!("{}({})", name, arg.unwrap_or(default_arg))
            }
        }
    }

    /// Token for a parametric entry with an explicit argument.
    pub fn with_arg(self, arg: &str) -> TypeToken {
        TypeToken(self.render(Some(arg)))
    }

    /// Affinity SQLite assigns to a column declared with this entry, `None`
    /// for constraint keywords.
    pub fn affinity(self) -> Option<Affinity> {
        use SqlType::*;
        match self {
            Integer | Int | TinyInt | SmallInt | MediumInt | BigInt | UnsignedBigInt | Int2
            | Int8 => Some(Affinity::Integer),
            Text | Character | Varchar | VaryingCharacter | NChar | NativeCharacter | NVarchar
            | Clob | Char => Some(Affinity::Text),
            Blob => Some(Affinity::Blob),
            Real | Double | DoublePrecision | Float => Some(Affinity::Real),
            Numeric | Decimal | Boolean | Date | DateTime | Uuid | Array | Json => {
                Some(Affinity::Numeric)
            }
            Null | NotNull | PrimaryKey => None,
        }
    }

    /// Resolve a declared type string, as reported by `pragma_table_info`, back
    /// to its catalog entry.
    ///
    /// Matching is exact and case-sensitive. A parametric entry also matches
    /// with one non-empty parenthesized argument, e.g. `VARCHAR(64)`.
    pub fn lookup(raw: &str) -> Result<SqlType> {
        let names = catalog();
        if let Some(sql_type) = names.get(raw) {
            return Ok(*sql_type);
        }
        if let Some((name, arg)) = raw
            .split_once('(')
            .and_then(|(name, rest)| Some((name, rest.strip_suffix(')')?)))
        {
            let well_formed = !arg.is_empty() && !arg.contains(['(', ')']);
            if let Some(sql_type) = names.get(name).filter(|t| well_formed && t.is_parametric()) {
                return Ok(*sql_type);
            }
        }
        Err(ConnectorError::UnknownType(raw.to_string()))
    }
}

fn catalog() -> &'static HashMap<&'static str, SqlType> {
    static CATALOG: OnceLock<HashMap<&'static str, SqlType>> = OnceLock::new();
    CATALOG.get_or_init(|| SqlType::ALL.iter().map(|t| (t.name(), *t)).collect())
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(None))
    }
}

/// One fragment of a column definition: a rendered catalog entry, or any
/// caller-supplied text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeToken(String);

impl TypeToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<SqlType> for TypeToken {
    fn from(sql_type: SqlType) -> Self {
        Self(sql_type.render(None))
    }
}

impl From<&str> for TypeToken {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for TypeToken {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parametric_defaults_match_explicit_argument() {
        for sql_type in SqlType::ALL.into_iter().filter(|t| t.is_parametric()) {
            let default_arg = sql_type.default_arg().unwrap();
            assert_eq!(sql_type.render(None), sql_type.render(Some(default_arg)));
        }
        assert_eq!(SqlType::Character.render(None), "CHARACTER(20)");
        assert_eq!(SqlType::Varchar.render(None), "VARCHAR(255)");
        assert_eq!(SqlType::VaryingCharacter.render(None), "VARYINGCHARACTER(255)");
        assert_eq!(SqlType::NChar.render(None), "NCHAR(55)");
        assert_eq!(SqlType::NativeCharacter.render(None), "NATIVECHARACTER(70)");
        assert_eq!(SqlType::NVarchar.render(None), "NVARCHAR(100)");
        assert_eq!(SqlType::Decimal.render(None), "DECIMAL(10,5)");
    }

    #[test]
    fn fixed_entries_ignore_argument() {
        assert_eq!(SqlType::UnsignedBigInt.render(Some("8")), "UNSIGNED BIG INT");
        assert_eq!(SqlType::NotNull.to_string(), "NOT NULL");
        assert_eq!(SqlType::PrimaryKey.to_string(), "PRIMARY KEY");
        assert_eq!(SqlType::DoublePrecision.default_arg(), None);
    }

    #[test]
    fn with_arg_renders_explicit_argument() {
        assert_eq!(SqlType::Varchar.with_arg("64").as_str(), "VARCHAR(64)");
        assert_eq!(SqlType::Decimal.with_arg("8,2").to_string(), "DECIMAL(8,2)");
    }

    #[test]
    fn catalog_names_are_unique() {
        assert_eq!(catalog().len(), SqlType::ALL.len());
    }

    #[test]
    fn lookup_resolves_every_entry_by_name() {
        for sql_type in SqlType::ALL {
            assert_eq!(SqlType::lookup(sql_type.name()).unwrap(), sql_type);
            assert_eq!(SqlType::lookup(&sql_type.to_string()).unwrap(), sql_type);
        }
    }

    #[test]
    fn lookup_accepts_parametric_with_any_argument() {
        assert_eq!(SqlType::lookup("VARCHAR(64)").unwrap(), SqlType::Varchar);
        assert_eq!(SqlType::lookup("DECIMAL(8,2)").unwrap(), SqlType::Decimal);
    }

    #[test]
    fn lookup_rejects_unknown_names() {
        let malformed = ["VARCHAR()", "VARCHAR(12", "VARCHAR(6)(7)", "DECIMAL(10,5))"];
        let unknown = ["", "text", "STRING", "TEXT(10)", "NOT"];
        for raw in unknown.into_iter().chain(malformed) {
            match SqlType::lookup(raw) {
                Err(ConnectorError::UnknownType(name)) => assert_eq!(name, raw),
                other => panic!("expected UnknownType for '{raw}', got {other:?}"),
            }
        }
    }

    #[test]
    fn affinity_follows_type_family() {
        assert_eq!(SqlType::UnsignedBigInt.affinity(), Some(Affinity::Integer));
        assert_eq!(SqlType::NVarchar.affinity(), Some(Affinity::Text));
        assert_eq!(SqlType::Blob.affinity(), Some(Affinity::Blob));
        assert_eq!(SqlType::DoublePrecision.affinity(), Some(Affinity::Real));
        assert_eq!(SqlType::Decimal.affinity(), Some(Affinity::Numeric));
        assert_eq!(SqlType::Json.affinity(), Some(Affinity::Numeric));
        assert_eq!(SqlType::PrimaryKey.affinity(), None);
    }
}
