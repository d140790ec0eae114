//! Declare, fill and read SQLite tables without hand-writing SQL.
//!
//! # Intention
//!
//! - Describe a table as ordered columns of catalog types and constraints.
//! - Create (replacing any previous table), insert rows, fetch every row back.
//! - Map a column's declared type back to its catalog entry.
//!
//! # Architectural Boundaries
//!
//! - Only `SELECT *`: no WHERE, joins, parameter binding, migrations or pooling.
//! - Table names, column names and text values are interpolated into SQL as
//!   given. They must come from trusted code; `SqliteConfig::strict_identifiers`
//!   rejects unusual names but values are never escaped.
//! - Single-threaded. Every statement autocommits.
//!
//! ```no_run
//! use sqlite_connector::{ColumnSpec, Database, RowValues, SqlType};
//!
//! # fn main() -> sqlite_connector::Result<()> {
//! let db = Database::open("app.db")?;
//! let users = db.create_table(
//!     "users",
//!     vec![
//!         ColumnSpec::new("id").with_tokens([
//!             SqlType::Integer,
//!             SqlType::NotNull,
//!             SqlType::PrimaryKey,
//!         ]),
//!         ColumnSpec::new("name").with_tokens([SqlType::Text, SqlType::NotNull]),
//!     ],
//! )?;
//! users.insert(&RowValues::new().with_value("id", 1).with_value("name", "Ann"))?;
//! let rows = users.fetch_all()?;
//! db.close()?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod sqlite;
pub mod statement;
pub mod types;

pub use error::{ConnectorError, Result};
pub use sqlite::{ColumnSpec, Database, RowValues, SqliteConfig, Table, Value};
pub use types::{Affinity, SqlType, TypeForm, TypeToken};
