use rusqlite::types::ValueRef;
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::{
    cell::RefCell,
    fmt,
    path::{Path, PathBuf},
    rc::Rc,
};
use tracing::{debug, info};

use crate::error::{ConnectorError, Result};
use crate::statement;
use crate::types::{SqlType, TypeToken};

/// Core value types for SQLite operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    Boolean(bool),
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Blob(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(r) => Value::Real(r),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        }
    }
}

/// Column values for one insert, kept in the order they were added
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RowValues {
    values: Vec<(String, Value)>,
}

impl RowValues {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }
    /// Add a named value
    pub fn with_value(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.values.push((name.to_string(), value.into()));
        self
    }
    pub fn iter(&self) -> impl Iterator<Item = &(String, Value)> {
        self.values.iter()
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One column definition clause: the name followed by its tokens
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    pub tokens: Vec<TypeToken>,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tokens: Vec::new(),
        }
    }
    pub fn with_token(mut self, token: impl Into<TypeToken>) -> Self {
        self.tokens.push(token.into());
        self
    }
    pub fn with_tokens<T: Into<TypeToken>>(mut self, tokens: impl IntoIterator<Item = T>) -> Self {
        self.tokens.extend(tokens.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens = self
            .tokens
            .iter()
            .map(TypeToken::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{} {}", self.name, tokens)
    }
}

/// SQLite connector configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// Path to the SQLite database file, `:memory:` for a private in-memory database
    pub db_path: PathBuf,
    /// Reject table and column names outside `[A-Za-z_][A-Za-z0-9_]*`
    pub strict_identifiers: bool,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(":memory:"),
            strict_identifiers: false,
        }
    }
}

impl SqliteConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Self::default()
        }
    }
    pub fn with_strict_identifiers(mut self, strict: bool) -> Self {
        self.strict_identifiers = strict;
        self
    }
}

/// `None` once the database is closed.
type SharedConnection = Rc<RefCell<Option<Connection>>>;

/// Fails with [`ConnectorError::ConnectionClosed`] before `f` runs, so a closed
/// connection takes precedence over any other error `f` could report.
fn with_connection<T>(
    connection: &SharedConnection,
    f: impl FnOnce(&Connection) -> Result<T>,
) -> Result<T> {
    let guard = connection.borrow();
    let conn = guard.as_ref().ok_or(ConnectorError::ConnectionClosed)?;
    f(conn)
}

// Connections stay in autocommit mode, so every statement commits on its own.
fn execute(conn: &Connection, sql: &str) -> Result<usize> {
    debug!(%sql, "executing statement");
    Ok(conn.execute(sql, [])?)
}

fn check_identifier(strict: bool, name: &str) -> Result<()> {
    if strict && !statement::is_valid_identifier(name) {
        return Err(ConnectorError::InvalidIdentifier(name.to_string()));
    }
    Ok(())
}

/// An open SQLite database.
///
/// Every [`Table`] created through a `Database` shares its connection, so
/// closing the database invalidates them all. Neither type is `Send`.
#[derive(Debug)]
pub struct Database {
    connection: SharedConnection,
    config: SqliteConfig,
}

impl Database {
    /// Open or create the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(SqliteConfig::new(path.as_ref()))
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::open_with_config(SqliteConfig::default())
    }

    pub fn open_with_config(config: SqliteConfig) -> Result<Self> {
        let connection = Connection::open(&config.db_path)?;
        info!(path = %config.db_path.display(), "opened sqlite database");
        Ok(Self {
            connection: Rc::new(RefCell::new(Some(connection))),
            config,
        })
    }

    /// Drop any table called `table_name` and create it anew with `columns`.
    ///
    /// An empty `columns` creates a single placeholder column `None NULL`.
    pub fn create_table(&self, table_name: &str, columns: Vec<ColumnSpec>) -> Result<Table> {
        Table::declare(self, table_name, columns)
    }

    /// Close the connection. Later calls on this database or its tables fail
    /// with [`ConnectorError::ConnectionClosed`]. If SQLite refuses to close,
    /// the connection stays open and the engine error is returned.
    pub fn close(&self) -> Result<()> {
        let connection = self
            .connection
            .borrow_mut()
            .take()
            .ok_or(ConnectorError::ConnectionClosed)?;
        if let Err((connection, err)) = connection.close() {
            *self.connection.borrow_mut() = Some(connection);
            return Err(err.into());
        }
        info!(path = %self.config.db_path.display(), "closed sqlite database");
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.connection.borrow().is_none()
    }

    pub fn path(&self) -> &Path {
        &self.config.db_path
    }

    pub fn config(&self) -> &SqliteConfig {
        &self.config
    }
}

/// A declared table. Holds the name and the columns it was declared with;
/// rows live only in SQLite.
#[derive(Debug)]
pub struct Table {
    connection: SharedConnection,
    strict_identifiers: bool,
    name: String,
    columns: Vec<ColumnSpec>,
}

impl Table {
    fn declare(database: &Database, name: &str, columns: Vec<ColumnSpec>) -> Result<Self> {
        let columns = if columns.is_empty() {
            vec![ColumnSpec::new("None").with_token(SqlType::Null)]
        } else {
            columns
        };
        let strict = database.config.strict_identifiers;

        with_connection(&database.connection, |conn| {
            check_identifier(strict, name)?;
            for column in &columns {
                check_identifier(strict, &column.name)?;
            }
            execute(conn, &statement::drop_table(name))?;
            execute(conn, &statement::create_table(name, &columns))?;
            Ok(())
        })?;
        info!(table = %name, columns = columns.len(), "declared table");

        Ok(Self {
            connection: Rc::clone(&database.connection),
            strict_identifiers: strict,
            name: name.to_string(),
            columns,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Columns as declared, including the placeholder for an empty declaration.
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Insert one row. Values are not checked against the declared columns;
    /// SQLite's own errors come back as [`ConnectorError::Engine`].
    pub fn insert(&self, values: &RowValues) -> Result<()> {
        with_connection(&self.connection, |conn| {
            for (column, _) in values.iter() {
                check_identifier(self.strict_identifiers, column)?;
            }
            execute(conn, &statement::insert(&self.name, values))?;
            Ok(())
        })
    }

    /// Every row in storage order, fields in column order.
    pub fn fetch_all(&self) -> Result<Vec<Vec<Value>>> {
        with_connection(&self.connection, |conn| {
            let sql = statement::select_all(&self.name);
            debug!(%sql, "executing statement");
            let mut stmt = conn.prepare(&sql)?;
            let column_count = stmt.column_count();
            let rows = stmt
                .query_map([], |row| {
                    (0..column_count)
                        .map(|i| row.get_ref(i).map(Value::from))
                        .collect::<rusqlite::Result<Vec<_>>>()
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    /// Catalog entry for the type `column` was declared with.
    pub fn column_type(&self, column: &str) -> Result<SqlType> {
        let raw: Option<String> = with_connection(&self.connection, |conn| {
            check_identifier(self.strict_identifiers, column)?;
            let sql = statement::column_type(&self.name, column);
            debug!(%sql, "executing statement");
            Ok(conn.query_row(&sql, [], |row| row.get(0)).optional()?)
        })?;
        match raw {
            Some(raw) => SqlType::lookup(&raw),
            None => Err(ConnectorError::ColumnNotFound {
                table: self.name.clone(),
                column: column.to_string(),
            }),
        }
    }
}
