use thiserror::Error;

/// Every failure surfaced by this crate.
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// The declared type stored by SQLite matches no catalog entry.
    #[error("unknown SQL type: '{0}'")]
    UnknownType(String),

    /// Introspection returned no row for the column.
    #[error("column '{column}' not found in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    #[error("database connection is closed")]
    ConnectionClosed,

    /// Rejected by strict identifier mode.
    #[error("invalid identifier: '{0}'")]
    InvalidIdentifier(String),

    #[error("sqlite error: {0}")]
    Engine(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, ConnectorError>;
