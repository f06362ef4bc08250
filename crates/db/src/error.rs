use monitor_core::CoreError;

/// Postgres SQLSTATE for a reference to a column that does not exist.
const UNDEFINED_COLUMN: &str = "42703";

/// Postgres SQLSTATE for a reference to a table that does not exist.
const UNDEFINED_TABLE: &str = "42P01";

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A source table does not have the shape the report reads.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Query(sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    /// Missing or mistyped columns become [`CoreError::Schema`]; everything
    /// else stays a query failure.
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::ColumnNotFound(column) => {
                DbError::Core(CoreError::Schema(format!("column not found: {column}")))
            }
            sqlx::Error::ColumnDecode { index, source } => DbError::Core(CoreError::Schema(
                format!("column {index} has an incompatible type: {source}"),
            )),
            sqlx::Error::Database(db_err)
                if matches!(
                    db_err.code().as_deref(),
                    Some(UNDEFINED_COLUMN) | Some(UNDEFINED_TABLE)
                ) =>
            {
                DbError::Core(CoreError::Schema(db_err.message().to_string()))
            }
            other => DbError::Query(other),
        }
    }
}
