use monitor_core::CoreError;
use monitor_db::DbError;

/// Failure of a report run.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Configuration or schema problem in the inputs.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<sqlx::Error> for ReportError {
    fn from(err: sqlx::Error) -> Self {
        ReportError::Db(DbError::from(err))
    }
}
