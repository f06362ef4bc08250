#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Invalid or empty filter parameters. Raised before any row is read.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A required input column is missing or has an incompatible type.
    #[error("Schema error: {0}")]
    Schema(String),
}
