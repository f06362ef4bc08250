//! Loads the source snapshot for a run.

use std::path::Path;

use monitor_core::config::ReportConfig;
use monitor_core::{CoreError, SourceSnapshot};

use crate::config::SourceSettings;
use crate::error::ReportError;

/// Read the four source tables from wherever `source` points.
pub async fn load(
    source: &SourceSettings,
    config: &ReportConfig,
) -> Result<SourceSnapshot, ReportError> {
    match source {
        SourceSettings::File(path) => load_file(path),
        SourceSettings::Database {
            url,
            max_connections,
        } => {
            let pool = monitor_db::create_pool(url, *max_connections).await?;
            tracing::info!("Database connection pool created");

            monitor_db::health_check(&pool).await?;
            tracing::debug!("Database health check passed");

            let snapshot = monitor_db::load_snapshot(&pool, config).await?;
            pool.close().await;
            Ok(snapshot)
        }
    }
}

/// Read a JSON snapshot document.
///
/// A file that is not valid JSON is a schema error, same as a missing column.
pub fn load_file(path: &Path) -> Result<SourceSnapshot, ReportError> {
    let contents = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&contents)
        .map_err(|e| CoreError::Schema(format!("{}: {e}", path.display())))?;
    let snapshot = SourceSnapshot::from_json(value)?;
    tracing::info!(
        path = %path.display(),
        edit_events = snapshot.edit_events.len(),
        records = snapshot.records.len(),
        members = snapshot.members.len(),
        projects = snapshot.projects.len(),
        "Loaded snapshot file"
    );
    Ok(snapshot)
}
