//! Project dimension rows.

use monitor_core::model::Project;
use monitor_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the project table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectRow {
    pub project_id: DbId,
    pub project_name: Option<String>,
    pub start_date: Option<Timestamp>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            project_id: row.project_id,
            project_name: row.project_name,
            start_date: row.start_date,
        }
    }
}
