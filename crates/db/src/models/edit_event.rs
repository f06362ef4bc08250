//! Manual-save log rows.

use monitor_core::key::RawDataId;
use monitor_core::model::EditEvent;
use monitor_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the edit log joined with its project's start date.
///
/// `data_id` is selected as text so that integer and text keys reach the
/// core in one representation and are normalised there.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EditEventRow {
    pub project_id: DbId,
    pub data_id: String,
    pub object_count: i64,
    pub event_time: Timestamp,
    pub action_kind: String,
    pub project_start_date: Option<Timestamp>,
}

impl From<EditEventRow> for EditEvent {
    fn from(row: EditEventRow) -> Self {
        EditEvent {
            project_id: row.project_id,
            data_id: RawDataId::Text(row.data_id),
            object_count: row.object_count,
            event_time: row.event_time,
            action_kind: row.action_kind,
            project_start_date: row.project_start_date,
        }
    }
}
