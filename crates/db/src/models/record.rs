//! Baseline data-record rows.

use monitor_core::model::BaselineRecord;
use monitor_core::progress::ProgressState;
use monitor_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the data-record table joined with its project's start date.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecordRow {
    pub project_id: DbId,
    pub data_idx: DbId,
    pub src_idx: Option<DbId>,
    pub progress_state: String,
    pub problem_flag: Option<bool>,
    pub problem_reason: Option<String>,
    pub work_object_number: Option<i64>,
    pub work_user_id: Option<DbId>,
    pub check_user_id: Option<DbId>,
    pub work_end_time: Option<Timestamp>,
    pub check_end_time: Option<Timestamp>,
    pub is_deleted: Option<bool>,
    pub project_start_date: Option<Timestamp>,
}

impl From<RecordRow> for BaselineRecord {
    fn from(row: RecordRow) -> Self {
        BaselineRecord {
            project_id: row.project_id,
            data_idx: row.data_idx,
            src_idx: row.src_idx,
            progress_state: ProgressState::parse(&row.progress_state),
            problem_flag: row.problem_flag,
            problem_reason: row.problem_reason,
            work_object_number: row.work_object_number,
            work_user_id: row.work_user_id,
            check_user_id: row.check_user_id,
            work_end_time: row.work_end_time,
            check_end_time: row.check_end_time,
            is_deleted: row.is_deleted,
            project_start_date: row.project_start_date,
        }
    }
}
