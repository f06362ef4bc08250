//! Input rows read from the source snapshots.
//!
//! Nullable columns are `Option`s. Column presence is checked separately by
//! [`crate::schema`], since a missing nullable column would otherwise
//! deserialize as `None`.

use serde::{Deserialize, Serialize};

use crate::key::RawDataId;
use crate::progress::ProgressState;
use crate::types::{DbId, Timestamp};

/// `action_kind` value identifying a manual save in the edit log.
pub const ACTION_MANUAL_SAVE: &str = "MANUAL_SAVE";

/// One logged manual-save action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditEvent {
    pub project_id: DbId,
    pub data_id: RawDataId,
    /// Object count as of this save.
    pub object_count: i64,
    pub event_time: Timestamp,
    pub action_kind: String,
    /// Start date of the event's project, used for cohort filtering.
    pub project_start_date: Option<Timestamp>,
}

impl EditEvent {
    pub fn is_manual_save(&self) -> bool {
        self.action_kind == ACTION_MANUAL_SAVE
    }
}

/// The system-of-record state of one unit of annotation work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineRecord {
    pub project_id: DbId,
    pub data_idx: DbId,
    pub src_idx: Option<DbId>,
    pub progress_state: ProgressState,
    pub problem_flag: Option<bool>,
    pub problem_reason: Option<String>,
    /// Object count recorded on the record itself.
    pub work_object_number: Option<i64>,
    pub work_user_id: Option<DbId>,
    pub check_user_id: Option<DbId>,
    pub work_end_time: Option<Timestamp>,
    pub check_end_time: Option<Timestamp>,
    /// Soft-delete flag. `None` counts as not deleted.
    pub is_deleted: Option<bool>,
    pub project_start_date: Option<Timestamp>,
}

impl BaselineRecord {
    /// Only an explicit `true` marks a record as deleted.
    pub fn is_deleted(&self) -> bool {
        self.is_deleted == Some(true)
    }
}

/// A row of the user-profile dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub member_id: DbId,
    pub nickname: Option<String>,
}

/// A row of the project dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: DbId,
    pub project_name: Option<String>,
    pub start_date: Option<Timestamp>,
}
