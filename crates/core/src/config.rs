//! Filter and presentation parameters for one report run.
//!
//! The cohort filter is shared by the resolver and the enricher so the event
//! window and the record window can never drift apart.

use std::collections::BTreeSet;

use chrono_tz::Tz;

use crate::error::CoreError;
use crate::progress::ProgressState;
use crate::types::{DbId, Timestamp};
use crate::window::{EndBound, TimeWindow};

/// Reference operational timezone used when none is configured.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Seoul;

/// Project cohort membership: the project is selected and its start date
/// falls in the closed-open cohort window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CohortFilter {
    pub project_start_window: TimeWindow,
    pub project_ids: BTreeSet<DbId>,
}

impl CohortFilter {
    pub fn new(project_start_window: TimeWindow, project_ids: BTreeSet<DbId>) -> Self {
        Self {
            project_start_window,
            project_ids,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.project_ids.is_empty() {
            return Err(CoreError::Configuration(
                "project_ids must not be empty".to_string(),
            ));
        }
        if self.project_start_window.end_bound != EndBound::Exclusive {
            return Err(CoreError::Configuration(
                "project_start_window must be closed-open".to_string(),
            ));
        }
        self.project_start_window.validate("project_start_window")
    }

    /// Returns `true` when a row of `project_id` started at
    /// `project_start_date` belongs to the cohort. A missing start date is
    /// never in the cohort.
    pub fn admits(&self, project_id: DbId, project_start_date: Option<Timestamp>) -> bool {
        self.project_ids.contains(&project_id)
            && self.project_start_window.contains_opt(project_start_date)
    }
}

/// Every parameter a report run needs. Build it once, validate it once,
/// and hand the same value to each stage.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub cohort: CohortFilter,
    /// Closed window on `check_end_time`.
    pub check_end_window: TimeWindow,
    pub progress_states: BTreeSet<ProgressState>,
    /// Display zone for `modified_time`.
    pub target_timezone: Tz,
    /// Base for `review_link`, without the `/project/monitor` suffix.
    pub link_base_url: String,
    /// Optional allow-list of `data_idx` values selected for verification.
    pub target_data_ids: Option<BTreeSet<DbId>>,
}

impl ReportConfig {
    /// Validate all parameters before any processing begins.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.cohort.validate()?;

        if self.check_end_window.end_bound != EndBound::Inclusive {
            return Err(CoreError::Configuration(
                "check_end_window must be closed on both ends".to_string(),
            ));
        }
        self.check_end_window.validate("check_end_window")?;

        if self.progress_states.is_empty() {
            return Err(CoreError::Configuration(
                "progress_states must not be empty".to_string(),
            ));
        }

        if self.link_base_url.trim().is_empty() {
            return Err(CoreError::Configuration(
                "link_base_url must not be empty".to_string(),
            ));
        }

        if let Some(targets) = &self.target_data_ids {
            if targets.is_empty() {
                return Err(CoreError::Configuration(
                    "target_data_ids was given but contains no ids".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Returns `true` when `data_idx` passes the optional allow-list.
    pub fn is_target(&self, data_idx: DbId) -> bool {
        self.target_data_ids
            .as_ref()
            .map_or(true, |targets| targets.contains(&data_idx))
    }
}
