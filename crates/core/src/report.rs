//! Report assembly: validate, resolve, normalise keys, enrich.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ReportConfig;
use crate::dimension::{MemberDirectory, ProjectDirectory};
use crate::enrich::enrich_with_stats;
use crate::error::CoreError;
use crate::format::ReportRow;
use crate::key::normalize_resolved;
use crate::model::{BaselineRecord, EditEvent, Project, UserProfile};
use crate::resolver::resolve;
use crate::schema::{
    decode_table, BASELINE_RECORD_COLUMNS, BASELINE_RECORD_TABLE, EDIT_EVENT_COLUMNS,
    EDIT_EVENT_TABLE, PROJECT_COLUMNS, PROJECT_TABLE, USER_PROFILE_COLUMNS, USER_PROFILE_TABLE,
};
use crate::types::DbId;

/// Point-in-time copies of the four source tables.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SourceSnapshot {
    pub edit_events: Vec<EditEvent>,
    pub records: Vec<BaselineRecord>,
    pub members: Vec<UserProfile>,
    pub projects: Vec<Project>,
}

/// Raw snapshot document: one array of row objects per table.
#[derive(Debug, Deserialize)]
struct SnapshotDocument {
    edit_events: Vec<Value>,
    records: Vec<Value>,
    members: Vec<Value>,
    #[serde(default)]
    projects: Vec<Value>,
}

impl SourceSnapshot {
    /// Decode a snapshot document, checking every row's columns.
    ///
    /// The `projects` table may be omitted since no report field depends on
    /// it; the other three are required.
    pub fn from_json(value: Value) -> Result<Self, CoreError> {
        let doc: SnapshotDocument = serde_json::from_value(value)
            .map_err(|e| CoreError::Schema(format!("snapshot: {e}")))?;

        Ok(Self {
            edit_events: decode_table(EDIT_EVENT_TABLE, doc.edit_events, EDIT_EVENT_COLUMNS)?,
            records: decode_table(BASELINE_RECORD_TABLE, doc.records, BASELINE_RECORD_COLUMNS)?,
            members: decode_table(USER_PROFILE_TABLE, doc.members, USER_PROFILE_COLUMNS)?,
            projects: decode_table(PROJECT_TABLE, doc.projects, PROJECT_COLUMNS)?,
        })
    }
}

/// Counters describing one report run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub records_scanned: usize,
    pub rows_emitted: usize,
    pub excluded_deleted: usize,
    pub modified_rows: usize,
    pub qualifying_events: usize,
    pub resolved_keys: usize,
    /// Resolved keys, excluding malformed ones, whose winner was picked
    /// among events sharing the latest `event_time`.
    pub tie_breaks: usize,
    pub malformed_keys: usize,
    pub missing_workers: usize,
    pub missing_checkers: usize,
    pub missing_projects: usize,
    /// Allow-listed ids that produced no row.
    pub missing_targets: Vec<DbId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub rows: Vec<ReportRow>,
    pub summary: ReportSummary,
}

/// Build the full report from a snapshot.
///
/// Configuration is validated before any row is touched. Every other
/// condition (lookup misses, tied events, malformed keys) is counted in the
/// summary and never fails the run.
pub fn build_report(snapshot: &SourceSnapshot, config: &ReportConfig) -> Result<Report, CoreError> {
    config.validate()?;

    let resolved = resolve(&snapshot.edit_events, &config.cohort)?;
    let qualifying_events = resolved.qualifying_events;

    let index = normalize_resolved(resolved);
    let members = MemberDirectory::from_profiles(&snapshot.members);
    let projects = ProjectDirectory::from_projects(&snapshot.projects);

    let (rows, stats) = enrich_with_stats(&snapshot.records, &index, &members, &projects, config);

    let missing_targets = match &config.target_data_ids {
        Some(targets) => {
            let present: BTreeSet<DbId> = rows.iter().map(|r| r.data_idx).collect();
            targets.difference(&present).copied().collect()
        }
        None => Vec::new(),
    };
    if !missing_targets.is_empty() {
        tracing::warn!(
            count = missing_targets.len(),
            ids = ?missing_targets,
            "Target data ids produced no report row"
        );
    }

    let summary = ReportSummary {
        records_scanned: stats.records_scanned,
        rows_emitted: stats.rows_emitted,
        excluded_deleted: stats.excluded_deleted,
        modified_rows: stats.modified_rows,
        qualifying_events,
        resolved_keys: index.len(),
        tie_breaks: index.tie_breaks(),
        malformed_keys: index.malformed_keys().len(),
        missing_workers: stats.missing_workers,
        missing_checkers: stats.missing_checkers,
        missing_projects: stats.missing_projects,
        missing_targets,
    };

    Ok(Report { rows, summary })
}
