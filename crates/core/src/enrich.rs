//! Joins baseline records with resolved edits and dimensions.
//!
//! A record is reported when all of these hold:
//!
//! - its project is in the cohort (selected id, start date in the
//!   closed-open window);
//! - `check_end_time` is inside the closed check-end window;
//! - `progress_state` is one of the configured states;
//! - it is not soft-deleted (only an explicit `true` excludes);
//! - it passes the optional target allow-list.
//!
//! Everything else about a record is best effort: missing nicknames,
//! missing projects and missing resolved events fall back to empty fields
//! or baseline values.

use serde::Serialize;

use crate::config::ReportConfig;
use crate::dimension::{MemberDirectory, ProjectDirectory};
use crate::format::{format_row, JoinedRow, ReportRow};
use crate::key::ResolvedIndex;
use crate::model::BaselineRecord;

/// Per-run counters for the enrichment stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichStats {
    pub records_scanned: usize,
    pub rows_emitted: usize,
    pub excluded_deleted: usize,
    pub modified_rows: usize,
    /// Rows whose worker id had no profile.
    pub missing_workers: usize,
    /// Rows whose checker id had no profile.
    pub missing_checkers: usize,
    pub missing_projects: usize,
}

/// Returns `true` when `record` passes every report filter.
pub fn is_reportable(record: &BaselineRecord, config: &ReportConfig) -> bool {
    !record.is_deleted()
        && config
            .cohort
            .admits(record.project_id, record.project_start_date)
        && config.check_end_window.contains_opt(record.check_end_time)
        && config.progress_states.contains(&record.progress_state)
        && config.is_target(record.data_idx)
}

/// Join a single record. The record is assumed to have passed
/// [`is_reportable`].
pub fn join_record<'a>(
    record: &'a BaselineRecord,
    resolved: &'a ResolvedIndex,
    members: &'a MemberDirectory,
    projects: &'a ProjectDirectory,
) -> JoinedRow<'a> {
    let event = resolved.get(record.data_idx);

    JoinedRow {
        record,
        worker_nickname: members.nickname(record.work_user_id),
        checker_nickname: members.nickname(record.check_user_id),
        project: projects.get(record.project_id),
        is_modified: event.is_some(),
        final_object_count: match event {
            Some(e) => Some(e.object_count),
            None => record.work_object_number,
        },
        modified_time: event.map(|e| e.event_time),
    }
}

/// Produce report rows ordered by `data_idx`, along with stage counters.
pub fn enrich_with_stats<'a, I>(
    records: I,
    resolved: &ResolvedIndex,
    members: &MemberDirectory,
    projects: &ProjectDirectory,
    config: &ReportConfig,
) -> (Vec<ReportRow>, EnrichStats)
where
    I: IntoIterator<Item = &'a BaselineRecord>,
{
    let mut stats = EnrichStats::default();
    let mut rows = Vec::new();

    for record in records {
        stats.records_scanned += 1;
        if record.is_deleted() {
            stats.excluded_deleted += 1;
            continue;
        }
        if !is_reportable(record, config) {
            continue;
        }

        let joined = join_record(record, resolved, members, projects);

        if joined.is_modified {
            stats.modified_rows += 1;
        }
        if record.work_user_id.is_some_and(|id| !members.contains(id)) {
            stats.missing_workers += 1;
        }
        if record.check_user_id.is_some_and(|id| !members.contains(id)) {
            stats.missing_checkers += 1;
        }
        if joined.project.is_none() {
            stats.missing_projects += 1;
        }

        rows.push(format_row(&joined, config));
    }

    rows.sort_by(|a, b| {
        a.data_idx
            .cmp(&b.data_idx)
            .then_with(|| a.project_id.cmp(&b.project_id))
    });
    stats.rows_emitted = rows.len();

    tracing::debug!(
        scanned = stats.records_scanned,
        emitted = stats.rows_emitted,
        modified = stats.modified_rows,
        "Enriched baseline records"
    );

    (rows, stats)
}

/// Produce report rows ordered by `data_idx`.
pub fn enrich<'a, I>(
    records: I,
    resolved: &ResolvedIndex,
    members: &MemberDirectory,
    projects: &ProjectDirectory,
    config: &ReportConfig,
) -> Vec<ReportRow>
where
    I: IntoIterator<Item = &'a BaselineRecord>,
{
    enrich_with_stats(records, resolved, members, projects, config).0
}
