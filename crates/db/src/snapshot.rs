//! Reads one point-in-time snapshot of the source tables.

use std::collections::BTreeSet;

use monitor_core::config::ReportConfig;
use monitor_core::model::{BaselineRecord, EditEvent, Project, UserProfile};
use monitor_core::report::SourceSnapshot;
use monitor_core::types::DbId;

use crate::error::DbError;
use crate::repositories::{EditEventRepo, MemberRepo, ProjectRepo, RecordRepo};
use crate::DbPool;

/// Load the four source tables for a run.
///
/// Dimension tables are narrowed to the members and projects the candidate
/// records reference. Missing or mistyped columns surface as
/// [`monitor_core::CoreError::Schema`].
pub async fn load_snapshot(
    pool: &DbPool,
    config: &ReportConfig,
) -> Result<SourceSnapshot, DbError> {
    let records: Vec<BaselineRecord> = RecordRepo::list_candidates(pool, config)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    tracing::info!(count = records.len(), "Loaded candidate records");

    let edit_events: Vec<EditEvent> = EditEventRepo::list_manual_saves(pool, &config.cohort)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    tracing::info!(count = edit_events.len(), "Loaded manual-save events");

    let member_ids = referenced_members(&records);
    let members: Vec<UserProfile> = MemberRepo::list_by_ids(pool, &member_ids)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let project_ids: Vec<DbId> = records
        .iter()
        .map(|r| r.project_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let projects: Vec<Project> = ProjectRepo::list_by_ids(pool, &project_ids)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    tracing::debug!(
        members = members.len(),
        projects = projects.len(),
        "Loaded dimension rows"
    );

    Ok(SourceSnapshot {
        edit_events,
        records,
        members,
        projects,
    })
}

/// Distinct worker and checker ids, in ascending order.
fn referenced_members(records: &[BaselineRecord]) -> Vec<DbId> {
    records
        .iter()
        .flat_map(|r| [r.work_user_id, r.check_user_id])
        .flatten()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
