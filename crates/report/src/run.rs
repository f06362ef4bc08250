use monitor_core::{build_report, ReportSummary};
use tracing::Instrument;
use uuid::Uuid;

use crate::config::ReportSettings;
use crate::error::ReportError;
use crate::output::write_report;
use crate::source;

/// Load, build and write one report.
///
/// Nothing is written when loading or building fails.
pub async fn run(settings: &ReportSettings) -> Result<ReportSummary, ReportError> {
    let span = tracing::info_span!("report_run", run_id = %Uuid::now_v7());
    async {
        let snapshot = source::load(&settings.source, &settings.report).await?;
        let report = build_report(&snapshot, &settings.report)?;
        write_report(&report.rows, settings.format, &settings.output)?;

        let summary = report.summary;
        tracing::info!(
            records_scanned = summary.records_scanned,
            rows_emitted = summary.rows_emitted,
            excluded_deleted = summary.excluded_deleted,
            modified_rows = summary.modified_rows,
            qualifying_events = summary.qualifying_events,
            resolved_keys = summary.resolved_keys,
            tie_breaks = summary.tie_breaks,
            malformed_keys = summary.malformed_keys,
            missing_workers = summary.missing_workers,
            missing_checkers = summary.missing_checkers,
            missing_projects = summary.missing_projects,
            missing_targets = summary.missing_targets.len(),
            "Report run complete"
        );
        Ok::<_, ReportError>(summary)
    }
    .instrument(span)
    .await
}
