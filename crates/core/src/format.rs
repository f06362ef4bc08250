//! Final report row shape.

use chrono_tz::Tz;
use serde::Serialize;

use crate::config::ReportConfig;
use crate::model::{BaselineRecord, Project};
use crate::progress::ProgressState;
use crate::types::{DbId, DisplayTimestamp, Timestamp};

/// Path of the monitoring page, relative to the configured base URL.
const MONITOR_PATH: &str = "/project/monitor";

/// A baseline record joined with its dimensions and override values.
#[derive(Debug, Clone)]
pub struct JoinedRow<'a> {
    pub record: &'a BaselineRecord,
    pub worker_nickname: Option<&'a str>,
    pub checker_nickname: Option<&'a str>,
    /// Joined for future filtering; nothing below reads it yet.
    pub project: Option<&'a Project>,
    pub is_modified: bool,
    pub final_object_count: Option<i64>,
    /// Time of the resolved event in UTC.
    pub modified_time: Option<Timestamp>,
}

/// Report columns in `ReportRow` field order.
pub const REPORT_COLUMNS: &[&str] = &[
    "project_id",
    "data_idx",
    "src_idx",
    "progress_state",
    "problem_flag",
    "problem_reason",
    "baseline_object_count",
    "is_modified",
    "final_object_count",
    "worker_id",
    "worker_nickname",
    "checker_id",
    "checker_nickname",
    "work_end_time",
    "check_end_time",
    "modified_time",
    "review_link",
];

/// One flattened report row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub project_id: DbId,
    pub data_idx: DbId,
    pub src_idx: Option<DbId>,
    pub progress_state: ProgressState,
    pub problem_flag: Option<bool>,
    pub problem_reason: Option<String>,
    pub baseline_object_count: Option<i64>,
    pub is_modified: bool,
    pub final_object_count: Option<i64>,
    pub worker_id: Option<DbId>,
    pub worker_nickname: Option<String>,
    pub checker_id: Option<DbId>,
    pub checker_nickname: Option<String>,
    pub work_end_time: Option<Timestamp>,
    pub check_end_time: Option<Timestamp>,
    pub modified_time: Option<DisplayTimestamp>,
    pub review_link: String,
}

/// Build the monitoring link for a record.
pub fn review_link(base_url: &str, project_id: DbId, data_idx: DbId) -> String {
    let base = base_url.trim_end_matches('/');
    format!("{base}{MONITOR_PATH}/{project_id}/?dataId={data_idx}")
}

/// Express a UTC timestamp in `zone`, keeping its offset explicit.
pub fn normalize_timezone(ts: Timestamp, zone: Tz) -> DisplayTimestamp {
    ts.with_timezone(&zone).fixed_offset()
}

/// Map a joined row onto the report's field set.
pub fn format_row(row: &JoinedRow<'_>, config: &ReportConfig) -> ReportRow {
    let record = row.record;
    ReportRow {
        project_id: record.project_id,
        data_idx: record.data_idx,
        src_idx: record.src_idx,
        progress_state: record.progress_state.clone(),
        problem_flag: record.problem_flag,
        problem_reason: record.problem_reason.clone(),
        baseline_object_count: record.work_object_number,
        is_modified: row.is_modified,
        final_object_count: row.final_object_count,
        worker_id: record.work_user_id,
        worker_nickname: row.worker_nickname.map(str::to_string),
        checker_id: record.check_user_id,
        checker_nickname: row.checker_nickname.map(str::to_string),
        work_end_time: record.work_end_time,
        check_end_time: record.check_end_time,
        modified_time: row
            .modified_time
            .map(|ts| normalize_timezone(ts, config.target_timezone)),
        review_link: review_link(&config.link_base_url, record.project_id, record.data_idx),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn link_template() {
        assert_eq!(
            review_link("https://works.example.com", 26946, 100),
            "https://works.example.com/project/monitor/26946/?dataId=100"
        );
    }

    #[test]
    fn link_base_trailing_slash_is_dropped() {
        assert_eq!(
            review_link("https://works.example.com/", 1, 2),
            "https://works.example.com/project/monitor/1/?dataId=2"
        );
    }

    #[test]
    fn timezone_is_applied_without_changing_the_instant() {
        let utc = Utc.with_ymd_and_hms(2025, 11, 20, 2, 0, 0).unwrap();
        let seoul = normalize_timezone(utc, chrono_tz::Asia::Seoul);
        assert_eq!(seoul.to_rfc3339(), "2025-11-20T11:00:00+09:00");
        assert_eq!(seoul, utc);
    }
}
