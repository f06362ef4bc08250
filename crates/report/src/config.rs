use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use monitor_core::config::{CohortFilter, ReportConfig, DEFAULT_TIMEZONE};
use monitor_core::progress::{ProgressState, DEFAULT_REPORT_STATES};
use monitor_core::types::{DbId, Timestamp};
use monitor_core::window::TimeWindow;
use monitor_core::CoreError;

use crate::output::{OutputFormat, OutputTarget};

/// Where the source tables are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSettings {
    Database {
        url: String,
        max_connections: u32,
    },
    /// A JSON snapshot document with one array per table.
    File(PathBuf),
}

/// Everything a run needs, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub report: ReportConfig,
    pub source: SourceSettings,
    pub output: OutputTarget,
    pub format: OutputFormat,
}

impl ReportSettings {
    /// Load settings from the process environment.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `PROJECT_IDS`          | required                   |
    /// | `PROJECT_START_FROM`   | required                   |
    /// | `PROJECT_START_TO`     | required (exclusive)       |
    /// | `CHECK_END_FROM`       | required                   |
    /// | `CHECK_END_TO`         | required (inclusive)       |
    /// | `PROGRESS_STATES`      | `CHECK_END,ALL_FINISHED`   |
    /// | `TARGET_TIMEZONE`      | `Asia/Seoul`               |
    /// | `LINK_BASE_URL`        | required                   |
    /// | `TARGET_DATA_IDS`      | unset                      |
    /// | `TARGET_DATA_IDS_FILE` | unset                      |
    /// | `SNAPSHOT_PATH`        | unset                      |
    /// | `DATABASE_URL`         | unset                      |
    /// | `DB_MAX_CONNECTIONS`   | `5`                        |
    /// | `OUTPUT_PATH`          | `-` (stdout)               |
    /// | `OUTPUT_FORMAT`        | `jsonl` (`json`, `csv`)    |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through `lookup`, treating blank values as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| CoreError::Configuration(format!("{key} must be set")))
        };

        let target_timezone: Tz = match get("TARGET_TIMEZONE") {
            Some(name) => name.parse().map_err(|_| {
                CoreError::Configuration(format!("TARGET_TIMEZONE: unknown timezone '{name}'"))
            })?,
            None => DEFAULT_TIMEZONE,
        };

        let project_ids = parse_id_list("PROJECT_IDS", &require("PROJECT_IDS")?)?;
        let project_start_window = TimeWindow::half_open(
            parse_datetime("PROJECT_START_FROM", &require("PROJECT_START_FROM")?, target_timezone)?,
            parse_datetime("PROJECT_START_TO", &require("PROJECT_START_TO")?, target_timezone)?,
        );
        let check_end_window = TimeWindow::closed(
            parse_datetime("CHECK_END_FROM", &require("CHECK_END_FROM")?, target_timezone)?,
            parse_datetime("CHECK_END_TO", &require("CHECK_END_TO")?, target_timezone)?,
        );

        let progress_states: BTreeSet<ProgressState> = match get("PROGRESS_STATES") {
            Some(list) => split_list(&list).map(ProgressState::parse).collect(),
            None => DEFAULT_REPORT_STATES
                .iter()
                .map(|s| ProgressState::parse(s))
                .collect(),
        };

        let mut target_data_ids: Option<BTreeSet<DbId>> = None;
        if let Some(list) = get("TARGET_DATA_IDS") {
            target_data_ids = Some(parse_id_list("TARGET_DATA_IDS", &list)?);
        }
        if let Some(path) = get("TARGET_DATA_IDS_FILE") {
            let contents = std::fs::read_to_string(&path).map_err(|e| {
                CoreError::Configuration(format!("TARGET_DATA_IDS_FILE: cannot read {path}: {e}"))
            })?;
            let from_file = parse_target_file(&contents)?;
            target_data_ids
                .get_or_insert_with(BTreeSet::new)
                .extend(from_file);
        }

        let report = ReportConfig {
            cohort: CohortFilter::new(project_start_window, project_ids),
            check_end_window,
            progress_states,
            target_timezone,
            link_base_url: require("LINK_BASE_URL")?,
            target_data_ids,
        };
        report.validate()?;

        let source = match (get("SNAPSHOT_PATH"), get("DATABASE_URL")) {
            (Some(_), Some(_)) => {
                return Err(CoreError::Configuration(
                    "set only one of SNAPSHOT_PATH and DATABASE_URL".to_string(),
                ))
            }
            (Some(path), None) => SourceSettings::File(PathBuf::from(path)),
            (None, Some(url)) => {
                let max_connections: u32 = get("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|| "5".into())
                    .parse()
                    .map_err(|_| {
                        CoreError::Configuration(
                            "DB_MAX_CONNECTIONS must be a valid u32".to_string(),
                        )
                    })?;
                SourceSettings::Database {
                    url,
                    max_connections,
                }
            }
            (None, None) => {
                return Err(CoreError::Configuration(
                    "one of SNAPSHOT_PATH or DATABASE_URL must be set".to_string(),
                ))
            }
        };

        let output = OutputTarget::parse(get("OUTPUT_PATH").as_deref().unwrap_or("-"));
        let format = match get("OUTPUT_FORMAT") {
            Some(name) => OutputFormat::parse(&name).ok_or_else(|| {
                CoreError::Configuration(format!(
                    "OUTPUT_FORMAT must be 'json', 'jsonl' or 'csv', got '{name}'"
                ))
            })?,
            None => OutputFormat::JsonLines,
        };

        Ok(Self {
            report,
            source,
            output,
            format,
        })
    }
}

fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_id_list(key: &str, list: &str) -> Result<BTreeSet<DbId>, CoreError> {
    split_list(list)
        .map(|item| {
            item.parse::<DbId>().map_err(|_| {
                CoreError::Configuration(format!("{key}: '{item}' is not a valid id"))
            })
        })
        .collect()
}

/// Header of the id column in quality-check exports.
pub const TARGET_ID_COLUMN: &str = "dataID";

/// Parse a CSV list of data ids.
///
/// When the first row is a header the ids are read from its `dataID`
/// column (matched case-insensitively). A file whose first row is numeric
/// has no header and the ids are read from the first column.
pub fn parse_target_file(contents: &str) -> Result<BTreeSet<DbId>, CoreError> {
    let invalid = |line: u64, detail: String| {
        CoreError::Configuration(format!("TARGET_DATA_IDS_FILE: line {line}: {detail}"))
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(contents.trim_start_matches('\u{feff}').as_bytes());

    let mut ids = BTreeSet::new();
    let mut column: Option<usize> = None;

    for result in reader.records() {
        let record = result.map_err(|e| {
            CoreError::Configuration(format!("TARGET_DATA_IDS_FILE: {e}"))
        })?;
        let line = record.position().map_or(0, |p| p.line());
        if record.iter().all(str::is_empty) {
            continue;
        }

        let index = match column {
            Some(index) => index,
            None => {
                let first = record.get(0).unwrap_or("");
                if first.parse::<DbId>().is_ok() {
                    column = Some(0);
                    0
                } else {
                    let index = record
                        .iter()
                        .position(|h| h.eq_ignore_ascii_case(TARGET_ID_COLUMN))
                        .ok_or_else(|| {
                            invalid(line, format!("header has no '{TARGET_ID_COLUMN}' column"))
                        })?;
                    column = Some(index);
                    continue;
                }
            }
        };

        let field = record.get(index).unwrap_or("");
        if field.is_empty() {
            continue;
        }
        let id = field
            .parse::<DbId>()
            .map_err(|_| invalid(line, format!("'{field}' is not a valid id")))?;
        ids.insert(id);
    }
    Ok(ids)
}

/// Parse a datetime setting.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and
/// `YYYY-MM-DD` (midnight). Values without an offset are local times in
/// `zone`.
pub fn parse_datetime(key: &str, value: &str, zone: Tz) -> Result<Timestamp, CoreError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| {
            CoreError::Configuration(format!("{key}: '{value}' is not a recognised datetime"))
        })?;

    zone.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            CoreError::Configuration(format!("{key}: '{value}' does not exist in {zone}"))
        })
}
