//! Column checks for tabular snapshots.
//!
//! Rows arrive as JSON objects keyed by column name. Before decoding, every
//! row is checked for the table's required columns so that a missing
//! nullable column is reported instead of being read as `NULL`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::CoreError;

pub const EDIT_EVENT_TABLE: &str = "edit_events";
pub const BASELINE_RECORD_TABLE: &str = "records";
pub const USER_PROFILE_TABLE: &str = "members";
pub const PROJECT_TABLE: &str = "projects";

pub const EDIT_EVENT_COLUMNS: &[&str] = &[
    "project_id",
    "data_id",
    "object_count",
    "event_time",
    "action_kind",
    "project_start_date",
];

pub const BASELINE_RECORD_COLUMNS: &[&str] = &[
    "project_id",
    "data_idx",
    "src_idx",
    "progress_state",
    "problem_flag",
    "problem_reason",
    "work_object_number",
    "work_user_id",
    "check_user_id",
    "work_end_time",
    "check_end_time",
    "is_deleted",
    "project_start_date",
];

pub const USER_PROFILE_COLUMNS: &[&str] = &["member_id", "nickname"];

/// Only the key is required; other project attributes are optional.
pub const PROJECT_COLUMNS: &[&str] = &["project_id"];

/// Check that `row` is an object carrying every column in `required`.
pub fn check_columns(
    table: &str,
    index: usize,
    row: &Value,
    required: &[&str],
) -> Result<(), CoreError> {
    let object = row.as_object().ok_or_else(|| {
        CoreError::Schema(format!("{table}[{index}]: expected an object, got {row}"))
    })?;

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|column| !object.contains_key(*column))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Schema(format!(
            "{table}[{index}]: missing column(s) {}",
            missing.join(", ")
        )))
    }
}

/// Check and decode every row of a table.
///
/// Fails on the first row with a missing column or an incompatible value.
pub fn decode_table<T: DeserializeOwned>(
    table: &str,
    rows: Vec<Value>,
    required: &[&str],
) -> Result<Vec<T>, CoreError> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            check_columns(table, index, &row, required)?;
            serde_json::from_value(row)
                .map_err(|e| CoreError::Schema(format!("{table}[{index}]: {e}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::model::UserProfile;

    #[test]
    fn complete_rows_decode() {
        let rows = vec![
            json!({"member_id": 1, "nickname": "kim"}),
            json!({"member_id": 2, "nickname": null}),
        ];
        let profiles: Vec<UserProfile> =
            decode_table(USER_PROFILE_TABLE, rows, USER_PROFILE_COLUMNS).unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[1].nickname, None);
    }

    #[test]
    fn missing_nullable_column_is_schema_error() {
        let rows = vec![json!({"member_id": 1})];
        let result: Result<Vec<UserProfile>, _> =
            decode_table(USER_PROFILE_TABLE, rows, USER_PROFILE_COLUMNS);
        assert_matches!(
            result,
            Err(CoreError::Schema(msg)) if msg.contains("members[0]") && msg.contains("nickname")
        );
    }

    #[test]
    fn incompatible_type_is_schema_error() {
        let rows = vec![json!({"member_id": "not-a-number", "nickname": "kim"})];
        let result: Result<Vec<UserProfile>, _> =
            decode_table(USER_PROFILE_TABLE, rows, USER_PROFILE_COLUMNS);
        assert_matches!(result, Err(CoreError::Schema(_)));
    }

    #[test]
    fn non_object_row_is_schema_error() {
        assert_matches!(
            check_columns(PROJECT_TABLE, 3, &json!([1, 2]), PROJECT_COLUMNS),
            Err(CoreError::Schema(msg)) if msg.contains("projects[3]")
        );
    }
}
