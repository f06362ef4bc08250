//! Repository for baseline data records.

use monitor_core::config::ReportConfig;
use monitor_core::types::DbId;
use sqlx::PgPool;

use crate::models::record::RecordRow;

/// Column list for record queries. `d` is the record table, `p` the
/// project table. `progress_state` is read as text so enum-typed columns
/// decode the same way.
const RECORD_COLUMNS: &str = "\
    d.project_id, d.data_idx, d.src_idx, d.progress_state::text AS progress_state, \
    d.problem_flag, d.problem_reason, d.work_object_number, \
    d.work_user_id, d.check_user_id, d.work_end_time, d.check_end_time, \
    d.is_deleted, p.start_date AS project_start_date";

/// Reads baseline records from `tb_prj_data`.
pub struct RecordRepo;

impl RecordRepo {
    /// Records of cohort projects whose check ended inside the check-end
    /// window and whose state is selected.
    ///
    /// Soft-deleted rows are kept so the run summary can count them; the
    /// core drops them.
    pub async fn list_candidates(
        pool: &PgPool,
        config: &ReportConfig,
    ) -> Result<Vec<RecordRow>, sqlx::Error> {
        let project_ids: Vec<DbId> = config.cohort.project_ids.iter().copied().collect();
        let states: Vec<String> = config
            .progress_states
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();
        let query = format!(
            "SELECT {RECORD_COLUMNS} \
             FROM tb_prj_data d \
             JOIN tb_prj p ON p.project_id = d.project_id \
             WHERE d.project_id = ANY($1) \
               AND p.start_date >= $2 \
               AND p.start_date < $3 \
               AND d.check_end_time BETWEEN $4 AND $5 \
               AND d.progress_state::text = ANY($6) \
             ORDER BY d.data_idx"
        );
        sqlx::query_as::<_, RecordRow>(&query)
            .bind(&project_ids)
            .bind(config.cohort.project_start_window.start)
            .bind(config.cohort.project_start_window.end)
            .bind(config.check_end_window.start)
            .bind(config.check_end_window.end)
            .bind(&states)
            .fetch_all(pool)
            .await
    }
}
