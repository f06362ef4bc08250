//! Repository for the manual-save log.

use monitor_core::config::CohortFilter;
use monitor_core::model::ACTION_MANUAL_SAVE;
use monitor_core::types::DbId;
use sqlx::PgPool;

use crate::models::edit_event::EditEventRow;

/// Column list for edit-log queries. `h` is the log, `p` the project table.
const EDIT_EVENT_COLUMNS: &str = "\
    h.project_id, h.data_id::text AS data_id, h.object_count, \
    h.event_time, h.action_kind, p.start_date AS project_start_date";

/// Reads manual saves from `tb_prj_data_history`.
pub struct EditEventRepo;

impl EditEventRepo {
    /// Manual saves of cohort projects.
    ///
    /// The cohort window is applied to the project's start date, not to the
    /// event time. The core re-applies the same filter after loading.
    pub async fn list_manual_saves(
        pool: &PgPool,
        cohort: &CohortFilter,
    ) -> Result<Vec<EditEventRow>, sqlx::Error> {
        let project_ids: Vec<DbId> = cohort.project_ids.iter().copied().collect();
        let query = format!(
            "SELECT {EDIT_EVENT_COLUMNS} \
             FROM tb_prj_data_history h \
             JOIN tb_prj p ON p.project_id = h.project_id \
             WHERE h.action_kind = $1 \
               AND h.project_id = ANY($2) \
               AND p.start_date >= $3 \
               AND p.start_date < $4"
        );
        sqlx::query_as::<_, EditEventRow>(&query)
            .bind(ACTION_MANUAL_SAVE)
            .bind(&project_ids)
            .bind(cohort.project_start_window.start)
            .bind(cohort.project_start_window.end)
            .fetch_all(pool)
            .await
    }
}
