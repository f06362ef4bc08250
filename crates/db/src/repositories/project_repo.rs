//! Repository for the project dimension.

use monitor_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::ProjectRow;

/// Reads project attributes from `tb_prj`.
pub struct ProjectRepo;

impl ProjectRepo {
    pub async fn list_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<ProjectRow>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, ProjectRow>(
            "SELECT project_id, project_name, start_date FROM tb_prj WHERE project_id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }
}
