//! Repository for the user-profile dimension.

use monitor_core::types::DbId;
use sqlx::PgPool;

use crate::models::member::MemberRow;

/// Reads nicknames from `tb_member`.
pub struct MemberRepo;

impl MemberRepo {
    /// Profiles for the given member ids. Unknown ids are simply absent.
    pub async fn list_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<MemberRow>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, MemberRow>(
            "SELECT member_id, nickname FROM tb_member WHERE member_id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }
}
