//! User-profile dimension rows.

use monitor_core::model::UserProfile;
use monitor_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the member table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MemberRow {
    pub member_id: DbId,
    pub nickname: Option<String>,
}

impl From<MemberRow> for UserProfile {
    fn from(row: MemberRow) -> Self {
        UserProfile {
            member_id: row.member_id,
            nickname: row.nickname,
        }
    }
}
