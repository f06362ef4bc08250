/// Upstream primary keys (`project_id`, `data_idx`, `member_id`) are BIGINT.
pub type DbId = i64;

/// All source timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A timestamp rendered in the report's display timezone.
pub type DisplayTimestamp = chrono::DateTime<chrono::FixedOffset>;
