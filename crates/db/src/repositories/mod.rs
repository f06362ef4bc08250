//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async read methods
//! that accept `&PgPool` as the first argument. Source tables are owned
//! upstream; nothing here writes.

pub mod edit_event_repo;
pub mod member_repo;
pub mod project_repo;
pub mod record_repo;

pub use edit_event_repo::EditEventRepo;
pub use member_repo::MemberRepo;
pub use project_repo::ProjectRepo;
pub use record_repo::RecordRepo;
