use std::collections::BTreeSet;

use monitor_core::config::{CohortFilter, ReportConfig, DEFAULT_TIMEZONE};
use monitor_core::key::DataKey;
use monitor_core::model::EditEvent;
use monitor_core::progress::ProgressState;
use monitor_core::types::{DbId, Timestamp};
use monitor_core::window::TimeWindow;
use monitor_db::repositories::{EditEventRepo, MemberRepo, ProjectRepo, RecordRepo};
use sqlx::PgPool;

fn at(ts: &str) -> Timestamp {
    ts.parse().unwrap()
}

fn config() -> ReportConfig {
    ReportConfig {
        cohort: CohortFilter::new(
            TimeWindow::half_open(at("2025-11-01T00:00:00Z"), at("2025-11-15T00:00:00Z")),
            BTreeSet::from([1, 2]),
        ),
        check_end_window: TimeWindow::closed(
            at("2025-11-10T00:00:00Z"),
            at("2025-11-20T00:00:00Z"),
        ),
        progress_states: BTreeSet::from([ProgressState::CheckEnd, ProgressState::AllFinished]),
        target_timezone: DEFAULT_TIMEZONE,
        link_base_url: "https://works.example.com".to_string(),
        target_data_ids: None,
    }
}

#[sqlx::test(migrations = "tests/schema", fixtures("source_rows"))]
async fn test_candidates_keep_inclusive_bounds_and_deleted_rows(pool: PgPool) {
    let rows = RecordRepo::list_candidates(&pool, &config()).await.unwrap();

    let ids: Vec<DbId> = rows.iter().map(|r| r.data_idx).collect();
    assert_eq!(ids, vec![100, 101, 104]);

    assert_eq!(rows[1].progress_state, "ALL_FINISHED");
    assert_eq!(rows[1].is_deleted, None);
    assert_eq!(rows[2].is_deleted, Some(true));
    assert_eq!(rows[0].project_start_date, Some(at("2025-11-03T00:00:00Z")));
}

#[sqlx::test(migrations = "tests/schema", fixtures("source_rows"))]
async fn test_manual_saves_filter_on_project_start_not_event_time(pool: PgPool) {
    let rows = EditEventRepo::list_manual_saves(&pool, &config().cohort)
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.project_id == 1 && r.data_id == "100"));
    assert!(rows.iter().all(|r| r.action_kind == "MANUAL_SAVE"));
    assert!(rows.iter().all(|r| r.event_time > at("2025-11-15T00:00:00Z")));
}

#[sqlx::test(migrations = "tests/schema", fixtures("source_rows"))]
async fn test_text_data_ids_reach_core_unchanged(pool: PgPool) {
    sqlx::query(
        "ALTER TABLE tb_prj_data_history ALTER COLUMN data_id TYPE TEXT USING data_id::text",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO tb_prj_data_history \
             (project_id, data_id, object_count, event_time, action_kind) \
         VALUES (1, ' 101 ', 4, '2025-12-02T00:00:00Z', 'MANUAL_SAVE'), \
                (1, 'n/a', 1, '2025-12-02T00:00:00Z', 'MANUAL_SAVE')",
    )
    .execute(&pool)
    .await
    .unwrap();

    let keys: BTreeSet<DataKey> = EditEventRepo::list_manual_saves(&pool, &config().cohort)
        .await
        .unwrap()
        .into_iter()
        .map(|row| DataKey::parse(&EditEvent::from(row).data_id))
        .collect();

    assert_eq!(
        keys,
        BTreeSet::from([
            DataKey::Id(100),
            DataKey::Id(101),
            DataKey::Malformed("n/a".to_string()),
        ])
    );
}

#[sqlx::test(migrations = "tests/schema", fixtures("source_rows"))]
async fn test_snapshot_narrows_dimensions_to_referenced_rows(pool: PgPool) {
    let snapshot = monitor_db::load_snapshot(&pool, &config()).await.unwrap();

    assert_eq!(snapshot.records.len(), 3);
    assert_eq!(snapshot.edit_events.len(), 2);

    let mut members: Vec<DbId> = snapshot.members.iter().map(|m| m.member_id).collect();
    members.sort_unstable();
    assert_eq!(members, vec![10, 11, 12, 20]);
    let unnamed = snapshot.members.iter().find(|m| m.member_id == 12).unwrap();
    assert_eq!(unnamed.nickname, None);

    let projects: Vec<DbId> = snapshot.projects.iter().map(|p| p.project_id).collect();
    assert_eq!(projects, vec![1]);
}

#[sqlx::test(migrations = "tests/schema", fixtures("source_rows"))]
async fn test_loaded_snapshot_builds_report(pool: PgPool) {
    let snapshot = monitor_db::load_snapshot(&pool, &config()).await.unwrap();
    let report = monitor_core::build_report(&snapshot, &config()).unwrap();

    let ids: Vec<DbId> = report.rows.iter().map(|r| r.data_idx).collect();
    assert_eq!(ids, vec![100, 101]);
    assert_eq!(report.summary.excluded_deleted, 1);

    let edited = &report.rows[0];
    assert!(edited.is_modified);
    assert_eq!(edited.baseline_object_count, Some(5));
    assert_eq!(edited.final_object_count, Some(9));
    assert_eq!(edited.worker_nickname.as_deref(), Some("kim"));
    assert_eq!(edited.checker_nickname.as_deref(), Some("lee"));
}

#[sqlx::test(migrations = "tests/schema")]
async fn test_empty_id_lists_skip_the_query(pool: PgPool) {
    assert!(MemberRepo::list_by_ids(&pool, &[]).await.unwrap().is_empty());
    assert!(ProjectRepo::list_by_ids(&pool, &[]).await.unwrap().is_empty());
}
