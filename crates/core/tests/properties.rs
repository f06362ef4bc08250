//! Property-based tests for the resolver and enricher.
//!
//! These tests use proptest to check that the invariants hold across
//! randomly generated event logs and record sets.

use std::collections::BTreeSet;

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use monitor_core::config::{CohortFilter, ReportConfig, DEFAULT_TIMEZONE};
use monitor_core::dimension::{MemberDirectory, ProjectDirectory};
use monitor_core::enrich::{enrich, is_reportable};
use monitor_core::key::{normalize_resolved, DataKey, RawDataId};
use monitor_core::model::{BaselineRecord, EditEvent, UserProfile, ACTION_MANUAL_SAVE};
use monitor_core::progress::ProgressState;
use monitor_core::resolver::resolve;
use monitor_core::types::{DbId, Timestamp};
use monitor_core::window::TimeWindow;

const PROJECT: DbId = 26946;
const OTHER_PROJECT: DbId = 11;

fn base() -> Timestamp {
    Utc.with_ymd_and_hms(2025, 11, 1, 0, 0, 0).unwrap()
}

fn config() -> ReportConfig {
    ReportConfig {
        cohort: CohortFilter::new(
            TimeWindow::half_open(base(), base() + Duration::days(14)),
            BTreeSet::from([PROJECT]),
        ),
        check_end_window: TimeWindow::closed(
            base() + Duration::days(1),
            base() + Duration::days(20),
        ),
        progress_states: BTreeSet::from([ProgressState::CheckEnd, ProgressState::AllFinished]),
        target_timezone: DEFAULT_TIMEZONE,
        link_base_url: "https://works.example.com".to_string(),
        target_data_ids: None,
    }
}

/// Generates an edit event with a small key and time space so that shared
/// keys and tied times are common.
fn arb_event() -> impl Strategy<Value = EditEvent> {
    (
        prop::sample::select(vec![PROJECT, PROJECT, OTHER_PROJECT]),
        0i64..8,
        any::<bool>(),
        0i64..20,
        0i64..4,
        prop::sample::select(vec![ACTION_MANUAL_SAVE, ACTION_MANUAL_SAVE, "AUTO_SAVE"]),
        0i64..20,
    )
        .prop_map(|(project_id, key, as_text, count, hour, action, start_day)| EditEvent {
            project_id,
            data_id: if as_text {
                RawDataId::Text(key.to_string())
            } else {
                RawDataId::Int(key)
            },
            object_count: count,
            event_time: base() + Duration::days(20) + Duration::hours(hour),
            action_kind: action.to_string(),
            project_start_date: Some(base() + Duration::days(start_day)),
        })
}

fn arb_record() -> impl Strategy<Value = BaselineRecord> {
    (
        0i64..12,
        prop::sample::select(vec![
            ProgressState::CheckEnd,
            ProgressState::AllFinished,
            ProgressState::Checking,
        ]),
        prop::option::of(any::<bool>()),
        prop::option::of(0i64..50),
        prop::option::of(0i64..25),
        prop::option::of(1i64..4),
    )
        .prop_map(|(data_idx, state, deleted, objects, check_day, worker)| BaselineRecord {
            project_id: PROJECT,
            data_idx,
            src_idx: Some(data_idx),
            progress_state: state,
            problem_flag: None,
            problem_reason: None,
            work_object_number: objects,
            work_user_id: worker,
            check_user_id: Some(1),
            work_end_time: None,
            check_end_time: check_day.map(|d| base() + Duration::days(d)),
            is_deleted: deleted,
            project_start_date: Some(base() + Duration::days(2)),
        })
}

fn members() -> MemberDirectory {
    MemberDirectory::from_profiles(&[
        UserProfile {
            member_id: 1,
            nickname: Some("kim".to_string()),
        },
        UserProfile {
            member_id: 2,
            nickname: Some("lee".to_string()),
        },
    ])
}

fn qualifies(event: &EditEvent, cohort: &CohortFilter) -> bool {
    event.is_manual_save() && cohort.admits(event.project_id, event.project_start_date)
}

proptest! {
    #[test]
    fn resolution_ignores_input_order(
        (events, shuffled) in prop::collection::vec(arb_event(), 0..40)
            .prop_flat_map(|events| (Just(events.clone()), Just(events).prop_shuffle()))
    ) {
        let cfg = config();
        let a = resolve(&events, &cfg.cohort).unwrap();
        let b = resolve(&shuffled, &cfg.cohort).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn winner_is_latest_qualifying_event(events in prop::collection::vec(arb_event(), 0..40)) {
        let cfg = config();
        let resolved = resolve(&events, &cfg.cohort).unwrap();

        for (key, winner) in resolved.iter() {
            let group: Vec<&EditEvent> = events
                .iter()
                .filter(|e| qualifies(e, &cfg.cohort) && &DataKey::parse(&e.data_id) == key)
                .collect();
            prop_assert!(!group.is_empty());
            prop_assert!(group.iter().all(|e| winner.event_time >= e.event_time));
            let winner_in_group = group.iter().any(|e| {
                e.event_time == winner.event_time && e.object_count == winner.object_count
            });
            prop_assert!(winner_in_group);
        }

        let qualifying_keys: BTreeSet<DataKey> = events
            .iter()
            .filter(|e| qualifies(e, &cfg.cohort))
            .map(|e| DataKey::parse(&e.data_id))
            .collect();
        prop_assert_eq!(qualifying_keys.len(), resolved.len());
    }

    #[test]
    fn records_without_edits_keep_baseline(
        events in prop::collection::vec(arb_event(), 0..30),
        records in prop::collection::vec(arb_record(), 0..30),
    ) {
        let cfg = config();
        let resolved = resolve(&events, &cfg.cohort).unwrap();
        let edited: BTreeSet<DbId> = resolved.iter().filter_map(|(k, _)| k.as_id()).collect();
        let index = normalize_resolved(resolved);
        let rows = enrich(&records, &index, &members(), &ProjectDirectory::default(), &cfg);

        for row in rows.iter().filter(|r| !edited.contains(&r.data_idx)) {
            prop_assert!(!row.is_modified);
            prop_assert_eq!(row.final_object_count, row.baseline_object_count);
            prop_assert!(row.modified_time.is_none());
        }
        for row in rows.iter().filter(|r| edited.contains(&r.data_idx)) {
            prop_assert!(row.is_modified);
            prop_assert!(row.modified_time.is_some());
        }
    }

    #[test]
    fn every_reportable_record_appears_once_in_order(
        records in prop::collection::vec(arb_record(), 0..40),
    ) {
        let cfg = config();
        let rows = enrich(
            &records,
            &normalize_resolved(Default::default()),
            &members(),
            &ProjectDirectory::default(),
            &cfg,
        );

        let expected: Vec<DbId> = records
            .iter()
            .filter(|r| {
                r.is_deleted != Some(true)
                    && r.progress_state != ProgressState::Checking
                    && r.check_end_time.is_some_and(|t| {
                        cfg.check_end_window.start <= t && t <= cfg.check_end_window.end
                    })
            })
            .map(|r| r.data_idx)
            .collect();
        prop_assert_eq!(rows.len(), expected.len());
        prop_assert_eq!(
            records.iter().filter(|r| is_reportable(r, &cfg)).count(),
            expected.len()
        );

        let mut expected_sorted = expected;
        expected_sorted.sort_unstable();
        let emitted: Vec<DbId> = rows.iter().map(|r| r.data_idx).collect();
        prop_assert_eq!(emitted, expected_sorted);
        prop_assert!(rows.windows(2).all(|w| w[0].data_idx <= w[1].data_idx));
    }
}
