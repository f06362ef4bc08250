//! Latest-event resolution over the manual-save log.
//!
//! The log is unordered and append-only. [`resolve`] keeps the qualifying
//! events (manual saves of cohort projects), groups them by normalised
//! [`DataKey`], and picks one winner per key.
//!
//! Ordering between two candidates for the same key is total and does not
//! depend on input order:
//!
//! 1. later `event_time` wins;
//! 2. on equal `event_time`, the larger `object_count` wins;
//! 3. on equal count, the larger `project_id` wins.
//!
//! Candidates equal on all three produce identical resolved events, so the
//! result is the same for every permutation of the input. Keys whose latest
//! `event_time` is shared by several events are counted as tie-breaks.

use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::CohortFilter;
use crate::error::CoreError;
use crate::key::DataKey;
use crate::model::EditEvent;
use crate::types::{DbId, Timestamp};

/// The winning edit event for one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEvent {
    pub project_id: DbId,
    pub object_count: i64,
    pub event_time: Timestamp,
    /// Number of qualifying events sharing the winning `event_time`,
    /// including the winner. Greater than 1 means a tie was broken.
    pub latest_event_count: usize,
}

impl ResolvedEvent {
    fn from_event(event: &EditEvent) -> Self {
        Self {
            project_id: event.project_id,
            object_count: event.object_count,
            event_time: event.event_time,
            latest_event_count: 1,
        }
    }

    pub fn was_tie_broken(&self) -> bool {
        self.latest_event_count > 1
    }

    fn rank(&self) -> (Timestamp, i64, DbId) {
        (self.event_time, self.object_count, self.project_id)
    }

    /// Fold another candidate for the same key into this one.
    fn absorb(&mut self, other: ResolvedEvent) {
        match other.event_time.cmp(&self.event_time) {
            Ordering::Greater => *self = other,
            Ordering::Less => {}
            Ordering::Equal => {
                let count = self.latest_event_count + other.latest_event_count;
                if other.rank() > self.rank() {
                    *self = other;
                }
                self.latest_event_count = count;
            }
        }
    }
}

/// Resolver output: one winner per key, in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedEvents {
    entries: BTreeMap<DataKey, ResolvedEvent>,
    /// Events that passed the filters.
    pub qualifying_events: usize,
}

impl ResolvedEvents {
    pub fn get(&self, key: &DataKey) -> Option<&ResolvedEvent> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DataKey, &ResolvedEvent)> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> BTreeMap<DataKey, ResolvedEvent> {
        self.entries
    }

    /// Number of keys whose winner was chosen among tied `event_time`s.
    pub fn tie_breaks(&self) -> usize {
        self.entries.values().filter(|e| e.was_tie_broken()).count()
    }

    /// Combine results resolved from separate partitions of the log.
    ///
    /// Partitions split by key never overlap and this reduces to a union.
    /// Overlapping keys are reconciled with the same ordering as [`resolve`].
    pub fn merge(mut self, other: ResolvedEvents) -> ResolvedEvents {
        self.qualifying_events += other.qualifying_events;
        for (key, event) in other.entries {
            self.insert(key, event);
        }
        self
    }

    fn insert(&mut self, key: DataKey, candidate: ResolvedEvent) {
        match self.entries.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(candidate);
            }
            Entry::Occupied(mut slot) => slot.get_mut().absorb(candidate),
        }
    }
}

/// Resolve the latest manual save per key among events of the cohort.
///
/// Fails only on an invalid cohort filter; keys without any qualifying
/// event are simply absent from the result.
pub fn resolve<'a, I>(events: I, cohort: &CohortFilter) -> Result<ResolvedEvents, CoreError>
where
    I: IntoIterator<Item = &'a EditEvent>,
{
    cohort.validate()?;

    let mut resolved = ResolvedEvents::default();
    let mut seen = 0usize;

    for event in events {
        seen += 1;
        if !event.is_manual_save() || !cohort.admits(event.project_id, event.project_start_date) {
            continue;
        }
        resolved.qualifying_events += 1;
        resolved.insert(DataKey::parse(&event.data_id), ResolvedEvent::from_event(event));
    }

    let tie_breaks = resolved.tie_breaks();
    if tie_breaks > 0 {
        tracing::warn!(
            keys = tie_breaks,
            "Several manual saves share the latest event_time; kept the larger object_count"
        );
    }
    tracing::debug!(
        events = seen,
        qualifying = resolved.qualifying_events,
        keys = resolved.len(),
        "Resolved latest manual saves"
    );

    Ok(resolved)
}
