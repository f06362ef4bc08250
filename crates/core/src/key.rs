//! Normalisation of record keys between the edit log and the baseline table.
//!
//! The edit log stores `data_id` in whatever representation the editing
//! system wrote (integer or text), while the baseline table keys records by
//! the integer `data_idx`. [`DataKey::parse`] turns every raw key into one
//! comparable form, and [`normalize_resolved`] is the single boundary where
//! resolver output becomes an index the enricher can look up by `data_idx`.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::resolver::{ResolvedEvent, ResolvedEvents};
use crate::types::DbId;

/// A `data_id` exactly as it was read from the edit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDataId {
    Int(DbId),
    Text(String),
}

impl From<DbId> for RawDataId {
    fn from(id: DbId) -> Self {
        RawDataId::Int(id)
    }
}

impl From<&str> for RawDataId {
    fn from(s: &str) -> Self {
        RawDataId::Text(s.to_string())
    }
}

/// A normalised record key. Keys that cannot be read as an integer id are
/// kept as [`DataKey::Malformed`] so they still group together and can be
/// reported, but they never match a baseline record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataKey {
    Id(DbId),
    Malformed(String),
}

impl DataKey {
    /// Normalise a raw key.
    ///
    /// Text is trimmed and accepted when it is an integer, or a decimal whose
    /// fractional part is all zeros (`"100.0"`, as written by float-typed
    /// exports).
    pub fn parse(raw: &RawDataId) -> Self {
        match raw {
            RawDataId::Int(id) => DataKey::Id(*id),
            RawDataId::Text(text) => {
                let trimmed = text.trim();
                parse_integer_text(trimmed)
                    .map(DataKey::Id)
                    .unwrap_or_else(|| DataKey::Malformed(trimmed.to_string()))
            }
        }
    }

    pub fn as_id(&self) -> Option<DbId> {
        match self {
            DataKey::Id(id) => Some(*id),
            DataKey::Malformed(_) => None,
        }
    }
}

impl fmt::Display for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataKey::Id(id) => write!(f, "{id}"),
            DataKey::Malformed(s) => write!(f, "{s:?}"),
        }
    }
}

fn parse_integer_text(s: &str) -> Option<DbId> {
    if let Ok(id) = s.parse::<DbId>() {
        return Some(id);
    }
    let (whole, fraction) = s.split_once('.')?;
    if fraction.is_empty() || !fraction.bytes().all(|b| b == b'0') {
        return None;
    }
    whole.parse::<DbId>().ok()
}

/// Resolved events keyed by the baseline's `data_idx`.
#[derive(Debug, Clone, Default)]
pub struct ResolvedIndex {
    by_data_idx: HashMap<DbId, ResolvedEvent>,
    malformed: Vec<String>,
}

impl ResolvedIndex {
    /// The winning event for `data_idx`, if one was observed.
    pub fn get(&self, data_idx: DbId) -> Option<&ResolvedEvent> {
        self.by_data_idx.get(&data_idx)
    }

    pub fn len(&self) -> usize {
        self.by_data_idx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_data_idx.is_empty()
    }

    /// Joinable keys whose winner was chosen among tied `event_time`s.
    pub fn tie_breaks(&self) -> usize {
        self.by_data_idx.values().filter(|e| e.was_tie_broken()).count()
    }

    /// Raw keys that could not be normalised, in key order.
    pub fn malformed_keys(&self) -> &[String] {
        &self.malformed
    }
}

/// Convert resolver output into a lookup index by `data_idx`.
///
/// Malformed keys are set aside and logged; each one is a lookup miss for
/// the enricher, never a batch failure.
pub fn normalize_resolved(resolved: ResolvedEvents) -> ResolvedIndex {
    let mut index = ResolvedIndex::default();

    for (key, event) in resolved.into_entries() {
        match key {
            DataKey::Id(id) => {
                index.by_data_idx.insert(id, event);
            }
            DataKey::Malformed(raw) => {
                tracing::warn!(
                    data_id = %raw,
                    "Edit event key is not a valid data_idx; ignoring it"
                );
                index.malformed.push(raw);
            }
        }
    }

    if !index.malformed.is_empty() {
        tracing::warn!(
            count = index.malformed.len(),
            "Resolved events with malformed keys were not joined"
        );
    }

    index
}
