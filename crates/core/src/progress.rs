//! Lifecycle states of a data record.
//!
//! These must match the values stored in the upstream `progress_state`
//! column. Values this crate does not know are kept verbatim in
//! [`ProgressState::Other`] so a newly introduced upstream state can still be
//! selected by name.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Work has been assigned but not submitted.
pub const STATE_WORKING: &str = "WORKING";

/// The worker submitted the record.
pub const STATE_WORK_END: &str = "WORK_END";

/// A checker is reviewing the record.
pub const STATE_CHECKING: &str = "CHECKING";

/// The checker sent the record back to the worker.
pub const STATE_CHECK_REJECT: &str = "CHECK_REJECT";

/// The checker accepted the record (terminal).
pub const STATE_CHECK_END: &str = "CHECK_END";

/// Every stage is closed (terminal).
pub const STATE_ALL_FINISHED: &str = "ALL_FINISHED";

/// States selected when no explicit list is configured.
pub const DEFAULT_REPORT_STATES: &[&str] = &[STATE_CHECK_END, STATE_ALL_FINISHED];

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProgressState {
    Working,
    WorkEnd,
    Checking,
    CheckReject,
    CheckEnd,
    AllFinished,
    Other(String),
}

impl ProgressState {
    /// String representation as stored upstream.
    pub fn as_str(&self) -> &str {
        match self {
            ProgressState::Working => STATE_WORKING,
            ProgressState::WorkEnd => STATE_WORK_END,
            ProgressState::Checking => STATE_CHECKING,
            ProgressState::CheckReject => STATE_CHECK_REJECT,
            ProgressState::CheckEnd => STATE_CHECK_END,
            ProgressState::AllFinished => STATE_ALL_FINISHED,
            ProgressState::Other(s) => s,
        }
    }

    /// Parse an upstream value. Surrounding whitespace is ignored and the
    /// comparison is case-sensitive, matching the stored values.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            STATE_WORKING => ProgressState::Working,
            STATE_WORK_END => ProgressState::WorkEnd,
            STATE_CHECKING => ProgressState::Checking,
            STATE_CHECK_REJECT => ProgressState::CheckReject,
            STATE_CHECK_END => ProgressState::CheckEnd,
            STATE_ALL_FINISHED => ProgressState::AllFinished,
            other => ProgressState::Other(other.to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressState::CheckEnd | ProgressState::AllFinished)
    }
}

impl fmt::Display for ProgressState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ProgressState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProgressState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ProgressState::parse(&s))
    }
}
