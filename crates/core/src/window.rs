//! Datetime windows used by the report filters.
//!
//! The project cohort window is closed-open (`[start, end)`), the check-end
//! window is closed on both ends (`[start, end]`). Both are represented by a
//! single [`TimeWindow`] carrying its [`EndBound`].

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Whether the upper end of a window is part of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndBound {
    Exclusive,
    Inclusive,
}

/// A datetime range with an inclusive start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: Timestamp,
    pub end: Timestamp,
    pub end_bound: EndBound,
}

impl TimeWindow {
    /// `[start, end)`.
    pub fn half_open(start: Timestamp, end: Timestamp) -> Self {
        Self {
            start,
            end,
            end_bound: EndBound::Exclusive,
        }
    }

    /// `[start, end]`.
    pub fn closed(start: Timestamp, end: Timestamp) -> Self {
        Self {
            start,
            end,
            end_bound: EndBound::Inclusive,
        }
    }

    pub fn contains(&self, ts: Timestamp) -> bool {
        if ts < self.start {
            return false;
        }
        match self.end_bound {
            EndBound::Exclusive => ts < self.end,
            EndBound::Inclusive => ts <= self.end,
        }
    }

    /// Like [`contains`](Self::contains), with an absent timestamp never inside.
    pub fn contains_opt(&self, ts: Option<Timestamp>) -> bool {
        ts.is_some_and(|ts| self.contains(ts))
    }

    /// Reject inverted windows. `start == end` is allowed (an empty
    /// closed-open window or a single instant for a closed one).
    pub fn validate(&self, name: &str) -> Result<(), CoreError> {
        if self.start > self.end {
            return Err(CoreError::Configuration(format!(
                "{name}: start {} is after end {}",
                self.start.to_rfc3339(),
                self.end.to_rfc3339()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn ts(h: u32, m: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2025, 11, 20, h, m, 0).unwrap()
    }

    #[test]
    fn half_open_excludes_end() {
        let w = TimeWindow::half_open(ts(9, 0), ts(18, 0));
        assert!(w.contains(ts(9, 0)));
        assert!(w.contains(ts(17, 59)));
        assert!(!w.contains(ts(18, 0)));
        assert!(!w.contains(ts(8, 59)));
    }

    #[test]
    fn closed_includes_both_ends() {
        let w = TimeWindow::closed(ts(9, 0), ts(18, 0));
        assert!(w.contains(ts(9, 0)));
        assert!(w.contains(ts(18, 0)));
        assert!(!w.contains(ts(18, 0) + Duration::microseconds(1)));
        assert!(!w.contains(ts(9, 0) - Duration::microseconds(1)));
    }

    #[test]
    fn absent_timestamp_is_outside() {
        let w = TimeWindow::closed(ts(9, 0), ts(18, 0));
        assert!(!w.contains_opt(None));
        assert!(w.contains_opt(Some(ts(12, 0))));
    }

    #[test]
    fn inverted_window_rejected() {
        let w = TimeWindow::half_open(ts(18, 0), ts(9, 0));
        assert_matches!(
            w.validate("project_start_window"),
            Err(CoreError::Configuration(msg)) if msg.contains("project_start_window")
        );
    }

    #[test]
    fn degenerate_window_accepted() {
        let w = TimeWindow::closed(ts(9, 0), ts(9, 0));
        assert!(w.validate("check_end_window").is_ok());
        assert!(w.contains(ts(9, 0)));
    }
}
