//! Effective-state reporting for annotation work records.
//!
//! The crate is pure: it reads in-memory snapshots and returns rows.
//!
//! - [`resolver`]: latest manual save per record key.
//! - [`key`]: normalisation of edit-log keys to `data_idx`.
//! - [`enrich`]: filtering, dimension joins and count overrides.
//! - [`format`]: the final report row, review link and display timezone.
//! - [`report`]: the assembled pipeline and its run summary.

pub mod config;
pub mod dimension;
pub mod enrich;
pub mod error;
pub mod format;
pub mod key;
pub mod model;
pub mod progress;
pub mod report;
pub mod resolver;
pub mod schema;
pub mod types;
pub mod window;

pub use config::{CohortFilter, ReportConfig};
pub use error::CoreError;
pub use report::{build_report, Report, ReportSummary, SourceSnapshot};
