//! Report runner: configuration from the environment, snapshot loading from
//! a database or a JSON file, and report output.

pub mod config;
pub mod error;
pub mod output;
pub mod run;
pub mod source;

pub use config::ReportSettings;
pub use error::ReportError;
pub use run::run;
