//! Report writers.
//!
//! File output is written to a sibling temporary file and renamed into
//! place once complete, so a failed run never leaves a partial report.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use monitor_core::format::{ReportRow, REPORT_COLUMNS};

use crate::error::ReportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One JSON array holding every row.
    Json,
    /// One JSON object per line.
    JsonLines,
    /// Comma-separated values with a header row.
    Csv,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "jsonl" | "ndjson" => Some(OutputFormat::JsonLines),
            "csv" => Some(OutputFormat::Csv),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    /// `-` means stdout; anything else is a file path.
    pub fn parse(s: &str) -> Self {
        if s == "-" {
            OutputTarget::Stdout
        } else {
            OutputTarget::File(PathBuf::from(s))
        }
    }
}

/// Serialize `rows` in `format` into `writer`.
pub fn write_rows<W: Write>(
    mut writer: W,
    rows: &[ReportRow],
    format: OutputFormat,
) -> Result<(), ReportError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, rows)?;
            writer.write_all(b"\n")?;
        }
        OutputFormat::JsonLines => {
            for row in rows {
                serde_json::to_writer(&mut writer, row)?;
                writer.write_all(b"\n")?;
            }
        }
        OutputFormat::Csv => {
            // The header is written up front so an empty report still has one.
            let mut csv_writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(&mut writer);
            csv_writer.write_record(REPORT_COLUMNS)?;
            for row in rows {
                csv_writer.serialize(row)?;
            }
            csv_writer.flush()?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Write the report to its target.
pub fn write_report(
    rows: &[ReportRow],
    format: OutputFormat,
    target: &OutputTarget,
) -> Result<(), ReportError> {
    match target {
        OutputTarget::Stdout => {
            let stdout = io::stdout();
            write_rows(BufWriter::new(stdout.lock()), rows, format)
        }
        OutputTarget::File(path) => write_file_atomically(path, rows, format),
    }
}

fn write_file_atomically(
    path: &Path,
    rows: &[ReportRow],
    format: OutputFormat,
) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".partial");
    let tmp_path = PathBuf::from(tmp_name);

    let result = fs::File::create(&tmp_path)
        .map_err(ReportError::from)
        .and_then(|file| write_rows(BufWriter::new(file), rows, format));

    match result {
        Ok(()) => {
            fs::rename(&tmp_path, path)?;
            tracing::info!(path = %path.display(), rows = rows.len(), "Report written");
            Ok(())
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp_path);
            Err(e)
        }
    }
}
