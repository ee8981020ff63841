//! Output module for presenting crawl results
//!
//! This module handles:
//! - Materializing the drained page record store into a list of records
//! - Rendering records as plain data, data with page headings, or JSON
//! - Recording crawl statistics

pub mod stats;

pub use stats::{log_statistics, CrawlEvent, CrawlStatistics, CrawlStats};

use crate::config::OutputMode;
use crate::state::{PageRecord, PageRecordStore};
use crate::MaxtractError;
use std::collections::HashSet;
use std::io::Write;

/// Flattens a drained store into records ordered by address
///
/// Read-only: calling it twice on the same store yields the same records.
pub fn materialize(store: &PageRecordStore) -> Vec<PageRecord> {
    store.snapshot()
}

/// Writes records in the requested output mode
///
/// # Formats
///
/// - `DataOnly`: one match per line; with `unique`, repeated matches are printed once
/// - `Full`: each page address followed by its matches as `├─ <match>` lines
/// - `Json`: a single-line JSON array of `{url, children, data}` objects
/// - `PrettyJson`: the same array, indented
pub fn render<W: Write>(
    records: &[PageRecord],
    mode: OutputMode,
    unique: bool,
    out: &mut W,
) -> Result<(), MaxtractError> {
    match mode {
        OutputMode::DataOnly => {
            let mut seen = HashSet::new();
            for datum in records.iter().flat_map(|r| r.data.iter()) {
                if unique && !seen.insert(datum.as_str()) {
                    continue;
                }
                writeln!(out, "{}", datum)?;
            }
        }
        OutputMode::Full => {
            for record in records {
                writeln!(out, "{}", record.url)?;
                for datum in &record.data {
                    writeln!(out, "├─ {}", datum)?;
                }
            }
        }
        OutputMode::Json => {
            serde_json::to_writer(&mut *out, records)?;
            writeln!(out)?;
        }
        OutputMode::PrettyJson => {
            serde_json::to_writer_pretty(&mut *out, records)?;
            writeln!(out)?;
        }
    }

    Ok(())
}
