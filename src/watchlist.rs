// src/watchlist.rs
//! Watch-list discovery and parsing. A watch list is a single columnar file
//! of ticker symbols with no header row.

use csv::{ReaderBuilder, Trim};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MonitorError, Result};

/// Find the watch-list file in `dir`.
///
/// Returns `Ok(None)` when there is no candidate, and
/// [`MonitorError::DuplicateWatchList`] when there is more than one.
pub fn discover(dir: &Path, extension: &str) -> Result<Option<PathBuf>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if matches {
            found.push(path);
        }
    }
    found.sort();

    match found.len() {
        0 => Ok(None),
        1 => Ok(found.pop()),
        _ => Err(MonitorError::DuplicateWatchList(found)),
    }
}

/// Read tickers from the first column of each line.
pub fn load_tickers(path: &Path) -> Result<BTreeSet<String>> {
    let content = fs::read_to_string(path).map_err(|e| {
        MonitorError::Config(format!("reading watch list {}: {e}", path.display()))
    })?;
    parse_tickers(&content).map_err(|e| {
        MonitorError::Config(format!("parsing watch list {}: {e}", path.display()))
    })
}

/// Discover + load in one step. No file means an empty watch list.
pub fn load_from_dir(dir: &Path, extension: &str) -> Result<(Option<PathBuf>, BTreeSet<String>)> {
    match discover(dir, extension)? {
        Some(path) => {
            let tickers = load_tickers(&path)?;
            Ok((Some(path), tickers))
        }
        None => Ok((None, BTreeSet::new())),
    }
}

fn parse_tickers(content: &str) -> Result<BTreeSet<String>, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let mut out = BTreeSet::new();
    for record in reader.records() {
        let record = record?;
        // Spreadsheet exports may lead with a byte-order mark.
        let ticker = record
            .get(0)
            .unwrap_or_default()
            .trim_start_matches('\u{feff}')
            .trim();
        if !ticker.is_empty() {
            out.insert(ticker.to_string());
        }
    }
    Ok(out)
}
