//! CSV loading and row cleaning.
//!
//! The loader reads the whole file, infers the delimiter from the first
//! line, resolves the column layout, and coerces each data row into an
//! `InstructionRecord`. Malformed rows are dropped and counted; malformed
//! files are fatal.

use crate::parser::schema::{resolve_columns, ColumnMap, CsvLayout, InstructionRecord};
use crate::utils::config::REPORT_DELIMITERS;
use crate::utils::error::LoadError;
use log::{debug, info, warn};
use std::path::Path;

/// Row bookkeeping from a load pass
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadStats {
    /// Data rows seen (blank lines excluded)
    pub rows_read: usize,

    /// Rows dropped for width or count-coercion failures
    pub rows_dropped: usize,
}

/// A validated in-memory table
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub delimiter: char,
    pub columns: ColumnMap,
    pub records: Vec<InstructionRecord>,
    pub stats: LoadStats,
}

/// Infer the column delimiter from the first line of a file
///
/// **Public** - shared by the loader and the demangle rewrite
///
/// Counts occurrences of each candidate; the single highest count wins.
/// A tie or zero matches falls back to comma.
pub fn infer_delimiter(first_line: &str, candidates: &[char]) -> char {
    let counts: Vec<usize> = candidates
        .iter()
        .map(|d| first_line.matches(*d).count())
        .collect();

    let max = counts.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return ',';
    }

    let winners: Vec<char> = candidates
        .iter()
        .zip(&counts)
        .filter(|(_, c)| **c == max)
        .map(|(d, _)| *d)
        .collect();

    if winners.len() == 1 {
        winners[0]
    } else {
        ','
    }
}

/// Split a line into trimmed cells
///
/// **Public** - shared by the loader and the demangle rewrite
pub fn split_row(line: &str, delimiter: char) -> Vec<String> {
    line.split(delimiter).map(|c| c.trim().to_string()).collect()
}

/// Load and validate an instrumentation CSV
///
/// **Public** - main entry point for both pipelines
///
/// # Arguments
/// * `path` - CSV file to read
/// * `layout` - explicit layout, or `None` to sniff from the header
///
/// # Errors
/// * `LoadError::Io` - file missing or unreadable
/// * `LoadError::EmptyInput` - no header line
/// * `LoadError::MissingColumns` / `HeaderTooShort` - schema failure
/// * `LoadError::NoValidRows` - every data row was dropped
pub fn load_table(path: &Path, layout: Option<CsvLayout>) -> Result<LoadedTable, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut lines = content.lines().filter(|l| !l.trim().is_empty());
    let header_line = lines
        .next()
        .ok_or_else(|| LoadError::EmptyInput(path.to_path_buf()))?;

    let delimiter = infer_delimiter(header_line, REPORT_DELIMITERS);
    debug!("Inferred delimiter: {:?}", delimiter);

    let header = split_row(header_line, delimiter);
    let columns = resolve_columns(&header, layout)?;
    info!(
        "Detected layout: {} with {} parent level(s)",
        columns.layout,
        columns.parent_levels()
    );

    let mut stats = LoadStats::default();
    let mut records = Vec::new();

    for line in lines {
        stats.rows_read += 1;

        match coerce_row(&split_row(line, delimiter), &columns) {
            Some(record) => records.push(record),
            None => stats.rows_dropped += 1,
        }
    }

    if stats.rows_dropped > 0 {
        warn!(
            "Dropped {} of {} rows during cleaning",
            stats.rows_dropped, stats.rows_read
        );
    }

    if records.is_empty() {
        return Err(LoadError::NoValidRows {
            dropped: stats.rows_dropped,
        });
    }

    debug!("Loaded {} valid records", records.len());

    Ok(LoadedTable {
        delimiter,
        columns,
        records,
        stats,
    })
}

/// Coerce one data row into a record, or reject it
///
/// **Private** - a `None` here means the row is dropped, not fatal
fn coerce_row(cells: &[String], columns: &ColumnMap) -> Option<InstructionRecord> {
    if cells.len() < columns.min_row_width() {
        return None;
    }

    // Count must parse as a strictly positive integer
    let count: u64 = cells[columns.count].parse().ok()?;
    if count == 0 {
        return None;
    }

    let parents = columns
        .parents
        .iter()
        .map(|&idx| cells.get(idx).cloned().unwrap_or_default())
        .collect();

    Some(InstructionRecord {
        instruction_type: cells[columns.instruction_type].clone(),
        current_function: cells[columns.current_function].clone(),
        parents,
        count,
    })
}
