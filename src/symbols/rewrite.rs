//! Rewrite a CSV's function-name columns with demangled names.
//!
//! The rewrite preserves the input's delimiter, column order, and row
//! widths. Only the current-function cell and the parent cells are
//! touched; ragged rows narrower than the fixed columns are skipped with
//! a warning and counted.

use crate::parser::schema::{positional_hierarchy, resolve_columns, ColumnMap, CsvLayout};
use crate::parser::table::{infer_delimiter, split_row};
use crate::symbols::resolver::{build_symbol_map, clean_symbol, resolve, SymbolMap};
use crate::symbols::source::SymbolSource;
use crate::utils::config::DEMANGLE_DELIMITERS;
use crate::utils::error::SymbolError;
use log::{info, warn};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Row bookkeeping from a rewrite pass
#[derive(Debug, Clone, Copy, Default)]
pub struct RewriteStats {
    /// Rows written through the resolver
    pub rows_processed: usize,

    /// Rows skipped for insufficient width
    pub rows_skipped: usize,

    /// Name cells actually changed by demangling
    pub names_changed: usize,
}

/// Demangle the function-name columns of a CSV
///
/// **Public** - main entry point for the demangle pipeline
///
/// # Arguments
/// * `source` - symbol-table access
/// * `binary` - binary providing the symbol table
/// * `input` / `output` - CSV paths; delimiter and column order carry over
/// * `layout` - explicit layout, or `None` for header-based detection with
///   a positional fallback
/// * `parents_override` - explicit parent-column count for the positional
///   variant
pub fn rewrite_csv(
    source: &dyn SymbolSource,
    binary: &Path,
    input: &Path,
    output: &Path,
    layout: Option<CsvLayout>,
    parents_override: Option<usize>,
) -> Result<RewriteStats, SymbolError> {
    let map = build_symbol_map(source, binary)?;

    let content = std::fs::read_to_string(input)?;
    let mut lines = content.lines();
    let Some(header_line) = lines.next() else {
        warn!("Input CSV is empty: {}", input.display());
        return Ok(RewriteStats::default());
    };

    let delimiter = infer_delimiter(header_line, DEMANGLE_DELIMITERS);
    let total_columns = header_line.split(delimiter).count();
    let columns = rewrite_columns(header_line, delimiter, total_columns, layout, parents_override)?;
    info!(
        "Rewrite layout: {} with {} parent column(s), delimiter {:?}",
        columns.layout,
        columns.parent_levels(),
        delimiter
    );

    let file = std::fs::File::create(output)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{}", header_line)?;

    let mut stats = RewriteStats::default();

    for (line_no, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let mut cells: Vec<String> = line.split(delimiter).map(str::to_string).collect();
        if cells.len() < columns.min_row_width() {
            warn!(
                "Skipping row {}: {} columns, need at least {}",
                line_no + 2,
                cells.len(),
                columns.min_row_width()
            );
            stats.rows_skipped += 1;
            continue;
        }

        stats.names_changed += rewrite_cell(&mut cells, columns.current_function, &map, source);
        for &idx in &columns.parents {
            if idx < cells.len() {
                stats.names_changed += rewrite_cell(&mut cells, idx, &map, source);
            }
        }

        writeln!(writer, "{}", cells.join(&delimiter.to_string()))?;
        stats.rows_processed += 1;
    }

    writer.flush()?;

    info!(
        "Rewrote {} rows ({} names demangled, {} rows skipped)",
        stats.rows_processed, stats.names_changed, stats.rows_skipped
    );

    Ok(stats)
}

/// Resolve and clean one cell in place; returns 1 if the value changed
///
/// **Private**
fn rewrite_cell(
    cells: &mut [String],
    idx: usize,
    map: &SymbolMap,
    source: &dyn SymbolSource,
) -> usize {
    let original = cells[idx].trim().to_string();
    let resolved = clean_symbol(&resolve(&original, map, source));

    if resolved != original {
        cells[idx] = resolved;
        1
    } else {
        0
    }
}

/// Pick the column map for a rewrite pass
///
/// **Private** - with no explicit layout, named-header detection runs
/// first and falls back to the positional convention (`total_columns - 3`
/// parent columns after type, count, and function). An explicit layout
/// that does not match the file is an error, not a guess.
fn rewrite_columns(
    header_line: &str,
    delimiter: char,
    total_columns: usize,
    layout: Option<CsvLayout>,
    parents_override: Option<usize>,
) -> Result<ColumnMap, SymbolError> {
    let header = split_row(header_line, delimiter);

    match layout {
        Some(choice) => Ok(resolve_columns(&header, Some(choice))?),
        None => Ok(resolve_columns(&header, None)
            .unwrap_or_else(|_| positional_hierarchy(total_columns, parents_override))),
    }
}
