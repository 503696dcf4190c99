//! Inspect command implementation.
//!
//! Sniffs a CSV and prints the detected delimiter, layout variant, and
//! column map so the user can confirm the schema before running a report
//! or a demangle pass.

use crate::parser::{infer_delimiter, resolve_columns, split_row, CsvLayout};
use crate::utils::config::DEMANGLE_DELIMITERS;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Execute the inspect command
///
/// **Public** - main entry point called from main.rs
pub fn execute_inspect(csv_path: PathBuf, layout: Option<CsvLayout>) -> Result<()> {
    let content = std::fs::read_to_string(&csv_path)
        .with_context(|| format!("Failed to read {}", csv_path.display()))?;

    let mut lines = content.lines().filter(|l| !l.trim().is_empty());
    let header_line = lines
        .next()
        .with_context(|| format!("Input file is empty: {}", csv_path.display()))?;

    let delimiter = infer_delimiter(header_line, DEMANGLE_DELIMITERS);
    let header = split_row(header_line, delimiter);
    let data_rows = lines.count();

    println!("File:       {}", csv_path.display());
    println!("Delimiter:  {}", describe_delimiter(delimiter));
    println!("Columns:    {}", header.len());
    println!("Data rows:  {}", data_rows);

    match resolve_columns(&header, layout) {
        Ok(map) => {
            println!("Layout:     {}", map.layout);
            println!("  instruction type  -> column {}", map.instruction_type + 1);
            println!("  count             -> column {}", map.count + 1);
            println!("  current function  -> column {}", map.current_function + 1);
            println!("  parent levels     -> {}", map.parent_levels());
        }
        Err(e) => {
            println!("Layout:     unrecognized ({})", e);
            anyhow::bail!("Could not resolve a layout for {}", csv_path.display());
        }
    }

    Ok(())
}

/// Human-readable delimiter name
///
/// **Private**
fn describe_delimiter(delimiter: char) -> &'static str {
    match delimiter {
        ',' => "comma",
        '\t' => "tab",
        ';' => "semicolon",
        '|' => "pipe",
        _ => "other",
    }
}
