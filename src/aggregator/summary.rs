//! Aggregation of instruction records into ranked tables and summaries.
//!
//! This module transforms loaded records into:
//! - Category and function count tables (for the bar charts)
//! - A function-by-category pivot matrix (for the heatmap)
//! - Run-level summary statistics (for stdout and the JSON report)

use crate::aggregator::identifier::{build_identifier, IdentifierOptions};
use crate::parser::schema::InstructionRecord;
use crate::utils::config::{SUMMARY_TOP_ENTRIES, UNKNOWN_FUNCTION};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sum counts per instruction category, ranked by descending count
///
/// **Public** - feeds the category chart and the textual summary
pub fn sum_by_category(records: &[InstructionRecord]) -> Vec<(String, u64)> {
    let mut totals: HashMap<String, u64> = HashMap::new();
    for record in records {
        *totals.entry(record.instruction_type.clone()).or_insert(0) += record.count;
    }
    sorted_table(totals)
}

/// Sum counts per function identifier, ranked by descending count
///
/// **Public** - feeds the top-functions chart, heatmap, and summary
///
/// Records whose identifier is the sentinel (or blank) are skipped.
pub fn sum_by_function(
    records: &[InstructionRecord],
    opts: &IdentifierOptions,
) -> Vec<(String, u64)> {
    let mut totals: HashMap<String, u64> = HashMap::new();
    for record in records {
        let identifier = build_identifier(record, opts);
        if identifier == UNKNOWN_FUNCTION || identifier.is_empty() {
            continue;
        }
        *totals.entry(identifier).or_insert(0) += record.count;
    }
    sorted_table(totals)
}

/// Truncate a ranked table to its first `n` entries
pub fn top_n(mut table: Vec<(String, u64)>, n: usize) -> Vec<(String, u64)> {
    table.truncate(n);
    table
}

/// Function-by-category count grid for the heatmap
///
/// Rows follow `functions` order (hottest first); columns follow
/// `categories` order. Missing combinations are zero.
#[derive(Debug, Clone)]
pub struct PivotMatrix {
    pub functions: Vec<String>,
    pub categories: Vec<String>,
    pub cells: Vec<Vec<u64>>,
}

impl PivotMatrix {
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() || self.categories.is_empty()
    }
}

/// Pivot the records into a top-K-function by category matrix
///
/// **Public** - heatmap data source
pub fn pivot_counts(
    records: &[InstructionRecord],
    opts: &IdentifierOptions,
    top_k: usize,
) -> PivotMatrix {
    let functions: Vec<String> = top_n(sum_by_function(records, opts), top_k)
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    let categories: Vec<String> = sum_by_category(records)
        .into_iter()
        .map(|(name, _)| name)
        .collect();

    let function_index: HashMap<&str, usize> = functions
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();
    let category_index: HashMap<&str, usize> = categories
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    let mut cells = vec![vec![0u64; categories.len()]; functions.len()];
    for record in records {
        let identifier = build_identifier(record, opts);
        let (Some(&row), Some(&col)) = (
            function_index.get(identifier.as_str()),
            category_index.get(record.instruction_type.as_str()),
        ) else {
            continue;
        };
        cells[row][col] += record.count;
    }

    debug!(
        "Pivoted {} records into {}x{} matrix",
        records.len(),
        functions.len(),
        categories.len()
    );

    PivotMatrix {
        functions,
        categories,
        cells,
    }
}

/// One ranked entry in the textual/JSON summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub label: String,
    pub count: u64,
    /// Share of the grand total, in percent
    pub percentage: f64,
}

/// Run-level summary statistics
///
/// **Public** - printed to stdout and embedded in the JSON report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Grand total of all instruction counts
    pub total_instructions: u64,

    /// Number of distinct instruction categories
    pub category_count: usize,

    /// Number of distinct function identifiers
    pub function_count: usize,

    /// Top categories with percentage of the grand total
    pub top_categories: Vec<SummaryEntry>,

    /// Top function identifiers with percentage of the grand total
    pub top_functions: Vec<SummaryEntry>,
}

impl ReportSummary {
    /// Build the summary from already-ranked tables
    ///
    /// **Public** - tables come from `sum_by_category` / `sum_by_function`
    pub fn build(categories: &[(String, u64)], functions: &[(String, u64)]) -> Self {
        let total: u64 = categories.iter().map(|(_, count)| count).sum();

        Self {
            total_instructions: total,
            category_count: categories.len(),
            function_count: functions.len(),
            top_categories: rank_entries(categories, total),
            top_functions: rank_entries(functions, total),
        }
    }

    /// Render the summary as an aligned text block for stdout
    pub fn render_text(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Total instructions:    {}", self.total_instructions));
        lines.push(format!("Distinct categories:   {}", self.category_count));
        lines.push(format!("Distinct functions:    {}", self.function_count));

        lines.push(String::new());
        lines.push(format!("Top {} categories:", self.top_categories.len()));
        for entry in &self.top_categories {
            lines.push(format_entry(entry));
        }

        lines.push(String::new());
        lines.push(format!("Top {} functions:", self.top_functions.len()));
        for entry in &self.top_functions {
            lines.push(format_entry(entry));
        }

        lines.join("\n")
    }
}

fn format_entry(entry: &SummaryEntry) -> String {
    format!(
        "  {:<50} {:>12} {:>6.1}%",
        entry.label, entry.count, entry.percentage
    )
}

/// Take the top entries of a ranked table, with percentages
///
/// **Private** - internal helper for ReportSummary::build
fn rank_entries(table: &[(String, u64)], total: u64) -> Vec<SummaryEntry> {
    table
        .iter()
        .take(SUMMARY_TOP_ENTRIES)
        .map(|(label, count)| SummaryEntry {
            label: label.clone(),
            count: *count,
            percentage: if total > 0 {
                (*count as f64 / total as f64) * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

/// Sort an aggregation map by descending count, label ascending on ties
///
/// **Private** - keeps every ranked table deterministic
fn sorted_table(totals: HashMap<String, u64>) -> Vec<(String, u64)> {
    let mut table: Vec<(String, u64)> = totals.into_iter().collect();
    table.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    table
}
