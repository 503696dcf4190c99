//! Report command implementation.
//!
//! The report command:
//! 1. Loads and cleans the instrumentation CSV
//! 2. Aggregates counts by category and by function identifier
//! 3. Renders the category chart, top-functions chart, and heatmap
//! 4. Prints the textual summary
//! 5. Optionally writes a JSON report artifact

use crate::aggregator::{
    pivot_counts, sum_by_category, sum_by_function, top_n, IdentifierOptions, ReportSummary,
};
use crate::chart::{render_category_chart, render_function_chart, render_heatmap, ChartConfig};
use crate::output::{to_report, write_report};
use crate::parser::{load_table, CsvLayout};
use crate::utils::config::{DEFAULT_HEATMAP_TOP, DEFAULT_TOP_FUNCTIONS};
use crate::utils::error::ChartError;
use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;

/// Arguments for the report command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ReportArgs {
    /// Input CSV path
    pub csv_path: PathBuf,

    /// Caller levels included in function identifiers
    pub depth: usize,

    /// Functions shown on the horizontal bar chart
    pub top_functions: usize,

    /// Output file prefix for the chart PNGs
    pub prefix: String,

    /// Render the heatmap
    pub heatmap: bool,

    /// Functions kept for the heatmap
    pub heatmap_top: usize,

    /// Collapse long parent chains to farthest + nearest
    pub collapse: bool,

    /// Explicit layout, or None to sniff
    pub layout: Option<CsvLayout>,

    /// Optional JSON report path
    pub output_json: Option<PathBuf>,
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::new(),
            depth: 0,
            top_functions: DEFAULT_TOP_FUNCTIONS,
            prefix: "instcount".to_string(),
            heatmap: true,
            heatmap_top: DEFAULT_HEATMAP_TOP,
            collapse: false,
            layout: None,
            output_json: None,
        }
    }
}

/// Validate report arguments
///
/// **Public** - called before execute_report for early validation
pub fn validate_args(args: &ReportArgs) -> Result<()> {
    if args.csv_path.as_os_str().is_empty() {
        anyhow::bail!("CSV path cannot be empty");
    }

    if args.prefix.is_empty() {
        anyhow::bail!("Output prefix cannot be empty");
    }

    if args.top_functions == 0 {
        anyhow::bail!("top must be greater than 0");
    }

    if args.top_functions > 1000 {
        anyhow::bail!("top is too large (max 1000)");
    }

    if args.heatmap && args.heatmap_top == 0 {
        anyhow::bail!("heatmap-top must be greater than 0");
    }

    Ok(())
}

/// Execute the report command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * CSV load/schema failures
/// * Plotter launch failures (empty filtered series only skip the chart)
/// * JSON write errors
pub fn execute_report(args: ReportArgs) -> Result<()> {
    info!("Starting report for: {}", args.csv_path.display());

    // Step 1: Load and clean the CSV
    info!("Step 1/5: Loading CSV...");
    let table = load_table(&args.csv_path, args.layout)
        .with_context(|| format!("Failed to load {}", args.csv_path.display()))?;

    info!(
        "Loaded {} records ({} rows dropped)",
        table.records.len(),
        table.stats.rows_dropped
    );

    let opts = IdentifierOptions {
        depth: args.depth.min(table.columns.parent_levels()),
        collapse: args.collapse,
    };
    if opts.depth < args.depth {
        warn!(
            "Requested depth {} exceeds available parent levels, clamped to {}",
            args.depth, opts.depth
        );
    }

    let chart_config = ChartConfig::new(&args.prefix, opts.depth);

    // Step 2: Aggregate and render categories
    info!("Step 2/5: Aggregating categories...");
    let categories = sum_by_category(&table.records);
    render_or_skip(
        render_category_chart(&categories, &chart_config),
        "category chart",
    )?;

    // Step 3: Aggregate and render top functions
    info!("Step 3/5: Aggregating functions at depth {}...", opts.depth);
    let functions = sum_by_function(&table.records, &opts);
    let top = top_n(functions.clone(), args.top_functions);
    render_or_skip(
        render_function_chart(&top, &chart_config),
        "top-functions chart",
    )?;

    // Step 4: Heatmap (if requested)
    if args.heatmap {
        info!("Step 4/5: Building heatmap...");
        let matrix = pivot_counts(&table.records, &opts, args.heatmap_top);
        render_or_skip(render_heatmap(&matrix, &chart_config), "heatmap")?;
    } else {
        info!("Step 4/5: Skipping heatmap (not requested)");
    }

    // Step 5: Summary
    info!("Step 5/5: Writing summary...");
    let summary = ReportSummary::build(&categories, &functions);

    println!("\n{}", "=".repeat(72));
    println!("INSTRUCTION COUNT SUMMARY");
    println!("{}", "=".repeat(72));
    println!("{}", summary.render_text());
    println!("{}", "=".repeat(72));

    if let Some(json_path) = &args.output_json {
        let report = to_report(&args.csv_path, opts.depth, summary);
        write_report(&report, json_path).context("Failed to write report JSON")?;
        info!("Report written to: {}", json_path.display());
    }

    Ok(())
}

/// Treat an empty filtered series as a skip, everything else as fatal
///
/// **Private** - implements the degrade-to-warning policy for renders
fn render_or_skip(
    result: std::result::Result<PathBuf, ChartError>,
    what: &str,
) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(ChartError::EmptySeries(_)) => {
            warn!("Skipping {}: no qualifying rows after filtering", what);
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to render {}", what)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_args() -> ReportArgs {
        ReportArgs {
            csv_path: PathBuf::from("counts.csv"),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_args_valid() {
        assert!(validate_args(&valid_args()).is_ok());
    }

    #[test]
    fn test_validate_args_empty_csv_path() {
        let args = ReportArgs::default();
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_empty_prefix() {
        let args = ReportArgs {
            prefix: String::new(),
            ..valid_args()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_zero_top() {
        let args = ReportArgs {
            top_functions: 0,
            ..valid_args()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_top_too_large() {
        let args = ReportArgs {
            top_functions: 2000,
            ..valid_args()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_zero_heatmap_top() {
        let args = ReportArgs {
            heatmap_top: 0,
            ..valid_args()
        };
        assert!(validate_args(&args).is_err());

        let args = ReportArgs {
            heatmap: false,
            heatmap_top: 0,
            ..valid_args()
        };
        assert!(validate_args(&args).is_ok());
    }
}
