//! Instcount Studio CLI
//!
//! Offline analysis for instruction-count instrumentation output.
//! Generates charts and summaries from the counter CSV, and rewrites
//! mangled function names using a binary's symbol table.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use instcount_studio::commands::{
    demangle, execute_demangle, execute_inspect, execute_report, report, DemangleArgs, ReportArgs,
};
use instcount_studio::parser::CsvLayout;
use instcount_studio::utils::config::SCHEMA_VERSION;
use std::path::PathBuf;

/// Instcount Studio - reporting and demangling for instrumentation CSVs
#[derive(Parser, Debug)]
#[command(name = "instcount")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// CSV layout selection
#[derive(ValueEnum, Debug, Clone, Copy)]
enum LayoutArg {
    /// Sniff the layout from the header
    Auto,
    /// Named-header layout with Funcion_Padre_N columns
    Hierarchy,
    /// Positional six-column layout
    Fixed,
}

impl LayoutArg {
    fn to_layout(self) -> Option<CsvLayout> {
        match self {
            LayoutArg::Auto => None,
            LayoutArg::Hierarchy => Some(CsvLayout::Hierarchy),
            LayoutArg::Fixed => Some(CsvLayout::Fixed6),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Aggregate a counter CSV into charts and a summary
    Report {
        /// Input CSV path
        csv: PathBuf,

        /// Caller levels included in function identifiers
        #[arg(short, long, default_value = "0")]
        depth: usize,

        /// Number of functions on the top-functions chart
        #[arg(long, default_value = "15")]
        top: usize,

        /// Output file prefix for the chart PNGs
        #[arg(short, long, default_value = "instcount")]
        prefix: String,

        /// Skip the heatmap
        #[arg(long)]
        no_heatmap: bool,

        /// Number of functions kept for the heatmap
        #[arg(long, default_value = "10")]
        heatmap_top: usize,

        /// Collapse long parent chains to farthest + nearest
        #[arg(long)]
        collapse_parents: bool,

        /// CSV layout
        #[arg(long, value_enum, default_value_t = LayoutArg::Auto)]
        layout: LayoutArg,

        /// Also write a JSON report to this path
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Rewrite a CSV's mangled function names using a binary's symbols
    Demangle {
        /// Binary providing the symbol table
        binary: PathBuf,

        /// Input CSV with mangled names
        input: PathBuf,

        /// Output CSV path
        output: PathBuf,

        /// Explicit parent-column count (default: columns - 3)
        #[arg(long)]
        parents: Option<usize>,

        /// CSV layout
        #[arg(long, value_enum, default_value_t = LayoutArg::Auto)]
        layout: LayoutArg,
    },

    /// Print the detected delimiter and layout of a CSV
    Inspect {
        /// CSV path to inspect
        csv: PathBuf,

        /// CSV layout
        #[arg(long, value_enum, default_value_t = LayoutArg::Auto)]
        layout: LayoutArg,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Report {
            csv,
            depth,
            top,
            prefix,
            no_heatmap,
            heatmap_top,
            collapse_parents,
            layout,
            json,
        } => {
            let args = ReportArgs {
                csv_path: csv,
                depth,
                top_functions: top,
                prefix,
                heatmap: !no_heatmap,
                heatmap_top,
                collapse: collapse_parents,
                layout: layout.to_layout(),
                output_json: json,
            };

            report::validate_args(&args)?;
            execute_report(args)?;
        }

        Commands::Demangle {
            binary,
            input,
            output,
            parents,
            layout,
        } => {
            let args = DemangleArgs {
                binary,
                input,
                output,
                parents,
                layout: layout.to_layout(),
            };

            demangle::validate_args(&args)?;
            execute_demangle(args)?;
        }

        Commands::Inspect { csv, layout } => {
            execute_inspect(csv, layout.to_layout())?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("Instcount Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Offline analysis for instruction-count instrumentation output.");
}
