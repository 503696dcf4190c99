//! Demangle command implementation.
//!
//! The demangle command:
//! 1. Builds the symbol map from the binary (nm, twice)
//! 2. Rewrites the CSV's function-name columns through the map
//! 3. Reports how many rows and names were touched

use crate::parser::CsvLayout;
use crate::symbols::{rewrite_csv, NmSymbolSource};
use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

/// Arguments for the demangle command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone, Default)]
pub struct DemangleArgs {
    /// Binary providing the symbol table
    pub binary: PathBuf,

    /// Input CSV with mangled names
    pub input: PathBuf,

    /// Output CSV path
    pub output: PathBuf,

    /// Explicit parent-column count for the positional layout
    pub parents: Option<usize>,

    /// Explicit layout, or None for detection
    pub layout: Option<CsvLayout>,
}

/// Validate demangle arguments
///
/// **Public** - called before execute_demangle for early validation
pub fn validate_args(args: &DemangleArgs) -> Result<()> {
    if args.binary.as_os_str().is_empty() {
        anyhow::bail!("Binary path cannot be empty");
    }

    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input CSV path cannot be empty");
    }

    if args.output.as_os_str().is_empty() {
        anyhow::bail!("Output CSV path cannot be empty");
    }

    if args.input == args.output {
        anyhow::bail!("Output path must differ from input path");
    }

    Ok(())
}

/// Execute the demangle command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Missing binary or input file
/// * `nm` unavailable or failing
/// * Output write errors
pub fn execute_demangle(args: DemangleArgs) -> Result<()> {
    info!(
        "Demangling {} against {}",
        args.input.display(),
        args.binary.display()
    );

    let source = NmSymbolSource;
    let stats = rewrite_csv(
        &source,
        &args.binary,
        &args.input,
        &args.output,
        args.layout,
        args.parents,
    )
    .with_context(|| format!("Failed to demangle {}", args.input.display()))?;

    println!(
        "Processed {} rows: {} names demangled, {} rows skipped",
        stats.rows_processed, stats.names_changed, stats.rows_skipped
    );
    println!("Output written to: {}", args.output.display());

    Ok(())
}
