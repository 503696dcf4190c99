//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a CSV table
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input file is empty: {}", .0.display())]
    EmptyInput(PathBuf),

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("header has {found} columns, expected at least {expected}")]
    HeaderTooShort { found: usize, expected: usize },

    #[error("no valid rows remain after cleaning ({dropped} dropped)")]
    NoValidRows { dropped: usize },
}

/// Errors that can occur during chart rendering
#[derive(Error, Debug)]
pub enum ChartError {
    /// No data points survived filtering. The caller is expected to skip
    /// this chart with a warning rather than abort the run.
    #[error("no data to plot for {0}")]
    EmptySeries(String),

    #[error("failed to launch plotter: {0}; make sure python3 and matplotlib are installed")]
    PlotterUnavailable(String),

    #[error("plotter exited with {status}: {stderr}")]
    PlotterFailed { status: String, stderr: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors that can occur during symbol-map construction and CSV rewriting
#[derive(Error, Debug)]
pub enum SymbolError {
    #[error("binary not found: {}", .0.display())]
    BinaryNotFound(PathBuf),

    #[error("schema error: {0}")]
    Schema(#[from] LoadError),

    #[error("{tool} is not available on PATH: {reason}")]
    ToolUnavailable { tool: &'static str, reason: String },

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: &'static str,
        status: String,
        stderr: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
