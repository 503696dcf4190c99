//! Instcount Studio
//!
//! Reporting and symbol-demangling utilities for the CSV output of an
//! instruction-count instrumentation pass.
//!
//! This crate provides the core implementation for the
//! `instcount` CLI tool.
//!
//! ## Getting Started
//!
//! Most users should install and use the CLI:
//!
//! ```bash
//! cargo install instcount-studio
//! instcount --help
//! ```

pub mod aggregator;
pub mod chart;
pub mod commands;
pub mod output;
pub mod parser;
pub mod symbols;
pub mod utils;
