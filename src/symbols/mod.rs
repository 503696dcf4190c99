//! Symbol-table extraction, demangling, and CSV rewriting.
//!
//! This module handles:
//! - Dumping a binary's symbol table via external tools
//! - Building the mangled-to-demangled map
//! - Rewriting function-name columns in instrumentation CSVs

pub mod resolver;
pub mod rewrite;
pub mod source;

// Re-export main types and functions
pub use resolver::{build_symbol_map, clean_symbol, resolve, SymbolMap};
pub use rewrite::{rewrite_csv, RewriteStats};
pub use source::{NmSymbolSource, SymbolSource};
