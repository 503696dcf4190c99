//! Output writers for report data.
//!
//! Chart PNGs are produced by the `chart` module; this module handles the
//! JSON report artifact.

pub mod json;

// Re-export main functions
pub use json::{read_report, to_report, write_report, Report};
