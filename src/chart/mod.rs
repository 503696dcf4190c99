//! Chart rendering for report artifacts.
//!
//! Rendering is delegated to matplotlib through an embedded Python script
//! per chart type; the Rust side prepares the aggregated series and pipes
//! them over stdin. All styling travels in an explicit per-report
//! `ChartConfig` so no process-wide plotting state exists.

pub mod render;

use crate::utils::config::{LABEL_WRAP_WIDTH, MAX_LABEL_CHARS};
use std::path::PathBuf;

// Re-export main functions
pub use render::{render_category_chart, render_function_chart, render_heatmap};

/// Per-report chart configuration
///
/// **Public** - constructed by the report command from CLI args
#[derive(Debug, Clone)]
pub struct ChartConfig {
    /// Output file prefix (e.g. "instcount" -> "instcount_categories.png")
    pub prefix: String,

    /// Hierarchy depth used for function identifiers (part of file names)
    pub depth: usize,

    /// Identifiers longer than this are truncated before display
    pub label_cap: usize,

    /// Wrap width for function labels
    pub wrap_width: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            prefix: "instcount".to_string(),
            depth: 0,
            label_cap: MAX_LABEL_CHARS,
            wrap_width: LABEL_WRAP_WIDTH,
        }
    }
}

impl ChartConfig {
    pub fn new(prefix: impl Into<String>, depth: usize) -> Self {
        Self {
            prefix: prefix.into(),
            depth,
            ..Self::default()
        }
    }

    /// Path of the category bar chart
    pub fn categories_path(&self) -> PathBuf {
        PathBuf::from(format!("{}_categories.png", self.prefix))
    }

    /// Path of the top-functions bar chart
    pub fn top_functions_path(&self) -> PathBuf {
        PathBuf::from(format!(
            "{}_top_functions_level_{}.png",
            self.prefix, self.depth
        ))
    }

    /// Path of the function-by-category heatmap
    pub fn heatmap_path(&self) -> PathBuf {
        PathBuf::from(format!("{}_heatmap_level_{}.png", self.prefix, self.depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_paths_follow_prefix_and_depth() {
        let config = ChartConfig::new("run1", 2);

        assert_eq!(
            config.categories_path(),
            PathBuf::from("run1_categories.png")
        );
        assert_eq!(
            config.top_functions_path(),
            PathBuf::from("run1_top_functions_level_2.png")
        );
        assert_eq!(
            config.heatmap_path(),
            PathBuf::from("run1_heatmap_level_2.png")
        );
    }
}
