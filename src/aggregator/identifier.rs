//! Build display identifiers from a function and its caller chain.
//!
//! An identifier joins up to `depth` ancestor names with the current
//! function name, farthest ancestor first:
//!
//! Example: "grandparent -> parent -> current"

use crate::parser::schema::InstructionRecord;
use crate::utils::config::{HIERARCHY_SEPARATOR, UNKNOWN_FUNCTION};

/// Options controlling identifier construction
///
/// **Public** - constructed from CLI args by the report command
#[derive(Debug, Clone, Copy)]
pub struct IdentifierOptions {
    /// Number of caller levels to include (0 = current function only)
    pub depth: usize,

    /// When more than two ancestors are collected, keep only the farthest
    /// and the nearest
    pub collapse: bool,
}

impl Default for IdentifierOptions {
    fn default() -> Self {
        Self {
            depth: 0,
            collapse: false,
        }
    }
}

/// Build the display identifier for one record
///
/// **Public** - pure and deterministic; no side effects
///
/// # Arguments
/// * `record` - row providing the current function and its caller chain
/// * `opts` - depth and collapse settings
///
/// # Returns
/// The joined identifier, or the sentinel when no usable name exists
pub fn build_identifier(record: &InstructionRecord, opts: &IdentifierOptions) -> String {
    let current = record.current_function.trim();

    if opts.depth == 0 {
        return if current.is_empty() {
            UNKNOWN_FUNCTION.to_string()
        } else {
            current.to_string()
        };
    }

    // Clamp to the parent levels this dataset actually has
    let max_levels = record.parents.len();
    let take = opts.depth.min(max_levels);

    // Walk from the farthest requested ancestor down to the direct caller
    let mut ancestors: Vec<&str> = Vec::new();
    for level in (1..=take).rev() {
        let name = record.parents[level - 1].trim();
        if !name.is_empty() {
            ancestors.push(name);
        }
    }

    if opts.collapse && ancestors.len() > 2 {
        ancestors = vec![ancestors[0], ancestors[ancestors.len() - 1]];
    }

    let mut parts = ancestors;
    if !current.is_empty() {
        parts.push(current);
    }

    if parts.is_empty() {
        UNKNOWN_FUNCTION.to_string()
    } else {
        parts.join(HIERARCHY_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(current: &str, parents: &[&str]) -> InstructionRecord {
        InstructionRecord {
            instruction_type: "ADD".to_string(),
            current_function: current.to_string(),
            parents: parents.iter().map(|p| p.to_string()).collect(),
            count: 1,
        }
    }

    fn opts(depth: usize, collapse: bool) -> IdentifierOptions {
        IdentifierOptions { depth, collapse }
    }

    #[test]
    fn test_depth_zero_returns_current() {
        let r = record("f", &["g"]);
        assert_eq!(build_identifier(&r, &opts(0, false)), "f");
    }

    #[test]
    fn test_depth_one_prepends_parent() {
        let r = record("f", &["g"]);
        assert_eq!(build_identifier(&r, &opts(1, false)), "g -> f");
    }

    #[test]
    fn test_depth_clamps_to_available_levels() {
        let r = record("f", &["g"]);
        assert_eq!(build_identifier(&r, &opts(2, false)), "g -> f");
    }

    #[test]
    fn test_farthest_ancestor_first() {
        let r = record("f", &["parent", "grandparent"]);
        assert_eq!(
            build_identifier(&r, &opts(2, false)),
            "grandparent -> parent -> f"
        );
    }

    #[test]
    fn test_empty_levels_are_skipped() {
        let r = record("f", &["", "grandparent"]);
        assert_eq!(build_identifier(&r, &opts(2, false)), "grandparent -> f");
    }

    #[test]
    fn test_sentinel_when_nothing_usable() {
        let r = record("  ", &[]);
        assert_eq!(build_identifier(&r, &opts(0, false)), "UNKNOWN");
        assert_eq!(build_identifier(&r, &opts(3, false)), "UNKNOWN");
    }

    #[test]
    fn test_collapse_keeps_first_and_last_ancestor() {
        let r = record("f", &["p3", "p2", "p1"]);
        // Collected farthest-first: p1, p2, p3 -> collapsed to p1, p3
        assert_eq!(build_identifier(&r, &opts(3, true)), "p1 -> p3 -> f");
    }

    #[test]
    fn test_collapse_noop_with_two_ancestors() {
        let r = record("f", &["near", "far"]);
        assert_eq!(build_identifier(&r, &opts(2, true)), "far -> near -> f");
    }
}
