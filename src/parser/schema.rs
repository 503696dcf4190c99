//! Input schema definitions for instrumentation CSVs.
//!
//! The instrumentation pass has produced more than one column convention
//! over time, so the layout is modeled explicitly instead of hard-coding
//! positions. Detection never guesses silently: the resolved layout is
//! surfaced to the user by the loader and by `instcount inspect`.

use crate::utils::config::{
    COUNT_COLUMN, FIXED6_PARENTS, FIXED_COLUMNS, FUNCTION_COLUMN, PARENT_COLUMN_PREFIX,
    TYPE_COLUMN,
};
use crate::utils::error::LoadError;

/// One row of the input table
#[derive(Debug, Clone)]
pub struct InstructionRecord {
    /// Instruction category (e.g. "ADD", "MUL", "NTT_BUTTERFLY")
    pub instruction_type: String,

    /// Function executing the instruction (possibly mangled)
    pub current_function: String,

    /// Caller chain, nearest parent first (`parent_1` is the direct caller)
    pub parents: Vec<String>,

    /// Execution count; always strictly positive after cleaning
    pub count: u64,
}

/// Detected CSV layout variant
///
/// **Public** - selected via `--layout` or by header sniffing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvLayout {
    /// Named-header layout: `Tipo_Instruccion`, `Conteo`, `Funcion_Actual`
    /// plus zero or more contiguous `Funcion_Padre_N` columns
    Hierarchy,

    /// Positional six-column layout:
    /// `type, function, parent_1, parent_2, parent_3, count`
    Fixed6,
}

impl std::fmt::Display for CsvLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CsvLayout::Hierarchy => write!(f, "hierarchy (named header)"),
            CsvLayout::Fixed6 => write!(f, "fixed (6 positional columns)"),
        }
    }
}

/// Resolved column positions for a concrete input file
#[derive(Debug, Clone)]
pub struct ColumnMap {
    pub layout: CsvLayout,
    pub instruction_type: usize,
    pub count: usize,
    pub current_function: usize,
    /// Parent column indices, `parent_1` first
    pub parents: Vec<usize>,
}

impl ColumnMap {
    /// Number of parent levels this file can provide
    pub fn parent_levels(&self) -> usize {
        self.parents.len()
    }

    /// Minimum row width required to read the fixed columns
    pub fn min_row_width(&self) -> usize {
        self.instruction_type
            .max(self.count)
            .max(self.current_function)
            + 1
    }
}

/// Resolve the column map for a header, honoring an explicit layout choice
///
/// **Public** - main entry point for layout detection
///
/// With `choice = None` the layout is sniffed: a header carrying the three
/// required names is `Hierarchy`; otherwise an exactly-six-column header
/// whose last column looks like a count is `Fixed6`. Anything else fails
/// with the list of missing columns.
pub fn resolve_columns(
    header: &[String],
    choice: Option<CsvLayout>,
) -> Result<ColumnMap, LoadError> {
    match choice {
        Some(CsvLayout::Hierarchy) => resolve_hierarchy(header),
        Some(CsvLayout::Fixed6) => resolve_fixed6(header),
        None => {
            if let Ok(map) = resolve_hierarchy(header) {
                return Ok(map);
            }
            if header.len() == FIXED_COLUMNS + FIXED6_PARENTS && has_count_tail(header) {
                return resolve_fixed6(header);
            }
            // Report the named columns that are actually absent
            resolve_hierarchy(header)
        }
    }
}

/// Build a positional hierarchy map for a headerless rewrite pass:
/// `type, count, function, parent_1..parent_N`
///
/// Parent count defaults to `total_columns - 3`; an explicit override wins.
pub fn positional_hierarchy(total_columns: usize, parents_override: Option<usize>) -> ColumnMap {
    let inferred = total_columns.saturating_sub(FIXED_COLUMNS);
    let parent_count = parents_override.unwrap_or(inferred);
    ColumnMap {
        layout: CsvLayout::Hierarchy,
        instruction_type: 0,
        count: 1,
        current_function: 2,
        parents: (FIXED_COLUMNS..FIXED_COLUMNS + parent_count).collect(),
    }
}

/// Resolve the named-header layout
///
/// **Private** - internal helper for resolve_columns
fn resolve_hierarchy(header: &[String]) -> Result<ColumnMap, LoadError> {
    let find = |name: &str| header.iter().position(|col| col.trim() == name);

    let instruction_type = find(TYPE_COLUMN);
    let count = find(COUNT_COLUMN);
    let current_function = find(FUNCTION_COLUMN);

    let mut missing = Vec::new();
    if instruction_type.is_none() {
        missing.push(TYPE_COLUMN.to_string());
    }
    if count.is_none() {
        missing.push(COUNT_COLUMN.to_string());
    }
    if current_function.is_none() {
        missing.push(FUNCTION_COLUMN.to_string());
    }
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }

    // Parent columns must be contiguous starting at 1; a gap ends the chain
    let mut parents = Vec::new();
    for level in 1.. {
        match find(&format!("{}{}", PARENT_COLUMN_PREFIX, level)) {
            Some(idx) => parents.push(idx),
            None => break,
        }
    }

    Ok(ColumnMap {
        layout: CsvLayout::Hierarchy,
        instruction_type: instruction_type.unwrap(),
        count: count.unwrap(),
        current_function: current_function.unwrap(),
        parents,
    })
}

/// Resolve the positional six-column layout
///
/// **Private** - internal helper for resolve_columns
fn resolve_fixed6(header: &[String]) -> Result<ColumnMap, LoadError> {
    let expected = FIXED_COLUMNS + FIXED6_PARENTS;
    if header.len() < expected {
        return Err(LoadError::HeaderTooShort {
            found: header.len(),
            expected,
        });
    }

    Ok(ColumnMap {
        layout: CsvLayout::Fixed6,
        instruction_type: 0,
        current_function: 1,
        parents: vec![2, 3, 4],
        count: 5,
    })
}

/// Check whether the final header column looks like a count column
///
/// **Private** - sniffing heuristic for the positional layout
fn has_count_tail(header: &[String]) -> bool {
    header
        .last()
        .map(|col| {
            let col = col.trim();
            col.eq_ignore_ascii_case(COUNT_COLUMN) || col.eq_ignore_ascii_case("Count")
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_resolve_hierarchy_basic() {
        let h = header(&["Tipo_Instruccion", "Conteo", "Funcion_Actual"]);
        let map = resolve_columns(&h, None).unwrap();

        assert_eq!(map.layout, CsvLayout::Hierarchy);
        assert_eq!(map.instruction_type, 0);
        assert_eq!(map.count, 1);
        assert_eq!(map.current_function, 2);
        assert!(map.parents.is_empty());
    }

    #[test]
    fn test_resolve_hierarchy_with_parents() {
        let h = header(&[
            "Tipo_Instruccion",
            "Conteo",
            "Funcion_Actual",
            "Funcion_Padre_1",
            "Funcion_Padre_2",
        ]);
        let map = resolve_columns(&h, None).unwrap();

        assert_eq!(map.parents, vec![3, 4]);
        assert_eq!(map.parent_levels(), 2);
    }

    #[test]
    fn test_resolve_hierarchy_trims_names() {
        let h = header(&[" Tipo_Instruccion ", "Conteo ", " Funcion_Actual"]);
        assert!(resolve_columns(&h, None).is_ok());
    }

    #[test]
    fn test_parent_chain_stops_at_gap() {
        let h = header(&[
            "Tipo_Instruccion",
            "Conteo",
            "Funcion_Actual",
            "Funcion_Padre_1",
            "Funcion_Padre_3",
        ]);
        let map = resolve_columns(&h, None).unwrap();

        // Padre_2 is absent, so Padre_3 is not part of the chain
        assert_eq!(map.parents, vec![3]);
    }

    #[test]
    fn test_missing_columns_reported_by_name() {
        let h = header(&["Tipo_Instruccion", "Funcion_Actual"]);
        let err = resolve_columns(&h, None).unwrap_err();

        match err {
            LoadError::MissingColumns(cols) => assert_eq!(cols, vec!["Conteo".to_string()]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_sniff_fixed6() {
        let h = header(&[
            "Tipo",
            "Funcion",
            "Padre_1",
            "Padre_2",
            "Padre_3",
            "Conteo",
        ]);
        let map = resolve_columns(&h, None).unwrap();

        assert_eq!(map.layout, CsvLayout::Fixed6);
        assert_eq!(map.current_function, 1);
        assert_eq!(map.count, 5);
        assert_eq!(map.parents, vec![2, 3, 4]);
    }

    #[test]
    fn test_explicit_fixed6_too_short() {
        let h = header(&["a", "b", "c"]);
        let err = resolve_columns(&h, Some(CsvLayout::Fixed6)).unwrap_err();
        assert!(matches!(err, LoadError::HeaderTooShort { found: 3, .. }));
    }

    #[test]
    fn test_positional_hierarchy_inference() {
        let map = positional_hierarchy(5, None);
        assert_eq!(map.parents, vec![3, 4]);

        let map = positional_hierarchy(5, Some(1));
        assert_eq!(map.parents, vec![3]);
    }
}
