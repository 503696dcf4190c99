//! Configuration and constants for the CLI.

/// Current JSON report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Placeholder used when no usable function name exists.
///
/// This matches the value the instrumentation pass itself emits for
/// instructions it cannot attribute to a routine.
pub const UNKNOWN_FUNCTION: &str = "UNKNOWN";

/// Join token between hierarchy levels in a function identifier
pub const HIERARCHY_SEPARATOR: &str = " -> ";

/// Delimiters considered when sniffing a reporting CSV
pub const REPORT_DELIMITERS: &[char] = &[',', '\t', ';'];

/// Delimiters considered when sniffing a CSV for demangling (adds pipe)
pub const DEMANGLE_DELIMITERS: &[char] = &[',', '\t', ';', '|'];

// Column name conventions for the named-header layout.
// The instrumentation pass writes Spanish headers.
pub const TYPE_COLUMN: &str = "Tipo_Instruccion";
pub const COUNT_COLUMN: &str = "Conteo";
pub const FUNCTION_COLUMN: &str = "Funcion_Actual";
pub const PARENT_COLUMN_PREFIX: &str = "Funcion_Padre_";

/// Fixed columns preceding the parent columns in the positional layouts
pub const FIXED_COLUMNS: usize = 3;

/// Parent levels in the six-column positional layout
pub const FIXED6_PARENTS: usize = 3;

/// Default number of functions in the top-functions chart
pub const DEFAULT_TOP_FUNCTIONS: usize = 15;

/// Default number of functions kept for the heatmap
pub const DEFAULT_HEATMAP_TOP: usize = 10;

/// Entries shown per table in the textual summary
pub const SUMMARY_TOP_ENTRIES: usize = 5;

/// Identifiers longer than this are truncated before chart display
pub const MAX_LABEL_CHARS: usize = 60;

/// Wrap width for function labels on the horizontal bar chart
pub const LABEL_WRAP_WIDTH: usize = 60;

/// Demangled names longer than this are reduced to `<base>(...)`
pub const MAX_DEMANGLED_LEN: usize = 100;
