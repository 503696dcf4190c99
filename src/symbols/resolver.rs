//! Build and query the mangled-to-demangled symbol map.
//!
//! The map is built once per run from two `nm` dumps of the same binary
//! (raw and demangled), paired positionally by symbol slot. Lookups fall
//! through exact match, partial match, and on-demand demangling, with the
//! input returned unchanged as the final fallback.

use crate::symbols::source::SymbolSource;
use crate::utils::config::{MAX_DEMANGLED_LEN, UNKNOWN_FUNCTION};
use crate::utils::error::SymbolError;
use log::{debug, info};
use std::collections::HashMap;
use std::path::Path;

/// Immutable mangled-to-demangled name map
pub type SymbolMap = HashMap<String, String>;

/// Build the symbol map for a binary
///
/// **Public** - main entry point for the demangle pipeline
///
/// # Arguments
/// * `source` - symbol-table access (production: `nm` + `c++filt`)
/// * `binary` - compiled binary whose symbol table to read
///
/// # Errors
/// * `SymbolError::BinaryNotFound` - path does not exist
/// * `SymbolError::ToolUnavailable` / `ToolFailed` - `nm` missing or failing
pub fn build_symbol_map(
    source: &dyn SymbolSource,
    binary: &Path,
) -> Result<SymbolMap, SymbolError> {
    if !binary.exists() {
        return Err(SymbolError::BinaryNotFound(binary.to_path_buf()));
    }

    let demangled_lines = source.dump_symbols(binary, true)?;
    let raw_lines = source.dump_symbols(binary, false)?;

    let mut map = SymbolMap::new();
    let mut unpaired = Vec::new();

    // Pair raw and demangled entries positionally by slot
    for (slot, raw_line) in raw_lines.iter().enumerate() {
        let Some(raw_name) = symbol_name(raw_line) else {
            continue;
        };

        match demangled_lines.get(slot).and_then(|l| symbol_name(l)) {
            Some(demangled_name) => {
                map.insert(raw_name.to_string(), demangled_name.to_string());
            }
            None => unpaired.push(raw_name.to_string()),
        }
    }

    // Raw symbols that missed their slot go through the single-name
    // demangler; unchanged output keeps the mangled form (identity)
    for raw_name in unpaired {
        let demangled = source
            .demangle_one(&raw_name)
            .unwrap_or_else(|| raw_name.clone());
        map.insert(raw_name, demangled);
    }

    info!("Built symbol map with {} entries", map.len());
    Ok(map)
}

/// Resolve one name through the map
///
/// **Public** - lookup priority: exact, partial, on-demand demangle,
/// identity. Never fails.
///
/// Partial matching is deterministic: among mangled keys containing the
/// query, the shortest wins, ties broken lexicographically.
pub fn resolve(name: &str, map: &SymbolMap, source: &dyn SymbolSource) -> String {
    if name.is_empty() || name == UNKNOWN_FUNCTION {
        return name.to_string();
    }

    if let Some(demangled) = map.get(name) {
        return demangled.clone();
    }

    let partial = map
        .keys()
        .filter(|key| key.contains(name))
        .min_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    if let Some(key) = partial {
        debug!("Partial symbol match: {} -> {}", name, key);
        return map[key].clone();
    }

    if let Some(demangled) = source.demangle_one(name) {
        return demangled;
    }

    name.to_string()
}

/// Normalize a demangled name for CSV output
///
/// **Public** - collapses whitespace runs; names over the length cap are
/// reduced to `<base>(...)` keeping only the final scope segment
pub fn clean_symbol(name: &str) -> String {
    let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= MAX_DEMANGLED_LEN {
        return collapsed;
    }

    let base = collapsed.split('(').next().unwrap_or(&collapsed);
    let base = base.rsplit("::").next().unwrap_or(base).trim();
    format!("{}(...)", base)
}

/// Extract the symbol name from one `nm` output line
///
/// **Private** - the name is the remainder of the line after the address
/// and type fields, because demangled C++ names contain spaces. Undefined
/// symbols have a blank address field.
fn symbol_name(line: &str) -> Option<&str> {
    let trimmed = line.trim_end();
    if trimmed.is_empty() {
        return None;
    }

    let undefined = trimmed.starts_with(char::is_whitespace);
    let mut rest = trimmed.trim_start();

    if !undefined {
        // Skip the address field
        rest = rest.split_once(char::is_whitespace)?.1.trim_start();
    }

    // Skip the one-character type field
    let (_, name) = rest.split_once(char::is_whitespace)?;
    let name = name.trim_start();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Canned source: fixed dump lines, no real demangler unless seeded
    pub struct FakeSource {
        pub raw: Vec<String>,
        pub demangled: Vec<String>,
        pub single: HashMap<String, String>,
    }

    impl FakeSource {
        fn empty() -> Self {
            Self {
                raw: Vec::new(),
                demangled: Vec::new(),
                single: HashMap::new(),
            }
        }
    }

    impl SymbolSource for FakeSource {
        fn dump_symbols(&self, _binary: &Path, demangle: bool) -> Result<Vec<String>, SymbolError> {
            Ok(if demangle {
                self.demangled.clone()
            } else {
                self.raw.clone()
            })
        }

        fn demangle_one(&self, name: &str) -> Option<String> {
            self.single.get(name).cloned()
        }
    }

    fn map_of(entries: &[(&str, &str)]) -> SymbolMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_symbol_name_with_address() {
        assert_eq!(
            symbol_name("0000000000001234 T _Z3foov"),
            Some("_Z3foov")
        );
    }

    #[test]
    fn test_symbol_name_keeps_spaces_in_demangled_names() {
        assert_eq!(
            symbol_name("0000000000001234 T operator new(unsigned long)"),
            Some("operator new(unsigned long)")
        );
    }

    #[test]
    fn test_symbol_name_undefined_symbol() {
        assert_eq!(symbol_name("                 U malloc"), Some("malloc"));
    }

    #[test]
    fn test_symbol_name_rejects_blank_lines() {
        assert_eq!(symbol_name(""), None);
        assert_eq!(symbol_name("   "), None);
    }

    #[test]
    fn test_build_map_pairs_by_slot() {
        let source = FakeSource {
            raw: vec![
                "0000000000001000 T _Z3foov".to_string(),
                "0000000000002000 T main".to_string(),
            ],
            demangled: vec![
                "0000000000001000 T foo()".to_string(),
                "0000000000002000 T main".to_string(),
            ],
            single: HashMap::new(),
        };

        let map = build_symbol_map(&source, Path::new(".")).unwrap();
        assert_eq!(map["_Z3foov"], "foo()");
        assert_eq!(map["main"], "main");
    }

    #[test]
    fn test_build_map_falls_back_to_single_demangle() {
        let source = FakeSource {
            raw: vec![
                "0000000000001000 T _Z3foov".to_string(),
                "0000000000002000 T _Z3barv".to_string(),
            ],
            // Second slot missing: raw dump is longer than demangled dump
            demangled: vec!["0000000000001000 T foo()".to_string()],
            single: map_of(&[("_Z3barv", "bar()")]),
        };

        let map = build_symbol_map(&source, Path::new(".")).unwrap();
        assert_eq!(map["_Z3barv"], "bar()");
    }

    #[test]
    fn test_build_map_identity_when_demangle_fails() {
        let source = FakeSource {
            raw: vec!["0000000000001000 T strange_symbol".to_string()],
            demangled: Vec::new(),
            single: HashMap::new(),
        };

        let map = build_symbol_map(&source, Path::new(".")).unwrap();
        assert_eq!(map["strange_symbol"], "strange_symbol");
    }

    #[test]
    fn test_build_map_missing_binary() {
        let source = FakeSource::empty();
        let err = build_symbol_map(&source, Path::new("/no/such/binary")).unwrap_err();
        assert!(matches!(err, SymbolError::BinaryNotFound(_)));
    }

    #[test]
    fn test_resolve_exact_wins_over_partial() {
        let map = map_of(&[("foo", "exact()"), ("prefix_foo_suffix", "partial()")]);
        let source = FakeSource::empty();

        assert_eq!(resolve("foo", &map, &source), "exact()");
    }

    #[test]
    fn test_resolve_partial_shortest_key_wins() {
        let map = map_of(&[
            ("_Z3foov_long_variant", "long()"),
            ("_Z3foov", "short()"),
        ]);
        let source = FakeSource::empty();

        assert_eq!(resolve("foov", &map, &source), "short()");
    }

    #[test]
    fn test_resolve_unresolvable_is_identity() {
        let map = SymbolMap::new();
        let source = FakeSource::empty();

        assert_eq!(resolve("_Z7unknownv", &map, &source), "_Z7unknownv");
    }

    #[test]
    fn test_resolve_short_circuits_sentinel_and_empty() {
        let map = map_of(&[("UNKNOWN", "should_not_happen")]);
        let source = FakeSource::empty();

        assert_eq!(resolve("UNKNOWN", &map, &source), "UNKNOWN");
        assert_eq!(resolve("", &map, &source), "");
    }

    #[test]
    fn test_clean_symbol_collapses_whitespace() {
        assert_eq!(
            clean_symbol("operator  new  (unsigned   long)"),
            "operator new (unsigned long)"
        );
    }

    #[test]
    fn test_clean_symbol_caps_long_names() {
        let name = format!("ns::inner::{}({})", "f".repeat(80), "int, ".repeat(10));
        let cleaned = clean_symbol(&name);

        assert_eq!(cleaned, format!("{}(...)", "f".repeat(80)));
    }

    #[test]
    fn test_clean_symbol_short_names_untouched() {
        assert_eq!(clean_symbol("main"), "main");
    }
}
