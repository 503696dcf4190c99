//! External symbol-table access.
//!
//! Symbol extraction is modeled as a capability trait so the resolver's
//! matching logic can be tested against canned mappings without spawning
//! processes. The production implementation shells out to `nm` (twice:
//! demangled and raw) and to `c++filt` for single names.

use crate::utils::error::SymbolError;
use std::path::Path;
use std::process::Command;

/// Access to a binary's symbol table and a single-name demangler
///
/// **Public** - injected into the resolver; tests use a canned double
pub trait SymbolSource {
    /// Dump the symbol table, one line per symbol slot.
    ///
    /// The two invocation modes must produce the same slots in the same
    /// order; only the name rendering differs.
    fn dump_symbols(&self, binary: &Path, demangle: bool) -> Result<Vec<String>, SymbolError>;

    /// Demangle a single name. `None` when the facility cannot improve
    /// on the input (missing tool, failure, or unchanged output).
    fn demangle_one(&self, name: &str) -> Option<String>;
}

/// Production source backed by `nm` and `c++filt`
#[derive(Debug, Default)]
pub struct NmSymbolSource;

impl SymbolSource for NmSymbolSource {
    fn dump_symbols(&self, binary: &Path, demangle: bool) -> Result<Vec<String>, SymbolError> {
        let mut command = Command::new("nm");
        if demangle {
            command.arg("--demangle");
        }
        command.arg(binary);

        let output = command.output().map_err(|e| SymbolError::ToolUnavailable {
            tool: "nm",
            reason: e.to_string(),
        })?;

        if !output.status.success() {
            return Err(SymbolError::ToolFailed {
                tool: "nm",
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect())
    }

    fn demangle_one(&self, name: &str) -> Option<String> {
        let output = Command::new("c++filt").arg(name).output().ok()?;
        if !output.status.success() {
            return None;
        }

        let demangled = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if demangled.is_empty() || demangled == name {
            None
        } else {
            Some(demangled)
        }
    }
}
