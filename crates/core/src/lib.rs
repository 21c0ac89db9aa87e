//! Codemate: split source files into code and the comments that describe it.
//!
//! Raw file text is normalized into non-blank, renumbered codelines, scanned for
//! comments in the dialect of its extension, and returned as the codelines with comment
//! lines removed plus a list of comments paired with the code line they annotate.
//!
//! # Modules
//!
//! - [`dialect`]: Comment dialects per extension, with project overrides
//! - [`codelines`]: Blank-line removal, renumbering, filtering
//! - [`parser`]: The comment scanner
//! - [`pipeline`]: End-to-end processing and comment/codeline pairing
//! - [`dispatch`]: Per-extension routing around the pipeline
//! - [`source`]: Reading files from disk
//! - [`index`]: Deduplicating file index
//! - [`types`]: Shared data types

pub mod codelines;
pub mod dialect;
pub mod dispatch;
pub mod error;
pub mod index;
pub mod parser;
pub mod pipeline;
pub mod source;
pub mod types;

use std::path::Path;

use tracing::{debug, warn};

pub use dialect::{CommentDialect, Dialect, DialectRegistry, DialectSpec};
pub use error::{Error, Result};
pub use pipeline::{process, process_with};
pub use types::*;

// ---------------------------------------------------------------------------
// .codemate.toml config loading
// ---------------------------------------------------------------------------

/// Name of the per-project config file.
pub const CONFIG_FILE_NAME: &str = ".codemate.toml";

/// Known top-level keys in `.codemate.toml`.
const KNOWN_CONFIG_KEYS: &[&str] = &["aliases", "dialects"];

/// Known keys inside a `[dialects.<ext>]` table.
const KNOWN_DIALECT_KEYS: &[&str] = &["single_line", "multiline"];

/// Case-insensitive Levenshtein distance between two config keys, over chars.
/// Keeps a single row; `diag` holds the previous row's value left of the cursor.
fn edit_distance(typed: &str, known: &str) -> usize {
    let known: Vec<char> = known.chars().flat_map(char::to_lowercase).collect();
    let mut row: Vec<usize> = (0..=known.len()).collect();
    for (i, t) in typed.chars().flat_map(char::to_lowercase).enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, &k) in known.iter().enumerate() {
            let substitute = diag + usize::from(t != k);
            diag = row[j + 1];
            row[j + 1] = substitute.min(row[j] + 1).min(diag + 1);
        }
    }
    row[known.len()]
}

fn warn_unknown_keys(table: &toml::Table, known: &[&str], context: &str) {
    for key in table.keys().filter(|k| !known.contains(&k.as_str())) {
        match known.iter().min_by_key(|k| edit_distance(key, k)) {
            Some(suggestion) if edit_distance(key, suggestion) <= 3 => warn!(
                key = key.as_str(),
                suggestion = *suggestion,
                "Unknown key in {context}, did you mean '{suggestion}'?"
            ),
            _ => warn!(
                key = key.as_str(),
                "Unknown key in {context} (known keys: {})",
                known.join(", ")
            ),
        }
    }
}

fn string_list(value: &toml::Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(|v| v.as_str().map(|s| s.to_string())).collect())
        .unwrap_or_default()
}

fn dialect_spec(table: &toml::Table) -> DialectSpec {
    let single_line = table.get("single_line").map(string_list).unwrap_or_default();
    // A bare string entry is kept as a one-item pair so resolution reports the missing closer.
    let multiline = table
        .get("multiline")
        .and_then(|v| v.as_array())
        .map(|entries| {
            entries
                .iter()
                .map(|entry| match entry.as_str() {
                    Some(s) => vec![s.to_string()],
                    None => string_list(entry),
                })
                .collect()
        })
        .unwrap_or_default();
    DialectSpec { single_line, multiline }
}

/// Build a registry from a parsed `.codemate.toml` table.
///
/// Malformed values are skipped with a warning; dialect definitions are only checked
/// when an extension using them is resolved.
pub fn registry_from_table(table: &toml::Table) -> DialectRegistry {
    warn_unknown_keys(table, KNOWN_CONFIG_KEYS, CONFIG_FILE_NAME);
    let mut registry = DialectRegistry::builtin();

    if let Some(aliases) = table.get("aliases").and_then(|v| v.as_table()) {
        for (ext, value) in aliases {
            match value.as_str() {
                Some(name) => registry = registry.with_alias(ext, name),
                None => warn!(ext = ext.as_str(), "Alias must be a dialect name string"),
            }
        }
    }

    if let Some(dialects) = table.get("dialects").and_then(|v| v.as_table()) {
        for (ext, value) in dialects {
            match value.as_table() {
                Some(def) => {
                    warn_unknown_keys(def, KNOWN_DIALECT_KEYS, &format!("[dialects.{ext}]"));
                    registry = registry.with_dialect(ext, dialect_spec(def));
                }
                None => warn!(ext = ext.as_str(), "Dialect definition must be a table"),
            }
        }
    }

    registry
}

/// Load `.codemate.toml` from the given project root.
///
/// Returns the built-in registry if the file doesn't exist or can't be parsed (with a
/// warning in the latter case). Unknown keys trigger a warning with a typo suggestion.
pub fn load_codemate_config(project_root: &Path) -> DialectRegistry {
    let config_path = project_root.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return DialectRegistry::builtin();
    }

    debug!(path = %config_path.display(), "Loading {CONFIG_FILE_NAME}");
    match load_config_file(&config_path) {
        Ok(registry) => registry,
        Err(e) => {
            warn!(error = %e, "Ignoring {CONFIG_FILE_NAME}");
            DialectRegistry::builtin()
        }
    }
}

/// Load a config file the caller asked for explicitly. Read and TOML syntax errors
/// are reported instead of falling back to defaults.
pub fn load_config_file(path: &Path) -> Result<DialectRegistry> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config { path: path.to_path_buf(), message: e.to_string() })?;
    let table = content
        .parse::<toml::Table>()
        .map_err(|e| Error::Config { path: path.to_path_buf(), message: e.to_string() })?;
    Ok(registry_from_table(&table))
}
