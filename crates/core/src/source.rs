//! Source file acquisition.

use crate::error::{Error, Result};
use std::path::Path;

/// Raw text of a file plus the metadata the pipeline and index need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub raw_text: String,
    pub extension: Option<String>,
    pub display_name: String,
    pub byte_length: u64,
}

impl SourceFile {
    /// Read a whole file as UTF-8 text.
    pub fn read(path: &Path) -> Result<Self> {
        let raw_text = std::fs::read_to_string(path)
            .map_err(|source| Error::Unavailable { path: path.to_path_buf(), source })?;
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::from_text(display_name, raw_text))
    }

    /// Wrap in-memory text; the extension comes from `display_name`.
    pub fn from_text(display_name: impl Into<String>, raw_text: impl Into<String>) -> Self {
        let display_name = display_name.into();
        let raw_text = raw_text.into();
        Self {
            extension: extension_of(&display_name),
            byte_length: raw_text.len() as u64,
            display_name,
            raw_text,
        }
    }

    /// Replace the extension, e.g. when the caller knows the language better than the name.
    pub fn with_extension(mut self, extension: Option<String>) -> Self {
        self.extension = extension;
        self
    }
}

/// Extension of a file name, without the dot. Dotfiles like `.bashrc` have none.
pub fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| e.to_string())
}
