//! Test harness for file-level integration tests.
//!
//! Copies a fixture project into a temp dir so tests can read, add and
//! overwrite files without touching the checked-in fixtures.

#![allow(dead_code)]

pub mod fixtures;

use codemate_core::dispatch::dispatch;
use codemate_core::source::SourceFile;
use codemate_core::{load_codemate_config, DialectRegistry, ProcessedFile};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct Project {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl Project {
    /// Create a project from a named fixture directory under `tests/fixtures`.
    pub fn from_fixture(name: &str) -> Self {
        let fixture_src =
            Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name);
        assert!(fixture_src.exists(), "Fixture '{name}' not found at {}", fixture_src.display());

        let project = Self::empty();
        let copied = fixtures::copy_fixture(&fixture_src, &project.root)
            .unwrap_or_else(|e| panic!("Failed to copy fixture '{name}': {e}"));
        assert!(copied > 0, "Fixture '{name}' is empty");
        project
    }

    /// Create an empty project directory.
    pub fn empty() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        Project { _temp_dir: temp_dir, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Write (or overwrite) a file in the project.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).expect("Failed to write fixture file");
        path
    }

    pub fn read(&self, name: &str) -> SourceFile {
        SourceFile::read(&self.path(name)).expect("Failed to read fixture file")
    }

    /// Registry from the project's `.codemate.toml`, or the built-in one.
    pub fn registry(&self) -> DialectRegistry {
        load_codemate_config(&self.root)
    }

    /// Read and dispatch a file with the project's registry.
    pub fn process(&self, name: &str) -> ProcessedFile {
        let file = self.read(name);
        dispatch(&self.registry(), &file)
            .unwrap_or_else(|e| panic!("processing {name} failed: {e}"))
    }
}
