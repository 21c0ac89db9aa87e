//! Fixture file utilities for integration tests.

use std::path::Path;

/// Copy every file of a fixture tree into `dst`, creating directories as needed.
/// Returns how many files were copied.
pub fn copy_fixture(src: &Path, dst: &Path) -> std::io::Result<usize> {
    std::fs::create_dir_all(dst)?;
    let mut copied = 0;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copied += copy_fixture(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Codeline texts, for compact assertions on processed output.
pub fn codeline_texts(lines: &[codemate_core::Codeline]) -> Vec<&str> {
    lines.iter().map(|l| l.text.as_str()).collect()
}
