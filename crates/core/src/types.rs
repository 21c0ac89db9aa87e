//! Core types shared across Codemate: normalized codelines, comment blocks,
//! inline comment records, parse results, and the final annotated output.

use serde::Serialize;
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Codelines
// ---------------------------------------------------------------------------

/// One non-blank line of source text plus its renumbered position.
///
/// `line_number` is the 1-based position among the non-blank lines of the file,
/// not the line number in the original file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Codeline {
    pub line_number: usize,
    pub text: String,
}

impl Codeline {
    pub fn new(line_number: usize, text: impl Into<String>) -> Self {
        Self { line_number, text: text.into() }
    }
}

// ---------------------------------------------------------------------------
// Comment blocks
// ---------------------------------------------------------------------------

/// How a comment block was recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentKind {
    /// One line starting with a single-line opener.
    SingleLine,
    /// Two or more adjacent lines starting with single-line openers.
    ConsecutiveSingleLine,
    /// A multiline opener whose closer is on the same line.
    MultilineClosedSameLine,
    /// A multiline opener whose closer is on a later line (or never found).
    MultilineSpanning,
    /// Adjacent multiline comments merged into one block.
    MultilineMergedBlock,
}

impl CommentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SingleLine => "single_line",
            Self::ConsecutiveSingleLine => "consecutive_single_line",
            Self::MultilineClosedSameLine => "multiline_closed_same_line",
            Self::MultilineSpanning => "multiline_spanning",
            Self::MultilineMergedBlock => "multiline_merged_block",
        }
    }
}

/// A maximal run of lines recognized as comment syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentBlock {
    pub kind: CommentKind,
    /// Raw text of every consumed line, in order.
    pub source_lines: Vec<String>,
    /// Codeline numbers of the consumed lines; same length as `source_lines`.
    pub line_numbers: Vec<usize>,
    pub cleaned_text: String,
    /// The codeline immediately after the block, if the block doesn't reach end of input.
    pub target_codeline: Option<Codeline>,
}

// ---------------------------------------------------------------------------
// Inline comments
// ---------------------------------------------------------------------------

/// A comment embedded in a line of code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineFragment {
    pub opener: String,
    pub closer: Option<String>,
    pub content: String,
}

/// All inline comment fragments found on one codeline. These lines are never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineComment {
    pub line_number: usize,
    pub source_line: String,
    pub fragments: Vec<InlineFragment>,
}

// ---------------------------------------------------------------------------
// Parse output
// ---------------------------------------------------------------------------

/// Everything the comment parser found in one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    pub blocks: Vec<CommentBlock>,
    pub inline_comments: Vec<InlineComment>,
    /// Union of every block's `line_numbers`.
    pub removed_line_numbers: BTreeSet<usize>,
}

/// A comment paired with the code line it annotates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedComment {
    pub comment: String,
    pub codeline: String,
}

/// Final result handed to callers: code with comment lines removed, plus the
/// comments that were lifted out of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessedFile {
    pub codelines: Vec<Codeline>,
    pub comments: Vec<AnnotatedComment>,
}
