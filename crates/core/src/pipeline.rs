//! File processing pipeline: resolve dialect → normalize → parse → filter → annotate.

use crate::codelines;
use crate::dialect::{CommentDialect, DialectRegistry};
use crate::error::Result;
use crate::parser;
use crate::types::*;
use serde::Serialize;
use tracing::debug;

/// Intermediate state of one processing run, before comment lines are filtered out.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub dialect: CommentDialect,
    /// Normalized codelines, comment lines included.
    pub codelines: Vec<Codeline>,
    pub parsed: ParseResult,
}

impl Analysis {
    /// Drop comment lines from the code and pair each comment with its target line.
    pub fn finish(&self) -> ProcessedFile {
        ProcessedFile {
            codelines: codelines::filter(&self.codelines, &self.parsed.removed_line_numbers),
            comments: annotate(&self.parsed.blocks),
        }
    }
}

/// Pair each block's cleaned text with its target codeline, in block order.
/// Blocks without a target or with empty text are skipped.
pub fn annotate(blocks: &[CommentBlock]) -> Vec<AnnotatedComment> {
    blocks
        .iter()
        .filter(|block| !block.cleaned_text.is_empty())
        .filter_map(|block| {
            block.target_codeline.as_ref().map(|target| AnnotatedComment {
                comment: block.cleaned_text.clone(),
                codeline: target.text.clone(),
            })
        })
        .collect()
}

/// Run everything up to (not including) filtering, using `registry` for the dialect.
pub fn analyze_with(
    registry: &DialectRegistry,
    raw_text: &str,
    extension: Option<&str>,
) -> Result<Analysis> {
    let dialect = registry.resolve(extension)?;
    let codelines = codelines::normalize(raw_text);
    let parsed = parser::parse(&codelines, &dialect);

    debug!(
        ext = extension.unwrap_or(""),
        ?dialect,
        lines = codelines.len(),
        blocks = parsed.blocks.len(),
        inline = parsed.inline_comments.len(),
        removed = parsed.removed_line_numbers.len(),
        "Parsed comments"
    );

    Ok(Analysis { dialect, codelines, parsed })
}

/// Process raw file text with the dialects in `registry`.
pub fn process_with(
    registry: &DialectRegistry,
    raw_text: &str,
    extension: Option<&str>,
) -> Result<ProcessedFile> {
    Ok(analyze_with(registry, raw_text, extension)?.finish())
}

/// Process raw file text with the built-in dialects.
pub fn process(raw_text: &str, extension: Option<&str>) -> Result<ProcessedFile> {
    process_with(&DialectRegistry::builtin(), raw_text, extension)
}
