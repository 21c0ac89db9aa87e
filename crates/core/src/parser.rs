//! Comment extraction over normalized codelines.
//!
//! The parser makes one forward pass with a cursor. Each step classifies the line under
//! the cursor and returns the next cursor position together with what it found:
//!
//! 1. A line starting with a single-line opener begins a run of such lines. One line is a
//!    [`CommentKind::SingleLine`] block, more is [`CommentKind::ConsecutiveSingleLine`].
//! 2. A line starting with a multiline opener is consumed up to the line holding that
//!    opener's closer. The opening line itself closes the comment if the closer appears
//!    anywhere in it; end of input closes an unterminated comment. If the next line
//!    opens another multiline comment, the comments are merged into a single
//!    [`CommentKind::MultilineMergedBlock`].
//! 3. Any other line containing comment markers yields an [`InlineComment`]; the line
//!    stays in the code.
//!
//! Every block's target codeline is simply the line after its last consumed line, even
//! when that line is itself the start of a different kind of comment.
//!
//! Markers are matched as literal substrings. String literals and escapes are not
//! understood, so `"http://x"` reads as code followed by an inline `//` comment.

use crate::dialect::CommentDialect;
use crate::types::*;

/// What a single scan step produced.
enum Step {
    Block(CommentBlock),
    Inline(InlineComment),
    Code,
}

/// Scans codelines for comments in one dialect.
#[derive(Debug, Clone, Copy)]
pub struct CommentParser<'a> {
    dialect: &'a CommentDialect,
}

impl<'a> CommentParser<'a> {
    pub fn new(dialect: &'a CommentDialect) -> Self {
        Self { dialect }
    }

    /// Scan `lines` from first to last and collect every comment construct.
    pub fn parse(&self, lines: &[Codeline]) -> ParseResult {
        let mut result = ParseResult::default();
        let mut cursor = 0;

        while cursor < lines.len() {
            let (next, step) = self.step(lines, cursor);
            debug_assert!(next > cursor);
            match step {
                Step::Block(block) => {
                    result.removed_line_numbers.extend(block.line_numbers.iter().copied());
                    result.blocks.push(block);
                }
                Step::Inline(inline) => result.inline_comments.push(inline),
                Step::Code => {}
            }
            cursor = next;
        }

        result
    }

    fn step(&self, lines: &[Codeline], cursor: usize) -> (usize, Step) {
        let trimmed = lines[cursor].text.trim();

        if self.starts_with_single_line_opener(trimmed) {
            let end = self.single_line_run_end(lines, cursor);
            let kind = if end - cursor == 1 {
                CommentKind::SingleLine
            } else {
                CommentKind::ConsecutiveSingleLine
            };
            return (end, Step::Block(self.block(kind, lines, cursor, end)));
        }

        if let Some(closer) = self.multiline_closer(trimmed) {
            let (end, kind) = self.multiline_extent(lines, cursor, closer);
            return (end, Step::Block(self.block(kind, lines, cursor, end)));
        }

        match self.inline_comment(&lines[cursor]) {
            Some(inline) => (cursor + 1, Step::Inline(inline)),
            None => (cursor + 1, Step::Code),
        }
    }

    // -----------------------------------------------------------------------
    // Block extents
    // -----------------------------------------------------------------------

    /// Index one past the run of single-line comments starting at `start`.
    fn single_line_run_end(&self, lines: &[Codeline], start: usize) -> usize {
        start
            + lines[start..]
                .iter()
                .take_while(|l| self.starts_with_single_line_opener(l.text.trim()))
                .count()
    }

    /// Extent of the multiline comment at `start` plus any directly following ones.
    fn multiline_extent(
        &self,
        lines: &[Codeline],
        start: usize,
        closer: &str,
    ) -> (usize, CommentKind) {
        let (mut end, same_line) = self.comment_end(lines, start, closer);
        let mut kind = if same_line {
            CommentKind::MultilineClosedSameLine
        } else {
            CommentKind::MultilineSpanning
        };

        while let Some(closer) = lines.get(end).and_then(|l| self.multiline_closer(l.text.trim())) {
            end = self.comment_end(lines, end, closer).0;
            kind = CommentKind::MultilineMergedBlock;
        }

        (end, kind)
    }

    /// Index one past the line that closes the comment opened at `start`, and whether
    /// it closed on the opening line. Without a closer the comment runs to end of input.
    ///
    /// The opening line counts as closed whenever it contains the closer anywhere, so a
    /// line holding only `"""` (or `/*/`) is a complete comment on its own.
    fn comment_end(&self, lines: &[Codeline], start: usize, closer: &str) -> (usize, bool) {
        if lines[start].text.trim().contains(closer) {
            return (start + 1, true);
        }

        let end = lines[start + 1..]
            .iter()
            .position(|l| l.text.contains(closer))
            .map_or(lines.len(), |offset| start + offset + 2);
        (end, false)
    }

    fn block(&self, kind: CommentKind, lines: &[Codeline], start: usize, end: usize) -> CommentBlock {
        let consumed = &lines[start..end];
        CommentBlock {
            kind,
            source_lines: consumed.iter().map(|l| l.text.clone()).collect(),
            line_numbers: consumed.iter().map(|l| l.line_number).collect(),
            cleaned_text: self.clean_text(consumed.iter().map(|l| l.text.as_str())),
            target_codeline: lines.get(end).cloned(),
        }
    }

    // -----------------------------------------------------------------------
    // Marker matching
    // -----------------------------------------------------------------------

    fn starts_with_single_line_opener(&self, trimmed: &str) -> bool {
        self.dialect.single_line_openers().iter().any(|o| trimmed.starts_with(o.as_str()))
    }

    /// Closer of the first configured multiline pair whose opener starts `trimmed`.
    fn multiline_closer(&self, trimmed: &str) -> Option<&'a str> {
        let dialect: &'a CommentDialect = self.dialect;
        dialect
            .multiline_pairs()
            .iter()
            .find(|(opener, _)| trimmed.starts_with(opener.as_str()))
            .map(|(_, closer)| closer.as_str())
    }

    // -----------------------------------------------------------------------
    // Text cleaning
    // -----------------------------------------------------------------------

    /// Strip comment markers from each line and join the non-empty remainders with
    /// single spaces.
    pub fn clean_text<'l>(&self, lines: impl IntoIterator<Item = &'l str>) -> String {
        lines
            .into_iter()
            .map(|line| self.clean_line(line))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn clean_line<'l>(&self, line: &'l str) -> &'l str {
        let mut text = line.trim();

        if let Some(rest) =
            self.dialect.single_line_openers().iter().find_map(|o| text.strip_prefix(o.as_str()))
        {
            text = rest.trim();
        }

        for (opener, closer) in self.dialect.multiline_pairs() {
            if let Some(rest) = text.strip_prefix(opener.as_str()) {
                text = rest.trim();
            }
            if let Some(rest) = text.strip_suffix(closer.as_str()) {
                text = rest.trim();
            }
        }

        text
    }

    // -----------------------------------------------------------------------
    // Inline comments
    // -----------------------------------------------------------------------

    fn inline_comment(&self, line: &Codeline) -> Option<InlineComment> {
        let text = line.text.as_str();
        let mut fragments = Vec::new();

        for opener in self.dialect.single_line_openers() {
            if let Some((_, rest)) = text.split_once(opener.as_str()) {
                fragments.push(InlineFragment {
                    opener: opener.clone(),
                    closer: None,
                    content: rest.trim().to_string(),
                });
            }
        }

        for (opener, closer) in self.dialect.multiline_pairs() {
            fragments.extend(closed_spans(text, opener, closer).into_iter().map(|content| {
                InlineFragment {
                    opener: opener.clone(),
                    closer: Some(closer.clone()),
                    content: content.to_string(),
                }
            }));
        }

        if fragments.is_empty() {
            return None;
        }
        Some(InlineComment { line_number: line.line_number, source_line: line.text.clone(), fragments })
    }
}

/// Contents of every non-overlapping `opener ... closer` span in `text`, trimmed.
fn closed_spans<'t>(text: &'t str, opener: &str, closer: &str) -> Vec<&'t str> {
    let mut spans = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find(opener) {
        let body = &rest[start + opener.len()..];
        let Some(end) = body.find(closer) else {
            break;
        };
        spans.push(body[..end].trim());
        rest = &body[end + closer.len()..];
    }

    spans
}

/// Parse `lines` with `dialect`. See the module docs for the classification rules.
pub fn parse(lines: &[Codeline], dialect: &CommentDialect) -> ParseResult {
    CommentParser::new(dialect).parse(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{resolve, Dialect};

    fn lines(texts: &[&str]) -> Vec<Codeline> {
        texts.iter().enumerate().map(|(i, t)| Codeline::new(i + 1, *t)).collect()
    }

    fn slash() -> CommentDialect {
        Dialect::Slash.comment_dialect()
    }

    fn target(block: &CommentBlock) -> Option<&str> {
        block.target_codeline.as_ref().map(|c| c.text.as_str())
    }

    #[test]
    fn test_single_line_then_spanning_block() {
        let input = lines(&["// hello", "int x = 1;", "/* block", "comment */", "int y = 2;"]);
        let result = parse(&input, &slash());

        assert_eq!(result.blocks.len(), 2, "got: {:#?}", result.blocks);
        let first = &result.blocks[0];
        assert_eq!(first.kind, CommentKind::SingleLine);
        assert_eq!(first.cleaned_text, "hello");
        assert_eq!(target(first), Some("int x = 1;"));

        let second = &result.blocks[1];
        assert_eq!(second.kind, CommentKind::MultilineSpanning);
        assert_eq!(second.cleaned_text, "block comment");
        assert_eq!(second.line_numbers, [3, 4]);
        assert_eq!(target(second), Some("int y = 2;"));

        assert_eq!(result.removed_line_numbers.iter().copied().collect::<Vec<_>>(), [1, 3, 4]);
        assert!(result.inline_comments.is_empty());
    }

    #[test]
    fn test_consecutive_single_lines() {
        let result = parse(&lines(&["// a", "// b", "code();"]), &slash());
        assert_eq!(result.blocks.len(), 1);
        let block = &result.blocks[0];
        assert_eq!(block.kind, CommentKind::ConsecutiveSingleLine);
        assert_eq!(block.cleaned_text, "a b");
        assert_eq!(block.source_lines, ["// a", "// b"]);
        assert_eq!(target(block), Some("code();"));
    }

    #[test]
    fn test_inline_single_line_comment() {
        let result = parse(&lines(&["x = 1; // set x"]), &slash());
        assert!(result.blocks.is_empty());
        assert!(result.removed_line_numbers.is_empty());
        assert_eq!(result.inline_comments.len(), 1);
        let inline = &result.inline_comments[0];
        assert_eq!(inline.line_number, 1);
        assert_eq!(inline.fragments.len(), 1);
        assert_eq!(inline.fragments[0].opener, "//");
        assert_eq!(inline.fragments[0].closer, None);
        assert_eq!(inline.fragments[0].content, "set x");
    }

    #[test]
    fn test_adjacent_same_line_blocks_merge() {
        let result = parse(&lines(&["/* one */", "/* two */", "code();"]), &slash());
        assert_eq!(result.blocks.len(), 1, "got: {:#?}", result.blocks);
        let block = &result.blocks[0];
        assert_eq!(block.kind, CommentKind::MultilineMergedBlock);
        assert_eq!(block.cleaned_text, "one two");
        assert_eq!(target(block), Some("code();"));
        assert_eq!(result.removed_line_numbers.iter().copied().collect::<Vec<_>>(), [1, 2]);
    }

    #[test]
    fn test_unterminated_comment_closes_at_end_of_input() {
        let result = parse(&lines(&["/* open", "never closes"]), &slash());
        assert_eq!(result.blocks.len(), 1);
        let block = &result.blocks[0];
        assert_eq!(block.kind, CommentKind::MultilineSpanning);
        assert_eq!(block.cleaned_text, "open never closes");
        assert_eq!(block.target_codeline, None);
        assert_eq!(block.line_numbers, [1, 2]);
    }

    #[test]
    fn test_closed_same_line() {
        let result = parse(&lines(&["/* note */", "run();"]), &slash());
        assert_eq!(result.blocks[0].kind, CommentKind::MultilineClosedSameLine);
        assert_eq!(result.blocks[0].cleaned_text, "note");
    }

    #[test]
    fn test_single_line_run_targets_following_comment_line() {
        let result = parse(&lines(&["// lead", "/* doc */", "fn();"]), &slash());
        assert_eq!(result.blocks.len(), 2);
        assert_eq!(target(&result.blocks[0]), Some("/* doc */"));
        assert_eq!(target(&result.blocks[1]), Some("fn();"));
    }

    #[test]
    fn test_multiline_followed_by_single_line_is_not_merged() {
        let result = parse(&lines(&["/* a */", "// b", "c();"]), &slash());
        let kinds: Vec<_> = result.blocks.iter().map(|b| b.kind).collect();
        assert_eq!(kinds, [CommentKind::MultilineClosedSameLine, CommentKind::SingleLine]);
        assert_eq!(target(&result.blocks[0]), Some("// b"));
    }

    #[test]
    fn test_merge_spanning_and_same_line_blocks() {
        let input = lines(&["/* first", " * more */", "/* second */", "/* third", "end */", "x();"]);
        let result = parse(&input, &slash());
        assert_eq!(result.blocks.len(), 1);
        let block = &result.blocks[0];
        assert_eq!(block.kind, CommentKind::MultilineMergedBlock);
        assert_eq!(block.line_numbers, [1, 2, 3, 4, 5]);
        assert_eq!(block.cleaned_text, "first * more second third end");
        assert_eq!(target(block), Some("x();"));
    }

    #[test]
    fn test_merge_uses_each_openers_own_closer() {
        let input = lines(&["<!-- markup -->", "/* script", "still */", "<div>"]);
        let result = parse(&input, &resolve(Some("vue")));
        assert_eq!(result.blocks.len(), 1);
        assert_eq!(result.blocks[0].kind, CommentKind::MultilineMergedBlock);
        assert_eq!(result.blocks[0].cleaned_text, "markup script still");
        assert_eq!(target(&result.blocks[0]), Some("<div>"));
    }

    #[test]
    fn test_merge_with_unterminated_tail() {
        let result = parse(&lines(&["/* a */", "/* b", "c"]), &slash());
        assert_eq!(result.blocks.len(), 1);
        assert_eq!(result.blocks[0].kind, CommentKind::MultilineMergedBlock);
        assert_eq!(result.blocks[0].line_numbers, [1, 2, 3]);
        assert_eq!(result.blocks[0].target_codeline, None);
    }

    #[test]
    fn test_closer_of_other_pair_does_not_close() {
        let input = lines(&["<!-- start", "*/ not yet", "done -->", "<p>"]);
        let result = parse(&input, &resolve(Some("vue")));
        assert_eq!(result.blocks[0].line_numbers, [1, 2, 3]);
        assert_eq!(target(&result.blocks[0]), Some("<p>"));
    }

    #[test]
    fn test_lone_triple_quote_closes_on_its_own_line() {
        let input = lines(&["\"\"\"", "Module docs.", "\"\"\"", "# helper", "def f():", "    return 1  # one"]);
        let result = parse(&input, &resolve(Some("py")));
        let shape: Vec<_> =
            result.blocks.iter().map(|b| (b.kind, b.line_numbers.clone())).collect();
        assert_eq!(
            shape,
            [
                (CommentKind::MultilineClosedSameLine, vec![1]),
                (CommentKind::MultilineClosedSameLine, vec![3]),
                (CommentKind::SingleLine, vec![4]),
            ],
            "got: {:#?}",
            result.blocks
        );
        assert_eq!(result.blocks[0].cleaned_text, "");
        assert_eq!(target(&result.blocks[0]), Some("Module docs."));
        assert_eq!(target(&result.blocks[1]), Some("# helper"));
        assert_eq!(target(&result.blocks[2]), Some("def f():"));
        assert!(!result.removed_line_numbers.contains(&2));
        assert_eq!(result.inline_comments.len(), 1);
        assert_eq!(result.inline_comments[0].fragments[0].content, "one");
    }

    #[test]
    fn test_opener_overlapping_closer_closes_same_line() {
        let result = parse(&lines(&["/*/", "code();"]), &slash());
        assert_eq!(result.blocks.len(), 1);
        assert_eq!(result.blocks[0].kind, CommentKind::MultilineClosedSameLine);
        assert_eq!(result.blocks[0].line_numbers, [1]);
        assert_eq!(target(&result.blocks[0]), Some("code();"));
        assert_eq!(result.removed_line_numbers.iter().copied().collect::<Vec<_>>(), [1]);
    }

    #[test]
    fn test_adjacent_lone_triple_quotes_merge() {
        let result = parse(&lines(&["\"\"\"", "'''", "x = 1"]), &resolve(Some("py")));
        assert_eq!(result.blocks.len(), 1);
        assert_eq!(result.blocks[0].kind, CommentKind::MultilineMergedBlock);
        assert_eq!(result.blocks[0].line_numbers, [1, 2]);
        assert_eq!(target(&result.blocks[0]), Some("x = 1"));
    }

    #[test]
    fn test_one_line_docstring_closes_same_line() {
        let result = parse(&lines(&["'''Short.'''", "x = 1"]), &resolve(Some("py")));
        assert_eq!(result.blocks[0].kind, CommentKind::MultilineClosedSameLine);
        assert_eq!(result.blocks[0].cleaned_text, "Short.");
    }

    #[test]
    fn test_markup_has_no_single_line_comments() {
        let input = lines(&["// not a comment", "<!-- real -->", "<p>"]);
        let result = parse(&input, &resolve(Some("html")));
        assert_eq!(result.blocks.len(), 1);
        assert_eq!(result.blocks[0].line_numbers, [2]);
        assert!(result.inline_comments.is_empty());
    }

    #[test]
    fn test_inline_multiline_spans() {
        let result = parse(&lines(&["call(/* a */ x, /* b */ y);"]), &slash());
        assert!(result.blocks.is_empty());
        let contents: Vec<_> =
            result.inline_comments[0].fragments.iter().map(|f| f.content.as_str()).collect();
        assert_eq!(contents, ["a", "b"]);
        assert_eq!(result.inline_comments[0].fragments[0].closer.as_deref(), Some("*/"));
    }

    #[test]
    fn test_inline_single_line_fragments_come_first() {
        let result = parse(&lines(&["f(/* arg */); // done"]), &slash());
        let fragments = &result.inline_comments[0].fragments;
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].opener, "//");
        assert_eq!(fragments[0].content, "done");
        assert_eq!(fragments[1].opener, "/*");
        assert_eq!(fragments[1].content, "arg");
    }

    #[test]
    fn test_unclosed_inline_opener_is_plain_code() {
        let result = parse(&lines(&["x = 1; /* dangling"]), &slash());
        assert!(result.inline_comments.is_empty());
        assert!(result.blocks.is_empty());
    }

    #[test]
    fn test_indented_comment_lines_are_recognized() {
        let result = parse(&lines(&["    // indented", "\tcode();"]), &slash());
        assert_eq!(result.blocks.len(), 1);
        assert_eq!(result.blocks[0].source_lines, ["    // indented"]);
    }

    #[test]
    fn test_empty_comment_keeps_block_with_empty_text() {
        let result = parse(&lines(&["//", "code();"]), &slash());
        assert_eq!(result.blocks.len(), 1);
        assert_eq!(result.blocks[0].cleaned_text, "");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse(&[], &slash()), ParseResult::default());
    }

    #[test]
    fn test_line_numbers_come_from_codelines() {
        let input = vec![Codeline::new(4, "code();"), Codeline::new(9, "// tail")];
        let result = parse(&input, &slash());
        assert_eq!(result.blocks[0].line_numbers, [9]);
    }

    #[test]
    fn test_clean_text_strips_markers() {
        let dialect = slash();
        let parser = CommentParser::new(&dialect);
        assert_eq!(parser.clean_text(["  //   spaced  "]), "spaced");
        assert_eq!(parser.clean_text(["/**", " * Docs", " */"]), "* * Docs");
        assert_eq!(parser.clean_text(["/* x */", "", "   "]), "x");
    }
}
