use std::borrow::Cow;
use std::ops::Range;

use tree_sitter::{InputEdit, Node, Parser, Point, Tree};
use tree_sitter_md::LANGUAGE;
use xi_rope::{LinesMetric, Rope};

use crate::editing::EditScript;
use crate::error::EditError;
use crate::regions::MatchSide;

/// A single line of a document, without its line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    /// 0-based line number.
    pub number: usize,
    /// Byte offset of the first character.
    pub from: usize,
    /// Byte offset just past the last character (before `\r\n` / `\n`).
    pub to: usize,
}

impl Line {
    pub fn range(&self) -> Range<usize> {
        self.from..self.to
    }
}

/// Immutable document snapshot.
///
/// Holds the text in an `xi_rope::Rope` and, when the grammar loads, a
/// tree-sitter Markdown parse used for structural lookups. The formatting
/// core never mutates a snapshot; [`Document::apply`] builds the next one.
///
/// ```rust
/// # use markdown_regions_engine::editing::{Document, Edit, EditScript};
/// let doc = Document::from_text("hello").unwrap();
/// let script = EditScript::new(vec![Edit::insert(0, "**"), Edit::insert(5, "**")]).unwrap();
/// let next = doc.apply(&script).unwrap();
/// assert_eq!(next.text(), "**hello**");
/// assert_eq!(next.version(), doc.version() + 1);
/// ```
#[derive(Clone)]
pub struct Document {
    /// Source of truth for the text.
    buffer: Rope,
    /// Parse tree, absent when the grammar could not be loaded.
    tree: Option<Tree>,
    /// Incremented by every applied non-empty edit script.
    version: u64,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("text", &self.text())
            .field("version", &self.version)
            .field("parsed", &self.tree.is_some())
            .finish()
    }
}

impl Document {
    /// Create a document from raw bytes, which must be valid UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Self::from_text(text)
    }

    pub fn from_text(text: &str) -> anyhow::Result<Self> {
        let mut parser = new_parser()?;
        let tree = parser.parse(text, None);
        if tree.is_none() {
            log::warn!("tree-sitter produced no tree for a {} byte document", text.len());
        }

        Ok(Self {
            buffer: Rope::from(text),
            tree,
            version: 0,
        })
    }

    /// Create a document without a parse tree; structural lookups all miss.
    pub fn plain(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            tree: None,
            version: 0,
        }
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    /// Slice the buffer, clamping the range to the document.
    pub fn slice(&self, range: Range<usize>) -> Cow<'_, str> {
        let len = self.buffer.len();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        self.buffer.slice_to_cow(start..end)
    }

    pub fn line_count(&self) -> usize {
        self.buffer.measure::<LinesMetric>() + 1
    }

    /// The line containing `offset` (clamped to the document).
    pub fn line_at(&self, offset: usize) -> Line {
        let offset = offset.min(self.len());
        self.line(self.buffer.line_of_offset(offset))
    }

    /// Line by 0-based number; numbers past the end give the last line.
    pub fn line(&self, number: usize) -> Line {
        let number = number.min(self.line_count() - 1);
        let from = self.buffer.offset_of_line(number);
        let next = self.buffer.offset_of_line(number + 1);

        let raw = self.slice(from..next);
        let content = raw.trim_end_matches('\n').trim_end_matches('\r');

        Line {
            number,
            from,
            to: from + content.len(),
        }
    }

    pub fn line_text(&self, line: &Line) -> Cow<'_, str> {
        self.slice(line.range())
    }

    /// All lines in document order.
    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        (0..self.line_count()).map(move |n| self.line(n))
    }

    /// Offset of `(line, column)`, with the column clamped to the line.
    pub fn offset_of(&self, line: usize, column: usize) -> usize {
        let line = self.line(line);
        (line.from + column).min(line.to)
    }

    /// `(line, column)` for a byte offset.
    pub fn position_of(&self, offset: usize) -> (usize, usize) {
        let line = self.line_at(offset);
        (line.number, offset.min(self.len()) - line.from)
    }

    /// Smallest syntax node of kind `kind` enclosing `range`.
    pub fn enclosing_node(&self, kind: &str, range: Range<usize>) -> Option<Node<'_>> {
        let tree = self.tree.as_ref()?;
        let mut node = tree
            .root_node()
            .descendant_for_byte_range(range.start, range.end)?;
        loop {
            if node.kind() == kind && node.start_byte() <= range.start && range.end <= node.end_byte()
            {
                return Some(node);
            }
            node = node.parent()?;
        }
    }

    /// Delimiter of a `kind` node that borders `selection` on `side`.
    ///
    /// The delimiter is the node's first child (for [`MatchSide::Start`]) or
    /// last child (for [`MatchSide::End`]); it must touch the selection
    /// boundary from outside, or from inside for a non-empty selection.
    pub fn node_delimiter(
        &self,
        kind: &str,
        selection: Range<usize>,
        side: MatchSide,
    ) -> Option<Range<usize>> {
        let node = self.enclosing_node(kind, selection.clone())?;
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.children(&mut cursor).collect();

        let delimiter = match side {
            MatchSide::Start => children.first()?,
            MatchSide::End => children.last()?,
        };
        let range = delimiter.byte_range();
        if range.is_empty() {
            return None;
        }

        let touches = match side {
            MatchSide::Start => {
                range.end == selection.start
                    || (!selection.is_empty()
                        && range.start == selection.start
                        && range.end <= selection.end)
            }
            MatchSide::End => {
                range.start == selection.end
                    || (!selection.is_empty()
                        && range.end == selection.end
                        && range.start >= selection.start)
            }
        };
        touches.then_some(range)
    }

    /// Apply an edit script, producing the next snapshot.
    ///
    /// The old tree is edited with the script before re-parsing so unchanged
    /// regions are reused.
    pub fn apply(&self, script: &EditScript) -> Result<Document, EditError> {
        script.check_bounds(self.len())?;
        if script.is_empty() {
            return Ok(self.clone());
        }

        let old_text = self.text();
        let delta = script.to_delta(self.len());
        let buffer = delta.apply(&self.buffer);
        let new_text = buffer.to_string();

        let tree = match (new_parser(), self.tree.clone()) {
            (Ok(mut parser), Some(mut old_tree)) => {
                for edit in script_to_input_edits(&old_text, script) {
                    old_tree.edit(&edit);
                }
                parser.parse(&new_text, Some(&old_tree))
            }
            (Ok(mut parser), None) => parser.parse(&new_text, None),
            (Err(e), _) => {
                log::warn!("could not reload markdown grammar: {e}");
                None
            }
        };

        Ok(Document {
            buffer,
            tree,
            version: self.version + 1,
        })
    }
}

fn new_parser() -> anyhow::Result<Parser> {
    let mut parser = Parser::new();
    parser.set_language(&LANGUAGE.into())?;
    Ok(parser)
}

/// Convert an edit script to tree-sitter input edits.
///
/// Script offsets refer to the old text, so the edits are emitted from the
/// last to the first: each one then only touches text the following edits
/// (earlier in the document) never see shifted.
fn script_to_input_edits(old_text: &str, script: &EditScript) -> Vec<InputEdit> {
    script
        .edits()
        .iter()
        .rev()
        .map(|edit| {
            let start_position = byte_to_point_in_text(old_text, edit.range.start);
            let old_end_position = byte_to_point_in_text(old_text, edit.range.end);
            let new_end_position = advance_point(start_position, &edit.insert);

            InputEdit {
                start_byte: edit.range.start,
                old_end_byte: edit.range.end,
                new_end_byte: edit.range.start + edit.insert.len(),
                start_position,
                old_end_position,
                new_end_position,
            }
        })
        .collect()
}

/// Convert byte offset to a tree-sitter point in the given text.
fn byte_to_point_in_text(text: &str, byte_offset: usize) -> Point {
    let offset = byte_offset.min(text.len());

    let mut row = 0;
    let mut last_newline = 0;
    for (i, &byte) in text.as_bytes().iter().enumerate().take(offset) {
        if byte == b'\n' {
            row += 1;
            last_newline = i + 1;
        }
    }

    Point {
        row,
        column: offset - last_newline,
    }
}

/// Point reached after inserting `inserted` at `start`.
fn advance_point(start: Point, inserted: &str) -> Point {
    match inserted.rfind('\n') {
        Some(last) => Point {
            row: start.row + inserted.matches('\n').count(),
            column: inserted.len() - last - 1,
        },
        None => Point {
            row: start.row,
            column: start.column + inserted.len(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Edit;
    use pretty_assertions::assert_eq;

    #[test]
    fn from_bytes_rejects_invalid_utf8() {
        assert!(Document::from_bytes(&[0xff, 0xfe]).is_err());
    }

    #[test]
    fn from_text_parses() {
        let doc = Document::from_text("# Title\n\n- item").unwrap();
        assert!(doc.tree().is_some());
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn lines_exclude_line_breaks() {
        let doc = Document::plain("one\r\ntwo\n\nfour");
        let lines: Vec<_> = doc.lines().map(|l| doc.line_text(&l).into_owned()).collect();
        assert_eq!(lines, vec!["one", "two", "", "four"]);
    }

    #[test]
    fn trailing_newline_yields_empty_last_line() {
        let doc = Document::plain("a\n");
        assert_eq!(doc.line_count(), 2);
        assert_eq!(doc.line(1), Line { number: 1, from: 2, to: 2 });
    }

    #[test]
    fn line_at_finds_containing_line() {
        let doc = Document::plain("1. a\n2. b\n");
        assert_eq!(doc.line_at(6), Line { number: 1, from: 5, to: 9 });
        assert_eq!(doc.line_at(4).number, 0);
        assert_eq!(doc.line_at(100).number, 2);
    }

    #[test]
    fn offset_and_position_round_trip() {
        let doc = Document::plain("abc\ndefg");
        assert_eq!(doc.offset_of(1, 2), 6);
        assert_eq!(doc.position_of(6), (1, 2));
        assert_eq!(doc.offset_of(0, 99), 3);
    }

    #[test]
    fn slice_clamps_out_of_range() {
        let doc = Document::plain("abc");
        assert_eq!(doc.slice(1..99), "bc");
        assert_eq!(doc.slice(7..9), "");
    }

    #[test]
    fn apply_bumps_version_and_reparses() {
        let doc = Document::from_text("a\nb").unwrap();
        let script = EditScript::new(vec![Edit::insert(0, "```\n"), Edit::insert(3, "\n```")])
            .unwrap();
        let next = doc.apply(&script).unwrap();
        assert_eq!(next.text(), "```\na\nb\n```");
        assert_eq!(next.version(), 1);
        assert!(next.tree().is_some());
        assert_eq!(doc.text(), "a\nb");
    }

    #[test]
    fn apply_rejects_out_of_bounds_script() {
        let doc = Document::plain("ab");
        let script = EditScript::new(vec![Edit::delete(1..5)]).unwrap();
        assert_eq!(
            doc.apply(&script).unwrap_err(),
            EditError::OutOfBounds { range: 1..5, len: 2 }
        );
    }

    #[test]
    fn plain_document_has_no_nodes() {
        let doc = Document::plain("```\ncode\n```");
        assert!(doc.enclosing_node("fenced_code_block", 5..5).is_none());
    }

    #[test]
    fn enclosing_node_finds_fenced_code_block() {
        let doc = Document::from_text("```\ncode\n```\n").unwrap();
        let node = doc.enclosing_node("fenced_code_block", 5..6).unwrap();
        assert_eq!(node.start_byte(), 0);
        assert!(node.end_byte() >= 12);
    }

    #[test]
    fn advance_point_over_multiline_insert() {
        let p = advance_point(Point { row: 2, column: 5 }, "ab\ncd\nefg");
        assert_eq!(p, Point { row: 4, column: 3 });
        let q = advance_point(Point { row: 2, column: 5 }, "ab");
        assert_eq!(q, Point { row: 2, column: 7 });
    }
}
