use std::ops::Range;

use log::trace;

use super::spec::{Delimiter, MatchStrategy, Matcher, RegionSpec};
use crate::editing::{Document, SelectionRange};

/// Which edge of a selection to probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSide {
    Start,
    End,
}

/// Length of the delimiter bordering `selection` on `side`.
///
/// `None` means no delimiter was recognised. `Some(0)` is a real match that
/// consumed nothing, e.g. an end-of-line anchor.
///
/// ```rust
/// # use markdown_regions_engine::editing::{Document, SelectionRange};
/// # use markdown_regions_engine::regions::{find_inline_match, formats, MatchSide};
/// let doc = Document::from_text("some **bold** text").unwrap();
/// let bold = formats::bold();
/// let word = SelectionRange::new(7, 11);
/// assert_eq!(find_inline_match(&doc, &bold, word, MatchSide::Start), Some(2));
/// assert_eq!(find_inline_match(&doc, &bold, SelectionRange::cursor(2), MatchSide::End), None);
/// ```
pub fn find_inline_match(
    doc: &Document,
    spec: &RegionSpec,
    selection: SelectionRange,
    side: MatchSide,
) -> Option<usize> {
    locate_inline_delimiter(doc, spec, selection.as_range(), side).map(|range| range.len())
}

/// Byte range of the delimiter bordering `selection` on `side`.
///
/// Strategies are tried in the region spec's order; the first hit wins.
pub(crate) fn locate_inline_delimiter(
    doc: &Document,
    spec: &RegionSpec,
    selection: Range<usize>,
    side: MatchSide,
) -> Option<Range<usize>> {
    spec.strategies().iter().find_map(|strategy| {
        let found = match strategy {
            MatchStrategy::SyntaxNode(kind) => doc.node_delimiter(kind, selection.clone(), side),
            MatchStrategy::Text => spec.matcher().match_at(doc, selection.clone(), side),
        };
        if found.is_none() {
            trace!("{strategy:?} found no {side:?} delimiter around {selection:?}");
        }
        found
    })
}

impl Matcher {
    /// Match this side's delimiter against the text around `selection`.
    ///
    /// Matching never crosses the line holding the probed boundary.
    pub fn match_at(
        &self,
        doc: &Document,
        selection: Range<usize>,
        side: MatchSide,
    ) -> Option<Range<usize>> {
        let delimiter = self.side(side);
        let boundary = match side {
            MatchSide::Start => selection.start,
            MatchSide::End => selection.end,
        };
        let line = doc.line_at(boundary);

        if delimiter.is_line_anchored() {
            let text = doc.line_text(&line);
            let found = delimiter.find(&text)?;
            let range = line.from + found.start..line.from + found.end;
            let contained = selection.start <= range.start && range.end <= selection.end;
            return (selection.is_empty() || contained).then_some(range);
        }

        match side {
            MatchSide::Start => {
                let before = doc.slice(line.from..selection.start);
                if let Some(start) = delimiter.match_suffix(&before) {
                    return Some(line.from + start..selection.start);
                }
                if selection.is_empty() {
                    return None;
                }
                let inside = doc.slice(selection.start..selection.end.min(line.to));
                let end = delimiter.match_prefix(&inside)?;
                Some(selection.start..selection.start + end)
            }
            MatchSide::End => {
                let after = doc.slice(selection.end..line.to);
                if let Some(end) = delimiter.match_prefix(&after) {
                    return Some(selection.end..selection.end + end);
                }
                if selection.is_empty() {
                    return None;
                }
                let inside_from = selection.start.max(line.from);
                let inside = doc.slice(inside_from..selection.end);
                let start = delimiter.match_suffix(&inside)?;
                Some(inside_from + start..selection.end)
            }
        }
    }
}

/// Match a block fence against one line's text after its quote prefix.
///
/// Line-anchored patterns may match anywhere they allow; otherwise the start
/// fence must open the line and the end fence must close it. Trailing
/// whitespace is ignored for literal fences.
pub(crate) fn match_fence_line(delimiter: &Delimiter, rest: &str, side: MatchSide) -> Option<Range<usize>> {
    if delimiter.is_line_anchored() {
        return delimiter.find(rest);
    }
    let trimmed = rest.trim_end();
    match side {
        MatchSide::Start => delimiter.match_prefix(trimmed).map(|end| 0..end),
        MatchSide::End => delimiter.match_suffix(trimmed).map(|start| start..trimmed.len()),
    }
}
