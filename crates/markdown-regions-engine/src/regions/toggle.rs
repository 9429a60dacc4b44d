use std::collections::BTreeSet;
use std::ops::Range;

use log::debug;

use super::matcher::{MatchSide, locate_inline_delimiter, match_fence_line};
use super::spec::RegionSpec;
use crate::editing::{
    Assoc, Document, Edit, EditScript, EditorState, Line, Selection, SelectionRange, Transaction,
};
use crate::error::EditError;
use crate::quote::BlockQuote;

/// An offset in the original snapshot, resolved once the whole script is known.
#[derive(Debug, Clone, Copy)]
struct MappedPos {
    pos: usize,
    assoc: Assoc,
    /// Added after mapping, e.g. to step over an inserted start delimiter.
    extra: usize,
}

impl MappedPos {
    fn new(pos: usize, assoc: Assoc) -> Self {
        Self {
            pos,
            assoc,
            extra: 0,
        }
    }

    fn resolve(&self, script: &EditScript) -> usize {
        script.map_offset(self.pos, self.assoc) + self.extra
    }
}

/// Edits and resulting selection bounds for one selection range.
#[derive(Debug)]
struct RangePlan {
    edits: Vec<Edit>,
    original: SelectionRange,
    from: MappedPos,
    to: MappedPos,
}

impl RangePlan {
    /// Keep the original range, mapped through whatever else changes.
    fn mapped(original: SelectionRange, edits: Vec<Edit>) -> Self {
        let (from, to) = if original.is_empty() {
            let at = MappedPos::new(original.head, Assoc::Before);
            (at, at)
        } else {
            (
                MappedPos::new(original.from(), Assoc::After),
                MappedPos::new(original.to(), Assoc::Before),
            )
        };
        Self {
            edits,
            original,
            from,
            to,
        }
    }

    fn resolve(&self, script: &EditScript) -> SelectionRange {
        let from = self.from.resolve(script);
        let to = self.to.resolve(script).max(from);
        self.original.with_bounds(from, to)
    }
}

/// Toggle a region around every selection range.
///
/// Single-line selections and cursors use the inline spec; selections
/// spanning lines use the block spec's fence lines. A range that is already
/// wrapped has its delimiters removed, otherwise delimiters are inserted.
/// All ranges are evaluated against the same snapshot and combined into one
/// transaction. Ranges inside the same fenced block toggle that block once.
///
/// ```rust
/// # use markdown_regions_engine::editing::{EditorState, SelectionRange};
/// # use markdown_regions_engine::regions::{formats, toggle_region_format_globally};
/// let state = EditorState::from_text("let x = 1;", SelectionRange::new(4, 5)).unwrap();
/// let tr = toggle_region_format_globally(&state, &formats::inline_code(), &formats::code_block())
///     .unwrap();
/// let next = state.apply(&tr).unwrap();
/// assert_eq!(next.doc().text(), "let `x` = 1;");
/// assert_eq!(next.selection().main(), SelectionRange::new(5, 6));
/// ```
pub fn toggle_region_format_globally(
    state: &EditorState,
    inline: &RegionSpec,
    block: &RegionSpec,
) -> Result<Transaction, EditError> {
    let doc = state.doc();
    let mut toggled_nodes: BTreeSet<(usize, usize)> = BTreeSet::new();
    let plans = state
        .selection()
        .ranges()
        .iter()
        .map(|range| {
            let node = enclosing_block_node(doc, block, range.as_range());
            if let Some(span) = node.clone().filter(|span| spans_lines(doc, span)) {
                if !toggled_nodes.insert((span.start, span.end)) {
                    debug!("{range:?} shares already toggled node {span:?}");
                    return RangePlan::mapped(*range, Vec::new());
                }
            }
            plan_region_toggle(doc, *range, node, inline, block)
        })
        .collect();
    finish(state, plans)
}

/// Toggle the inline form of `spec` around every selection range, even
/// ranges spanning several lines.
pub fn toggle_inline_format_globally(
    state: &EditorState,
    spec: &RegionSpec,
) -> Result<Transaction, EditError> {
    let doc = state.doc();
    let plans = state
        .selection()
        .ranges()
        .iter()
        .map(|range| plan_inline_toggle(doc, *range, spec))
        .collect();
    finish(state, plans)
}

fn finish(state: &EditorState, plans: Vec<RangePlan>) -> Result<Transaction, EditError> {
    let changes = EditScript::new(plans.iter().flat_map(|p| p.edits.clone()).collect())?;
    let ranges = plans.iter().map(|p| p.resolve(&changes)).collect();
    let selection = Selection::new(ranges, state.selection().main_index());
    Ok(Transaction::new(changes, Some(selection)))
}

fn plan_region_toggle(
    doc: &Document,
    original: SelectionRange,
    node: Option<Range<usize>>,
    inline: &RegionSpec,
    block: &RegionSpec,
) -> RangePlan {
    let range = original.as_range();
    let range = match node {
        Some(span) => span.start.min(range.start)..span.end.max(range.end),
        None => range,
    };
    let first = doc.line_at(range.start);
    let mut last = doc.line_at(range.end);
    // A selection ending at column 0 does not take in that line
    if !range.is_empty() && range.end == last.from && last.number > first.number + 1 {
        last = doc.line(last.number - 1);
    }

    if first.number == last.number {
        plan_inline_toggle(doc, original, inline)
    } else {
        plan_block_toggle(doc, original, first, last, block)
    }
}

/// Span of the syntax node named by the block spec enclosing `range`,
/// without its trailing newline.
fn enclosing_block_node(
    doc: &Document,
    block: &RegionSpec,
    range: Range<usize>,
) -> Option<Range<usize>> {
    let node = block
        .node_name()
        .and_then(|kind| doc.enclosing_node(kind, range.clone()))?;

    let mut span = node.byte_range();
    if doc.slice(span.clone()).ends_with('\n') {
        span.end -= 1;
    }
    debug!("{range:?} is inside {} node {span:?}", node.kind());
    Some(span)
}

fn spans_lines(doc: &Document, span: &Range<usize>) -> bool {
    doc.line_at(span.start).number != doc.line_at(span.end).number
}

fn plan_inline_toggle(doc: &Document, original: SelectionRange, spec: &RegionSpec) -> RangePlan {
    let range = original.as_range();
    let start = locate_inline_delimiter(doc, spec, range.clone(), MatchSide::Start);
    let end = locate_inline_delimiter(doc, spec, range.clone(), MatchSide::End);

    if let (Some(start), Some(end)) = (start, end) {
        if start.end <= end.start && !(start.is_empty() && end.is_empty()) {
            debug!("inline remove {start:?} and {end:?} around {range:?}");
            return RangePlan::mapped(original, vec![Edit::delete(start), Edit::delete(end)]);
        }
    }

    let template = spec.template();
    if original.is_empty() {
        debug!("inline insert empty pair at {}", original.head);
        let mut at = MappedPos::new(original.head, Assoc::Before);
        at.extra = template.start().len();
        return RangePlan {
            edits: vec![Edit::insert(
                original.head,
                format!("{}{}", template.start(), template.end()),
            )],
            original,
            from: at,
            to: at,
        };
    }

    debug!("inline insert around {range:?}");
    RangePlan::mapped(
        original,
        vec![
            Edit::insert(range.start, template.start()),
            Edit::insert(range.end, template.end()),
        ],
    )
}

/// A fence line found around a block selection.
#[derive(Debug)]
struct Fence {
    line: Line,
    /// Matched fence text, as absolute offsets.
    span: Range<usize>,
    /// Nothing but the quote prefix remains once the fence is removed.
    blank: bool,
}

fn find_fence(doc: &Document, line: Line, spec: &RegionSpec, side: MatchSide) -> Option<Fence> {
    let text = doc.line_text(&line);
    let (_, quote_len) = BlockQuote::strip_prefixes(&text);
    let rest = &text[quote_len..];
    let found = match_fence_line(spec.matcher().side(side), rest, side)?;

    let blank = rest[..found.start].trim().is_empty() && rest[found.end..].trim().is_empty();
    let offset = line.from + quote_len;
    Some(Fence {
        line,
        span: offset + found.start..offset + found.end,
        blank,
    })
}

/// Fences on the bounding lines themselves, or on the lines just outside.
fn find_block_fences(
    doc: &Document,
    first: Line,
    last: Line,
    spec: &RegionSpec,
) -> Option<(Fence, Fence)> {
    let inner = find_fence(doc, first, spec, MatchSide::Start)
        .zip(find_fence(doc, last, spec, MatchSide::End));
    if inner.is_some() {
        return inner;
    }

    if first.number == 0 || last.number + 1 >= doc.line_count() {
        return None;
    }
    let before = doc.line(first.number - 1);
    let after = doc.line(last.number + 1);
    find_fence(doc, before, spec, MatchSide::Start).zip(find_fence(doc, after, spec, MatchSide::End))
}

fn plan_block_toggle(
    doc: &Document,
    original: SelectionRange,
    first: Line,
    last: Line,
    spec: &RegionSpec,
) -> RangePlan {
    if let Some((open, close)) = find_block_fences(doc, first, last, spec) {
        debug!(
            "block remove fences on lines {} and {}",
            open.line.number, close.line.number
        );
        return RangePlan::mapped(original, fence_removal(doc, &open, &close));
    }

    let block_from = first.from;
    let block_to = last.to;
    let first_text = doc.line_text(&first);
    let quote = BlockQuote::prefix_of(&first_text);
    let template = spec.template();
    debug!("block insert around lines {}..={}", first.number, last.number);

    RangePlan {
        edits: vec![
            Edit::insert(block_from, format!("{quote}{}\n", template.start())),
            Edit::insert(block_to, format!("\n{quote}{}", template.end())),
        ],
        original,
        from: MappedPos::new(block_from, Assoc::Before),
        to: MappedPos::new(block_to, Assoc::After),
    }
}

/// Delete both fences, taking whole lines with them when nothing else is
/// left on those lines.
fn fence_removal(doc: &Document, open: &Fence, close: &Fence) -> Vec<Edit> {
    if open.blank && close.blank && close.line.number == open.line.number + 1 {
        return vec![Edit::delete(open.line.from..close.line.to)];
    }

    let open_edit = if open.blank {
        let next = doc.line(open.line.number + 1);
        Edit::delete(open.line.from..next.from)
    } else {
        Edit::delete(open.span.clone())
    };
    let close_edit = if close.blank {
        let prev = doc.line(close.line.number - 1);
        Edit::delete(prev.to..close.line.to)
    } else {
        Edit::delete(close.span.clone())
    };
    vec![open_edit, close_edit]
}
