use std::collections::BTreeSet;
use std::ops::{Range, RangeInclusive};
use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use super::indent::indent_width;
use crate::editing::{Document, Edit, EditScript, EditorState, IndentConfig, Transaction};
use crate::error::EditError;
use crate::quote::BlockQuote;

fn ordered_item_regex() -> &'static Regex {
    static ORDERED: OnceLock<Regex> = OnceLock::new();
    ORDERED.get_or_init(|| Regex::new(r"^(\s*)(\d+)[.)](?:\s|$)").expect("Invalid ordered item regex"))
}

fn bullet_item_regex() -> &'static Regex {
    static BULLET: OnceLock<Regex> = OnceLock::new();
    BULLET.get_or_init(|| Regex::new(r"^(\s*)[-*+](?:\s|$)").expect("Invalid bullet item regex"))
}

/// One list item line, recognised after any blockquote prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ListItem {
    /// Visual width of the indentation before the marker.
    indent: usize,
    /// Absolute byte range of the ordinal digits; `None` for bullets.
    ordinal: Option<Range<usize>>,
}

fn scan_item(doc: &Document, config: &IndentConfig, line_number: usize) -> Option<ListItem> {
    let line = doc.line(line_number);
    let text = doc.line_text(&line);
    let (_, quote_len) = BlockQuote::strip_prefixes(&text);
    let rest = &text[quote_len..];
    let offset = line.from + quote_len;

    if let Some(caps) = ordered_item_regex().captures(rest) {
        let digits = caps.get(2)?.range();
        return Some(ListItem {
            indent: indent_width(config, caps.get(1)?.as_str()),
            ordinal: Some(offset + digits.start..offset + digits.end),
        });
    }
    let caps = bullet_item_regex().captures(rest)?;
    Some(ListItem {
        indent: indent_width(config, caps.get(1)?.as_str()),
        ordinal: None,
    })
}

/// Renumber every ordered list touched by a selection range.
///
/// Each list block is renumbered from 1 by structure alone: a deeper
/// indentation opens a nested counter at 1, returning to a shallower one
/// resumes that depth's counter. Only the digits are rewritten. Several
/// ranges resolving to the same block renumber it once.
///
/// The returned transaction carries no selection; applying it maps the
/// current one.
pub fn renumber_selected_lists(state: &EditorState) -> Result<Transaction, EditError> {
    let doc = state.doc();
    let items: Vec<Option<ListItem>> = (0..doc.line_count())
        .map(|n| scan_item(doc, state.config(), n))
        .collect();

    let mut blocks: BTreeSet<(usize, usize)> = BTreeSet::new();
    for range in state.selection().ranges() {
        let first = doc.line_at(range.from()).number;
        let last = doc.line_at(range.to()).number;
        let mut line = first;
        while line <= last {
            if items[line].is_none() {
                line += 1;
                continue;
            }
            let run = contiguous_run(&items, line);
            for block in split_blocks(&items, run.clone()) {
                if *block.start() <= last && first <= *block.end() {
                    blocks.insert((*block.start(), *block.end()));
                }
            }
            line = run.end() + 1;
        }
    }

    let mut edits = Vec::new();
    for &(start, end) in &blocks {
        debug!("renumbering list block on lines {start}..={end}");
        edits.extend(renumber_block(doc, &items[start..=end]));
    }

    Ok(Transaction::new(EditScript::new(edits)?, None))
}

/// Maximal run of list item lines around `line`.
fn contiguous_run(items: &[Option<ListItem>], line: usize) -> RangeInclusive<usize> {
    let mut start = line;
    while start > 0 && items[start - 1].is_some() {
        start -= 1;
    }
    let mut end = line;
    while end + 1 < items.len() && items[end + 1].is_some() {
        end += 1;
    }
    start..=end
}

/// Split a run where a line's indentation matches no open depth.
fn split_blocks(items: &[Option<ListItem>], run: RangeInclusive<usize>) -> Vec<RangeInclusive<usize>> {
    let mut blocks = Vec::new();
    let mut depths: Vec<usize> = Vec::new();
    let mut block_start = *run.start();

    for line in run.clone() {
        let Some(item) = &items[line] else {
            continue;
        };
        let open = depths.len();
        while depths.last().is_some_and(|&d| d > item.indent) {
            depths.pop();
        }
        let closed_any = depths.len() < open;

        match depths.last() {
            Some(&d) if d == item.indent => {}
            Some(_) if !closed_any => depths.push(item.indent),
            None if line == block_start => depths.push(item.indent),
            _ => {
                blocks.push(block_start..=line - 1);
                block_start = line;
                depths = vec![item.indent];
            }
        }
    }
    blocks.push(block_start..=*run.end());
    blocks
}

fn renumber_block(doc: &Document, block: &[Option<ListItem>]) -> Vec<Edit> {
    // (indent width, last ordinal used at that depth)
    let mut counters: Vec<(usize, usize)> = Vec::new();
    let mut edits = Vec::new();

    for item in block.iter().flatten() {
        while counters.last().is_some_and(|&(d, _)| d > item.indent) {
            counters.pop();
        }
        if counters.last().map(|&(d, _)| d) != Some(item.indent) {
            counters.push((item.indent, 0));
        }
        let Some(ordinal) = &item.ordinal else {
            continue;
        };
        let Some(counter) = counters.last_mut() else {
            continue;
        };
        counter.1 += 1;

        let value = counter.1.to_string();
        if doc.slice(ordinal.clone()) != value.as_str() {
            edits.push(Edit::replace(ordinal.clone(), value));
        }
    }
    edits
}
