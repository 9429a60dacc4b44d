use std::ops::Range;

use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

use crate::error::EditError;

/// A single replacement against one document snapshot.
///
/// `range` is a byte range in the *original* snapshot; an empty range is a
/// pure insertion and an empty `insert` is a pure deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub range: Range<usize>,
    pub insert: String,
}

impl Edit {
    pub fn replace(range: Range<usize>, insert: impl Into<String>) -> Self {
        Self {
            range,
            insert: insert.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::replace(at..at, text)
    }

    pub fn delete(range: Range<usize>) -> Self {
        Self::replace(range, String::new())
    }

    /// Net change in document length caused by this edit.
    fn delta_len(&self) -> isize {
        self.insert.len() as isize - self.range.len() as isize
    }
}

/// Which side of an insertion a mapped offset sticks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Assoc {
    /// Stay before text inserted exactly at the offset.
    #[default]
    Before,
    /// Move past text inserted exactly at the offset.
    After,
}

/// An ordered set of non-overlapping edits against one snapshot.
///
/// All offsets refer to the original snapshot; they are not shifted by
/// earlier edits in the same script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditScript {
    edits: Vec<Edit>,
}

impl EditScript {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a script from edits in any order.
    ///
    /// Edits are sorted by position (insertions at the same offset keep their
    /// relative order). Overlapping edits are rejected: they can only come
    /// from overlapping selections, which callers must not pass in.
    pub fn new(mut edits: Vec<Edit>) -> Result<Self, EditError> {
        edits.retain(|e| !(e.range.is_empty() && e.insert.is_empty()));
        edits.sort_by_key(|e| (e.range.start, e.range.end));

        for pair in edits.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.range.end > b.range.start {
                return Err(EditError::OverlappingEdits {
                    first: a.range.clone(),
                    second: b.range.clone(),
                });
            }
        }

        Ok(Self { edits })
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Map an offset in the original snapshot to the edited document.
    ///
    /// Offsets inside a replaced range collapse to its start (or its end with
    /// [`Assoc::After`]). With [`Assoc::After`] an offset moves past every
    /// insertion made at the same point, not just the first.
    pub fn map_offset(&self, pos: usize, assoc: Assoc) -> usize {
        let mut shift: isize = 0;

        for (i, edit) in self.edits.iter().enumerate() {
            let Range { start, end } = edit.range;
            if pos < start {
                break;
            }
            if pos > end || (pos == end && start < end) {
                shift += edit.delta_len();
                continue;
            }

            // start <= pos <= end, and pos is either inside the replaced
            // range or exactly at an insertion point.
            let base = (start as isize + shift) as usize;
            return match assoc {
                Assoc::Before => base,
                Assoc::After => {
                    let trailing: usize = self.edits[i + 1..]
                        .iter()
                        .take_while(|e| e.range.is_empty() && e.range.start == end)
                        .map(|e| e.insert.len())
                        .sum();
                    base + edit.insert.len() + trailing
                }
            };
        }

        (pos as isize + shift) as usize
    }

    /// Check every edit fits inside a document of `len` bytes.
    pub fn check_bounds(&self, len: usize) -> Result<(), EditError> {
        match self.edits.iter().find(|e| e.range.end > len) {
            Some(edit) => Err(EditError::OutOfBounds {
                range: edit.range.clone(),
                len,
            }),
            None => Ok(()),
        }
    }

    /// Compile the script into an xi-rope delta over a base of `base_len` bytes.
    pub fn to_delta(&self, base_len: usize) -> Delta<RopeInfo> {
        let mut builder = Builder::new(base_len);
        for edit in &self.edits {
            if edit.insert.is_empty() {
                builder.delete(edit.range.clone());
            } else {
                builder.replace(edit.range.clone(), Rope::from(edit.insert.as_str()));
            }
        }
        builder.build()
    }

    #[cfg(test)]
    fn apply_to_str(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        for edit in &self.edits {
            out.push_str(&text[cursor..edit.range.start]);
            out.push_str(&edit.insert);
            cursor = edit.range.end;
        }
        out.push_str(&text[cursor..]);
        out
    }
}
