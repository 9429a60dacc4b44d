use super::{Document, EditScript, Selection};
use crate::error::EditError;

/// Indentation settings consulted by tab expansion and list nesting.
///
/// Passed explicitly as part of [`EditorState`]; nothing in the engine reads
/// global configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentConfig {
    /// Text inserted for one level of indentation, e.g. four spaces or `\t`.
    pub indent_unit: String,
    /// Visual width of a tab, used when `indent_unit` contains a tab.
    pub tab_size: usize,
}

impl IndentConfig {
    pub fn spaces(width: usize) -> Self {
        Self {
            indent_unit: " ".repeat(width),
            tab_size: width,
        }
    }

    pub fn tabs(tab_size: usize) -> Self {
        Self {
            indent_unit: "\t".to_string(),
            tab_size,
        }
    }

    /// Column width of one indentation unit (never zero).
    pub fn unit_width(&self) -> usize {
        let width = if self.indent_unit.contains('\t') {
            self.tab_size
        } else {
            self.indent_unit.chars().count()
        };
        width.max(1)
    }
}

impl Default for IndentConfig {
    fn default() -> Self {
        Self::spaces(4)
    }
}

/// Everything a formatting operation reads: the document snapshot, the
/// current selection and the indentation settings.
#[derive(Debug, Clone)]
pub struct EditorState {
    doc: Document,
    selection: Selection,
    config: IndentConfig,
}

impl EditorState {
    pub fn new(doc: Document, selection: Selection, config: IndentConfig) -> Self {
        Self {
            doc,
            selection,
            config,
        }
    }

    /// Parse `text` into a state with the default indentation settings.
    pub fn from_text(text: &str, selection: impl Into<Selection>) -> anyhow::Result<Self> {
        Ok(Self::new(
            Document::from_text(text)?,
            selection.into(),
            IndentConfig::default(),
        ))
    }

    pub fn with_config(mut self, config: IndentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn config(&self) -> &IndentConfig {
        &self.config
    }

    /// Apply a transaction atomically, producing the next state.
    ///
    /// When the transaction carries no explicit selection the current one is
    /// mapped through its edits.
    pub fn apply(&self, tr: &Transaction) -> Result<EditorState, EditError> {
        let doc = self.doc.apply(&tr.changes)?;
        let selection = match &tr.selection {
            Some(selection) => selection.clone(),
            None => self.selection.map(&tr.changes),
        };

        Ok(EditorState {
            doc,
            selection,
            config: self.config.clone(),
        })
    }
}

/// Result of a formatting operation: edits against the snapshot the
/// operation read, plus an optional explicit selection for afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    pub changes: EditScript,
    pub selection: Option<Selection>,
}

impl Transaction {
    pub fn new(changes: EditScript, selection: Option<Selection>) -> Self {
        Self { changes, selection }
    }

    pub fn is_noop(&self) -> bool {
        self.changes.is_empty() && self.selection.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{Edit, SelectionRange};
    use pretty_assertions::assert_eq;

    #[test]
    fn unit_width_counts_characters() {
        assert_eq!(IndentConfig::spaces(2).unit_width(), 2);
        assert_eq!(IndentConfig::default().unit_width(), 4);
    }

    #[test]
    fn unit_width_uses_tab_size_for_tabs() {
        assert_eq!(IndentConfig::tabs(8).unit_width(), 8);
    }

    #[test]
    fn unit_width_is_never_zero() {
        let config = IndentConfig {
            indent_unit: String::new(),
            tab_size: 0,
        };
        assert_eq!(config.unit_width(), 1);
    }

    #[test]
    fn apply_maps_selection_without_explicit_one() {
        let state = EditorState::from_text("hello", SelectionRange::cursor(5)).unwrap();
        let tr = Transaction::new(
            EditScript::new(vec![Edit::insert(0, ">> ")]).unwrap(),
            None,
        );
        let next = state.apply(&tr).unwrap();
        assert_eq!(next.doc().text(), ">> hello");
        assert_eq!(next.selection().main(), SelectionRange::cursor(8));
    }

    #[test]
    fn apply_prefers_explicit_selection() {
        let state = EditorState::from_text("hello", SelectionRange::cursor(5)).unwrap();
        let tr = Transaction::new(EditScript::empty(), Some(Selection::cursor(1)));
        let next = state.apply(&tr).unwrap();
        assert_eq!(next.selection().main(), SelectionRange::cursor(1));
        assert!(!tr.is_noop());
    }
}
