use crate::editing::{EditorState, Transaction};
use crate::error::EditError;
use crate::lists::renumber_selected_lists;
use crate::regions::{formats, toggle_inline_format_globally, toggle_region_format_globally};

/// Formatting commands a host can bind to keys or menu items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCmd {
    ToggleBold,
    ToggleItalic,
    ToggleStrikethrough,
    ToggleHighlight,
    /// Inline code on one line, a fenced block across lines.
    ToggleCode,
    /// Inline math on one line, a `$$` block across lines.
    ToggleMath,
    RenumberLists,
}

impl FormatCmd {
    /// Compile the command against a state into a transaction.
    pub fn compile(self, state: &EditorState) -> Result<Transaction, EditError> {
        match self {
            FormatCmd::ToggleBold => toggle_inline_format_globally(state, &formats::bold()),
            FormatCmd::ToggleItalic => toggle_inline_format_globally(state, &formats::italic()),
            FormatCmd::ToggleStrikethrough => {
                toggle_inline_format_globally(state, &formats::strikethrough())
            }
            FormatCmd::ToggleHighlight => {
                toggle_inline_format_globally(state, &formats::highlight())
            }
            FormatCmd::ToggleCode => toggle_region_format_globally(
                state,
                &formats::inline_code(),
                &formats::code_block(),
            ),
            FormatCmd::ToggleMath => toggle_region_format_globally(
                state,
                &formats::inline_math(),
                &formats::block_math(),
            ),
            FormatCmd::RenumberLists => renumber_selected_lists(state),
        }
    }

    /// Compile and apply in one step.
    pub fn run(self, state: &EditorState) -> Result<EditorState, EditError> {
        let tr = self.compile(state)?;
        state.apply(&tr)
    }
}
