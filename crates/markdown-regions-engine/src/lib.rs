pub mod commands;
pub mod editing;
pub mod error;
pub mod lists;
pub mod quote;
pub mod regions;

// Re-export key types for easier usage
pub use commands::FormatCmd;
pub use editing::{
    Document, Edit, EditScript, EditorState, IndentConfig, Selection, SelectionRange, Transaction,
};
pub use error::{EditError, RegionSpecError};
pub use lists::{renumber_selected_lists, tabs_to_spaces};
pub use regions::{
    MatchSide, RegionSpec, RegionSpecOptions, find_inline_match, toggle_inline_format_globally,
    toggle_region_format_globally,
};
