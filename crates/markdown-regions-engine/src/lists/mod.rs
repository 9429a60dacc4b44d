//! Indentation-aware list handling: tab expansion and ordered list
//! renumbering.

pub mod indent;
pub mod renumber;

pub use indent::tabs_to_spaces;
pub use renumber::renumber_selected_lists;
