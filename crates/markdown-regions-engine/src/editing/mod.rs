/*!
 * # Editing Primitives
 *
 * The formatting operations never touch a live buffer. They read an
 * [`EditorState`] and return a [`Transaction`] describing what to change.
 *
 * ## Pieces
 *
 * - **`document`**: immutable `Document` snapshot. Text lives in an
 *   `xi_rope::Rope`; a tree-sitter Markdown parse backs structural lookups
 *   (`enclosing_node`, `node_delimiter`).
 * - **`selection`**: `SelectionRange` (anchor + head byte offsets) and the
 *   ordered multi-range `Selection`.
 * - **`edit_script`**: `EditScript`, a sorted set of non-overlapping
 *   replacements whose offsets all refer to the original snapshot. Compiles
 *   to an xi-rope `Delta`.
 * - **`state`**: `EditorState`, `IndentConfig` and `Transaction`.
 *
 * ## Usage Pattern
 *
 * ```rust
 * use markdown_regions_engine::editing::*;
 *
 * let state = EditorState::from_text("1. a\n5. b", SelectionRange::cursor(0)).unwrap();
 *
 * // Operations return a transaction computed against `state`
 * let tr = Transaction::new(
 *     EditScript::new(vec![Edit::replace(5..6, "2")]).unwrap(),
 *     None,
 * );
 *
 * // Applying it is one atomic step
 * let next = state.apply(&tr).unwrap();
 * assert_eq!(next.doc().text(), "1. a\n2. b");
 * ```
 */

pub mod document;
pub mod edit_script;
pub mod selection;
pub mod state;

pub use document::{Document, Line};
pub use edit_script::{Assoc, Edit, EditScript};
pub use selection::{Selection, SelectionRange};
pub use state::{EditorState, IndentConfig, Transaction};
