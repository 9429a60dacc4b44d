/*!
 * # Regions
 *
 * Delimited spans of text (emphasis, code spans, fenced blocks) described by
 * a [`RegionSpec`] and toggled around every selection range at once.
 *
 * - **`spec`**: how a region is written (`Template`) and recognised
 *   (`Matcher`, a pair of literal or regex `Delimiter`s).
 * - **`matcher`**: `find_inline_match` and the line-level fence checks.
 * - **`toggle`**: apply-or-remove decisions producing one `Transaction`.
 * - **`formats`**: preset specs for the common Markdown regions.
 */

pub mod formats;
pub mod matcher;
pub mod spec;
pub mod toggle;

pub use matcher::{MatchSide, find_inline_match};
pub use spec::{
    Delimiter, MatchStrategy, Matcher, MatcherOptions, RegionSpec, RegionSpecOptions, Template,
};
pub use toggle::{toggle_inline_format_globally, toggle_region_format_globally};
