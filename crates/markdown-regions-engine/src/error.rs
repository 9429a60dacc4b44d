use std::ops::Range;

use thiserror::Error;

/// Shape of a template or matcher: one delimiter for both sides, or distinct
/// start and end delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Symmetric,
    StartEnd,
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shape::Symmetric => write!(f, "symmetric"),
            Shape::StartEnd => write!(f, "start/end"),
        }
    }
}

/// Errors raised while building a [`crate::regions::RegionSpec`].
///
/// These are reported at construction time so that matching never sees a
/// partially valid region spec.
#[derive(Debug, Error)]
pub enum RegionSpecError {
    #[error("template is {template} but matcher is {matcher}")]
    ShapeMismatch { template: Shape, matcher: Shape },

    #[error("region template delimiters must not be empty")]
    EmptyTemplate,

    #[error("invalid matcher pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// Errors raised while assembling or applying an [`crate::editing::EditScript`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("edits {first:?} and {second:?} overlap")]
    OverlappingEdits {
        first: Range<usize>,
        second: Range<usize>,
    },

    #[error("edit {range:?} is outside a document of length {len}")]
    OutOfBounds { range: Range<usize>, len: usize },
}
