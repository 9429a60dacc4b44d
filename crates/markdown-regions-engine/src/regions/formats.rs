//! Preset region specs for common Markdown formatting.
//!
//! Every preset is built from constant options, so construction cannot fail.

use super::spec::{MatcherOptions, RegionSpec, RegionSpecOptions};

/// Tree-sitter node kind of a fenced code block.
pub const FENCED_CODE_BLOCK: &str = "fenced_code_block";

fn preset(options: RegionSpecOptions) -> RegionSpec {
    match RegionSpec::of(options) {
        Ok(spec) => spec,
        Err(e) => unreachable!("preset region spec is invalid: {e}"),
    }
}

pub fn bold() -> RegionSpec {
    preset(RegionSpecOptions::symmetric("**"))
}

pub fn italic() -> RegionSpec {
    preset(RegionSpecOptions::symmetric("*"))
}

pub fn strikethrough() -> RegionSpec {
    preset(RegionSpecOptions::symmetric("~~"))
}

pub fn highlight() -> RegionSpec {
    preset(RegionSpecOptions::symmetric("=="))
}

pub fn inline_code() -> RegionSpec {
    preset(RegionSpecOptions::symmetric("`"))
}

/// Fenced code block; the opening fence may carry an info string.
pub fn code_block() -> RegionSpec {
    preset(
        RegionSpecOptions::start_end("```", "```")
            .with_matcher(MatcherOptions::StartEnd {
                start: r"^```[^`\s]*\s*$".into(),
                end: r"^```\s*$".into(),
            })
            .with_node_name(FENCED_CODE_BLOCK),
    )
}

pub fn inline_math() -> RegionSpec {
    preset(RegionSpecOptions::symmetric("$"))
}

pub fn block_math() -> RegionSpec {
    preset(RegionSpecOptions::symmetric("$$"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::MatchStrategy;

    #[test]
    fn presets_build() {
        for spec in [
            bold(),
            italic(),
            strikethrough(),
            highlight(),
            inline_code(),
            code_block(),
            inline_math(),
            block_math(),
        ] {
            assert!(!spec.template().start().is_empty());
        }
    }

    #[test]
    fn code_block_prefers_the_syntax_tree() {
        assert_eq!(
            code_block().strategies()[0],
            MatchStrategy::SyntaxNode(FENCED_CODE_BLOCK.to_string())
        );
    }
}
