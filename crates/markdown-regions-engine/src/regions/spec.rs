use std::ops::Range;

use regex::Regex;

use super::MatchSide;
use crate::error::{RegionSpecError, Shape};

/// Literal text written when a region is inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
    /// Same delimiter on both sides, e.g. `**`.
    Symmetric(String),
    /// Distinct opening and closing delimiters.
    StartEnd { start: String, end: String },
}

impl Template {
    pub fn shape(&self) -> Shape {
        match self {
            Template::Symmetric(_) => Shape::Symmetric,
            Template::StartEnd { .. } => Shape::StartEnd,
        }
    }

    pub fn start(&self) -> &str {
        match self {
            Template::Symmetric(text) => text,
            Template::StartEnd { start, .. } => start,
        }
    }

    pub fn end(&self) -> &str {
        match self {
            Template::Symmetric(text) => text,
            Template::StartEnd { end, .. } => end,
        }
    }

    pub fn side(&self, side: MatchSide) -> &str {
        match side {
            MatchSide::Start => self.start(),
            MatchSide::End => self.end(),
        }
    }
}

/// Regular expressions recognising existing delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatcherOptions {
    Symmetric(String),
    StartEnd { start: String, end: String },
}

impl MatcherOptions {
    fn shape(&self) -> Shape {
        match self {
            MatcherOptions::Symmetric(_) => Shape::Symmetric,
            MatcherOptions::StartEnd { .. } => Shape::StartEnd,
        }
    }
}

/// Simplified construction options for [`RegionSpec::of`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSpecOptions {
    pub template: Template,
    /// Defaults to matching the template literally.
    pub matcher: Option<MatcherOptions>,
    /// Syntax tree node kind for this region, e.g. `fenced_code_block`.
    pub node_name: Option<String>,
}

impl RegionSpecOptions {
    pub fn symmetric(template: impl Into<String>) -> Self {
        Self {
            template: Template::Symmetric(template.into()),
            matcher: None,
            node_name: None,
        }
    }

    pub fn start_end(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            template: Template::StartEnd {
                start: start.into(),
                end: end.into(),
            },
            matcher: None,
            node_name: None,
        }
    }

    pub fn with_matcher(mut self, matcher: MatcherOptions) -> Self {
        self.matcher = Some(matcher);
        self
    }

    pub fn with_node_name(mut self, node_name: impl Into<String>) -> Self {
        self.node_name = Some(node_name.into());
        self
    }
}

/// How one side's delimiter is recognised.
///
/// A single-character literal only matches at the edge of an odd-length run
/// of that character, so `*` is not found in `**` but is in `***`.
#[derive(Debug, Clone)]
pub enum Delimiter {
    Literal(String),
    Pattern(Regex),
}

impl Delimiter {
    fn pattern(source: &str) -> Result<Self, RegionSpecError> {
        Regex::new(source)
            .map(Delimiter::Pattern)
            .map_err(|source_err| RegionSpecError::InvalidPattern {
                pattern: source.to_string(),
                source: source_err,
            })
    }

    /// Whether the delimiter is evaluated against whole lines (`^...`).
    pub fn is_line_anchored(&self) -> bool {
        match self {
            Delimiter::Literal(_) => false,
            Delimiter::Pattern(re) => re.as_str().starts_with('^'),
        }
    }

    /// First match anywhere in `hay`.
    pub fn find(&self, hay: &str) -> Option<Range<usize>> {
        match self {
            Delimiter::Literal(text) => hay.find(text.as_str()).map(|i| i..i + text.len()),
            Delimiter::Pattern(re) => re.find(hay).map(|m| m.range()),
        }
    }

    /// End of a match that starts at the beginning of `hay`.
    pub fn match_prefix(&self, hay: &str) -> Option<usize> {
        match self {
            Delimiter::Literal(text) => match single_char(text) {
                Some(c) => {
                    odd_run(hay.chars().take_while(|&h| h == c).count()).then_some(text.len())
                }
                None => hay.starts_with(text.as_str()).then_some(text.len()),
            },
            Delimiter::Pattern(re) => re.find(hay).filter(|m| m.start() == 0).map(|m| m.end()),
        }
    }

    /// Start of a match that finishes at the end of `hay`.
    pub fn match_suffix(&self, hay: &str) -> Option<usize> {
        match self {
            Delimiter::Literal(text) => match single_char(text) {
                Some(c) => odd_run(hay.chars().rev().take_while(|&h| h == c).count())
                    .then(|| hay.len() - text.len()),
                None => hay
                    .ends_with(text.as_str())
                    .then(|| hay.len() - text.len()),
            },
            Delimiter::Pattern(re) => {
                let mut at = 0;
                while at <= hay.len() {
                    let m = re.find_at(hay, at)?;
                    if m.start() > at {
                        at = m.start();
                        continue;
                    }
                    if m.end() == hay.len() {
                        return Some(m.start());
                    }
                    at += hay[at..].chars().next().map_or(1, char::len_utf8);
                }
                None
            }
        }
    }
}

fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

fn odd_run(len: usize) -> bool {
    len % 2 == 1
}

/// Start and end delimiter recognisers of one region kind.
#[derive(Debug, Clone)]
pub struct Matcher {
    pub start: Delimiter,
    pub end: Delimiter,
}

impl Matcher {
    pub fn side(&self, side: MatchSide) -> &Delimiter {
        match side {
            MatchSide::Start => &self.start,
            MatchSide::End => &self.end,
        }
    }
}

/// One way of locating a delimiter, tried in order until one hits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Ask the parse tree for a node of this kind bordering the selection.
    SyntaxNode(String),
    /// Match the region's delimiters against the text.
    Text,
}

/// Declarative description of one region kind.
///
/// Immutable once built; all validation happens in [`RegionSpec::of`].
///
/// ```rust
/// # use markdown_regions_engine::regions::{RegionSpec, RegionSpecOptions, MatcherOptions};
/// let bold = RegionSpec::of(RegionSpecOptions::symmetric("**")).unwrap();
/// assert_eq!(bold.template().start(), "**");
///
/// // A symmetric template cannot be paired with a start/end matcher
/// let bad = RegionSpec::of(RegionSpecOptions::symmetric("$").with_matcher(
///     MatcherOptions::StartEnd { start: r"\$".into(), end: r"\$\$".into() },
/// ));
/// assert!(bad.is_err());
/// ```
#[derive(Debug, Clone)]
pub struct RegionSpec {
    template: Template,
    matcher: Matcher,
    node_name: Option<String>,
    strategies: Vec<MatchStrategy>,
}

impl RegionSpec {
    pub fn of(options: RegionSpecOptions) -> Result<Self, RegionSpecError> {
        let RegionSpecOptions {
            template,
            matcher,
            node_name,
        } = options;

        if template.start().is_empty() || template.end().is_empty() {
            return Err(RegionSpecError::EmptyTemplate);
        }

        let matcher = match matcher {
            None => Matcher {
                start: Delimiter::Literal(template.start().to_string()),
                end: Delimiter::Literal(template.end().to_string()),
            },
            Some(options) if options.shape() != template.shape() => {
                return Err(RegionSpecError::ShapeMismatch {
                    template: template.shape(),
                    matcher: options.shape(),
                });
            }
            Some(MatcherOptions::Symmetric(source)) => {
                let delimiter = Delimiter::pattern(&source)?;
                Matcher {
                    start: delimiter.clone(),
                    end: delimiter,
                }
            }
            Some(MatcherOptions::StartEnd { start, end }) => Matcher {
                start: Delimiter::pattern(&start)?,
                end: Delimiter::pattern(&end)?,
            },
        };

        let mut strategies = Vec::with_capacity(2);
        if let Some(name) = &node_name {
            strategies.push(MatchStrategy::SyntaxNode(name.clone()));
        }
        strategies.push(MatchStrategy::Text);

        Ok(Self {
            template,
            matcher,
            node_name,
            strategies,
        })
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn node_name(&self) -> Option<&str> {
        self.node_name.as_deref()
    }

    pub fn strategies(&self) -> &[MatchStrategy] {
        &self.strategies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn symmetric_template_defaults_to_literal_matcher() {
        let spec = RegionSpec::of(RegionSpecOptions::symmetric("**")).unwrap();
        assert!(matches!(&spec.matcher().start, Delimiter::Literal(t) if t == "**"));
        assert!(matches!(&spec.matcher().end, Delimiter::Literal(t) if t == "**"));
        assert_eq!(spec.strategies(), &[MatchStrategy::Text]);
    }

    #[test]
    fn node_name_prepends_syntax_strategy() {
        let spec = RegionSpec::of(
            RegionSpecOptions::start_end("```", "```").with_node_name("fenced_code_block"),
        )
        .unwrap();
        assert_eq!(spec.node_name(), Some("fenced_code_block"));
        assert_eq!(
            spec.strategies(),
            &[
                MatchStrategy::SyntaxNode("fenced_code_block".to_string()),
                MatchStrategy::Text
            ]
        );
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let err = RegionSpec::of(
            RegionSpecOptions::start_end("<u>", "</u>")
                .with_matcher(MatcherOptions::Symmetric("<u>".into())),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RegionSpecError::ShapeMismatch {
                template: Shape::StartEnd,
                matcher: Shape::Symmetric
            }
        ));
    }

    #[test]
    fn empty_template_is_rejected() {
        let err = RegionSpec::of(RegionSpecOptions::start_end("", "```")).unwrap_err();
        assert!(matches!(err, RegionSpecError::EmptyTemplate));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = RegionSpec::of(
            RegionSpecOptions::symmetric("(").with_matcher(MatcherOptions::Symmetric("(".into())),
        )
        .unwrap_err();
        assert!(matches!(err, RegionSpecError::InvalidPattern { pattern, .. } if pattern == "("));
    }

    #[test]
    fn line_anchored_detection() {
        assert!(Delimiter::pattern(r"^\s*\d+\.").unwrap().is_line_anchored());
        assert!(!Delimiter::pattern(r"\*\*").unwrap().is_line_anchored());
        assert!(!Delimiter::Literal("^".into()).is_line_anchored());
    }

    #[rstest]
    #[case(Delimiter::Literal("**".into()), "**bold", Some(2))]
    #[case(Delimiter::Literal("**".into()), "bold**", None)]
    #[case(Delimiter::Literal("*".into()), "*word", Some(1))]
    #[case(Delimiter::Literal("*".into()), "**word", None)]
    #[case(Delimiter::Literal("*".into()), "***word", Some(1))]
    #[case(Delimiter::pattern(r"`+").unwrap(), "```rust", Some(3))]
    #[case(Delimiter::pattern(r"$").unwrap(), "", Some(0))]
    #[case(Delimiter::pattern(r"x").unwrap(), "ax", None)]
    fn match_prefix_cases(
        #[case] delimiter: Delimiter,
        #[case] hay: &str,
        #[case] expected: Option<usize>,
    ) {
        assert_eq!(delimiter.match_prefix(hay), expected);
    }

    #[rstest]
    #[case(Delimiter::Literal("**".into()), "some **", Some(5))]
    #[case(Delimiter::Literal("**".into()), "** some", None)]
    #[case(Delimiter::Literal("*".into()), "a *", Some(2))]
    #[case(Delimiter::Literal("*".into()), "a **", None)]
    #[case(Delimiter::Literal("*".into()), "a ***", Some(4))]
    #[case(Delimiter::pattern(r"\*\*").unwrap(), "a***", Some(2))]
    #[case(Delimiter::pattern(r"\*+").unwrap(), "a***", Some(1))]
    #[case(Delimiter::pattern(r"$").unwrap(), "text", Some(4))]
    #[case(Delimiter::pattern(r"==").unwrap(), "==x", None)]
    fn match_suffix_cases(
        #[case] delimiter: Delimiter,
        #[case] hay: &str,
        #[case] expected: Option<usize>,
    ) {
        assert_eq!(delimiter.match_suffix(hay), expected);
    }
}
