/// Blockquote line prefixes (`> `, `>> `, `> > `).
///
/// Fence detection, fence insertion and list recognition all look at the
/// line remainder after these prefixes.
pub struct BlockQuote;

impl BlockQuote {
    /// The blockquote prefix character.
    pub const PREFIX: char = '>';

    /// Strips blockquote prefixes from a line, returning (depth, byte_offset).
    ///
    /// Spaces are only consumed when a `>` follows them, so the indentation
    /// of an unquoted line is left in the remainder.
    pub fn strip_prefixes(s: &str) -> (u8, usize) {
        let b = s.as_bytes();
        let mut i = 0usize;
        let mut depth = 0u8;

        loop {
            let mut j = i;
            while j < b.len() && b[j] == b' ' {
                j += 1;
            }
            if j < b.len() && b[j] == (Self::PREFIX as u8) {
                depth = depth.saturating_add(1);
                j += 1;
                if j < b.len() && b[j] == b' ' {
                    j += 1;
                }
                i = j;
            } else {
                break;
            }
        }
        (depth, i)
    }

    /// The prefix text itself, e.g. `"> "` for `"> text"`.
    pub fn prefix_of(s: &str) -> &str {
        let (_, offset) = Self::strip_prefixes(s);
        &s[..offset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("hello", (0, 0))]
    #[case("> hello", (1, 2))]
    #[case("> > hello", (2, 4))]
    #[case(">> hello", (2, 3))]
    #[case("  > indented", (1, 4))]
    #[case("    1. item", (0, 0))]
    #[case(">", (1, 1))]
    fn strip_prefixes_cases(#[case] line: &str, #[case] expected: (u8, usize)) {
        assert_eq!(BlockQuote::strip_prefixes(line), expected);
    }

    #[test]
    fn prefix_of_keeps_quote_markers() {
        assert_eq!(BlockQuote::prefix_of("> > ```"), "> > ");
        assert_eq!(BlockQuote::prefix_of("plain"), "");
    }
}
