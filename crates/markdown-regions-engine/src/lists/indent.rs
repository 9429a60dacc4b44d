use crate::editing::IndentConfig;

/// Expand tabs to spaces using the configured indentation width as tab stop.
///
/// Columns are counted from the start of `text`, so the first tab always
/// becomes one full indentation unit. Every other character advances the
/// column by one.
///
/// ```rust
/// # use markdown_regions_engine::editing::IndentConfig;
/// # use markdown_regions_engine::lists::tabs_to_spaces;
/// let config = IndentConfig::spaces(4);
/// assert_eq!(tabs_to_spaces(&config, "\tx"), "    x");
/// assert_eq!(tabs_to_spaces(&config, "ab\tx"), "ab  x");
/// ```
pub fn tabs_to_spaces(config: &IndentConfig, text: &str) -> String {
    let width = config.unit_width();
    let mut out = String::with_capacity(text.len());
    let mut column = 0usize;

    for ch in text.chars() {
        if ch == '\t' {
            let pad = width - column % width;
            out.extend(std::iter::repeat_n(' ', pad));
            column += pad;
        } else {
            out.push(ch);
            column += 1;
        }
    }
    out
}

/// Visual width of a run of leading whitespace.
pub(crate) fn indent_width(config: &IndentConfig, indent: &str) -> usize {
    tabs_to_spaces(config, indent).chars().count()
}
