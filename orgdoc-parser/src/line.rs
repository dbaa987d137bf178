//! Line-start recognisers.
//!
//! These only classify a line and report the structural widths the block parsers need
//! (header level, marker width, region type). They never interpret the content.

/// Column width of the leading whitespace of `line`, with tabs advancing to the next
/// multiple of `tab_width`.
#[must_use]
pub(crate) fn indent_width(line: &str, tab_width: usize) -> usize {
    let mut column = 0;
    for c in line.chars() {
        match c {
            ' ' => column += 1,
            '\t' => column += tab_width - column % tab_width,
            _ => break,
        }
    }
    column
}

/// Remove up to `columns` columns of leading whitespace.
///
/// A tab that straddles the limit is replaced by the spaces left over past it, so the
/// stripped line keeps the columns of its content.
#[must_use]
pub(crate) fn strip_indent(line: &str, columns: usize, tab_width: usize) -> String {
    let mut column = 0;
    for (offset, c) in line.char_indices() {
        if column >= columns {
            return line.get(offset..).unwrap_or_default().to_string();
        }
        match c {
            ' ' => column += 1,
            '\t' => {
                column += tab_width - column % tab_width;
                if column > columns {
                    let rest = line.get(offset + 1..).unwrap_or_default();
                    return format!("{}{rest}", " ".repeat(column - columns));
                }
            }
            _ => return line.get(offset..).unwrap_or_default().to_string(),
        }
    }
    String::new()
}

#[must_use]
pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Level of a headline: one or more `*` at column 0 followed by a space.
#[must_use]
pub(crate) fn header_level(line: &str) -> Option<usize> {
    let level = line.bytes().take_while(|&b| b == b'*').count();
    (level > 0 && line.get(level..).is_some_and(|rest| rest.starts_with([' ', '\t'])))
        .then_some(level)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MarkerKind {
    Bullet,
    Ordered,
}

/// A list item marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ListMarker {
    pub(crate) kind: MarkerKind,
    /// Column of the marker.
    pub(crate) indent: usize,
    /// Columns from the start of the line to the item's text.
    pub(crate) width: usize,
}

/// Recognise a bullet (`-`, `+`, `*`) or ordered (`1.`, `1)`) item marker.
///
/// A `*` bullet at column 0 is a headline unless `allow_star` is set, which the list
/// parser does inside list items, where headlines cannot occur.
#[must_use]
pub(crate) fn list_marker(line: &str, tab_width: usize, allow_star: bool) -> Option<ListMarker> {
    let indent = indent_width(line, tab_width);
    let rest = line.trim_start_matches([' ', '\t']);
    let (kind, marker_len) = match rest.bytes().next()? {
        b'-' | b'+' => (MarkerKind::Bullet, 1),
        b'*' if indent > 0 || allow_star => (MarkerKind::Bullet, 1),
        b'0'..=b'9' => {
            let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
            match rest.as_bytes().get(digits) {
                Some(b'.' | b')') => (MarkerKind::Ordered, digits + 1),
                _ => return None,
            }
        }
        _ => return None,
    };
    let after = rest.get(marker_len..)?;
    let spaces = after.bytes().take_while(|&b| b == b' ').count();
    if spaces == 0 && !after.is_empty() {
        return None;
    }
    // An item holding nothing but its marker still counts as one space wide.
    let spaces = spaces.max(1);
    Some(ListMarker {
        kind,
        indent,
        width: indent + marker_len + spaces,
    })
}

/// Split a definition-list item's text at ` :: ` into term and description.
#[must_use]
pub(crate) fn definition_term(text: &str) -> Option<(&str, &str)> {
    if let Some((term, description)) = text.split_once(" :: ") {
        return Some((term.trim(), description));
    }
    text.trim_end().strip_suffix(" ::").map(|term| (term.trim(), ""))
}

/// `:NAME:` alone on a line; returns the name. `:END:` is not a drawer start.
#[must_use]
pub(crate) fn drawer_start(line: &str) -> Option<&str> {
    let name = line.trim().strip_prefix(':')?.strip_suffix(':')?;
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-');
    (valid && !name.eq_ignore_ascii_case("END")).then_some(name)
}

#[must_use]
pub(crate) fn is_drawer_end(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(":END:")
}

/// Strip a case-insensitive ASCII prefix.
fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| text.get(prefix.len()..))
        .flatten()
}

/// The opening line of a `#+BEGIN_<type>` region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RegionStart<'a> {
    pub(crate) indent: usize,
    pub(crate) kind: &'a str,
    /// Text after the type token (src header, quote parameters).
    pub(crate) parameters: &'a str,
}

#[must_use]
pub(crate) fn region_start(line: &str, tab_width: usize) -> Option<RegionStart<'_>> {
    let rest = strip_prefix_ignore_case(line.trim_start(), "#+begin_")?;
    let kind_len = rest.find([' ', '\t']).unwrap_or(rest.len());
    let kind = rest.get(..kind_len)?;
    if kind.is_empty() {
        return None;
    }
    Some(RegionStart {
        indent: indent_width(line, tab_width),
        kind,
        parameters: rest.get(kind_len..).unwrap_or_default(),
    })
}

/// `#+END_<kind>`, case-insensitive and possibly indented.
#[must_use]
pub(crate) fn is_region_end(line: &str, kind: &str) -> bool {
    strip_prefix_ignore_case(line.trim(), "#+end_")
        .is_some_and(|rest| rest.eq_ignore_ascii_case(kind))
}

#[must_use]
pub(crate) fn is_table_row(line: &str) -> bool {
    line.trim_start().starts_with('|')
}

#[must_use]
pub(crate) fn is_table_rule(line: &str) -> bool {
    line.trim_start().starts_with("|-")
}

/// `# comment` or a bare `#`.
#[must_use]
pub(crate) fn is_comment(line: &str) -> bool {
    let rest = line.trim_start();
    rest == "#" || rest.starts_with("# ") || rest.starts_with("#\t")
}

/// `#+KEY: value`; returns the key as written and the trimmed value.
#[must_use]
pub(crate) fn keyword(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim_start().strip_prefix("#+")?;
    let (key, value) = rest.split_once(':')?;
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }
    Some((key, value.trim()))
}

/// Keywords that attach to the following block rather than to the document.
#[must_use]
pub(crate) fn is_block_attribute_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    matches!(key.as_str(), "name" | "label" | "caption" | "results") || key.starts_with("attr_")
}

/// Five or more dashes and nothing else.
#[must_use]
pub(crate) fn is_horizontal_rule(line: &str) -> bool {
    let rest = line.trim();
    rest.len() >= 5 && rest.bytes().all(|b| b == b'-')
}

/// A footnote definition marker at column 0: `[fn:label]` or `[12]`. Returns the
/// label and the text after the marker.
#[must_use]
pub(crate) fn footnote_marker(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix('[')?;
    let (label, after) = rest.split_once(']')?;
    let label = match label.strip_prefix("fn:") {
        Some(named) => named,
        None if label.bytes().all(|b| b.is_ascii_digit()) => label,
        None => return None,
    };
    let valid = !label.is_empty()
        && label
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-');
    valid.then_some((label, after))
}

/// `\begin{env}`; returns the environment name.
#[must_use]
pub(crate) fn latex_begin(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix("\\begin{")?;
    let (name, _) = rest.split_once('}')?;
    (!name.is_empty()).then_some(name)
}

/// A fixed-width line, `: text` or a bare `:`; returns the text.
#[must_use]
pub(crate) fn example_line(line: &str) -> Option<&str> {
    let rest = line.trim_start();
    if rest == ":" {
        return Some("");
    }
    rest.strip_prefix(": ")
}

/// Whether `line` starts a block that ends a running paragraph.
#[must_use]
pub(crate) fn starts_block(line: &str, tab_width: usize, in_list: bool) -> bool {
    is_blank(line)
        || is_table_row(line)
        || region_start(line, tab_width).is_some()
        || keyword(line).is_some()
        || is_comment(line)
        || drawer_start(line).is_some()
        || example_line(line).is_some()
        || (!in_list && header_level(line).is_some())
        || is_horizontal_rule(line)
        || list_marker(line, tab_width, in_list).is_some()
        || latex_begin(line).is_some()
        || footnote_marker(line).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("    x", 4)]
    #[case("\tx", 8)]
    #[case("  \tx", 8)]
    #[case("x", 0)]
    fn indentation_columns(#[case] line: &str, #[case] expected: usize) {
        assert_eq!(indent_width(line, 8), expected);
    }

    #[rstest]
    #[case("    code", 2, "  code")]
    #[case("\tcode", 2, "      code")]
    #[case(" code", 4, "code")]
    #[case("  ", 4, "")]
    fn stripping_keeps_content_columns(#[case] line: &str, #[case] columns: usize, #[case] expected: &str) {
        assert_eq!(strip_indent(line, columns, 8), expected);
    }

    #[rstest]
    #[case("* Title", Some(1))]
    #[case("*** Deep", Some(3))]
    #[case("*bold*", None)]
    #[case(" * item", None)]
    fn header_levels(#[case] line: &str, #[case] expected: Option<usize>) {
        assert_eq!(header_level(line), expected);
    }

    #[rstest]
    #[case("- a", false, Some((MarkerKind::Bullet, 0, 2)))]
    #[case("  +   a", false, Some((MarkerKind::Bullet, 2, 6)))]
    #[case("* a", false, None)]
    #[case("* a", true, Some((MarkerKind::Bullet, 0, 2)))]
    #[case("12. a", false, Some((MarkerKind::Ordered, 0, 4)))]
    #[case("3) a", false, Some((MarkerKind::Ordered, 0, 3)))]
    #[case("-", false, Some((MarkerKind::Bullet, 0, 2)))]
    #[case("-a", false, None)]
    #[case("12 a", false, None)]
    fn list_markers(
        #[case] line: &str,
        #[case] allow_star: bool,
        #[case] expected: Option<(MarkerKind, usize, usize)>,
    ) {
        assert_eq!(
            list_marker(line, 8, allow_star).map(|m| (m.kind, m.indent, m.width)),
            expected
        );
    }

    #[rstest]
    #[case(":NOTES:", Some("NOTES"))]
    #[case("  :LOGBOOK:  ", Some("LOGBOOK"))]
    #[case(":END:", None)]
    #[case(": text", None)]
    #[case(":a b:", None)]
    fn drawer_starts(#[case] line: &str, #[case] expected: Option<&str>) {
        assert_eq!(drawer_start(line), expected);
    }

    #[test]
    fn regions() {
        let start = region_start("  #+begin_SRC python :exports both", 8).expect("region");
        assert_eq!(start.indent, 2);
        assert_eq!(start.kind, "SRC");
        assert_eq!(start.parameters, " python :exports both");
        assert!(is_region_end("   #+END_src  ", "SRC"));
        assert!(!is_region_end("#+END_srcx", "src"));
        assert_eq!(region_start("#+begin_", 8), None);
    }

    #[rstest]
    #[case("[fn:note] body", Some(("note", " body")))]
    #[case("[1] body", Some(("1", " body")))]
    #[case("[fn:] body", None)]
    #[case("[text] body", None)]
    #[case(" [fn:x] body", None)]
    fn footnote_markers(#[case] line: &str, #[case] expected: Option<(&str, &str)>) {
        assert_eq!(footnote_marker(line), expected);
    }

    #[test]
    fn keywords_and_comments() {
        assert_eq!(keyword("#+TITLE: A title "), Some(("TITLE", "A title")));
        assert_eq!(keyword("#+BEGIN_SRC"), None);
        assert!(is_block_attribute_key("ATTR_LATEX"));
        assert!(!is_block_attribute_key("author"));
        assert!(is_comment("# note"));
        assert!(is_comment("#"));
        assert!(!is_comment("#+TITLE: x"));
    }

    #[test]
    fn definition_terms() {
        assert_eq!(definition_term("term :: meaning"), Some(("term", "meaning")));
        assert_eq!(definition_term("term ::"), Some(("term", "")));
        assert_eq!(definition_term("a::b"), None);
    }
}
