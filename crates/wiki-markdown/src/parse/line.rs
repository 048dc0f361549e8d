//! Line-level recognition of container directive fences and component tags.

use std::sync::LazyLock;

use regex::Regex;

use crate::attrs::{Attributes, unescape_attr_value};
use crate::fence::{MAX_FENCE_INDENT, leading_columns};

/// A line that opens or closes a container directive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum FenceLine<'a> {
    /// `:::name[label]{attrs}`
    Open {
        name: &'a str,
        label: Option<&'a str>,
        attrs: &'a str,
        colons: usize,
    },
    /// A line of three or more colons.
    Close { colons: usize },
}

/// A component tag line such as `<Card title="x">`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum TagLine {
    Open {
        name: String,
        attributes: Attributes,
        self_closing: bool,
    },
    Close {
        name: String,
    },
}

static OPEN_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^<(Columns|Card)((?:\s+(?:[^>"'/]|"[^"]*"|'[^']*')*?)?)\s*(/?)>$"#).unwrap()
});

static CLOSE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^</(Columns|Card)\s*>$").unwrap());

/// Parse a whole line as a directive fence.
///
/// Up to three columns of indentation and trailing whitespace are ignored;
/// a more deeply indented line is code. Text after the attributes is taken
/// as the label when no `[label]` was given.
pub(crate) fn parse_fence_line(line: &str) -> Option<FenceLine<'_>> {
    if leading_columns(line) > MAX_FENCE_INDENT {
        return None;
    }
    let trimmed = line.trim();
    if !trimmed.starts_with(":::") {
        return None;
    }

    let colons = trimmed.chars().take_while(|&c| c == ':').count();
    let rest = &trimmed[colons..];
    if rest.trim().is_empty() {
        return Some(FenceLine::Close { colons });
    }

    let name_end = rest
        .find(|c: char| c == '[' || c == '{' || c.is_whitespace())
        .unwrap_or(rest.len());
    let name = &rest[..name_end];
    if !is_valid_directive_name(name) {
        return None;
    }

    let rest = &rest[name_end..];
    let (label, rest) = match enclosed(rest, '[', ']') {
        Some((label, rest)) => (Some(label), rest),
        None => (None, rest),
    };
    let (attrs, rest) = enclosed(rest, '{', '}').unwrap_or(("", rest));

    let trailing = rest.trim();
    let label = label.or((!trailing.is_empty()).then_some(trailing));

    Some(FenceLine::Open {
        name,
        label,
        attrs,
        colons,
    })
}

/// Parse a whole line as a `Columns`/`Card` component tag.
pub(crate) fn parse_tag_line(line: &str) -> Option<TagLine> {
    if leading_columns(line) > MAX_FENCE_INDENT {
        return None;
    }
    let trimmed = line.trim();
    if !trimmed.starts_with('<') {
        return None;
    }

    if let Some(caps) = CLOSE_TAG.captures(trimmed) {
        return Some(TagLine::Close {
            name: tag_directive_name(&caps[1]).to_owned(),
        });
    }

    let caps = OPEN_TAG.captures(trimmed)?;
    let attributes = Attributes::parse(&caps[2])
        .iter()
        .map(|(key, value)| (key.to_owned(), value.map(unescape_attr_value)))
        .fold(Attributes::new(), |mut attrs, (key, value)| {
            attrs.insert(key, value);
            attrs
        });

    Some(TagLine::Open {
        name: tag_directive_name(&caps[1]).to_owned(),
        attributes,
        self_closing: !caps[3].is_empty(),
    })
}

fn tag_directive_name(tag: &str) -> &'static str {
    if tag == "Columns" { "columns" } else { "card" }
}

/// Valid names contain only alphanumeric characters, hyphens, and underscores.
fn is_valid_directive_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// Split `open ... close` off the front of `s`, honouring nesting.
///
/// Returns the enclosed text and the remainder, or `None` when `s` does not
/// start with `open` or the group is never closed.
fn enclosed(s: &str, open: char, close: char) -> Option<(&str, &str)> {
    if !s.starts_with(open) {
        return None;
    }

    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some((&s[1..i], &s[i + 1..]));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_open_with_label_and_attrs() {
        assert_eq!(
            parse_fence_line(r#":::details[More info]{#x open}"#),
            Some(FenceLine::Open {
                name: "details",
                label: Some("More info"),
                attrs: "#x open",
                colons: 3,
            })
        );
    }

    #[test]
    fn test_open_with_leading_whitespace_and_long_fence() {
        assert_eq!(
            parse_fence_line("  ::::chart-radar{title=\"a\"}  "),
            Some(FenceLine::Open {
                name: "chart-radar",
                label: None,
                attrs: "title=\"a\"",
                colons: 4,
            })
        );
    }

    #[test]
    fn test_trailing_text_is_label() {
        assert_eq!(
            parse_fence_line(":::tab macOS"),
            Some(FenceLine::Open {
                name: "tab",
                label: Some("macOS"),
                attrs: "",
                colons: 3,
            })
        );
    }

    #[test]
    fn test_nested_label_brackets() {
        let Some(FenceLine::Open { label, .. }) = parse_fence_line(":::details[see [1]]") else {
            panic!("expected open fence");
        };
        assert_eq!(label, Some("see [1]"));
    }

    #[test]
    fn test_close() {
        assert_eq!(
            parse_fence_line(":::::  "),
            Some(FenceLine::Close { colons: 5 })
        );
    }

    #[test]
    fn test_not_a_fence() {
        assert_eq!(parse_fence_line("::two colons"), None);
        assert_eq!(parse_fence_line("text ::: text"), None);
        assert_eq!(parse_fence_line(":::bad!name"), None);
    }

    #[test]
    fn test_indented_code_is_not_a_fence() {
        assert_eq!(parse_fence_line("    :::message"), None);
        assert_eq!(parse_fence_line("\t:::"), None);
        assert_eq!(parse_fence_line("   :::"), Some(FenceLine::Close { colons: 3 }));
        assert_eq!(parse_tag_line("    <Card>"), None);
    }

    #[test]
    fn test_open_tag() {
        let Some(TagLine::Open {
            name,
            attributes,
            self_closing,
        }) = parse_tag_line(r#"<Card title="Tom &amp; &quot;J&quot;" href="/a">"#)
        else {
            panic!("expected open tag");
        };
        assert_eq!(name, "card");
        assert_eq!(attributes.get("title"), Some(r#"Tom & "J""#));
        assert_eq!(attributes.get("href"), Some("/a"));
        assert!(!self_closing);
    }

    #[test]
    fn test_self_closing_tag() {
        let Some(TagLine::Open { self_closing, .. }) = parse_tag_line(r#"<Card title="x" />"#)
        else {
            panic!("expected open tag");
        };
        assert!(self_closing);
    }

    #[test]
    fn test_bare_tag_and_gt_in_value() {
        let Some(TagLine::Open { name, attributes, .. }) =
            parse_tag_line(r#"<Columns cols="3" note="a>b">"#)
        else {
            panic!("expected open tag");
        };
        assert_eq!(name, "columns");
        assert_eq!(attributes.get("note"), Some("a>b"));
        assert!(matches!(parse_tag_line("<Columns>"), Some(TagLine::Open { .. })));
    }

    #[test]
    fn test_close_tag() {
        assert_eq!(
            parse_tag_line("</Columns>"),
            Some(TagLine::Close {
                name: "columns".to_owned()
            })
        );
    }

    #[test]
    fn test_other_html_is_not_a_tag_line() {
        assert_eq!(parse_tag_line("<div>"), None);
        assert_eq!(parse_tag_line("<Cards>"), None);
        assert_eq!(parse_tag_line("<Card> trailing"), None);
    }
}
