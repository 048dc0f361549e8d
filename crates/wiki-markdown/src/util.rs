//! Text helpers shared by the renderer and the TOC.

/// Anchor slug for a heading.
///
/// Letters and digits from any script are kept and lowercased. Whitespace,
/// `-` and `_` collapse to one `-` between words; anything else is dropped.
///
/// # Example
///
/// ```
/// use wiki_markdown::slugify;
///
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("はじめに 1"), "はじめに-1");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else if ch.is_whitespace() || matches!(ch, '-' | '_') {
            pending_dash = true;
        }
    }

    slug
}

/// Escape text for HTML content and double-quoted attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut start = 0;

    for (index, ch) in text.char_indices() {
        let entity = match ch {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            '"' => "&quot;",
            '\'' => "&#x27;",
            _ => continue,
        };
        escaped.push_str(&text[start..index]);
        escaped.push_str(entity);
        start = index + ch.len_utf8();
    }

    escaped.push_str(&text[start..]);
    escaped
}

/// Uppercase the first character.
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_ascii() {
        assert_eq!(slugify("Getting Started"), "getting-started");
        assert_eq!(slugify("Why? Because!"), "why-because");
        assert_eq!(slugify("  padded  "), "padded");
        assert_eq!(slugify("a  -  b"), "a-b");
        assert_eq!(slugify("snake_case-and-kebab"), "snake-case-and-kebab");
        assert_eq!(slugify("-leading and trailing_"), "leading-and-trailing");
    }

    #[test]
    fn test_slugify_other_scripts() {
        assert_eq!(slugify("インストール手順"), "インストール手順");
        assert_eq!(slugify("Über Café"), "über-café");
        assert_eq!(slugify("???"), "");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">"#), "&lt;a href=&quot;x&quot;&gt;");
        assert_eq!(escape_html("Tom & Jerry's"), "Tom &amp; Jerry&#x27;s");
        assert_eq!(escape_html("日本語 < 英語"), "日本語 &lt; 英語");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("warning"), "Warning");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("élan"), "Élan");
    }
}
