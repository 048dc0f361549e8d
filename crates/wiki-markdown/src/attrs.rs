//! Ordered attribute maps and directive attribute parsing.
//!
//! Parses the `{#id .class key="value" flag}` syntax used by container
//! directives and the `key="value"` pairs of component tags.

use std::fmt::Write;

/// Ordered attribute map with unique keys.
///
/// Values are optional: `{alert}` yields the key `alert` with no value.
/// Inserting an existing key replaces its value in place, so the position of
/// the first appearance is kept.
///
/// # Example
///
/// ```
/// use wiki_markdown::Attributes;
///
/// let attrs = Attributes::parse(r#"#intro .msg .alert title="Hello World" open"#);
/// assert_eq!(attrs.get("id"), Some("intro"));
/// assert_eq!(attrs.get("class"), Some("msg alert"));
/// assert_eq!(attrs.get("title"), Some("Hello World"));
/// assert!(attrs.contains("open"));
/// assert_eq!(attrs.get("open"), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, Option<String>)>);

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse directive attribute syntax (the text between `{` and `}`).
    ///
    /// Supports `#id`, `.class` (joined into a single `class` value),
    /// `key="value"`, `key='value'`, `key=value` and bare `key`.
    /// Unrecognized characters are skipped; parsing never fails.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let mut attrs = Self::new();
        let mut classes: Vec<&str> = Vec::new();
        let mut rest = input.trim();

        while let Some(first) = rest.chars().next() {
            if first.is_whitespace() {
                rest = rest.trim_start();
                continue;
            }

            match first {
                '#' | '.' => {
                    let body = &rest[1..];
                    let end = body
                        .find(|c: char| c.is_whitespace() || c == '.' || c == '#')
                        .unwrap_or(body.len());
                    let value = &body[..end];
                    if !value.is_empty() {
                        if first == '#' {
                            attrs.set("id", value);
                        } else {
                            classes.push(value);
                        }
                    }
                    rest = &body[end..];
                }
                _ => {
                    let end = rest
                        .find(|c: char| c.is_whitespace() || c == '=')
                        .unwrap_or(rest.len());
                    if end == 0 {
                        // Stray `=` without a key
                        rest = &rest[first.len_utf8()..];
                        continue;
                    }
                    let key = &rest[..end];
                    rest = &rest[end..];
                    if let Some(after_eq) = rest.strip_prefix('=') {
                        let (value, remaining) = split_value(after_eq);
                        attrs.set(key, value);
                        rest = remaining;
                    } else {
                        attrs.insert(key, None);
                    }
                }
            }
        }

        if !classes.is_empty() {
            attrs.set("class", classes.join(" "));
        }

        attrs
    }

    /// Get an attribute value. Returns `None` for absent keys and for keys
    /// present without a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Whether the key is present, with or without a value.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    /// Insert or replace an attribute, keeping the position of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        if let Some(slot) = self.0.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.0.push((key, value));
        }
    }

    /// Insert or replace an attribute with a value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.insert(key, Some(value.into()));
    }

    /// Copy `key` from `source` under the name `target` when present.
    pub fn copy_from(&mut self, source: &Self, key: &str, target: &str) {
        if let Some(value) = source.get(key) {
            self.set(target, value);
        }
    }

    /// Remove an attribute and return its value.
    pub fn remove(&mut self, key: &str) -> Option<Option<String>> {
        let pos = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialize as HTML-style tag attributes: ` key="value" flag`.
    ///
    /// Values are re-quoted with `&` and `"` escaped. The output starts with
    /// a space when non-empty so it can follow a tag name directly.
    #[must_use]
    pub fn to_tag_syntax(&self) -> String {
        let mut out = String::new();
        for (key, value) in self.iter() {
            match value {
                Some(value) => {
                    let _ = write!(out, r#" {key}="{}""#, escape_attr_value(value));
                }
                None => {
                    let _ = write!(out, " {key}");
                }
            }
        }
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (key, value) in iter {
            attrs.set(key, value);
        }
        attrs
    }
}

/// Split a value after `=`: quoted with `"` or `'`, or bare until whitespace.
///
/// An unterminated quote takes the rest of the input.
fn split_value(s: &str) -> (&str, &str) {
    for quote in ['"', '\''] {
        if let Some(stripped) = s.strip_prefix(quote) {
            return match stripped.find(quote) {
                Some(end) => (&stripped[..end], &stripped[end + 1..]),
                None => (stripped, ""),
            };
        }
    }

    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    (&s[..end], &s[end..])
}

/// Escape `&` and `"` for a double-quoted attribute value.
#[must_use]
pub(crate) fn escape_attr_value(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

/// Reverse [`escape_attr_value`] plus the common named entities.
#[must_use]
pub(crate) fn unescape_attr_value(value: &str) -> String {
    if !value.contains('&') {
        return value.to_owned();
    }
    value
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty() {
        let attrs = Attributes::parse("");
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_id_and_classes() {
        let attrs = Attributes::parse("#my-id .foo .bar");
        assert_eq!(attrs.get("id"), Some("my-id"));
        assert_eq!(attrs.get("class"), Some("foo bar"));
    }

    #[test]
    fn test_compact_classes() {
        let attrs = Attributes::parse(".foo.bar");
        assert_eq!(attrs.get("class"), Some("foo bar"));
    }

    #[test]
    fn test_quoted_values() {
        let attrs = Attributes::parse(r#"title="Hello World" alt='x y' width=560"#);
        assert_eq!(attrs.get("title"), Some("Hello World"));
        assert_eq!(attrs.get("alt"), Some("x y"));
        assert_eq!(attrs.get("width"), Some("560"));
    }

    #[test]
    fn test_bare_key_has_no_value() {
        let attrs = Attributes::parse(r#"alert title="x""#);
        assert!(attrs.contains("alert"));
        assert_eq!(attrs.get("alert"), None);
        assert_eq!(attrs.get("title"), Some("x"));
    }

    #[test]
    fn test_order_is_preserved() {
        let attrs = Attributes::parse(r#"b="1" a="2" c="3""#);
        let keys: Vec<_> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_repeated_key_keeps_first_position() {
        let attrs = Attributes::parse(r#"a="1" b="2" a="3""#);
        let pairs: Vec<_> = attrs.iter().collect();
        assert_eq!(pairs, vec![("a", Some("3")), ("b", Some("2"))]);
    }

    #[test]
    fn test_unterminated_quote_takes_rest() {
        let attrs = Attributes::parse(r#"title="open ended"#);
        assert_eq!(attrs.get("title"), Some("open ended"));
    }

    #[test]
    fn test_empty_quoted_value() {
        let attrs = Attributes::parse(r#"alt="""#);
        assert_eq!(attrs.get("alt"), Some(""));
    }

    #[test]
    fn test_to_tag_syntax_escapes() {
        let mut attrs = Attributes::new();
        attrs.set("title", r#"Tom & "Jerry""#);
        attrs.insert("open", None);
        assert_eq!(
            attrs.to_tag_syntax(),
            r#" title="Tom &amp; &quot;Jerry&quot;" open"#
        );
    }

    #[test]
    fn test_unescape_round_trip() {
        let raw = r#"a & "b" <c>"#;
        assert_eq!(unescape_attr_value(&escape_attr_value(raw)), raw);
    }

    #[test]
    fn test_remove() {
        let mut attrs = Attributes::parse(r#"a="1" b"#);
        assert_eq!(attrs.remove("a"), Some(Some("1".to_owned())));
        assert_eq!(attrs.remove("b"), Some(None));
        assert_eq!(attrs.remove("c"), None);
        assert!(attrs.is_empty());
    }
}
