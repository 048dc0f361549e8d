//! `<ParamField>` component tags.
//!
//! `<ParamField header="id" type="string">The id.</ParamField>` becomes
//!
//! ```text
//! :::param-field{header="id" type="string"}
//! The id.
//! :::
//! ```

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::fence::replace_outside_fences;

static PARAM_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<ParamField\b([^>]*?)(?:/>|>(.*?)</ParamField>)").unwrap()
});

static ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([A-Za-z_][\w-]*)="([^"]*)""#).unwrap());

/// Rewrite `<ParamField>` tags into `param-field` directives.
#[must_use]
pub fn normalize(input: &str) -> String {
    replace_outside_fences(input, &PARAM_FIELD, |caps| {
        let mut attrs = String::new();
        for attr in ATTRIBUTE.captures_iter(&caps[1]) {
            if !attrs.is_empty() {
                attrs.push(' ');
            }
            let _ = write!(attrs, r#"{}="{}""#, &attr[1], &attr[2]);
        }

        let body = caps.get(2).map_or("", |m| m.as_str().trim());
        if body.is_empty() {
            format!(":::param-field{{{attrs}}}\n:::")
        } else {
            format!(":::param-field{{{attrs}}}\n{body}\n:::")
        }
    })
}
