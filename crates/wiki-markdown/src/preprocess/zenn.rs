//! Zenn-style directive shorthand.
//!
//! - `:::message alert` → `:::message{.alert}`
//! - `:::details Title` → `:::details[Title]`
//!
//! Only directive-opening lines are rewritten; fenced code is left alone.

use std::sync::LazyLock;

use regex::Regex;

use crate::fence::replace_outside_fences;

static MESSAGE_ALERT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mR)^([ \t]*:{3,})message[ \t]+alert[ \t]*$").unwrap());

static DETAILS_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mR)^([ \t]*:{3,})details[ \t]+([^\r\n]*?)[ \t]*$").unwrap());

/// Rewrite Zenn shorthand into directive attribute/label syntax.
#[must_use]
pub fn normalize(input: &str) -> String {
    let output = replace_outside_fences(input, &MESSAGE_ALERT, |caps| {
        format!("{}message{{.alert}}", &caps[1])
    });
    replace_outside_fences(&output, &DETAILS_TITLE, |caps| {
        let title = &caps[2];
        if title.is_empty() {
            format!("{}details", &caps[1])
        } else if has_balanced_brackets(title) {
            format!("{}details[{title}]", &caps[1])
        } else {
            // Left as trailing text, which the parser takes as the label.
            caps[0].to_owned()
        }
    })
}

/// Whether every `]` in `text` closes an earlier `[`.
fn has_balanced_brackets(text: &str) -> bool {
    let mut depth = 0usize;
    for ch in text.chars() {
        match ch {
            '[' => depth += 1,
            ']' => match depth.checked_sub(1) {
                Some(next) => depth = next,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}
