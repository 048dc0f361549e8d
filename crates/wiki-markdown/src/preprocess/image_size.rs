//! Sized image syntax.
//!
//! `![alt](url =WIDTHxHEIGHT)` becomes
//! `![alt](url?__width__=WIDTH&__height__=HEIGHT)`. The height is optional.
//! The query parameters are lifted back into `width`/`height` render
//! properties by the image size pass after parsing.

use std::sync::LazyLock;

use regex::Regex;

use crate::fence::replace_outside_fences;

pub(crate) const WIDTH_PARAM: &str = "__width__";
pub(crate) const HEIGHT_PARAM: &str = "__height__";

static SIZED_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[([^\]\n]*)\]\(([^)\s]+)[ \t]+=(\d+)(?:x(\d*))?\)").unwrap()
});

/// Rewrite `=WxH` image suffixes into query parameters.
#[must_use]
pub fn normalize(input: &str) -> String {
    replace_outside_fences(input, &SIZED_IMAGE, |caps| {
        let alt = &caps[1];
        let url = &caps[2];
        let width = &caps[3];
        let height = caps.get(4).map_or("", |m| m.as_str());

        let (base, fragment) = match url.find('#') {
            Some(pos) => url.split_at(pos),
            None => (url, ""),
        };
        let separator = if base.contains('?') { '&' } else { '?' };

        let mut sized = format!("{base}{separator}{WIDTH_PARAM}={width}");
        if !height.is_empty() {
            sized.push_str(&format!("&{HEIGHT_PARAM}={height}"));
        }
        format!("![{alt}]({sized}{fragment})")
    })
}
