//! `__width__`/`__height__` query parameters → image `width`/`height`.

use crate::ast::{Node, NodeKind};
use crate::preprocess::image_size::{HEIGHT_PARAM, WIDTH_PARAM};

use super::Pass;

pub struct ImageSizePass;

impl Pass for ImageSizePass {
    fn name(&self) -> &'static str {
        "image-size"
    }

    fn run(&self, root: &mut Node, _warnings: &mut Vec<String>) {
        root.walk_mut(&mut |node| {
            let NodeKind::Image { url, .. } = &mut node.kind else {
                return;
            };
            let Some(sized) = SizedUrl::parse(url) else {
                return;
            };
            *url = sized.url;
            if let Some(width) = sized.width {
                node.properties.set("width", width);
            }
            if let Some(height) = sized.height {
                node.properties.set("height", height);
            }
        });
    }
}

/// An image URL with its size parameters lifted out.
#[derive(Debug, PartialEq, Eq)]
struct SizedUrl {
    url: String,
    width: Option<String>,
    height: Option<String>,
}

impl SizedUrl {
    /// Returns `None` when the URL carries neither size parameter.
    ///
    /// Absolute URLs keep their fragment; relative URLs keep only the path
    /// and the remaining query string.
    fn parse(url: &str) -> Option<Self> {
        let (without_fragment, fragment) = match url.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (url, None),
        };
        let (path, query) = without_fragment.split_once('?')?;

        let mut width = None;
        let mut height = None;
        let mut remaining = Vec::new();
        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                WIDTH_PARAM => width = Some(value.to_owned()),
                HEIGHT_PARAM => height = Some(value.to_owned()),
                _ => remaining.push(pair),
            }
        }
        if width.is_none() && height.is_none() {
            return None;
        }

        let mut clean = path.to_owned();
        if !remaining.is_empty() {
            clean.push('?');
            clean.push_str(&remaining.join("&"));
        }
        if let Some(fragment) = fragment.filter(|_| is_absolute(url)) {
            clean.push('#');
            clean.push_str(fragment);
        }

        Some(Self {
            url: clean,
            width: width.filter(|w| !w.is_empty()),
            height: height.filter(|h| !h.is_empty()),
        })
    }
}

/// Whether the URL has a scheme or is protocol-relative.
fn is_absolute(url: &str) -> bool {
    if url.starts_with("//") {
        return true;
    }
    url.split_once(':').is_some_and(|(scheme, _)| {
        scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}
