//! Embed classification for standalone links.
//!
//! A URL is matched against ordered patterns; the first match wins. The
//! resulting [`Embed`] only records what kind of preview to show. Fetching
//! tweets, players, snippets or OGP data is left to the embedding layer.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static TWEET_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:www\.|mobile\.)?(?:twitter|x)\.com/([A-Za-z0-9_]+)/status/(\d+)")
        .unwrap()
});

static YOUTUBE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https?://(?:(?:www\.|m\.)?youtube\.com/watch\?(?:[^#]*&)?v=([\w-]+)|(?:www\.)?youtu\.be/([\w-]+))",
    )
    .unwrap()
});

static GITHUB_BLOB_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://github\.com/([^/]+)/([^/]+)/blob/([^/]+)/([^#?]+)(?:#L(\d+)(?:-L(\d+))?)?")
        .unwrap()
});

/// Preview kind for an embed placeholder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmbedKind {
    Tweet,
    Youtube,
    Github,
    /// Any other web page, resolved to an OGP card.
    GenericCard,
}

impl EmbedKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tweet => "tweet",
            Self::Youtube => "youtube",
            Self::Github => "github",
            Self::GenericCard => "generic-card",
        }
    }
}

impl fmt::Display for EmbedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line range from a GitHub `#L10-L20` anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LineRange {
    pub start: u32,
    pub end: Option<u32>,
}

/// A classified standalone link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Embed {
    pub url: String,
    pub kind: EmbedKind,
}

impl Embed {
    /// Classify an `http://` or `https://` URL.
    ///
    /// Returns `None` for any other scheme.
    ///
    /// # Example
    ///
    /// ```
    /// use wiki_markdown::{Embed, EmbedKind};
    ///
    /// let embed = Embed::classify("https://youtu.be/dQw4w9WgXcQ").unwrap();
    /// assert_eq!(embed.kind, EmbedKind::Youtube);
    /// assert_eq!(embed.youtube_video_id(), Some("dQw4w9WgXcQ"));
    ///
    /// assert!(Embed::classify("mailto:someone@example.com").is_none());
    /// ```
    #[must_use]
    pub fn classify(url: &str) -> Option<Self> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return None;
        }

        let kind = if TWEET_URL.is_match(url) {
            EmbedKind::Tweet
        } else if YOUTUBE_URL.is_match(url) {
            EmbedKind::Youtube
        } else if GITHUB_BLOB_URL.is_match(url) {
            EmbedKind::Github
        } else {
            EmbedKind::GenericCard
        };

        Some(Self {
            url: url.to_owned(),
            kind,
        })
    }

    /// Status id of a tweet URL.
    #[must_use]
    pub fn tweet_id(&self) -> Option<&str> {
        if self.kind != EmbedKind::Tweet {
            return None;
        }
        TWEET_URL
            .captures(&self.url)
            .and_then(|caps| caps.get(2))
            .map(|m| m.as_str())
    }

    /// Video id of a YouTube URL.
    #[must_use]
    pub fn youtube_video_id(&self) -> Option<&str> {
        if self.kind != EmbedKind::Youtube {
            return None;
        }
        let caps = YOUTUBE_URL.captures(&self.url)?;
        caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
    }

    /// Line anchor of a GitHub blob URL.
    #[must_use]
    pub fn github_lines(&self) -> Option<LineRange> {
        if self.kind != EmbedKind::Github {
            return None;
        }
        let caps = GITHUB_BLOB_URL.captures(&self.url)?;
        let start = caps.get(5)?.as_str().parse().ok()?;
        let end = caps.get(6).and_then(|m| m.as_str().parse().ok());
        Some(LineRange { start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(url: &str) -> Option<EmbedKind> {
        Embed::classify(url).map(|e| e.kind)
    }

    #[test]
    fn test_tweet_urls() {
        assert_eq!(
            kind("https://x.com/u/status/1234567890123456789012"),
            Some(EmbedKind::Tweet)
        );
        assert_eq!(
            kind("https://twitter.com/rustlang/status/42"),
            Some(EmbedKind::Tweet)
        );
        let embed = Embed::classify("https://x.com/u/status/99?s=20").unwrap();
        assert_eq!(embed.tweet_id(), Some("99"));
    }

    #[test]
    fn test_tweet_profile_is_generic() {
        assert_eq!(kind("https://x.com/rustlang"), Some(EmbedKind::GenericCard));
    }

    #[test]
    fn test_youtube_urls() {
        assert_eq!(
            kind("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some(EmbedKind::Youtube)
        );
        let embed = Embed::classify("https://youtube.com/watch?feature=share&v=abc-DEF_1").unwrap();
        assert_eq!(embed.kind, EmbedKind::Youtube);
        assert_eq!(embed.youtube_video_id(), Some("abc-DEF_1"));
    }

    #[test]
    fn test_youtube_channel_is_generic() {
        assert_eq!(
            kind("https://www.youtube.com/@rustvideos"),
            Some(EmbedKind::GenericCard)
        );
    }

    #[test]
    fn test_github_blob_with_lines() {
        let embed =
            Embed::classify("https://github.com/rust-lang/rust/blob/master/src/main.rs#L10-L20")
                .unwrap();
        assert_eq!(embed.kind, EmbedKind::Github);
        assert_eq!(
            embed.github_lines(),
            Some(LineRange {
                start: 10,
                end: Some(20)
            })
        );
    }

    #[test]
    fn test_github_blob_without_lines() {
        let embed = Embed::classify("https://github.com/o/r/blob/main/README.md").unwrap();
        assert_eq!(embed.kind, EmbedKind::Github);
        assert_eq!(embed.github_lines(), None);
    }

    #[test]
    fn test_github_repo_is_generic() {
        assert_eq!(
            kind("https://github.com/rust-lang/rust"),
            Some(EmbedKind::GenericCard)
        );
    }

    #[test]
    fn test_non_http_is_rejected() {
        assert_eq!(kind("ftp://example.com/file"), None);
        assert_eq!(kind("/relative/path"), None);
    }

    #[test]
    fn test_kind_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&EmbedKind::GenericCard).unwrap(),
            r#""generic-card""#
        );
    }
}
