//! `wiki.toml` loading.
//!
//! The file is looked up in the working directory and then in each parent.
//! Every key has a default, so a missing file or an empty table is fine:
//!
//! ```toml
//! [markdown]
//! gfm = true
//! raw_html = false
//! embeds = true
//! extract_title = false
//! details_summary = "詳細"
//! toc_depth = 3
//! ```
//!
//! Command line flags win over the file; see [`CliSettings`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use wiki_markdown::RenderOptions;

const CONFIG_FILENAME: &str = "wiki.toml";

/// Deepest heading level a table of contents may list.
const MAX_TOC_DEPTH: u8 = 6;

/// Flag values from the command line. `None` keeps the file's value.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub raw_html: Option<bool>,
    pub embeds: Option<bool>,
    pub toc_depth: Option<u8>,
}

/// Contents of `wiki.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub markdown: MarkdownConfig,

    /// File the values came from; `None` when running on defaults.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// `[markdown]` table, mirroring [`RenderOptions`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    pub gfm: bool,
    pub raw_html: bool,
    pub embeds: bool,
    pub extract_title: bool,
    pub details_summary: String,
    pub toc_depth: u8,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        let RenderOptions {
            gfm,
            raw_html,
            embeds,
            extract_title,
            details_summary,
            toc_depth,
        } = RenderOptions::default();
        Self {
            gfm,
            raw_html,
            embeds,
            extract_title,
            details_summary,
            toc_depth,
        }
    }
}

impl MarkdownConfig {
    #[must_use]
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            gfm: self.gfm,
            raw_html: self.raw_html,
            embeds: self.embeds,
            extract_title: self.extract_title,
            details_summary: self.details_summary.clone(),
            toc_depth: self.toc_depth,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An explicitly requested file does not exist.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid TOML in configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is out of range.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Build the effective configuration.
    ///
    /// `explicit` must exist when given. Otherwise `wiki.toml` is searched
    /// upward from the working directory, and defaults apply when none is
    /// found. `overrides` are layered on last and the result is validated.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotFound`] for a missing explicit file; `Io`, `Parse`
    /// or `Validation` when the file or an override is bad.
    pub fn load(
        explicit: Option<&Path>,
        overrides: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) if path.exists() => Some(path.to_path_buf()),
            Some(path) => return Err(ConfigError::NotFound(path.to_path_buf())),
            None => std::env::current_dir()
                .ok()
                .and_then(|cwd| discover_from(&cwd)),
        };

        let mut config = match path {
            Some(path) => Self::read(path)?,
            None => Self::default(),
        };
        if let Some(overrides) = overrides {
            config.apply_cli_settings(overrides);
        }
        config.validate()?;
        Ok(config)
    }

    fn read(path: PathBuf) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(&fs::read_to_string(&path)?)?;
        config.config_path = Some(path);
        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        let markdown = &mut self.markdown;
        markdown.raw_html = settings.raw_html.unwrap_or(markdown.raw_html);
        markdown.embeds = settings.embeds.unwrap_or(markdown.embeds);
        markdown.toc_depth = settings.toc_depth.unwrap_or(markdown.toc_depth);
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Validation`] when `toc_depth` is outside 1-6 or
    /// `details_summary` is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let MarkdownConfig {
            toc_depth,
            details_summary,
            ..
        } = &self.markdown;
        if !(1..=MAX_TOC_DEPTH).contains(toc_depth) {
            return Err(ConfigError::Validation(format!(
                "markdown.toc_depth must be between 1 and {MAX_TOC_DEPTH}, got {toc_depth}"
            )));
        }
        if details_summary.trim().is_empty() {
            return Err(ConfigError::Validation(
                "markdown.details_summary cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Nearest `wiki.toml` at or above `start`.
fn discover_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .find(|candidate| candidate.is_file())
}
