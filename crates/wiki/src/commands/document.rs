//! Input file and rendering options shared by the commands.

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;
use wiki_config::{CliSettings, Config};
use wiki_markdown::{RenderOptions, RenderOutput, render};

use crate::error::CliError;

/// Markdown input plus configuration overrides.
#[derive(Args)]
pub(crate) struct DocumentArgs {
    /// Markdown file to read (`-` for stdin).
    file: PathBuf,

    /// Path to configuration file (default: auto-discover wiki.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pass raw HTML through instead of escaping it (overrides config).
    #[arg(long)]
    raw_html: bool,

    /// Keep standalone links as plain links (overrides config).
    #[arg(long)]
    no_embeds: bool,

    /// Deepest heading level in the table of contents (overrides config).
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=6))]
    toc_depth: Option<u8>,
}

impl DocumentArgs {
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            raw_html: self.raw_html.then_some(true),
            embeds: self.no_embeds.then_some(false),
            toc_depth: self.toc_depth,
        }
    }

    /// Render options from config and flags.
    pub(crate) fn render_options(&self) -> Result<RenderOptions, CliError> {
        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;
        if let Some(path) = &config.config_path {
            info!(path = %path.display(), "Loaded configuration");
        }
        Ok(config.markdown.render_options())
    }

    /// Read the markdown source.
    pub(crate) fn read_source(&self) -> Result<String, CliError> {
        read_source(&self.file)
    }

    /// Read, configure and render the document.
    pub(crate) fn render(&self) -> Result<RenderOutput, CliError> {
        let options = self.render_options()?;
        let source = self.read_source()?;
        Ok(render(&source, &options)?)
    }
}

pub(super) fn read_source(path: &Path) -> Result<String, CliError> {
    if path == Path::new("-") {
        return Ok(std::io::read_to_string(std::io::stdin())?);
    }
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        document: DocumentArgs,
    }

    fn parse(args: &[&str]) -> DocumentArgs {
        TestCli::try_parse_from(std::iter::once("test").chain(args.iter().copied()))
            .unwrap()
            .document
    }

    #[test]
    fn test_flags_become_overrides() {
        let settings = parse(&["doc.md", "--raw-html", "--no-embeds", "--toc-depth", "2"])
            .cli_settings();
        assert_eq!(settings.raw_html, Some(true));
        assert_eq!(settings.embeds, Some(false));
        assert_eq!(settings.toc_depth, Some(2));
    }

    #[test]
    fn test_absent_flags_do_not_override() {
        let settings = parse(&["doc.md"]).cli_settings();
        assert_eq!(settings.raw_html, None);
        assert_eq!(settings.embeds, None);
        assert_eq!(settings.toc_depth, None);
    }

    #[test]
    fn test_toc_depth_range_checked() {
        assert!(TestCli::try_parse_from(["test", "doc.md", "--toc-depth", "7"]).is_err());
    }

    #[test]
    fn test_render_with_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("wiki.toml");
        let doc = dir.path().join("doc.md");
        std::fs::write(&config, "[markdown]\nextract_title = true\n").unwrap();
        std::fs::write(&doc, "# Title\n\n## Part").unwrap();

        let args = parse(&[
            doc.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ]);
        let output = args.render().unwrap();
        assert_eq!(output.title.as_deref(), Some("Title"));
        assert_eq!(output.toc.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.md");
        let err = read_source(&missing).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
        assert!(err.to_string().starts_with("Failed to read "));
    }
}
