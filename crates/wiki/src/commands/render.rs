//! `wiki render` command implementation.

use clap::{Args, ValueEnum};

use super::document::DocumentArgs;
use crate::error::CliError;
use crate::output::Output;

/// Output format for `wiki render`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    /// HTML fragment; warnings go to stderr.
    #[default]
    Html,
    /// `{html, title, toc, warnings}` document.
    Json,
}

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    #[command(flatten)]
    document: DocumentArgs,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Html)]
    format: Format,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, reading or parsing fails.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let rendered = self.document.render()?;
        match self.format {
            Format::Html => {
                for warning in &rendered.warnings {
                    output.warning(&format!("warning: {warning}"));
                }
                output.result(&rendered.html)?;
            }
            Format::Json => output.result(&serde_json::to_string_pretty(&rendered)?)?,
        }
        Ok(())
    }
}
