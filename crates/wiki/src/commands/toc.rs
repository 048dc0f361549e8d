//! `wiki toc` command implementation.

use clap::Args;

use super::document::DocumentArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the toc command.
#[derive(Args)]
pub(crate) struct TocArgs {
    #[command(flatten)]
    document: DocumentArgs,
}

impl TocArgs {
    /// Execute the toc command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, reading or parsing fails.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let rendered = self.document.render()?;
        output.result(&serde_json::to_string_pretty(&rendered.toc)?)?;
        Ok(())
    }
}
