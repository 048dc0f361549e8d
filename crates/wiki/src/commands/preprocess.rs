//! `wiki preprocess` command implementation.

use std::path::PathBuf;

use clap::Args;
use wiki_markdown::preprocess;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the preprocess command.
#[derive(Args)]
pub(crate) struct PreprocessArgs {
    /// Markdown file to read (`-` for stdin).
    file: PathBuf,
}

impl PreprocessArgs {
    /// Execute the preprocess command.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let source = super::document::read_source(&self.file)?;
        output.result(&preprocess(&source))?;
        Ok(())
    }
}
