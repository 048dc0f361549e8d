//! Wiki CLI - markdown rendering front end.
//!
//! Provides commands for:
//! - `render`: Render a markdown file to HTML or JSON
//! - `toc`: Print the table of contents as JSON
//! - `preprocess`: Print the preprocessed markdown

mod commands;
mod error;
mod output;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{PreprocessArgs, RenderArgs, TocArgs};
use output::Output;

/// Wiki - markdown renderer with directives.
#[derive(Parser)]
#[command(name = "wiki", version, about)]
struct Cli {
    /// Verbose logging (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a markdown file.
    Render(RenderArgs),
    /// Print the table of contents as JSON.
    Toc(TocArgs),
    /// Print the preprocessed markdown.
    Preprocess(PreprocessArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose selects the level, otherwise use RUST_LOG (default WARN)
    let filter = match cli.verbose {
        0 => EnvFilter::from_default_env(),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(&output),
        Commands::Toc(args) => args.execute(&output),
        Commands::Preprocess(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_render_command() {
        let cli = Cli::try_parse_from([
            "wiki", "-vv", "render", "doc.md", "--format", "json", "--no-embeds",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Render(_)));
    }

    #[test]
    fn test_verbose_after_subcommand() {
        let cli = Cli::try_parse_from(["wiki", "toc", "doc.md", "-v"]).unwrap();
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_file_is_required() {
        assert!(Cli::try_parse_from(["wiki", "preprocess"]).is_err());
    }
}
