//! Markdown rendering pipeline with wiki directives.
//!
//! A document goes through four stages:
//!
//! 1. [`preprocess`]: text rewrites for Zenn syntax (`:::message alert`,
//!    `:::details Title`), sized images (`![a](u =100x50)`), `<ParamField>`
//!    tags and columns/card fences.
//! 2. [`parse`]: container directives (`:::name[label]{attrs}`) are split out
//!    line by line, everything else is parsed by `pulldown-cmark`.
//! 3. [`transform::Pipeline`]: directive handlers attach typed render hints
//!    ([`RenderAs`]), code meta and image sizes become properties, and
//!    standalone links become embed placeholders.
//! 4. HTML rendering and table of contents extraction.
//!
//! [`render`] runs all of them.
//!
//! # Example
//!
//! ```
//! use wiki_markdown::{RenderOptions, render};
//!
//! let markdown = "# Setup\n\n:::code-tabs\n```sh:npm\nnpm i\n```\n```sh:yarn\nyarn add\n```\n:::";
//! let output = render(markdown, &RenderOptions::default()).unwrap();
//!
//! assert!(output.html.contains(r#"<div class="code-tabs""#));
//! assert_eq!(output.toc[0].text, "Setup");
//! assert!(output.warnings.is_empty());
//! ```

mod ast;
mod attrs;
mod chart;
mod embed;
mod error;
mod fence;
pub mod html;
mod parse;
pub mod preprocess;
mod render;
mod toc;
pub mod transform;
mod util;

pub use ast::{Align, Directive, Node, NodeKind, RenderAs};
pub use attrs::Attributes;
pub use chart::{ChartError, ChartPoint, parse_chart_data};
pub use embed::{Embed, EmbedKind, LineRange};
pub use error::{ParseError, RenderError};
pub use parse::{ParseOptions, parse};
pub use preprocess::preprocess;
pub use render::{DEFAULT_DETAILS_SUMMARY, RenderOptions, RenderOutput, render};
pub use toc::{TocNode, build_toc, collect_headings, extract_toc};
pub use util::{escape_html, slugify};
