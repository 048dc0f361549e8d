//! End-to-end rendering: preprocess → parse → transform → HTML → TOC.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RenderError;
use crate::html::{HtmlRenderer, to_html};
use crate::parse::{ParseOptions, parse};
use crate::preprocess::preprocess;
use crate::toc::{TocNode, build_toc, collect_headings};
use crate::transform::Pipeline;

/// Default summary for `:::details` without a title.
pub const DEFAULT_DETAILS_SUMMARY: &str = "詳細";

/// Rendering options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// GitHub Flavored Markdown: tables, strikethrough, task lists, alerts, autolinks.
    pub gfm: bool,
    /// Pass raw HTML through instead of escaping it.
    pub raw_html: bool,
    /// Turn standalone links into embed placeholders.
    pub embeds: bool,
    /// Report the first h1 as the title and leave it out of the TOC.
    pub extract_title: bool,
    pub details_summary: String,
    /// Deepest heading level listed in the TOC.
    pub toc_depth: u8,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            raw_html: false,
            embeds: true,
            extract_title: false,
            details_summary: DEFAULT_DETAILS_SUMMARY.to_owned(),
            toc_depth: 3,
        }
    }
}

/// Result of [`render`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderOutput {
    pub html: String,
    pub title: Option<String>,
    pub toc: Vec<TocNode>,
    /// Directive validation and chart errors, in document order per stage.
    pub warnings: Vec<String>,
}

/// Render markdown to HTML with a table of contents.
///
/// Directive and chart problems do not fail the call: they render as inline
/// error boxes and are listed in [`RenderOutput::warnings`].
///
/// # Errors
///
/// Returns [`RenderError::Parse`] for unbalanced directive fences or tags.
///
/// # Example
///
/// ```
/// use wiki_markdown::{RenderOptions, render};
///
/// let output = render(
///     "# Intro\n\n:::message\nHello\n:::\n\n## Usage",
///     &RenderOptions::default(),
/// )
/// .unwrap();
///
/// assert!(output.html.contains(r#"<aside class="msg message"><p>Hello</p></aside>"#));
/// assert_eq!(output.toc[0].id, "intro");
/// assert_eq!(output.toc[0].children[0].text, "Usage");
/// ```
pub fn render(markdown: &str, options: &RenderOptions) -> Result<RenderOutput, RenderError> {
    let source = preprocess(markdown);
    let mut root = parse(&source, &ParseOptions { gfm: options.gfm })?;

    let mut warnings = Pipeline::from_options(options).run(&mut root);

    let tree = HtmlRenderer::new()
        .with_raw_html(options.raw_html)
        .with_title_extraction(options.extract_title)
        .render(&root);
    warnings.extend(tree.warnings);

    let mut headings = collect_headings(&tree.nodes, options.toc_depth);
    if let Some(title_id) = &tree.title_id {
        headings.retain(|heading| heading.level != 1 || &heading.id != title_id);
    }
    let toc = build_toc(headings);

    let html = to_html(&tree.nodes);
    debug!(
        bytes = html.len(),
        headings = toc.len(),
        warnings = warnings.len(),
        "Rendered document"
    );

    Ok(RenderOutput {
        html,
        title: tree.title,
        toc,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use pretty_assertions::assert_eq;

    fn render_default(markdown: &str) -> RenderOutput {
        render(markdown, &RenderOptions::default()).unwrap()
    }

    #[test]
    fn test_defaults() {
        let options = RenderOptions::default();
        assert!(options.gfm);
        assert!(!options.raw_html);
        assert!(options.embeds);
        assert!(!options.extract_title);
        assert_eq!(options.details_summary, "詳細");
        assert_eq!(options.toc_depth, 3);
    }

    #[test]
    fn test_title_left_out_of_toc() {
        let options = RenderOptions {
            extract_title: true,
            ..RenderOptions::default()
        };
        let output = render("# Guide\n\n## Setup\n\n## Usage", &options).unwrap();
        assert_eq!(output.title.as_deref(), Some("Guide"));
        assert_eq!(
            output.toc,
            vec![TocNode::new(2, "Setup", "setup"), TocNode::new(2, "Usage", "usage")]
        );
        assert!(output.html.contains(r#"<h1 id="guide">Guide</h1>"#));
    }

    #[test]
    fn test_toc_depth() {
        let output = render_default("## A\n\n### B\n\n#### C");
        assert_eq!(output.toc.len(), 1);
        assert_eq!(output.toc[0].children.len(), 1);
        assert!(output.toc[0].children[0].children.is_empty());

        let deep = render(
            "## A\n\n### B\n\n#### C",
            &RenderOptions {
                toc_depth: 4,
                ..RenderOptions::default()
            },
        )
        .unwrap();
        assert_eq!(deep.toc[0].children[0].children[0].text, "C");
    }

    #[test]
    fn test_headings_inside_directives_listed() {
        let output = render_default(":::details[More]\n## Inside\n:::");
        assert_eq!(output.toc, vec![TocNode::new(2, "Inside", "inside")]);
    }

    #[test]
    fn test_zenn_document() {
        let output = render_default(concat!(
            ":::message alert\nCareful\n:::\n\n",
            ":::details Click\nHidden\n:::\n\n",
            "![shot](/s.png =320x)\n",
        ));
        assert_eq!(
            output.html,
            concat!(
                r#"<aside class="msg alert"><p>Careful</p></aside>"#,
                r#"<details><summary>Click</summary><div class="details-content"><p>Hidden</p></div></details>"#,
                r#"<p><img src="/s.png" alt="shot" width="320"></p>"#,
            )
        );
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_details_title_with_stray_bracket() {
        let output = render_default(":::details a] b\nHidden\n:::\n");
        assert!(output.html.contains("<summary>a] b</summary>"), "{}", output.html);
    }

    #[test]
    fn test_columns_document() {
        let output = render_default(concat!(
            ":::columns{cols=2}\n",
            ":::card{title=\"Docs\" href=\"/docs\"}\nRead the docs\n:::\n",
            ":::card[API]\nReference\n:::\n",
            ":::\n",
        ));
        assert_eq!(
            output.html,
            concat!(
                r#"<div class="columns" data-config="{&quot;cols&quot;:2}" "#,
                r#"data-cards="[{&quot;title&quot;:&quot;Docs&quot;,&quot;href&quot;:&quot;/docs&quot;,&quot;content&quot;:&quot;Read the docs&quot;},"#,
                r#"{&quot;title&quot;:&quot;API&quot;,&quot;content&quot;:&quot;Reference&quot;}]"></div>"#,
            )
        );
    }

    #[test]
    fn test_warnings_collected_across_stages() {
        let output = render_default(concat!(
            ":::card\nalone\n:::\n\n",
            ":::chart-pie\nA: x\n:::\n",
        ));
        assert_eq!(output.warnings.len(), 2);
        assert_eq!(output.warnings[0], "card must be used inside columns");
        assert!(output.warnings[1].starts_with("chart-pie: "));
    }

    #[test]
    fn test_embeds_can_be_disabled() {
        let url = "https://youtu.be/abc123";
        assert!(render_default(url).html.contains("embed-youtube"));

        let options = RenderOptions {
            embeds: false,
            ..RenderOptions::default()
        };
        let output = render(url, &options).unwrap();
        assert_eq!(output.html, format!(r#"<p><a href="{url}">{url}</a></p>"#));
    }

    #[test]
    fn test_unclosed_directive_is_an_error() {
        let err = render(":::tabs\n:::tab\nx\n:::", &RenderOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Parse(ParseError::Unclosed { ref name, line: 1 }) if name == "tabs"
        ));
    }

    #[test]
    fn test_output_serializes() {
        let output = render_default("# A");
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["html"], r#"<h1 id="a">A</h1>"#);
        assert_eq!(json["toc"][0]["level"], 1);
        assert!(json["title"].is_null());
    }
}
