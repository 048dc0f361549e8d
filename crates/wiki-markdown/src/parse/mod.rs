//! Markdown to syntax tree.
//!
//! Container directives and component tags are split out line by line first;
//! each remaining markdown segment goes through pulldown-cmark. Link
//! reference definitions are gathered from every segment up front so a
//! reference resolves anywhere in the document.

mod block;
pub(crate) mod line;
mod tree;

use pulldown_cmark::Options;

use crate::ast::{Node, NodeKind};
use crate::error::ParseError;

use self::block::{Block, markdown_segments, split_blocks};
use self::tree::LinkReferences;

/// Parser settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Enable GFM: tables, strikethrough, task lists, alerts and URL literals.
    pub gfm: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { gfm: true }
    }
}

impl ParseOptions {
    /// pulldown-cmark options for these settings.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }
}

/// Parse preprocessed markdown into a tree rooted at a [`NodeKind::Root`] node.
///
/// # Errors
///
/// Returns [`ParseError`] for unbalanced directive fences or tags.
///
/// # Example
///
/// ```
/// use wiki_markdown::{NodeKind, ParseOptions, parse};
///
/// let root = parse(":::message{.alert}\nCareful\n:::", &ParseOptions::default()).unwrap();
/// let directive = root.children[0].as_directive().unwrap();
/// assert_eq!(directive.name, "message");
/// assert_eq!(directive.attributes.get("class"), Some("alert"));
/// assert_eq!(root.children[0].children[0].kind, NodeKind::Paragraph);
///
/// assert!(parse(":::message\nno end", &ParseOptions::default()).is_err());
/// ```
pub fn parse(source: &str, options: &ParseOptions) -> Result<Node, ParseError> {
    let blocks = split_blocks(source)?;
    let parser_options = options.parser_options();
    let references = LinkReferences::collect(markdown_segments(&blocks), parser_options);

    let mut root = Node::new(NodeKind::Root)
        .with_children(build_nodes(blocks, parser_options, &references));
    if options.gfm {
        tree::autolink_literals(&mut root);
    }
    Ok(root)
}

fn build_nodes(blocks: Vec<Block>, options: Options, references: &LinkReferences) -> Vec<Node> {
    let mut nodes = Vec::new();
    for block in blocks {
        match block {
            Block::Markdown { text, nested } => {
                let nested = build_nodes(nested, options, references);
                nodes.extend(tree::parse_markdown(&text, options, references, nested));
            }
            Block::Directive {
                directive,
                children,
            } => nodes.push(Node::directive(
                directive,
                build_nodes(children, options, references),
            )),
        }
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nested_directives() {
        let root = parse(
            "Intro\n\n::::tabs{sync}\n:::tab{title=\"A\"}\n- one\n:::\n::::\n",
            &ParseOptions::default(),
        )
        .unwrap();
        assert_eq!(root.children.len(), 2);
        let tabs = &root.children[1];
        assert!(tabs.is_directive("tabs"));
        assert!(tabs.children[0].is_directive("tab"));
        assert!(matches!(
            tabs.children[0].children[0].kind,
            NodeKind::List { ordered: false, .. }
        ));
    }

    #[test]
    fn test_bare_url_becomes_link() {
        let root = parse("https://x.com/u/status/1", &ParseOptions::default()).unwrap();
        let para = &root.children[0];
        assert_eq!(para.children.len(), 1);
        assert!(matches!(para.children[0].kind, NodeKind::Link { .. }));
    }

    #[test]
    fn test_gfm_disabled() {
        let options = ParseOptions { gfm: false };
        let root = parse("https://example.com ~~x~~", &options).unwrap();
        let para = &root.children[0];
        assert_eq!(para.children, vec![Node::text("https://example.com ~~x~~")]);
    }

    #[test]
    fn test_parser_options() {
        let options = ParseOptions::default().parser_options();
        assert!(options.contains(Options::ENABLE_TABLES));
        assert!(options.contains(Options::ENABLE_GFM));
        assert!(ParseOptions { gfm: false }.parser_options().is_empty());
    }

    #[test]
    fn test_reference_defined_outside_directive() {
        let root = parse(
            ":::message\nSee [docs][d].\n:::\n\n[d]: https://example.com \"Docs\"\n",
            &ParseOptions::default(),
        )
        .unwrap();
        let para = &root.children[0].children[0];
        assert_eq!(para.children[0].as_text(), Some("See "));
        assert_eq!(
            para.children[1].kind,
            NodeKind::Link {
                url: "https://example.com".to_owned(),
                title: "Docs".to_owned(),
            }
        );
        assert_eq!(para.children[1].text_content(), "docs");
    }

    #[test]
    fn test_reference_defined_inside_directive() {
        let root = parse(
            "Read [the guide].\n\n:::details\n[The  Guide]: /guide\n:::\n",
            &ParseOptions::default(),
        )
        .unwrap();
        assert!(matches!(
            &root.children[0].children[1].kind,
            NodeKind::Link { url, .. } if url == "/guide"
        ));
    }

    #[test]
    fn test_segment_definition_shadows_document_definition() {
        let root = parse(
            "[a]\n\n[a]: /first\n\n:::message\n[a]: /second\n\n[a]\n:::\n",
            &ParseOptions::default(),
        )
        .unwrap();
        let inner = &root.children[1].children[0].children[0];
        assert!(matches!(&inner.kind, NodeKind::Link { url, .. } if url == "/second"));
        let outer = &root.children[0].children[0];
        assert!(matches!(&outer.kind, NodeKind::Link { url, .. } if url == "/first"));
    }

    #[test]
    fn test_unknown_reference_stays_text() {
        let root = parse(":::message\n[x][missing]\n:::\n", &ParseOptions::default()).unwrap();
        assert_eq!(root.children[0].text_content(), "[x][missing]");
    }

    #[test]
    fn test_directive_inside_list_item() {
        let root = parse(
            "1. step one\n   :::message\n   note\n   :::\n2. step two\n",
            &ParseOptions::default(),
        )
        .unwrap();
        assert_eq!(root.children.len(), 1);
        let list = &root.children[0];
        assert!(matches!(list.kind, NodeKind::List { ordered: true, .. }));
        assert_eq!(list.children.len(), 2);
        let first = &list.children[0];
        assert!(first.children.iter().any(|child| child.is_directive("message")));
        assert_eq!(list.children[1].text_content(), "step two");
    }

    #[test]
    fn test_indented_directive_syntax_is_code() {
        let root = parse("    :::message\n    indented code\n", &ParseOptions::default()).unwrap();
        assert_eq!(
            root.children[0].kind,
            NodeKind::Code {
                lang: None,
                meta: None,
                value: ":::message\nindented code".to_owned(),
            }
        );
    }

    #[test]
    fn test_error_propagates() {
        assert_eq!(
            parse("<Card>\n", &ParseOptions::default()),
            Err(ParseError::Unclosed {
                name: "card".to_owned(),
                line: 1
            })
        );
    }
}
