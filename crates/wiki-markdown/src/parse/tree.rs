//! pulldown-cmark events to syntax tree nodes.

use std::collections::HashMap;
use std::sync::LazyLock;

use pulldown_cmark::{
    Alignment, BlockQuoteKind, BrokenLink, CodeBlockKind, CowStr, Event, Options, Parser, Tag,
    TagEnd,
};
use regex::Regex;

use crate::ast::{Align, Node, NodeKind};

use super::block::placeholder_index;

static URL_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s<>]+").unwrap());

const TRAILING_PUNCTUATION: [char; 11] = ['.', ',', ':', ';', '!', '?', '"', '\'', '*', '_', '~'];

/// Link reference definitions from every markdown segment of a document.
///
/// pulldown-cmark only sees one segment at a time; references it cannot
/// resolve locally are looked up here.
#[derive(Debug, Default)]
pub(crate) struct LinkReferences {
    by_label: HashMap<String, (String, String)>,
}

impl LinkReferences {
    /// Gather definitions; the first definition of a label wins.
    pub(crate) fn collect<'a>(
        segments: impl IntoIterator<Item = &'a str>,
        options: Options,
    ) -> Self {
        let mut references = Self::default();
        for text in segments {
            let parser = Parser::new_ext(text, options);
            for (label, definition) in parser.reference_definitions().iter() {
                references
                    .by_label
                    .entry(normalize_label(label))
                    .or_insert_with(|| {
                        (
                            definition.dest.to_string(),
                            definition.title.as_deref().unwrap_or_default().to_owned(),
                        )
                    });
            }
        }
        references
    }

    fn resolve<'a>(&self, label: &str) -> Option<(CowStr<'a>, CowStr<'a>)> {
        self.by_label
            .get(&normalize_label(label))
            .map(|(url, title)| (url.clone().into(), title.clone().into()))
    }
}

/// Case-insensitive label with inner whitespace collapsed.
fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Builds nodes from a pulldown-cmark event stream.
struct TreeBuilder {
    /// Open nodes; the first entry collects the finished top-level nodes.
    stack: Vec<Node>,
    /// Directive nodes waiting for their placeholder.
    nested: Vec<Option<Node>>,
}

impl TreeBuilder {
    fn new(nested: Vec<Node>) -> Self {
        Self {
            stack: vec![Node::new(NodeKind::Group)],
            nested: nested.into_iter().map(Some).collect(),
        }
    }

    fn take_nested(&mut self, html: &str) -> Option<Node> {
        let index = placeholder_index(html)?;
        self.nested.get_mut(index)?.take()
    }

    fn top(&mut self) -> &mut Node {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    /// Append to the innermost open node, merging adjacent text and HTML runs.
    fn push_child(&mut self, node: Node) {
        let parent = self.top();
        if let Some(last) = parent.children.last_mut() {
            match (&mut last.kind, &node.kind) {
                (NodeKind::Text(prev), NodeKind::Text(next))
                | (NodeKind::Html(prev), NodeKind::Html(next)) => {
                    prev.push_str(next);
                    return;
                }
                _ => {}
            }
        }
        parent.children.push(node);
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                self.push_child(Node::new(NodeKind::InlineCode(code.into_string())));
            }
            Event::Html(html) | Event::InlineHtml(html) => match self.take_nested(&html) {
                Some(directive) => self.push_child(directive),
                None => self.push_child(Node::new(NodeKind::Html(html.into_string()))),
            },
            Event::SoftBreak => self.text("\n"),
            Event::HardBreak => self.push_child(Node::new(NodeKind::Break)),
            Event::Rule => self.push_child(Node::new(NodeKind::ThematicBreak)),
            Event::TaskListMarker(checked) => self.task_list_marker(checked),
            Event::InlineMath(text) | Event::DisplayMath(text) => self.text(&text),
            Event::FootnoteReference(label) => self.text(&format!("[^{label}]")),
        }
    }

    fn text(&mut self, text: &str) {
        if let NodeKind::Code { value, .. } = &mut self.top().kind {
            value.push_str(text);
        } else {
            self.push_child(Node::text(text));
        }
    }

    fn task_list_marker(&mut self, checked: bool) {
        if let Some(item) = self
            .stack
            .iter_mut()
            .rev()
            .find(|node| matches!(node.kind, NodeKind::ListItem { .. }))
        {
            item.kind = NodeKind::ListItem {
                checked: Some(checked),
            };
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        let kind = match tag {
            Tag::Paragraph => NodeKind::Paragraph,
            Tag::Heading { level, .. } => NodeKind::Heading {
                depth: level as u8,
            },
            Tag::BlockQuote(kind) => NodeKind::Blockquote {
                alert: kind.map(|kind| alert_name(kind).to_owned()),
            },
            Tag::CodeBlock(kind) => {
                let (lang, meta) = match kind {
                    CodeBlockKind::Fenced(info) => split_info(&info),
                    CodeBlockKind::Indented => (None, None),
                };
                NodeKind::Code {
                    lang,
                    meta,
                    value: String::new(),
                }
            }
            Tag::List(start) => NodeKind::List {
                ordered: start.is_some(),
                start,
            },
            Tag::Item => NodeKind::ListItem { checked: None },
            Tag::Table(alignments) => NodeKind::Table {
                align: alignments.into_iter().map(convert_alignment).collect(),
            },
            Tag::TableHead => NodeKind::TableRow { head: true },
            Tag::TableRow => NodeKind::TableRow { head: false },
            Tag::TableCell => NodeKind::TableCell,
            Tag::Emphasis => NodeKind::Emphasis,
            Tag::Strong => NodeKind::Strong,
            Tag::Strikethrough => NodeKind::Delete,
            Tag::Link {
                dest_url, title, ..
            } => NodeKind::Link {
                url: dest_url.into_string(),
                title: title.into_string(),
            },
            Tag::Image {
                dest_url, title, ..
            } => NodeKind::Image {
                url: dest_url.into_string(),
                alt: String::new(),
                title: title.into_string(),
            },
            Tag::HtmlBlock
            | Tag::FootnoteDefinition(_)
            | Tag::MetadataBlock(_)
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition
            | Tag::Superscript
            | Tag::Subscript => NodeKind::Group,
        };
        self.stack.push(Node::new(kind));
    }

    fn end_tag(&mut self, _tag: TagEnd) {
        if self.stack.len() < 2 {
            return;
        }
        let Some(mut node) = self.stack.pop() else {
            return;
        };

        match &mut node.kind {
            NodeKind::Image { alt, .. } => {
                *alt = node.children.iter().map(Node::text_content).collect();
                node.children.clear();
            }
            NodeKind::Code { value, .. } => {
                if value.ends_with('\n') {
                    value.pop();
                }
            }
            _ => {}
        }

        // Unwrap structural groups (html blocks, definition lists) so their
        // content joins the parent directly.
        if node.kind == NodeKind::Group {
            for child in node.children {
                self.push_child(child);
            }
        } else {
            self.push_child(node);
        }
    }

    fn finish(mut self) -> Vec<Node> {
        while self.stack.len() > 1 {
            self.end_tag(TagEnd::Paragraph);
        }
        let mut nodes = self.stack.pop().map(|root| root.children).unwrap_or_default();
        // A placeholder the parser did not surface as HTML.
        nodes.extend(self.nested.into_iter().flatten());
        nodes
    }
}

fn alert_name(kind: BlockQuoteKind) -> &'static str {
    match kind {
        BlockQuoteKind::Note => "note",
        BlockQuoteKind::Tip => "tip",
        BlockQuoteKind::Important => "important",
        BlockQuoteKind::Warning => "warning",
        BlockQuoteKind::Caution => "caution",
    }
}

fn convert_alignment(alignment: Alignment) -> Align {
    match alignment {
        Alignment::None => Align::None,
        Alignment::Left => Align::Left,
        Alignment::Center => Align::Center,
        Alignment::Right => Align::Right,
    }
}

/// Split fence info into language and meta at the first whitespace.
fn split_info(info: &str) -> (Option<String>, Option<String>) {
    let info = info.trim();
    if info.is_empty() {
        return (None, None);
    }
    match info.split_once(char::is_whitespace) {
        Some((lang, meta)) => {
            let meta = meta.trim();
            (
                Some(lang.to_owned()),
                (!meta.is_empty()).then(|| meta.to_owned()),
            )
        }
        None => (Some(info.to_owned()), None),
    }
}

/// Parse one markdown segment into block nodes.
///
/// `nested` holds the directive nodes for the segment's placeholders.
pub(crate) fn parse_markdown(
    text: &str,
    options: Options,
    references: &LinkReferences,
    nested: Vec<Node>,
) -> Vec<Node> {
    let mut builder = TreeBuilder::new(nested);
    let resolve = |link: BrokenLink<'_>| references.resolve(&link.reference);
    for event in Parser::new_with_broken_link_callback(text, options, Some(resolve)) {
        builder.event(event);
    }
    builder.finish()
}

/// Turn bare `http(s)://` URLs in text into links.
///
/// Text inside links, images, code and raw HTML is left alone. Trailing
/// punctuation and unbalanced closing parentheses are not part of the URL.
pub(crate) fn autolink_literals(node: &mut Node) {
    if matches!(
        node.kind,
        NodeKind::Link { .. } | NodeKind::Image { .. } | NodeKind::Code { .. }
    ) {
        return;
    }

    let children = std::mem::take(&mut node.children);
    for mut child in children {
        match &child.kind {
            NodeKind::Text(text) if URL_LITERAL.is_match(text) => {
                node.children.extend(split_urls(text));
            }
            _ => {
                autolink_literals(&mut child);
                node.children.push(child);
            }
        }
    }
}

fn split_urls(text: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut last = 0;

    for found in URL_LITERAL.find_iter(text) {
        let url = trim_url(found.as_str());
        let end = found.start() + url.len();
        if found.start() > last {
            nodes.push(Node::text(&text[last..found.start()]));
        }
        let link = Node::new(NodeKind::Link {
            url: url.to_owned(),
            title: String::new(),
        })
        .with_children(vec![Node::text(url)]);
        nodes.push(link);
        last = end;
    }

    if last < text.len() {
        nodes.push(Node::text(&text[last..]));
    }
    nodes
}

fn trim_url(url: &str) -> &str {
    let mut url = url;
    loop {
        let trimmed = url.trim_end_matches(TRAILING_PUNCTUATION);
        let unbalanced = trimmed.matches('(').count() < trimmed.matches(')').count();
        let trimmed = match trimmed.strip_suffix(')') {
            Some(stripped) if unbalanced => stripped,
            _ => trimmed,
        };
        if trimmed.len() == url.len() {
            return url;
        }
        url = trimmed;
    }
}
