//! Markdown AST → render tree.
//!
//! Nodes carrying a render hint become the hinted element with their
//! properties merged in. Everything else uses the default HTML mapping.

use std::collections::HashMap;

use tracing::warn;

use super::HNode;
use crate::ast::{Align, Node, NodeKind, RenderAs};
use crate::attrs::Attributes;
use crate::chart::parse_chart_data;
use crate::embed::Embed;
use crate::util::{capitalize, slugify};

/// Render tree plus what was learned while building it.
#[derive(Debug, Default)]
pub struct RenderedTree {
    pub nodes: Vec<HNode>,
    /// Text of the first h1 when title extraction is enabled.
    pub title: Option<String>,
    /// Anchor id of the heading the title came from.
    pub title_id: Option<String>,
    pub warnings: Vec<String>,
}

/// Converts a transformed markdown tree into [`HNode`]s.
///
/// One renderer handles one document: heading ids are de-duplicated across
/// the whole call.
#[derive(Debug, Default)]
pub struct HtmlRenderer {
    raw_html: bool,
    extract_title: bool,
    id_counts: HashMap<String, usize>,
    out: RenderedTree,
}

impl HtmlRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pass raw HTML from the source through instead of escaping it.
    #[must_use]
    pub fn with_raw_html(mut self, raw_html: bool) -> Self {
        self.raw_html = raw_html;
        self
    }

    /// Report the first h1 as the document title. The heading is still rendered.
    #[must_use]
    pub fn with_title_extraction(mut self, extract_title: bool) -> Self {
        self.extract_title = extract_title;
        self
    }

    #[must_use]
    pub fn render(mut self, root: &Node) -> RenderedTree {
        let mut nodes = Vec::new();
        self.render_node(root, false, &mut nodes);
        self.out.nodes = nodes;
        self.out
    }

    fn render_children(&mut self, node: &Node, in_pre: bool) -> Vec<HNode> {
        let mut out = Vec::new();
        for child in &node.children {
            self.render_node(child, in_pre, &mut out);
        }
        out
    }

    fn render_node(&mut self, node: &Node, in_pre: bool, out: &mut Vec<HNode>) {
        if let RenderAs::Element { tag, attributes } = node.render() {
            let attributes = with_properties(attributes.clone(), &node.properties);
            if attributes.contains("data-chart-type") && attributes.contains("data-chart-data") {
                out.push(self.render_chart(attributes));
            } else {
                let children = self.render_children(node, tag == "pre");
                out.push(HNode::element(tag.as_str(), attributes, children));
            }
            return;
        }

        let element = |tag: &str, children| HNode::element(tag, Attributes::new(), children);

        let rendered = match &node.kind {
            NodeKind::Root | NodeKind::Group => {
                for child in &node.children {
                    self.render_node(child, in_pre, out);
                }
                return;
            }
            NodeKind::Paragraph => element("p", self.render_children(node, false)),
            NodeKind::Heading { depth } => self.render_heading(node, *depth),
            NodeKind::Text(text) => HNode::text(text.as_str()),
            NodeKind::InlineCode(code) => element("code", vec![HNode::text(code.as_str())]),
            NodeKind::Emphasis => element("em", self.render_children(node, false)),
            NodeKind::Strong => element("strong", self.render_children(node, false)),
            NodeKind::Delete => element("del", self.render_children(node, false)),
            NodeKind::Link { url, title } => {
                let mut attributes = Attributes::new();
                attributes.set("href", safe_url(url, false));
                if !title.is_empty() {
                    attributes.set("title", title.as_str());
                }
                HNode::element("a", attributes, self.render_children(node, false))
            }
            NodeKind::Image { url, alt, title } => {
                let mut attributes = Attributes::new();
                attributes.set("src", safe_url(url, true));
                attributes.set("alt", alt.as_str());
                if !title.is_empty() {
                    attributes.set("title", title.as_str());
                }
                HNode::element("img", with_properties(attributes, &node.properties), Vec::new())
            }
            NodeKind::Break => element("br", Vec::new()),
            NodeKind::ThematicBreak => element("hr", Vec::new()),
            NodeKind::Blockquote { alert: None } => {
                element("blockquote", self.render_children(node, false))
            }
            NodeKind::Blockquote { alert: Some(kind) } => self.render_alert(node, kind),
            NodeKind::List { ordered, start } => {
                let mut attributes = Attributes::new();
                if let (true, Some(start)) = (*ordered, start.filter(|n| *n != 1)) {
                    attributes.set("start", start.to_string());
                }
                let tag = if *ordered { "ol" } else { "ul" };
                HNode::element(tag, attributes, self.render_children(node, false))
            }
            NodeKind::ListItem { checked } => {
                let mut children = Vec::new();
                if let Some(checked) = checked {
                    let mut attributes = Attributes::new();
                    attributes.set("type", "checkbox");
                    if *checked {
                        attributes.insert("checked", None);
                    }
                    attributes.insert("disabled", None);
                    children.push(HNode::element("input", attributes, Vec::new()));
                    children.push(HNode::text(" "));
                }
                children.extend(self.render_children(node, false));
                element("li", children)
            }
            NodeKind::Code { lang, value, .. } => {
                let mut attributes = Attributes::new();
                if let Some(lang) = lang {
                    attributes.set("class", format!("language-{lang}"));
                }
                let code = HNode::element(
                    "code",
                    with_properties(attributes, &node.properties),
                    vec![HNode::text(value.as_str())],
                );
                if in_pre {
                    code
                } else {
                    element("pre", vec![code])
                }
            }
            NodeKind::Html(html) if self.raw_html => HNode::Raw(html.clone()),
            NodeKind::Html(html) => HNode::text(html.as_str()),
            NodeKind::Table { align } => self.render_table(node, align),
            NodeKind::TableRow { .. } => element("tr", self.render_children(node, false)),
            NodeKind::TableCell => element("td", self.render_children(node, false)),
            NodeKind::Directive(directive) => {
                let mut attributes = Attributes::new();
                attributes.set(
                    "class",
                    format!("directive directive-{}", directive.name),
                );
                attributes.copy_from(&directive.attributes, "id", "id");
                HNode::element("div", attributes, self.render_children(node, false))
            }
            NodeKind::Embed(embed) => render_embed(embed),
        };
        out.push(rendered);
    }

    fn render_heading(&mut self, node: &Node, depth: u8) -> HNode {
        let children = self.render_children(node, false);
        let text = children
            .iter()
            .map(HNode::text_content)
            .collect::<String>();
        let id = self.unique_id(&text);

        if self.extract_title && depth == 1 && self.out.title.is_none() {
            self.out.title = Some(text.trim().to_owned());
            self.out.title_id = Some(id.clone());
        }

        let mut attributes = Attributes::new();
        attributes.set("id", id);
        HNode::element(format!("h{depth}"), attributes, children)
    }

    /// Slug of `text`, suffixed `-1`, `-2`, ... on repeats.
    fn unique_id(&mut self, text: &str) -> String {
        let mut base = slugify(text);
        if base.is_empty() {
            base = "section".to_owned();
        }
        let count = self.id_counts.entry(base.clone()).or_default();
        let id = match *count {
            0 => base,
            n => format!("{base}-{n}"),
        };
        *count += 1;
        id
    }

    fn render_alert(&mut self, node: &Node, kind: &str) -> HNode {
        let mut attributes = Attributes::new();
        attributes.set("class", format!("alert alert-{kind}"));
        let title = HNode::element(
            "div",
            [("class", "alert-title")].into_iter().collect(),
            vec![HNode::text(capitalize(kind))],
        );
        let content = HNode::element(
            "div",
            [("class", "alert-content")].into_iter().collect(),
            self.render_children(node, false),
        );
        HNode::element("div", attributes, vec![title, content])
    }

    fn render_table(&mut self, node: &Node, align: &[Align]) -> HNode {
        let mut head = Vec::new();
        let mut body = Vec::new();
        for row in &node.children {
            let is_head = matches!(row.kind, NodeKind::TableRow { head: true });
            let mut cells = Vec::new();
            for (index, cell) in row.children.iter().enumerate() {
                let mut attributes = Attributes::new();
                if let Some(style) = align.get(index).and_then(|a| align_style(*a)) {
                    attributes.set("style", style);
                }
                let tag = if is_head { "th" } else { "td" };
                cells.push(HNode::element(tag, attributes, self.render_children(cell, false)));
            }
            let tr = HNode::element("tr", Attributes::new(), cells);
            if is_head {
                head.push(tr);
            } else {
                body.push(tr);
            }
        }

        let mut sections = Vec::new();
        if !head.is_empty() {
            sections.push(HNode::element("thead", Attributes::new(), head));
        }
        if !body.is_empty() {
            sections.push(HNode::element("tbody", Attributes::new(), body));
        }
        HNode::element("table", Attributes::new(), sections)
    }

    /// Chart element with parsed points, or an error box for a bad payload.
    fn render_chart(&mut self, mut attributes: Attributes) -> HNode {
        let payload = attributes.get("data-chart-data").unwrap_or_default();
        let parsed = parse_chart_data(payload)
            .map_err(|err| err.to_string())
            .and_then(|points| serde_json::to_string(&points).map_err(|err| err.to_string()));

        match parsed {
            Ok(points) => {
                attributes.set("data-chart-points", points);
                HNode::element("div", attributes, Vec::new())
            }
            Err(err) => {
                let kind = attributes.get("data-chart-type").unwrap_or_default();
                let message = format!("chart-{kind}: {err}");
                warn!(chart = kind, error = %err, "Invalid chart data");
                self.out.warnings.push(message.clone());

                let mut attributes = Attributes::new();
                attributes.set("class", "chart-error");
                attributes.set("data-error", message.as_str());
                HNode::element("div", attributes, vec![HNode::text(message)])
            }
        }
    }
}

/// Merge `properties` into `attributes`; keys already present win.
fn with_properties(mut attributes: Attributes, properties: &Attributes) -> Attributes {
    for (key, value) in properties.iter() {
        if !attributes.contains(key) {
            attributes.insert(key, value.map(ToOwned::to_owned));
        }
    }
    attributes
}

fn align_style(align: Align) -> Option<&'static str> {
    match align {
        Align::Left => Some("text-align:left"),
        Align::Center => Some("text-align:center"),
        Align::Right => Some("text-align:right"),
        Align::None => None,
    }
}

/// Replace script-capable URLs with `#`. Images may use `data:image/...`.
fn safe_url(url: &str, image: bool) -> &str {
    let scheme: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();

    let blocked = scheme.starts_with("javascript:")
        || scheme.starts_with("vbscript:")
        || (scheme.starts_with("data:") && !(image && scheme.starts_with("data:image/")));
    if blocked { "#" } else { url }
}

fn render_embed(embed: &Embed) -> HNode {
    let mut attributes = Attributes::new();
    attributes.set("class", format!("embed embed-{}", embed.kind));
    attributes.set("data-embed-kind", embed.kind.as_str());
    attributes.set("data-url", embed.url.as_str());
    if let Some(id) = embed.tweet_id() {
        attributes.set("data-tweet-id", id);
    }
    if let Some(id) = embed.youtube_video_id() {
        attributes.set("data-video-id", id);
    }
    if let Some(lines) = embed.github_lines() {
        attributes.set("data-line-start", lines.start.to_string());
        if let Some(end) = lines.end {
            attributes.set("data-line-end", end.to_string());
        }
    }

    let mut link = Attributes::new();
    link.set("href", embed.url.as_str());
    HNode::element(
        "div",
        attributes,
        vec![HNode::element("a", link, vec![HNode::text(embed.url.as_str())])],
    )
}
