//! Markdown syntax tree with typed render hints.
//!
//! The tree is built fresh per render call by [`parse`](crate::parse), rewritten
//! in place by the transform passes and consumed by the HTML renderer.

use crate::attrs::Attributes;
use crate::embed::Embed;

/// Column alignment for table cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    None,
    Left,
    Center,
    Right,
}

/// Container directive data: `:::name[label]{attributes}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directive {
    pub name: String,
    /// Text from the `[label]` part of the opening fence.
    pub label: Option<String>,
    pub attributes: Attributes,
}

impl Directive {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            attributes: Attributes::new(),
        }
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Node kinds produced by the parser and the transform passes.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Root,
    Paragraph,
    Heading {
        depth: u8,
    },
    Text(String),
    InlineCode(String),
    Emphasis,
    Strong,
    Delete,
    Link {
        url: String,
        title: String,
    },
    Image {
        url: String,
        alt: String,
        title: String,
    },
    Break,
    ThematicBreak,
    /// Blockquote, optionally a GFM alert (`> [!NOTE]`).
    Blockquote {
        alert: Option<String>,
    },
    List {
        ordered: bool,
        start: Option<u64>,
    },
    ListItem {
        checked: Option<bool>,
    },
    /// Fenced or indented code block. `meta` is the fence info after the language.
    Code {
        lang: Option<String>,
        meta: Option<String>,
        value: String,
    },
    /// Raw HTML from the source.
    Html(String),
    Table {
        align: Vec<Align>,
    },
    TableRow {
        head: bool,
    },
    TableCell,
    Directive(Directive),
    /// Synthetic container; renders its children only unless a render hint is set.
    Group,
    /// Placeholder left by link-to-embed conversion.
    Embed(Embed),
}

/// How the renderer should emit a node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RenderAs {
    /// Use the renderer's default mapping for the node kind.
    #[default]
    Default,
    /// Emit `tag` with `attributes` in place of the default element.
    Element {
        tag: String,
        attributes: Attributes,
    },
}

impl RenderAs {
    #[must_use]
    pub fn element(tag: impl Into<String>, attributes: Attributes) -> Self {
        Self::Element {
            tag: tag.into(),
            attributes,
        }
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }

    /// Tag name when an element is set.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Default => None,
            Self::Element { tag, .. } => Some(tag),
        }
    }
}

/// A node in the markdown syntax tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Node>,
    /// Element override, written once by the pass that claims the node.
    render: RenderAs,
    /// Extra properties merged into the default element (`metastring`, `width`, ...).
    pub properties: Attributes,
}

impl Node {
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            render: RenderAs::Default,
            properties: Attributes::new(),
        }
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Text(value.into()))
    }

    #[must_use]
    pub fn paragraph(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Paragraph).with_children(children)
    }

    #[must_use]
    pub fn directive(directive: Directive, children: Vec<Node>) -> Self {
        Self::new(NodeKind::Directive(directive)).with_children(children)
    }

    /// Group node rendered as `tag` with `attributes`.
    #[must_use]
    pub fn element(tag: &str, attributes: Attributes, children: Vec<Node>) -> Self {
        let mut node = Self::new(NodeKind::Group).with_children(children);
        node.set_render(RenderAs::element(tag, attributes));
        node
    }

    #[must_use]
    pub fn render(&self) -> &RenderAs {
        &self.render
    }

    /// Attach the render hint.
    ///
    /// A node is claimed by exactly one pass; writing a second hint is a bug
    /// in the pass ordering.
    pub fn set_render(&mut self, render: RenderAs) {
        debug_assert!(
            self.render.is_default(),
            "render hint already set on {:?}",
            self.kind
        );
        self.render = render;
    }

    #[must_use]
    pub fn as_directive(&self) -> Option<&Directive> {
        match &self.kind {
            NodeKind::Directive(directive) => Some(directive),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_directive(&self, name: &str) -> bool {
        self.as_directive().is_some_and(|d| d.name == name)
    }

    #[must_use]
    pub fn is_paragraph(&self) -> bool {
        matches!(self.kind, NodeKind::Paragraph)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Flattened text of this node and its descendants.
    ///
    /// Code values, inline code and image alt text count as text; breaks
    /// become newlines.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text(text) | NodeKind::InlineCode(text) => out.push_str(text),
            NodeKind::Code { value, .. } => out.push_str(value),
            NodeKind::Image { alt, .. } => out.push_str(alt),
            NodeKind::Break => out.push('\n'),
            _ => {
                for child in &self.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Visit this node and every descendant depth-first, parents first.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Node)) {
        visit(self);
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }
}
