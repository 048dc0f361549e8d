//! HTML render tree and serializer.
//!
//! The renderer first lowers the markdown AST into [`HNode`]s. The table of
//! contents is read from this tree, and [`to_html`] serializes it.

mod render;

pub use self::render::{HtmlRenderer, RenderedTree};

use crate::attrs::Attributes;
use crate::util::escape_html;

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "source", "wbr"];

/// A node in the rendered output.
#[derive(Clone, Debug, PartialEq)]
pub enum HNode {
    Element(Element),
    /// Text, escaped on output.
    Text(String),
    /// Trusted markup, written verbatim.
    Raw(String),
}

/// An HTML element.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attributes: Attributes,
    pub children: Vec<HNode>,
}

impl HNode {
    #[must_use]
    pub fn element(tag: impl Into<String>, attributes: Attributes, children: Vec<HNode>) -> Self {
        Self::Element(Element {
            tag: tag.into(),
            attributes,
            children,
        })
    }

    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Concatenated text of this node and its descendants. Raw markup is skipped.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Raw(_) => {}
            Self::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(&escape_html(text)),
            Self::Raw(html) => out.push_str(html),
            Self::Element(element) => element.write_html(out),
        }
    }
}

impl Element {
    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (key, value) in self.attributes.iter() {
            out.push(' ');
            out.push_str(key);
            if let Some(value) = value {
                out.push_str("=\"");
                out.push_str(&escape_html(value));
                out.push('"');
            }
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            return;
        }
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

/// Serialize a render tree to HTML.
#[must_use]
pub fn to_html(nodes: &[HNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.write_html(&mut out);
    }
    out
}
