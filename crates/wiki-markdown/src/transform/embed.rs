//! Standalone links → embed placeholders.
//!
//! A paragraph whose only content is one `http(s)` link (give or take
//! whitespace and line breaks) is replaced in place by an embed node.

use tracing::debug;

use crate::ast::{Node, NodeKind};
use crate::embed::Embed;

use super::Pass;

pub struct EmbedPass;

impl Pass for EmbedPass {
    fn name(&self) -> &'static str {
        "embed"
    }

    fn run(&self, root: &mut Node, _warnings: &mut Vec<String>) {
        let mut converted = 0usize;
        convert_children(root, &mut converted);
        debug!(converted, "Converted standalone links to embeds");
    }
}

fn convert_children(node: &mut Node, converted: &mut usize) {
    for child in &mut node.children {
        if let Some(embed) = standalone_embed(child) {
            *child = Node::new(NodeKind::Embed(embed));
            *converted += 1;
        } else {
            convert_children(child, converted);
        }
    }
}

/// The embed for a paragraph made of a single link, if any.
fn standalone_embed(node: &Node) -> Option<Embed> {
    if !node.is_paragraph() || !node.render().is_default() {
        return None;
    }

    let mut links = node
        .children
        .iter()
        .filter(|child| matches!(child.kind, NodeKind::Link { .. }));
    let link = links.next()?;
    if links.next().is_some() {
        return None;
    }

    let only_padding = node.children.iter().all(|child| match &child.kind {
        NodeKind::Link { .. } => true,
        NodeKind::Text(text) => text.trim().is_empty(),
        NodeKind::Break => true,
        _ => false,
    });
    if !only_padding {
        return None;
    }

    let NodeKind::Link { url, .. } = &link.kind else {
        return None;
    };
    Embed::classify(url)
}
