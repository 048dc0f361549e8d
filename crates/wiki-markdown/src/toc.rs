//! Table of contents from rendered headings.

use serde::Serialize;

use crate::html::HNode;

/// A heading in the table of contents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TocNode {
    pub text: String,
    pub id: String,
    /// Heading level (1-6).
    pub level: u8,
    pub children: Vec<TocNode>,
}

impl TocNode {
    #[must_use]
    pub fn new(level: u8, text: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            id: id.into(),
            level,
            children: Vec::new(),
        }
    }
}

/// Nest headings by level.
///
/// A heading strictly deeper than the last node at the current depth becomes
/// that node's child; otherwise it becomes a sibling. A skipped level
/// (h1 → h3) still nests one step.
#[must_use]
pub fn build_toc(headings: impl IntoIterator<Item = TocNode>) -> Vec<TocNode> {
    let mut forest = Vec::new();
    for heading in headings {
        insert(&mut forest, heading);
    }
    forest
}

fn insert(nodes: &mut Vec<TocNode>, heading: TocNode) {
    if let Some(last) = nodes.last_mut() {
        if last.level < heading.level {
            insert(&mut last.children, heading);
            return;
        }
    }
    nodes.push(heading);
}

/// Headings `h1` through `h{max_level}` in document order, without nesting.
///
/// Headings without an `id` are skipped.
#[must_use]
pub fn collect_headings(nodes: &[HNode], max_level: u8) -> Vec<TocNode> {
    let mut headings = Vec::new();
    for node in nodes {
        collect(node, max_level, &mut headings);
    }
    headings
}

fn collect(node: &HNode, max_level: u8, out: &mut Vec<TocNode>) {
    let Some(element) = node.as_element() else {
        return;
    };
    if let Some(level) = heading_level(&element.tag).filter(|level| *level <= max_level) {
        if let Some(id) = element.attributes.get("id") {
            out.push(TocNode::new(level, node.text_content().trim(), id));
        }
        return;
    }
    for child in &element.children {
        collect(child, max_level, out);
    }
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag.as_bytes() {
        [b'h', digit @ b'1'..=b'6'] => Some(digit - b'0'),
        _ => None,
    }
}

/// Nested table of contents for `h1` through `h{max_level}`.
#[must_use]
pub fn extract_toc(nodes: &[HNode], max_level: u8) -> Vec<TocNode> {
    build_toc(collect_headings(nodes, max_level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs::Attributes;
    use pretty_assertions::assert_eq;

    fn levels(forest: &[TocNode]) -> Vec<(u8, Vec<(u8, usize)>)> {
        forest
            .iter()
            .map(|node| {
                (
                    node.level,
                    node.children
                        .iter()
                        .map(|child| (child.level, child.children.len()))
                        .collect(),
                )
            })
            .collect()
    }

    fn headings(levels: &[u8]) -> Vec<TocNode> {
        levels
            .iter()
            .enumerate()
            .map(|(i, level)| TocNode::new(*level, format!("H{i}"), format!("h{i}")))
            .collect()
    }

    fn heading(level: u8, text: &str, id: &str) -> HNode {
        let mut attributes = Attributes::new();
        attributes.set("id", id);
        HNode::element(format!("h{level}"), attributes, vec![HNode::text(text)])
    }

    #[test]
    fn test_deeper_heading_nests_under_predecessor() {
        let forest = build_toc(headings(&[1, 2, 2, 3, 1]));
        assert_eq!(
            levels(&forest),
            vec![(1, vec![(2, 0), (2, 1)]), (1, Vec::new())]
        );
        assert_eq!(forest[0].children[1].children[0].text, "H3");
    }

    #[test]
    fn test_starts_below_top_level() {
        let forest = build_toc(headings(&[2, 3, 1]));
        assert_eq!(levels(&forest), vec![(2, vec![(3, 0)]), (1, Vec::new())]);
    }

    #[test]
    fn test_skipped_level_nests_once() {
        let forest = build_toc(headings(&[1, 3, 2]));
        assert_eq!(levels(&forest), vec![(1, vec![(3, 0), (2, 0)])]);
    }

    #[test]
    fn test_empty() {
        assert!(build_toc(Vec::new()).is_empty());
    }

    #[test]
    fn test_extract_from_render_tree() {
        let tree = vec![
            heading(1, "Guide", "guide"),
            HNode::element(
                "div",
                Attributes::new(),
                vec![heading(2, " Setup ", "setup"), heading(4, "Deep", "deep")],
            ),
            HNode::element("p", Attributes::new(), vec![HNode::text("h2")]),
            HNode::element("h3", Attributes::new(), vec![HNode::text("No id")]),
        ];
        assert_eq!(
            extract_toc(&tree, 3),
            vec![TocNode {
                text: "Guide".to_owned(),
                id: "guide".to_owned(),
                level: 1,
                children: vec![TocNode::new(2, "Setup", "setup")],
            }]
        );
    }

    #[test]
    fn test_heading_level() {
        assert_eq!(heading_level("h3"), Some(3));
        assert_eq!(heading_level("h7"), None);
        assert_eq!(heading_level("hr"), None);
        assert_eq!(heading_level("header"), None);
    }
}
