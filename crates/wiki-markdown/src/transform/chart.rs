//! `:::chart-<kind>` directives.
//!
//! The directive's text becomes a raw payload in `data-chart-data`; the
//! renderer parses it into points. The kind suffix is passed through as is.

use crate::ast::{Node, NodeKind, RenderAs};
use crate::attrs::Attributes;

use super::{DirectiveHandler, DirectiveSite, NameMatch, Visit};

const CHART_PREFIX: &str = "chart-";

pub struct ChartHandler;

impl DirectiveHandler for ChartHandler {
    fn names(&self) -> &[NameMatch] {
        &[NameMatch::Prefix(CHART_PREFIX)]
    }

    fn handle(&self, site: &mut DirectiveSite<'_>, _warnings: &mut Vec<String>) -> Visit {
        let node = site.node_mut();
        let Some(directive) = node.as_directive() else {
            return Visit::Descend;
        };

        let kind = directive
            .name
            .strip_prefix(CHART_PREFIX)
            .unwrap_or_default()
            .to_owned();

        let mut fragments = Vec::new();
        collect_payload(node, &mut fragments);
        let payload = fragments.join("\n").trim().to_owned();

        let mut attributes = Attributes::new();
        attributes.set("class", "chart");
        attributes.set("data-chart-type", kind);
        attributes.set("data-chart-data", payload);
        for key in ["title", "height", "width"] {
            attributes.copy_from(&directive.attributes, key, &format!("data-{key}"));
        }

        node.children.clear();
        node.set_render(RenderAs::element("div", attributes));
        Visit::Skip
    }
}

/// One fragment per paragraph (or stray text run) under `node`.
fn collect_payload(node: &Node, fragments: &mut Vec<String>) {
    for child in &node.children {
        match child.kind {
            NodeKind::Paragraph | NodeKind::Text(_) => fragments.push(child.text_content()),
            _ => collect_payload(child, fragments),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{ParseOptions, parse};
    use crate::transform::{DirectivePass, Pass};
    use pretty_assertions::assert_eq;

    fn run(source: &str) -> Node {
        let mut root = parse(source, &ParseOptions::default()).unwrap();
        DirectivePass::new()
            .with_handler(ChartHandler)
            .run(&mut root, &mut Vec::new());
        root.children.remove(0)
    }

    fn attr(node: &Node, key: &str) -> Option<String> {
        match node.render() {
            RenderAs::Element { attributes, .. } => attributes.get(key).map(ToOwned::to_owned),
            RenderAs::Default => None,
        }
    }

    #[test]
    fn test_payload_and_kind() {
        let chart = run(":::chart-radar{title=\"Skills\" height=300}\nRust: 80\nGo: 65\n\nTS: 70\n:::");
        assert_eq!(chart.render().tag(), Some("div"));
        assert_eq!(attr(&chart, "class").as_deref(), Some("chart"));
        assert_eq!(attr(&chart, "data-chart-type").as_deref(), Some("radar"));
        assert_eq!(
            attr(&chart, "data-chart-data").as_deref(),
            Some("Rust: 80\nGo: 65\nTS: 70")
        );
        assert_eq!(attr(&chart, "data-title").as_deref(), Some("Skills"));
        assert_eq!(attr(&chart, "data-height").as_deref(), Some("300"));
        assert_eq!(attr(&chart, "data-width"), None);
        assert!(chart.children.is_empty());
    }

    #[test]
    fn test_unknown_kind_passes_through() {
        let chart = run(":::chart-sankey\nA: 1\n:::");
        assert_eq!(attr(&chart, "data-chart-type").as_deref(), Some("sankey"));
    }

    #[test]
    fn test_list_rows_are_collected() {
        let chart = run(":::chart-bar\n- A: 1\n- B: 2\n:::");
        assert_eq!(attr(&chart, "data-chart-data").as_deref(), Some("A: 1\nB: 2"));
    }
}
