//! Zenn callouts: `:::message` and `:::details`.

use crate::ast::{Node, NodeKind, RenderAs};
use crate::attrs::Attributes;

use super::{DirectiveHandler, DirectiveSite, NameMatch, Visit};

/// `:::message` → `<aside class="msg message">`, or `msg alert` when the
/// directive carries an alert class or a bare `alert` attribute.
///
/// Code blocks directly inside the callout are wrapped in a `pre` group so
/// they render as `<pre><code>`.
pub struct MessageHandler;

impl DirectiveHandler for MessageHandler {
    fn names(&self) -> &[NameMatch] {
        &[NameMatch::Exact("message")]
    }

    fn handle(&self, site: &mut DirectiveSite<'_>, _warnings: &mut Vec<String>) -> Visit {
        let node = site.node_mut();
        let Some(directive) = node.as_directive() else {
            return Visit::Descend;
        };

        let attrs = &directive.attributes;
        let is_alert = attrs.contains("alert")
            || ["class", "className"]
                .iter()
                .any(|key| attrs.get(key).is_some_and(|value| value.contains("alert")));

        let mut attributes = Attributes::new();
        attributes.copy_from(attrs, "id", "id");
        attributes.set("class", if is_alert { "msg alert" } else { "msg message" });
        node.set_render(RenderAs::element("aside", attributes));

        for child in &mut node.children {
            if matches!(child.kind, NodeKind::Code { .. }) {
                let code = std::mem::replace(child, Node::new(NodeKind::Paragraph));
                child.children.push(code);
                child.set_render(RenderAs::element("pre", Attributes::new()));
            }
        }

        Visit::Descend
    }
}

/// `:::details` → `<details><summary>..</summary><div class="details-content">..</div></details>`.
///
/// The summary is the directive label, else the first text run of a leading
/// paragraph (which is then dropped), else the configured default.
pub struct DetailsHandler {
    default_summary: String,
}

impl DetailsHandler {
    #[must_use]
    pub fn new(default_summary: &str) -> Self {
        Self {
            default_summary: default_summary.to_owned(),
        }
    }
}

impl DirectiveHandler for DetailsHandler {
    fn names(&self) -> &[NameMatch] {
        &[NameMatch::Exact("details")]
    }

    fn handle(&self, site: &mut DirectiveSite<'_>, _warnings: &mut Vec<String>) -> Visit {
        let node = site.node_mut();
        let Some(directive) = node.as_directive() else {
            return Visit::Descend;
        };

        let label = directive
            .label
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(ToOwned::to_owned);
        let mut attributes = Attributes::new();
        attributes.copy_from(&directive.attributes, "id", "id");
        if directive.attributes.contains("open") {
            attributes.insert("open", None);
        }

        let mut content = std::mem::take(&mut node.children);
        let summary = label
            .or_else(|| take_leading_text(&mut content))
            .unwrap_or_else(|| self.default_summary.clone());

        let mut content_attrs = Attributes::new();
        content_attrs.set("class", "details-content");
        node.children = vec![
            Node::element("summary", Attributes::new(), vec![Node::text(summary)]),
            Node::element("div", content_attrs, content),
        ];
        node.set_render(RenderAs::element("details", attributes));

        Visit::Descend
    }
}

/// Remove a leading paragraph whose first child is text and return that text.
fn take_leading_text(content: &mut Vec<Node>) -> Option<String> {
    let first = content.first()?;
    if !first.is_paragraph() {
        return None;
    }
    let text = first
        .children
        .first()
        .and_then(Node::as_text)
        .map(str::trim)
        .filter(|text| !text.is_empty())?
        .to_owned();
    content.remove(0);
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{ParseOptions, parse};
    use crate::transform::{DirectivePass, Pass};
    use pretty_assertions::assert_eq;

    fn run(source: &str) -> Node {
        let mut root = parse(source, &ParseOptions::default()).unwrap();
        let pass = DirectivePass::new()
            .with_handler(MessageHandler)
            .with_handler(DetailsHandler::new("詳細"));
        let mut warnings = Vec::new();
        pass.run(&mut root, &mut warnings);
        assert!(warnings.is_empty());
        root
    }

    fn class_of(node: &Node) -> Option<String> {
        match node.render() {
            RenderAs::Element { attributes, .. } => attributes.get("class").map(ToOwned::to_owned),
            RenderAs::Default => None,
        }
    }

    #[test]
    fn test_message_plain() {
        let root = run(":::message\nX\n:::");
        assert_eq!(root.children[0].render().tag(), Some("aside"));
        assert_eq!(class_of(&root.children[0]).as_deref(), Some("msg message"));
    }

    #[test]
    fn test_message_alert_class() {
        let root = run(":::message{.alert}\nX\n:::");
        assert_eq!(class_of(&root.children[0]).as_deref(), Some("msg alert"));
    }

    #[test]
    fn test_message_alert_attribute() {
        let root = run(":::message{alert}\nX\n:::");
        assert_eq!(class_of(&root.children[0]).as_deref(), Some("msg alert"));
    }

    #[test]
    fn test_message_wraps_code_in_pre() {
        let root = run(":::message\n```sh\nls\n```\n:::");
        let wrapper = &root.children[0].children[0];
        assert_eq!(wrapper.kind, NodeKind::Paragraph);
        assert_eq!(wrapper.render().tag(), Some("pre"));
        assert!(matches!(wrapper.children[0].kind, NodeKind::Code { .. }));
    }

    #[test]
    fn test_details_label_summary() {
        let root = run(":::details[Click me]\nHidden\n:::");
        let details = &root.children[0];
        assert_eq!(details.render().tag(), Some("details"));
        assert_eq!(details.children[0].render().tag(), Some("summary"));
        assert_eq!(details.children[0].text_content(), "Click me");
        assert_eq!(class_of(&details.children[1]).as_deref(), Some("details-content"));
        assert_eq!(details.children[1].text_content(), "Hidden");
    }

    #[test]
    fn test_details_leading_paragraph_summary() {
        let root = run(":::details\nTitle line\n\nBody\n:::");
        let details = &root.children[0];
        assert_eq!(details.children[0].text_content(), "Title line");
        assert_eq!(details.children[1].children.len(), 1);
        assert_eq!(details.children[1].text_content(), "Body");
    }

    #[test]
    fn test_details_default_summary() {
        let root = run(":::details\n- item\n:::");
        let details = &root.children[0];
        assert_eq!(details.children[0].text_content(), "詳細");
        assert_eq!(details.children[1].children.len(), 1);
    }

    #[test]
    fn test_details_non_text_paragraph_keeps_default() {
        let root = run(":::details\n**Bold** start\n:::");
        let details = &root.children[0];
        assert_eq!(details.children[0].text_content(), "詳細");
        assert_eq!(details.children[1].text_content(), "Bold start");
    }
}
