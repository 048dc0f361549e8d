//! `:::tabs` / `:::tab` → `<tabs>` / `<tab>` elements.

use crate::ast::RenderAs;
use crate::attrs::Attributes;

use super::{DirectiveHandler, DirectiveSite, NameMatch, Visit};

pub struct TabsHandler;

impl DirectiveHandler for TabsHandler {
    fn names(&self) -> &[NameMatch] {
        &[NameMatch::Exact("tabs"), NameMatch::Exact("tab")]
    }

    fn handle(&self, site: &mut DirectiveSite<'_>, _warnings: &mut Vec<String>) -> Visit {
        let node = site.node_mut();
        let Some(directive) = node.as_directive() else {
            return Visit::Descend;
        };

        let source = &directive.attributes;
        let mut attributes = Attributes::new();
        let tag = if directive.name == "tabs" {
            pass_through(source, &mut attributes, "sync", "sync");
            pass_through(source, &mut attributes, "borderBottom", "border-bottom");
            pass_through(source, &mut attributes, "border-bottom", "border-bottom");
            "tabs"
        } else {
            pass_through(source, &mut attributes, "title", "title");
            if !attributes.contains("title") {
                if let Some(label) = &directive.label {
                    attributes.set("title", label.as_str());
                }
            }
            pass_through(source, &mut attributes, "icon", "icon");
            "tab"
        };

        node.set_render(RenderAs::element(tag, attributes));
        Visit::Descend
    }
}

/// Copy `key` as `target`, keeping bare flags bare.
fn pass_through(source: &Attributes, target_attrs: &mut Attributes, key: &str, target: &str) {
    if source.contains(key) {
        target_attrs.insert(target, source.get(key).map(ToOwned::to_owned));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;
    use crate::parse::{ParseOptions, parse};
    use crate::transform::{DirectivePass, Pass};
    use pretty_assertions::assert_eq;

    fn run(source: &str) -> Node {
        let mut root = parse(source, &ParseOptions::default()).unwrap();
        DirectivePass::new()
            .with_handler(TabsHandler)
            .run(&mut root, &mut Vec::new());
        root.children.remove(0)
    }

    fn pairs(node: &Node) -> Vec<(String, Option<String>)> {
        let RenderAs::Element { attributes, .. } = node.render() else {
            panic!("expected element");
        };
        attributes
            .iter()
            .map(|(k, v)| (k.to_owned(), v.map(ToOwned::to_owned)))
            .collect()
    }

    #[test]
    fn test_tabs_and_tab() {
        let tabs = run(
            "::::tabs{sync=\"os\" borderBottom}\n:::tab{title=\"macOS\" icon=\"apple\"}\nbrew\n:::\n:::tab[Linux]\napt\n:::\n::::",
        );
        assert_eq!(tabs.render().tag(), Some("tabs"));
        assert_eq!(
            pairs(&tabs),
            vec![
                ("sync".to_owned(), Some("os".to_owned())),
                ("border-bottom".to_owned(), None),
            ]
        );

        assert_eq!(tabs.children[0].render().tag(), Some("tab"));
        assert_eq!(
            pairs(&tabs.children[0]),
            vec![
                ("title".to_owned(), Some("macOS".to_owned())),
                ("icon".to_owned(), Some("apple".to_owned())),
            ]
        );
        assert_eq!(
            pairs(&tabs.children[1]),
            vec![("title".to_owned(), Some("Linux".to_owned()))]
        );
        assert_eq!(tabs.children[1].text_content(), "apt");
    }

    #[test]
    fn test_absent_attributes_omitted() {
        let tabs = run(":::tabs\n:::");
        assert_eq!(pairs(&tabs), Vec::new());
    }
}
