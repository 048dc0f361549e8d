//! `:::param-field` → `<div data-param-field header=".." body=".." type="..">`.

use crate::ast::RenderAs;
use crate::attrs::Attributes;

use super::{DirectiveHandler, DirectiveSite, NameMatch, Visit};

pub struct ParamFieldHandler;

impl DirectiveHandler for ParamFieldHandler {
    fn names(&self) -> &[NameMatch] {
        &[NameMatch::Exact("param-field")]
    }

    fn handle(&self, site: &mut DirectiveSite<'_>, _warnings: &mut Vec<String>) -> Visit {
        let node = site.node_mut();
        let Some(directive) = node.as_directive() else {
            return Visit::Descend;
        };

        let mut attributes = Attributes::new();
        attributes.insert("data-param-field", None);
        for key in ["header", "body", "type"] {
            attributes.copy_from(&directive.attributes, key, key);
        }
        node.set_render(RenderAs::element("div", attributes));

        Visit::Descend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{ParseOptions, parse};
    use crate::transform::{DirectivePass, Pass};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_attributes_pass_through() {
        let mut root = parse(
            ":::param-field{header=\"X-Token\" type=\"string\" required}\nSent with every request.\n:::",
            &ParseOptions::default(),
        )
        .unwrap();
        DirectivePass::new()
            .with_handler(ParamFieldHandler)
            .run(&mut root, &mut Vec::new());

        let RenderAs::Element { tag, attributes } = root.children[0].render() else {
            panic!("expected element");
        };
        assert_eq!(tag, "div");
        let pairs: Vec<_> = attributes.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("data-param-field", None),
                ("header", Some("X-Token")),
                ("type", Some("string")),
            ]
        );
        assert_eq!(root.children[0].text_content(), "Sent with every request.");
    }
}
