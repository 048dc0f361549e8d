//! `columns` and `card` directives.
//!
//! Every card must end up inside exactly one columns block. Cards are
//! collected from the columns node's own children and from card siblings
//! directly after it, then serialized into `data-cards`.

use serde::Serialize;

use crate::ast::{Node, RenderAs};
use crate::attrs::Attributes;

use super::{DirectiveHandler, DirectiveSite, NameMatch, Visit, block_text, set_directive_error};

const DEFAULT_COLS: i64 = 2;
const MAX_COLS: i64 = 4;

/// Card data serialized into `data-cards`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CardData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub content: String,
}

impl CardData {
    fn from_node(node: &Node) -> Self {
        let attr = |key: &str| {
            node.as_directive()
                .and_then(|d| d.attributes.get(key))
                .map(ToOwned::to_owned)
        };
        Self {
            title: attr("title"),
            href: attr("href"),
            icon: attr("icon"),
            content: block_text(node),
        }
    }
}

#[derive(Serialize)]
struct ColumnsConfig {
    cols: i64,
}

/// Whether validation already replaced `node` with an error block.
fn is_rejected(node: &Node) -> bool {
    matches!(
        node.render(),
        RenderAs::Element { attributes, .. } if attributes.get("class") == Some("directive-error")
    )
}

pub struct ColumnsHandler;

impl ColumnsHandler {
    /// Error message for a card that no columns node will collect.
    fn orphan_card_error(site: &DirectiveSite<'_>) -> Option<String> {
        if site.has_ancestor("columns") {
            return None;
        }
        // Recovered by the preceding columns node, unless it was rejected.
        if site
            .previous_sibling()
            .is_some_and(|prev| prev.is_directive("columns") && !is_rejected(prev))
        {
            return None;
        }
        Some("card must be used inside columns".to_owned())
    }

    fn handle_columns(site: &mut DirectiveSite<'_>, warnings: &mut Vec<String>) {
        let raw_cols = site
            .node()
            .as_directive()
            .and_then(|d| d.attributes.get("cols"))
            .map(ToOwned::to_owned);

        let cols = match raw_cols.as_deref() {
            None => DEFAULT_COLS,
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(cols) if (1..=MAX_COLS).contains(&cols) => cols,
                _ => {
                    let message = format!("invalid cols value: {raw} (must be 1-{MAX_COLS})");
                    set_directive_error(site.node_mut(), message, warnings);
                    return;
                }
            },
        };

        let mut cards: Vec<CardData> = site
            .node()
            .children
            .iter()
            .filter(|child| child.is_directive("card"))
            .map(CardData::from_node)
            .collect();

        let recovered = site.take_following_while(|sibling| sibling.is_directive("card"));
        cards.extend(recovered.iter().map(CardData::from_node));

        let node = site.node_mut();
        if cards.is_empty() {
            set_directive_error(node, "no card found in columns".to_owned(), warnings);
            return;
        }

        let encoded = serde_json::to_string(&ColumnsConfig { cols })
            .and_then(|config| Ok((config, serde_json::to_string(&cards)?)));
        match encoded {
            Ok((config_json, cards_json)) => {
                let mut attributes = Attributes::new();
                attributes.set("class", "columns");
                attributes.set("data-config", config_json);
                attributes.set("data-cards", cards_json);
                node.children.clear();
                node.set_render(RenderAs::element("div", attributes));
            }
            Err(err) => set_directive_error(node, format!("invalid columns: {err}"), warnings),
        }
    }
}

impl DirectiveHandler for ColumnsHandler {
    fn names(&self) -> &[NameMatch] {
        &[NameMatch::Exact("columns"), NameMatch::Exact("card")]
    }

    fn handle(&self, site: &mut DirectiveSite<'_>, warnings: &mut Vec<String>) -> Visit {
        if site.node().is_directive("card") {
            if let Some(message) = Self::orphan_card_error(site) {
                set_directive_error(site.node_mut(), message, warnings);
                return Visit::Skip;
            }
            return Visit::Descend;
        }

        Self::handle_columns(site, warnings);
        Visit::Skip
    }
}
