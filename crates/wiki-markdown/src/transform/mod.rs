//! Tree transform passes.
//!
//! A [`Pipeline`] runs ordered [`Pass`]es over a freshly parsed tree. The
//! [`DirectivePass`] dispatches container directives to registered
//! [`DirectiveHandler`]s in a single traversal: exact names are looked up
//! first, then prefixes.
//!
//! # Example
//!
//! ```
//! use wiki_markdown::transform::{DirectiveHandler, DirectivePass, DirectiveSite, NameMatch, Visit};
//! use wiki_markdown::{Attributes, ParseOptions, RenderAs, parse};
//!
//! struct Kbd;
//!
//! impl DirectiveHandler for Kbd {
//!     fn names(&self) -> &[NameMatch] {
//!         &[NameMatch::Exact("kbd")]
//!     }
//!
//!     fn handle(&self, site: &mut DirectiveSite<'_>, _warnings: &mut Vec<String>) -> Visit {
//!         site.node_mut().set_render(RenderAs::element("kbd", Attributes::new()));
//!         Visit::Descend
//!     }
//! }
//!
//! let mut root = parse(":::kbd\nCtrl\n:::", &ParseOptions::default()).unwrap();
//! let pass = DirectivePass::new().with_handler(Kbd);
//! let mut warnings = Vec::new();
//! wiki_markdown::transform::Pass::run(&pass, &mut root, &mut warnings);
//! assert_eq!(root.children[0].render().tag(), Some("kbd"));
//! ```

mod callout;
mod chart;
mod code_meta;
mod code_tabs;
mod columns;
mod embed;
mod image_size;
mod param_field;
mod tabs;

use tracing::{debug, warn};

use crate::ast::{Node, NodeKind, RenderAs};
use crate::attrs::Attributes;
use crate::render::RenderOptions;

pub use self::callout::{DetailsHandler, MessageHandler};
pub use self::chart::ChartHandler;
pub use self::code_meta::CodeMetaPass;
pub use self::code_tabs::CodeTabsHandler;
pub use self::columns::ColumnsHandler;
pub use self::embed::EmbedPass;
pub use self::image_size::ImageSizePass;
pub use self::param_field::ParamFieldHandler;
pub use self::tabs::TabsHandler;

/// A single-responsibility tree rewrite.
pub trait Pass {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Rewrite the tree in place, appending user-facing problems to `warnings`.
    fn run(&self, root: &mut Node, warnings: &mut Vec<String>);
}

/// Ordered list of passes.
pub struct Pipeline {
    passes: Vec<Box<dyn Pass>>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// Create an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self { passes: Vec::new() }
    }

    /// Append a pass.
    #[must_use]
    pub fn with_pass<P: Pass + 'static>(mut self, pass: P) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// The standard passes with default options.
    #[must_use]
    pub fn standard() -> Self {
        Self::from_options(&RenderOptions::default())
    }

    /// The standard passes: directives, code metadata, image size and
    /// link-to-embed (unless embeds are disabled).
    #[must_use]
    pub fn from_options(options: &RenderOptions) -> Self {
        let directives = DirectivePass::new()
            .with_handler(MessageHandler)
            .with_handler(DetailsHandler::new(&options.details_summary))
            .with_handler(ParamFieldHandler)
            .with_handler(ChartHandler)
            .with_handler(CodeTabsHandler)
            .with_handler(ColumnsHandler)
            .with_handler(TabsHandler);

        let pipeline = Self::new()
            .with_pass(directives)
            .with_pass(CodeMetaPass)
            .with_pass(ImageSizePass);

        if options.embeds {
            pipeline.with_pass(EmbedPass)
        } else {
            pipeline
        }
    }

    /// Names of the passes in run order.
    #[must_use]
    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    /// Run every pass in order and return the collected warnings.
    pub fn run(&self, root: &mut Node) -> Vec<String> {
        let mut warnings = Vec::new();
        for pass in &self.passes {
            let before = warnings.len();
            pass.run(root, &mut warnings);
            debug!(
                pass = pass.name(),
                warnings = warnings.len() - before,
                "Transform pass finished"
            );
        }
        warnings
    }
}

/// How a directive name is matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameMatch {
    Exact(&'static str),
    /// Any name starting with the prefix, e.g. `chart-`.
    Prefix(&'static str),
}

/// Whether the traversal descends into a handled directive's children.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visit {
    Descend,
    /// Children were consumed or replaced by the handler.
    Skip,
}

/// Handler for one or more directive names.
pub trait DirectiveHandler {
    fn names(&self) -> &[NameMatch];

    fn handle(&self, site: &mut DirectiveSite<'_>, warnings: &mut Vec<String>) -> Visit;
}

/// A directive node in its parent's child list.
///
/// Handlers may remove siblings after the node; the traversal re-reads the
/// list length after every visit.
pub struct DirectiveSite<'a> {
    siblings: &'a mut Vec<Node>,
    index: usize,
    ancestors: &'a [String],
}

impl DirectiveSite<'_> {
    #[must_use]
    pub fn node(&self) -> &Node {
        &self.siblings[self.index]
    }

    pub fn node_mut(&mut self) -> &mut Node {
        &mut self.siblings[self.index]
    }

    /// Whether an enclosing directive has this name.
    #[must_use]
    pub fn has_ancestor(&self, name: &str) -> bool {
        self.ancestors.iter().any(|ancestor| ancestor == name)
    }

    #[must_use]
    pub fn previous_sibling(&self) -> Option<&Node> {
        self.index
            .checked_sub(1)
            .and_then(|prev| self.siblings.get(prev))
    }

    /// Remove and return the siblings directly after the node while
    /// `predicate` holds.
    pub fn take_following_while(&mut self, predicate: impl Fn(&Node) -> bool) -> Vec<Node> {
        let mut taken = Vec::new();
        let next = self.index + 1;
        while self.siblings.get(next).is_some_and(&predicate) {
            taken.push(self.siblings.remove(next));
        }
        taken
    }
}

/// Dispatches container directives to their handlers in one traversal.
#[derive(Default)]
pub struct DirectivePass {
    handlers: Vec<Box<dyn DirectiveHandler>>,
}

impl DirectivePass {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler.
    #[must_use]
    pub fn with_handler<H: DirectiveHandler + 'static>(mut self, handler: H) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Find the handler for a directive name: exact matches win over prefixes.
    fn lookup(&self, name: &str) -> Option<&dyn DirectiveHandler> {
        let exact = self.handlers.iter().find(|handler| {
            handler
                .names()
                .iter()
                .any(|m| matches!(m, NameMatch::Exact(exact) if *exact == name))
        });
        exact
            .or_else(|| {
                self.handlers.iter().find(|handler| {
                    handler
                        .names()
                        .iter()
                        .any(|m| matches!(m, NameMatch::Prefix(prefix) if name.starts_with(*prefix)))
                })
            })
            .map(|handler| &**handler)
    }

    fn walk(
        &self,
        children: &mut Vec<Node>,
        ancestors: &mut Vec<String>,
        warnings: &mut Vec<String>,
    ) {
        let mut index = 0;
        while index < children.len() {
            let name = children[index].as_directive().map(|d| d.name.clone());

            let visit = match name.as_deref().and_then(|name| self.lookup(name)) {
                Some(handler) => {
                    let mut site = DirectiveSite {
                        siblings: &mut *children,
                        index,
                        ancestors: ancestors.as_slice(),
                    };
                    handler.handle(&mut site, warnings)
                }
                None => Visit::Descend,
            };

            if visit == Visit::Descend {
                let entered = name.is_some();
                if let Some(name) = name {
                    ancestors.push(name);
                }
                self.walk(&mut children[index].children, ancestors, warnings);
                if entered {
                    ancestors.pop();
                }
            }

            index += 1;
        }
    }
}

impl Pass for DirectivePass {
    fn name(&self) -> &'static str {
        "directives"
    }

    fn run(&self, root: &mut Node, warnings: &mut Vec<String>) {
        let mut ancestors = Vec::new();
        self.walk(&mut root.children, &mut ancestors, warnings);
    }
}

/// Replace a directive's output with the shared error element.
pub(crate) fn set_directive_error(node: &mut Node, message: String, warnings: &mut Vec<String>) {
    let name = node.as_directive().map_or("", |d| d.name.as_str());
    warn!(directive = name, error = %message, "Directive validation failed");

    let mut attributes = Attributes::new();
    attributes.set("class", "directive-error");
    attributes.set("data-error", message.as_str());
    node.set_render(RenderAs::element("div", attributes));
    node.children = vec![Node::text(message.as_str())];
    warnings.push(message);
}

/// Text of a node's block children, one line per block, trimmed.
pub(crate) fn block_text(node: &Node) -> String {
    let mut lines = Vec::new();
    collect_block_text(node, &mut lines);
    lines.join("\n").trim().to_owned()
}

fn collect_block_text(node: &Node, lines: &mut Vec<String>) {
    for child in &node.children {
        match child.kind {
            NodeKind::Paragraph
            | NodeKind::Heading { .. }
            | NodeKind::Code { .. }
            | NodeKind::Text(_) => lines.push(child.text_content()),
            _ => collect_block_text(child, lines),
        }
    }
}
