//! Fence meta text → `metastring` property.

use crate::ast::{Node, NodeKind};

use super::Pass;

pub struct CodeMetaPass;

impl Pass for CodeMetaPass {
    fn name(&self) -> &'static str {
        "code-meta"
    }

    fn run(&self, root: &mut Node, _warnings: &mut Vec<String>) {
        root.walk_mut(&mut |node| {
            if let NodeKind::Code {
                meta: Some(meta), ..
            } = &node.kind
            {
                let meta = meta.clone();
                node.properties.set("metastring", meta);
            }
        });
    }
}
