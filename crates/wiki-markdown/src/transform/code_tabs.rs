//! `:::code-tabs`: sibling code blocks as one tabbed group.
//!
//! Each direct child code block becomes a tab. The label comes from a
//! `:Label` meta, a `lang:Label` info string, or a display name for the
//! language.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::ast::{NodeKind, RenderAs};
use crate::attrs::Attributes;
use crate::util::capitalize;

use super::{DirectiveHandler, DirectiveSite, NameMatch, Visit, set_directive_error};

static META_LABEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^:(.+)$").unwrap());

/// One tab of a code-tabs group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CodeTab {
    pub language: String,
    pub label: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
}

impl CodeTab {
    fn from_code(lang: Option<&str>, meta: Option<&str>, code: &str) -> Self {
        let lang = lang.unwrap_or("text");

        if let Some(caps) = meta.and_then(|meta| META_LABEL.captures(meta.trim())) {
            return Self {
                language: lang.to_owned(),
                label: caps[1].trim().to_owned(),
                code: code.to_owned(),
                meta: None,
            };
        }

        let (language, label) = match lang.split_once(':') {
            Some((language, label)) if !label.is_empty() => (language, label.to_owned()),
            Some((language, _)) => (language, display_name(language)),
            None => (lang, display_name(lang)),
        };

        Self {
            language: language.to_owned(),
            label,
            code: code.to_owned(),
            meta: meta.map(ToOwned::to_owned),
        }
    }
}

/// Display name for a language identifier.
fn display_name(lang: &str) -> String {
    let name = match lang.to_ascii_lowercase().as_str() {
        "js" | "javascript" => "JavaScript",
        "ts" | "typescript" => "TypeScript",
        "jsx" => "JSX",
        "tsx" => "TSX",
        "py" | "python" => "Python",
        "rb" | "ruby" => "Ruby",
        "rs" | "rust" => "Rust",
        "go" | "golang" => "Go",
        "kt" | "kotlin" => "Kotlin",
        "cs" | "csharp" => "C#",
        "cpp" | "c++" => "C++",
        "c" => "C",
        "php" => "PHP",
        "sh" | "shell" | "bash" | "zsh" => "Shell",
        "ps1" | "powershell" => "PowerShell",
        "html" => "HTML",
        "css" => "CSS",
        "scss" => "SCSS",
        "json" => "JSON",
        "yml" | "yaml" => "YAML",
        "toml" => "TOML",
        "sql" => "SQL",
        "graphql" | "gql" => "GraphQL",
        "md" | "markdown" => "Markdown",
        "vue" => "Vue",
        "vuejs" => "Vue.js",
        "dockerfile" => "Dockerfile",
        "swift" => "Swift",
        "java" => "Java",
        _ => return capitalize(lang),
    };
    name.to_owned()
}

pub struct CodeTabsHandler;

impl DirectiveHandler for CodeTabsHandler {
    fn names(&self) -> &[NameMatch] {
        &[NameMatch::Exact("code-tabs")]
    }

    fn handle(&self, site: &mut DirectiveSite<'_>, warnings: &mut Vec<String>) -> Visit {
        let node = site.node_mut();

        let tabs: Vec<CodeTab> = node
            .children
            .iter()
            .filter_map(|child| match &child.kind {
                NodeKind::Code { lang, meta, value } => Some(CodeTab::from_code(
                    lang.as_deref(),
                    meta.as_deref(),
                    value,
                )),
                _ => None,
            })
            .collect();

        if tabs.is_empty() {
            set_directive_error(
                node,
                "code-tabs requires at least one code block".to_owned(),
                warnings,
            );
            return Visit::Skip;
        }

        match serde_json::to_string(&tabs) {
            Ok(json) => {
                let mut attributes = Attributes::new();
                attributes.set("class", "code-tabs");
                attributes.set("data-tabs", json);
                node.children.clear();
                node.set_render(RenderAs::element("div", attributes));
            }
            Err(err) => set_directive_error(node, format!("invalid code-tabs: {err}"), warnings),
        }
        Visit::Skip
    }
}
