//! Columns/card fences to component tags.
//!
//! `:::columns` and `:::card` fences become `<Columns ...>` and `<Card ...>`
//! tag lines so a card can sit inside columns with the same fence length:
//!
//! ```text
//! :::columns{cols=2}        <Columns cols="2">
//! :::card{title="A"}        <Card title="A">
//! Body                  →   Body
//! :::                       </Card>
//! :::                       </Columns>
//! ```
//!
//! A closing `:::` closes the card before the columns. Other directives
//! opened inside columns or a card keep their own closing fences.

use crate::attrs::Attributes;
use crate::fence::CodeBlockScanner;
use crate::parse::line::{FenceLine, parse_fence_line};

/// Line-by-line converter state.
#[derive(Debug, Default)]
struct ColumnsConverter {
    fence: CodeBlockScanner,
    in_columns: bool,
    in_card: bool,
    /// Open directives that are neither columns nor card.
    foreign_depth: usize,
}

impl ColumnsConverter {
    fn convert_line(&mut self, line: &str) -> Option<String> {
        if self.fence.is_code_line(line) {
            return None;
        }

        let indent = &line[..line.len() - line.trim_start().len()];
        match parse_fence_line(line)? {
            FenceLine::Open {
                name: "columns",
                attrs,
                ..
            } if !self.in_columns && self.foreign_depth == 0 => {
                self.in_columns = true;
                let attrs = Attributes::parse(attrs);
                Some(format!("{indent}<Columns{}>", attrs.to_tag_syntax()))
            }
            FenceLine::Open {
                name: "card",
                label,
                attrs,
                ..
            } if !self.in_card && self.foreign_depth == 0 => {
                self.in_card = true;
                let mut attrs = Attributes::parse(attrs);
                if let (Some(label), false) = (label, attrs.contains("title")) {
                    attrs.set("title", label);
                }
                Some(format!("{indent}<Card{}>", attrs.to_tag_syntax()))
            }
            FenceLine::Open { .. } => {
                if self.in_columns || self.in_card {
                    self.foreign_depth += 1;
                }
                None
            }
            FenceLine::Close { .. } => {
                if self.foreign_depth > 0 {
                    self.foreign_depth -= 1;
                    None
                } else if self.in_card {
                    self.in_card = false;
                    Some(format!("{indent}</Card>"))
                } else if self.in_columns {
                    self.in_columns = false;
                    Some(format!("{indent}</Columns>"))
                } else {
                    None
                }
            }
        }
    }
}

/// Rewrite `:::columns`/`:::card` fences into tag lines.
#[must_use]
pub fn normalize(input: &str) -> String {
    let mut converter = ColumnsConverter::default();
    let mut output = String::with_capacity(input.len());

    for line in input.split_inclusive('\n') {
        let body = line.trim_end_matches(['\n', '\r']);
        match converter.convert_line(body) {
            Some(converted) => {
                output.push_str(&converted);
                output.push_str(&line[body.len()..]);
            }
            None => output.push_str(line),
        }
    }

    output
}
