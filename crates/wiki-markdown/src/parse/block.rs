//! Directive block splitting.
//!
//! Splits the source into markdown segments and container directives before
//! any inline parsing happens. Lines inside fenced code blocks are always
//! markdown content.
//!
//! A directive indented into a list item stays inside the list: its place in
//! the segment is marked by an HTML comment placeholder that the tree
//! builder swaps for the directive node.

use crate::ast::Directive;
use crate::attrs::Attributes;
use crate::error::ParseError;
use crate::fence::{CodeBlockScanner, MAX_FENCE_INDENT, leading_columns, strip_columns};

use super::line::{FenceLine, TagLine, parse_fence_line, parse_tag_line};

const PLACEHOLDER_PREFIX: &str = "<!--wiki-directive:";
const PLACEHOLDER_SUFFIX: &str = "-->";

/// A top-level piece of the document.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Block {
    /// Plain markdown handed to the inline parser as one unit.
    Markdown {
        text: String,
        /// Directives inside list items, indexed by their placeholders.
        nested: Vec<Block>,
    },
    Directive {
        directive: Directive,
        children: Vec<Block>,
    },
}

impl Block {
    #[cfg(test)]
    fn markdown(text: &str) -> Self {
        Self::Markdown {
            text: text.to_owned(),
            nested: Vec::new(),
        }
    }
}

/// Placeholder line content for the `index`th nested directive of a segment.
fn placeholder(index: usize) -> String {
    format!("{PLACEHOLDER_PREFIX}{index}{PLACEHOLDER_SUFFIX}")
}

/// Index of the nested directive an HTML block stands for.
pub(super) fn placeholder_index(html: &str) -> Option<usize> {
    html.trim()
        .strip_prefix(PLACEHOLDER_PREFIX)?
        .strip_suffix(PLACEHOLDER_SUFFIX)?
        .parse()
        .ok()
}

/// Markdown text of every segment, in document order.
pub(crate) fn markdown_segments(blocks: &[Block]) -> Vec<&str> {
    let mut segments = Vec::new();
    collect_segments(blocks, &mut segments);
    segments
}

fn collect_segments<'a>(blocks: &'a [Block], out: &mut Vec<&'a str>) {
    for block in blocks {
        match block {
            Block::Markdown { text, nested } => {
                out.push(text);
                collect_segments(nested, out);
            }
            Block::Directive { children, .. } => collect_segments(children, out),
        }
    }
}

/// How an open directive is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closer {
    /// `:::` with at least this many colons.
    Fence(usize),
    /// Matching `</Tag>` line.
    Tag,
}

/// Width of a list marker plus the spaces after it, if `text` starts with one.
fn list_marker_width(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let marker = match bytes.first()? {
        b'-' | b'+' | b'*' => 1,
        b'0'..=b'9' => {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            if digits > 9 || !matches!(bytes.get(digits), Some(b'.' | b')')) {
                return None;
            }
            digits + 1
        }
        _ => return None,
    };

    let rest = &text[marker..];
    if rest.trim().is_empty() {
        return Some(marker + 1);
    }
    match rest.bytes().take_while(|&b| b == b' ').count() {
        0 => None,
        // Five or more spaces start indented code inside the item.
        spaces @ 1..=4 => Some(marker + spaces),
        _ => Some(marker + 1),
    }
}

/// Whether `text` may continue an item's paragraph without indentation.
fn is_lazy_continuation(text: &str) -> bool {
    !text.starts_with([':', '`', '~', '<', '#', '>']) && list_marker_width(text).is_none()
}

/// A markdown line seen from inside its innermost list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ItemLine<'a> {
    /// Content column of the item; zero outside lists.
    column: usize,
    /// The line without the item's indentation or list marker.
    content: &'a str,
}

/// Content columns of the open list items in a markdown segment.
#[derive(Debug, Default)]
struct ListItems {
    columns: Vec<usize>,
    after_blank: bool,
}

impl ListItems {
    fn reset(&mut self) {
        self.columns.clear();
        self.after_blank = false;
    }

    fn observe<'a>(&mut self, line: &'a str) -> ItemLine<'a> {
        if line.trim().is_empty() {
            self.after_blank = true;
            return ItemLine {
                column: 0,
                content: line,
            };
        }

        let indent = leading_columns(line);
        let text = line.trim_start();
        while let Some(&column) = self.columns.last() {
            if indent >= column {
                break;
            }
            if !self.after_blank && is_lazy_continuation(text) {
                return ItemLine {
                    column,
                    content: text,
                };
            }
            self.columns.pop();
        }
        self.after_blank = false;

        let base = self.columns.last().copied().unwrap_or(0);
        let relative = strip_columns(line, base);
        let offset = leading_columns(relative);
        if offset <= MAX_FENCE_INDENT {
            let text = relative.trim_start();
            if let Some(width) = list_marker_width(text) {
                let column = base + offset + width;
                self.columns.push(column);
                return ItemLine {
                    column,
                    content: text.get(width..).unwrap_or_default(),
                };
            }
        }
        ItemLine {
            column: base,
            content: relative,
        }
    }
}

#[derive(Debug)]
struct Frame {
    directive: Directive,
    closer: Closer,
    line: usize,
    /// Columns stripped from every body line.
    indent: usize,
    /// Text before the fence when the directive sits in a list item.
    placeholder_prefix: Option<String>,
    children: Vec<Block>,
    buffer: String,
    nested: Vec<Block>,
    items: ListItems,
}

impl Frame {
    fn new(directive: Directive, closer: Closer, line: usize) -> Self {
        Self {
            directive,
            closer,
            line,
            indent: 0,
            placeholder_prefix: None,
            children: Vec::new(),
            buffer: String::new(),
            nested: Vec::new(),
            items: ListItems::default(),
        }
    }

    fn flush(&mut self) {
        if !self.buffer.trim().is_empty() || !self.nested.is_empty() {
            self.children.push(Block::Markdown {
                text: std::mem::take(&mut self.buffer),
                nested: std::mem::take(&mut self.nested),
            });
        }
        self.buffer.clear();
        self.items.reset();
    }

    fn into_block(mut self) -> Block {
        self.flush();
        Block::Directive {
            directive: self.directive,
            children: self.children,
        }
    }
}

/// Stack-based splitter over source lines.
struct Splitter {
    code: CodeBlockScanner,
    /// Item column the open code fence was found at.
    code_column: usize,
    root: Frame,
    stack: Vec<Frame>,
}

impl Splitter {
    fn new() -> Self {
        Self {
            code: CodeBlockScanner::new(),
            code_column: 0,
            root: Frame::new(Directive::new("root"), Closer::Tag, 0),
            stack: Vec::new(),
        }
    }

    fn current(&mut self) -> &mut Frame {
        self.stack.last_mut().unwrap_or(&mut self.root)
    }

    fn open(&mut self, mut frame: Frame, at: ItemLine<'_>, line: &str) {
        let parent = self.current();
        if at.column == 0 {
            parent.flush();
        } else {
            frame.indent = parent.indent + at.column;
            frame.placeholder_prefix = Some(line[..line.len() - at.content.len()].to_owned());
        }
        self.stack.push(frame);
    }

    fn close_top(&mut self) {
        let Some(mut frame) = self.stack.pop() else {
            return;
        };
        let prefix = frame.placeholder_prefix.take();
        let block = frame.into_block();
        let parent = self.current();
        match prefix {
            Some(prefix) => {
                parent.buffer.push_str(&prefix);
                parent.buffer.push_str(&placeholder(parent.nested.len()));
                parent.buffer.push('\n');
                parent.nested.push(block);
            }
            None => {
                parent.flush();
                parent.children.push(block);
            }
        }
    }

    fn process_line(&mut self, raw: &str, line_num: usize) -> Result<(), ParseError> {
        let line = strip_columns(raw, self.current().indent);

        if self.code.is_open() {
            self.code.is_code_line(strip_columns(line, self.code_column));
            self.current().buffer.push_str(line);
            return Ok(());
        }

        let at = self.current().items.observe(line);
        if self.code.is_code_line(at.content) {
            self.code_column = at.column;
            self.current().buffer.push_str(line);
            return Ok(());
        }

        if let Some(fence) = parse_fence_line(at.content) {
            return self.handle_fence(fence, at, line, line_num);
        }

        if let Some(tag) = parse_tag_line(at.content) {
            return self.handle_tag(tag, at, line, line_num);
        }

        self.current().buffer.push_str(line);
        Ok(())
    }

    fn handle_fence(
        &mut self,
        fence: FenceLine<'_>,
        at: ItemLine<'_>,
        line: &str,
        line_num: usize,
    ) -> Result<(), ParseError> {
        match fence {
            FenceLine::Open {
                name,
                label,
                attrs,
                colons,
            } => {
                let mut directive = Directive::new(name).with_attributes(Attributes::parse(attrs));
                directive.label = label.map(ToOwned::to_owned);
                self.open(Frame::new(directive, Closer::Fence(colons), line_num), at, line);
                Ok(())
            }
            FenceLine::Close { colons } => match self.stack.last().map(|frame| frame.closer) {
                Some(Closer::Fence(open)) if open <= colons => {
                    self.close_top();
                    Ok(())
                }
                // A shorter run of colons inside a longer fence is content.
                Some(Closer::Fence(_)) => {
                    self.current().buffer.push_str(line);
                    Ok(())
                }
                Some(Closer::Tag) | None => Err(ParseError::UnexpectedClose { line: line_num }),
            },
        }
    }

    fn handle_tag(
        &mut self,
        tag: TagLine,
        at: ItemLine<'_>,
        line: &str,
        line_num: usize,
    ) -> Result<(), ParseError> {
        match tag {
            TagLine::Open {
                name,
                attributes,
                self_closing,
            } => {
                let directive = Directive::new(name).with_attributes(attributes);
                self.open(Frame::new(directive, Closer::Tag, line_num), at, line);
                if self_closing {
                    self.close_top();
                }
                Ok(())
            }
            TagLine::Close { name } => {
                let Some(top) = self.stack.last() else {
                    return Err(ParseError::UnexpectedClose { line: line_num });
                };
                if top.closer != Closer::Tag || top.directive.name != name {
                    return Err(ParseError::MismatchedTag {
                        expected: top.directive.name.clone(),
                        found: name,
                        line: line_num,
                    });
                }
                self.close_top();
                Ok(())
            }
        }
    }

    fn finish(mut self) -> Result<Vec<Block>, ParseError> {
        if let Some(frame) = self.stack.last() {
            return Err(ParseError::Unclosed {
                name: frame.directive.name.clone(),
                line: frame.line,
            });
        }
        self.root.flush();
        Ok(self.root.children)
    }
}

/// Split `source` into markdown segments and directive blocks.
pub(crate) fn split_blocks(source: &str) -> Result<Vec<Block>, ParseError> {
    let mut splitter = Splitter::new();
    for (idx, line) in source.split_inclusive('\n').enumerate() {
        splitter.process_line(line, idx + 1)?;
    }
    splitter.finish()
}
