//! Fenced code awareness for the line-based rewriters.
//!
//! Preprocessors and the directive splitter run before the markdown parser,
//! so they must not rewrite `:::` or tag lines that sit inside a code block.

use std::ops::Range;

use regex::{Captures, Regex};

/// Deepest indentation, in columns, of a fence or directive line. Four or
/// more columns make an indented code block.
pub(crate) const MAX_FENCE_INDENT: usize = 3;

/// An open code fence: its marker byte and run length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Fence {
    marker: u8,
    width: usize,
}

impl Fence {
    /// A fence opened by `line`, if it is a backtick or tilde fence.
    fn opened_by(line: &str) -> Option<Self> {
        if leading_columns(line) > MAX_FENCE_INDENT {
            return None;
        }
        let line = line.trim_start();
        let marker = *line.as_bytes().first()?;
        if marker != b'`' && marker != b'~' {
            return None;
        }
        let width = run_length(line, marker);
        if width < 3 {
            return None;
        }
        // An info string may not contain backticks after a backtick fence.
        if marker == b'`' && line[width..].contains('`') {
            return None;
        }
        Some(Self { marker, width })
    }

    /// Whether `line` closes this fence: same marker, at least as wide,
    /// nothing but whitespace after it.
    fn closed_by(self, line: &str) -> bool {
        if leading_columns(line) > MAX_FENCE_INDENT {
            return false;
        }
        let line = line.trim_start();
        let width = run_length(line, self.marker);
        width >= self.width && line[width..].trim().is_empty()
    }
}

fn run_length(line: &str, marker: u8) -> usize {
    line.bytes().take_while(|&b| b == marker).count()
}

/// Width of the leading whitespace in columns, with tab stops of four.
pub(crate) fn leading_columns(line: &str) -> usize {
    let mut column = 0;
    for byte in line.bytes() {
        match byte {
            b' ' => column += 1,
            b'\t' => column += 4 - column % 4,
            _ => break,
        }
    }
    column
}

/// `line` without up to `columns` columns of leading whitespace.
///
/// A tab that crosses the limit is removed whole.
pub(crate) fn strip_columns(line: &str, columns: usize) -> &str {
    let mut column = 0;
    for (index, byte) in line.bytes().enumerate() {
        if column >= columns {
            return &line[index..];
        }
        match byte {
            b' ' => column += 1,
            b'\t' => column += 4 - column % 4,
            _ => return &line[index..],
        }
    }
    &line[line.len()..]
}

/// Line-by-line code block state.
#[derive(Debug, Default)]
pub(crate) struct CodeBlockScanner {
    open: Option<Fence>,
}

impl CodeBlockScanner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Feed the next line. Returns `true` when it is part of a code block,
    /// counting both fence lines.
    pub(crate) fn is_code_line(&mut self, line: &str) -> bool {
        match self.open {
            Some(fence) => {
                if fence.closed_by(line) {
                    self.open = None;
                }
                true
            }
            None => {
                self.open = Fence::opened_by(line);
                self.open.is_some()
            }
        }
    }
}

/// Byte ranges of `text` covered by fenced code blocks, fence lines included.
///
/// Adjacent code lines are merged into one range. An unterminated fence runs
/// to the end of the text.
pub(crate) fn fenced_ranges(text: &str) -> Vec<Range<usize>> {
    let mut scanner = CodeBlockScanner::new();
    let mut ranges: Vec<Range<usize>> = Vec::new();
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let end = offset + line.len();
        if scanner.is_code_line(line) {
            match ranges.last_mut() {
                Some(last) if last.end == offset => last.end = end,
                _ => ranges.push(offset..end),
            }
        }
        offset = end;
    }

    ranges
}

/// Replace every match of `pattern` that does not touch a fenced code block.
///
/// Matches overlapping a fenced range are left as literal text.
pub(crate) fn replace_outside_fences<F>(text: &str, pattern: &Regex, mut rewrite: F) -> String
where
    F: FnMut(&Captures<'_>) -> String,
{
    let fenced = fenced_ranges(text);
    let mut output = String::with_capacity(text.len());
    let mut last = 0;

    for caps in pattern.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let overlaps_code = fenced
            .iter()
            .any(|range| range.start < whole.end() && whole.start() < range.end);
        if overlaps_code {
            continue;
        }

        output.push_str(&text[last..whole.start()]);
        output.push_str(&rewrite(&caps));
        last = whole.end();
    }

    output.push_str(&text[last..]);
    output
}
