//! Document-level errors.

/// Structural error in directive fences or component tags.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A directive was opened and never closed.
    #[error("Unclosed directive `{name}` opened on line {line}")]
    Unclosed { name: String, line: usize },

    /// A closing fence or tag appeared with nothing open.
    #[error("Unexpected closing fence on line {line}: no directive is open")]
    UnexpectedClose { line: usize },

    /// A closing tag does not match the innermost open directive.
    #[error("Mismatched closing tag on line {line}: expected end of `{expected}`, found `{found}`")]
    MismatchedTag {
        expected: String,
        found: String,
        line: usize,
    },
}

/// Error returned by [`render`](crate::render).
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}
