//! Text rewrites applied before parsing.
//!
//! Each preprocessor is a total `&str -> String` function: text that does
//! not match is copied unchanged and nothing inside fenced code blocks is
//! touched. [`preprocess`] runs them in their fixed order.

pub mod columns;
pub mod image_size;
pub mod param_field;
pub mod zenn;

/// Run every preprocessor in order: Zenn shorthand, image size,
/// `ParamField` tags, columns/card fences.
///
/// # Example
///
/// ```
/// use wiki_markdown::preprocess;
///
/// let output = preprocess(":::message alert\nCareful!\n:::\n\n![logo](/logo.png =64x32)");
/// assert!(output.starts_with(":::message{.alert}"));
/// assert!(output.contains("/logo.png?__width__=64&__height__=32"));
/// ```
#[must_use]
pub fn preprocess(input: &str) -> String {
    let output = zenn::normalize(input);
    let output = image_size::normalize(&output);
    let output = param_field::normalize(&output);
    columns::normalize(&output)
}
