//! Chart payload parsing.
//!
//! A chart directive's text content is captured verbatim as its payload:
//!
//! ```markdown
//! :::chart-radar{title="Skills"}
//! Rust: 80
//! Go: 65.5
//! :::
//! ```
//!
//! The renderer turns the payload into ordered [`ChartPoint`]s with
//! [`parse_chart_data`].

use serde::Serialize;

/// A single `name: value` row of a chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartPoint {
    pub name: String,
    pub value: f64,
}

/// Error returned when a chart payload cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChartError {
    /// A data line carried a value that is not a finite number.
    #[error("invalid chart value on line {line}: \"{name}: {value}\" is not a number")]
    InvalidValue {
        /// Line number within the payload (1-indexed).
        line: usize,
        name: String,
        value: String,
    },
}

/// Parse a chart payload into data points.
///
/// Lines without `:` are ignored. Each remaining line is split on its first
/// `:`, both sides are trimmed and the value must parse as a finite float.
/// One bad value fails the whole chart. Order follows the input and
/// duplicate names are kept.
///
/// # Errors
///
/// Returns [`ChartError::InvalidValue`] for the first non-numeric value.
///
/// # Example
///
/// ```
/// use wiki_markdown::parse_chart_data;
///
/// let points = parse_chart_data("Rust: 80\nnot a row\nGo: 65.5").unwrap();
/// assert_eq!(points.len(), 2);
/// assert_eq!(points[1].name, "Go");
/// assert_eq!(points[1].value, 65.5);
///
/// assert!(parse_chart_data("Rust: lots").is_err());
/// ```
pub fn parse_chart_data(payload: &str) -> Result<Vec<ChartPoint>, ChartError> {
    payload
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| line.split_once(':').map(|parts| (idx + 1, parts)))
        .map(|(line, (name, value))| {
            let name = name.trim();
            let value = value.trim();
            match value.parse::<f64>() {
                Ok(number) if number.is_finite() => Ok(ChartPoint {
                    name: name.to_owned(),
                    value: number,
                }),
                _ => Err(ChartError::InvalidValue {
                    line,
                    name: name.to_owned(),
                    value: value.to_owned(),
                }),
            }
        })
        .collect()
}
