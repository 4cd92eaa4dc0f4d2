//! Order text parsing
//!
//! Turns a free-text order (one item per line, quantity last) into an
//! ordered list of [`OrderLine`]s. Parsing is all-or-nothing: a single
//! malformed line rejects the whole order.

use crate::types::OrderLine;

/// Errors produced while parsing order text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A non-empty line does not end in a whitespace-separated digit run
    #[error("malformed order line {line_no}: '{content}' (expected 'name quantity')")]
    MalformedLine {
        /// 1-based line number within the order text
        line_no: usize,
        /// The offending line, trimmed
        content: String,
    },

    /// The order text contains no item lines at all
    #[error("order text contains no item lines")]
    EmptyOrder,
}

/// Parse free-text order into ordered (name, quantity) lines
///
/// Each non-empty line must be an arbitrary non-empty name (internal
/// whitespace allowed) followed by whitespace and a trailing run of
/// decimal digits. Blank lines are skipped. Duplicate names are kept
/// as separate lines.
///
/// # Errors
/// - [`ParseError::MalformedLine`] if any non-empty line breaks the format
///   (no partial acceptance)
/// - [`ParseError::EmptyOrder`] if no non-empty line exists
pub fn parse_order(text: &str) -> Result<Vec<OrderLine>, ParseError> {
    let mut lines = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        lines.push(parse_line(idx + 1, line)?);
    }

    if lines.is_empty() {
        return Err(ParseError::EmptyOrder);
    }
    Ok(lines)
}

/// Parse one trimmed, non-empty order line
fn parse_line(line_no: usize, line: &str) -> Result<OrderLine, ParseError> {
    let malformed = || ParseError::MalformedLine {
        line_no,
        content: line.to_string(),
    };

    // Peel the trailing digit run, then require whitespace before it.
    let head = line.trim_end_matches(|c: char| c.is_ascii_digit());
    let quantity_str = &line[head.len()..];

    if quantity_str.is_empty() || !head.ends_with(char::is_whitespace) {
        return Err(malformed());
    }

    let name = head.trim_end();
    if name.is_empty() {
        return Err(malformed());
    }

    let quantity = quantity_str.parse::<u64>().map_err(|_| malformed())?;

    Ok(OrderLine::new(name, quantity))
}
