//! Highlight tables produced by the script generator.
//!
//! The generator is prompted with the code listing annotated by [`annotate_line_numbers`] and
//! answers with a pipe-separated table:
//!
//! ```text
//! start_line_number|end_line_number|description_of_the_block
//! 1|5|"Description of block 1"
//! 23|23|"Description of block 2"
//! ```
//!
//! Line numbers in the table are 1-based and inclusive.

use crate::script::model::HighlightSegment;

const HEADER_PREFIX: &str = "start_line_number";

/// Prefix every line of `code` with its 1-based number (`"1: import x"`).
pub fn annotate_line_numbers(code: &str) -> String {
    code.split('\n')
        .enumerate()
        .map(|(idx, line)| format!("{}: {line}", idx + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a highlight table into zero-based [`HighlightSegment`]s.
///
/// Accepts an optional Markdown code fence (with or without a `csv` tag) and an optional header
/// row. Rows that do not parse are skipped with a warning.
pub fn parse_highlight_table(output: &str) -> Vec<HighlightSegment> {
    let mut body = output.trim().trim_matches('`');
    if let Some(rest) = body.strip_prefix("csv") {
        body = rest;
    }
    let body = body.trim();

    let mut out = Vec::new();
    for (row_idx, raw) in body.lines().enumerate() {
        let row = raw.trim();
        if row.is_empty() || (row_idx == 0 && row.starts_with(HEADER_PREFIX)) {
            continue;
        }
        match parse_row(row) {
            Some(h) => out.push(h),
            None => tracing::warn!(row, "skipping unparseable highlight row"),
        }
    }
    out
}

fn parse_row(row: &str) -> Option<HighlightSegment> {
    let mut fields = row.splitn(3, '|');
    let start: i64 = fields.next()?.trim().parse().ok()?;
    let end: i64 = fields.next()?.trim().parse().ok()?;
    let text = fields.next()?.trim().trim_matches('"').trim_matches('\'').trim();
    if start < 1 || end < start || text.is_empty() {
        return None;
    }
    Some(HighlightSegment::new(text, start - 1, end - start + 1))
}

#[cfg(test)]
#[path = "../../tests/unit/script/table.rs"]
mod tests;
