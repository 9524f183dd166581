//! `;`-separated cells, `|`-separated rows.

use super::{
    ParseFailure, ParseOutcome, ParsedTable, classify_sentinel, clean_header, is_header_like,
    is_textual, materialize, split_cells, split_rows, synthetic_columns,
};

/// Parse delimited text into rows.
///
/// With `columns`, those names are used as-is and an embedded header row is
/// skipped when one is detected. Without them, the first row becomes the header
/// when most of its cells are textual and there is at least one data row after it;
/// otherwise columns are named `Col1..ColN`.
#[must_use]
pub fn parse_delimited(text: Option<&str>, columns: Option<&[String]>) -> ParseOutcome {
    let text = match classify_sentinel(text) {
        Ok(t) => t,
        Err(outcome) => return outcome,
    };

    let rows = split_rows(text);
    if rows.is_empty() {
        return ParseOutcome::ParseError(ParseFailure::new(
            "no rows left after splitting on '|'",
            text,
        ));
    }
    let cells: Vec<Vec<&str>> = rows.iter().map(|r| split_cells(r)).collect();

    let (columns, data) = match columns {
        Some(explicit) if !explicit.is_empty() => {
            let skip = usize::from(has_embedded_header(&cells));
            (explicit.to_vec(), &cells[skip..])
        }
        Some(_) => {
            return ParseOutcome::ParseError(ParseFailure::new(
                "explicit column list is empty",
                text,
            ));
        }
        None => detect_header(&cells),
    };

    let rows = data.iter().map(|c| materialize(&columns, c)).collect();
    ParseOutcome::Rows(ParsedTable { columns, rows })
}

/// Row 0 is a source header the caller already replaced: there is a second row
/// to compare against, and row 0's first cell is textual and differs from it.
fn has_embedded_header(cells: &[Vec<&str>]) -> bool {
    let [first, second, ..] = cells else {
        return false;
    };
    match (first.first(), second.first()) {
        (Some(a), Some(b)) => a != b && is_textual(a),
        _ => false,
    }
}

fn detect_header<'a>(cells: &'a [Vec<&'a str>]) -> (Vec<String>, &'a [Vec<&'a str>]) {
    if cells.len() >= 2 && is_header_like(&cells[0]) {
        return (clean_header(&cells[0]), &cells[1..]);
    }
    let width = cells.iter().map(Vec::len).max().unwrap_or(0);
    (synthetic_columns(width), cells)
}
