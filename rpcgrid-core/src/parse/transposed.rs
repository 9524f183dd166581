//! Reports with metrics as rows and markets as columns:
//!
//! ```text
//! Market Name;NYSE;NASDAQ|Volume;100;200|Trades;5;7
//! ```
//!
//! becomes `{Metric: Volume, NYSE: 100, NASDAQ: 200}`, `{Metric: Trades, ...}`.

use super::{
    ParseOutcome, ParsedTable, StructuredRow, classify_sentinel, clean_header, materialize,
    split_cells, split_rows,
};
use crate::parse::delimited::parse_delimited;

/// First cell of a transposed report.
pub const MARKET_NAME_HEADER: &str = "Market Name";

/// Name of the leading output column.
pub const METRIC_COLUMN: &str = "Metric";

/// Parse a transposed metric report, falling back to [`parse_delimited`] when the
/// text does not start with a `Market Name` row or has fewer than two rows.
#[must_use]
pub fn parse_transposed(text: Option<&str>, columns: Option<&[String]>) -> ParseOutcome {
    let body = match classify_sentinel(text) {
        Ok(t) => t,
        Err(outcome) => return outcome,
    };

    let rows = split_rows(body);
    let is_transposed = rows.len() >= 2
        && split_cells(rows[0])
            .first()
            .is_some_and(|c| c.eq_ignore_ascii_case(MARKET_NAME_HEADER));
    if !is_transposed {
        return parse_delimited(Some(body), columns);
    }

    let header = split_cells(rows[0]);
    let mut names: Vec<&str> = Vec::with_capacity(header.len());
    names.push(METRIC_COLUMN);
    names.extend(header.iter().skip(1));
    let columns = clean_header(&names);

    let parsed: Vec<StructuredRow> = rows[1..]
        .iter()
        .map(|r| materialize(&columns, &split_cells(r)))
        .collect();

    ParseOutcome::Rows(ParsedTable {
        columns,
        rows: parsed,
    })
}
