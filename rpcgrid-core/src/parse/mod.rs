//! Text → rows. Shared row types, the four-way parse outcome, and helpers used by
//! both the delimited and the transposed parsers.

pub mod delimited;
pub mod transposed;

use std::collections::HashSet;

use crate::sentinel::{is_no_data, is_not_authorized};
use rpcgrid_types::{NOT_AUTHORIZED_LABEL, ParserKind};

pub use delimited::parse_delimited;
pub use transposed::parse_transposed;

/// Row separator.
pub const ROW_DELIMITER: char = '|';
/// Cell separator.
pub const CELL_DELIMITER: char = ';';
/// Prefix for cells beyond the resolved column count.
pub const EXTRA_COLUMN_PREFIX: &str = "ExtraCol";
/// Longest raw excerpt kept in a parse diagnostic.
pub const SNIPPET_CHARS: usize = 200;

/// One parsed row: ordered `(column, value)` pairs with lookup by name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructuredRow {
    cells: Vec<(String, Option<String>)>,
}

impl StructuredRow {
    /// Empty row.
    #[must_use]
    pub const fn new() -> Self {
        Self { cells: Vec::new() }
    }

    /// Build a row from `(column, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            cells: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.map(Into::into)))
                .collect(),
        }
    }

    /// Append a cell.
    pub fn push(&mut self, column: impl Into<String>, value: Option<String>) {
        self.cells.push((column.into(), value));
    }

    /// Value under `column`, `None` if the column is absent or null.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(c, _)| c == column)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Like [`get`](Self::get) but matches the column name case-insensitively
    /// when no exact match exists.
    #[must_use]
    pub fn get_ignore_case(&self, column: &str) -> Option<&str> {
        if self.contains(column) {
            return self.get(column);
        }
        self.cells
            .iter()
            .find(|(c, _)| c.eq_ignore_ascii_case(column))
            .and_then(|(_, v)| v.as_deref())
    }

    /// True when the row has a cell named `column` (null or not).
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.cells.iter().any(|(c, _)| c == column)
    }

    /// Column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(c, _)| c.as_str())
    }

    /// `(column, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.cells.iter().map(|(c, v)| (c.as_str(), v.as_deref()))
    }

    /// Number of cells.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when the row has no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Rows plus the column names resolved for them (overflow columns excluded).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedTable {
    /// Resolved column names, explicit or detected.
    pub columns: Vec<String>,
    /// Materialized rows.
    pub rows: Vec<StructuredRow>,
}

/// Diagnostic for text whose structure could not be understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    /// Short description.
    pub error: String,
    /// What exactly was wrong.
    pub details: String,
    /// Leading excerpt of the offending text.
    pub raw_response_snippet: String,
}

impl ParseFailure {
    pub(crate) fn new(details: impl Into<String>, raw: &str) -> Self {
        Self {
            error: "Failed to parse response".to_string(),
            details: details.into(),
            raw_response_snippet: snippet(raw),
        }
    }
}

/// Every parse resolves to exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Nothing to show; not an error.
    Empty,
    /// The not-authorized sentinel was found.
    AuthFailure,
    /// The text had no usable delimiter structure.
    ParseError(ParseFailure),
    /// Success.
    Rows(ParsedTable),
}

impl ParseOutcome {
    /// Flatten into the plain row-list form.
    ///
    /// `Empty` → `[]`; `AuthFailure` → one sentinel row (first of `columns` set to
    /// `Not Authorized`, the rest null, or `{Error: "Not Authorized"}` without
    /// columns); `ParseError` → one `{error, details, raw_response_snippet}` row.
    #[must_use]
    pub fn into_rows(self, columns: Option<&[String]>) -> Vec<StructuredRow> {
        match self {
            Self::Empty => Vec::new(),
            Self::AuthFailure => vec![auth_sentinel_row(columns)],
            Self::ParseError(f) => vec![StructuredRow::from_pairs([
                ("error", Some(f.error)),
                ("details", Some(f.details)),
                ("raw_response_snippet", Some(f.raw_response_snippet)),
            ])],
            Self::Rows(t) => t.rows,
        }
    }

    /// True for `Rows` with at least one row.
    #[must_use]
    pub fn has_rows(&self) -> bool {
        matches!(self, Self::Rows(t) if !t.rows.is_empty())
    }
}

fn auth_sentinel_row(columns: Option<&[String]>) -> StructuredRow {
    match columns {
        Some(cols) if !cols.is_empty() => {
            let mut row = StructuredRow::new();
            for (i, c) in cols.iter().enumerate() {
                let v = (i == 0).then(|| NOT_AUTHORIZED_LABEL.to_string());
                row.push(c.clone(), v);
            }
            row
        }
        _ => StructuredRow::from_pairs([("Error", Some(NOT_AUTHORIZED_LABEL))]),
    }
}

/// Parse `text` with the given parser.
#[must_use]
pub fn parse_with(kind: ParserKind, text: Option<&str>, columns: Option<&[String]>) -> ParseOutcome {
    match kind {
        ParserKind::Transposed => parse_transposed(text, columns),
        _ => parse_delimited(text, columns),
    }
}

/// Sentinel gate shared by both parsers. `Err` carries a final outcome; `Ok`
/// hands back the trimmed text for table parsing.
pub(crate) fn classify_sentinel(text: Option<&str>) -> Result<&str, ParseOutcome> {
    let Some(text) = text else {
        return Err(ParseOutcome::Empty);
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseOutcome::Empty);
    }
    if is_not_authorized(trimmed) {
        return Err(ParseOutcome::AuthFailure);
    }
    if is_no_data(trimmed) {
        return Err(ParseOutcome::Empty);
    }
    if looks_like_fault(trimmed) {
        return Err(ParseOutcome::ParseError(ParseFailure::new(
            "payload carries no delimiter structure and reads as a fault message",
            trimmed,
        )));
    }
    Ok(trimmed)
}

/// Undelimited markup or an error banner where a table was expected.
fn looks_like_fault(text: &str) -> bool {
    if text.contains(CELL_DELIMITER) || text.contains(ROW_DELIMITER) {
        return false;
    }
    if text.starts_with('<') {
        return true;
    }
    let lower = text.to_ascii_lowercase();
    ["error", "exception", "fault"]
        .iter()
        .any(|p| lower.starts_with(p))
}

/// Split on `|`, trim, drop empty rows.
pub(crate) fn split_rows(text: &str) -> Vec<&str> {
    text.split(ROW_DELIMITER)
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .collect()
}

/// Split a row on `;` and trim each cell.
pub(crate) fn split_cells(row: &str) -> Vec<&str> {
    row.split(CELL_DELIMITER).map(str::trim).collect()
}

/// `null` (any case) and empty cells are absent values.
pub(crate) fn cell_value(cell: &str) -> Option<String> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("null") {
        None
    } else {
        Some(cell.to_string())
    }
}

/// Purely numeric: optional sign, digits with `.`/`,` separators, optional `%`.
pub(crate) fn is_numeric(cell: &str) -> bool {
    let body = cell
        .strip_prefix(['-', '+'])
        .unwrap_or(cell)
        .trim_end_matches('%');
    body.chars().any(|c| c.is_ascii_digit())
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == ',')
}

/// Contains letters and is not a number.
pub(crate) fn is_textual(cell: &str) -> bool {
    !is_numeric(cell) && cell.chars().any(char::is_alphabetic)
}

/// A row reads as a header when a strict majority of its cells are textual.
pub(crate) fn is_header_like(cells: &[&str]) -> bool {
    let textual = cells.iter().filter(|c| is_textual(c)).count();
    !cells.is_empty() && textual * 2 > cells.len()
}

/// Turn header text into an identifier: whitespace runs become `_`, anything
/// outside `[A-Za-z0-9_-]` is dropped, and empties fall back to `Col{n}`.
#[must_use]
pub fn clean_identifier(raw: &str, position: usize) -> String {
    let joined = raw.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        format!("Col{}", position + 1)
    } else {
        cleaned
    }
}

/// Clean a header row and suffix collisions with `_2`, `_3`, ….
#[must_use]
pub fn clean_header<S: AsRef<str>>(cells: &[S]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(cells.len());
    for (i, c) in cells.iter().enumerate() {
        let base = clean_identifier(c.as_ref(), i);
        let mut name = base.clone();
        let mut n = 2;
        while seen.contains(&name) {
            name = format!("{base}_{n}");
            n += 1;
        }
        seen.insert(name.clone());
        out.push(name);
    }
    out
}

/// Synthetic `Col1..ColN`.
#[must_use]
pub fn synthetic_columns(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("Col{i}")).collect()
}

/// Zip cells onto `columns`: pad with nulls, keep overflow as `ExtraColN`.
pub(crate) fn materialize(columns: &[String], cells: &[&str]) -> StructuredRow {
    let mut row = StructuredRow::new();
    for (i, col) in columns.iter().enumerate() {
        row.push(col.clone(), cells.get(i).and_then(|c| cell_value(c)));
    }
    let overflow = cells.iter().skip(columns.len());
    for (j, cell) in overflow.enumerate() {
        if let Some(v) = cell_value(cell) {
            row.push(format!("{EXTRA_COLUMN_PREFIX}{}", j + 1), Some(v));
        }
    }
    row
}

/// First [`SNIPPET_CHARS`] characters of `raw`.
pub(crate) fn snippet(raw: &str) -> String {
    raw.chars().take(SNIPPET_CHARS).collect()
}
