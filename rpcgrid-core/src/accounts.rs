//! Account identifiers from identity rows.

use crate::parse::StructuredRow;
use crate::sentinel::is_not_authorized;

pub use rpcgrid_types::DEFAULT_ACCOUNT_KEY;

/// Collect account identifiers stored under `key`, in row order.
///
/// Values are trimmed; nulls, empties and the not-authorized sentinel are skipped.
/// The column is matched exactly first, then case-insensitively.
#[must_use]
pub fn extract_account_numbers(rows: &[StructuredRow], key: &str) -> Vec<String> {
    rows.iter()
        .filter_map(|r| r.get_ignore_case(key))
        .map(str::trim)
        .filter(|v| !v.is_empty() && !is_not_authorized(v))
        .map(ToString::to_string)
        .collect()
}

/// The first identifier [`extract_account_numbers`] would return.
#[must_use]
pub fn primary_account(rows: &[StructuredRow], key: &str) -> Option<String> {
    extract_account_numbers(rows, key).into_iter().next()
}
