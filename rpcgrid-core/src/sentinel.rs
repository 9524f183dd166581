//! Sentinel phrases carried in-band by the remote endpoint.

/// Exact payload text signalling an authorization failure.
pub const NOT_AUTHORIZED: &str = "not authorized";

/// Substrings signalling an empty result set.
pub const NO_DATA_PHRASES: &[&str] = &["no record", "no data", "no result", "nothing found"];

/// True when `text` is exactly the not-authorized sentinel, ignoring case and surrounding whitespace.
#[must_use]
pub fn is_not_authorized(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case(NOT_AUTHORIZED)
}

/// True when `text` contains a "nothing to show" phrase, ignoring case.
#[must_use]
pub fn is_no_data(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    NO_DATA_PHRASES.iter().any(|p| lower.contains(p))
}

/// True when `text` mentions any known sentinel phrase.
#[must_use]
pub fn mentions_sentinel(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    lower.contains(NOT_AUTHORIZED) || NO_DATA_PHRASES.iter().any(|p| lower.contains(p))
}
