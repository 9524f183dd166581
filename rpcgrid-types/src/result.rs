//! Result envelopes handed to the presentation layer.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Label used for sections skipped because identity resolution failed.
pub const AUTH_FAILED_LABEL: &str = "Authentication Failed";

/// Label used for sections whose payload carried the not-authorized sentinel.
pub const NOT_AUTHORIZED_LABEL: &str = "Not Authorized";

/// Why a section carries an `error`.
///
/// Not part of the serialized shape; consumers of the JSON only see the `error`
/// string. In-process callers use it to tell failure classes apart without
/// parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Sentinel detected in the payload, or the call was skipped after a failed identity lookup.
    Auth,
    /// The payload could not be decoded or its delimiter structure was unusable.
    Parse,
    /// The remote call itself failed.
    Transport,
    /// No transport session could be opened.
    Session,
}

/// Normalized outcome of a single endpoint call.
///
/// `headers` always equals the endpoint's target schema and every row in `data`
/// has exactly `headers.len()` cells, even when `error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResult {
    /// Column names, identical to the endpoint's target schema.
    pub headers: Vec<String>,
    /// Row-major cells; `None` renders as JSON `null`.
    pub data: Vec<Vec<Option<String>>>,
    /// Present only when the section's content is missing or suspect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    kind: Option<FailureKind>,
}

impl FetchResult {
    /// A clean result with the given rows.
    #[must_use]
    pub const fn ok(headers: Vec<String>, data: Vec<Vec<Option<String>>>) -> Self {
        Self {
            headers,
            data,
            error: None,
            kind: None,
        }
    }

    /// A clean result without rows ("nothing to show").
    #[must_use]
    pub const fn empty(headers: Vec<String>) -> Self {
        Self::ok(headers, Vec::new())
    }

    /// A failed result with a single placeholder row labeled `label`.
    ///
    /// The first cell holds the label and the rest are `None`. An empty schema
    /// yields no rows at all, since a zero-width row cannot carry a label.
    pub fn failed(
        headers: Vec<String>,
        kind: FailureKind,
        label: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        let data = if headers.is_empty() {
            Vec::new()
        } else {
            let mut row: Vec<Option<String>> = vec![None; headers.len()];
            row[0] = Some(label.into());
            vec![row]
        };
        Self {
            headers,
            data,
            error: Some(error.into()),
            kind: Some(kind),
        }
    }

    /// Placeholder for a section skipped after identity resolution failed.
    #[must_use]
    pub fn auth_failed(headers: Vec<String>) -> Self {
        Self::failed(headers, FailureKind::Auth, AUTH_FAILED_LABEL, AUTH_FAILED_LABEL)
    }

    /// Failure class, if this result carries an error.
    #[must_use]
    pub const fn kind(&self) -> Option<FailureKind> {
        self.kind
    }

    /// True when no error is attached.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Overall provenance of an [`AggregateResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Every section was fetched cleanly.
    Api,
    /// Identity resolved but at least one dependent section carries an error.
    ApiWithErrors,
    /// A systemic failure happened before identity resolution could be attempted.
    Error,
    /// Identity resolution failed; no dependent call was issued.
    ErrorAuth,
}

impl DataSource {
    /// Wire label, e.g. `"api_with_errors"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::ApiWithErrors => "api_with_errors",
            Self::Error => "error",
            Self::ErrorAuth => "error_auth",
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One [`FetchResult`] per logical section plus a timestamp and overall status.
///
/// Serializes to a flat object: each section under its own key, followed by
/// `timestamp` and `dataSource`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateResult {
    /// Sections in profile order (identity first).
    pub sections: Vec<(String, FetchResult)>,
    /// RFC 3339 timestamp of when the aggregate was assembled.
    pub timestamp: String,
    /// Overall status.
    pub data_source: DataSource,
}

impl AggregateResult {
    /// Look up a section by name.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&FetchResult> {
        self.sections
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, r)| r)
    }

    /// Names of sections that carry an error.
    pub fn failed_sections(&self) -> impl Iterator<Item = &str> {
        self.sections
            .iter()
            .filter(|(_, r)| !r.is_ok())
            .map(|(n, _)| n.as_str())
    }
}

impl Serialize for AggregateResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len() + 2))?;
        for (name, result) in &self.sections {
            map.serialize_entry(name, result)?;
        }
        map.serialize_entry("timestamp", &self.timestamp)?;
        map.serialize_entry("dataSource", &self.data_source)?;
        map.end()
    }
}
