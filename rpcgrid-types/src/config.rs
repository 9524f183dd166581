//! Broker profiles: which endpoints make up an account report and how each is shaped.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GridError;

/// Default column holding account identifiers in the identity endpoint's rows.
pub const DEFAULT_ACCOUNT_KEY: &str = "AccountCode";

/// Default reserved account value meaning "identity resolution failed".
pub const DEFAULT_AUTH_FAILED_MARKER: &str = "AUTH_FAILED";

/// Keys the flat aggregate object writes after the sections.
pub const RESERVED_SECTION_NAMES: &[&str] = &["timestamp", "dataSource"];

/// Which parser turns an endpoint's decoded text into rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ParserKind {
    /// `;`-separated cells, `|`-separated rows, optional header row.
    #[default]
    Delimited,
    /// Metrics as rows and markets as columns, led by a `Market Name` row.
    Transposed,
}

/// One logical report section backed by a single remote operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSpec {
    /// Key under which the section appears in the aggregate.
    pub section: String,
    /// Remote operation name.
    pub method: String,
    /// Static call parameters.
    #[serde(default)]
    pub params: Map<String, Value>,
    /// Parameter name that receives the resolved account identifier, if any.
    #[serde(default)]
    pub account_param: Option<String>,
    /// Caller-facing columns the result is always remapped into.
    pub schema: Vec<String>,
    /// Explicit source column list handed to the parser; `None` auto-detects headers.
    #[serde(default)]
    pub source_columns: Option<Vec<String>>,
    /// Parser used for the decoded text.
    #[serde(default)]
    pub parser: ParserKind,
    /// Source column name → schema column name, for sources that name columns differently.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

impl EndpointSpec {
    /// Create an endpoint with the given section, method and schema; everything else defaults.
    pub fn new<I, S>(section: impl Into<String>, method: impl Into<String>, schema: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            section: section.into(),
            method: method.into(),
            params: Map::new(),
            account_param: None,
            schema: schema.into_iter().map(Into::into).collect(),
            source_columns: None,
            parser: ParserKind::Delimited,
            aliases: HashMap::new(),
        }
    }

    /// Add a static call parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Pass the resolved account identifier under `name`.
    #[must_use]
    pub fn account_param(mut self, name: impl Into<String>) -> Self {
        self.account_param = Some(name.into());
        self
    }

    /// Parse with an explicit source column list instead of header auto-detection.
    #[must_use]
    pub fn source_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Select the parser.
    #[must_use]
    pub const fn parser(mut self, parser: ParserKind) -> Self {
        self.parser = parser;
        self
    }

    /// Map a source column onto a schema column.
    #[must_use]
    pub fn alias(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases.insert(source.into(), target.into());
        self
    }

    /// Build the parameter map for a call, inserting `account` when configured.
    #[must_use]
    pub fn call_params(&self, account: Option<&str>) -> Map<String, Value> {
        let mut params = self.params.clone();
        if let (Some(name), Some(account)) = (self.account_param.as_deref(), account) {
            params.insert(name.to_string(), Value::String(account.to_string()));
        }
        params
    }
}

/// Complete description of one broker integration.
///
/// Replaces per-integration constants: the identity endpoint, the dependent
/// endpoints fetched once an account is known, and the sentinel conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerProfile {
    /// Endpoint resolving the primary account.
    pub identity: EndpointSpec,
    /// Endpoints fetched concurrently once the account is known.
    #[serde(default)]
    pub dependents: Vec<EndpointSpec>,
    /// Column in the identity rows holding account identifiers.
    #[serde(default = "default_account_key")]
    pub account_key: String,
    /// Reserved account value that short-circuits dependent calls.
    #[serde(default = "default_auth_failed_marker")]
    pub auth_failed_marker: String,
}

fn default_account_key() -> String {
    DEFAULT_ACCOUNT_KEY.to_string()
}

fn default_auth_failed_marker() -> String {
    DEFAULT_AUTH_FAILED_MARKER.to_string()
}

impl BrokerProfile {
    /// Create a profile around an identity endpoint with default conventions.
    #[must_use]
    pub fn new(identity: EndpointSpec) -> Self {
        Self {
            identity,
            dependents: Vec::new(),
            account_key: default_account_key(),
            auth_failed_marker: default_auth_failed_marker(),
        }
    }

    /// Append a dependent endpoint.
    #[must_use]
    pub fn with_dependent(mut self, endpoint: EndpointSpec) -> Self {
        self.dependents.push(endpoint);
        self
    }

    /// Override the account column name.
    #[must_use]
    pub fn account_key(mut self, key: impl Into<String>) -> Self {
        self.account_key = key.into();
        self
    }

    /// Override the reserved auth-failure marker.
    #[must_use]
    pub fn auth_failed_marker(mut self, marker: impl Into<String>) -> Self {
        self.auth_failed_marker = marker.into();
        self
    }

    /// Parse and validate a profile from JSON.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the JSON is malformed or the profile fails [`validate`](Self::validate).
    pub fn from_json_str(json: &str) -> Result<Self, GridError> {
        let profile: Self = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    /// All endpoints, identity first.
    pub fn endpoints(&self) -> impl Iterator<Item = &EndpointSpec> {
        std::iter::once(&self.identity).chain(self.dependents.iter())
    }

    /// Find an endpoint by section name.
    #[must_use]
    pub fn endpoint(&self, section: &str) -> Option<&EndpointSpec> {
        self.endpoints().find(|e| e.section == section)
    }

    /// Check structural soundness.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an empty marker or account key, any endpoint with an
    /// empty method or schema, a section named after one of
    /// [`RESERVED_SECTION_NAMES`], or duplicate section names.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.auth_failed_marker.trim().is_empty() {
            return Err(GridError::InvalidArg(
                "auth_failed_marker must not be empty".to_string(),
            ));
        }
        if self.account_key.trim().is_empty() {
            return Err(GridError::InvalidArg(
                "account_key must not be empty".to_string(),
            ));
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for e in self.endpoints() {
            if e.method.trim().is_empty() {
                return Err(GridError::InvalidArg(format!(
                    "section {} has an empty method name",
                    e.section
                )));
            }
            if e.schema.is_empty() {
                return Err(GridError::InvalidArg(format!(
                    "section {} has an empty schema",
                    e.section
                )));
            }
            if RESERVED_SECTION_NAMES.contains(&e.section.as_str()) {
                return Err(GridError::InvalidArg(format!(
                    "section name {} is reserved",
                    e.section
                )));
            }
            if !seen.insert(e.section.as_str()) {
                return Err(GridError::InvalidArg(format!(
                    "duplicate section name: {}",
                    e.section
                )));
            }
        }
        Ok(())
    }
}
