//! Result envelopes, errors and broker profiles shared across the rpcgrid crates.
#![warn(missing_docs)]

mod config;
mod error;
mod result;

pub use config::{
    BrokerProfile, DEFAULT_ACCOUNT_KEY, DEFAULT_AUTH_FAILED_MARKER, EndpointSpec, ParserKind,
    RESERVED_SECTION_NAMES,
};
pub use error::GridError;
pub use result::{
    AUTH_FAILED_LABEL, AggregateResult, DataSource, FailureKind, FetchResult,
    NOT_AUTHORIZED_LABEL,
};
