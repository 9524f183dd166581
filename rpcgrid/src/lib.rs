//! rpcgrid turns broker RPC responses into fixed-shape account reports.
//!
//! Overview
//! - Resolves the account identity through one endpoint, then fans out to every
//!   dependent endpoint of a [`BrokerProfile`] concurrently.
//! - Decodes each payload (raw bytes, gzip, Base64, plain text), parses the
//!   delimited table inside it and remaps the rows into the endpoint's schema.
//! - Keeps "no data", "not authorized", "parse error" and "rows" apart even though
//!   brokers signal all four in-band.
//!
//! Key behaviors
//! - Every section of an [`AggregateResult`] always has its schema as `headers`.
//!   Failed sections carry one labeled placeholder row and an `error` string.
//! - A failed identity lookup short-circuits every dependent call; the report's
//!   data source is then `error_auth`.
//! - Dependent calls are isolated from each other, including panics. One bad
//!   endpoint only downgrades the report to `api_with_errors`.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use rpcgrid::{BrokerProfile, EndpointSpec, RpcGrid};
//!
//! let profile = BrokerProfile::new(EndpointSpec::new(
//!     "accountInfo",
//!     "GetAccountInfo",
//!     ["AccountCode", "Name", "Currency"],
//! ))
//! .with_dependent(
//!     EndpointSpec::new("positions", "GetPositions", ["Symbol", "Quantity"])
//!         .account_param("accountNumber"),
//! );
//!
//! let grid = RpcGrid::builder()
//!     .transport(Arc::new(MyTransport::connect().await?))
//!     .profile(profile)
//!     .build()?;
//! let report = grid.get_all_account_details().await;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```
//!
//! See `rpcgrid/examples/` for a runnable demonstration against the mock transport.
#![warn(missing_docs)]

pub(crate) mod core;
mod router;

pub use core::{RpcGrid, RpcGridBuilder};
pub use router::util::{ERROR_LABEL, PARSE_ERROR_LABEL, aggregate_status, settle};

// Re-export core types for convenience
pub use rpcgrid_core::{
    AUTH_FAILED_LABEL, AggregateResult, BrokerProfile, DataSource, EndpointSpec, FailureKind,
    FetchResult, GridError, NOT_AUTHORIZED_LABEL, ParseOutcome, ParserKind, RawPayload,
    RpcTransport, SessionFactory, StaticSession,
};
