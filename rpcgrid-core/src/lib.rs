//! rpcgrid-core
//!
//! The pure half of the rpcgrid pipeline: everything between the bytes a broker
//! endpoint returns and the rows the orchestrator remaps.
//!
//! - `payload`: the opaque remote-call result and transport-envelope unwrapping.
//! - `decode`: gzip / Base64 / plain-text detection and decoding.
//! - `parse`: delimited and transposed table parsers with in-band sentinel handling.
//! - `accounts`: account identifiers from identity rows.
//! - `remap`: projection of parsed rows onto a fixed target schema.
//! - `transport`: the `RpcTransport` and `SessionFactory` traits.
//!
//! Async runtime (Tokio)
//! ---------------------
//! Gunzip is performed with `async-compression`'s Tokio adapters, so `decode`
//! is `async` and must run under a Tokio 1.x runtime. Parsing and remapping are
//! synchronous.
#![warn(missing_docs)]

/// Account identifier extraction.
pub mod accounts;
/// Payload decoding.
pub mod decode;
/// Text-to-row parsers.
pub mod parse;
/// Raw payloads and envelope unwrapping.
pub mod payload;
/// Schema remapping.
pub mod remap;
/// In-band sentinel phrases.
pub mod sentinel;
/// Transport and session traits.
pub mod transport;

pub use accounts::{extract_account_numbers, primary_account};
pub use decode::{PayloadEncoding, classify_bytes, classify_text, decode, decode_response};
pub use parse::{
    ParseFailure, ParseOutcome, ParsedTable, StructuredRow, parse_delimited, parse_transposed,
    parse_with,
};
pub use payload::{RawPayload, extract_payload};
pub use remap::remap_rows;
pub use transport::{RpcTransport, SessionFactory, StaticSession};

pub use rpcgrid_types::*;
