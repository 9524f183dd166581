use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the rpcgrid workspace.
///
/// These errors never cross the orchestrator boundary: every endpoint call folds
/// them into a [`FetchResult`](crate::FetchResult) carrying an `error` string.
/// They exist so that the transport, decoder and configuration layers can report
/// failures as values instead of panicking.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GridError {
    /// A remote operation was rejected or failed inside the transport.
    #[error("{method} failed: {msg}")]
    Transport {
        /// Remote operation name that failed.
        method: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A transport session could not be established.
    #[error("session unavailable: {0}")]
    Session(String),

    /// The payload carried a recognizable encoding that could not be decoded.
    #[error("decode failed: {0}")]
    Decode(String),

    /// Invalid input argument or configuration.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A configured resource could not be found (e.g. an unknown section name).
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing resource, e.g. "section positions".
        what: String,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl GridError {
    /// Helper: build a `Transport` error with the remote method name and message.
    pub fn transport(method: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Transport {
            method: method.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }
}

impl From<serde_json::Error> for GridError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidArg(e.to_string())
    }
}
