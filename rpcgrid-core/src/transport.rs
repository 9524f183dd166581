//! Seams to the remote side: the RPC transport and the session factory that opens it.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::payload::RawPayload;
use rpcgrid_types::GridError;

/// An authenticated RPC client exposing named asynchronous operations.
///
/// Implementations own timeouts, retries and credentials; the pipeline calls each
/// operation at most once and treats any `Err` as a failed section.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Invoke the remote operation `method` with a parameter map.
    async fn call(&self, method: &str, params: Map<String, Value>)
    -> Result<RawPayload, GridError>;
}

/// Opens transport sessions.
///
/// A failure here is the only way an aggregate request ends up with the
/// `error` data source.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Establish a session for one aggregate request.
    async fn connect(&self) -> Result<Arc<dyn RpcTransport>, GridError>;
}

/// Session factory that hands out an already-connected transport.
pub struct StaticSession {
    transport: Arc<dyn RpcTransport>,
}

impl StaticSession {
    /// Wrap an existing transport.
    #[must_use]
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl SessionFactory for StaticSession {
    async fn connect(&self) -> Result<Arc<dyn RpcTransport>, GridError> {
        Ok(Arc::clone(&self.transport))
    }
}
