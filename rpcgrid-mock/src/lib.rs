//! Scripted in-memory transport for rpcgrid tests and examples.
//!
//! [`MockTransport`] defers every call to behaviors registered per method through
//! a [`MockController`], and records each call so tests can assert exactly which
//! remote operations were issued.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use rpcgrid_core::{GridError, RawPayload, RpcTransport, SessionFactory};

pub mod fixtures;

/// Instruction for how a method should behave.
#[derive(Clone, Debug)]
pub enum MockBehavior {
    /// Return the provided payload immediately.
    Return(RawPayload),
    /// Fail immediately with the provided error.
    Fail(GridError),
    /// Sleep, then return the payload.
    Delay(Duration, RawPayload),
    /// Panic inside the call (simulates a defect in a transport implementation).
    Panic(String),
}

/// One recorded remote call.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedCall {
    /// Operation name.
    pub method: String,
    /// Parameters as received.
    pub params: Map<String, Value>,
}

#[derive(Default)]
struct InternalState {
    rules: HashMap<String, MockBehavior>,
    calls: Vec<RecordedCall>,
}

/// Controller handle used by tests to drive the mock transport from the outside.
#[derive(Clone)]
pub struct MockController {
    state: Arc<Mutex<InternalState>>,
}

impl MockController {
    /// Set the behavior for calls to `method`.
    pub async fn set_behavior(&self, method: &str, behavior: MockBehavior) {
        let mut guard = self.state.lock().await;
        guard.rules.insert(method.to_string(), behavior);
    }

    /// Shorthand for `set_behavior(method, MockBehavior::Return(payload.into()))`.
    pub async fn returns(&self, method: &str, payload: impl Into<RawPayload>) {
        self.set_behavior(method, MockBehavior::Return(payload.into()))
            .await;
    }

    /// Shorthand for a transport failure on `method`.
    pub async fn fails(&self, method: &str, msg: &str) {
        self.set_behavior(method, MockBehavior::Fail(GridError::transport(method, msg)))
            .await;
    }

    /// Copy of every call received so far, in arrival order.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().await.calls.clone()
    }

    /// Number of calls received for `method`.
    pub async fn call_count(&self, method: &str) -> usize {
        let guard = self.state.lock().await;
        guard.calls.iter().filter(|c| c.method == method).count()
    }

    /// Number of calls received for any method.
    pub async fn total_calls(&self) -> usize {
        self.state.lock().await.calls.len()
    }

    /// Clear all configured behaviors and the call log.
    pub async fn clear_all(&self) {
        let mut guard = self.state.lock().await;
        guard.rules.clear();
        guard.calls.clear();
    }
}

/// A transport that defers all behavior to an external controller.
pub struct MockTransport {
    state: Arc<Mutex<InternalState>>,
}

impl MockTransport {
    /// Create a new mock transport and its controller.
    #[must_use]
    pub fn new_with_controller() -> (Arc<Self>, MockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = MockController {
            state: Arc::clone(&state),
        };
        (Arc::new(Self { state }), controller)
    }
}

#[async_trait]
impl RpcTransport for MockTransport {
    async fn call(
        &self,
        method: &str,
        params: Map<String, Value>,
    ) -> Result<RawPayload, GridError> {
        // Record and snapshot the behavior without holding the lock across await points
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.calls.push(RecordedCall {
                method: method.to_string(),
                params,
            });
            guard.rules.get(method).cloned()
        };

        match behavior {
            Some(MockBehavior::Return(p)) => Ok(p),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Delay(d, p)) => {
                tokio::time::sleep(d).await;
                Ok(p)
            }
            Some(MockBehavior::Panic(msg)) => panic!("{msg}"),
            None => Err(GridError::transport(method, "no mock behavior configured")),
        }
    }
}

/// Session factory that either hands out a fixed transport or always fails.
pub struct MockSessionFactory {
    outcome: Result<Arc<dyn RpcTransport>, GridError>,
    connects: AtomicUsize,
}

impl MockSessionFactory {
    /// Always connect to `transport`.
    #[must_use]
    pub fn connected(transport: Arc<dyn RpcTransport>) -> Self {
        Self {
            outcome: Ok(transport),
            connects: AtomicUsize::new(0),
        }
    }

    /// Always fail with `GridError::Session(msg)`.
    #[must_use]
    pub fn failing(msg: &str) -> Self {
        Self {
            outcome: Err(GridError::Session(msg.to_string())),
            connects: AtomicUsize::new(0),
        }
    }

    /// Number of connection attempts so far.
    #[must_use]
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionFactory for MockSessionFactory {
    async fn connect(&self) -> Result<Arc<dyn RpcTransport>, GridError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}
