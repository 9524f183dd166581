use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use rpcgrid_core::{DataSource, EndpointSpec, FailureKind, FetchResult};

/// Label placed in the first cell of a placeholder row for non-auth failures.
pub const ERROR_LABEL: &str = "Error";

/// Label placed in the first cell of a placeholder row for unparseable payloads.
pub const PARSE_ERROR_LABEL: &str = "Parse Error";

/// Await `fut`, turning a panic into a failed section instead of unwinding
/// through the join that polls it.
pub async fn settle<F>(endpoint: &EndpointSpec, fut: F) -> FetchResult
where
    F: std::future::Future<Output = FetchResult>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => {
            let msg = panic_message(payload.as_ref());
            #[cfg(feature = "tracing")]
            tracing::warn!(section = %endpoint.section, panic = %msg, "endpoint call panicked");
            FetchResult::failed(
                endpoint.schema.clone(),
                FailureKind::Transport,
                ERROR_LABEL,
                format!("Failed to fetch {}: {msg}", endpoint.section),
            )
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "call panicked".to_string()
    }
}

/// Overall status once identity resolution has succeeded.
///
/// Rules:
/// - identity failed → `ErrorAuth`.
/// - every dependent section clean → `Api`.
/// - otherwise → `ApiWithErrors`.
pub fn aggregate_status(identity_resolved: bool, dependents: &[FetchResult]) -> DataSource {
    if !identity_resolved {
        DataSource::ErrorAuth
    } else if dependents.iter().all(FetchResult::is_ok) {
        DataSource::Api
    } else {
        DataSource::ApiWithErrors
    }
}
