use std::sync::Arc;

use rpcgrid::{AUTH_FAILED_LABEL, FailureKind, GridError, RpcGrid, RpcTransport};
use rpcgrid_mock::{MockSessionFactory, MockTransport, fixtures};
use serde_json::Value;

use crate::helpers::{POSITIONS, cells, grid, positions_endpoint, profile};

#[tokio::test]
async fn fetch_section_calls_one_endpoint() {
    let (grid, controller) = grid();
    controller.returns("GetPositions", fixtures::POSITIONS).await;

    let positions = grid
        .fetch_section(POSITIONS, Some("U42"))
        .await
        .expect("known section");

    assert!(positions.is_ok());
    assert_eq!(positions.data[0], cells(&["AAPL", "10", "150.25", "1890.10"]));
    let calls = controller.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].params.get("accountNumber"), Some(&Value::from("U42")));
}

#[tokio::test]
async fn fetch_section_rejects_unknown_names() {
    let (grid, controller) = grid();
    let err = grid.fetch_section("nope", None).await.expect_err("unknown");
    assert_eq!(err, GridError::not_found("section nope"));
    assert_eq!(controller.total_calls().await, 0);
}

#[tokio::test]
async fn marker_account_skips_the_remote_call() {
    let (grid, controller) = grid();
    controller.returns("GetPositions", fixtures::POSITIONS).await;

    let positions = grid
        .fetch_section(POSITIONS, Some("AUTH_FAILED"))
        .await
        .expect("known section");

    assert_eq!(positions.error.as_deref(), Some(AUTH_FAILED_LABEL));
    assert_eq!(positions.kind(), Some(FailureKind::Auth));
    assert_eq!(controller.total_calls().await, 0);
}

#[tokio::test]
async fn fetch_section_reports_session_failures_in_band() {
    let grid = RpcGrid::builder()
        .session_factory(Arc::new(MockSessionFactory::failing("expired")))
        .profile(profile())
        .build()
        .expect("valid");

    let positions = grid
        .fetch_section(POSITIONS, Some("U1"))
        .await
        .expect("known section");

    assert_eq!(positions.kind(), Some(FailureKind::Session));
    assert_eq!(positions.headers.len(), 4);
}

#[tokio::test]
async fn standard_fetch_uses_the_given_transport() {
    let (grid, _unused) = grid();
    let (other, controller) = MockTransport::new_with_controller();
    controller.returns("GetPositions", fixtures::NO_ORDERS).await;

    let transport: Arc<dyn RpcTransport> = other;
    let result = grid
        .standard_fetch(transport.as_ref(), &positions_endpoint(), Some("U1"))
        .await;

    assert!(result.is_ok());
    assert!(result.data.is_empty());
    assert_eq!(controller.call_count("GetPositions").await, 1);
}
