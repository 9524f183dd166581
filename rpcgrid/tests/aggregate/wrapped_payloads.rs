use rpcgrid::DataSource;
use rpcgrid_mock::fixtures;
use serde_json::json;

use crate::helpers::{BALANCES, IDENTITY, POSITIONS, grid, script_happy_path};

#[tokio::test]
async fn soap_and_buffer_envelopes_are_unwrapped() {
    let (grid, controller) = grid();
    script_happy_path(&controller).await;
    controller
        .returns(
            "GetAccountInfo",
            fixtures::soap_wrapped("GetAccountInfo", fixtures::ACCOUNT_INFO),
        )
        .await;
    controller
        .returns(
            "GetPositions",
            fixtures::return_wrapped(json!({
                "type": "Buffer",
                "data": fixtures::POSITIONS.as_bytes(),
            })),
        )
        .await;

    let report = grid.get_all_account_details().await;

    assert_eq!(report.data_source, DataSource::Api);
    assert_eq!(
        report.section(IDENTITY).map(|s| s.data.len()),
        Some(2)
    );
    let positions = report.section(POSITIONS).expect("positions");
    assert_eq!(positions.data.len(), 3);
    assert_eq!(positions.data[0][0].as_deref(), Some("AAPL"));
}

#[tokio::test]
async fn raw_byte_payloads_are_decoded() {
    let (grid, controller) = grid();
    script_happy_path(&controller).await;
    controller
        .returns("GetBalances", fixtures::BALANCES.as_bytes().to_vec())
        .await;

    let report = grid.get_all_account_details().await;

    let balances = report.section(BALANCES).expect("balances");
    assert!(balances.is_ok());
    assert_eq!(balances.data.len(), 2);
}
