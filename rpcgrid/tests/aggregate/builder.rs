use rpcgrid::{BrokerProfile, GridError, RpcGrid};
use rpcgrid_mock::MockTransport;

use crate::helpers::{identity_endpoint, positions_endpoint, profile};

#[test]
fn build_requires_a_transport() {
    let err = RpcGrid::builder()
        .profile(profile())
        .build()
        .err()
        .expect("missing transport");
    assert!(matches!(err, GridError::InvalidArg(_)));
}

#[test]
fn build_requires_a_profile() {
    let (mock, _controller) = MockTransport::new_with_controller();
    let err = RpcGrid::builder()
        .transport(mock)
        .build()
        .err()
        .expect("missing profile");
    assert!(matches!(err, GridError::InvalidArg(_)));
}

#[test]
fn build_validates_the_profile() {
    let (mock, _controller) = MockTransport::new_with_controller();
    let dup = BrokerProfile::new(identity_endpoint())
        .with_dependent(positions_endpoint())
        .with_dependent(positions_endpoint());
    let err = RpcGrid::builder()
        .transport(mock)
        .profile(dup)
        .build()
        .err()
        .expect("duplicate sections");
    assert_eq!(
        err,
        GridError::InvalidArg("duplicate section name: positions".to_string())
    );
}

#[test]
fn profile_is_exposed_after_build() {
    let (mock, _controller) = MockTransport::new_with_controller();
    let grid = RpcGrid::builder()
        .transport(mock)
        .profile(profile().auth_failed_marker("NO_SESSION"))
        .build()
        .expect("valid");
    assert_eq!(grid.profile().auth_failed_marker, "NO_SESSION");
    assert_eq!(grid.profile().dependents.len(), 3);
}

#[tokio::test]
async fn json_profile_drives_the_aggregate() {
    let profile = BrokerProfile::from_json_str(
        r#"{
            "identity": {
                "section": "who",
                "method": "GetAccountInfo",
                "schema": ["AccountCode"]
            },
            "dependents": [{
                "section": "cash",
                "method": "GetBalances",
                "account_param": "acct",
                "schema": ["Currency", "Amount"],
                "aliases": { "Cash": "Amount" }
            }]
        }"#,
    )
    .expect("profile");
    let (mock, controller) = MockTransport::new_with_controller();
    crate::helpers::script_happy_path(&controller).await;
    let grid = RpcGrid::builder()
        .transport(mock)
        .profile(profile)
        .build()
        .expect("valid");

    let report = grid.get_all_account_details().await;

    assert_eq!(report.data_source, rpcgrid::DataSource::Api);
    let cash = report.section("cash").expect("cash");
    assert_eq!(cash.headers, ["Currency", "Amount"]);
    assert_eq!(cash.data[0], crate::helpers::cells(&["USD", "1200.50"]));
}
