// Shared fixtures for the orchestrator tests: a four-section profile wired to
// the scripted mock transport.
use std::sync::Arc;

use rpcgrid::{BrokerProfile, EndpointSpec, FetchResult, RpcGrid};
use rpcgrid_mock::{MockController, MockTransport, fixtures};

pub const IDENTITY: &str = "accountInfo";
pub const POSITIONS: &str = "positions";
pub const BALANCES: &str = "balances";
pub const ORDERS: &str = "orders";

pub const PRIMARY_ACCOUNT: &str = "U1234567";

pub fn identity_endpoint() -> EndpointSpec {
    EndpointSpec::new(IDENTITY, "GetAccountInfo", ["AccountCode", "Name", "Currency"])
}

pub fn positions_endpoint() -> EndpointSpec {
    EndpointSpec::new(
        POSITIONS,
        "GetPositions",
        ["Symbol", "Quantity", "AvgPrice", "MarketValue"],
    )
    .account_param("accountNumber")
}

pub fn profile() -> BrokerProfile {
    BrokerProfile::new(identity_endpoint())
        .with_dependent(positions_endpoint())
        .with_dependent(
            EndpointSpec::new(BALANCES, "GetBalances", ["Currency", "Cash", "Settled"])
                .account_param("accountNumber"),
        )
        .with_dependent(
            EndpointSpec::new(ORDERS, "GetOrders", ["OrderId", "Symbol", "Side", "Quantity"])
                .account_param("accountNumber")
                .param("status", "open"),
        )
}

/// Build a grid over a fresh mock and return the controller used to script it.
pub fn grid_with(profile: BrokerProfile) -> (RpcGrid, MockController) {
    let (mock, controller) = MockTransport::new_with_controller();
    let grid = RpcGrid::builder()
        .transport(mock)
        .profile(profile)
        .build()
        .expect("valid profile");
    (grid, controller)
}

pub fn grid() -> (RpcGrid, MockController) {
    grid_with(profile())
}

/// Script every endpoint of [`profile`] with a well-formed payload.
pub async fn script_happy_path(controller: &MockController) {
    controller.returns("GetAccountInfo", fixtures::ACCOUNT_INFO).await;
    controller.returns("GetPositions", fixtures::POSITIONS).await;
    controller.returns("GetBalances", fixtures::BALANCES).await;
    controller.returns("GetOrders", fixtures::NO_ORDERS).await;
}

pub fn cells(row: &[&str]) -> Vec<Option<String>> {
    row.iter()
        .map(|c| {
            if *c == "null" {
                None
            } else {
                Some((*c).to_string())
            }
        })
        .collect()
}

#[allow(dead_code)]
pub fn assert_placeholder(result: &FetchResult, label: &str) {
    assert_eq!(result.data.len(), 1, "placeholder row expected: {result:?}");
    assert_eq!(result.data[0].len(), result.headers.len());
    assert_eq!(result.data[0][0].as_deref(), Some(label));
    assert!(result.data[0][1..].iter().all(Option::is_none));
}
