use rpcgrid::{BrokerProfile, RpcGrid};
use rpcgrid_mock::{MockBehavior, MockTransport, fixtures};
use tracing_subscriber::fmt::format::FmtSpan;

const PROFILE: &str = r#"{
    "identity": {
        "section": "accountInfo",
        "method": "GetAccountInfo",
        "schema": ["AccountCode", "Name", "Currency"]
    },
    "dependents": [
        {
            "section": "positions",
            "method": "GetPositions",
            "account_param": "accountNumber",
            "schema": ["Symbol", "Quantity", "AvgPrice", "MarketValue"]
        },
        {
            "section": "balances",
            "method": "GetBalances",
            "account_param": "accountNumber",
            "schema": ["Currency", "Cash", "Settled"]
        },
        {
            "section": "orders",
            "method": "GetOrders",
            "account_param": "accountNumber",
            "params": { "status": "open" },
            "schema": ["OrderId", "Symbol", "Side", "Quantity"]
        },
        {
            "section": "marketStats",
            "method": "GetMarketStats",
            "parser": "transposed",
            "schema": ["Metric", "NYSE", "NASDAQ"]
        }
    ]
}"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=debug cargo run --example mock_account_details --features tracing
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE)
        .try_init();

    // 1. Script the mock broker. Orders fail to show a partial report.
    let (mock, controller) = MockTransport::new_with_controller();
    controller
        .returns(
            "GetAccountInfo",
            fixtures::soap_wrapped("GetAccountInfo", fixtures::ACCOUNT_INFO),
        )
        .await;
    controller.returns("GetPositions", fixtures::POSITIONS).await;
    controller.returns("GetBalances", fixtures::BALANCES).await;
    controller
        .set_behavior(
            "GetOrders",
            MockBehavior::Fail(rpcgrid::GridError::transport("GetOrders", "gateway timeout")),
        )
        .await;
    controller
        .returns("GetMarketStats", fixtures::MARKET_STATS)
        .await;

    // 2. Build the orchestrator from a JSON profile.
    let grid = RpcGrid::builder()
        .transport(mock)
        .profile(BrokerProfile::from_json_str(PROFILE)?)
        .build()?;

    // 3. Fetch everything and print the report.
    let report = grid.get_all_account_details().await;
    println!("{}", serde_json::to_string_pretty(&report)?);
    println!(
        "{} remote calls, data source {}",
        controller.total_calls().await,
        report.data_source
    );

    Ok(())
}
