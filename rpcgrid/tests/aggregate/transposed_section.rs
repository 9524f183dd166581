use rpcgrid::{DataSource, EndpointSpec, ParserKind};
use rpcgrid_mock::fixtures;

use crate::helpers::{cells, grid_with, identity_endpoint, script_happy_path};

fn profile() -> rpcgrid::BrokerProfile {
    rpcgrid::BrokerProfile::new(identity_endpoint()).with_dependent(
        EndpointSpec::new("marketStats", "GetMarketStats", ["Metric", "NYSE", "NASDAQ"])
            .parser(ParserKind::Transposed),
    )
}

#[tokio::test]
async fn transposed_report_is_pivoted_into_metric_rows() {
    let (grid, controller) = grid_with(profile());
    script_happy_path(&controller).await;
    controller
        .returns("GetMarketStats", fixtures::MARKET_STATS)
        .await;

    let report = grid.get_all_account_details().await;

    assert_eq!(report.data_source, DataSource::Api);
    let stats = report.section("marketStats").expect("stats");
    assert_eq!(
        stats.data,
        vec![
            cells(&["Volume", "1,204,331", "998,120"]),
            cells(&["Advancers", "1650", "2011"]),
            cells(&["Decliners", "1290", "1807"]),
        ]
    );
}

#[tokio::test]
async fn transposed_endpoint_falls_back_to_delimited_rows() {
    let (grid, controller) = grid_with(profile());
    script_happy_path(&controller).await;
    controller
        .returns("GetMarketStats", "Metric;NYSE;NASDAQ|Volume;10;20")
        .await;

    let report = grid.get_all_account_details().await;

    let stats = report.section("marketStats").expect("stats");
    assert!(stats.is_ok());
    assert_eq!(stats.data, vec![cells(&["Volume", "10", "20"])]);
}
