use rpcgrid::DataSource;
use serde_json::Value;

use crate::helpers::{
    BALANCES, IDENTITY, ORDERS, POSITIONS, PRIMARY_ACCOUNT, cells, grid, script_happy_path,
};

#[tokio::test]
async fn all_sections_clean_reports_api() {
    let (grid, controller) = grid();
    script_happy_path(&controller).await;

    let report = grid.get_all_account_details().await;

    assert_eq!(report.data_source, DataSource::Api);
    assert_eq!(report.failed_sections().count(), 0);

    let identity = report.section(IDENTITY).expect("identity section");
    assert_eq!(identity.headers, ["AccountCode", "Name", "Currency"]);
    assert_eq!(
        identity.data,
        vec![
            cells(&["U1234567", "Jane Doe", "USD"]),
            cells(&["U7654321", "Jane Doe IRA", "USD"]),
        ]
    );

    let positions = report.section(POSITIONS).expect("positions section");
    assert_eq!(
        positions.data,
        vec![
            cells(&["AAPL", "10", "150.25", "1890.10"]),
            cells(&["MSFT", "5", "310.00", "null"]),
            cells(&["TSLA", "2", "null", "null"]),
        ]
    );

    // the overflow cell is not part of the schema
    let balances = report.section(BALANCES).expect("balances section");
    assert_eq!(
        balances.data,
        vec![
            cells(&["USD", "1200.50", "1100.00"]),
            cells(&["EUR", "0", "0"]),
        ]
    );

    let orders = report.section(ORDERS).expect("orders section");
    assert!(orders.data.is_empty());
    assert!(orders.error.is_none());
    assert_eq!(orders.headers.len(), 4);

    // every dependent call carried the primary account
    for call in controller.calls().await {
        if call.method == "GetAccountInfo" {
            assert!(call.params.get("accountNumber").is_none());
        } else {
            assert_eq!(
                call.params.get("accountNumber"),
                Some(&Value::from(PRIMARY_ACCOUNT)),
                "{}",
                call.method
            );
        }
    }
    assert_eq!(controller.total_calls().await, 4);
}

#[tokio::test]
async fn sections_keep_profile_order_and_serialize_flat() {
    let (grid, controller) = grid();
    script_happy_path(&controller).await;

    let report = grid.get_all_account_details().await;
    let names: Vec<&str> = report.sections.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, [IDENTITY, POSITIONS, BALANCES, ORDERS]);

    let json = serde_json::to_value(&report).expect("serialize");
    assert_eq!(json["dataSource"], "api");
    assert!(json["timestamp"].as_str().is_some_and(|t| t.ends_with('Z')));
    assert_eq!(json[ORDERS]["data"], serde_json::json!([]));
    assert!(json[ORDERS].get("error").is_none());
    assert_eq!(json[POSITIONS]["data"][2][2], Value::Null);
}

#[tokio::test]
async fn static_params_are_sent_with_the_account() {
    let (grid, controller) = grid();
    script_happy_path(&controller).await;

    grid.get_all_account_details().await;

    let calls = controller.calls().await;
    let orders = calls
        .iter()
        .find(|c| c.method == "GetOrders")
        .expect("orders call");
    assert_eq!(orders.params.get("status"), Some(&Value::from("open")));
    assert_eq!(
        orders.params.get("accountNumber"),
        Some(&Value::from(PRIMARY_ACCOUNT))
    );
}
