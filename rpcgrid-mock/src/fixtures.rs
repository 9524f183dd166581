//! Deterministic broker payloads shaped like real endpoint responses.

use serde_json::{Value, json};

/// Identity payload: header row plus two accounts.
pub const ACCOUNT_INFO: &str = "AccountCode;Name;Currency|U1234567;Jane Doe;USD|U7654321;Jane Doe IRA;USD";

/// Positions with a ragged last row.
pub const POSITIONS: &str = "Symbol;Quantity;AvgPrice;MarketValue|AAPL;10;150.25;1890.10|MSFT;5;310.00;null|TSLA;2";

/// Cash balances with an extra trailing column.
pub const BALANCES: &str = "Currency;Cash;Settled|USD;1200.50;1100.00;pending|EUR;0;0";

/// Transposed market statistics report.
pub const MARKET_STATS: &str =
    "Market Name;NYSE;NASDAQ|Volume;1,204,331;998,120|Advancers;1650;2011|Decliners;1290;1807";

/// Orders endpoint with nothing to report.
pub const NO_ORDERS: &str = "No records found";

/// Sentinel text returned for unauthorized sessions.
pub const NOT_AUTHORIZED: &str = "Not Authorized";

/// Wrap `payload` the way SOAP-style transports return it: `[{ "<method>Result": payload }]`.
#[must_use]
pub fn soap_wrapped(method: &str, payload: impl Into<Value>) -> Value {
    let mut obj = serde_json::Map::new();
    obj.insert(format!("{method}Result"), payload.into());
    json!([Value::Object(obj)])
}

/// Wrap `payload` as `[{ "return": payload }]`.
#[must_use]
pub fn return_wrapped(payload: impl Into<Value>) -> Value {
    json!([{ "return": payload.into() }])
}
