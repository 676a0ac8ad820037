use serde_json::{Map, Value, json};

use super::object;

pub fn by_symbol(s: &str) -> Option<Map<String, Value>> {
    match s {
        "AAPL" => q(190.00, 188.00, 187.50, 191.20, 0.0051, 3_000_000_000_000),
        "MSFT" => q(420.00, 418.00, 416.10, 423.00, 0.0071, 3_100_000_000_000),
        "NVDA" => q(1000.00, 990.00, 985.00, 1010.00, 0.0002, 2_500_000_000_000),
        "GOOGL" => q(150.00, 148.00, 147.20, 151.00, 0.0050, 1_900_000_000_000),
        "KO" => q(60.00, 59.50, 59.40, 60.30, 0.0310, 260_000_000_000),
        "PEP" => q(170.00, 168.00, 167.60, 171.10, 0.0290, 235_000_000_000),
        "TIMEOUT" => q(1.00, 1.00, 1.00, 1.00, 0.0, 1),
        _ => None,
    }
}

fn q(
    price: f64,
    previous_close: f64,
    day_low: f64,
    day_high: f64,
    dividend_yield: f64,
    market_cap: u64,
) -> Option<Map<String, Value>> {
    object(json!({
        "currency": "USD",
        "regularMarketPrice": price,
        "previousClose": previous_close,
        "dayLow": day_low,
        "dayHigh": day_high,
        "dividendYield": dividend_yield,
        "marketCap": market_cap,
    }))
}
