use serde_json::{Map, Value, json};

use super::object;

pub fn by_symbol(s: &str) -> Option<Map<String, Value>> {
    match s {
        "AAPL" => stats(1.29, 15_500_000_000, 6.43, 29.5),
        "MSFT" => stats(0.89, 7_430_000_000, 11.80, 35.6),
        "NVDA" => stats(1.68, 24_600_000_000, 1.19, 60.2),
        "GOOGL" => stats(1.05, 12_300_000_000, 5.80, 25.9),
        "KO" => stats(0.59, 4_310_000_000, 2.47, 24.3),
        "PEP" => stats(0.54, 1_370_000_000, 6.56, 25.9),
        "TIMEOUT" => stats(0.0, 1, 0.0, 0.0),
        _ => None,
    }
}

fn stats(
    beta: f64,
    shares_outstanding: u64,
    trailing_eps: f64,
    forward_pe: f64,
) -> Option<Map<String, Value>> {
    object(json!({
        "beta": beta,
        "sharesOutstanding": shares_outstanding,
        "trailingEps": trailing_eps,
        "forwardPE": forward_pe,
    }))
}
