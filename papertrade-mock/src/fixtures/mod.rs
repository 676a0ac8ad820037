use serde_json::{Map, Value};

pub mod statistics;
pub mod summary;

pub const SYMBOLS: &[&str] = &["AAPL", "MSFT", "NVDA", "GOOGL", "KO", "PEP", "TIMEOUT"];

fn object(v: Value) -> Option<Map<String, Value>> {
    match v {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
