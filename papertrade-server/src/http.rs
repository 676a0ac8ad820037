//! HTTP/JSON API.
//!
//! Routes:
//! - `GET /health`
//! - `GET /api/instrument?symbol=S&summary=B&statistics=B&tries=N`
//! - `GET /api/StockSummaryData?symbol=S` (summary record only)
//! - `GET /api/instruments?symbols=A,B,C&summary=B&statistics=B&tries=N`
//! - `POST /api/instruments` with a JSON array of symbols or `{"symbols": [...]}`

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use papertrade::{
    InstrumentResult, PaperTrade, PaperTradeError, RequestFlags, SummaryRecord,
};
use serde::{Deserialize, Serialize};

/// Shared state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    service: Arc<PaperTrade>,
}

impl AppState {
    /// Wrap a built service.
    #[must_use]
    pub fn new(service: PaperTrade) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Create the axum router with all endpoints.
#[must_use]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/instrument", get(get_instrument))
        .route("/api/StockSummaryData", get(stock_summary_data))
        .route("/api/instruments", get(get_instruments).post(post_instruments))
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

/// Query parameters shared by the instrument endpoints.
///
/// Kept as raw strings so malformed values produce the API's own error body.
#[derive(Debug, Default, Deserialize)]
pub struct InstrumentQuery {
    /// Single symbol.
    pub symbol: Option<String>,
    /// Comma-separated symbols (batch GET only).
    pub symbols: Option<String>,
    /// Fetch the summary record (default true).
    pub summary: Option<String>,
    /// Fetch the statistics record (default false).
    pub statistics: Option<String>,
    /// Attempts per requested kind.
    pub tries: Option<String>,
}

impl InstrumentQuery {
    fn flags(&self, service: &PaperTrade) -> Result<RequestFlags, PaperTradeError> {
        let want_summary = parse_flag("summary", self.summary.as_deref(), true)?;
        let want_statistics = parse_flag("statistics", self.statistics.as_deref(), false)?;
        let tries = parse_tries(self.tries.as_deref())?;
        service.flags(want_summary, want_statistics, tries)
    }

    fn symbol(&self) -> Result<&str, PaperTradeError> {
        match self.symbol.as_deref() {
            Some(s) if !s.trim().is_empty() => Ok(s),
            other => Err(PaperTradeError::invalid_symbol(other.unwrap_or_default())),
        }
    }
}

/// Parse a boolean query flag; `None` yields `default`.
///
/// # Errors
/// Returns `InvalidArg` for anything other than true/false/1/0/yes/no.
pub fn parse_flag(name: &str, raw: Option<&str>, default: bool) -> Result<bool, PaperTradeError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(PaperTradeError::invalid_arg(format!(
            "{name} must be true/false, got {raw:?}"
        ))),
    }
}

/// Parse the `tries` parameter. Zero is rejected later by `PaperTrade::flags`.
///
/// # Errors
/// Returns `InvalidArg` when `raw` is not a non-negative integer.
pub fn parse_tries(raw: Option<&str>) -> Result<Option<u32>, PaperTradeError> {
    raw.map(|r| {
        r.trim()
            .parse::<u32>()
            .map_err(|_| PaperTradeError::invalid_arg(format!("tries must be an integer, got {r:?}")))
    })
    .transpose()
}

async fn get_instrument(
    State(state): State<AppState>,
    Query(q): Query<InstrumentQuery>,
) -> Result<Json<InstrumentResult>, ApiError> {
    let symbol = q.symbol()?;
    let flags = q.flags(&state.service)?;
    tracing::info!(
        symbol,
        summary = flags.want_summary,
        statistics = flags.want_statistics,
        tries = flags.max_attempts.get(),
        "instrument request"
    );
    Ok(Json(state.service.aggregate_one(symbol, flags).await?))
}

async fn stock_summary_data(
    State(state): State<AppState>,
    Query(q): Query<InstrumentQuery>,
) -> Result<Json<SummaryRecord>, ApiError> {
    let symbol = q.symbol()?;
    let tries = parse_tries(q.tries.as_deref())?;
    let flags = state.service.flags(true, false, tries)?;
    tracing::info!(symbol, "stock summary request");
    let result = state.service.aggregate_one(symbol, flags).await?;
    result
        .summary
        .map(Json)
        .ok_or_else(|| ApiError(PaperTradeError::Other("summary missing from result".into())))
}

async fn get_instruments(
    State(state): State<AppState>,
    Query(q): Query<InstrumentQuery>,
) -> Result<Json<Vec<InstrumentResult>>, ApiError> {
    let symbols: Vec<&str> = q.symbols.as_deref().unwrap_or_default().split(',').collect();
    // Blank entries in a mixed list are dropped per symbol; an all-blank list is empty.
    if symbols.iter().all(|s| s.trim().is_empty()) {
        return Err(PaperTradeError::EmptyBatch.into());
    }
    let flags = q.flags(&state.service)?;
    run_batch(&state, &symbols, flags).await
}

/// Body accepted by `POST /api/instruments`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchBody {
    /// Bare JSON array of symbols.
    List(Vec<String>),
    /// Object with a `symbols` array.
    Object {
        /// Symbols to aggregate.
        symbols: Vec<String>,
    },
}

impl BatchBody {
    fn into_symbols(self) -> Vec<String> {
        match self {
            Self::List(s) | Self::Object { symbols: s } => s,
        }
    }
}

async fn post_instruments(
    State(state): State<AppState>,
    Query(q): Query<InstrumentQuery>,
    body: Bytes,
) -> Result<Json<Vec<InstrumentResult>>, ApiError> {
    let symbols = serde_json::from_slice::<BatchBody>(&body)
        .map_err(|e| PaperTradeError::invalid_arg(format!("malformed batch body: {e}")))?
        .into_symbols();
    let flags = q.flags(&state.service)?;
    run_batch(&state, &symbols, flags).await
}

async fn run_batch<S: AsRef<str>>(
    state: &AppState,
    symbols: &[S],
    flags: RequestFlags,
) -> Result<Json<Vec<InstrumentResult>>, ApiError> {
    tracing::info!(
        requested = symbols.len(),
        summary = flags.want_summary,
        statistics = flags.want_statistics,
        "batch request"
    );
    let report = state.service.aggregate_batch_report(symbols, flags).await?;
    for (raw, err) in &report.failures {
        tracing::debug!(symbol = %raw, code = err.code(), error = %err, "symbol omitted from batch");
    }
    Ok(Json(report.results))
}

/// Error envelope rendered for failed requests.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error details.
    pub error: ErrorDetail,
}

/// Stable code plus human-readable message.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Kebab-case error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

/// API error type mapping engine errors onto HTTP statuses.
#[derive(Debug)]
pub struct ApiError(pub PaperTradeError);

impl ApiError {
    /// HTTP status for the wrapped error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        if self.0.is_client_error() {
            return StatusCode::BAD_REQUEST;
        }
        match self.0 {
            PaperTradeError::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PaperTradeError> for ApiError {
    fn from(error: PaperTradeError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %self.0, "request failed");
        }
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.0.code().to_string(),
                message: self.0.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
