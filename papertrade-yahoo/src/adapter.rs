use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use papertrade_core::PaperTradeError;
use reqwest::StatusCode;
use serde_json::Value;
use tokio::sync::Mutex;
use url::Url;

pub(crate) const CONNECTOR: &str = "papertrade-yahoo";

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com/";
/// Page that hands out the session cookie the crumb is bound to.
pub const COOKIE_URL: &str = "https://fc.yahoo.com/";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// `quoteSummary` abstraction (so we can inject mocks in tests).
#[async_trait]
pub trait QuoteSummaryApi: Send + Sync {
    /// Fetch one `quoteSummary` module for `symbol` and return its JSON object.
    async fn module(&self, symbol: &str, module: &str) -> Result<Value, PaperTradeError>;
}

impl dyn QuoteSummaryApi {
    /// Build an adapter from a closure taking `(symbol, module)`.
    pub fn from_fn<F>(f: F) -> Arc<dyn QuoteSummaryApi>
    where
        F: Send + Sync + 'static + Fn(String, String) -> Result<Value, PaperTradeError>,
    {
        struct FnSummary<F>(F);
        #[async_trait]
        impl<F> QuoteSummaryApi for FnSummary<F>
        where
            F: Send + Sync + 'static + Fn(String, String) -> Result<Value, PaperTradeError>,
        {
            async fn module(&self, symbol: &str, module: &str) -> Result<Value, PaperTradeError> {
                (self.0)(symbol.to_string(), module.to_string())
            }
        }
        Arc::new(FnSummary(f))
    }
}

/// Production adapter that talks to the Yahoo Finance HTTP API.
pub struct HttpAdapter {
    http: reqwest::Client,
    base: Url,
    use_crumb: bool,
    cookie_url: Option<&'static str>,
    crumb: Mutex<Option<String>>,
}

impl HttpAdapter {
    /// Construct an adapter against `base`.
    ///
    /// When `use_crumb` is set, the first request performs the crumb handshake and
    /// caches the crumb for later calls. The session cookie page is only visited for
    /// the default host.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unparseable base URL and `Other` if the HTTP
    /// client cannot be initialized.
    pub fn new(
        base: &str,
        use_crumb: bool,
        timeout: Option<Duration>,
        user_agent: Option<&str>,
    ) -> Result<Self, PaperTradeError> {
        let cookie_url = (base == DEFAULT_BASE_URL).then_some(COOKIE_URL);
        let mut base = Url::parse(base)
            .map_err(|e| PaperTradeError::invalid_arg(format!("invalid base url {base:?}: {e}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
            .cookie_store(true);
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let http = builder
            .build()
            .map_err(|e| PaperTradeError::Other(format!("http client init: {e}")))?;

        Ok(Self {
            http,
            base,
            use_crumb,
            cookie_url,
            crumb: Mutex::new(None),
        })
    }

    /// Adapter for the public Yahoo endpoint with the crumb handshake enabled.
    ///
    /// # Errors
    /// Returns `Other` if the HTTP client cannot be initialized.
    pub fn new_default() -> Result<Self, PaperTradeError> {
        Self::new(DEFAULT_BASE_URL, true, Some(Duration::from_secs(10)), None)
    }

    fn endpoint(&self, path: &str) -> Result<Url, PaperTradeError> {
        self.base
            .join(path)
            .map_err(|e| PaperTradeError::Other(format!("bad endpoint {path}: {e}")))
    }

    /// `quoteSummary` URL for `symbol`, percent-encoded as a single path segment.
    pub(crate) fn quote_summary_url(&self, symbol: &str) -> Result<Url, PaperTradeError> {
        // Dot segments would be dropped from the path rather than encoded.
        if matches!(symbol, "." | "..") {
            return Err(PaperTradeError::not_found(format!("quote for {symbol}")));
        }
        let mut url = self.endpoint("v10/finance/quoteSummary/")?;
        let url_str = url.to_string();
        url.path_segments_mut()
            .map_err(|()| PaperTradeError::Other(format!("base url cannot carry a path: {url_str}")))?
            .pop_if_empty()
            .push(symbol);
        Ok(url)
    }

    /// Cached crumb, performing the handshake on first use.
    ///
    /// The lock is held across the handshake so concurrent cold-start calls share
    /// one handshake instead of each starting their own. Those callers wait inside
    /// their provider call, so the handshake counts against their per-attempt
    /// timeout and their fetch permit stays taken while they wait. A handshake
    /// slower than the provider timeout fails those attempts. A `401` clears the
    /// cache, which is why this is a resettable lock and not a one-shot cell.
    async fn crumb(&self) -> Result<Option<String>, PaperTradeError> {
        if !self.use_crumb {
            return Ok(None);
        }
        let mut guard = self.crumb.lock().await;
        if let Some(c) = guard.as_ref() {
            return Ok(Some(c.clone()));
        }

        // The cookie page answers 404 but still sets the session cookie.
        if let Some(cookie_url) = self.cookie_url {
            let _ = self.http.get(cookie_url).send().await;
        }

        let resp = self
            .http
            .get(self.endpoint("v1/test/getcrumb")?)
            .send()
            .await
            .map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(PaperTradeError::connector(
                CONNECTOR,
                format!("crumb handshake failed: {status}"),
            ));
        }
        let crumb = resp.text().await.map_err(transport)?.trim().to_string();
        if crumb.is_empty() || crumb.contains('<') {
            return Err(PaperTradeError::connector(CONNECTOR, "crumb handshake returned no crumb"));
        }
        *guard = Some(crumb.clone());
        Ok(Some(crumb))
    }
}

fn transport(e: reqwest::Error) -> PaperTradeError {
    if e.is_timeout() {
        PaperTradeError::connector(CONNECTOR, "request timed out")
    } else {
        PaperTradeError::Other(e.to_string())
    }
}

/// Pull `quoteSummary.result[0].<module>` out of a response body.
pub(crate) fn extract_module(body: &Value, module: &str) -> Result<Value, PaperTradeError> {
    let root = body
        .get("quoteSummary")
        .ok_or_else(|| PaperTradeError::Data("response has no quoteSummary".into()))?;

    if let Some(err) = root.get("error").filter(|e| !e.is_null()) {
        let code = err.get("code").and_then(Value::as_str).unwrap_or("error");
        let description = err
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default();
        return Err(PaperTradeError::connector(
            CONNECTOR,
            format!("{code}: {description}"),
        ));
    }

    let first = root
        .get("result")
        .and_then(Value::as_array)
        .and_then(|r| r.first())
        .ok_or_else(|| PaperTradeError::connector(CONNECTOR, "no data in quoteSummary result"))?;

    match first.get(module) {
        Some(v @ Value::Object(_)) => Ok(v.clone()),
        Some(other) => Err(PaperTradeError::Data(format!(
            "module {module} is not an object: {other}"
        ))),
        None => Err(PaperTradeError::Data(format!("module {module} missing"))),
    }
}

#[async_trait]
impl QuoteSummaryApi for HttpAdapter {
    async fn module(&self, symbol: &str, module: &str) -> Result<Value, PaperTradeError> {
        let crumb = self.crumb().await?;
        let mut url = self.quote_summary_url(symbol)?;
        {
            let mut q = url.query_pairs_mut();
            q.append_pair("modules", module);
            if let Some(crumb) = crumb.as_deref() {
                q.append_pair("crumb", crumb);
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(target: "papertrade::yahoo", %url, "quoteSummary request");

        let resp = self.http.get(url).send().await.map_err(transport)?;
        match resp.status() {
            s if s.is_success() => {}
            StatusCode::NOT_FOUND => {
                return Err(PaperTradeError::connector(CONNECTOR, "Not Found"));
            }
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(PaperTradeError::connector(CONNECTOR, "rate limited"));
            }
            StatusCode::UNAUTHORIZED => {
                // Stale crumb; the next attempt performs a fresh handshake.
                self.crumb.lock().await.take();
                return Err(PaperTradeError::connector(CONNECTOR, "unauthorized"));
            }
            s => {
                return Err(PaperTradeError::connector(
                    CONNECTOR,
                    format!("server error {}", s.as_u16()),
                ));
            }
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| PaperTradeError::Data(format!("invalid json: {e}")))?;
        extract_module(&body, module)
    }
}
