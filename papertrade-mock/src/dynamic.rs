use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use papertrade_core::{
    DataKind, InstrumentConnector, PaperTradeError, StatisticsProvider, StatisticsRecord,
    SummaryProvider, SummaryRecord, Symbol,
};

/// Instruction for how a method should behave for a given input.
#[derive(Clone, Debug)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(PaperTradeError),
    /// Hang indefinitely (simulate a stalled upstream).
    Hang,
    /// Fail the first `n` calls with a transient connector error, then behave as the inner rule.
    FailTimes(u32, Box<MockBehavior<T>>),
}

#[derive(Default)]
struct InternalState {
    summary_rules: HashMap<Symbol, MockBehavior<SummaryRecord>>,
    statistics_rules: HashMap<Symbol, MockBehavior<StatisticsRecord>>,
    calls: HashMap<(DataKind, Symbol), u32>,
    latency: Duration,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior for `summary` calls for a specific symbol.
    pub async fn set_summary_behavior(
        &self,
        symbol: Symbol,
        behavior: MockBehavior<SummaryRecord>,
    ) {
        let mut guard = self.state.lock().await;
        guard.summary_rules.insert(symbol, behavior);
    }

    /// Set the behavior for `statistics` calls for a specific symbol.
    pub async fn set_statistics_behavior(
        &self,
        symbol: Symbol,
        behavior: MockBehavior<StatisticsRecord>,
    ) {
        let mut guard = self.state.lock().await;
        guard.statistics_rules.insert(symbol, behavior);
    }

    /// Delay applied to every call before its behavior is evaluated.
    pub async fn set_latency(&self, latency: Duration) {
        self.state.lock().await.latency = latency;
    }

    /// Calls received so far for `kind` and `symbol`.
    pub async fn calls(&self, kind: DataKind, symbol: &Symbol) -> u32 {
        let guard = self.state.lock().await;
        guard
            .calls
            .get(&(kind, symbol.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Calls received so far across every kind and symbol.
    pub async fn total_calls(&self) -> u32 {
        self.state.lock().await.calls.values().sum()
    }

    /// Clear all configured behaviors, call counters and latency.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.summary_rules.clear();
        guard.statistics_rules.clear();
        guard.calls.clear();
        guard.latency = Duration::ZERO;
    }
}

/// A connector that defers all behavior to an external controller.
pub struct DynamicMockConnector {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockConnector {
    /// Create a new dynamic mock connector and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn InstrumentConnector>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn InstrumentConnector>, controller)
    }

    async fn run<T>(
        &self,
        kind: DataKind,
        symbol: &Symbol,
        pick: impl FnOnce(&InternalState) -> Option<MockBehavior<T>>,
    ) -> Result<T, PaperTradeError> {
        // Snapshot the rule without holding the lock across await points
        let (call_no, latency, behavior) = {
            let mut guard = self.state.lock().await;
            let n = guard.calls.entry((kind, symbol.clone())).or_insert(0);
            *n += 1;
            let call_no = *n;
            (call_no, guard.latency, pick(&*guard))
        };

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let mut behavior = behavior;
        loop {
            match behavior {
                Some(MockBehavior::Return(v)) => return Ok(v),
                Some(MockBehavior::Fail(e)) => return Err(e),
                Some(MockBehavior::Hang) => {
                    std::future::pending::<()>().await;
                    unreachable!()
                }
                Some(MockBehavior::FailTimes(n, then)) => {
                    if call_no <= n {
                        return Err(PaperTradeError::connector(
                            self.name,
                            format!("scripted transient failure {call_no}/{n}"),
                        ));
                    }
                    behavior = Some(*then);
                }
                None => {
                    return Err(PaperTradeError::not_found(format!("{kind} for {symbol}")));
                }
            }
        }
    }
}

impl InstrumentConnector for DynamicMockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "DynamicMock"
    }

    fn as_summary_provider(&self) -> Option<&dyn SummaryProvider> {
        Some(self as &dyn SummaryProvider)
    }

    fn as_statistics_provider(&self) -> Option<&dyn StatisticsProvider> {
        Some(self as &dyn StatisticsProvider)
    }
}

#[async_trait]
impl SummaryProvider for DynamicMockConnector {
    async fn summary(&self, symbol: &Symbol) -> Result<SummaryRecord, PaperTradeError> {
        self.run(DataKind::Summary, symbol, |s| {
            s.summary_rules.get(symbol).cloned()
        })
        .await
    }
}

#[async_trait]
impl StatisticsProvider for DynamicMockConnector {
    async fn statistics(&self, symbol: &Symbol) -> Result<StatisticsRecord, PaperTradeError> {
        self.run(DataKind::Statistics, symbol, |s| {
            s.statistics_rules.get(symbol).cloned()
        })
        .await
    }
}
