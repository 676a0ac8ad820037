use std::num::NonZeroU32;
use std::time::Duration;

use papertrade::{BackoffConfig, DataKind, FetchOutcome, PaperTradeError, Symbol};

use crate::helpers::{AAPL, MockConnector, service_with};

#[tokio::test(start_paused = true)]
async fn stalled_call_counts_as_failed_attempt() {
    let mock = MockConnector::builder().hang(AAPL).build();
    let svc = service_with(mock.clone())
        .provider_timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    let started = tokio::time::Instant::now();
    let out = svc
        .fetch_summary(&Symbol::parse(AAPL).unwrap(), NonZeroU32::new(2).unwrap())
        .await;
    match out {
        FetchOutcome::Failure(f) => {
            assert_eq!(f.attempts, 2);
            assert_eq!(
                f.last,
                Some(PaperTradeError::ProviderTimeout {
                    connector: "mock".into(),
                    kind: DataKind::Summary,
                })
            );
        }
        FetchOutcome::Success { .. } => panic!("expected timeout failure"),
    }
    assert_eq!(mock.calls(DataKind::Summary, AAPL), 2);
    assert!(started.elapsed() >= Duration::from_millis(200));
}

#[tokio::test(start_paused = true)]
async fn backoff_sleeps_between_attempts_only() {
    let mock = MockConnector::builder()
        .fail_first(DataKind::Summary, AAPL, 2)
        .build();
    let svc = service_with(mock.clone())
        .retry_backoff(BackoffConfig {
            min_backoff_ms: 100,
            max_backoff_ms: 1_000,
            factor: 2,
            jitter_percent: 0,
        })
        .build()
        .unwrap();

    let started = tokio::time::Instant::now();
    let out = svc
        .fetch_summary(&Symbol::parse(AAPL).unwrap(), NonZeroU32::new(3).unwrap())
        .await;
    assert_eq!(out.attempts(), 3);
    // 100ms after the first failure, 200ms after the second.
    assert_eq!(started.elapsed(), Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn no_backoff_after_final_attempt() {
    let mock = MockConnector::builder()
        .always_fail(DataKind::Summary, AAPL)
        .build();
    let svc = service_with(mock)
        .retry_backoff(BackoffConfig {
            min_backoff_ms: 50,
            max_backoff_ms: 50,
            factor: 1,
            jitter_percent: 0,
        })
        .build()
        .unwrap();

    let started = tokio::time::Instant::now();
    let out = svc
        .fetch_summary(&Symbol::parse(AAPL).unwrap(), NonZeroU32::new(2).unwrap())
        .await;
    assert!(!out.is_success());
    assert_eq!(started.elapsed(), Duration::from_millis(50));
}
