use std::num::NonZeroU32;

use papertrade::{DataKind, FetchOutcome, PaperTradeError, Symbol};

use crate::helpers::{AAPL, MockConnector, service_with};

fn attempts(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap()
}

#[tokio::test]
async fn first_attempt_success_calls_once() {
    let mock = MockConnector::builder().build();
    let svc = service_with(mock.clone()).build().unwrap();

    let out = svc
        .fetch_summary(&Symbol::parse(AAPL).unwrap(), attempts(3))
        .await;
    assert!(out.is_success());
    assert_eq!(out.attempts(), 1);
    assert_eq!(mock.calls(DataKind::Summary, AAPL), 1);
}

#[tokio::test]
async fn k_failures_then_success_takes_k_plus_one_calls() {
    for k in 0..4 {
        let mock = MockConnector::builder()
            .fail_first(DataKind::Statistics, AAPL, k)
            .build();
        let svc = service_with(mock.clone()).build().unwrap();

        let out = svc
            .fetch_statistics(&Symbol::parse(AAPL).unwrap(), attempts(5))
            .await;
        match out {
            FetchOutcome::Success { record, attempts } => {
                assert_eq!(attempts, k + 1);
                assert_eq!(record.get("kind"), Some(&serde_json::json!("statistics")));
            }
            FetchOutcome::Failure(f) => panic!("unexpected failure: {f:?}"),
        }
        assert_eq!(mock.calls(DataKind::Statistics, AAPL), k + 1);
    }
}

#[tokio::test]
async fn exhausted_attempts_report_last_error() {
    let mock = MockConnector::builder()
        .always_fail(DataKind::Summary, AAPL)
        .build();
    let svc = service_with(mock.clone()).build().unwrap();

    let out = svc
        .fetch_summary(&Symbol::parse(AAPL).unwrap(), attempts(3))
        .await;
    match out {
        FetchOutcome::Failure(f) => {
            assert_eq!(f.kind, DataKind::Summary);
            assert_eq!(f.attempts, 3);
            assert!(matches!(f.last, Some(PaperTradeError::Connector { .. })));
        }
        FetchOutcome::Success { .. } => panic!("expected failure"),
    }
    assert_eq!(mock.calls(DataKind::Summary, AAPL), 3);
}

#[tokio::test]
async fn failures_on_one_kind_do_not_touch_the_other() {
    let mock = MockConnector::builder()
        .always_fail(DataKind::Summary, AAPL)
        .build();
    let svc = service_with(mock.clone()).build().unwrap();
    let sym = Symbol::parse(AAPL).unwrap();

    assert!(!svc.fetch_summary(&sym, attempts(2)).await.is_success());
    assert!(svc.fetch_statistics(&sym, attempts(2)).await.is_success());
    assert_eq!(mock.calls(DataKind::Statistics, AAPL), 1);
}
