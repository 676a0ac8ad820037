use papertrade::{BatchAttempts, DataKind, PaperTradeError, RequestFlags};

use crate::helpers::{AAPL, MSFT, MockConnector, service_with, symbols_sorted};

#[tokio::test]
async fn blank_symbol_is_dropped_from_batch() {
    let svc = service_with(MockConnector::builder().build())
        .build()
        .unwrap();

    let out = svc
        .aggregate_batch(&[AAPL, "", MSFT], RequestFlags::summary_only())
        .await
        .unwrap();
    assert_eq!(symbols_sorted(&out), vec![AAPL, MSFT]);
    assert!(out.iter().all(|r| r.summary.is_some()));
}

#[tokio::test]
async fn upstream_failure_shrinks_batch_without_error() {
    let mock = MockConnector::builder()
        .always_fail(DataKind::Summary, MSFT)
        .build();
    let svc = service_with(mock).build().unwrap();

    let out = svc
        .aggregate_batch(&[AAPL, "", MSFT], RequestFlags::summary_only())
        .await
        .unwrap();
    assert_eq!(symbols_sorted(&out), vec![AAPL]);
}

#[tokio::test]
async fn all_failing_batch_is_empty_not_error() {
    let mock = MockConnector::builder()
        .always_fail(DataKind::Summary, AAPL)
        .always_fail(DataKind::Summary, MSFT)
        .build();
    let svc = service_with(mock).build().unwrap();

    let out = svc
        .aggregate_batch(&[AAPL, MSFT], RequestFlags::summary_only())
        .await
        .unwrap();
    assert!(out.is_empty());
}

#[tokio::test]
async fn empty_batch_is_rejected_before_dispatch() {
    let mock = MockConnector::builder().build();
    let svc = service_with(mock.clone()).build().unwrap();

    let empty: [&str; 0] = [];
    let err = svc
        .aggregate_batch(&empty, RequestFlags::summary_only())
        .await
        .unwrap_err();
    assert_eq!(err, PaperTradeError::EmptyBatch);
    assert!(err.is_client_error());
    assert_eq!(mock.total_calls(), 0);
}

#[tokio::test]
async fn duplicates_are_fetched_independently() {
    let mock = MockConnector::builder().build();
    let svc = service_with(mock.clone()).build().unwrap();

    let out = svc
        .aggregate_batch(&["aapl", AAPL, " AAPL"], RequestFlags::summary_only())
        .await
        .unwrap();
    assert_eq!(out.len(), 3);
    assert_eq!(mock.calls(DataKind::Summary, AAPL), 3);
}

#[tokio::test]
async fn report_lists_failures_with_raw_input() {
    let mock = MockConnector::builder()
        .always_fail(DataKind::Summary, MSFT)
        .build();
    let svc = service_with(mock).build().unwrap();

    let report = svc
        .aggregate_batch_report(&[AAPL, "", "msft"], RequestFlags::summary_only())
        .await
        .unwrap();
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.abandoned, 0);
    assert_eq!(report.requested(), 3);

    let mut failed: Vec<(&str, &'static str)> = report
        .failures
        .iter()
        .map(|(raw, e)| (raw.as_str(), e.code()))
        .collect();
    failed.sort_unstable();
    assert_eq!(
        failed,
        vec![("", "invalid-symbol"), ("msft", "upstream-unavailable")]
    );
}

#[tokio::test]
async fn fixed_batch_attempts_ignore_request_tries() {
    let mock = MockConnector::builder()
        .fail_first(DataKind::Summary, AAPL, 1)
        .build();
    let svc = service_with(mock.clone()).build().unwrap();
    let flags = RequestFlags::summary_only().with_max_attempts(5).unwrap();

    let out = svc.aggregate_batch(&[AAPL], flags).await.unwrap();
    assert!(out.is_empty());
    assert_eq!(mock.calls(DataKind::Summary, AAPL), 1);
}

#[tokio::test]
async fn from_request_batch_attempts_honor_tries() {
    let mock = MockConnector::builder()
        .fail_first(DataKind::Summary, AAPL, 1)
        .build();
    let svc = service_with(mock.clone())
        .batch_attempts(BatchAttempts::FromRequest)
        .build()
        .unwrap();
    let flags = RequestFlags::summary_only().with_max_attempts(2).unwrap();

    let out = svc.aggregate_batch(&[AAPL], flags).await.unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(mock.calls(DataKind::Summary, AAPL), 2);
}

#[tokio::test]
async fn accepts_owned_strings() {
    let svc = service_with(MockConnector::builder().build())
        .build()
        .unwrap();
    let symbols: Vec<String> = vec!["aapl".into(), "msft".into()];
    let out = svc
        .aggregate_batch(&symbols, RequestFlags::new(true, true))
        .await
        .unwrap();
    assert_eq!(symbols_sorted(&out), vec![AAPL, MSFT]);
    assert!(out.iter().all(|r| r.statistics.is_some()));
}
