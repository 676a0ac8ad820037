use papertrade::{DataKind, PaperTradeError, RequestFlags};
use serde_json::json;

use crate::helpers::{AAPL, MockConnector, service_with};

#[tokio::test]
async fn summary_and_statistics_populated_on_success() {
    let mock = MockConnector::builder().build();
    let svc = service_with(mock.clone()).build().unwrap();

    let r = svc
        .aggregate_one(" aapl ", RequestFlags::new(true, true))
        .await
        .unwrap();
    assert_eq!(r.symbol.as_str(), AAPL);
    assert_eq!(
        r.summary.unwrap().get("kind"),
        Some(&json!("summary"))
    );
    assert_eq!(
        r.statistics.unwrap().get("kind"),
        Some(&json!("statistics"))
    );
    assert_eq!(mock.calls(DataKind::Summary, AAPL), 1);
    assert_eq!(mock.calls(DataKind::Statistics, AAPL), 1);
}

#[tokio::test]
async fn no_flags_returns_symbol_only_without_calls() {
    let mock = MockConnector::builder().build();
    let svc = service_with(mock.clone()).build().unwrap();

    let r = svc
        .aggregate_one("msft", RequestFlags::new(false, false))
        .await
        .unwrap();
    assert_eq!(serde_json::to_value(&r).unwrap(), json!({ "symbol": "MSFT" }));
    assert_eq!(mock.total_calls(), 0);
}

#[tokio::test]
async fn unrequested_kind_is_absent() {
    let mock = MockConnector::builder().build();
    let svc = service_with(mock.clone()).build().unwrap();

    let r = svc
        .aggregate_one(AAPL, RequestFlags::summary_only())
        .await
        .unwrap();
    assert!(r.summary.is_some());
    assert!(r.statistics.is_none());
    assert_eq!(mock.calls(DataKind::Statistics, AAPL), 0);
}

#[tokio::test]
async fn statistics_only_skips_summary() {
    let mock = MockConnector::builder().build();
    let svc = service_with(mock.clone()).build().unwrap();

    let r = svc
        .aggregate_one(AAPL, RequestFlags::new(false, true))
        .await
        .unwrap();
    assert!(r.summary.is_none());
    assert!(r.statistics.is_some());
    assert_eq!(mock.calls(DataKind::Summary, AAPL), 0);
    assert_eq!(mock.calls(DataKind::Statistics, AAPL), 1);
}

#[tokio::test]
async fn invalid_symbol_is_rejected_before_any_call() {
    let mock = MockConnector::builder().build();
    let svc = service_with(mock.clone()).build().unwrap();

    for raw in ["", "   ", "BRK B"] {
        let err = svc
            .aggregate_one(raw, RequestFlags::new(true, true))
            .await
            .unwrap_err();
        assert!(
            matches!(err, PaperTradeError::InvalidSymbol { .. }),
            "{raw:?} -> {err:?}"
        );
        assert!(err.is_client_error());
    }
    assert_eq!(mock.total_calls(), 0);
}

#[tokio::test]
async fn exhausted_summary_fails_whole_aggregate() {
    let mock = MockConnector::builder()
        .always_fail(DataKind::Summary, AAPL)
        .build();
    let svc = service_with(mock.clone()).build().unwrap();
    let flags = RequestFlags::new(true, true).with_max_attempts(3).unwrap();

    let err = svc.aggregate_one(AAPL, flags).await.unwrap_err();
    match &err {
        PaperTradeError::UpstreamUnavailable {
            kind,
            symbol,
            attempts,
            last,
        } => {
            assert_eq!(*kind, DataKind::Summary);
            assert_eq!(symbol, AAPL);
            assert_eq!(*attempts, 3);
            assert!(last.is_some());
        }
        other => panic!("unexpected: {other:?}"),
    }
    assert_eq!(err.code(), "upstream-unavailable");
    assert_eq!(mock.calls(DataKind::Summary, AAPL), 3);
    // Fails closed: statistics are never fetched after a summary failure.
    assert_eq!(mock.calls(DataKind::Statistics, AAPL), 0);
}

#[tokio::test]
async fn exhausted_statistics_drops_fetched_summary() {
    let mock = MockConnector::builder()
        .always_fail(DataKind::Statistics, AAPL)
        .build();
    let svc = service_with(mock.clone()).build().unwrap();

    let err = svc
        .aggregate_one(AAPL, RequestFlags::new(true, true))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PaperTradeError::UpstreamUnavailable {
            kind: DataKind::Statistics,
            attempts: 1,
            ..
        }
    ));
    assert_eq!(mock.calls(DataKind::Summary, AAPL), 1);
}

#[tokio::test]
async fn recovers_within_attempt_budget() {
    let mock = MockConnector::builder()
        .fail_first(DataKind::Summary, AAPL, 2)
        .fail_first(DataKind::Statistics, AAPL, 1)
        .build();
    let svc = service_with(mock.clone()).build().unwrap();
    let flags = RequestFlags::new(true, true).with_max_attempts(3).unwrap();

    let r = svc.aggregate_one(AAPL, flags).await.unwrap();
    assert!(r.summary.is_some() && r.statistics.is_some());
    assert_eq!(mock.calls(DataKind::Summary, AAPL), 3);
    assert_eq!(mock.calls(DataKind::Statistics, AAPL), 2);
}

#[tokio::test]
async fn identical_provider_data_serializes_identically() {
    let svc = service_with(MockConnector::builder().build())
        .build()
        .unwrap();
    let a = svc
        .aggregate_one("aapl", RequestFlags::new(true, true))
        .await
        .unwrap();
    let b = svc
        .aggregate_one("AAPL", RequestFlags::new(true, true))
        .await
        .unwrap();
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}
