use std::time::Duration;

use papertrade::RequestFlags;

use crate::helpers::{AAPL, MSFT, MockConnector, service_with, symbols_sorted};

#[tokio::test(start_paused = true)]
async fn deadline_returns_completed_units_and_abandons_rest() {
    let mock = MockConnector::builder().hang("SLOW").build();
    let svc = service_with(mock)
        .provider_timeout(Duration::from_secs(60))
        .batch_timeout(Duration::from_millis(500))
        .build()
        .unwrap();

    let started = tokio::time::Instant::now();
    let report = svc
        .aggregate_batch_report(&[AAPL, "SLOW", MSFT], RequestFlags::summary_only())
        .await
        .unwrap();

    assert_eq!(symbols_sorted(&report.results), vec![AAPL, MSFT]);
    assert!(report.failures.is_empty());
    assert_eq!(report.abandoned, 1);
    assert_eq!(started.elapsed(), Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn no_deadline_waits_for_every_unit() {
    let mock = MockConnector::builder()
        .delay(Duration::from_secs(30))
        .build();
    let svc = service_with(mock)
        .provider_timeout(Duration::from_secs(60))
        .build()
        .unwrap();

    let report = svc
        .aggregate_batch_report(&[AAPL, MSFT], RequestFlags::summary_only())
        .await
        .unwrap();
    assert_eq!(report.results.len(), 2);
    assert_eq!(report.abandoned, 0);
}
