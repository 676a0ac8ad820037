use std::time::Duration;

use papertrade::{BackoffConfig, BatchAttempts, PaperTrade, PaperTradeError};

use crate::helpers::{MockConnector, service_with};

fn assert_invalid_arg<T>(res: Result<T, PaperTradeError>) {
    match res {
        Err(PaperTradeError::InvalidArg(_)) => {}
        Err(other) => panic!("expected InvalidArg, got {other:?}"),
        Ok(_) => panic!("expected InvalidArg, got Ok"),
    }
}

#[test]
fn build_without_connector_fails() {
    assert_invalid_arg(PaperTrade::builder().build());
}

#[test]
fn build_with_defaults_succeeds() {
    let svc = service_with(MockConnector::builder().build()).build().unwrap();
    let cfg = svc.config();
    assert_eq!(cfg.default_max_attempts, 1);
    assert_eq!(cfg.max_attempts_cap, 10);
    assert_eq!(cfg.batch_attempts, BatchAttempts::Fixed(1));
    assert_eq!(cfg.max_concurrent_fetches, 8);
    assert_eq!(cfg.batch_timeout, None);
    assert_eq!(svc.connector_name(), "mock");
}

#[test]
fn later_connector_replaces_earlier() {
    let svc = PaperTrade::builder()
        .with_connector(MockConnector::builder().name("first").build())
        .with_connector(MockConnector::builder().name("second").build())
        .build()
        .unwrap();
    assert_eq!(svc.connector_name(), "second");
}

#[test]
fn rejects_inconsistent_config() {
    let mock = || MockConnector::builder().build();
    assert_invalid_arg(service_with(mock()).max_concurrent_fetches(0).build());
    assert_invalid_arg(service_with(mock()).default_max_attempts(0).build());
    assert_invalid_arg(
        service_with(mock())
            .default_max_attempts(5)
            .max_attempts_cap(3)
            .build(),
    );
    assert_invalid_arg(
        service_with(mock())
            .batch_attempts(BatchAttempts::Fixed(0))
            .build(),
    );
    assert_invalid_arg(
        service_with(mock())
            .retry_backoff(BackoffConfig {
                min_backoff_ms: 500,
                max_backoff_ms: 100,
                ..BackoffConfig::default()
            })
            .build(),
    );
    assert_invalid_arg(
        service_with(mock())
            .retry_backoff(BackoffConfig {
                factor: 0,
                ..BackoffConfig::default()
            })
            .build(),
    );
}

#[test]
fn setters_land_in_config() {
    let svc = service_with(MockConnector::builder().build())
        .batch_timeout(Duration::from_secs(3))
        .provider_timeout(Duration::from_millis(250))
        .batch_attempts(BatchAttempts::FromRequest)
        .build()
        .unwrap();
    assert_eq!(svc.config().batch_timeout, Some(Duration::from_secs(3)));
    assert_eq!(svc.config().provider_timeout, Duration::from_millis(250));
    assert_eq!(svc.config().batch_attempts, BatchAttempts::FromRequest);
}
