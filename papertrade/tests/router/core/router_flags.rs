use papertrade::{BatchAttempts, PaperTradeError, RequestFlags};

use crate::helpers::{MockConnector, service_with};

#[test]
fn missing_tries_uses_configured_default() {
    let svc = service_with(MockConnector::builder().build())
        .default_max_attempts(3)
        .build()
        .unwrap();
    let flags = svc.flags(true, false, None).unwrap();
    assert_eq!(flags.max_attempts.get(), 3);
    assert!(flags.want_summary);
    assert!(!flags.want_statistics);
}

#[test]
fn tries_above_cap_are_clamped() {
    let svc = service_with(MockConnector::builder().build())
        .max_attempts_cap(4)
        .build()
        .unwrap();
    assert_eq!(svc.flags(true, true, Some(50)).unwrap().max_attempts.get(), 4);
    assert_eq!(svc.flags(true, true, Some(2)).unwrap().max_attempts.get(), 2);
}

#[test]
fn zero_tries_is_rejected() {
    let svc = service_with(MockConnector::builder().build()).build().unwrap();
    assert!(matches!(
        svc.flags(true, false, Some(0)),
        Err(PaperTradeError::InvalidArg(_))
    ));
}

#[test]
fn batch_flags_follow_policy() {
    let requested = RequestFlags::new(true, true).with_max_attempts(5).unwrap();

    let fixed = service_with(MockConnector::builder().build())
        .batch_attempts(BatchAttempts::Fixed(2))
        .build()
        .unwrap();
    let f = fixed.batch_flags(requested);
    assert_eq!(f.max_attempts.get(), 2);
    assert!(f.want_summary && f.want_statistics);

    let from_request = service_with(MockConnector::builder().build())
        .batch_attempts(BatchAttempts::FromRequest)
        .build()
        .unwrap();
    assert_eq!(from_request.batch_flags(requested), requested);
}
