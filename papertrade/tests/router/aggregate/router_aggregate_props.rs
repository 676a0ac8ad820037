use papertrade::{DataKind, RequestFlags};
use proptest::prelude::*;

use crate::helpers::{MockConnector, service_with};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn call_count_matches_failures_and_budget(failures in 0u32..6, budget in 1u32..6) {
        let outcome = tokio_test::block_on(async {
            let mock = MockConnector::builder()
                .fail_first(DataKind::Summary, "AAPL", failures)
                .build();
            let svc = service_with(mock.clone()).build().unwrap();
            let flags = RequestFlags::summary_only().with_max_attempts(budget).unwrap();
            let res = svc.aggregate_one("AAPL", flags).await;
            (res.is_ok(), mock.calls(DataKind::Summary, "AAPL"))
        });

        let (ok, calls) = outcome;
        prop_assert_eq!(ok, failures < budget);
        prop_assert_eq!(calls, (failures + 1).min(budget));
    }
}
