use proptest::prelude::*;
use rpcgrid::{BrokerProfile, DataSource, EndpointSpec};
use rpcgrid_mock::fixtures;

use crate::helpers::{grid_with, identity_endpoint};

proptest! {
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]
    #[test]
    fn status_and_call_count_follow_section_outcomes(
        identity_ok in any::<bool>(),
        failing in prop::collection::vec(any::<bool>(), 0..6),
    ) {
        tokio_test::block_on(async move {
            let profile = failing.iter().enumerate().fold(
                BrokerProfile::new(identity_endpoint()),
                |p, (i, _)| {
                    p.with_dependent(
                        EndpointSpec::new(format!("s{i}"), format!("M{i}"), ["Symbol", "Quantity"])
                            .account_param("accountNumber"),
                    )
                },
            );
            let (grid, controller) = grid_with(profile);
            let identity = if identity_ok { fixtures::ACCOUNT_INFO } else { fixtures::NOT_AUTHORIZED };
            controller.returns("GetAccountInfo", identity).await;
            for (i, fails) in failing.iter().enumerate() {
                let method = format!("M{i}");
                if *fails {
                    controller.fails(&method, "boom").await;
                } else {
                    controller.returns(&method, fixtures::POSITIONS).await;
                }
            }

            let report = grid.get_all_account_details().await;

            assert_eq!(report.sections.len(), failing.len() + 1);
            for (_, section) in &report.sections {
                assert_eq!(section.headers.len(), section.data.first().map_or(section.headers.len(), Vec::len));
            }

            if !identity_ok {
                assert_eq!(report.data_source, DataSource::ErrorAuth);
                assert_eq!(controller.total_calls().await, 1);
                assert_eq!(report.failed_sections().count(), failing.len() + 1);
                return;
            }

            assert_eq!(controller.total_calls().await, failing.len() + 1);
            let expected: Vec<String> = failing
                .iter()
                .enumerate()
                .filter(|(_, f)| **f)
                .map(|(i, _)| format!("s{i}"))
                .collect();
            let failed: Vec<&str> = report.failed_sections().collect();
            assert_eq!(failed, expected);
            let want = if expected.is_empty() { DataSource::Api } else { DataSource::ApiWithErrors };
            assert_eq!(report.data_source, want);
        });
    }
}
