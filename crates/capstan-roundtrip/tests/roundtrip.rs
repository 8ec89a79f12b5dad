// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use capstan_api_types_versions::{v1alpha5, v1alpha6};
use capstan_conversion::side_channel::SIDE_CHANNEL_KEY;
use capstan_conversion::{downgrade, upgrade, ConversionRegistry};
use capstan_roundtrip::check_pair;
use capstan_roundtrip::strategy::{
    hub_cluster, hub_machine, hub_object, hub_template,
};
use proptest::prelude::*;
use proptest::test_runner::{Config, TestRunner};
use slog::{o, Discard, Logger};

fn logger() -> Logger {
    Logger::root(Discard, o!())
}

/// Runs every round-trip law against every registered (version, kind),
/// lists included.
#[test]
fn every_registered_pair_round_trips() {
    let log = logger();
    let registry = ConversionRegistry::builtin();

    let mut checked = 0;
    for pair in registry.pairs() {
        let mut runner =
            TestRunner::new(Config { cases: 64, ..Config::default() });
        let result = runner.run(&hub_object(pair.kind), |hub| {
            check_pair(&log, pair, &hub)
                .map_err(|e| TestCaseError::fail(e.to_string()))
        });
        if let Err(e) = result {
            panic!("{} {}: {e}", pair.version, pair.kind);
        }
        checked += 1;
    }

    assert_eq!(checked, 12);
}

proptest! {
    #[test]
    fn prop_v1alpha5_cluster_preserves_hub(hub in hub_cluster()) {
        let log = logger();
        let spoke: v1alpha5::cluster::OpenStackCluster =
            downgrade(&log, hub.clone()).unwrap();
        prop_assert_eq!(upgrade(&log, spoke).unwrap(), hub);
    }

    #[test]
    fn prop_v1alpha5_machine_preserves_hub(hub in hub_machine()) {
        let log = logger();
        let spoke: v1alpha5::machine::OpenStackMachine =
            downgrade(&log, hub.clone()).unwrap();
        prop_assert_eq!(upgrade(&log, spoke).unwrap(), hub);
    }

    #[test]
    fn prop_v1alpha6_template_preserves_hub(hub in hub_template()) {
        let log = logger();
        let spoke: v1alpha6::template::OpenStackMachineTemplate =
            downgrade(&log, hub.clone()).unwrap();
        prop_assert_eq!(upgrade(&log, spoke).unwrap(), hub);
    }

    /// Port order and count survive whatever the side channel carries.
    #[test]
    fn prop_ports_keep_order(hub in hub_machine()) {
        let log = logger();
        let mut spoke: v1alpha5::machine::OpenStackMachine =
            downgrade(&log, hub.clone()).unwrap();
        spoke.metadata.annotations.remove(SIDE_CHANNEL_KEY);

        let restored = upgrade(&log, spoke).unwrap();
        prop_assert_eq!(restored.spec.ports.len(), hub.spec.ports.len());
        for (a, b) in restored.spec.ports.iter().zip(&hub.spec.ports) {
            prop_assert_eq!(&a.name_suffix, &b.name_suffix);
            prop_assert_eq!(&a.fixed_ips, &b.fixed_ips);
        }
    }

    /// Without a record, nothing hub-only is invented on upgrade.
    #[test]
    fn prop_no_record_means_defaults(hub in hub_cluster()) {
        let log = logger();
        let mut spoke: v1alpha6::cluster::OpenStackCluster =
            downgrade(&log, hub).unwrap();
        spoke.metadata.annotations.remove(SIDE_CHANNEL_KEY);

        let restored = upgrade(&log, spoke).unwrap();
        let lb = &restored.spec.api_server_load_balancer;
        prop_assert!(lb.provider.is_empty());
        prop_assert!(!restored.spec.control_plane_omit_availability_zone);
    }
}
