// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use capstan_api_types_versions::latest;
use capstan_api_types_versions::{v1alpha5, v1alpha6};
use capstan_conversion::side_channel::{self, SIDE_CHANNEL_KEY};
use capstan_conversion::{downgrade, downgrade_list, upgrade, upgrade_list};
use capstan_types::{ObjectList, ObjectMeta};
use slog::{o, Discard, Logger};

fn logger() -> Logger {
    Logger::root(Discard, o!())
}

fn meta(name: &str) -> ObjectMeta {
    ObjectMeta { name: name.to_owned(), ..Default::default() }
}

#[test]
fn tenant_id_alias_round_trip() {
    let log = logger();
    let spoke = v1alpha6::machine::OpenStackMachine {
        metadata: meta("m0"),
        spec: v1alpha6::machine::OpenStackMachineSpec {
            ports: vec![v1alpha6::machine::PortOpts {
                tenant_id: "abc".to_owned(),
                ..Default::default()
            }],
            ..Default::default()
        },
        ..Default::default()
    };

    let hub = upgrade(&log, spoke).unwrap();
    assert_eq!(hub.spec.ports[0].project_id, "abc");

    let back: v1alpha6::machine::OpenStackMachine =
        downgrade(&log, hub).unwrap();
    assert_eq!(back.spec.ports[0].project_id, "abc");
    assert_eq!(back.spec.ports[0].tenant_id, "abc");
}

#[test]
fn project_id_wins_over_tenant_id() {
    let log = logger();
    let spoke = v1alpha5::machine::OpenStackMachine {
        metadata: meta("m0"),
        spec: v1alpha5::machine::OpenStackMachineSpec {
            ports: vec![v1alpha5::machine::PortOpts {
                tenant_id: "old".to_owned(),
                project_id: "new".to_owned(),
                ..Default::default()
            }],
            ..Default::default()
        },
        ..Default::default()
    };

    let hub = upgrade(&log, spoke).unwrap();
    assert_eq!(hub.spec.ports[0].project_id, "new");
}

fn cluster_with_allowed_cidrs() -> latest::cluster::OpenStackCluster {
    latest::cluster::OpenStackCluster {
        metadata: meta("c0"),
        spec: latest::cluster::OpenStackClusterSpec {
            api_server_load_balancer: latest::cluster::ApiServerLoadBalancer {
                enabled: true,
                additional_ports: vec![8443],
                allowed_cidrs: vec!["10.0.0.0/8".to_owned()],
                ..Default::default()
            },
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn side_channel_preserves_hub_only_field() {
    let log = logger();
    let hub = cluster_with_allowed_cidrs();

    let spoke: v1alpha5::cluster::OpenStackCluster =
        downgrade(&log, hub.clone()).unwrap();
    assert!(spoke.metadata.annotations.contains_key(SIDE_CHANNEL_KEY));
    assert!(spoke.spec.managed_api_server_load_balancer);
    assert_eq!(spoke.spec.api_server_load_balancer_additional_ports, [8443]);

    let json = serde_json::to_value(&spoke).unwrap();
    assert!(json["spec"].get("allowedCidrs").is_none());

    let restored = upgrade(&log, spoke).unwrap();
    assert_eq!(
        restored.spec.api_server_load_balancer.allowed_cidrs,
        ["10.0.0.0/8"]
    );
    assert!(!restored.metadata.annotations.contains_key(SIDE_CHANNEL_KEY));
    assert_eq!(restored, hub);
}

#[test]
fn no_record_when_nothing_is_lost() {
    let log = logger();
    let mut hub = cluster_with_allowed_cidrs();
    hub.spec.api_server_load_balancer.allowed_cidrs.clear();

    let spoke: v1alpha5::cluster::OpenStackCluster =
        downgrade(&log, hub).unwrap();
    assert!(spoke.metadata.annotations.is_empty());
}

#[test]
fn stale_record_on_hub_is_replaced() {
    let log = logger();
    let mut hub = latest::machine::OpenStackMachine {
        metadata: meta("m0"),
        ..Default::default()
    };
    side_channel::attach(&mut hub.metadata, "stale".to_owned());

    let spoke: v1alpha6::machine::OpenStackMachine =
        downgrade(&log, hub).unwrap();
    assert!(spoke.metadata.annotations.is_empty());
}

#[test]
fn unusable_record_is_ignored() {
    let log = logger();
    let payloads = [
        "{not json".to_owned(),
        r#"{"marker":"someone-else","data":{}}"#.to_owned(),
        format!(
            r#"{{"marker":"{}","data":"wrong shape"}}"#,
            side_channel::RECORD_MARKER
        ),
    ];

    for payload in payloads {
        let mut spoke = v1alpha5::cluster::OpenStackCluster {
            metadata: meta("c0"),
            spec: v1alpha5::cluster::OpenStackClusterSpec {
                cloud_name: "openstack".to_owned(),
                ..Default::default()
            },
            ..Default::default()
        };
        spoke
            .metadata
            .annotations
            .insert(SIDE_CHANNEL_KEY.to_owned(), payload.clone());

        let hub = upgrade(&log, spoke).unwrap();
        assert_eq!(hub.spec.cloud_name, "openstack", "payload {payload}");
        assert!(hub.spec.api_server_load_balancer.allowed_cidrs.is_empty());
        assert!(hub.metadata.annotations.is_empty());
    }
}

#[test]
fn root_volume_constants_collapse() {
    let log = logger();
    let spoke = v1alpha5::machine::OpenStackMachine {
        metadata: meta("m0"),
        spec: v1alpha5::machine::OpenStackMachineSpec {
            root_volume: Some(v1alpha5::machine::RootVolume {
                source_type: "snapshot".to_owned(),
                source_uuid: "img-1".to_owned(),
                device_type: "cdrom".to_owned(),
                size: 50,
                ..Default::default()
            }),
            ..Default::default()
        },
        ..Default::default()
    };

    let hub = upgrade(&log, spoke).unwrap();
    assert_eq!(hub.spec.image_uuid, "img-1");
    assert_eq!(hub.spec.root_volume.as_ref().map(|rv| rv.size), Some(50));

    let back: v1alpha5::machine::OpenStackMachine =
        downgrade(&log, hub).unwrap();
    let rv = back.spec.root_volume.unwrap();
    assert_eq!(rv.size, 50);
    assert_eq!(rv.source_uuid, "img-1");
    assert_eq!(rv.device_type, latest::machine::ROOT_VOLUME_DEVICE_TYPE);
    assert_eq!(rv.source_type, latest::machine::ROOT_VOLUME_SOURCE_TYPE);
    assert!(back.spec.image_uuid.is_empty());
}

#[test]
fn port_order_and_residue_survive() {
    let log = logger();
    let port = |id: &str, value: &str| latest::machine::PortOpts {
        network: Some(latest::filters::NetworkFilter {
            name: format!("{id}-name"),
            ..latest::filters::NetworkFilter::with_id(id)
        }),
        value_specs: vec![latest::machine::ValueSpec {
            name: "spec".to_owned(),
            key: "k".to_owned(),
            value: value.to_owned(),
        }],
        ..Default::default()
    };
    let hub = latest::machine::OpenStackMachine {
        metadata: meta("m0"),
        spec: latest::machine::OpenStackMachineSpec {
            ports: vec![port("a", "1"), port("b", "2"), port("c", "3")],
            additional_block_devices: vec![
                latest::machine::AdditionalBlockDevice {
                    name: "etcd".to_owned(),
                    size_gib: 10,
                    volume_type: "fast".to_owned(),
                },
            ],
            ..Default::default()
        },
        ..Default::default()
    };

    let spoke: v1alpha5::machine::OpenStackMachine =
        downgrade(&log, hub.clone()).unwrap();
    assert_eq!(spoke.spec.ports.len(), 3);
    assert!(spoke.spec.ports.iter().all(|p| p.network_id.is_empty()));

    let restored = upgrade(&log, spoke).unwrap();
    assert_eq!(restored, hub);
}

#[test]
fn port_residue_dropped_when_ports_change() {
    let log = logger();
    let hub = latest::machine::OpenStackMachine {
        metadata: meta("m0"),
        spec: latest::machine::OpenStackMachineSpec {
            ports: vec![latest::machine::PortOpts {
                value_specs: vec![latest::machine::ValueSpec::default()],
                ..Default::default()
            }],
            ..Default::default()
        },
        ..Default::default()
    };

    let mut spoke: v1alpha6::machine::OpenStackMachine =
        downgrade(&log, hub).unwrap();
    spoke.spec.ports.push(Default::default());

    let restored = upgrade(&log, spoke).unwrap();
    assert_eq!(restored.spec.ports.len(), 2);
    assert!(restored.spec.ports.iter().all(|p| p.value_specs.is_empty()));
}

#[test]
fn network_id_set_on_spoke_wins_over_record() {
    let log = logger();
    let hub = latest::machine::OpenStackMachine {
        metadata: meta("m0"),
        spec: latest::machine::OpenStackMachineSpec {
            ports: vec![latest::machine::PortOpts {
                network: Some(latest::filters::NetworkFilter {
                    name: "tenant-net".to_owned(),
                    tags: "blue".to_owned(),
                    ..Default::default()
                }),
                ..Default::default()
            }],
            ..Default::default()
        },
        ..Default::default()
    };

    let mut spoke: v1alpha5::machine::OpenStackMachine =
        downgrade(&log, hub).unwrap();
    assert!(spoke.spec.ports[0].network_id.is_empty());
    assert!(spoke.metadata.annotations.contains_key(SIDE_CHANNEL_KEY));

    spoke.spec.ports[0].network_id = "net-9".to_owned();
    let restored = upgrade(&log, spoke).unwrap();
    assert_eq!(
        restored.spec.ports[0].network,
        Some(latest::filters::NetworkFilter::with_id("net-9"))
    );
}

#[test]
fn lists_convert_in_order() {
    let log = logger();
    let names = ["m2", "m0", "m1"];
    let list = ObjectList {
        metadata: Default::default(),
        items: names
            .iter()
            .map(|name| v1alpha6::machine::OpenStackMachine {
                metadata: meta(name),
                ..Default::default()
            })
            .collect(),
    };

    let hub = upgrade_list(&log, list).unwrap();
    let hub_names: Vec<_> =
        hub.items.iter().map(|m| m.metadata.name.as_str()).collect();
    assert_eq!(hub_names, names);

    let back: ObjectList<v1alpha5::machine::OpenStackMachine> =
        downgrade_list(&log, hub).unwrap();
    let back_names: Vec<_> =
        back.items.iter().map(|m| m.metadata.name.as_str()).collect();
    assert_eq!(back_names, names);
}

#[test]
fn bastion_residue_round_trip() {
    let log = logger();
    let hub = latest::cluster::OpenStackCluster {
        metadata: meta("c0"),
        spec: latest::cluster::OpenStackClusterSpec {
            bastion: Some(latest::cluster::Bastion {
                enabled: true,
                instance: latest::machine::OpenStackMachineSpec {
                    flavor: "m1.tiny".to_owned(),
                    additional_block_devices: vec![Default::default()],
                    ..Default::default()
                },
                ..Default::default()
            }),
            control_plane_omit_availability_zone: true,
            ..Default::default()
        },
        ..Default::default()
    };

    let spoke: v1alpha6::cluster::OpenStackCluster =
        downgrade(&log, hub.clone()).unwrap();
    assert_eq!(upgrade(&log, spoke).unwrap(), hub);
}
