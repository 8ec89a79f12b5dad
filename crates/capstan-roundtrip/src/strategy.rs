// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generators for hub objects.
//!
//! Every field is drawn from its full shape, optional fields included, and
//! collections vary in length from empty to a few elements.

use std::collections::BTreeMap;

use capstan_api_types_versions::latest::{cluster, filters, machine, template};
use capstan_types::{Kind, ListMeta, ObjectList, ObjectMeta};
use proptest::collection::{btree_map, vec};
use proptest::option;
use proptest::prelude::*;
use proptest::sample::select;
use serde::Serialize;
use serde_json::Value;
use strum::IntoEnumIterator;
use uuid::Uuid;

use crate::exclusion::exclude_meta;

fn token() -> impl Strategy<Value = String> {
    "[a-z0-9-]{0,8}"
}

fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,7}"
}

fn tokens() -> impl Strategy<Value = Vec<String>> {
    vec(token(), 0..3)
}

fn string_map() -> impl Strategy<Value = BTreeMap<String, String>> {
    btree_map(name(), token(), 0..3)
}

/// Server-managed metadata the resource types pass through untouched.
fn unmodelled_meta() -> impl Strategy<Value = BTreeMap<String, Value>> {
    (option::of(token()), option::of(0u64..1000)).prop_map(
        |(resource_version, generation)| {
            let mut extra = BTreeMap::new();
            if let Some(rv) = resource_version {
                extra.insert("resourceVersion".to_owned(), Value::from(rv));
            }
            if let Some(generation) = generation {
                extra.insert("generation".to_owned(), Value::from(generation));
            }
            extra
        },
    )
}

pub fn object_meta() -> impl Strategy<Value = ObjectMeta> {
    (
        name(),
        token(),
        option::of(any::<u128>().prop_map(Uuid::from_u128)),
        string_map(),
        btree_map("[a-z.]{1,12}/[a-z-]{1,8}", token(), 0..3),
        unmodelled_meta(),
    )
        .prop_map(|(name, namespace, uid, labels, annotations, extra)| {
            let mut meta = ObjectMeta {
                name,
                namespace,
                uid,
                labels,
                annotations,
                extra,
            };
            exclude_meta(&mut meta);
            meta
        })
}

pub fn network_filter() -> impl Strategy<Value = filters::NetworkFilter> {
    let full = (token(), token(), token(), token(), token()).prop_map(
        |(name, description, project_id, id, tags)| filters::NetworkFilter {
            name,
            description,
            project_id,
            id,
            tags,
        },
    );
    prop_oneof![name().prop_map(filters::NetworkFilter::with_id), full]
}

pub fn subnet_filter() -> impl Strategy<Value = filters::SubnetFilter> {
    (
        token(),
        token(),
        token(),
        select(vec![0, 4, 6]),
        token(),
        token(),
        token(),
    )
        .prop_map(
            |(name, description, project_id, ip_version, cidr, id, tags)| {
                filters::SubnetFilter {
                    name,
                    description,
                    project_id,
                    ip_version,
                    cidr,
                    id,
                    tags,
                }
            },
        )
}

fn security_group_filter(
) -> impl Strategy<Value = filters::SecurityGroupFilter> {
    (token(), token(), token(), token(), token()).prop_map(
        |(name, description, project_id, id, tags)| {
            filters::SecurityGroupFilter {
                name,
                description,
                project_id,
                id,
                tags,
            }
        },
    )
}

fn fixed_ip() -> impl Strategy<Value = filters::FixedIp> {
    (option::of(subnet_filter()), token()).prop_map(|(subnet, ip_address)| {
        filters::FixedIp { subnet, ip_address }
    })
}

fn address_pair() -> impl Strategy<Value = filters::AddressPair> {
    (token(), token()).prop_map(|(ip_address, mac_address)| {
        filters::AddressPair { ip_address, mac_address }
    })
}

fn value_spec() -> impl Strategy<Value = machine::ValueSpec> {
    (token(), token(), token())
        .prop_map(|(name, key, value)| machine::ValueSpec { name, key, value })
}

fn additional_block_device(
) -> impl Strategy<Value = machine::AdditionalBlockDevice> {
    (name(), 1..500i32, token()).prop_map(|(name, size_gib, volume_type)| {
        machine::AdditionalBlockDevice { name, size_gib, volume_type }
    })
}

pub fn port_opts() -> impl Strategy<Value = machine::PortOpts> {
    let addressing = (
        option::of(network_filter()),
        token(),
        token(),
        option::of(any::<bool>()),
        token(),
        vec(fixed_ip(), 0..3),
        token(),
        vec(security_group_filter(), 0..3),
        vec(address_pair(), 0..3),
    );
    let binding = (
        option::of(any::<bool>()),
        token(),
        token(),
        string_map(),
        option::of(any::<bool>()),
        option::of(any::<bool>()),
        vec(value_spec(), 0..3),
        tokens(),
    );

    (addressing, binding).prop_map(
        |(
            (
                network,
                name_suffix,
                description,
                admin_state_up,
                mac_address,
                fixed_ips,
                project_id,
                security_groups,
                allowed_address_pairs,
            ),
            (
                trunk,
                host_id,
                vnic_type,
                profile,
                disable_port_security,
                propagate_uplink_status,
                value_specs,
                tags,
            ),
        )| machine::PortOpts {
            network,
            name_suffix,
            description,
            admin_state_up,
            mac_address,
            fixed_ips,
            project_id,
            security_groups,
            allowed_address_pairs,
            trunk,
            host_id,
            vnic_type,
            profile,
            disable_port_security,
            propagate_uplink_status,
            value_specs,
            tags,
        },
    )
}

fn root_volume() -> impl Strategy<Value = machine::RootVolume> {
    // Non-positive sizes take a different path through older versions.
    (-2..200i32, token(), token()).prop_map(
        |(size, volume_type, availability_zone)| machine::RootVolume {
            size,
            volume_type,
            availability_zone,
        },
    )
}

fn identity_ref() -> impl Strategy<Value = machine::IdentityRef> {
    (token(), name())
        .prop_map(|(kind, name)| machine::IdentityRef { kind, name })
}

pub fn machine_spec() -> impl Strategy<Value = machine::OpenStackMachineSpec> {
    let image = (
        option::of(token()),
        option::of(token()),
        token(),
        token(),
        token(),
        token(),
        token(),
    );
    let network = (
        vec(port_opts(), 0..4),
        vec(security_group_filter(), 0..3),
        any::<bool>(),
        tokens(),
        string_map(),
        option::of(any::<bool>()),
    );
    let storage = (
        option::of(root_volume()),
        vec(additional_block_device(), 0..3),
        token(),
        option::of(identity_ref()),
    );

    (image, network, storage).prop_map(
        |(
            (
                provider_id,
                instance_id,
                cloud_name,
                flavor,
                image,
                image_uuid,
                ssh_key_name,
            ),
            (
                ports,
                security_groups,
                trunk,
                tags,
                server_metadata,
                config_drive,
            ),
            (
                root_volume,
                additional_block_devices,
                server_group_id,
                identity_ref,
            ),
        )| machine::OpenStackMachineSpec {
            provider_id,
            instance_id,
            cloud_name,
            flavor,
            image,
            image_uuid,
            ssh_key_name,
            ports,
            security_groups,
            trunk,
            tags,
            server_metadata,
            config_drive,
            root_volume,
            additional_block_devices,
            server_group_id,
            identity_ref,
        },
    )
}

fn machine_status() -> impl Strategy<Value = machine::OpenStackMachineStatus> {
    let address = (token(), token()).prop_map(|(address_type, address)| {
        machine::NodeAddress { address_type, address }
    });
    (
        any::<bool>(),
        option::of(select(machine::InstanceState::iter().collect::<Vec<_>>())),
        vec(address, 0..3),
        option::of(token()),
        option::of(token()),
    )
        .prop_map(
            |(
                ready,
                instance_state,
                addresses,
                failure_reason,
                failure_message,
            )| machine::OpenStackMachineStatus {
                ready,
                instance_state,
                addresses,
                failure_reason,
                failure_message,
            },
        )
}

pub fn hub_machine() -> impl Strategy<Value = machine::OpenStackMachine> {
    (object_meta(), machine_spec(), machine_status()).prop_map(
        |(metadata, spec, status)| machine::OpenStackMachine {
            metadata,
            spec,
            status,
        },
    )
}

pub fn hub_template(
) -> impl Strategy<Value = template::OpenStackMachineTemplate> {
    (object_meta(), machine_spec()).prop_map(|(metadata, spec)| {
        template::OpenStackMachineTemplate {
            metadata,
            spec: template::OpenStackMachineTemplateSpec {
                template: template::OpenStackMachineTemplateResource { spec },
            },
        }
    })
}

fn load_balancer() -> impl Strategy<Value = cluster::ApiServerLoadBalancer> {
    (any::<bool>(), vec(1..=65535i32, 0..3), tokens(), token()).prop_map(
        |(enabled, additional_ports, allowed_cidrs, provider)| {
            cluster::ApiServerLoadBalancer {
                enabled,
                additional_ports,
                allowed_cidrs,
                provider,
            }
        },
    )
}

fn bastion() -> impl Strategy<Value = cluster::Bastion> {
    (any::<bool>(), machine_spec(), token()).prop_map(
        |(enabled, instance, availability_zone)| cluster::Bastion {
            enabled,
            instance,
            availability_zone,
        },
    )
}

pub fn cluster_spec() -> impl Strategy<Value = cluster::OpenStackClusterSpec> {
    let networking = (
        token(),
        token(),
        network_filter(),
        subnet_filter(),
        tokens(),
        token(),
        load_balancer(),
    );
    let api_server = (
        any::<bool>(),
        token(),
        0..=65535i32,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        tokens(),
    );
    let placement = (
        (token(), 0..=65535i32),
        tokens(),
        any::<bool>(),
        option::of(bastion()),
        option::of(identity_ref()),
    );

    (networking, api_server, placement).prop_map(
        |(
            (
                cloud_name,
                node_cidr,
                network,
                subnet,
                dns_nameservers,
                external_network_id,
                api_server_load_balancer,
            ),
            (
                disable_api_server_floating_ip,
                api_server_floating_ip,
                api_server_port,
                managed_security_groups,
                allow_all_in_cluster_traffic,
                disable_port_security,
                tags,
            ),
            (
                (host, port),
                control_plane_availability_zones,
                control_plane_omit_availability_zone,
                bastion,
                identity_ref,
            ),
        )| cluster::OpenStackClusterSpec {
            cloud_name,
            node_cidr,
            network,
            subnet,
            dns_nameservers,
            external_network_id,
            api_server_load_balancer,
            disable_api_server_floating_ip,
            api_server_floating_ip,
            api_server_port,
            managed_security_groups,
            allow_all_in_cluster_traffic,
            disable_port_security,
            tags,
            control_plane_endpoint: cluster::ApiEndpoint { host, port },
            control_plane_availability_zones,
            control_plane_omit_availability_zone,
            bastion,
            identity_ref,
        },
    )
}

fn cluster_status() -> impl Strategy<Value = cluster::OpenStackClusterStatus> {
    (any::<bool>(), option::of(token()), option::of(token())).prop_map(
        |(ready, failure_reason, failure_message)| {
            cluster::OpenStackClusterStatus {
                ready,
                failure_reason,
                failure_message,
            }
        },
    )
}

pub fn hub_cluster() -> impl Strategy<Value = cluster::OpenStackCluster> {
    (object_meta(), cluster_spec(), cluster_status()).prop_map(
        |(metadata, spec, status)| cluster::OpenStackCluster {
            metadata,
            spec,
            status,
        },
    )
}

pub fn object_list<T: std::fmt::Debug>(
    item: impl Strategy<Value = T>,
) -> impl Strategy<Value = ObjectList<T>> {
    (token(), token(), vec(item, 0..4)).prop_map(
        |(resource_version, continue_token, items)| ObjectList {
            metadata: ListMeta {
                resource_version,
                continue_token,
                ..Default::default()
            },
            items,
        },
    )
}

fn serialized<T: Serialize + std::fmt::Debug>(
    strategy: impl Strategy<Value = T> + 'static,
) -> BoxedStrategy<Value> {
    strategy
        .prop_filter_map("object must serialize", |object| {
            serde_json::to_value(object).ok()
        })
        .boxed()
}

/// Serialized hub objects of `kind`, without `apiVersion` and `kind`.
pub fn hub_object(kind: Kind) -> BoxedStrategy<Value> {
    match kind {
        Kind::OpenStackCluster => serialized(hub_cluster()),
        Kind::OpenStackClusterList => serialized(object_list(hub_cluster())),
        Kind::OpenStackMachine => serialized(hub_machine()),
        Kind::OpenStackMachineList => serialized(object_list(hub_machine())),
        Kind::OpenStackMachineTemplate => serialized(hub_template()),
        Kind::OpenStackMachineTemplateList => {
            serialized(object_list(hub_template()))
        }
    }
}
