// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cluster types for the v1alpha7 schema.

use capstan_types::{ObjectList, ObjectMeta};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::filters::{NetworkFilter, SubnetFilter};
use super::machine::OpenStackMachineSpec;
use crate::v1alpha5;
use crate::v1alpha5::cluster::{ApiEndpoint, OpenStackClusterStatus};
use crate::v1alpha5::machine::IdentityRef;
use crate::v1alpha6;

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ApiServerLoadBalancer {
    pub enabled: bool,
    pub additional_ports: Vec<i32>,
    pub allowed_cidrs: Vec<String>,

    /// The load balancer provider to request, e.g. "amphora". Empty selects
    /// the cloud's default.
    pub provider: String,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct Bastion {
    pub enabled: bool,
    pub instance: OpenStackMachineSpec,
    pub availability_zone: String,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct OpenStackClusterSpec {
    pub cloud_name: String,
    pub node_cidr: String,
    pub network: NetworkFilter,
    pub subnet: SubnetFilter,
    pub dns_nameservers: Vec<String>,
    pub external_network_id: String,

    #[serde(rename = "apiServerLoadBalancer")]
    pub api_server_load_balancer: ApiServerLoadBalancer,

    #[serde(rename = "disableAPIServerFloatingIP")]
    pub disable_api_server_floating_ip: bool,

    #[serde(rename = "apiServerFloatingIP")]
    pub api_server_floating_ip: String,

    #[serde(rename = "apiServerPort")]
    pub api_server_port: i32,

    pub managed_security_groups: bool,
    pub allow_all_in_cluster_traffic: bool,
    pub disable_port_security: bool,
    pub tags: Vec<String>,
    pub control_plane_endpoint: ApiEndpoint,
    pub control_plane_availability_zones: Vec<String>,

    /// Create control plane machines without requesting any availability
    /// zone, leaving the choice to the cloud.
    pub control_plane_omit_availability_zone: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bastion: Option<Bastion>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_ref: Option<IdentityRef>,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, deny_unknown_fields)]
pub struct OpenStackCluster {
    pub metadata: ObjectMeta,
    pub spec: OpenStackClusterSpec,
    pub status: OpenStackClusterStatus,
}

pub type OpenStackClusterList = ObjectList<OpenStackCluster>;

// Conversions between bastions.

impl From<v1alpha5::cluster::Bastion> for Bastion {
    fn from(old: v1alpha5::cluster::Bastion) -> Self {
        Self {
            enabled: old.enabled,
            instance: old.instance.into(),
            availability_zone: old.availability_zone,
        }
    }
}

impl From<Bastion> for v1alpha5::cluster::Bastion {
    fn from(new: Bastion) -> Self {
        Self {
            enabled: new.enabled,
            instance: new.instance.into(),
            availability_zone: new.availability_zone,
        }
    }
}

impl From<v1alpha6::cluster::Bastion> for Bastion {
    fn from(old: v1alpha6::cluster::Bastion) -> Self {
        Self {
            enabled: old.enabled,
            instance: old.instance.into(),
            availability_zone: old.availability_zone,
        }
    }
}

impl From<Bastion> for v1alpha6::cluster::Bastion {
    fn from(new: Bastion) -> Self {
        Self {
            enabled: new.enabled,
            instance: new.instance.into(),
            availability_zone: new.availability_zone,
        }
    }
}

impl From<v1alpha6::cluster::ApiServerLoadBalancer> for ApiServerLoadBalancer {
    fn from(old: v1alpha6::cluster::ApiServerLoadBalancer) -> Self {
        Self {
            enabled: old.enabled,
            additional_ports: old.additional_ports,
            allowed_cidrs: old.allowed_cidrs,
            provider: String::new(),
        }
    }
}

impl From<ApiServerLoadBalancer> for v1alpha6::cluster::ApiServerLoadBalancer {
    fn from(new: ApiServerLoadBalancer) -> Self {
        Self {
            enabled: new.enabled,
            additional_ports: new.additional_ports,
            allowed_cidrs: new.allowed_cidrs,
        }
    }
}

// Conversions between v1alpha5 cluster specs and hub cluster specs. The two
// flat load balancer fields become the hub's nested load balancer.

impl From<v1alpha5::cluster::OpenStackClusterSpec> for OpenStackClusterSpec {
    fn from(old: v1alpha5::cluster::OpenStackClusterSpec) -> Self {
        Self {
            cloud_name: old.cloud_name,
            node_cidr: old.node_cidr,
            network: old.network.into(),
            subnet: old.subnet.into(),
            dns_nameservers: old.dns_nameservers,
            external_network_id: old.external_network_id,
            api_server_load_balancer: ApiServerLoadBalancer {
                enabled: old.managed_api_server_load_balancer,
                additional_ports: old.api_server_load_balancer_additional_ports,
                allowed_cidrs: Vec::new(),
                provider: String::new(),
            },
            disable_api_server_floating_ip: old.disable_api_server_floating_ip,
            api_server_floating_ip: old.api_server_floating_ip,
            api_server_port: old.api_server_port,
            managed_security_groups: old.managed_security_groups,
            allow_all_in_cluster_traffic: old.allow_all_in_cluster_traffic,
            disable_port_security: old.disable_port_security,
            tags: old.tags,
            control_plane_endpoint: old.control_plane_endpoint,
            control_plane_availability_zones: old
                .control_plane_availability_zones,
            control_plane_omit_availability_zone: false,
            bastion: old.bastion.map(Into::into),
            identity_ref: old.identity_ref,
        }
    }
}

impl From<OpenStackClusterSpec> for v1alpha5::cluster::OpenStackClusterSpec {
    fn from(new: OpenStackClusterSpec) -> Self {
        Self {
            cloud_name: new.cloud_name,
            node_cidr: new.node_cidr,
            network: new.network.into(),
            subnet: new.subnet.into(),
            dns_nameservers: new.dns_nameservers,
            external_network_id: new.external_network_id,
            managed_api_server_load_balancer: new
                .api_server_load_balancer
                .enabled,
            api_server_load_balancer_additional_ports: new
                .api_server_load_balancer
                .additional_ports,
            disable_api_server_floating_ip: new.disable_api_server_floating_ip,
            api_server_floating_ip: new.api_server_floating_ip,
            api_server_port: new.api_server_port,
            managed_security_groups: new.managed_security_groups,
            allow_all_in_cluster_traffic: new.allow_all_in_cluster_traffic,
            disable_port_security: new.disable_port_security,
            tags: new.tags,
            control_plane_endpoint: new.control_plane_endpoint,
            control_plane_availability_zones: new
                .control_plane_availability_zones,
            bastion: new.bastion.map(Into::into),
            identity_ref: new.identity_ref,
        }
    }
}

// Conversions between v1alpha6 cluster specs and hub cluster specs.

impl From<v1alpha6::cluster::OpenStackClusterSpec> for OpenStackClusterSpec {
    fn from(old: v1alpha6::cluster::OpenStackClusterSpec) -> Self {
        Self {
            cloud_name: old.cloud_name,
            node_cidr: old.node_cidr,
            network: old.network.into(),
            subnet: old.subnet.into(),
            dns_nameservers: old.dns_nameservers,
            external_network_id: old.external_network_id,
            api_server_load_balancer: old.api_server_load_balancer.into(),
            disable_api_server_floating_ip: old.disable_api_server_floating_ip,
            api_server_floating_ip: old.api_server_floating_ip,
            api_server_port: old.api_server_port,
            managed_security_groups: old.managed_security_groups,
            allow_all_in_cluster_traffic: old.allow_all_in_cluster_traffic,
            disable_port_security: old.disable_port_security,
            tags: old.tags,
            control_plane_endpoint: old.control_plane_endpoint,
            control_plane_availability_zones: old
                .control_plane_availability_zones,
            control_plane_omit_availability_zone: false,
            bastion: old.bastion.map(Into::into),
            identity_ref: old.identity_ref,
        }
    }
}

impl From<OpenStackClusterSpec> for v1alpha6::cluster::OpenStackClusterSpec {
    fn from(new: OpenStackClusterSpec) -> Self {
        Self {
            cloud_name: new.cloud_name,
            node_cidr: new.node_cidr,
            network: new.network.into(),
            subnet: new.subnet.into(),
            dns_nameservers: new.dns_nameservers,
            external_network_id: new.external_network_id,
            api_server_load_balancer: new.api_server_load_balancer.into(),
            disable_api_server_floating_ip: new.disable_api_server_floating_ip,
            api_server_floating_ip: new.api_server_floating_ip,
            api_server_port: new.api_server_port,
            managed_security_groups: new.managed_security_groups,
            allow_all_in_cluster_traffic: new.allow_all_in_cluster_traffic,
            disable_port_security: new.disable_port_security,
            tags: new.tags,
            control_plane_endpoint: new.control_plane_endpoint,
            control_plane_availability_zones: new
                .control_plane_availability_zones,
            bastion: new.bastion.map(Into::into),
            identity_ref: new.identity_ref,
        }
    }
}

// Conversions for OpenStackCluster.

impl From<v1alpha5::cluster::OpenStackCluster> for OpenStackCluster {
    fn from(old: v1alpha5::cluster::OpenStackCluster) -> Self {
        Self {
            metadata: old.metadata,
            spec: old.spec.into(),
            status: old.status,
        }
    }
}

impl From<OpenStackCluster> for v1alpha5::cluster::OpenStackCluster {
    fn from(new: OpenStackCluster) -> Self {
        Self {
            metadata: new.metadata,
            spec: new.spec.into(),
            status: new.status,
        }
    }
}

impl From<v1alpha6::cluster::OpenStackCluster> for OpenStackCluster {
    fn from(old: v1alpha6::cluster::OpenStackCluster) -> Self {
        Self {
            metadata: old.metadata,
            spec: old.spec.into(),
            status: old.status,
        }
    }
}

impl From<OpenStackCluster> for v1alpha6::cluster::OpenStackCluster {
    fn from(new: OpenStackCluster) -> Self {
        Self {
            metadata: new.metadata,
            spec: new.spec.into(),
            status: new.status,
        }
    }
}
