// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cluster types for the v1alpha6 schema.

use capstan_types::{ObjectList, ObjectMeta};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::machine::OpenStackMachineSpec;
use crate::v1alpha5::cluster::{ApiEndpoint, OpenStackClusterStatus};
use crate::v1alpha5::filters::{NetworkFilter, SubnetFilter};
use crate::v1alpha5::machine::IdentityRef;

/// Describes the load balancer fronting the API server.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ApiServerLoadBalancer {
    pub enabled: bool,
    pub additional_ports: Vec<i32>,

    /// Source CIDRs allowed to reach the load balancer. Empty allows all.
    pub allowed_cidrs: Vec<String>,
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
