// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cluster types for the v1alpha5 schema.

use capstan_types::{ObjectList, ObjectMeta};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::filters::{NetworkFilter, SubnetFilter};
use super::machine::{IdentityRef, OpenStackMachineSpec};

/// The endpoint clients use to reach the cluster's API server. Unchanged in
/// every later version.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, deny_unknown_fields)]
pub struct ApiEndpoint {
    pub host: String,
    pub port: i32,
}

/// A jump host provisioned alongside the cluster.
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

    /// Whether a load balancer fronts the API server.
    #[serde(rename = "managedAPIServerLoadBalancer")]
    pub managed_api_server_load_balancer: bool,

    /// Extra ports to open on the API server load balancer.
    #[serde(rename = "apiServerLoadBalancerAdditionalPorts")]
    pub api_server_load_balancer_additional_ports: Vec<i32>,

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

/// Observed cluster state. Unchanged in every later version.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, rename_all = "camelCase")]
pub struct OpenStackClusterStatus {
    pub ready: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
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
