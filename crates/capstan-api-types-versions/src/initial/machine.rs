// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Machine types for the v1alpha5 schema.

use std::collections::BTreeMap;

use capstan_types::{ObjectList, ObjectMeta};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::filters::{AddressPair, FixedIp, SecurityGroupFilter};

/// A network port to create for a machine.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct PortOpts {
    /// ID of the network the port attaches to.
    #[serde(rename = "networkId")]
    pub network_id: String,

    pub name_suffix: String,
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_state_up: Option<bool>,

    pub mac_address: String,

    #[serde(rename = "fixedIPs")]
    pub fixed_ips: Vec<FixedIp>,

    pub tenant_id: String,
    pub project_id: String,
    pub security_groups: Vec<SecurityGroupFilter>,
    pub allowed_address_pairs: Vec<AddressPair>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trunk: Option<bool>,

    pub host_id: String,
    pub vnic_type: String,
    pub profile: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_port_security: Option<bool>,

    pub tags: Vec<String>,
}

/// A volume to boot the machine from instead of ephemeral storage.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct RootVolume {
    /// How the volume was sourced, e.g. "image".
    pub source_type: String,

    #[serde(rename = "sourceUUID")]
    pub source_uuid: String,

    /// The role of the volume, e.g. "disk".
    pub device_type: String,

    #[serde(rename = "diskSize")]
    pub size: i32,

    pub volume_type: String,
    pub availability_zone: String,
}

/// Names the credentials used to talk to the cloud. Unchanged in every later
/// version.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct IdentityRef {
    /// The kind of the referenced object. `Secret` is the only kind currently
    /// supported.
    pub kind: String,

    pub name: String,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct OpenStackMachineSpec {
    #[serde(rename = "providerID", skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,

    #[serde(rename = "instanceID", skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,

    pub cloud_name: String,
    pub flavor: String,
    pub image: String,

    #[serde(rename = "imageUUID")]
    pub image_uuid: String,

    pub ssh_key_name: String,
    pub ports: Vec<PortOpts>,
    pub security_groups: Vec<SecurityGroupFilter>,
    pub trunk: bool,
    pub tags: Vec<String>,
    pub server_metadata: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_drive: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_volume: Option<RootVolume>,

    #[serde(rename = "serverGroupID")]
    pub server_group_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_ref: Option<IdentityRef>,
}

/// The lifecycle state of a machine's server as reported by the cloud.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Deserialize,
    Serialize,
    JsonSchema,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum InstanceState {
    Build,
    Active,
    Error,
    Stopped,
    Shutoff,
    Deleted,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeAddress {
    #[serde(rename = "type")]
    pub address_type: String,

    pub address: String,
}

/// Observed machine state. Unchanged in every later version.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, rename_all = "camelCase")]
pub struct OpenStackMachineStatus {
    pub ready: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_state: Option<InstanceState>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<NodeAddress>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, deny_unknown_fields)]
pub struct OpenStackMachine {
    pub metadata: ObjectMeta,
    pub spec: OpenStackMachineSpec,
    pub status: OpenStackMachineStatus,
}

pub type OpenStackMachineList = ObjectList<OpenStackMachine>;
