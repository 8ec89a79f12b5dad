// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Machine types for the v1alpha6 schema.

use std::collections::BTreeMap;

use capstan_types::{ObjectList, ObjectMeta};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::v1alpha5::filters::{
    AddressPair, FixedIp, NetworkFilter, SecurityGroupFilter,
};
use crate::v1alpha5::machine::{IdentityRef, OpenStackMachineStatus};

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct PortOpts {
    /// The network the port attaches to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkFilter>,

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

    #[serde(skip_serializing_if = "Option::is_none")]
    pub propagate_uplink_status: Option<bool>,

    pub tags: Vec<String>,
}

/// A volume to boot the machine from. The image it is created from is the
/// machine's `imageUUID`. Unchanged in every later version.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct RootVolume {
    #[serde(rename = "diskSize")]
    pub size: i32,

    pub volume_type: String,
    pub availability_zone: String,
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
