// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Machine types for the v1alpha7 schema.

use std::collections::BTreeMap;

use capstan_types::{ObjectList, ObjectMeta};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::filters::{
    resolve_project_id, FixedIp, NetworkFilter, SecurityGroupFilter,
};
use crate::v1alpha5;
use crate::v1alpha5::filters::AddressPair;
use crate::v1alpha5::machine::{IdentityRef, OpenStackMachineStatus};
use crate::v1alpha6;
use crate::v1alpha6::machine::RootVolume;

/// The `deviceType` every sized v1alpha5 root volume is given on downgrade.
pub const ROOT_VOLUME_DEVICE_TYPE: &str = "disk";

/// The `sourceType` every sized v1alpha5 root volume is given on downgrade.
pub const ROOT_VOLUME_SOURCE_TYPE: &str = "image";

/// An extra key/value pair passed verbatim to the port create request.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, deny_unknown_fields)]
pub struct ValueSpec {
    pub name: String,
    pub key: String,
    pub value: String,
}

/// A volume attached to the machine in addition to its root disk.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct AdditionalBlockDevice {
    pub name: String,

    #[serde(rename = "sizeGiB")]
    pub size_gib: i32,

    pub volume_type: String,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct PortOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkFilter>,

    pub name_suffix: String,
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_state_up: Option<bool>,

    pub mac_address: String,

    #[serde(rename = "fixedIPs")]
    pub fixed_ips: Vec<FixedIp>,

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

    pub value_specs: Vec<ValueSpec>,
    pub tags: Vec<String>,
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

    /// The image to boot from. When the machine has a sized root volume, the
    /// volume is created from this image.
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

    pub additional_block_devices: Vec<AdditionalBlockDevice>,

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

// Conversions between v1alpha5 ports and hub ports. A bare network ID is
// promoted to a filter holding just that ID; on the way back only such a
// filter fits in the scalar.

impl From<v1alpha5::machine::PortOpts> for PortOpts {
    fn from(old: v1alpha5::machine::PortOpts) -> Self {
        let network = if old.network_id.is_empty() {
            None
        } else {
            Some(NetworkFilter::with_id(old.network_id))
        };

        Self {
            network,
            name_suffix: old.name_suffix,
            description: old.description,
            admin_state_up: old.admin_state_up,
            mac_address: old.mac_address,
            fixed_ips: old.fixed_ips.into_iter().map(Into::into).collect(),
            project_id: resolve_project_id(old.project_id, old.tenant_id),
            security_groups: old
                .security_groups
                .into_iter()
                .map(Into::into)
                .collect(),
            allowed_address_pairs: old.allowed_address_pairs,
            trunk: old.trunk,
            host_id: old.host_id,
            vnic_type: old.vnic_type,
            profile: old.profile,
            disable_port_security: old.disable_port_security,
            propagate_uplink_status: None,
            value_specs: Vec::new(),
            tags: old.tags,
        }
    }
}

impl From<PortOpts> for v1alpha5::machine::PortOpts {
    fn from(new: PortOpts) -> Self {
        let network_id = match new.network {
            Some(filter) if filter.is_bare_id() => filter.id,
            _ => String::new(),
        };

        Self {
            network_id,
            name_suffix: new.name_suffix,
            description: new.description,
            admin_state_up: new.admin_state_up,
            mac_address: new.mac_address,
            fixed_ips: new.fixed_ips.into_iter().map(Into::into).collect(),
            tenant_id: new.project_id.clone(),
            project_id: new.project_id,
            security_groups: new
                .security_groups
                .into_iter()
                .map(Into::into)
                .collect(),
            allowed_address_pairs: new.allowed_address_pairs,
            trunk: new.trunk,
            host_id: new.host_id,
            vnic_type: new.vnic_type,
            profile: new.profile,
            disable_port_security: new.disable_port_security,
            tags: new.tags,
        }
    }
}

// Conversions between v1alpha6 ports and hub ports.

impl From<v1alpha6::machine::PortOpts> for PortOpts {
    fn from(old: v1alpha6::machine::PortOpts) -> Self {
        Self {
            network: old.network.map(Into::into),
            name_suffix: old.name_suffix,
            description: old.description,
            admin_state_up: old.admin_state_up,
            mac_address: old.mac_address,
            fixed_ips: old.fixed_ips.into_iter().map(Into::into).collect(),
            project_id: resolve_project_id(old.project_id, old.tenant_id),
            security_groups: old
                .security_groups
                .into_iter()
                .map(Into::into)
                .collect(),
            allowed_address_pairs: old.allowed_address_pairs,
            trunk: old.trunk,
            host_id: old.host_id,
            vnic_type: old.vnic_type,
            profile: old.profile,
            disable_port_security: old.disable_port_security,
            propagate_uplink_status: old.propagate_uplink_status,
            value_specs: Vec::new(),
            tags: old.tags,
        }
    }
}

impl From<PortOpts> for v1alpha6::machine::PortOpts {
    fn from(new: PortOpts) -> Self {
        Self {
            network: new.network.map(Into::into),
            name_suffix: new.name_suffix,
            description: new.description,
            admin_state_up: new.admin_state_up,
            mac_address: new.mac_address,
            fixed_ips: new.fixed_ips.into_iter().map(Into::into).collect(),
            tenant_id: new.project_id.clone(),
            project_id: new.project_id,
            security_groups: new
                .security_groups
                .into_iter()
                .map(Into::into)
                .collect(),
            allowed_address_pairs: new.allowed_address_pairs,
            trunk: new.trunk,
            host_id: new.host_id,
            vnic_type: new.vnic_type,
            profile: new.profile,
            disable_port_security: new.disable_port_security,
            propagate_uplink_status: new.propagate_uplink_status,
            tags: new.tags,
        }
    }
}

// Conversions between v1alpha5 machine specs and hub machine specs.
//
// A v1alpha5 root volume with a positive size names the image it is created
// from in `sourceUUID`; the hub keeps that image in the machine's
// `imageUUID` instead. Going back, the volume's source and device types are
// always written as "image" and "disk": the hub no longer models any other
// combination, so whatever the original object held there is not recovered.

impl From<v1alpha5::machine::RootVolume> for RootVolume {
    fn from(old: v1alpha5::machine::RootVolume) -> Self {
        Self {
            size: old.size,
            volume_type: old.volume_type,
            availability_zone: old.availability_zone,
        }
    }
}

impl From<v1alpha5::machine::OpenStackMachineSpec> for OpenStackMachineSpec {
    fn from(old: v1alpha5::machine::OpenStackMachineSpec) -> Self {
        let image_uuid = match &old.root_volume {
            Some(rv) if rv.size > 0 => rv.source_uuid.clone(),
            _ => old.image_uuid,
        };

        Self {
            provider_id: old.provider_id,
            instance_id: old.instance_id,
            cloud_name: old.cloud_name,
            flavor: old.flavor,
            image: old.image,
            image_uuid,
            ssh_key_name: old.ssh_key_name,
            ports: old.ports.into_iter().map(Into::into).collect(),
            security_groups: old
                .security_groups
                .into_iter()
                .map(Into::into)
                .collect(),
            trunk: old.trunk,
            tags: old.tags,
            server_metadata: old.server_metadata,
            config_drive: old.config_drive,
            root_volume: old.root_volume.map(Into::into),
            additional_block_devices: Vec::new(),
            server_group_id: old.server_group_id,
            identity_ref: old.identity_ref,
        }
    }
}

impl From<OpenStackMachineSpec> for v1alpha5::machine::OpenStackMachineSpec {
    fn from(new: OpenStackMachineSpec) -> Self {
        let (root_volume, image_uuid) = match new.root_volume {
            Some(rv) if rv.size > 0 => (
                Some(v1alpha5::machine::RootVolume {
                    source_type: ROOT_VOLUME_SOURCE_TYPE.to_owned(),
                    source_uuid: new.image_uuid,
                    device_type: ROOT_VOLUME_DEVICE_TYPE.to_owned(),
                    size: rv.size,
                    volume_type: rv.volume_type,
                    availability_zone: rv.availability_zone,
                }),
                String::new(),
            ),
            Some(rv) => (
                Some(v1alpha5::machine::RootVolume {
                    size: rv.size,
                    volume_type: rv.volume_type,
                    availability_zone: rv.availability_zone,
                    ..Default::default()
                }),
                new.image_uuid,
            ),
            None => (None, new.image_uuid),
        };

        Self {
            provider_id: new.provider_id,
            instance_id: new.instance_id,
            cloud_name: new.cloud_name,
            flavor: new.flavor,
            image: new.image,
            image_uuid,
            ssh_key_name: new.ssh_key_name,
            ports: new.ports.into_iter().map(Into::into).collect(),
            security_groups: new
                .security_groups
                .into_iter()
                .map(Into::into)
                .collect(),
            trunk: new.trunk,
            tags: new.tags,
            server_metadata: new.server_metadata,
            config_drive: new.config_drive,
            root_volume,
            server_group_id: new.server_group_id,
            identity_ref: new.identity_ref,
        }
    }
}

// Conversions between v1alpha6 machine specs and hub machine specs.

impl From<v1alpha6::machine::OpenStackMachineSpec> for OpenStackMachineSpec {
    fn from(old: v1alpha6::machine::OpenStackMachineSpec) -> Self {
        Self {
            provider_id: old.provider_id,
            instance_id: old.instance_id,
            cloud_name: old.cloud_name,
            flavor: old.flavor,
            image: old.image,
            image_uuid: old.image_uuid,
            ssh_key_name: old.ssh_key_name,
            ports: old.ports.into_iter().map(Into::into).collect(),
            security_groups: old
                .security_groups
                .into_iter()
                .map(Into::into)
                .collect(),
            trunk: old.trunk,
            tags: old.tags,
            server_metadata: old.server_metadata,
            config_drive: old.config_drive,
            root_volume: old.root_volume,
            additional_block_devices: Vec::new(),
            server_group_id: old.server_group_id,
            identity_ref: old.identity_ref,
        }
    }
}

impl From<OpenStackMachineSpec> for v1alpha6::machine::OpenStackMachineSpec {
    fn from(new: OpenStackMachineSpec) -> Self {
        Self {
            provider_id: new.provider_id,
            instance_id: new.instance_id,
            cloud_name: new.cloud_name,
            flavor: new.flavor,
            image: new.image,
            image_uuid: new.image_uuid,
            ssh_key_name: new.ssh_key_name,
            ports: new.ports.into_iter().map(Into::into).collect(),
            security_groups: new
                .security_groups
                .into_iter()
                .map(Into::into)
                .collect(),
            trunk: new.trunk,
            tags: new.tags,
            server_metadata: new.server_metadata,
            config_drive: new.config_drive,
            root_volume: new.root_volume,
            server_group_id: new.server_group_id,
            identity_ref: new.identity_ref,
        }
    }
}

// Conversions for OpenStackMachine.

impl From<v1alpha5::machine::OpenStackMachine> for OpenStackMachine {
    fn from(old: v1alpha5::machine::OpenStackMachine) -> Self {
        Self {
            metadata: old.metadata,
            spec: old.spec.into(),
            status: old.status,
        }
    }
}

impl From<OpenStackMachine> for v1alpha5::machine::OpenStackMachine {
    fn from(new: OpenStackMachine) -> Self {
        Self {
            metadata: new.metadata,
            spec: new.spec.into(),
            status: new.status,
        }
    }
}

impl From<v1alpha6::machine::OpenStackMachine> for OpenStackMachine {
    fn from(old: v1alpha6::machine::OpenStackMachine) -> Self {
        Self {
            metadata: old.metadata,
            spec: old.spec.into(),
            status: old.status,
        }
    }
}

impl From<OpenStackMachine> for v1alpha6::machine::OpenStackMachine {
    fn from(new: OpenStackMachine) -> Self {
        Self {
            metadata: new.metadata,
            spec: new.spec.into(),
            status: new.status,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bare_network_id_is_promoted_and_restored() {
        let old = v1alpha5::machine::PortOpts {
            network_id: "net-1".to_owned(),
            ..Default::default()
        };

        let hub = PortOpts::from(old.clone());
        assert_eq!(hub.network, Some(NetworkFilter::with_id("net-1")));

        let back = v1alpha5::machine::PortOpts::from(hub);
        assert_eq!(back, old);
    }

    #[test]
    fn rich_network_filter_does_not_fit_network_id() {
        let hub = PortOpts {
            network: Some(NetworkFilter {
                id: "net-1".to_owned(),
                name: "public".to_owned(),
                ..Default::default()
            }),
            ..Default::default()
        };

        let old = v1alpha5::machine::PortOpts::from(hub);
        assert_eq!(old.network_id, "");
    }

    #[test]
    fn sized_root_volume_collapses_to_image_disk() {
        let hub = OpenStackMachineSpec {
            image_uuid: "img-1".to_owned(),
            root_volume: Some(RootVolume { size: 50, ..Default::default() }),
            ..Default::default()
        };

        let old = v1alpha5::machine::OpenStackMachineSpec::from(hub.clone());
        let rv = old.root_volume.as_ref().unwrap();
        assert_eq!(rv.device_type, ROOT_VOLUME_DEVICE_TYPE);
        assert_eq!(rv.source_type, ROOT_VOLUME_SOURCE_TYPE);
        assert_eq!(rv.source_uuid, "img-1");
        assert_eq!(rv.size, 50);
        assert_eq!(old.image_uuid, "");

        assert_eq!(OpenStackMachineSpec::from(old), hub);
    }

    #[test]
    fn collapsed_markers_are_not_recovered() {
        let old = v1alpha5::machine::OpenStackMachineSpec {
            root_volume: Some(v1alpha5::machine::RootVolume {
                source_type: "snapshot".to_owned(),
                source_uuid: "snap-1".to_owned(),
                device_type: "cdrom".to_owned(),
                size: 10,
                ..Default::default()
            }),
            ..Default::default()
        };

        let back = v1alpha5::machine::OpenStackMachineSpec::from(
            OpenStackMachineSpec::from(old),
        );
        let rv = back.root_volume.unwrap();
        assert_eq!(rv.source_uuid, "snap-1");
        assert_eq!(rv.source_type, ROOT_VOLUME_SOURCE_TYPE);
        assert_eq!(rv.device_type, ROOT_VOLUME_DEVICE_TYPE);
    }

    #[test]
    fn unsized_root_volume_keeps_top_level_image() {
        let old = v1alpha5::machine::OpenStackMachineSpec {
            image_uuid: "img-2".to_owned(),
            root_volume: Some(v1alpha5::machine::RootVolume {
                volume_type: "ssd".to_owned(),
                ..Default::default()
            }),
            ..Default::default()
        };

        let hub = OpenStackMachineSpec::from(old.clone());
        assert_eq!(hub.image_uuid, "img-2");
        assert_eq!(v1alpha5::machine::OpenStackMachineSpec::from(hub), old);
    }
}
