// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion of v1alpha5 objects.
//!
//! On top of everything v1alpha6 lacks, v1alpha5 cannot hold a port network
//! filter richer than a bare ID, a port's uplink status propagation, or the
//! load balancer's allowed CIDRs.

use capstan_api_types_versions::latest::{cluster, filters, machine, template};
use capstan_api_types_versions::v1alpha5;
use capstan_types::{Kind, SchemaVersion};
use serde::{Deserialize, Serialize};

use crate::residue::{capture_each, restore_each};
use crate::Convertible;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PortResidue {
    /// The port's network filter, if it cannot be written as a bare ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<filters::NetworkFilter>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub propagate_uplink_status: Option<bool>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub value_specs: Vec<machine::ValueSpec>,
}

impl PortResidue {
    fn capture(port: &machine::PortOpts) -> Self {
        Self {
            network: port.network.clone().filter(|n| !n.is_bare_id()),
            propagate_uplink_status: port.propagate_uplink_status,
            value_specs: port.value_specs.clone(),
        }
    }

    fn restore(self, port: &mut machine::PortOpts) {
        // A network set through the spoke's bare ID takes precedence.
        if port.network.is_none() {
            port.network = self.network;
        }
        port.propagate_uplink_status = self.propagate_uplink_status;
        port.value_specs = self.value_specs;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MachineSpecResidue {
    /// One entry per port, in port order, or empty if no port has residue.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<PortResidue>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional_block_devices: Vec<machine::AdditionalBlockDevice>,
}

impl MachineSpecResidue {
    pub fn capture(spec: &machine::OpenStackMachineSpec) -> Self {
        Self {
            ports: capture_each(&spec.ports, PortResidue::capture),
            additional_block_devices: spec.additional_block_devices.clone(),
        }
    }

    pub fn restore(self, spec: &mut machine::OpenStackMachineSpec) {
        restore_each(&mut spec.ports, self.ports, |port, residue| {
            residue.restore(port)
        });
        spec.additional_block_devices = self.additional_block_devices;
    }
}

/// Root volume values lost on upgrade. A sized volume always comes back as
/// an image-sourced disk built from the hub's `imageUUID`; an unsized one
/// keeps none of its source fields.
fn discarded_root_volume(
    path: &str,
    spec: &v1alpha5::machine::OpenStackMachineSpec,
) -> Vec<(String, String)> {
    let Some(rv) = &spec.root_volume else {
        return Vec::new();
    };

    let mut lost = Vec::new();
    if rv.size > 0 {
        if rv.source_type != machine::ROOT_VOLUME_SOURCE_TYPE {
            lost.push(("rootVolume.sourceType", &rv.source_type));
        }
        if rv.device_type != machine::ROOT_VOLUME_DEVICE_TYPE {
            lost.push(("rootVolume.deviceType", &rv.device_type));
        }
        if spec.image_uuid != rv.source_uuid {
            lost.push(("imageUUID", &spec.image_uuid));
        }
    } else {
        lost.push(("rootVolume.sourceType", &rv.source_type));
        lost.push(("rootVolume.deviceType", &rv.device_type));
        lost.push(("rootVolume.sourceUUID", &rv.source_uuid));
    }

    lost.into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(field, value)| (format!("{path}.{field}"), value.clone()))
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterResidue {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_cidrs: Vec<String>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_server_load_balancer_provider: String,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub control_plane_omit_availability_zone: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bastion: Option<MachineSpecResidue>,
}

impl ClusterResidue {
    pub fn capture(spec: &cluster::OpenStackClusterSpec) -> Self {
        let lb = &spec.api_server_load_balancer;
        Self {
            allowed_cidrs: lb.allowed_cidrs.clone(),
            api_server_load_balancer_provider: lb.provider.clone(),
            control_plane_omit_availability_zone: spec
                .control_plane_omit_availability_zone,
            bastion: spec
                .bastion
                .as_ref()
                .map(|b| MachineSpecResidue::capture(&b.instance))
                .filter(|r| *r != MachineSpecResidue::default()),
        }
    }

    pub fn restore(self, spec: &mut cluster::OpenStackClusterSpec) {
        let lb = &mut spec.api_server_load_balancer;
        lb.allowed_cidrs = self.allowed_cidrs;
        lb.provider = self.api_server_load_balancer_provider;
        spec.control_plane_omit_availability_zone =
            self.control_plane_omit_availability_zone;
        if let (Some(residue), Some(bastion)) =
            (self.bastion, spec.bastion.as_mut())
        {
            residue.restore(&mut bastion.instance);
        }
    }
}

impl Convertible for v1alpha5::cluster::OpenStackCluster {
    type Hub = cluster::OpenStackCluster;
    type Residue = ClusterResidue;

    const VERSION: SchemaVersion = SchemaVersion::V1alpha5;
    const KIND: Kind = Kind::OpenStackCluster;

    fn into_hub(self) -> Self::Hub {
        self.into()
    }

    fn from_hub(hub: Self::Hub) -> Self {
        hub.into()
    }

    fn capture(hub: &Self::Hub) -> Self::Residue {
        ClusterResidue::capture(&hub.spec)
    }

    fn restore(hub: &mut Self::Hub, residue: Self::Residue) {
        residue.restore(&mut hub.spec)
    }

    fn discarded(&self) -> Vec<(String, String)> {
        self.spec
            .bastion
            .as_ref()
            .map(|b| {
                discarded_root_volume("spec.bastion.instance", &b.instance)
            })
            .unwrap_or_default()
    }
}

impl Convertible for v1alpha5::machine::OpenStackMachine {
    type Hub = machine::OpenStackMachine;
    type Residue = MachineSpecResidue;

    const VERSION: SchemaVersion = SchemaVersion::V1alpha5;
    const KIND: Kind = Kind::OpenStackMachine;

    fn into_hub(self) -> Self::Hub {
        self.into()
    }

    fn from_hub(hub: Self::Hub) -> Self {
        hub.into()
    }

    fn capture(hub: &Self::Hub) -> Self::Residue {
        MachineSpecResidue::capture(&hub.spec)
    }

    fn restore(hub: &mut Self::Hub, residue: Self::Residue) {
        residue.restore(&mut hub.spec)
    }

    fn discarded(&self) -> Vec<(String, String)> {
        discarded_root_volume("spec", &self.spec)
    }
}

impl Convertible for v1alpha5::template::OpenStackMachineTemplate {
    type Hub = template::OpenStackMachineTemplate;
    type Residue = MachineSpecResidue;

    const VERSION: SchemaVersion = SchemaVersion::V1alpha5;
    const KIND: Kind = Kind::OpenStackMachineTemplate;

    fn into_hub(self) -> Self::Hub {
        self.into()
    }

    fn from_hub(hub: Self::Hub) -> Self {
        hub.into()
    }

    fn capture(hub: &Self::Hub) -> Self::Residue {
        MachineSpecResidue::capture(&hub.spec.template.spec)
    }

    fn restore(hub: &mut Self::Hub, residue: Self::Residue) {
        residue.restore(&mut hub.spec.template.spec)
    }

    fn discarded(&self) -> Vec<(String, String)> {
        discarded_root_volume("spec.template.spec", &self.spec.template.spec)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sized_volume(
        source_type: &str,
        device_type: &str,
    ) -> v1alpha5::machine::RootVolume {
        v1alpha5::machine::RootVolume {
            source_type: source_type.to_owned(),
            source_uuid: "img-1".to_owned(),
            device_type: device_type.to_owned(),
            size: 50,
            ..Default::default()
        }
    }

    fn spoke_machine(
        root_volume: v1alpha5::machine::RootVolume,
    ) -> v1alpha5::machine::OpenStackMachine {
        v1alpha5::machine::OpenStackMachine {
            spec: v1alpha5::machine::OpenStackMachineSpec {
                root_volume: Some(root_volume),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn lost(field: &str, value: &str) -> (String, String) {
        (field.to_owned(), value.to_owned())
    }

    #[test]
    fn default_root_volume_markers_lose_nothing() {
        let m = spoke_machine(sized_volume(
            machine::ROOT_VOLUME_SOURCE_TYPE,
            machine::ROOT_VOLUME_DEVICE_TYPE,
        ));
        assert!(m.discarded().is_empty());
        assert!(spoke_machine(sized_volume("", "")).discarded().is_empty());
    }

    #[test]
    fn other_root_volume_markers_are_reported() {
        let mut m = spoke_machine(sized_volume("snapshot", "cdrom"));
        m.spec.image_uuid = "img-2".to_owned();
        assert_eq!(
            m.discarded(),
            vec![
                lost("spec.rootVolume.sourceType", "snapshot"),
                lost("spec.rootVolume.deviceType", "cdrom"),
                lost("spec.imageUUID", "img-2"),
            ]
        );
    }

    #[test]
    fn unsized_root_volume_reports_source_fields() {
        let m = spoke_machine(v1alpha5::machine::RootVolume {
            source_uuid: "img-1".to_owned(),
            ..Default::default()
        });
        assert_eq!(
            m.discarded(),
            vec![lost("spec.rootVolume.sourceUUID", "img-1")]
        );
    }

    #[test]
    fn template_and_bastion_paths() {
        let volume = sized_volume("volume", machine::ROOT_VOLUME_DEVICE_TYPE);
        let spec = spoke_machine(volume).spec;

        let mut t = v1alpha5::template::OpenStackMachineTemplate::default();
        t.spec.template.spec = spec.clone();
        assert_eq!(
            t.discarded(),
            vec![lost("spec.template.spec.rootVolume.sourceType", "volume")]
        );

        let mut c = v1alpha5::cluster::OpenStackCluster::default();
        c.spec.bastion = Some(v1alpha5::cluster::Bastion {
            instance: spec,
            ..Default::default()
        });
        assert_eq!(
            c.discarded(),
            vec![lost("spec.bastion.instance.rootVolume.sourceType", "volume")]
        );
    }
}
