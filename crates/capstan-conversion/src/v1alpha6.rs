// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion of v1alpha6 objects.
//!
//! v1alpha6 already references networks by filter, so what it lacks relative
//! to the hub is a handful of additions: port value specs, additional block
//! devices, the load balancer provider, and the control-plane availability
//! zone opt-out.

use capstan_api_types_versions::latest::{cluster, machine, template};
use capstan_api_types_versions::v1alpha6;
use capstan_types::{Kind, SchemaVersion};
use serde::{Deserialize, Serialize};

use crate::residue::{capture_each, restore_each};
use crate::Convertible;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PortResidue {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub value_specs: Vec<machine::ValueSpec>,
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
            ports: capture_each(&spec.ports, |port| PortResidue {
                value_specs: port.value_specs.clone(),
            }),
            additional_block_devices: spec.additional_block_devices.clone(),
        }
    }

    pub fn restore(self, spec: &mut machine::OpenStackMachineSpec) {
        restore_each(&mut spec.ports, self.ports, |port, residue| {
            port.value_specs = residue.value_specs;
        });
        spec.additional_block_devices = self.additional_block_devices;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterResidue {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_server_load_balancer_provider: String,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub control_plane_omit_availability_zone: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bastion: Option<MachineSpecResidue>,
}

impl ClusterResidue {
    pub fn capture(spec: &cluster::OpenStackClusterSpec) -> Self {
        Self {
            api_server_load_balancer_provider: spec
                .api_server_load_balancer
                .provider
                .clone(),
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
        spec.api_server_load_balancer.provider =
            self.api_server_load_balancer_provider;
        spec.control_plane_omit_availability_zone =
            self.control_plane_omit_availability_zone;
        if let (Some(residue), Some(bastion)) =
            (self.bastion, spec.bastion.as_mut())
        {
            residue.restore(&mut bastion.instance);
        }
    }
}

impl Convertible for v1alpha6::cluster::OpenStackCluster {
    type Hub = cluster::OpenStackCluster;
    type Residue = ClusterResidue;

    const VERSION: SchemaVersion = SchemaVersion::V1alpha6;
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
}

impl Convertible for v1alpha6::machine::OpenStackMachine {
    type Hub = machine::OpenStackMachine;
    type Residue = MachineSpecResidue;

    const VERSION: SchemaVersion = SchemaVersion::V1alpha6;
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
}

impl Convertible for v1alpha6::template::OpenStackMachineTemplate {
    type Hub = template::OpenStackMachineTemplate;
    type Residue = MachineSpecResidue;

    const VERSION: SchemaVersion = SchemaVersion::V1alpha6;
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
}
