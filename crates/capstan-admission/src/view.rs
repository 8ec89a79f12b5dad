// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Uniform read access to the fields rules look at, across versions.

use capstan_api_types_versions::latest::machine::IdentityRef;
use capstan_api_types_versions::{v1alpha5, v1alpha6, v1alpha7};
use serde::Serialize;

use crate::FieldPath;

pub(crate) trait MachineSpecView: Serialize {
    fn identity_ref(&self) -> Option<&IdentityRef>;
    fn identity_ref_mut(&mut self) -> Option<&mut IdentityRef>;
    fn provider_id(&self) -> Option<&str>;
    fn instance_id(&self) -> Option<&str>;
    fn root_volume_size(&self) -> Option<i32>;

    /// The fixed IP addresses of each port, in port order.
    fn fixed_ip_addresses(&self) -> Vec<Vec<&str>>;
}

macro_rules! impl_machine_spec_view {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl MachineSpecView for $ty {
                fn identity_ref(&self) -> Option<&IdentityRef> {
                    self.identity_ref.as_ref()
                }

                fn identity_ref_mut(&mut self) -> Option<&mut IdentityRef> {
                    self.identity_ref.as_mut()
                }

                fn provider_id(&self) -> Option<&str> {
                    self.provider_id.as_deref()
                }

                fn instance_id(&self) -> Option<&str> {
                    self.instance_id.as_deref()
                }

                fn root_volume_size(&self) -> Option<i32> {
                    self.root_volume.as_ref().map(|rv| rv.size)
                }

                fn fixed_ip_addresses(&self) -> Vec<Vec<&str>> {
                    self.ports
                        .iter()
                        .map(|port| {
                            port.fixed_ips
                                .iter()
                                .map(|ip| ip.ip_address.as_str())
                                .collect()
                        })
                        .collect()
                }
            }
        )+
    };
}

impl_machine_spec_view!(
    v1alpha5::machine::OpenStackMachineSpec,
    v1alpha6::machine::OpenStackMachineSpec,
    v1alpha7::machine::OpenStackMachineSpec,
);

pub(crate) trait ClusterSpecView: Serialize {
    type Machine: MachineSpecView;

    fn identity_ref(&self) -> Option<&IdentityRef>;
    fn identity_ref_mut(&mut self) -> Option<&mut IdentityRef>;
    fn bastion_instance(&self) -> Option<&Self::Machine>;
    fn bastion_instance_mut(&mut self) -> Option<&mut Self::Machine>;
    fn api_server_port(&self) -> i32;
    fn control_plane_endpoint_is_unset(&self) -> bool;

    /// The extra load balancer ports, with the path of the list.
    fn load_balancer_ports(&self) -> (FieldPath, &[i32]);

    /// The load balancer's allowed CIDRs, with the path of the list, if the
    /// version has them.
    fn allowed_cidrs(&self) -> Option<(FieldPath, &[String])>;
}

fn nested_load_balancer_path() -> FieldPath {
    FieldPath::new("spec").child("apiServerLoadBalancer")
}

macro_rules! impl_cluster_spec_common {
    ($machine:ty) => {
        type Machine = $machine;

        fn identity_ref(&self) -> Option<&IdentityRef> {
            self.identity_ref.as_ref()
        }

        fn identity_ref_mut(&mut self) -> Option<&mut IdentityRef> {
            self.identity_ref.as_mut()
        }

        fn bastion_instance(&self) -> Option<&Self::Machine> {
            self.bastion.as_ref().map(|b| &b.instance)
        }

        fn bastion_instance_mut(&mut self) -> Option<&mut Self::Machine> {
            self.bastion.as_mut().map(|b| &mut b.instance)
        }

        fn api_server_port(&self) -> i32 {
            self.api_server_port
        }

        fn control_plane_endpoint_is_unset(&self) -> bool {
            self.control_plane_endpoint.is_unset()
        }
    };
}

impl ClusterSpecView for v1alpha5::cluster::OpenStackClusterSpec {
    impl_cluster_spec_common!(v1alpha5::machine::OpenStackMachineSpec);

    fn load_balancer_ports(&self) -> (FieldPath, &[i32]) {
        (
            FieldPath::new("spec")
                .child("apiServerLoadBalancerAdditionalPorts"),
            self.api_server_load_balancer_additional_ports.as_slice(),
        )
    }

    fn allowed_cidrs(&self) -> Option<(FieldPath, &[String])> {
        None
    }
}

impl ClusterSpecView for v1alpha6::cluster::OpenStackClusterSpec {
    impl_cluster_spec_common!(v1alpha6::machine::OpenStackMachineSpec);

    fn load_balancer_ports(&self) -> (FieldPath, &[i32]) {
        (
            nested_load_balancer_path().child("additionalPorts"),
            self.api_server_load_balancer.additional_ports.as_slice(),
        )
    }

    fn allowed_cidrs(&self) -> Option<(FieldPath, &[String])> {
        Some((
            nested_load_balancer_path().child("allowedCidrs"),
            self.api_server_load_balancer.allowed_cidrs.as_slice(),
        ))
    }
}

impl ClusterSpecView for v1alpha7::cluster::OpenStackClusterSpec {
    impl_cluster_spec_common!(v1alpha7::machine::OpenStackMachineSpec);

    fn load_balancer_ports(&self) -> (FieldPath, &[i32]) {
        (
            nested_load_balancer_path().child("additionalPorts"),
            self.api_server_load_balancer.additional_ports.as_slice(),
        )
    }

    fn allowed_cidrs(&self) -> Option<(FieldPath, &[String])> {
        Some((
            nested_load_balancer_path().child("allowedCidrs"),
            self.api_server_load_balancer.allowed_cidrs.as_slice(),
        ))
    }
}
