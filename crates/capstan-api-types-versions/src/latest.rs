// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Re-exports of the hub shape of every type.
//!
//! Business logic should use these re-exports rather than versioned
//! identifiers directly.

pub mod cluster {
    pub use crate::v1alpha5::cluster::ApiEndpoint;
    pub use crate::v1alpha5::cluster::OpenStackClusterStatus;

    pub use crate::v1alpha7::cluster::ApiServerLoadBalancer;
    pub use crate::v1alpha7::cluster::Bastion;
    pub use crate::v1alpha7::cluster::OpenStackCluster;
    pub use crate::v1alpha7::cluster::OpenStackClusterList;
    pub use crate::v1alpha7::cluster::OpenStackClusterSpec;
}

pub mod filters {
    pub use crate::v1alpha5::filters::AddressPair;

    pub use crate::v1alpha7::filters::FixedIp;
    pub use crate::v1alpha7::filters::NetworkFilter;
    pub use crate::v1alpha7::filters::SecurityGroupFilter;
    pub use crate::v1alpha7::filters::SubnetFilter;
}

pub mod machine {
    pub use crate::v1alpha5::machine::IdentityRef;
    pub use crate::v1alpha5::machine::InstanceState;
    pub use crate::v1alpha5::machine::NodeAddress;
    pub use crate::v1alpha5::machine::OpenStackMachineStatus;

    pub use crate::v1alpha6::machine::RootVolume;

    pub use crate::v1alpha7::machine::AdditionalBlockDevice;
    pub use crate::v1alpha7::machine::OpenStackMachine;
    pub use crate::v1alpha7::machine::OpenStackMachineList;
    pub use crate::v1alpha7::machine::OpenStackMachineSpec;
    pub use crate::v1alpha7::machine::PortOpts;
    pub use crate::v1alpha7::machine::ValueSpec;
    pub use crate::v1alpha7::machine::ROOT_VOLUME_DEVICE_TYPE;
    pub use crate::v1alpha7::machine::ROOT_VOLUME_SOURCE_TYPE;
}

pub mod template {
    pub use crate::v1alpha7::template::OpenStackMachineTemplate;
    pub use crate::v1alpha7::template::OpenStackMachineTemplateList;
    pub use crate::v1alpha7::template::OpenStackMachineTemplateResource;
    pub use crate::v1alpha7::template::OpenStackMachineTemplateSpec;
}
