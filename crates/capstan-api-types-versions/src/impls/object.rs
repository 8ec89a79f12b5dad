// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use capstan_types::impl_object;

use crate::{v1alpha5, v1alpha6, v1alpha7};

impl_object!(
    v1alpha5::cluster::OpenStackCluster,
    v1alpha5::machine::OpenStackMachine,
    v1alpha5::template::OpenStackMachineTemplate,
    v1alpha6::cluster::OpenStackCluster,
    v1alpha6::machine::OpenStackMachine,
    v1alpha6::template::OpenStackMachineTemplate,
    v1alpha7::cluster::OpenStackCluster,
    v1alpha7::machine::OpenStackMachine,
    v1alpha7::template::OpenStackMachineTemplate,
);
