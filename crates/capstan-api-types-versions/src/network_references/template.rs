// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Machine template types for the v1alpha6 schema.

use capstan_types::{ObjectList, ObjectMeta};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::machine::OpenStackMachineSpec;

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, deny_unknown_fields)]
pub struct OpenStackMachineTemplateResource {
    pub spec: OpenStackMachineSpec,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, deny_unknown_fields)]
pub struct OpenStackMachineTemplateSpec {
    pub template: OpenStackMachineTemplateResource,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, deny_unknown_fields)]
pub struct OpenStackMachineTemplate {
    pub metadata: ObjectMeta,
    pub spec: OpenStackMachineTemplateSpec,
}

pub type OpenStackMachineTemplateList = ObjectList<OpenStackMachineTemplate>;
