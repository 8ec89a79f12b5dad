// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Machine template types for the v1alpha7 schema.

use capstan_types::{ObjectList, ObjectMeta};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::machine::OpenStackMachineSpec;
use crate::v1alpha5;
use crate::v1alpha6;

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

// Conversions from v1alpha5 templates.
impl From<v1alpha5::template::OpenStackMachineTemplate>
    for OpenStackMachineTemplate
{
    fn from(old: v1alpha5::template::OpenStackMachineTemplate) -> Self {
        Self {
            metadata: old.metadata,
            spec: OpenStackMachineTemplateSpec {
                template: OpenStackMachineTemplateResource {
                    spec: old.spec.template.spec.into(),
                },
            },
        }
    }
}

// Conversions to v1alpha5 templates.
impl From<OpenStackMachineTemplate>
    for v1alpha5::template::OpenStackMachineTemplate
{
    fn from(new: OpenStackMachineTemplate) -> Self {
        Self {
            metadata: new.metadata,
            spec: v1alpha5::template::OpenStackMachineTemplateSpec {
                template: v1alpha5::template::OpenStackMachineTemplateResource {
                    spec: new.spec.template.spec.into(),
                },
            },
        }
    }
}

// Conversions from v1alpha6 templates.
impl From<v1alpha6::template::OpenStackMachineTemplate>
    for OpenStackMachineTemplate
{
    fn from(old: v1alpha6::template::OpenStackMachineTemplate) -> Self {
        Self {
            metadata: old.metadata,
            spec: OpenStackMachineTemplateSpec {
                template: OpenStackMachineTemplateResource {
                    spec: old.spec.template.spec.into(),
                },
            },
        }
    }
}

// Conversions to v1alpha6 templates.
impl From<OpenStackMachineTemplate>
    for v1alpha6::template::OpenStackMachineTemplate
{
    fn from(new: OpenStackMachineTemplate) -> Self {
        Self {
            metadata: new.metadata,
            spec: v1alpha6::template::OpenStackMachineTemplateSpec {
                template: v1alpha6::template::OpenStackMachineTemplateResource {
                    spec: new.spec.template.spec.into(),
                },
            },
        }
    }
}
