// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Resource filters for the v1alpha7 schema.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::v1alpha5;

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct NetworkFilter {
    pub name: String,
    pub description: String,
    pub project_id: String,
    pub id: String,
    pub tags: String,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct SubnetFilter {
    pub name: String,
    pub description: String,
    pub project_id: String,
    pub ip_version: i32,
    pub cidr: String,
    pub id: String,
    pub tags: String,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct SecurityGroupFilter {
    pub name: String,
    pub description: String,
    pub project_id: String,
    pub id: String,
    pub tags: String,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct FixedIp {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet: Option<SubnetFilter>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub ip_address: String,
}

/// Picks the project a spoke object names. The newer `projectId` wins when it
/// is set; otherwise the legacy `tenantId` is used.
pub(crate) fn resolve_project_id(
    project_id: String,
    tenant_id: String,
) -> String {
    if project_id.is_empty() {
        tenant_id
    } else {
        project_id
    }
}

// Conversions between the spoke filters (shared by v1alpha5 and v1alpha6)
// and the hub filters. Downgrades populate both the legacy and the current
// project field so that older consumers find the value where they expect it.

impl From<v1alpha5::filters::NetworkFilter> for NetworkFilter {
    fn from(old: v1alpha5::filters::NetworkFilter) -> Self {
        Self {
            name: old.name,
            description: old.description,
            project_id: resolve_project_id(old.project_id, old.tenant_id),
            id: old.id,
            tags: old.tags,
        }
    }
}

impl From<NetworkFilter> for v1alpha5::filters::NetworkFilter {
    fn from(new: NetworkFilter) -> Self {
        Self {
            name: new.name,
            description: new.description,
            tenant_id: new.project_id.clone(),
            project_id: new.project_id,
            id: new.id,
            tags: new.tags,
        }
    }
}

impl From<v1alpha5::filters::SubnetFilter> for SubnetFilter {
    fn from(old: v1alpha5::filters::SubnetFilter) -> Self {
        Self {
            name: old.name,
            description: old.description,
            project_id: resolve_project_id(old.project_id, old.tenant_id),
            ip_version: old.ip_version,
            cidr: old.cidr,
            id: old.id,
            tags: old.tags,
        }
    }
}

impl From<SubnetFilter> for v1alpha5::filters::SubnetFilter {
    fn from(new: SubnetFilter) -> Self {
        Self {
            name: new.name,
            description: new.description,
            tenant_id: new.project_id.clone(),
            project_id: new.project_id,
            ip_version: new.ip_version,
            cidr: new.cidr,
            id: new.id,
            tags: new.tags,
        }
    }
}

impl From<v1alpha5::filters::SecurityGroupFilter> for SecurityGroupFilter {
    fn from(old: v1alpha5::filters::SecurityGroupFilter) -> Self {
        Self {
            name: old.name,
            description: old.description,
            project_id: resolve_project_id(old.project_id, old.tenant_id),
            id: old.id,
            tags: old.tags,
        }
    }
}

impl From<SecurityGroupFilter> for v1alpha5::filters::SecurityGroupFilter {
    fn from(new: SecurityGroupFilter) -> Self {
        Self {
            name: new.name,
            description: new.description,
            tenant_id: new.project_id.clone(),
            project_id: new.project_id,
            id: new.id,
            tags: new.tags,
        }
    }
}

impl From<v1alpha5::filters::FixedIp> for FixedIp {
    fn from(old: v1alpha5::filters::FixedIp) -> Self {
        Self { subnet: old.subnet.map(Into::into), ip_address: old.ip_address }
    }
}

impl From<FixedIp> for v1alpha5::filters::FixedIp {
    fn from(new: FixedIp) -> Self {
        Self { subnet: new.subnet.map(Into::into), ip_address: new.ip_address }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn project_id_wins_over_tenant_id() {
        let old = v1alpha5::filters::NetworkFilter {
            tenant_id: "legacy".to_owned(),
            project_id: "current".to_owned(),
            ..Default::default()
        };
        assert_eq!(NetworkFilter::from(old).project_id, "current");
    }

    #[test]
    fn tenant_id_fills_unset_project_id() {
        let old = v1alpha5::filters::SubnetFilter {
            tenant_id: "abc".to_owned(),
            ..Default::default()
        };
        let hub = SubnetFilter::from(old);
        assert_eq!(hub.project_id, "abc");

        let back = v1alpha5::filters::SubnetFilter::from(hub);
        assert_eq!(back.project_id, "abc");
        assert_eq!(back.tenant_id, "abc");
    }
}
