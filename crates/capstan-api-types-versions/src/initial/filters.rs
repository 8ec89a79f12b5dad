// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Resource filters for the v1alpha5 schema.
//!
//! Filters carry both the legacy `tenantId` and its replacement `projectId`.
//! These shapes are shared by v1alpha6.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Selects a network by attributes.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct NetworkFilter {
    pub name: String,
    pub description: String,
    pub tenant_id: String,
    pub project_id: String,
    pub id: String,
    pub tags: String,
}

/// Selects a subnet by attributes.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct SubnetFilter {
    pub name: String,
    pub description: String,
    pub tenant_id: String,
    pub project_id: String,
    pub ip_version: i32,
    pub cidr: String,
    pub id: String,
    pub tags: String,
}

/// Selects a security group by attributes.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct SecurityGroupFilter {
    pub name: String,
    pub description: String,
    pub tenant_id: String,
    pub project_id: String,
    pub id: String,
    pub tags: String,
}

/// A fixed address requested for a port.
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

/// An additional IP/MAC pair a port may send traffic from. Unchanged in every
/// later version.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct AddressPair {
    pub ip_address: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub mac_address: String,
}
