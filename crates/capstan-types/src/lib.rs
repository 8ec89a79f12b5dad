// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fundamental types shared by other Capstan crates.
//!
//! This crate defines the identifiers (API group, schema versions, kinds) and
//! the object envelope (metadata, lists) that every versioned resource shape
//! uses, so that the versioned type crate, the conversion engine, and the
//! admission validator can all agree on them without layering oddities.

use std::collections::BTreeMap;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;
use uuid::Uuid;

/// The API group every resource in this workspace belongs to.
pub const GROUP: &str = "infrastructure.capstan.io";

/// A version of the resource schema.
///
/// Exactly one version is the hub: the canonical shape every other (spoke)
/// version converts to and from.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Deserialize,
    Serialize,
    JsonSchema,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SchemaVersion {
    V1alpha5,
    V1alpha6,
    V1alpha7,
}

impl SchemaVersion {
    /// The canonical version.
    pub const HUB: SchemaVersion = SchemaVersion::V1alpha7;

    #[inline]
    pub fn is_hub(self) -> bool {
        self == Self::HUB
    }

    /// Returns the fully-qualified `apiVersion` string for this version, e.g.
    /// `infrastructure.capstan.io/v1alpha6`.
    pub fn api_version(self) -> String {
        format!("{GROUP}/{self}")
    }

    /// Parses a fully-qualified `apiVersion` string.
    pub fn from_api_version(s: &str) -> Result<Self, ApiVersionError> {
        let (group, version) = s
            .split_once('/')
            .ok_or_else(|| ApiVersionError::Malformed(s.to_owned()))?;

        if group != GROUP {
            return Err(ApiVersionError::ForeignGroup(group.to_owned()));
        }

        SchemaVersion::from_str(version)
            .map_err(|_| ApiVersionError::UnknownVersion(version.to_owned()))
    }
}

/// Errors that arise while interpreting an `apiVersion` string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiVersionError {
    #[error("apiVersion {0:?} is not of the form <group>/<version>")]
    Malformed(String),

    #[error("API group {0:?} is not served here")]
    ForeignGroup(String),

    #[error("unknown schema version {0:?}")]
    UnknownVersion(String),
}

/// The resource kinds registered in the schema, including their collection
/// forms.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Deserialize,
    Serialize,
    JsonSchema,
    Display,
    EnumString,
    EnumIter,
)]
pub enum Kind {
    OpenStackCluster,
    OpenStackClusterList,
    OpenStackMachine,
    OpenStackMachineList,
    OpenStackMachineTemplate,
    OpenStackMachineTemplateList,
}

impl Kind {
    pub fn is_list(self) -> bool {
        matches!(
            self,
            Kind::OpenStackClusterList
                | Kind::OpenStackMachineList
                | Kind::OpenStackMachineTemplateList
        )
    }

    /// For a list kind, the kind of its items; for an item kind, `None`.
    pub fn item(self) -> Option<Kind> {
        match self {
            Kind::OpenStackClusterList => Some(Kind::OpenStackCluster),
            Kind::OpenStackMachineList => Some(Kind::OpenStackMachine),
            Kind::OpenStackMachineTemplateList => {
                Some(Kind::OpenStackMachineTemplate)
            }
            _ => None,
        }
    }

    /// For an item kind, the kind of its collection form; for a list kind,
    /// `None`.
    pub fn list(self) -> Option<Kind> {
        match self {
            Kind::OpenStackCluster => Some(Kind::OpenStackClusterList),
            Kind::OpenStackMachine => Some(Kind::OpenStackMachineList),
            Kind::OpenStackMachineTemplate => {
                Some(Kind::OpenStackMachineTemplateList)
            }
            _ => None,
        }
    }
}

/// The `apiVersion` and `kind` carried by every serialized object.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMeta {
    pub api_version: String,
    pub kind: String,
}

impl TypeMeta {
    pub fn new(version: SchemaVersion, kind: Kind) -> Self {
        Self { api_version: version.api_version(), kind: kind.to_string() }
    }

    /// Interprets the strings as a known schema version and kind.
    pub fn resolve(&self) -> Result<(SchemaVersion, Kind), TypeMetaError> {
        let version = SchemaVersion::from_api_version(&self.api_version)?;
        let kind = Kind::from_str(&self.kind)
            .map_err(|_| TypeMetaError::UnknownKind(self.kind.clone()))?;
        Ok((version, kind))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeMetaError {
    #[error(transparent)]
    ApiVersion(#[from] ApiVersionError),

    #[error("unknown kind {0:?}")]
    UnknownKind(String),
}

/// Metadata common to every stored object.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<Uuid>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Free-form key/value annotations. Conversion uses one well-known key in
    /// this map to carry data a spoke shape cannot hold.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,

    /// Metadata this crate does not model (`resourceVersion`, `generation`,
    /// `finalizers`, `ownerReferences`, ...), carried through unchanged.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Metadata for a collection of objects.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default, rename_all = "camelCase")]
pub struct ListMeta {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub resource_version: String,

    #[serde(rename = "continue", skip_serializing_if = "String::is_empty")]
    pub continue_token: String,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// The collection form of a resource kind. Item order is significant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ObjectList<T> {
    #[serde(default)]
    pub metadata: ListMeta,

    #[serde(default)]
    pub items: Vec<T>,
}

/// Implemented by every top-level (non-list) resource shape.
pub trait Object {
    fn metadata(&self) -> &ObjectMeta;
    fn metadata_mut(&mut self) -> &mut ObjectMeta;
}

/// Implements [`Object`] for a struct with a `metadata: ObjectMeta` field.
#[macro_export]
macro_rules! impl_object {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Object for $ty {
                fn metadata(&self) -> &$crate::ObjectMeta {
                    &self.metadata
                }

                fn metadata_mut(&mut self) -> &mut $crate::ObjectMeta {
                    &mut self.metadata
                }
            }
        )+
    };
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_test::{assert_tokens, Token};
    use strum::IntoEnumIterator;

    #[test]
    fn exactly_one_hub() {
        assert_eq!(SchemaVersion::iter().filter(|v| v.is_hub()).count(), 1);
    }

    #[test]
    fn schema_version_tokens() {
        assert_tokens(
            &SchemaVersion::V1alpha5,
            &[Token::UnitVariant {
                name: "SchemaVersion",
                variant: "v1alpha5",
            }],
        );
        assert_tokens(
            &SchemaVersion::V1alpha7,
            &[Token::UnitVariant {
                name: "SchemaVersion",
                variant: "v1alpha7",
            }],
        );
    }

    const API_VERSION_CASES: &[(&str, Result<SchemaVersion, ()>)] = &[
        ("infrastructure.capstan.io/v1alpha5", Ok(SchemaVersion::V1alpha5)),
        ("infrastructure.capstan.io/v1alpha6", Ok(SchemaVersion::V1alpha6)),
        ("infrastructure.capstan.io/v1alpha7", Ok(SchemaVersion::V1alpha7)),
        ("infrastructure.capstan.io/v1alpha8", Err(())),
        ("infrastructure.cluster.x-k8s.io/v1alpha6", Err(())),
        ("v1alpha6", Err(())),
        ("", Err(())),
    ];

    #[test]
    fn parse_api_version() {
        for (input, expected) in API_VERSION_CASES {
            match SchemaVersion::from_api_version(input) {
                Ok(v) => assert_eq!(v, expected.unwrap()),
                Err(_) => assert!(
                    expected.is_err(),
                    "expected error parsing apiVersion {input}"
                ),
            }
        }
    }

    #[test]
    fn api_version_roundtrip() {
        for v in SchemaVersion::iter() {
            assert_eq!(
                SchemaVersion::from_api_version(&v.api_version()),
                Ok(v)
            );
        }
    }

    #[test]
    fn list_kinds_pair_with_items() {
        for kind in Kind::iter() {
            match (kind.is_list(), kind.item(), kind.list()) {
                (true, Some(item), None) => assert_eq!(item.list(), Some(kind)),
                (false, None, Some(list)) => {
                    assert_eq!(list.item(), Some(kind))
                }
                other => panic!("inconsistent kind {kind}: {other:?}"),
            }
        }
    }

    #[test]
    fn type_meta_resolves() {
        let meta =
            TypeMeta::new(SchemaVersion::V1alpha6, Kind::OpenStackMachine);
        assert_eq!(meta.api_version, "infrastructure.capstan.io/v1alpha6");
        assert_eq!(
            meta.resolve(),
            Ok((SchemaVersion::V1alpha6, Kind::OpenStackMachine))
        );

        let unknown = TypeMeta { kind: "Pod".to_owned(), ..meta };
        assert_eq!(
            unknown.resolve(),
            Err(TypeMetaError::UnknownKind("Pod".to_owned()))
        );
    }

    #[test]
    fn unmodelled_metadata_is_kept() {
        let raw = serde_json::json!({
            "name": "m0",
            "resourceVersion": "42",
            "generation": 3,
            "finalizers": ["capstan.io/cleanup"],
            "ownerReferences": [{ "kind": "Cluster", "name": "c0" }],
        });
        let meta: ObjectMeta = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(meta.name, "m0");
        assert_eq!(meta.extra["generation"], 3);
        assert_eq!(serde_json::to_value(&meta).unwrap(), raw);
    }

    #[test]
    fn list_defaults_without_item_default() {
        #[derive(Debug, PartialEq, Deserialize)]
        struct NoDefault(u32);

        let list: ObjectList<NoDefault> =
            serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(list.items.is_empty());

        let list: ObjectList<NoDefault> =
            serde_json::from_value(serde_json::json!({ "items": [7] }))
                .unwrap();
        assert_eq!(list.items, vec![NoDefault(7)]);
    }

    #[test]
    fn empty_metadata_serializes_compactly() {
        let meta = ObjectMeta { name: "m0".to_owned(), ..Default::default() };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "m0" }));
    }
}
