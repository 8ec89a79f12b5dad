// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The conversion registry.
//!
//! Maps every `(version, kind)` pair to an upgrade and a downgrade over
//! serialized objects. The registry is built once and never mutated, so a
//! shared reference may be used from any number of threads.

use std::collections::{BTreeMap, BTreeSet};

use capstan_api_types_versions::{v1alpha5, v1alpha6};
use capstan_config_toml::ConversionConfig;
use capstan_types::{Kind, ObjectList, SchemaVersion, TypeMeta};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use slog::{debug, Logger};
use strum::IntoEnumIterator;

use crate::orchestrator::{downgrade, downgrade_list, upgrade, upgrade_list};
use crate::{ConversionError, Convertible};

/// A conversion over serialized objects whose type metadata (`apiVersion`
/// and `kind`) has already been removed.
pub type ConvertFn = fn(&Logger, Value) -> Result<Value, ConversionError>;

/// The conversions registered for one spoke `(version, kind)`.
#[derive(Clone, Copy)]
pub struct ConversionPair {
    pub version: SchemaVersion,
    pub kind: Kind,

    /// From this spoke version to the hub.
    pub upgrade: ConvertFn,

    /// From the hub to this spoke version.
    pub downgrade: ConvertFn,
}

impl std::fmt::Debug for ConversionPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionPair")
            .field("version", &self.version)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

pub struct ConversionRegistry {
    pairs: BTreeMap<(SchemaVersion, Kind), ConversionPair>,
    served: BTreeSet<SchemaVersion>,
}

impl ConversionRegistry {
    /// A registry serving every known schema version.
    pub fn builtin() -> Self {
        Self::with_served(SchemaVersion::iter())
    }

    /// A registry serving the versions named in `config`.
    pub fn from_config(config: &ConversionConfig) -> Self {
        Self::with_served(config.served_versions.iter().copied())
    }

    /// A registry serving only `served`. The hub is always served.
    pub fn with_served(
        served: impl IntoIterator<Item = SchemaVersion>,
    ) -> Self {
        let mut pairs = BTreeMap::new();

        register::<v1alpha5::cluster::OpenStackCluster>(&mut pairs);
        register::<v1alpha5::machine::OpenStackMachine>(&mut pairs);
        register::<v1alpha5::template::OpenStackMachineTemplate>(&mut pairs);
        register::<v1alpha6::cluster::OpenStackCluster>(&mut pairs);
        register::<v1alpha6::machine::OpenStackMachine>(&mut pairs);
        register::<v1alpha6::template::OpenStackMachineTemplate>(&mut pairs);

        let mut served: BTreeSet<_> = served.into_iter().collect();
        served.insert(SchemaVersion::HUB);

        Self { pairs, served }
    }

    /// All registered pairs, ordered by version then kind.
    pub fn pairs(&self) -> impl Iterator<Item = &ConversionPair> {
        self.pairs.values()
    }

    pub fn served(&self) -> impl Iterator<Item = SchemaVersion> + '_ {
        self.served.iter().copied()
    }

    pub fn is_served(&self, version: SchemaVersion) -> bool {
        self.served.contains(&version)
    }

    pub fn pair(
        &self,
        version: SchemaVersion,
        kind: Kind,
    ) -> Result<&ConversionPair, ConversionError> {
        self.pairs
            .get(&(version, kind))
            .ok_or(ConversionError::Unregistered { version, kind })
    }

    /// Converts a serialized object, including its `apiVersion` and `kind`,
    /// to version `to`.
    ///
    /// Objects already at `to` are returned unchanged. Everything else goes
    /// through the hub: an upgrade unless the source is the hub, then a
    /// downgrade unless the target is.
    pub fn convert(
        &self,
        log: &Logger,
        object: Value,
        to: SchemaVersion,
    ) -> Result<Value, ConversionError> {
        let (from, kind) = TypeMeta::deserialize(&object)
            .map_err(ConversionError::MissingTypeMeta)?
            .resolve()?;
        let Value::Object(mut map) = object else {
            return Err(ConversionError::NotAnObject);
        };

        self.check_served(from)?;
        self.check_served(to)?;

        if from == to {
            return Ok(Value::Object(map));
        }

        debug!(log, "converting object";
            "kind" => %kind,
            "from" => %from,
            "to" => %to,
        );

        strip_type_meta(&mut map);
        let mut body = Value::Object(map);
        if kind.is_list() {
            strip_item_type_meta(&mut body);
        }

        let hub = if from.is_hub() {
            body
        } else {
            (self.pair(from, kind)?.upgrade)(log, body)?
        };

        let converted = if to.is_hub() {
            hub
        } else {
            (self.pair(to, kind)?.downgrade)(log, hub)?
        };

        Ok(stamp_type_meta(converted, to, kind))
    }

    fn check_served(
        &self,
        version: SchemaVersion,
    ) -> Result<(), ConversionError> {
        if self.is_served(version) {
            Ok(())
        } else {
            Err(ConversionError::VersionNotServed(version))
        }
    }
}

fn strip_type_meta(map: &mut Map<String, Value>) {
    map.remove("apiVersion");
    map.remove("kind");
}

fn strip_item_type_meta(list: &mut Value) {
    if let Some(items) = list.get_mut("items").and_then(Value::as_array_mut) {
        for item in items.iter_mut().filter_map(Value::as_object_mut) {
            strip_type_meta(item);
        }
    }
}

fn stamp_type_meta(
    mut value: Value,
    version: SchemaVersion,
    kind: Kind,
) -> Value {
    if let Value::Object(map) = &mut value {
        let meta = TypeMeta::new(version, kind);
        map.insert("apiVersion".to_owned(), meta.api_version.into());
        map.insert("kind".to_owned(), meta.kind.into());
    }

    if let Some(item_kind) = kind.item() {
        if let Some(items) =
            value.get_mut("items").and_then(Value::as_array_mut)
        {
            for item in items.iter_mut() {
                let stamped =
                    stamp_type_meta(std::mem::take(item), version, item_kind);
                *item = stamped;
            }
        }
    }

    value
}

fn register<S: Convertible>(
    pairs: &mut BTreeMap<(SchemaVersion, Kind), ConversionPair>,
) {
    pairs.insert(
        (S::VERSION, S::KIND),
        ConversionPair {
            version: S::VERSION,
            kind: S::KIND,
            upgrade: upgrade_value::<S>,
            downgrade: downgrade_value::<S>,
        },
    );

    if let Some(list) = S::KIND.list() {
        pairs.insert(
            (S::VERSION, list),
            ConversionPair {
                version: S::VERSION,
                kind: list,
                upgrade: upgrade_list_value::<S>,
                downgrade: downgrade_list_value::<S>,
            },
        );
    }
}

fn decode<T: DeserializeOwned>(
    version: SchemaVersion,
    kind: Kind,
    body: Value,
) -> Result<T, ConversionError> {
    serde_json::from_value(body)
        .map_err(|source| ConversionError::Decode { version, kind, source })
}

fn encode<T: Serialize>(
    version: SchemaVersion,
    kind: Kind,
    object: &T,
) -> Result<Value, ConversionError> {
    serde_json::to_value(object)
        .map_err(|source| ConversionError::Encode { version, kind, source })
}

fn upgrade_value<S: Convertible>(
    log: &Logger,
    body: Value,
) -> Result<Value, ConversionError> {
    let spoke: S = decode(S::VERSION, S::KIND, body)?;
    let hub = upgrade(log, spoke)?;
    encode(SchemaVersion::HUB, S::KIND, &hub)
}

fn downgrade_value<S: Convertible>(
    log: &Logger,
    body: Value,
) -> Result<Value, ConversionError> {
    let hub: S::Hub = decode(SchemaVersion::HUB, S::KIND, body)?;
    let spoke: S = downgrade(log, hub)?;
    encode(S::VERSION, S::KIND, &spoke)
}

fn upgrade_list_value<S: Convertible>(
    log: &Logger,
    body: Value,
) -> Result<Value, ConversionError> {
    let kind = S::KIND.list().unwrap_or(S::KIND);
    let list: ObjectList<S> = decode(S::VERSION, kind, body)?;
    let hub = upgrade_list(log, list)?;
    encode(SchemaVersion::HUB, kind, &hub)
}

fn downgrade_list_value<S: Convertible>(
    log: &Logger,
    body: Value,
) -> Result<Value, ConversionError> {
    let kind = S::KIND.list().unwrap_or(S::KIND);
    let list: ObjectList<S::Hub> = decode(SchemaVersion::HUB, kind, body)?;
    let spoke: ObjectList<S> = downgrade_list(log, list)?;
    encode(S::VERSION, kind, &spoke)
}
