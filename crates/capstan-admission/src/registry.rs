// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Admission hooks over serialized objects.
//!
//! Every hook is fail-closed: an object that cannot be decoded as the
//! registered type is rejected, never waved through.

use std::collections::{BTreeMap, BTreeSet};

use capstan_api_types_versions::{v1alpha5, v1alpha6, v1alpha7};
use capstan_config_toml::ConversionConfig;
use capstan_types::{Kind, SchemaVersion, TypeMeta, TypeMetaError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use slog::{debug, info, Logger};
use strum::IntoEnumIterator;
use thiserror::Error;

use crate::{Operation, ValidationErrors, Validator};

#[derive(Debug, Error)]
pub enum AdmissionError {
    #[error("object has no usable apiVersion and kind")]
    MissingTypeMeta(#[source] serde_json::Error),

    #[error("unrecognized object type")]
    TypeMeta(#[from] TypeMetaError),

    #[error("schema version {0} is not served")]
    VersionNotServed(SchemaVersion),

    #[error("no admission hooks registered for {kind} at {version}")]
    Unregistered { version: SchemaVersion, kind: Kind },

    #[error("failed to decode {kind} at {version}")]
    Decode {
        version: SchemaVersion,
        kind: Kind,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {kind} at {version}")]
    Encode {
        version: SchemaVersion,
        kind: Kind,
        #[source]
        source: serde_json::Error,
    },

    #[error("update of {kind} at {version} requires the previous object")]
    MissingOldObject { version: SchemaVersion, kind: Kind },

    #[error("object rejected: {0}")]
    Rejected(#[from] ValidationErrors),
}

/// Fills defaults into a serialized object in place.
pub type MutateFn = fn(&mut Value) -> Result<(), AdmissionError>;

/// Validates a serialized object, with the previous object on update.
pub type ValidateFn =
    fn(Operation, &Value, Option<&Value>) -> Result<(), AdmissionError>;

/// The admission hooks of one `(version, kind)`.
#[derive(Clone, Copy)]
pub struct HookSet {
    pub version: SchemaVersion,
    pub kind: Kind,
    pub mutate: MutateFn,
    pub validate: ValidateFn,
}

impl std::fmt::Debug for HookSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookSet")
            .field("version", &self.version)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

pub struct AdmissionRegistry {
    hooks: BTreeMap<(SchemaVersion, Kind), HookSet>,
    served: BTreeSet<SchemaVersion>,
}

impl AdmissionRegistry {
    /// A registry admitting objects at every known schema version.
    pub fn builtin() -> Self {
        Self::with_served(SchemaVersion::iter())
    }

    /// A registry admitting objects at the versions named in `config`, the
    /// same set a conversion registry built from it serves.
    pub fn from_config(config: &ConversionConfig) -> Self {
        Self::with_served(config.served_versions.iter().copied())
    }

    /// A registry admitting objects only at `served`. The hub is always
    /// served.
    pub fn with_served(
        served: impl IntoIterator<Item = SchemaVersion>,
    ) -> Self {
        let mut hooks = BTreeMap::new();

        register::<v1alpha5::cluster::OpenStackCluster>(&mut hooks);
        register::<v1alpha5::machine::OpenStackMachine>(&mut hooks);
        register::<v1alpha5::template::OpenStackMachineTemplate>(&mut hooks);
        register::<v1alpha6::cluster::OpenStackCluster>(&mut hooks);
        register::<v1alpha6::machine::OpenStackMachine>(&mut hooks);
        register::<v1alpha6::template::OpenStackMachineTemplate>(&mut hooks);
        register::<v1alpha7::cluster::OpenStackCluster>(&mut hooks);
        register::<v1alpha7::machine::OpenStackMachine>(&mut hooks);
        register::<v1alpha7::template::OpenStackMachineTemplate>(&mut hooks);

        let mut served: BTreeSet<_> = served.into_iter().collect();
        served.insert(SchemaVersion::HUB);

        Self { hooks, served }
    }

    pub fn hooks(&self) -> impl Iterator<Item = &HookSet> {
        self.hooks.values()
    }

    pub fn is_served(&self, version: SchemaVersion) -> bool {
        self.served.contains(&version)
    }

    pub fn hook(
        &self,
        version: SchemaVersion,
        kind: Kind,
    ) -> Result<&HookSet, AdmissionError> {
        if !self.is_served(version) {
            return Err(AdmissionError::VersionNotServed(version));
        }
        self.hooks
            .get(&(version, kind))
            .ok_or(AdmissionError::Unregistered { version, kind })
    }

    fn hook_for(&self, object: &Value) -> Result<&HookSet, AdmissionError> {
        let (version, kind) = TypeMeta::deserialize(object)
            .map_err(AdmissionError::MissingTypeMeta)?
            .resolve()?;
        self.hook(version, kind)
    }

    /// Applies defaults to `object`, which must carry its `apiVersion` and
    /// `kind`.
    pub fn mutate(
        &self,
        log: &Logger,
        object: &mut Value,
    ) -> Result<(), AdmissionError> {
        let hook = self.hook_for(object)?;
        (hook.mutate)(object)?;
        debug!(log, "applied defaults";
            "version" => %hook.version,
            "kind" => %hook.kind,
        );
        Ok(())
    }

    /// Validates `object`, which must carry its `apiVersion` and `kind`.
    /// `old` is required for updates and ignored otherwise.
    pub fn validate(
        &self,
        log: &Logger,
        op: Operation,
        object: &Value,
        old: Option<&Value>,
    ) -> Result<(), AdmissionError> {
        let hook = self.hook_for(object)?;
        let result = (hook.validate)(op, object, old);
        if let Err(AdmissionError::Rejected(errors)) = &result {
            info!(log, "admission rejected";
                "operation" => %op,
                "version" => %hook.version,
                "kind" => %hook.kind,
                "violations" => errors.errors().len(),
            );
        }
        result
    }

    /// Defaults (except on delete) and then validates `object`, returning
    /// the object as admitted.
    pub fn review(
        &self,
        log: &Logger,
        op: Operation,
        mut object: Value,
        old: Option<&Value>,
    ) -> Result<Value, AdmissionError> {
        if op != Operation::Delete {
            self.mutate(log, &mut object)?;
        }
        self.validate(log, op, &object, old)?;
        Ok(object)
    }
}

fn register<V>(hooks: &mut BTreeMap<(SchemaVersion, Kind), HookSet>)
where
    V: Validator + Serialize + DeserializeOwned,
{
    hooks.insert(
        (V::VERSION, V::KIND),
        HookSet {
            version: V::VERSION,
            kind: V::KIND,
            mutate: mutate_value::<V>,
            validate: validate_value::<V>,
        },
    );
}

fn decode<V>(object: &Value) -> Result<V, AdmissionError>
where
    V: Validator + DeserializeOwned,
{
    // The type meta was already used to pick the hook; the typed shapes
    // reject any key they do not model.
    let mut body = object.clone();
    if let Value::Object(map) = &mut body {
        map.remove("apiVersion");
        map.remove("kind");
    }
    serde_json::from_value(body).map_err(|source| AdmissionError::Decode {
        version: V::VERSION,
        kind: V::KIND,
        source,
    })
}

fn mutate_value<V>(object: &mut Value) -> Result<(), AdmissionError>
where
    V: Validator + Serialize + DeserializeOwned,
{
    let mut typed: V = decode(object)?;
    typed.apply_defaults();

    let mut defaulted = serde_json::to_value(&typed).map_err(|source| {
        AdmissionError::Encode { version: V::VERSION, kind: V::KIND, source }
    })?;

    if let Value::Object(map) = &mut defaulted {
        let meta = TypeMeta::new(V::VERSION, V::KIND);
        map.insert("apiVersion".to_owned(), meta.api_version.into());
        map.insert("kind".to_owned(), meta.kind.into());
    }

    *object = defaulted;
    Ok(())
}

fn validate_value<V>(
    op: Operation,
    object: &Value,
    old: Option<&Value>,
) -> Result<(), AdmissionError>
where
    V: Validator + DeserializeOwned,
{
    let typed: V = decode(object)?;
    match op {
        Operation::Create => typed.validate_create()?,
        Operation::Update => {
            let old = old.ok_or(AdmissionError::MissingOldObject {
                version: V::VERSION,
                kind: V::KIND,
            })?;
            let old: V = decode(old)?;
            typed.validate_update(&old)?
        }
        Operation::Delete => typed.validate_delete()?,
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn logger() -> Logger {
        Logger::root(slog::Discard, slog::o!())
    }

    #[test]
    fn every_item_kind_has_hooks() {
        let registry = AdmissionRegistry::builtin();
        for version in SchemaVersion::iter() {
            for kind in Kind::iter().filter(|k| !k.is_list()) {
                assert!(registry.hook(version, kind).is_ok());
            }
        }
        assert_eq!(registry.hooks().count(), 9);
    }

    #[test]
    fn unserved_version_is_not_admitted() {
        let config = ConversionConfig {
            served_versions: vec![SchemaVersion::V1alpha6],
            ..Default::default()
        };
        let registry = AdmissionRegistry::from_config(&config);
        assert!(registry.is_served(SchemaVersion::V1alpha7));
        assert!(!registry.is_served(SchemaVersion::V1alpha5));

        let mut object = json!({
            "apiVersion": "infrastructure.capstan.io/v1alpha5",
            "kind": "OpenStackMachine",
            "metadata": { "name": "m0" },
        });
        assert!(matches!(
            registry.mutate(&logger(), &mut object),
            Err(AdmissionError::VersionNotServed(SchemaVersion::V1alpha5))
        ));
        assert!(matches!(
            registry.review(&logger(), Operation::Create, object, None),
            Err(AdmissionError::VersionNotServed(SchemaVersion::V1alpha5))
        ));

        let hub = json!({
            "apiVersion": "infrastructure.capstan.io/v1alpha7",
            "kind": "OpenStackMachine",
            "metadata": { "name": "m0" },
        });
        assert!(registry
            .review(&logger(), Operation::Create, hub, None)
            .is_ok());
    }

    #[test]
    fn lists_are_not_admitted() {
        let registry = AdmissionRegistry::builtin();
        let list = json!({
            "apiVersion": "infrastructure.capstan.io/v1alpha7",
            "kind": "OpenStackMachineList",
            "items": [],
        });
        assert!(matches!(
            registry.validate(&logger(), Operation::Create, &list, None),
            Err(AdmissionError::Unregistered { .. })
        ));
    }

    #[test]
    fn mutate_defaults_and_keeps_type_meta() {
        let registry = AdmissionRegistry::builtin();
        let mut object = json!({
            "apiVersion": "infrastructure.capstan.io/v1alpha5",
            "kind": "OpenStackMachine",
            "metadata": { "name": "m0" },
            "spec": { "identityRef": { "kind": "", "name": "creds" } },
        });
        registry.mutate(&logger(), &mut object).unwrap();
        assert_eq!(object["spec"]["identityRef"]["kind"], "Secret");
        assert_eq!(object["kind"], "OpenStackMachine");
        assert_eq!(
            object["apiVersion"],
            "infrastructure.capstan.io/v1alpha5"
        );
    }

    #[test]
    fn mutate_keeps_unmodelled_metadata() {
        let registry = AdmissionRegistry::builtin();
        let metadata = json!({
            "name": "m0",
            "resourceVersion": "42",
            "generation": 3,
            "finalizers": ["capstan.io/cleanup"],
        });
        let mut object = json!({
            "apiVersion": "infrastructure.capstan.io/v1alpha7",
            "kind": "OpenStackMachine",
            "metadata": metadata.clone(),
        });
        registry.mutate(&logger(), &mut object).unwrap();
        assert_eq!(object["metadata"], metadata);
    }

    #[test]
    fn unknown_top_level_key_is_rejected() {
        let registry = AdmissionRegistry::builtin();
        let mut object = json!({
            "apiVersion": "infrastructure.capstan.io/v1alpha5",
            "kind": "OpenStackCluster",
            "metadata": { "name": "c0" },
            "specification": {},
        });
        assert!(matches!(
            registry.mutate(&logger(), &mut object),
            Err(AdmissionError::Decode { .. })
        ));
    }

    #[test]
    fn undecodable_object_is_rejected() {
        let registry = AdmissionRegistry::builtin();
        let object = json!({
            "apiVersion": "infrastructure.capstan.io/v1alpha6",
            "kind": "OpenStackMachine",
            "spec": { "noSuchField": true },
        });
        assert!(matches!(
            registry.validate(&logger(), Operation::Create, &object, None),
            Err(AdmissionError::Decode { .. })
        ));
    }

    #[test]
    fn update_requires_old_object() {
        let registry = AdmissionRegistry::builtin();
        let object = json!({
            "apiVersion": "infrastructure.capstan.io/v1alpha7",
            "kind": "OpenStackMachineTemplate",
        });
        assert!(matches!(
            registry.validate(&logger(), Operation::Update, &object, None),
            Err(AdmissionError::MissingOldObject { .. })
        ));
    }

    #[test]
    fn review_rejects_template_change() {
        let registry = AdmissionRegistry::builtin();
        let template = |flavor: &str| {
            json!({
                "apiVersion": "infrastructure.capstan.io/v1alpha6",
                "kind": "OpenStackMachineTemplate",
                "metadata": { "name": "t0" },
                "spec": { "template": { "spec": { "flavor": flavor } } },
            })
        };

        let old = registry
            .review(&logger(), Operation::Create, template("small"), None)
            .unwrap();
        registry
            .review(&logger(), Operation::Update, template("small"), Some(&old))
            .unwrap();

        match registry.review(
            &logger(),
            Operation::Update,
            template("large"),
            Some(&old),
        ) {
            Err(AdmissionError::Rejected(errors)) => {
                assert_eq!(errors.errors().len(), 1);
                assert_eq!(
                    errors.errors()[0].path.as_str(),
                    "spec.template.spec"
                );
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }
}
