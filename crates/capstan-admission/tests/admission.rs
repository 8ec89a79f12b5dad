// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use capstan_admission::{
    AdmissionError, AdmissionRegistry, FieldErrorKind, Operation,
};
use capstan_types::SchemaVersion;
use serde_json::{json, Value};
use slog::{o, Discard, Logger};
use strum::IntoEnumIterator;

fn logger() -> Logger {
    Logger::root(Discard, o!())
}

fn machine(version: SchemaVersion, identity_kind: &str) -> Value {
    json!({
        "apiVersion": version.api_version(),
        "kind": "OpenStackMachine",
        "metadata": { "name": "m0" },
        "spec": {
            "flavor": "m1.small",
            "identityRef": { "kind": identity_kind, "name": "creds" },
        },
    })
}

fn template(version: SchemaVersion, image: &str) -> Value {
    json!({
        "apiVersion": version.api_version(),
        "kind": "OpenStackMachineTemplate",
        "metadata": { "name": "t0" },
        "spec": { "template": { "spec": { "image": image } } },
    })
}

fn rejection(
    result: Result<Value, AdmissionError>,
) -> Vec<(String, FieldErrorKind)> {
    match result {
        Err(AdmissionError::Rejected(errors)) => errors
            .into_errors()
            .into_iter()
            .map(|e| (e.path.to_string(), e.kind))
            .collect(),
        other => panic!("expected a rejection, got {other:?}"),
    }
}

#[test]
fn empty_identity_kind_defaults_to_secret() {
    let registry = AdmissionRegistry::builtin();
    for version in SchemaVersion::iter() {
        let admitted = registry
            .review(&logger(), Operation::Create, machine(version, ""), None)
            .unwrap();
        assert_eq!(admitted["spec"]["identityRef"]["kind"], "Secret");
    }
}

#[test]
fn foreign_identity_kind_is_forbidden() {
    let registry = AdmissionRegistry::builtin();
    for version in SchemaVersion::iter() {
        let bad = machine(version, "ConfigMap");

        let created = registry.review(
            &logger(),
            Operation::Create,
            bad.clone(),
            None,
        );
        assert_eq!(
            rejection(created),
            [("spec.identityRef.kind".to_owned(), FieldErrorKind::Forbidden)]
        );

        let old = machine(version, "Secret");
        let updated =
            registry.review(&logger(), Operation::Update, bad, Some(&old));
        assert_eq!(
            rejection(updated),
            [("spec.identityRef.kind".to_owned(), FieldErrorKind::Forbidden)]
        );
    }
}

#[test]
fn template_spec_cannot_change() {
    let registry = AdmissionRegistry::builtin();
    for version in SchemaVersion::iter() {
        let log = logger();
        let old = registry
            .review(&log, Operation::Create, template(version, "ubuntu"), None)
            .unwrap();

        let same = template(version, "ubuntu");
        registry.review(&log, Operation::Update, same, Some(&old)).unwrap();

        let changed = template(version, "flatcar");
        assert_eq!(
            rejection(registry.review(
                &log,
                Operation::Update,
                changed,
                Some(&old)
            )),
            [("spec.template.spec".to_owned(), FieldErrorKind::Immutable)]
        );
    }
}

#[test]
fn delete_is_always_admitted() {
    let registry = AdmissionRegistry::builtin();
    let object = machine(SchemaVersion::V1alpha5, "ConfigMap");
    let admitted = registry
        .review(&logger(), Operation::Delete, object.clone(), None)
        .unwrap();
    assert_eq!(admitted, object);
}
