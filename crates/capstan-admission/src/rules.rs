// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rules shared by every version's validators.

use std::net::IpAddr;
use std::str::FromStr;

use capstan_api_types_versions::latest::machine::IdentityRef;
use serde::Serialize;
use serde_json::Value;

use crate::view::{ClusterSpecView, MachineSpecView};
use crate::{FieldError, FieldPath};

const PORT_MAX: i32 = u16::MAX as i32;

pub(crate) fn default_identity_ref(identity_ref: Option<&mut IdentityRef>) {
    if let Some(r) = identity_ref {
        if r.kind.is_empty() {
            r.kind = IdentityRef::SECRET_KIND.to_owned();
        }
    }
}

pub(crate) fn check_identity_ref(
    path: &FieldPath,
    identity_ref: Option<&IdentityRef>,
    errors: &mut Vec<FieldError>,
) {
    let Some(r) = identity_ref else {
        return;
    };

    if r.kind != IdentityRef::SECRET_KIND {
        errors.push(FieldError::forbidden(
            path.child("kind"),
            format!(
                "identity reference kind {:?} is not supported; \
                 the only supported kind is {:?}",
                r.kind,
                IdentityRef::SECRET_KIND
            ),
        ));
    }

    if r.name.is_empty() {
        errors.push(FieldError::invalid(
            path.child("name"),
            "identity reference name must not be empty",
        ));
    }
}

pub(crate) fn default_machine_spec<M: MachineSpecView>(spec: &mut M) {
    default_identity_ref(spec.identity_ref_mut());
}

pub(crate) fn check_machine_spec<M: MachineSpecView>(
    path: &FieldPath,
    spec: &M,
    errors: &mut Vec<FieldError>,
) {
    check_identity_ref(
        &path.child("identityRef"),
        spec.identity_ref(),
        errors,
    );

    if let Some(size) = spec.root_volume_size() {
        if size < 0 {
            errors.push(FieldError::invalid(
                path.child("rootVolume").child("diskSize"),
                format!("root volume size {size} must not be negative"),
            ));
        }
    }

    for (i, addresses) in spec.fixed_ip_addresses().into_iter().enumerate() {
        let port_path = path.child("ports").index(i).child("fixedIPs");
        for (j, address) in addresses.into_iter().enumerate() {
            if !address.is_empty() && IpAddr::from_str(address).is_err() {
                errors.push(FieldError::invalid(
                    port_path.index(j).child("ipAddress"),
                    format!("{address:?} is not an IP address"),
                ));
            }
        }
    }
}

/// Machine specs are immutable once created, apart from the provider and
/// instance IDs, which may each be filled in once, and the identity
/// reference.
pub(crate) fn check_machine_update<M: MachineSpecView>(
    old: &M,
    new: &M,
    errors: &mut Vec<FieldError>,
) {
    let mut permitted: Vec<&[&str]> = Vec::new();
    permitted.push(&["identityRef"]);
    if old.provider_id().is_none() {
        permitted.push(&["providerID"]);
    }
    if old.instance_id().is_none() {
        permitted.push(&["instanceID"]);
    }

    check_unchanged(
        FieldPath::new("spec"),
        old,
        new,
        &permitted,
        "machine spec may not be changed after creation",
        errors,
    );
}

pub(crate) fn default_cluster_spec<C: ClusterSpecView>(spec: &mut C) {
    default_identity_ref(spec.identity_ref_mut());
    if let Some(instance) = spec.bastion_instance_mut() {
        default_machine_spec(instance);
    }
}

pub(crate) fn check_cluster_spec<C: ClusterSpecView>(
    spec: &C,
    errors: &mut Vec<FieldError>,
) {
    let path = FieldPath::new("spec");

    check_identity_ref(
        &path.child("identityRef"),
        spec.identity_ref(),
        errors,
    );

    let port = spec.api_server_port();
    if !(0..=PORT_MAX).contains(&port) {
        errors.push(FieldError::invalid(
            path.child("apiServerPort"),
            format!("port {port} is not between 0 and {PORT_MAX}"),
        ));
    }

    let (ports_path, ports) = spec.load_balancer_ports();
    for (i, port) in ports.iter().enumerate() {
        if !(1..=PORT_MAX).contains(port) {
            errors.push(FieldError::invalid(
                ports_path.index(i),
                format!("port {port} is not between 1 and {PORT_MAX}"),
            ));
        }
    }

    if let Some((cidrs_path, cidrs)) = spec.allowed_cidrs() {
        for (i, cidr) in cidrs.iter().enumerate() {
            if !is_cidr(cidr) {
                errors.push(FieldError::invalid(
                    cidrs_path.index(i),
                    format!("{cidr:?} is not a CIDR"),
                ));
            }
        }
    }

    if let Some(instance) = spec.bastion_instance() {
        check_machine_spec(
            &path.child("bastion").child("instance"),
            instance,
            errors,
        );
    }
}

/// Cluster specs are immutable once created, apart from the identity
/// reference's name, the control plane endpoint until it is first set, the
/// bastion, and the load balancer's allowed CIDRs.
pub(crate) fn check_cluster_update<C: ClusterSpecView>(
    old: &C,
    new: &C,
    errors: &mut Vec<FieldError>,
) {
    let mut permitted: Vec<&[&str]> = Vec::new();
    permitted.push(&["identityRef", "name"]);
    permitted.push(&["bastion"]);
    permitted.push(&["apiServerLoadBalancer", "allowedCidrs"]);
    if old.control_plane_endpoint_is_unset() {
        permitted.push(&["controlPlaneEndpoint"]);
    }

    check_unchanged(
        FieldPath::new("spec"),
        old,
        new,
        &permitted,
        "cluster spec may not be changed after creation",
        errors,
    );
}

/// Reports one `Immutable` error at `path` if `old` and `new` differ in their
/// serialized form anywhere outside the `permitted` key paths.
///
/// Values that cannot be serialized are treated as changed.
pub(crate) fn check_unchanged<T: Serialize + ?Sized>(
    path: FieldPath,
    old: &T,
    new: &T,
    permitted: &[&[&str]],
    message: &str,
    errors: &mut Vec<FieldError>,
) {
    let comparable = |value: &T| -> Option<Value> {
        let mut value = serde_json::to_value(value).ok()?;
        for key_path in permitted {
            remove_key_path(&mut value, key_path);
        }
        Some(value)
    };

    match (comparable(old), comparable(new)) {
        (Some(old), Some(new)) if old == new => {}
        _ => errors.push(FieldError::immutable(path, message)),
    }
}

fn remove_key_path(value: &mut Value, key_path: &[&str]) {
    match key_path {
        [] => {}
        [key] => {
            if let Some(map) = value.as_object_mut() {
                map.remove(*key);
            }
        }
        [key, rest @ ..] => {
            if let Some(child) = value.get_mut(*key) {
                remove_key_path(child, rest);
            }
        }
    }
}

/// Returns true if `s` is an address and prefix length, e.g. `10.0.0.0/8`.
pub(crate) fn is_cidr(s: &str) -> bool {
    let Some((address, prefix)) = s.split_once('/') else {
        return false;
    };
    let Ok(prefix) = u8::from_str(prefix) else {
        return false;
    };

    match IpAddr::from_str(address) {
        Ok(IpAddr::V4(_)) => prefix <= 32,
        Ok(IpAddr::V6(_)) => prefix <= 128,
        Err(_) => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    const CIDR_CASES: &[(&str, bool)] = &[
        ("10.0.0.0/8", true),
        ("192.168.1.0/24", true),
        ("0.0.0.0/0", true),
        ("fd00::/64", true),
        ("10.0.0.0/33", false),
        ("fd00::/129", false),
        ("10.0.0.0", false),
        ("10.0.0/8", false),
        ("10.0.0.0/", false),
        ("/8", false),
        ("", false),
    ];

    #[test]
    fn cidr_parsing() {
        for (input, expected) in CIDR_CASES {
            assert_eq!(is_cidr(input), *expected, "input {input:?}");
        }
    }

    #[test]
    fn identity_ref_rules() {
        let path = FieldPath::new("spec").child("identityRef");
        let mut errors = Vec::new();

        check_identity_ref(&path, None, &mut errors);
        assert!(errors.is_empty());

        let ok = IdentityRef::secret("creds");
        check_identity_ref(&path, Some(&ok), &mut errors);
        assert!(errors.is_empty());

        let bad =
            IdentityRef { kind: "ConfigMap".to_owned(), name: String::new() };
        check_identity_ref(&path, Some(&bad), &mut errors);
        let paths: Vec<_> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["spec.identityRef.kind", "spec.identityRef.name"]);
    }

    #[test]
    fn defaulting_fills_only_empty_kind() {
        let mut empty = IdentityRef { kind: String::new(), name: "n".into() };
        default_identity_ref(Some(&mut empty));
        assert_eq!(empty.kind, IdentityRef::SECRET_KIND);

        let mut other = IdentityRef { kind: "Other".into(), name: "n".into() };
        default_identity_ref(Some(&mut other));
        assert_eq!(other.kind, "Other");
    }

    #[test]
    fn unchanged_ignores_permitted_paths() {
        let old = json!({ "a": 1, "b": { "c": 2, "d": 3 } });
        let new = json!({ "a": 1, "b": { "c": 9, "d": 3 } });
        let path = FieldPath::new("spec");

        let changed: &[&[&str]] = &[&["b", "c"]];
        let unrelated: &[&[&str]] = &[&["b", "d"]];
        let sibling: &[&[&str]] = &[&["a"]];

        let mut errors = Vec::new();
        check_unchanged(path.clone(), &old, &new, changed, "m", &mut errors);
        assert!(errors.is_empty());

        check_unchanged(path.clone(), &old, &new, unrelated, "m", &mut errors);
        check_unchanged(path, &old, &new, sibling, "m", &mut errors);
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.kind == crate::FieldErrorKind::Immutable));
    }
}
