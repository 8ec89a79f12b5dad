// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use capstan_types::{Kind, SchemaVersion};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::rules;
use crate::{FieldPath, ValidationErrors};

/// The operation a client is attempting.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    Serialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

/// Admission behavior of one versioned top-level type.
pub trait Validator {
    const VERSION: SchemaVersion;
    const KIND: Kind;

    /// Fills required-but-unset fields with their defaults, in place.
    fn apply_defaults(&mut self);

    fn validate_create(&self) -> Result<(), ValidationErrors>;

    /// Validates `self` as a replacement for `old`.
    fn validate_update(&self, old: &Self) -> Result<(), ValidationErrors>;

    fn validate_delete(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

fn template_spec_path() -> FieldPath {
    FieldPath::new("spec").child("template").child("spec")
}

macro_rules! impl_validators {
    ($version:ident, $schema:expr) => {
        impl Validator
            for capstan_api_types_versions::$version::cluster::OpenStackCluster
        {
            const VERSION: SchemaVersion = $schema;
            const KIND: Kind = Kind::OpenStackCluster;

            fn apply_defaults(&mut self) {
                rules::default_cluster_spec(&mut self.spec);
            }

            fn validate_create(&self) -> Result<(), ValidationErrors> {
                let mut errors = Vec::new();
                rules::check_cluster_spec(&self.spec, &mut errors);
                ValidationErrors::check(errors)
            }

            fn validate_update(
                &self,
                old: &Self,
            ) -> Result<(), ValidationErrors> {
                let mut errors = Vec::new();
                rules::check_cluster_spec(&self.spec, &mut errors);
                rules::check_cluster_update(&old.spec, &self.spec, &mut errors);
                ValidationErrors::check(errors)
            }
        }

        impl Validator
            for capstan_api_types_versions::$version::machine::OpenStackMachine
        {
            const VERSION: SchemaVersion = $schema;
            const KIND: Kind = Kind::OpenStackMachine;

            fn apply_defaults(&mut self) {
                rules::default_machine_spec(&mut self.spec);
            }

            fn validate_create(&self) -> Result<(), ValidationErrors> {
                let mut errors = Vec::new();
                rules::check_machine_spec(
                    &FieldPath::new("spec"),
                    &self.spec,
                    &mut errors,
                );
                ValidationErrors::check(errors)
            }

            fn validate_update(
                &self,
                old: &Self,
            ) -> Result<(), ValidationErrors> {
                let mut errors = Vec::new();
                rules::check_machine_spec(
                    &FieldPath::new("spec"),
                    &self.spec,
                    &mut errors,
                );
                rules::check_machine_update(&old.spec, &self.spec, &mut errors);
                ValidationErrors::check(errors)
            }
        }

        impl Validator
            for capstan_api_types_versions::$version::template::OpenStackMachineTemplate
        {
            const VERSION: SchemaVersion = $schema;
            const KIND: Kind = Kind::OpenStackMachineTemplate;

            fn apply_defaults(&mut self) {
                rules::default_machine_spec(&mut self.spec.template.spec);
            }

            fn validate_create(&self) -> Result<(), ValidationErrors> {
                let mut errors = Vec::new();
                rules::check_machine_spec(
                    &template_spec_path(),
                    &self.spec.template.spec,
                    &mut errors,
                );
                ValidationErrors::check(errors)
            }

            fn validate_update(
                &self,
                old: &Self,
            ) -> Result<(), ValidationErrors> {
                let mut errors = Vec::new();
                rules::check_machine_spec(
                    &template_spec_path(),
                    &self.spec.template.spec,
                    &mut errors,
                );
                rules::check_unchanged(
                    template_spec_path(),
                    &old.spec.template.spec,
                    &self.spec.template.spec,
                    &[],
                    "machine template spec is immutable",
                    &mut errors,
                );
                ValidationErrors::check(errors)
            }
        }
    };
}

impl_validators!(v1alpha5, SchemaVersion::V1alpha5);
impl_validators!(v1alpha6, SchemaVersion::V1alpha6);
impl_validators!(v1alpha7, SchemaVersion::V1alpha7);
