// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Admission-time defaulting and validation.
//!
//! Every versioned top-level type implements [`Validator`]. Rules are
//! evaluated against the shape the client submitted, so field paths in
//! errors name fields as that version spells them. Violations are collected
//! rather than short-circuited and surfaced together as one
//! [`ValidationErrors`].
//!
//! [`AdmissionRegistry`] exposes the same validators over serialized objects,
//! keyed by `(version, kind)`, for the boundary runtime's admission dispatch.

mod field;
pub mod registry;
mod rules;
mod validator;
mod view;

pub use field::{FieldError, FieldErrorKind, FieldPath, ValidationErrors};
pub use registry::{AdmissionError, AdmissionRegistry, HookSet};
pub use validator::{Operation, Validator};
