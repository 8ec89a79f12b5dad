// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion between spoke schema versions and the hub.
//!
//! Every spoke type converts only to and from its hub counterpart; converting
//! between two spokes is a downgrade of an upgrade. The structural field
//! mapping for each pair lives with the versioned types (as `From` impls in
//! the hub's module). This crate layers two things on top of it:
//!
//! - A side channel (see [`side_channel`]) that stashes the hub-only fields a
//!   spoke cannot hold in one annotation on the spoke object, so that
//!   `upgrade(downgrade(hub)) == hub`.
//! - A registry (see [`registry`]) mapping each `(version, kind)` to its
//!   upgrade and downgrade over serialized objects, which is the surface the
//!   boundary runtime calls into.
//!
//! All conversions are synchronous and allocate fresh output. Nothing here
//! holds shared mutable state, so any number of conversions may run
//! concurrently.

pub mod convertible;
mod error;
pub mod orchestrator;
pub mod registry;
mod residue;
pub mod side_channel;
pub mod v1alpha5;
pub mod v1alpha6;

pub use convertible::Convertible;
pub use error::ConversionError;
pub use orchestrator::{downgrade, downgrade_list, upgrade, upgrade_list};
pub use registry::{ConversionPair, ConversionRegistry};
