// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Versioned resource shapes for the `infrastructure.capstan.io` API group.
//!
//! # Adding a new schema version
//!
//! When adding a new version N with added or changed types:
//!
//! 1. Create `<change_name>/mod.rs`, where `<change_name>` describes what the
//!    version changed, and add it to the end of the list below as
//!    `#[path = "<change_name>/mod.rs"] pub mod vN;`.
//!
//! 2. Add only the new and changed types to the new module, mirroring the
//!    module structure of earlier versions. Types that did not change are
//!    reused from the version that last defined them.
//!
//! 3. Conversions are only ever written between a spoke and the hub. If the
//!    new version becomes the hub, move the hub conversions to it and turn
//!    the old hub into a spoke.
//!
//! 4. Update `latest.rs` with the new and updated types.

mod impls;
pub mod latest;

#[path = "initial/mod.rs"]
pub mod v1alpha5;
#[path = "network_references/mod.rs"]
pub mod v1alpha6;
#[path = "project_scoping/mod.rs"]
pub mod v1alpha7;
