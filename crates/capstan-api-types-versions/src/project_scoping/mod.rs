// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Version `v1alpha7` of the schema: the hub.
//!
//! This version drops the legacy `tenantId` in favor of `projectId`, and adds
//! port value specs, additional block devices, a load balancer provider, and
//! the option to omit availability zones for control plane machines.
//!
//! Every spoke version converts to and from the shapes in this module, and
//! those conversions live here. Fields the spokes cannot represent are simply
//! dropped by the `From` impls in this module; preserving them across a round
//! trip is the conversion engine's job, not the mappers'.

pub mod cluster;
pub mod filters;
pub mod machine;
pub mod template;
