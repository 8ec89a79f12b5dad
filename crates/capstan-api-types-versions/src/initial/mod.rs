// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Version `v1alpha5` of the schema.
//!
//! This is the oldest supported shape. Ports name their network with a bare
//! `networkId`, the API server load balancer is described by two flat cluster
//! fields, and a root volume records how its disk was sourced.

pub mod cluster;
pub mod filters;
pub mod machine;
pub mod template;
