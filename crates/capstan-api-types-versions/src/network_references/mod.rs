// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Version `v1alpha6` of the schema.
//!
//! This version replaces a port's bare `networkId` with a network filter,
//! nests the API server load balancer settings (adding `allowedCidrs`), adds
//! `propagateUplinkStatus` to ports, and drops the sourcing details from root
//! volumes in favor of the machine's `imageUUID`.

pub mod cluster;
pub mod machine;
pub mod template;
