// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Round-trip property checks for every registered conversion.
//!
//! [`strategy`] generates hub objects with every field populated and
//! collections of varying length. [`exclusion`] removes what has no faithful
//! representation in a round trip, and [`check`] runs both round-trip laws
//! through a [`capstan_conversion::ConversionPair`]:
//!
//! - `upgrade(downgrade(hub)) == hub`
//! - `downgrade(upgrade(spoke)) == spoke`, for spokes produced by
//!   downgrading a generated hub object, with and without their side-channel
//!   record.

pub mod check;
pub mod exclusion;
pub mod strategy;

pub use check::{check_pair, Direction, RoundTripError};
