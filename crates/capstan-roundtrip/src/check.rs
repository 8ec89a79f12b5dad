// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use capstan_conversion::{ConversionError, ConversionPair};
use capstan_types::{Kind, SchemaVersion};
use serde_json::Value;
use slog::{trace, Logger};
use strum::Display;
use thiserror::Error;

use crate::exclusion::strip_side_channel;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum Direction {
    /// `upgrade(downgrade(hub))`
    #[strum(serialize = "hub-spoke-hub")]
    HubSpokeHub,

    /// `downgrade(upgrade(spoke))`, spoke carrying its side-channel record
    #[strum(serialize = "spoke-hub-spoke")]
    SpokeHubSpoke,

    /// `downgrade(upgrade(spoke))`, spoke without a side-channel record
    #[strum(serialize = "spoke-hub-spoke (no side channel)")]
    SpokeHubSpokeBare,
}

#[derive(Debug, Error)]
pub enum RoundTripError {
    #[error("conversion failed")]
    Conversion(#[from] ConversionError),

    #[error(
        "{direction} round trip of {kind} through {version} changed the \
         object at {at}"
    )]
    Mismatch {
        version: SchemaVersion,
        kind: Kind,
        direction: Direction,
        at: String,
        before: Value,
        after: Value,
    },
}

/// Checks every round-trip law for `pair` against one serialized hub object.
pub fn check_pair(
    log: &Logger,
    pair: &ConversionPair,
    hub: &Value,
) -> Result<(), RoundTripError> {
    let spoke = (pair.downgrade)(log, hub.clone())?;

    let back = (pair.upgrade)(log, spoke.clone())?;
    compare(pair, Direction::HubSpokeHub, hub, back)?;

    let again = (pair.downgrade)(log, (pair.upgrade)(log, spoke.clone())?)?;
    compare(pair, Direction::SpokeHubSpoke, &spoke, again)?;

    let mut bare = spoke;
    strip_side_channel(&mut bare);
    let again = (pair.downgrade)(log, (pair.upgrade)(log, bare.clone())?)?;
    compare(pair, Direction::SpokeHubSpokeBare, &bare, again)?;

    trace!(log, "round trip ok";
        "version" => %pair.version,
        "kind" => %pair.kind,
    );
    Ok(())
}

fn compare(
    pair: &ConversionPair,
    direction: Direction,
    before: &Value,
    after: Value,
) -> Result<(), RoundTripError> {
    match first_difference(before, &after) {
        None => Ok(()),
        Some(at) => Err(RoundTripError::Mismatch {
            version: pair.version,
            kind: pair.kind,
            direction,
            at,
            before: before.clone(),
            after,
        }),
    }
}

/// Returns a JSON pointer to the first place `a` and `b` differ.
pub fn first_difference(a: &Value, b: &Value) -> Option<String> {
    fn walk(a: &Value, b: &Value, at: &mut String) -> bool {
        match (a, b) {
            (Value::Object(a), Value::Object(b)) => {
                for key in a.keys().chain(b.keys()) {
                    let len = at.len();
                    at.push('/');
                    at.push_str(key);
                    let differs = match (a.get(key), b.get(key)) {
                        (Some(x), Some(y)) => walk(x, y, at),
                        _ => true,
                    };
                    if differs {
                        return true;
                    }
                    at.truncate(len);
                }
                false
            }
            (Value::Array(a), Value::Array(b)) if a.len() == b.len() => {
                for (i, (x, y)) in a.iter().zip(b).enumerate() {
                    let len = at.len();
                    at.push_str(&format!("/{i}"));
                    if walk(x, y, at) {
                        return true;
                    }
                    at.truncate(len);
                }
                false
            }
            _ => a != b,
        }
    }

    let mut at = String::new();
    walk(a, b, &mut at).then_some(at)
}
