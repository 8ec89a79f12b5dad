// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use capstan_types::{Kind, Object, SchemaVersion};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A spoke-version resource shape and its relationship to the hub.
///
/// `into_hub` and `from_hub` are the pure structural mappings; they never
/// look at annotations. `capture` and `restore` describe the hub-only data
/// the spoke cannot hold, which the orchestrator carries in the side
/// channel. For every hub object `h`,
/// `restore(into_hub(from_hub(h)), capture(h))` must equal `h` apart from
/// the side-channel annotation itself.
pub trait Convertible:
    Object + Clone + Serialize + DeserializeOwned + Sized
{
    type Hub: Object + Clone + Serialize + DeserializeOwned;

    /// The hub-only data of one object. `Default` means there is nothing to
    /// preserve, in which case no record is attached.
    type Residue: Default + PartialEq + Serialize + DeserializeOwned;

    const VERSION: SchemaVersion;
    const KIND: Kind;

    fn into_hub(self) -> Self::Hub;
    fn from_hub(hub: Self::Hub) -> Self;
    fn capture(hub: &Self::Hub) -> Self::Residue;
    fn restore(hub: &mut Self::Hub, residue: Self::Residue);

    /// Values this spoke object carries that `into_hub` cannot represent and
    /// no record can bring back, as `(field path, value)` pairs.
    fn discarded(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}
