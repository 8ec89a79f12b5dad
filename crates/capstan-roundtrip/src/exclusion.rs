// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Exclusion rules applied to generated objects before comparison.
//!
//! A hub object never carries a side-channel record of its own: upgrade
//! strips it and downgrade replaces it. Generated hub metadata therefore has
//! that annotation removed.
//!
//! Spoke objects are only ever produced by downgrading a hub object, which
//! excludes by construction everything a spoke can hold but the hub cannot
//! reproduce: a legacy tenant ID that differs from the project ID, and root
//! volume source and device types other than the fixed ones the hub writes.

use capstan_conversion::side_channel::SIDE_CHANNEL_KEY;
use capstan_types::ObjectMeta;
use serde_json::Value;

pub fn exclude_meta(meta: &mut ObjectMeta) {
    meta.annotations.remove(SIDE_CHANNEL_KEY);
}

/// Removes the side-channel record from a serialized object or from every
/// item of a serialized list.
pub fn strip_side_channel(object: &mut Value) {
    if let Some(items) = object.get_mut("items").and_then(Value::as_array_mut)
    {
        items.iter_mut().for_each(strip_side_channel);
        return;
    }

    let annotations = object
        .get_mut("metadata")
        .and_then(|m| m.get_mut("annotations"))
        .and_then(Value::as_object_mut);
    if let Some(annotations) = annotations {
        annotations.remove(SIDE_CHANNEL_KEY);
        if annotations.is_empty() {
            if let Some(meta) =
                object.get_mut("metadata").and_then(Value::as_object_mut)
            {
                meta.remove("annotations");
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_from_items_and_drops_empty_map() {
        let mut list = json!({
            "items": [
                { "metadata": { "annotations": { SIDE_CHANNEL_KEY: "x" } } },
                { "metadata": { "annotations": {
                    SIDE_CHANNEL_KEY: "y",
                    "keep": "z",
                } } },
            ],
        });
        strip_side_channel(&mut list);
        assert_eq!(
            list,
            json!({
                "items": [
                    { "metadata": {} },
                    { "metadata": { "annotations": { "keep": "z" } } },
                ],
            })
        );
    }
}
