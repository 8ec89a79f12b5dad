// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The side channel: hub-only data carried on a spoke object.
//!
//! When a hub object is downgraded, whatever the spoke shape cannot represent
//! is serialized into a single annotation on the spoke object's metadata. The
//! annotation value is a JSON record of the form
//!
//! ```text
//! {
//!     "marker": "infrastructure.capstan.io/v1alpha7+residue.1",
//!     "data": { ... }
//! }
//! ```
//!
//! The marker names the hub schema the data was captured from. A record with
//! a different marker, or one that does not parse, is treated as absent: the
//! upgrade proceeds without it and only loses the hub-only fields.

use capstan_types::{ObjectMeta, GROUP};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The annotation key under which hub-only data travels.
pub const SIDE_CHANNEL_KEY: &str = "conversion.capstan.io/hub-data";

/// Revision of the residue encoding. Bump when a residue type changes in a
/// way older records cannot be decoded into.
pub const RESIDUE_FORMAT_VERSION: u32 = 1;

/// The marker written into every record.
pub const RECORD_MARKER: &str = const_format::concatcp!(
    GROUP,
    "/v1alpha7+residue.",
    RESIDUE_FORMAT_VERSION
);

#[derive(Debug, Deserialize, Serialize)]
struct Record<T> {
    marker: String,
    data: T,
}

/// Reasons a side-channel record could not be used.
#[derive(Debug, Error)]
pub enum SideChannelError {
    #[error("record is not valid JSON")]
    Malformed(#[source] serde_json::Error),

    #[error("record marker {0:?} does not match {RECORD_MARKER:?}")]
    IncompatibleMarker(String),

    #[error("record data does not match the expected residue shape")]
    ResidueShape(#[source] serde_json::Error),
}

/// Serializes `residue` into a record string.
pub fn encode<R: Serialize>(residue: &R) -> Result<String, serde_json::Error> {
    serde_json::to_string(&Record {
        marker: RECORD_MARKER.to_owned(),
        data: residue,
    })
}

/// Parses a record string produced by [`encode`].
pub fn decode<R: DeserializeOwned>(raw: &str) -> Result<R, SideChannelError> {
    let record: Record<serde_json::Value> =
        serde_json::from_str(raw).map_err(SideChannelError::Malformed)?;

    if record.marker != RECORD_MARKER {
        return Err(SideChannelError::IncompatibleMarker(record.marker));
    }

    serde_json::from_value(record.data).map_err(SideChannelError::ResidueShape)
}

/// Removes the side-channel annotation from `meta`, returning its value.
pub fn take(meta: &mut ObjectMeta) -> Option<String> {
    meta.annotations.remove(SIDE_CHANNEL_KEY)
}

/// Stores `raw` as the side-channel annotation on `meta`, replacing any
/// previous record.
pub fn attach(meta: &mut ObjectMeta, raw: String) {
    meta.annotations.insert(SIDE_CHANNEL_KEY.to_owned(), raw);
}

#[cfg(test)]
mod test {
    use super::*;
    use capstan_types::SchemaVersion;

    #[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
    #[serde(default)]
    struct Residue {
        cidrs: Vec<String>,
    }

    #[test]
    fn marker_names_hub() {
        let prefix = format!("{}+", SchemaVersion::HUB.api_version());
        assert!(RECORD_MARKER.starts_with(&prefix), "{RECORD_MARKER}");
    }

    #[test]
    fn encode_then_decode() {
        let residue = Residue { cidrs: vec!["10.0.0.0/8".to_owned()] };
        let raw = encode(&residue).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["marker"], RECORD_MARKER);
        assert_eq!(value["data"]["cidrs"][0], "10.0.0.0/8");
        assert_eq!(decode::<Residue>(&raw).unwrap(), residue);
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            decode::<Residue>("{not json"),
            Err(SideChannelError::Malformed(_))
        ));
    }

    #[test]
    fn foreign_marker_is_rejected() {
        let raw = r#"{"marker":"infrastructure.capstan.io/v1alpha8+residue.1",
                       "data":{}}"#;
        assert!(matches!(
            decode::<Residue>(raw),
            Err(SideChannelError::IncompatibleMarker(m))
                if m.ends_with("v1alpha8+residue.1")
        ));
    }

    #[test]
    fn wrong_shape_is_rejected() {
        let raw = format!(r#"{{"marker":"{RECORD_MARKER}","data":[1,2]}}"#);
        assert!(matches!(
            decode::<Residue>(&raw),
            Err(SideChannelError::ResidueShape(_))
        ));
    }

    #[test]
    fn take_removes_annotation() {
        let mut meta = ObjectMeta::default();
        attach(&mut meta, "x".to_owned());
        meta.annotations.insert("other".to_owned(), "y".to_owned());
        assert_eq!(take(&mut meta).as_deref(), Some("x"));
        assert_eq!(take(&mut meta), None);
        assert_eq!(meta.annotations.len(), 1);
    }
}
