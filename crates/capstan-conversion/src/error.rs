// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use capstan_types::{Kind, SchemaVersion, TypeMetaError};
use thiserror::Error;

/// Errors that abort a conversion. A conversion that fails never yields a
/// partially converted object.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("object is not a JSON object")]
    NotAnObject,

    #[error("object has no usable apiVersion and kind")]
    MissingTypeMeta(#[source] serde_json::Error),

    #[error("unrecognized object type")]
    TypeMeta(#[from] TypeMetaError),

    #[error("schema version {0} is not served")]
    VersionNotServed(SchemaVersion),

    #[error("no conversion registered for {kind} at {version}")]
    Unregistered { version: SchemaVersion, kind: Kind },

    #[error("failed to decode {kind} at {version}")]
    Decode {
        version: SchemaVersion,
        kind: Kind,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {kind} at {version}")]
    Encode {
        version: SchemaVersion,
        kind: Kind,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode side-channel record for {kind} at {version}")]
    SideChannelEncode {
        version: SchemaVersion,
        kind: Kind,
        #[source]
        source: serde_json::Error,
    },
}
