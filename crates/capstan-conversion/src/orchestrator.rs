// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Upgrade and downgrade of single objects and lists.

use capstan_types::ObjectList;
use slog::{debug, warn, Logger};

use crate::side_channel;
use crate::{ConversionError, Convertible};

/// Converts a spoke object to the hub, restoring any hub-only fields carried
/// in its side-channel annotation. The annotation never appears on the
/// returned hub object.
///
/// An unusable record is logged and skipped; it never fails the upgrade.
/// Spoke values the hub cannot hold are logged as they are dropped.
pub fn upgrade<S: Convertible>(
    log: &Logger,
    mut spoke: S,
) -> Result<S::Hub, ConversionError> {
    let record = side_channel::take(spoke.metadata_mut());
    let residue = record.and_then(|raw| {
        match side_channel::decode::<S::Residue>(&raw) {
            Ok(residue) => Some(residue),
            Err(e) => {
                warn!(log, "ignoring side-channel record";
                    "version" => %S::VERSION,
                    "kind" => %S::KIND,
                    "name" => &spoke.metadata().name,
                    "error" => %e,
                );
                None
            }
        }
    });

    for (field, value) in spoke.discarded() {
        warn!(log, "discarding value with no hub counterpart";
            "version" => %S::VERSION,
            "kind" => %S::KIND,
            "name" => &spoke.metadata().name,
            "field" => field,
            "value" => value,
        );
    }

    let mut hub = spoke.into_hub();
    if let Some(residue) = residue {
        S::restore(&mut hub, residue);
    }

    Ok(hub)
}

/// Converts a hub object to a spoke, recording hub-only fields in the
/// side-channel annotation of the result.
///
/// Any side-channel annotation already on `hub` is discarded. Failure to
/// encode the record is fatal, since the hub-only data would otherwise be
/// silently dropped.
pub fn downgrade<S: Convertible>(
    log: &Logger,
    hub: S::Hub,
) -> Result<S, ConversionError> {
    let residue = S::capture(&hub);
    let mut spoke = S::from_hub(hub);
    side_channel::take(spoke.metadata_mut());

    if residue != S::Residue::default() {
        let raw = side_channel::encode(&residue).map_err(|source| {
            ConversionError::SideChannelEncode {
                version: S::VERSION,
                kind: S::KIND,
                source,
            }
        })?;
        debug!(log, "recording hub-only fields";
            "version" => %S::VERSION,
            "kind" => %S::KIND,
            "name" => &spoke.metadata().name,
            "bytes" => raw.len(),
        );
        side_channel::attach(spoke.metadata_mut(), raw);
    }

    Ok(spoke)
}

/// Upgrades every item of a list, preserving order and count. Fails on the
/// first item that fails.
pub fn upgrade_list<S: Convertible>(
    log: &Logger,
    list: ObjectList<S>,
) -> Result<ObjectList<S::Hub>, ConversionError> {
    let items = list
        .items
        .into_iter()
        .map(|item| upgrade(log, item))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ObjectList { metadata: list.metadata, items })
}

/// Downgrades every item of a list, preserving order and count. Fails on the
/// first item that fails.
pub fn downgrade_list<S: Convertible>(
    log: &Logger,
    list: ObjectList<S::Hub>,
) -> Result<ObjectList<S>, ConversionError> {
    let items = list
        .items
        .into_iter()
        .map(|item| downgrade(log, item))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ObjectList { metadata: list.metadata, items })
}
