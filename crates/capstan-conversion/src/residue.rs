// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Helpers for capturing and restoring per-element residue of collections.

/// Captures the residue of each element of `items`, in order. Returns an
/// empty vector if every element's residue is the default, so that
/// collections with nothing to preserve add nothing to the record.
pub(crate) fn capture_each<T, R, F>(items: &[T], capture: F) -> Vec<R>
where
    R: Default + PartialEq,
    F: Fn(&T) -> R,
{
    let residues: Vec<R> = items.iter().map(capture).collect();
    if residues.iter().all(|r| *r == R::default()) {
        Vec::new()
    } else {
        residues
    }
}

/// Restores residues onto `items` by position.
///
/// Residue is only applied when the element counts match. A mismatch means
/// the collection was edited through the spoke since the record was written,
/// so positions no longer line up with what was captured.
pub(crate) fn restore_each<T, R, F>(
    items: &mut [T],
    residues: Vec<R>,
    restore: F,
)
where
    F: Fn(&mut T, R),
{
    if items.len() != residues.len() {
        return;
    }
    for (item, residue) in items.iter_mut().zip(residues) {
        restore(item, residue);
    }
}
