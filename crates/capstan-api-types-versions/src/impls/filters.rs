// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::latest::filters::NetworkFilter;

impl NetworkFilter {
    /// A filter that looks a network up by ID and nothing else.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Default::default() }
    }

    /// Returns true if this filter is a lookup by a non-empty ID alone, i.e.
    /// it can be expressed as a bare network ID.
    pub fn is_bare_id(&self) -> bool {
        !self.id.is_empty() && *self == Self::with_id(self.id.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::NetworkFilter;

    #[test]
    fn bare_id_lookups() {
        assert!(NetworkFilter::with_id("n").is_bare_id());
        assert!(!NetworkFilter::default().is_bare_id());
        assert!(!NetworkFilter {
            id: "n".to_owned(),
            tags: "a,b".to_owned(),
            ..Default::default()
        }
        .is_bare_id());
        assert!(!NetworkFilter {
            name: "public".to_owned(),
            ..Default::default()
        }
        .is_bare_id());
    }
}
