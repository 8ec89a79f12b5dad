// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::latest::machine::IdentityRef;

impl IdentityRef {
    /// The only kind of object an identity reference may currently name.
    pub const SECRET_KIND: &'static str = "Secret";

    pub fn secret(name: impl Into<String>) -> Self {
        Self { kind: Self::SECRET_KIND.to_owned(), name: name.into() }
    }
}
