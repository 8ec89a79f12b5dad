// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::latest::cluster::ApiEndpoint;

impl ApiEndpoint {
    /// An endpoint is unset until a host or port is assigned to it.
    pub fn is_unset(&self) -> bool {
        self.host.is_empty() && self.port == 0
    }
}
