//Copyright 2026 gkeyring Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::ss::{ATTR_SERVICE, ATTR_USERNAME};
use std::collections::HashMap;

/// The `(service, username)` pair a stored password is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Credential {
    pub service: String,
    pub username: String,
}

impl Credential {
    pub fn new(service: impl Into<String>, username: impl Into<String>) -> Self {
        Credential {
            service: service.into(),
            username: username.into(),
        }
    }

    /// Reads the pair back from an item's attributes. Items missing either
    /// key were not stored by this library.
    pub fn from_attributes(attributes: &HashMap<String, String>) -> Option<Self> {
        Some(Credential {
            service: attributes.get(ATTR_SERVICE)?.clone(),
            username: attributes.get(ATTR_USERNAME)?.clone(),
        })
    }
}

/// Attributes used both to create and to search for a credential.
pub(crate) fn credential_attributes<'a>(service: &'a str, user: &'a str) -> HashMap<&'a str, &'a str> {
    HashMap::from([(ATTR_USERNAME, user), (ATTR_SERVICE, service)])
}

pub(crate) fn credential_label(service: &str, user: &str) -> String {
    format!("Password for '{user}' on '{service}'")
}
