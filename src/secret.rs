//Copyright 2026 gkeyring Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use serde::{Deserialize, Serialize};
use zbus::zvariant::{OwnedObjectPath, Type};

/// A secret as it travels over the bus: `(oayays)`.
///
/// Build it with [`Session::format_secret`](crate::Session::format_secret) so that
/// `parameters` and `value` match the session's algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Type)]
pub struct Secret {
    pub session: OwnedObjectPath,
    pub parameters: Vec<u8>,
    pub value: Vec<u8>,
    pub content_type: String,
}

impl Secret {
    /// An unencrypted secret; `parameters` stay empty.
    pub fn plain(session: OwnedObjectPath, value: &[u8], content_type: &str) -> Self {
        Secret {
            session,
            parameters: Vec::new(),
            value: value.to_vec(),
            content_type: content_type.to_owned(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn should_match_wire_signature() {
        assert_eq!(Secret::SIGNATURE.to_string(), "(oayays)");
    }

    #[test]
    fn should_build_plain_secret() {
        let session = OwnedObjectPath::try_from("/org/freedesktop/secrets/session/s1").unwrap();
        let secret = Secret::plain(session.clone(), b"testpass", "text/plain");
        assert_eq!(secret.session, session);
        assert!(secret.parameters.is_empty());
        assert_eq!(secret.value, b"testpass");
        assert_eq!(secret.content_type, "text/plain");
    }
}
