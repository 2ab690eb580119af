//Copyright 2026 gkeyring Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Errors returned by every keyring operation.

use std::string::FromUtf8Error;
use std::time::Duration;
use zbus::zvariant::OwnedObjectPath;

/// An error that could occur interacting with the secret service dbus interface.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The session bus could not be reached, so the secret service is unavailable.
    #[error("could not connect to the session bus: {0}")]
    Connection(#[source] zbus::Error),
    /// A remote method call or property read failed.
    #[error("secret service call failed: {0}")]
    Remote(#[from] zbus::Error),
    /// Unlocking did not resolve to exactly the requested collection.
    #[error("failed to unlock correct collection '{}'", .0.as_str())]
    UnlockMismatch(OwnedObjectPath),
    /// No item matched the service and user.
    #[error("secret not found in keyring")]
    NotFound,
    /// The user dismissed a prompt.
    #[error("prompt was dismissed")]
    Dismissed,
    /// A prompt did not complete before the configured deadline.
    #[error("prompt did not complete within {0:?}")]
    PromptTimeout(Duration),
    /// The stored secret is not valid text.
    #[error("secret is not valid utf-8: {0}")]
    Utf8(#[from] FromUtf8Error),
    /// An encrypted session could not decode a secret.
    #[error("crypto error: {0}")]
    Crypto(&'static str),
    /// An environment override could not be parsed.
    #[error("invalid value for {var}: {reason}")]
    Config { var: &'static str, reason: String },
}

impl From<zbus::fdo::Error> for Error {
    fn from(err: zbus::fdo::Error) -> Error {
        Error::Remote(err.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn should_name_requested_collection_on_mismatch() {
        let path = OwnedObjectPath::try_from("/org/freedesktop/secrets/collection/login").unwrap();
        let err = Error::UnlockMismatch(path);
        assert_eq!(
            err.to_string(),
            "failed to unlock correct collection '/org/freedesktop/secrets/collection/login'"
        );
    }

    #[test]
    fn should_wrap_fdo_errors_as_remote() {
        let err: Error = zbus::fdo::Error::ServiceUnknown("gone".into()).into();
        assert!(matches!(err, Error::Remote(_)));
    }
}
