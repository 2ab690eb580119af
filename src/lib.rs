//Copyright 2026 gkeyring Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! # Keyring access through the Secret Service
//!
//! Stores, retrieves, lists and deletes passwords in the desktop secret
//! service (gnome-keyring, KeePassXC, ...) over the session dbus.
//!
//! Credentials are items in the `login` collection, labeled
//! `Password for '<user>' on '<service>'` and found again by their
//! `service` and `username` attributes.
//!
//! The free functions [`set`], [`get`], [`delete`] and [`list`] each connect
//! from scratch. To reuse one connection, build a [`Keyring`]:
//!
//! ```no_run
//! use gkeyring::{Config, Keyring};
//!
//! # fn main() -> Result<(), gkeyring::Error> {
//! let keyring = Keyring::connect(Config::default())?;
//! keyring.set("example.org", "alice", "hunter2")?;
//! assert_eq!(keyring.get("example.org", "alice")?, "hunter2");
//! keyring.delete("example.org", "alice")?;
//! # Ok(())
//! # }
//! ```
//!
//! All calls block. Unlocking a collection or deleting an item may raise a
//! prompt on the desktop; the call returns once the user answers it, or
//! when [`Config::prompt_timeout`] elapses.
//!
//! ## Features
//!
//! - `rt-async-io` (default) or `rt-tokio`: the runtime zbus drives the bus with.
//! - `crypto-rust` (default): enables [`EncryptionType::Dh`] so secrets are
//!   AES encrypted on the bus. Sessions are [`EncryptionType::Plain`] unless
//!   configured otherwise.

mod collection;
mod config;
mod credential;
#[cfg(feature = "crypto-rust")]
mod crypto;
mod error;
mod item;
mod keyring;
mod prompt;
mod proxy;
mod secret;
mod service;
mod session;
mod ss;
#[cfg(all(test, unix, feature = "rt-async-io"))]
mod test_service;

pub use collection::Collection;
pub use config::Config;
pub use credential::Credential;
pub use error::{Error, Result};
pub use item::Item;
pub use keyring::Keyring;
pub use prompt::{PromptAction, PromptOutcome, PromptResult, PromptState};
pub use secret::Secret;
pub use service::SecretService;
pub use session::{EncryptionType, Session};

use std::collections::HashMap;

/// Stores `password` for `user` on `service`, replacing any previous one.
pub fn set(service: &str, user: &str, password: &str) -> Result<()> {
    Keyring::connect(Config::from_env()?)?.set(service, user, password)
}

/// The password stored for `user` on `service`, or [`Error::NotFound`].
pub fn get(service: &str, user: &str) -> Result<String> {
    Keyring::connect(Config::from_env()?)?.get(service, user)
}

/// Deletes the password stored for `user` on `service`, or [`Error::NotFound`].
pub fn delete(service: &str, user: &str) -> Result<()> {
    Keyring::connect(Config::from_env()?)?.delete(service, user)
}

/// All stored credentials with their passwords.
pub fn list() -> Result<HashMap<Credential, String>> {
    Keyring::connect(Config::from_env()?)?.list()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test_with::env(DBUS_SESSION_BUS_ADDRESS)]
    #[test]
    fn should_set_get_and_delete() {
        const SERVICE: &str = "testservice";
        const USER: &str = "testuser";
        const PASS: &str = "testpass";

        set(SERVICE, USER, PASS).unwrap();
        assert_eq!(get(SERVICE, USER).unwrap(), PASS);
        delete(SERVICE, USER).unwrap();

        assert!(matches!(get(SERVICE, USER), Err(Error::NotFound)));
    }

    #[test_with::env(DBUS_SESSION_BUS_ADDRESS)]
    #[test]
    fn should_list_through_free_function() {
        set("gkeyring-free-list", "testuser", "testpass").unwrap();
        let credentials = list().unwrap();
        delete("gkeyring-free-list", "testuser").unwrap();

        assert_eq!(
            credentials
                .get(&Credential::new("gkeyring-free-list", "testuser"))
                .map(String::as_str),
            Some("testpass")
        );
    }
}
