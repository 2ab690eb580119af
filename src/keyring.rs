//Copyright 2026 gkeyring Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Password storage keyed by service and user.

use crate::config::Config;
use crate::credential::{credential_attributes, credential_label, Credential};
use crate::error::Error;
use crate::service::SecretService;

use std::collections::HashMap;

/// A connected keyring client.
///
/// Build it once and reuse it: every call shares the same bus connection,
/// while sessions are still opened per call and closed when the call returns.
pub struct Keyring {
    service: SecretService,
}

impl Keyring {
    pub fn connect(config: Config) -> Result<Self, Error> {
        Ok(Keyring::new(SecretService::connect(config)?))
    }

    pub fn new(service: SecretService) -> Self {
        Keyring { service }
    }

    pub fn service(&self) -> &SecretService {
        &self.service
    }

    /// Stores `password` for `user` on `service`, replacing any previous one.
    pub fn set(&self, service: &str, user: &str, password: &str) -> Result<(), Error> {
        self.set_bytes(service, user, password.as_bytes())
    }

    pub fn set_bytes(&self, service: &str, user: &str, secret: &[u8]) -> Result<(), Error> {
        let session = self.service.open_session()?;
        let secret = session.format_secret(secret, &self.service.config().content_type)?;

        let collection = self.service.get_configured_collection();
        collection.unlock()?;

        collection.create_item(
            &credential_label(service, user),
            credential_attributes(service, user),
            secret,
            true,
        )?;
        tracing::debug!(service, user, "stored credential");

        Ok(())
    }

    /// The password stored for `user` on `service`.
    pub fn get(&self, service: &str, user: &str) -> Result<String, Error> {
        Ok(String::from_utf8(self.get_bytes(service, user)?)?)
    }

    pub fn get_bytes(&self, service: &str, user: &str) -> Result<Vec<u8>, Error> {
        let item = self.service.find_item(service, user)?;

        let session = self.service.open_session()?;
        item.get_secret(&session)
    }

    /// Removes the password stored for `user` on `service`.
    pub fn delete(&self, service: &str, user: &str) -> Result<(), Error> {
        let item = self.service.find_item(service, user)?;
        item.delete()?;
        tracing::debug!(service, user, "deleted credential");

        Ok(())
    }

    /// Every credential in the collection together with its password.
    ///
    /// Items lacking a `service` or `username` attribute were not stored
    /// through this API and are skipped, as are secrets that are not utf-8.
    pub fn list(&self) -> Result<HashMap<Credential, String>, Error> {
        let collection = self.service.get_configured_collection();
        collection.unlock()?;

        let item_paths = collection.search_items(HashMap::new())?;
        let session = self.service.open_session()?;

        let mut credentials = HashMap::new();
        for item_path in item_paths {
            let item = self.service.get_item(item_path)?;
            let Some(credential) = Credential::from_attributes(&item.get_attributes()?) else {
                continue;
            };

            match String::from_utf8(item.get_secret(&session)?) {
                Ok(password) => {
                    credentials.insert(credential, password);
                }
                Err(_) => tracing::warn!(
                    item = %item.item_path.as_str(),
                    "skipping credential whose secret is not text"
                ),
            }
        }

        Ok(credentials)
    }
}
