//Copyright 2026 gkeyring Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The blocking secret service client.
//!
//! Every method blocks the calling thread until the service answers, and
//! until the user has answered any prompt the service raised. Do not call
//! these from inside an async runtime. See [zbus's blocking documentation].
//!
//! [zbus's blocking documentation]: https://docs.rs/zbus/latest/zbus/blocking/index.html

use crate::collection::Collection;
use crate::config::Config;
use crate::credential::credential_attributes;
use crate::error::Error;
use crate::item::Item;
use crate::prompt::{exec_prompt, PromptAction, PromptResult};
use crate::proxy::service::ServiceProxyBlocking;
use crate::session::Session;
use crate::ss::{SS_COLLECTION_BASE_PATH, SS_COLLECTION_LABEL};

use std::collections::HashMap;
use std::fmt::Write;
use zbus::zvariant::{ObjectPath, OwnedObjectPath, Value};

/// Secret Service Struct.
///
/// Holds one bus connection and a proxy to the service object. Sessions,
/// collections and items borrow from it.
pub struct SecretService {
    conn: zbus::blocking::Connection,
    service_proxy: ServiceProxyBlocking<'static>,
    config: Config,
}

impl SecretService {
    /// Connects to the session bus.
    pub fn connect(config: Config) -> Result<Self, Error> {
        let conn = zbus::blocking::Connection::session().map_err(Error::Connection)?;
        Self::connect_with(conn, config)
    }

    /// Uses an already established bus connection.
    pub fn connect_with(conn: zbus::blocking::Connection, config: Config) -> Result<Self, Error> {
        let service_proxy = ServiceProxyBlocking::new(&conn).map_err(Error::Connection)?;

        Ok(SecretService {
            conn,
            service_proxy,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn conn(&self) -> &zbus::blocking::Connection {
        &self.conn
    }

    pub(crate) fn exec_prompt(
        &self,
        prompt: &ObjectPath<'_>,
        action: PromptAction,
    ) -> Result<PromptResult, Error> {
        exec_prompt(&self.conn, prompt, action, &self.config)?.accepted()
    }

    /// Opens a session using the configured algorithm.
    pub fn open_session(&self) -> Result<Session, Error> {
        Session::open(&self.conn, &self.service_proxy, self.config.encryption)
    }

    /// Collection handle for `name`. Only builds the object path.
    pub fn get_collection(&self, name: &str) -> Collection<'_> {
        Collection::new(self, collection_path(name))
    }

    /// The collection named in the configuration (`login` by default).
    pub fn get_configured_collection(&self) -> Collection<'_> {
        self.get_collection(&self.config.collection)
    }

    /// Unlocks a collection, going through a prompt if the service asks for one.
    ///
    /// Succeeds only when exactly the requested collection ends up unlocked.
    /// Unlocking an already unlocked collection is a no-op.
    pub fn unlock(&self, collection: &ObjectPath<'_>) -> Result<(), Error> {
        tracing::debug!(collection = %collection.as_str(), "unlocking collection");
        let mut result = self.service_proxy.unlock(vec![collection])?;

        if let PromptResult::Unlocked(paths) =
            self.exec_prompt(&result.prompt, PromptAction::Unlock)?
        {
            result.unlocked.extend(paths);
        }

        verify_unlocked(collection, &result.unlocked)
    }

    /// Creates a new collection with a label and no alias.
    pub fn create_collection(&self, label: &str) -> Result<Collection<'_>, Error> {
        let mut properties: HashMap<&str, Value> = HashMap::new();
        properties.insert(SS_COLLECTION_LABEL, label.into());

        let created = self.service_proxy.create_collection(properties, "")?;
        tracing::debug!(
            collection = %created.collection.as_str(),
            prompt = %created.prompt.as_str(),
            "created collection"
        );

        // the path returned with a prompt may be a placeholder
        let collection_path =
            match self.exec_prompt(&created.prompt, PromptAction::CreateCollection)? {
                PromptResult::Collection(Some(path)) => path,
                _ => created.collection,
            };

        Ok(Collection::new(self, collection_path))
    }

    /// Handle for an item path returned by a search.
    pub fn get_item(&self, item_path: OwnedObjectPath) -> Result<Item<'_>, Error> {
        Item::new(self, item_path)
    }

    /// Looks up the item stored for `service` and `user` in the configured collection.
    ///
    /// When the service reports several matches the first one wins.
    pub fn find_item(&self, service: &str, user: &str) -> Result<Item<'_>, Error> {
        let collection = self.get_configured_collection();
        self.unlock(collection.path())?;

        let results = collection.search_items(credential_attributes(service, user))?;
        let item_path = results.into_iter().next().ok_or(Error::NotFound)?;

        self.get_item(item_path)
    }
}

fn verify_unlocked(requested: &ObjectPath<'_>, unlocked: &[OwnedObjectPath]) -> Result<(), Error> {
    match unlocked {
        [only] if only.as_str() == requested.as_str() => Ok(()),
        _ => Err(Error::UnlockMismatch(requested.to_owned().into())),
    }
}

// Object path elements only allow [A-Za-z0-9_]; anything else, `_` included,
// is escaped as `_xx`. Building a collection path never fails and distinct
// names never share a path. A bare `_` stands for the empty name.
fn collection_path(name: &str) -> OwnedObjectPath {
    let mut path = String::from(SS_COLLECTION_BASE_PATH);

    if name.is_empty() {
        path.push('_');
    }
    for byte in name.bytes() {
        if byte.is_ascii_alphanumeric() {
            path.push(byte as char);
        } else {
            let _ = write!(path, "_{byte:02x}");
        }
    }

    OwnedObjectPath::from(ObjectPath::from_string_unchecked(path))
}
