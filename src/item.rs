//Copyright 2026 gkeyring Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::error::Error;
use crate::prompt::PromptAction;
use crate::proxy::item::ItemProxyBlocking;
use crate::service::SecretService;
use crate::session::Session;
use crate::ss::SS_DBUS_NAME;

use std::collections::HashMap;
use zbus::proxy::CacheProperties;
use zbus::zvariant::OwnedObjectPath;

pub struct Item<'a> {
    service: &'a SecretService,
    pub item_path: OwnedObjectPath,
    item_proxy: ItemProxyBlocking<'a>,
}

impl<'a> Item<'a> {
    pub(crate) fn new(service: &'a SecretService, item_path: OwnedObjectPath) -> Result<Self, Error> {
        let item_proxy = ItemProxyBlocking::builder(service.conn())
            .destination(SS_DBUS_NAME)?
            .path(item_path.clone())?
            .cache_properties(CacheProperties::No)
            .build()?;
        Ok(Item {
            service,
            item_path,
            item_proxy,
        })
    }

    pub fn get_attributes(&self) -> Result<HashMap<String, String>, Error> {
        Ok(self.item_proxy.attributes()?)
    }

    pub fn get_label(&self) -> Result<String, Error> {
        Ok(self.item_proxy.label()?)
    }

    /// Fetches the secret through `session` and decodes it.
    pub fn get_secret(&self, session: &Session) -> Result<Vec<u8>, Error> {
        let secret = self.item_proxy.get_secret(&session.object_path)?;
        tracing::debug!(item = %self.item_path.as_str(), "fetched secret");
        session.decode_secret(secret)
    }

    /// Deletes dbus object, but struct instance still exists.
    pub fn delete(&self) -> Result<(), Error> {
        let prompt_path = self.item_proxy.delete()?;
        tracing::debug!(item = %self.item_path.as_str(), "deleted item");

        self.service.exec_prompt(&prompt_path, PromptAction::Delete)?;
        Ok(())
    }
}
