//Copyright 2026 gkeyring Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::error::Error;
use crate::prompt::PromptAction;
use crate::proxy::collection::CollectionProxyBlocking;
use crate::secret::Secret;
use crate::service::SecretService;
use crate::ss::{SS_DBUS_NAME, SS_ITEM_ATTRIBUTES, SS_ITEM_LABEL};

use std::collections::HashMap;
use zbus::{
    proxy::CacheProperties,
    zvariant::{Dict, ObjectPath, OwnedObjectPath, Value},
};

// Collection struct.
// A handle into the service's state; nothing about the collection is
// cached locally, and creating one makes no remote call.
pub struct Collection<'a> {
    service: &'a SecretService,
    pub collection_path: OwnedObjectPath,
}

impl<'a> Collection<'a> {
    pub(crate) fn new(service: &'a SecretService, collection_path: OwnedObjectPath) -> Self {
        Collection {
            service,
            collection_path,
        }
    }

    pub fn path(&self) -> &ObjectPath<'static> {
        &self.collection_path
    }

    fn proxy(&self) -> Result<CollectionProxyBlocking<'static>, Error> {
        Ok(CollectionProxyBlocking::builder(self.service.conn())
            .destination(SS_DBUS_NAME)?
            .path(self.collection_path.clone())?
            .cache_properties(CacheProperties::No)
            .build()?)
    }

    pub fn unlock(&self) -> Result<(), Error> {
        self.service.unlock(self.path())
    }

    /// Paths of the items whose attributes match all of `attributes`.
    pub fn search_items(
        &self,
        attributes: HashMap<&str, &str>,
    ) -> Result<Vec<OwnedObjectPath>, Error> {
        let items = self.proxy()?.search_items(attributes)?;
        tracing::debug!(
            collection = %self.collection_path.as_str(),
            matches = items.len(),
            "searched items"
        );
        Ok(items)
    }

    /// Stores `secret` under `label` and `attributes`.
    ///
    /// With `replace` set, an existing item with identical attributes is
    /// overwritten instead of duplicated.
    pub fn create_item(
        &self,
        label: &str,
        attributes: HashMap<&str, &str>,
        secret: Secret,
        replace: bool,
    ) -> Result<(), Error> {
        let mut properties: HashMap<&str, Value> = HashMap::new();
        let attributes: Dict = attributes.into();

        properties.insert(SS_ITEM_LABEL, label.into());
        properties.insert(SS_ITEM_ATTRIBUTES, attributes.into());

        let created = self.proxy()?.create_item(properties, secret, replace)?;
        tracing::debug!(
            collection = %self.collection_path.as_str(),
            item = %created.item.as_str(),
            "created item"
        );

        // only the completion matters, the result is not used
        self.service
            .exec_prompt(&created.prompt, PromptAction::CreateItem)?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::*;
    use std::collections::HashMap;

    #[test_with::env(DBUS_SESSION_BUS_ADDRESS)]
    #[test]
    fn should_create_and_search_items() {
        let ss = SecretService::connect(Config::default()).unwrap();
        let collection = ss.get_configured_collection();
        collection.unlock().unwrap();

        let session = ss.open_session().unwrap();
        let secret = session.format_secret(b"test_secret", "text/plain").unwrap();
        collection
            .create_item(
                "test",
                HashMap::from([("test_attributes_in_collection", "test")]),
                secret,
                true,
            )
            .unwrap();

        // handle no result
        let bad_search = collection
            .search_items(HashMap::from([("test_bad", "test")]))
            .unwrap();
        assert_eq!(bad_search.len(), 0);

        let found = collection
            .search_items(HashMap::from([("test_attributes_in_collection", "test")]))
            .unwrap();
        assert_eq!(found.len(), 1);

        let item = ss.get_item(found[0].clone()).unwrap();
        assert_eq!(item.get_secret(&session).unwrap(), b"test_secret");
        item.delete().unwrap();
    }
}
