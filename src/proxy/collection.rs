//Copyright 2026 gkeyring Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! A dbus proxy for speaking with secret service's `Collection` Interface.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use zbus::zvariant::{OwnedObjectPath, Type, Value};

use crate::secret::Secret;

/// A dbus proxy for speaking with secret service's `Collection` Interface.
///
/// This will derive CollectionProxyBlocking
#[zbus::proxy(
    interface = "org.freedesktop.Secret.Collection",
    default_service = "org.freedesktop.secrets",
    gen_async = false,
    blocking_name = "CollectionProxyBlocking"
)]
pub trait Collection {
    fn search_items(&self, attributes: HashMap<&str, &str>)
        -> zbus::Result<Vec<OwnedObjectPath>>;

    fn create_item(
        &self,
        properties: HashMap<&str, Value<'_>>,
        secret: Secret,
        replace: bool,
    ) -> zbus::Result<CreateItemResult>;
}

#[derive(Debug, Serialize, Deserialize, Type)]
pub struct CreateItemResult {
    pub(crate) item: OwnedObjectPath,
    pub(crate) prompt: OwnedObjectPath,
}
