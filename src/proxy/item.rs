//Copyright 2026 gkeyring Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! A dbus proxy for speaking with secret service's `Item` Interface.

use std::collections::HashMap;
use zbus::zvariant::{ObjectPath, OwnedObjectPath};

use crate::secret::Secret;

/// A dbus proxy for speaking with secret service's `Item` Interface.
///
/// This will derive ItemProxyBlocking
#[zbus::proxy(
    interface = "org.freedesktop.Secret.Item",
    default_service = "org.freedesktop.secrets",
    gen_async = false,
    blocking_name = "ItemProxyBlocking"
)]
pub trait Item {
    /// Returns prompt: ObjectPath
    fn delete(&self) -> zbus::Result<OwnedObjectPath>;

    fn get_secret(&self, session: &ObjectPath<'_>) -> zbus::Result<Secret>;

    #[zbus(property)]
    fn attributes(&self) -> zbus::fdo::Result<HashMap<String, String>>;

    #[zbus(property)]
    fn label(&self) -> zbus::fdo::Result<String>;
}
