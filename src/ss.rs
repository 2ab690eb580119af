//Copyright 2026 gkeyring Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

// Definitions for secret service interactions

// DBus Name
pub const SS_DBUS_NAME: &str = "org.freedesktop.secrets";

// DBus Object paths
pub const SS_COLLECTION_BASE_PATH: &str = "/org/freedesktop/secrets/collection/";

// "/" is returned wherever a prompt or object is not needed
pub const SS_NO_PROMPT: &str = "/";

// Item Properties
pub const SS_ITEM_LABEL: &str = "org.freedesktop.Secret.Item.Label";
pub const SS_ITEM_ATTRIBUTES: &str = "org.freedesktop.Secret.Item.Attributes";

// Collection properties
pub const SS_COLLECTION_LABEL: &str = "org.freedesktop.Secret.Collection.Label";

// Algorithm Names
pub const ALGORITHM_PLAIN: &str = "plain";
#[cfg(feature = "crypto-rust")]
pub const ALGORITHM_DH: &str = "dh-ietf1024-sha256-aes128-cbc-pkcs7";

// Client defaults
pub const DEFAULT_COLLECTION: &str = "login";
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain; charset=utf8";

// Attribute keys used to find credentials
pub const ATTR_USERNAME: &str = "username";
pub const ATTR_SERVICE: &str = "service";
