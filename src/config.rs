//Copyright 2026 gkeyring Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Client configuration.
//!
//! Every field has a default that reproduces the stock behavior: items live in
//! the `login` collection, secrets are sent unencrypted as utf-8 text, and a
//! prompt is waited on for as long as it takes. [`Config::from_env`] lets the
//! environment override any of them.

use crate::error::Error;
use crate::session::EncryptionType;
use crate::ss::{DEFAULT_COLLECTION, DEFAULT_CONTENT_TYPE};
use std::time::Duration;

pub const ENV_COLLECTION: &str = "GKEYRING_COLLECTION";
pub const ENV_CONTENT_TYPE: &str = "GKEYRING_CONTENT_TYPE";
pub const ENV_WINDOW_ID: &str = "GKEYRING_WINDOW_ID";
pub const ENV_PROMPT_TIMEOUT: &str = "GKEYRING_PROMPT_TIMEOUT";
pub const ENV_ENCRYPTION: &str = "GKEYRING_ENCRYPTION";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Name of the collection credentials are stored in.
    pub collection: String,
    /// Content type attached to stored secrets.
    pub content_type: String,
    /// Window handle passed to `Prompt` so the dialog can be parented.
    pub window_id: String,
    /// How long to wait for a prompt to complete. `None` waits forever.
    ///
    /// An expired prompt is dismissed and its waiter thread ends with the
    /// `Completed` signal that follows. A service that never answers
    /// `Dismiss` keeps that thread and its signal match alive until the
    /// process exits, one per expired prompt.
    pub prompt_timeout: Option<Duration>,
    /// Algorithm negotiated for every session.
    pub encryption: EncryptionType,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            collection: DEFAULT_COLLECTION.to_owned(),
            content_type: DEFAULT_CONTENT_TYPE.to_owned(),
            window_id: String::new(),
            prompt_timeout: None,
            encryption: EncryptionType::Plain,
        }
    }
}

impl Config {
    /// Defaults, overridden by any `GKEYRING_*` variables that are set.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut config = Config::default();

        if let Some(collection) = lookup(ENV_COLLECTION) {
            config.collection = collection;
        }
        if let Some(content_type) = lookup(ENV_CONTENT_TYPE) {
            config.content_type = content_type;
        }
        if let Some(window_id) = lookup(ENV_WINDOW_ID) {
            config.window_id = window_id;
        }
        if let Some(timeout) = lookup(ENV_PROMPT_TIMEOUT) {
            config.prompt_timeout = parse_timeout(&timeout)?;
        }
        if let Some(encryption) = lookup(ENV_ENCRYPTION) {
            config.encryption = parse_encryption(&encryption)?;
        }

        Ok(config)
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_window_id(mut self, window_id: impl Into<String>) -> Self {
        self.window_id = window_id.into();
        self
    }

    pub fn with_prompt_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.prompt_timeout = timeout;
        self
    }

    pub fn with_encryption(mut self, encryption: EncryptionType) -> Self {
        self.encryption = encryption;
        self
    }
}

// Whole seconds; 0 disables the deadline.
fn parse_timeout(value: &str) -> Result<Option<Duration>, Error> {
    let secs: u64 = value.trim().parse().map_err(|err| Error::Config {
        var: ENV_PROMPT_TIMEOUT,
        reason: format!("{value:?} is not a number of seconds ({err})"),
    })?;

    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}

fn parse_encryption(value: &str) -> Result<EncryptionType, Error> {
    match value.trim().to_ascii_lowercase().as_str() {
        "plain" => Ok(EncryptionType::Plain),
        #[cfg(feature = "crypto-rust")]
        "dh" => Ok(EncryptionType::Dh),
        other => Err(Error::Config {
            var: ENV_ENCRYPTION,
            reason: format!("unsupported algorithm {other:?}"),
        }),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn should_default_to_login_collection() {
        let config = Config::default();
        assert_eq!(config.collection, "login");
        assert_eq!(config.content_type, "text/plain; charset=utf8");
        assert_eq!(config.window_id, "");
        assert_eq!(config.prompt_timeout, None);
        assert_eq!(config.encryption, EncryptionType::Plain);
    }

    #[test]
    fn should_keep_defaults_without_overrides() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn should_apply_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_COLLECTION, "session"),
            (ENV_WINDOW_ID, "x11:42"),
            (ENV_PROMPT_TIMEOUT, " 30 "),
            (ENV_ENCRYPTION, "PLAIN"),
        ]))
        .unwrap();
        assert_eq!(config.collection, "session");
        assert_eq!(config.window_id, "x11:42");
        assert_eq!(config.prompt_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.encryption, EncryptionType::Plain);
    }

    #[test]
    fn should_treat_zero_timeout_as_no_deadline() {
        assert_eq!(parse_timeout("0").unwrap(), None);
    }

    #[test]
    fn should_reject_bad_timeout() {
        match Config::from_lookup(lookup_from(&[(ENV_PROMPT_TIMEOUT, "soon")])) {
            Err(Error::Config { var, .. }) => assert_eq!(var, ENV_PROMPT_TIMEOUT),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn should_reject_unknown_algorithm() {
        match parse_encryption("rot13") {
            Err(Error::Config { var, .. }) => assert_eq!(var, ENV_ENCRYPTION),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[cfg(feature = "crypto-rust")]
    #[test]
    fn should_parse_dh() {
        assert_eq!(parse_encryption("dh").unwrap(), EncryptionType::Dh);
    }

    #[test]
    fn should_chain_builders() {
        let config = Config::default()
            .with_collection("work")
            .with_content_type("application/octet-stream")
            .with_window_id("wayland:abc")
            .with_prompt_timeout(Some(Duration::from_secs(5)));
        assert_eq!(config.collection, "work");
        assert_eq!(config.content_type, "application/octet-stream");
        assert_eq!(config.window_id, "wayland:abc");
        assert_eq!(config.prompt_timeout, Some(Duration::from_secs(5)));
    }
}
