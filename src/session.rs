//Copyright 2026 gkeyring Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Secret transfer sessions.
//!
//! A session is opened right before a secret is sent or fetched and closed as
//! soon as that operation is over. Dropping a [`Session`] that was not closed
//! explicitly closes it on a best-effort basis.

#[cfg(feature = "crypto-rust")]
use crate::crypto::{self, AesKey, Keypair};
use crate::error::Error;
use crate::proxy::service::ServiceProxyBlocking;
use crate::proxy::session::SessionProxyBlocking;
use crate::secret::Secret;
#[cfg(feature = "crypto-rust")]
use crate::ss::ALGORITHM_DH;
use crate::ss::{ALGORITHM_PLAIN, SS_DBUS_NAME};

use zbus::proxy::CacheProperties;
use zbus::zvariant::OwnedObjectPath;

/// Algorithm negotiated with `OpenSession`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EncryptionType {
    /// Secrets cross the bus as-is.
    Plain,
    /// Diffie-Hellman key exchange, then AES-128-CBC per secret.
    #[cfg(feature = "crypto-rust")]
    Dh,
}

pub struct Session {
    pub object_path: OwnedObjectPath,
    #[cfg(feature = "crypto-rust")]
    aes_key: Option<AesKey>,
    session_proxy: SessionProxyBlocking<'static>,
    closed: bool,
}

impl Session {
    pub(crate) fn open(
        conn: &zbus::blocking::Connection,
        service_proxy: &ServiceProxyBlocking<'_>,
        encryption: EncryptionType,
    ) -> Result<Self, Error> {
        match encryption {
            EncryptionType::Plain => {
                let session = service_proxy.open_session(ALGORITHM_PLAIN, "".into())?;
                Self::new(conn, session.result)
            }
            #[cfg(feature = "crypto-rust")]
            EncryptionType::Dh => {
                let keypair = Keypair::generate()?;
                let session =
                    service_proxy.open_session(ALGORITHM_DH, keypair.public_bytes().into())?;

                let server_public: Vec<u8> = session
                    .output
                    .try_into()
                    .map_err(|_| Error::Crypto("server public key is not a byte array"))?;
                let aes_key = keypair.derive_key(&server_public)?;

                let mut session = Self::new(conn, session.result)?;
                session.aes_key = Some(aes_key);
                Ok(session)
            }
        }
    }

    fn new(conn: &zbus::blocking::Connection, object_path: OwnedObjectPath) -> Result<Self, Error> {
        let session_proxy = SessionProxyBlocking::builder(conn)
            .destination(SS_DBUS_NAME)?
            .path(object_path.clone())?
            .cache_properties(CacheProperties::No)
            .build()?;

        tracing::debug!(session = %object_path.as_str(), "opened session");

        Ok(Session {
            object_path,
            #[cfg(feature = "crypto-rust")]
            aes_key: None,
            session_proxy,
            closed: false,
        })
    }

    pub fn is_encrypted(&self) -> bool {
        #[cfg(feature = "crypto-rust")]
        return self.aes_key.is_some();
        #[cfg(not(feature = "crypto-rust"))]
        false
    }

    /// Wraps `value` for transmission over this session.
    pub fn format_secret(&self, value: &[u8], content_type: &str) -> Result<Secret, Error> {
        #[cfg(feature = "crypto-rust")]
        if let Some(aes_key) = &self.aes_key {
            let iv = crypto::random_iv()?;
            return Ok(Secret {
                session: self.object_path.clone(),
                parameters: iv.to_vec(),
                value: crypto::encrypt(value, aes_key, &iv),
                content_type: content_type.to_owned(),
            });
        }

        Ok(Secret::plain(self.object_path.clone(), value, content_type))
    }

    /// Recovers the raw bytes of a secret fetched through this session.
    pub fn decode_secret(&self, secret: Secret) -> Result<Vec<u8>, Error> {
        #[cfg(feature = "crypto-rust")]
        if let Some(aes_key) = &self.aes_key {
            return crypto::decrypt(&secret.value, aes_key, &secret.parameters);
        }

        Ok(secret.value)
    }

    /// Closes the session on the service side.
    pub fn close(mut self) -> Result<(), Error> {
        self.closed = true;
        self.session_proxy.close()?;
        tracing::debug!(session = %self.object_path.as_str(), "closed session");
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(err) = self.session_proxy.close() {
            tracing::debug!(
                session = %self.object_path.as_str(),
                error = %err,
                "ignoring failure to close session"
            );
        }
    }
}
