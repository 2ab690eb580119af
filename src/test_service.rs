//Copyright 2026 gkeyring Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! A scripted secret service served over a private peer to peer connection.
//!
//! `Unlock` always answers with a prompt; the prompt then behaves as
//! described by a [`PromptReply`]. No session bus or desktop keyring is
//! involved, so these tests run anywhere.

use crate::config::Config;
use crate::service::SecretService;

use std::os::unix::net::UnixStream;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use zbus::blocking::connection::Builder;
use zbus::object_server::SignalEmitter;
use zbus::zvariant::{ObjectPath, OwnedObjectPath, Value};

pub const LOGIN_PATH: &str = "/org/freedesktop/secrets/collection/login";
pub const OTHER_PATH: &str = "/org/freedesktop/secrets/collection/other";
pub const PROMPT_PATH: &str = "/org/freedesktop/secrets/prompt/p1";
const STRAY_PROMPT_PATH: &str = "/org/freedesktop/secrets/prompt/other";
const SERVICE_PATH: &str = "/org/freedesktop/secrets";

/// What the served prompt does once `Prompt` is called.
pub enum PromptReply {
    /// `Completed(false, [paths])`
    Unlocked(Vec<&'static str>),
    /// `Completed(true, "")`
    Dismissed,
    /// A dismissal from another prompt object, then `Completed(false, [paths])`.
    StrayDismissalThenUnlocked(Vec<&'static str>),
    /// Nothing until `Dismiss` is called.
    Silent,
}

struct ScriptedService {
    prompt: OwnedObjectPath,
}

#[zbus::interface(name = "org.freedesktop.Secret.Service")]
impl ScriptedService {
    fn unlock(&self, _objects: Vec<OwnedObjectPath>) -> (Vec<OwnedObjectPath>, OwnedObjectPath) {
        (Vec::new(), self.prompt.clone())
    }
}

struct ScriptedPrompt {
    reply: PromptReply,
    dismissals: Arc<AtomicUsize>,
}

fn unlocked(paths: &[&'static str]) -> Value<'static> {
    let paths: Vec<ObjectPath<'static>> = paths
        .iter()
        .copied()
        .map(ObjectPath::from_static_str_unchecked)
        .collect();
    Value::from(paths)
}

fn signal_failed(err: zbus::Error) -> zbus::fdo::Error {
    zbus::fdo::Error::Failed(format!("signal: {err}"))
}

#[zbus::interface(name = "org.freedesktop.Secret.Prompt")]
impl ScriptedPrompt {
    async fn prompt(
        &self,
        _window_id: &str,
        #[zbus(signal_emitter)] emitter: SignalEmitter<'_>,
    ) -> zbus::fdo::Result<()> {
        match &self.reply {
            PromptReply::Unlocked(paths) => Self::completed(&emitter, false, &unlocked(paths))
                .await
                .map_err(signal_failed)?,
            PromptReply::Dismissed => Self::completed(&emitter, true, &Value::from(""))
                .await
                .map_err(signal_failed)?,
            PromptReply::StrayDismissalThenUnlocked(paths) => {
                let stray = SignalEmitter::new(emitter.connection(), STRAY_PROMPT_PATH)
                    .map_err(signal_failed)?;
                Self::completed(&stray, true, &Value::from(""))
                    .await
                    .map_err(signal_failed)?;
                Self::completed(&emitter, false, &unlocked(paths))
                    .await
                    .map_err(signal_failed)?;
            }
            PromptReply::Silent => {}
        }

        Ok(())
    }

    async fn dismiss(
        &self,
        #[zbus(signal_emitter)] emitter: SignalEmitter<'_>,
    ) -> zbus::fdo::Result<()> {
        self.dismissals.fetch_add(1, Ordering::SeqCst);
        Self::completed(&emitter, true, &Value::from(""))
            .await
            .map_err(signal_failed)
    }

    #[zbus(signal)]
    async fn completed(
        emitter: &SignalEmitter<'_>,
        dismissed: bool,
        result: &Value<'_>,
    ) -> zbus::Result<()>;
}

pub struct TestService {
    pub service: SecretService,
    dismissals: Arc<AtomicUsize>,
    _server: zbus::blocking::Connection,
}

impl TestService {
    /// How many times the client dismissed the prompt.
    pub fn dismissals(&self) -> usize {
        self.dismissals.load(Ordering::SeqCst)
    }
}

pub fn serve(reply: PromptReply, config: Config) -> TestService {
    let (server_socket, client_socket) = UnixStream::pair().unwrap();
    let dismissals = Arc::new(AtomicUsize::new(0));

    let service = ScriptedService {
        prompt: OwnedObjectPath::try_from(PROMPT_PATH).unwrap(),
    };
    let prompt = ScriptedPrompt {
        reply,
        dismissals: dismissals.clone(),
    };

    // both ends have to run the handshake at the same time
    let server = thread::spawn(move || {
        Builder::async_io_unix_stream(server_socket)
            .server(zbus::Guid::generate())?
            .p2p()
            .serve_at(SERVICE_PATH, service)?
            .serve_at(PROMPT_PATH, prompt)?
            .build()
    });
    let client = Builder::async_io_unix_stream(client_socket)
        .p2p()
        .build()
        .unwrap();
    let server = server.join().unwrap().unwrap();

    TestService {
        service: SecretService::connect_with(client, config).unwrap(),
        dismissals,
        _server: server,
    }
}
