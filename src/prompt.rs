//Copyright 2026 gkeyring Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Handling of `org.freedesktop.Secret.Prompt` objects.
//!
//! Privileged calls (unlock, create collection, create item, delete) return a
//! prompt path next to their result. `/` means nothing has to be confirmed.
//! Any other path has to be triggered with `Prompt`, after which the service
//! emits exactly one `Completed(dismissed, result)` signal from that path.
//!
//! The shape of `result` depends on the call that produced the prompt, so the
//! caller names it with a [`PromptAction`] and gets a typed [`PromptResult`].

use crate::config::Config;
use crate::error::Error;
use crate::proxy::prompt::{CompletedIterator, PromptProxyBlocking};
use crate::ss::{SS_DBUS_NAME, SS_NO_PROMPT};

use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use zbus::zvariant::{ObjectPath, OwnedObjectPath, Value};
use zbus::proxy::CacheProperties;

/// The call a prompt was returned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    Unlock,
    CreateCollection,
    CreateItem,
    Delete,
}

/// Decoded `result` of a `Completed` signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResult {
    /// Objects unlocked by the prompt.
    Unlocked(Vec<OwnedObjectPath>),
    /// Path of the collection that was created, when the service reported one.
    Collection(Option<OwnedObjectPath>),
    /// The result carries nothing the caller needs.
    Discarded,
}

impl PromptAction {
    pub fn decode(self, result: &Value<'_>) -> PromptResult {
        match self {
            PromptAction::Unlock => PromptResult::Unlocked(object_paths(result)),
            PromptAction::CreateCollection => PromptResult::Collection(object_path(result)),
            PromptAction::CreateItem | PromptAction::Delete => PromptResult::Discarded,
        }
    }

    /// What a prompt-less call leaves behind.
    fn empty(self) -> PromptResult {
        match self {
            PromptAction::Unlock => PromptResult::Unlocked(Vec::new()),
            PromptAction::CreateCollection => PromptResult::Collection(None),
            PromptAction::CreateItem | PromptAction::Delete => PromptResult::Discarded,
        }
    }
}

fn object_paths(value: &Value<'_>) -> Vec<OwnedObjectPath> {
    match value {
        Value::Array(array) => array
            .iter()
            .filter_map(|element| match element {
                Value::ObjectPath(path) => Some(OwnedObjectPath::from(path.clone())),
                _ => None,
            })
            .collect(),
        Value::Value(inner) => object_paths(inner),
        _ => Vec::new(),
    }
}

fn object_path(value: &Value<'_>) -> Option<OwnedObjectPath> {
    let path = match value {
        Value::ObjectPath(path) => OwnedObjectPath::from(path.clone()),
        Value::Str(s) => OwnedObjectPath::try_from(s.as_str()).ok()?,
        Value::Value(inner) => return object_path(inner),
        _ => return None,
    };

    (path.as_str() != SS_NO_PROMPT).then_some(path)
}

/// Whether a returned prompt path requires any interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptState<'p> {
    NoPromptNeeded,
    AwaitingCompletion(&'p ObjectPath<'p>),
}

impl<'p> PromptState<'p> {
    pub fn of(prompt: &'p ObjectPath<'p>) -> Self {
        if prompt.as_str() == SS_NO_PROMPT {
            PromptState::NoPromptNeeded
        } else {
            PromptState::AwaitingCompletion(prompt)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptOutcome {
    pub dismissed: bool,
    pub result: PromptResult,
}

impl PromptOutcome {
    /// Turns a dismissal into [`Error::Dismissed`].
    pub fn accepted(self) -> Result<PromptResult, Error> {
        if self.dismissed {
            Err(Error::Dismissed)
        } else {
            Ok(self.result)
        }
    }
}

/// Runs `prompt` if one is needed and blocks until it completes.
pub(crate) fn exec_prompt(
    conn: &zbus::blocking::Connection,
    prompt: &ObjectPath<'_>,
    action: PromptAction,
    config: &Config,
) -> Result<PromptOutcome, Error> {
    let prompt = match PromptState::of(prompt) {
        PromptState::NoPromptNeeded => {
            return Ok(PromptOutcome {
                dismissed: false,
                result: action.empty(),
            })
        }
        PromptState::AwaitingCompletion(prompt) => prompt,
    };

    let prompt_proxy = PromptProxyBlocking::builder(conn)
        .destination(SS_DBUS_NAME)?
        .path(prompt.to_owned())?
        .cache_properties(CacheProperties::No)
        .build()?;

    // Subscribe before triggering; the match rule is scoped to this prompt's path.
    let completed = prompt_proxy.receive_completed()?;

    prompt_proxy.prompt(&config.window_id)?;
    tracing::debug!(prompt = %prompt.as_str(), ?action, "prompt triggered");

    let outcome = match config.prompt_timeout {
        None => wait_for_completion(completed, action)?,
        Some(timeout) => match wait_with_deadline(completed, action, timeout)? {
            Some(outcome) => outcome,
            None => {
                tracing::warn!(prompt = %prompt.as_str(), ?timeout, "prompt timed out");
                if let Err(err) = prompt_proxy.dismiss() {
                    tracing::debug!(error = %err, "ignoring failure to dismiss prompt");
                }
                return Err(Error::PromptTimeout(timeout));
            }
        },
    };

    if outcome.dismissed {
        tracing::warn!(prompt = %prompt.as_str(), ?action, "prompt dismissed");
    } else {
        tracing::debug!(prompt = %prompt.as_str(), ?action, "prompt completed");
    }

    Ok(outcome)
}

fn wait_for_completion(
    mut completed: CompletedIterator,
    action: PromptAction,
) -> Result<PromptOutcome, Error> {
    let signal = completed.next().ok_or_else(|| {
        Error::Remote(zbus::Error::Failure(
            "signal stream ended before the prompt completed".to_owned(),
        ))
    })?;
    let args = signal.args()?;

    Ok(PromptOutcome {
        dismissed: *args.dismissed(),
        result: action.decode(args.result()),
    })
}

// `Ok(None)` when the deadline passed first. The waiting thread is left to
// finish on its own; it exits once the dismissed prompt completes.
fn wait_with_deadline(
    completed: CompletedIterator,
    action: PromptAction,
    timeout: Duration,
) -> Result<Option<PromptOutcome>, Error> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        // the receiver is gone after a timeout
        let _ = tx.send(wait_for_completion(completed, action));
    });

    match rx.recv_timeout(timeout) {
        Ok(outcome) => outcome.map(Some),
        Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(Error::Remote(zbus::Error::Failure(
            "prompt waiter stopped without a result".to_owned(),
        ))),
    }
}
