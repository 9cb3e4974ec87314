// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Event subscription. Only `motion-ongoing` needs the server's cooperation; every other
//! type is filtered locally.

use super::GazeClient;
use crate::error::{GazeClientError, Result};
use crate::events::{EventKey, EventParameters, GazeEvent, GazeEventHandler, MOTION_ONGOING};
use crate::rpc::Command;
use std::sync::Arc;
use tracing::{debug, warn};

fn checkpoint_command(verb: &str, checkpoint: f64) -> Command {
    Command::new(verb).noun("ongoing").arg(checkpoint)
}

impl GazeClient {
    /// Attach `handler` to the events described by `params`.
    ///
    /// A `motion-ongoing` subscription is confirmed by the server first. Registering the
    /// same key again replaces the previous handler.
    pub fn register_event(
        &self,
        params: &EventParameters,
        handler: Arc<dyn GazeEventHandler>,
    ) -> Result<EventKey> {
        self.link()?;
        if params.is_parameterized() {
            if !(params.checkpoint.is_finite() && params.checkpoint >= 0.0) {
                return Err(GazeClientError::InvalidArgument(format!(
                    "invalid {} checkpoint {}",
                    MOTION_ONGOING, params.checkpoint
                )));
            }
            self.call(checkpoint_command("register", params.checkpoint))?;
        }

        let key = params.key();
        self.events.insert(key.clone(), handler);
        debug!("[EVENTS] registered {}", key);
        Ok(key)
    }

    /// Closure flavour of [`register_event`](GazeClient::register_event).
    pub fn on_event<F>(&self, params: &EventParameters, callback: F) -> Result<EventKey>
    where
        F: Fn(&GazeEvent) + Send + Sync + 'static,
    {
        self.register_event(params, Arc::new(callback))
    }

    /// Detach the handler for `params`. The local entry goes only after the server let go of
    /// a `motion-ongoing` checkpoint. Keys with no handler are a local no-op.
    pub fn unregister_event(&self, params: &EventParameters) -> Result<()> {
        self.link()?;
        let key = params.key();
        if !self.events.contains(&key) {
            debug!("[EVENTS] {} is not registered", key);
            return Ok(());
        }
        if params.is_parameterized() {
            self.call(checkpoint_command("unregister", params.checkpoint))?;
        }
        self.events.remove(&key);
        debug!("[EVENTS] unregistered {}", key);
        Ok(())
    }

    /// Drop every handler, releasing server-side checkpoints on the way.
    pub(super) fn unregister_all_events(&self) {
        for key in self.events.keys() {
            if let Some(checkpoint) = key.checkpoint() {
                if let Err(e) = self.call(checkpoint_command("unregister", checkpoint)) {
                    warn!("[EVENTS] failed to unregister {} on close: {}", key, e);
                }
            }
            self.events.remove(&key);
        }
    }
}
