// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Gaze controller client
//!
//! The client owns the nine channels to a gaze server and exposes every server
//! operation as a typed method. Method groups live in the submodules.

mod contexts;
mod events;
mod joints;
mod motion;
mod queries;
mod settings;
mod state;

use crate::channels::{Channel, ChannelId};
use crate::clock::{Clock, SystemClock};
use crate::connection::{ChannelSet, ConnectionState, Endpoints};
use crate::contexts::{ContextId, ContextStack};
use crate::error::{GazeClientError, Result};
use crate::event_listener::EventListener;
use crate::events::{EventDispatcher, EventKey};
use crate::rpc::{Command, Reply};
use crate::staleness::StalenessTracker;
use crate::types::ServerInfo;
use gazectl_config::GazeClientConfig;
use gazectl_io::{Carrier, GazeNetwork, GazeNetworkError, PortState};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Client façade of a remote gaze controller.
///
/// Every operation fails fast with [`GazeClientError::NotConnected`] until [`open`] succeeds.
/// Dropping the client closes it.
///
/// # Example
/// ```ignore
/// use gazectl_client::{GazeClient, GazeClientConfig};
///
/// let mut client = GazeClient::new(network);
/// client.open(&GazeClientConfig::new("/gaze", "/app"))?;
///
/// client.look_at_abs_angles(&[10.0, 0.0, 0.0])?;
/// client.wait_motion_done(Duration::from_millis(100), Duration::from_secs(5))?;
/// let id = client.store_context()?;
/// ```
///
/// [`open`]: GazeClient::open
pub struct GazeClient {
    /// Transport the channels are opened on
    network: Arc<dyn GazeNetwork>,

    /// Time source for freshness and polling
    clock: Arc<dyn Clock>,

    state: ConnectionState,

    /// Present only while connected
    channels: Option<ChannelSet>,

    /// Event delivery thread
    listener: Option<EventListener>,

    /// `get info` answer captured by the handshake
    server_info: ServerInfo,

    /// Shared by all streaming inputs
    freshness_window: Duration,

    fixation: StalenessTracker<Vec<f64>>,
    angles: StalenessTracker<Vec<f64>>,
    head: StalenessTracker<Vec<f64>>,

    contexts: ContextStack,
    events: Arc<EventDispatcher>,
}

impl GazeClient {
    pub fn new(network: Arc<dyn GazeNetwork>) -> Self {
        Self::with_clock(network, Arc::new(SystemClock))
    }

    pub fn with_clock(network: Arc<dyn GazeNetwork>, clock: Arc<dyn Clock>) -> Self {
        Self {
            network,
            clock,
            state: ConnectionState::default(),
            channels: None,
            listener: None,
            server_info: ServerInfo::default(),
            freshness_window: GazeClientConfig::default().freshness_window(),
            fixation: StalenessTracker::new(vec![0.0; 3]),
            angles: StalenessTracker::new(vec![0.0; 3]),
            head: StalenessTracker::new(Vec::new()),
            contexts: ContextStack::new(),
            events: Arc::new(EventDispatcher::new()),
        }
    }

    /// Create a client and open it in one step.
    pub fn connect(network: Arc<dyn GazeNetwork>, config: &GazeClientConfig) -> Result<Self> {
        let mut client = Self::new(network);
        client.open(config)?;
        Ok(client)
    }

    /// Open and wire all channels, then check the server version.
    ///
    /// Requires `remote` and `local`. On any failure every channel is released again and
    /// the client stays closed, ready for another attempt.
    pub fn open(&mut self, config: &GazeClientConfig) -> Result<()> {
        if self.state.is_open {
            warn!("[CLIENT] open() on an open client; closing first");
            self.close()?;
        }

        let remote = config
            .remote
            .clone()
            .ok_or(GazeClientError::MissingOption("remote"))?;
        let local = config
            .local
            .clone()
            .ok_or(GazeClientError::MissingOption("local"))?;
        let carrier: Carrier = config
            .carrier
            .parse()
            .map_err(|e: GazeNetworkError| GazeClientError::InvalidArgument(e.to_string()))?;
        let endpoints = Endpoints {
            local,
            remote,
            carrier,
            rpc_timeout: config.rpc_timeout(),
        };

        info!(
            "[CLIENT] opening {} -> {} (carrier {})",
            endpoints.local, endpoints.remote, endpoints.carrier
        );
        self.state.is_open = true;

        let (channels, server_info) = match ChannelSet::connect(self.network.as_ref(), &endpoints) {
            Ok(connected) => connected,
            Err(e) => {
                self.state = ConnectionState::default();
                return Err(e);
            }
        };
        let listener = match EventListener::start(
            Arc::clone(&channels.events),
            Arc::clone(&self.events),
        ) {
            Ok(listener) => listener,
            Err(e) => {
                channels.shutdown();
                self.state = ConnectionState::default();
                return Err(e);
            }
        };

        self.fixation.reset();
        self.angles.reset();
        self.head.reset();
        self.freshness_window = config.freshness_window();
        self.server_info = server_info;
        self.channels = Some(channels);
        self.listener = Some(listener);
        self.state.is_connected = true;

        info!("[CLIENT] connected to {}", endpoints.remote);
        Ok(())
    }

    /// Release the server-side state and all channels. Idempotent.
    ///
    /// Outstanding contexts are deleted and event handlers unregistered before any channel
    /// is closed; failures on the way are logged, never returned.
    pub fn close(&mut self) -> Result<()> {
        if !self.state.is_open {
            return Ok(());
        }

        if self.state.is_connected {
            if let Err(e) = self.delete_all_contexts() {
                warn!("[CLIENT] failed to delete contexts on close: {}", e);
            }
            self.unregister_all_events();
        }

        if let Some(mut listener) = self.listener.take() {
            listener.stop();
        }
        if let Some(channels) = self.channels.take() {
            channels.shutdown();
        }

        self.events.clear();
        self.contexts.clear();
        self.state = ConnectionState::default();
        info!("[CLIENT] closed");
        Ok(())
    }

    pub fn connected(&self) -> bool {
        self.state.is_connected
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.state
    }

    pub fn freshness_window(&self) -> Duration {
        self.freshness_window
    }

    /// Channels with their endpoint names; empty while not connected.
    pub fn channels(&self) -> &[Channel] {
        self.channels
            .as_ref()
            .map(ChannelSet::channels)
            .unwrap_or_default()
    }

    /// Port state of all nine channels; empty while not connected.
    pub fn channel_states(&self) -> Vec<(ChannelId, PortState)> {
        self.channels
            .as_ref()
            .map(ChannelSet::port_states)
            .unwrap_or_default()
    }

    /// Info captured during the last successful handshake.
    pub fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    /// Contexts this client stored and has not deleted yet.
    pub fn tracked_contexts(&self) -> Vec<ContextId> {
        self.contexts.ids()
    }

    pub fn registered_events(&self) -> Vec<EventKey> {
        self.events.keys()
    }

    fn link(&self) -> Result<&ChannelSet> {
        match (&self.channels, self.state.is_connected) {
            (Some(channels), true) => Ok(channels),
            _ => Err(GazeClientError::NotConnected),
        }
    }

    /// One ACK-checked round trip on the control channel.
    fn call(&self, command: Command) -> Result<Reply> {
        self.link()?.rpc.call(&command)
    }
}

impl Drop for GazeClient {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("[CLIENT] close on drop failed: {}", e);
        }
    }
}

/// Require at least `min` values in `values`.
fn require_len(what: &str, values: &[f64], min: usize) -> Result<()> {
    if values.len() < min {
        return Err(GazeClientError::InvalidArgument(format!(
            "{} needs at least {} values, got {}",
            what,
            min,
            values.len()
        )));
    }
    Ok(())
}

fn list_of(values: &[f64]) -> gazectl_structures::Bottle {
    gazectl_structures::Bottle::from_f64s(values.iter().copied())
}
