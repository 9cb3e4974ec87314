// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Opening, wiring and tearing down the nine channels as one unit.

use crate::channels::{Channel, ChannelId};
use crate::error::{GazeClientError, Result};
use crate::rpc::{Command, RpcChannel};
use crate::types::{versions_match, ServerInfo, CLIENT_PROTOCOL_VERSION};
use gazectl_io::{
    Carrier, EventReader, GazeNetwork, GazePort, PortState, StreamReader, StreamWriter,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Connectedness as seen by the application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionState {
    /// Local endpoints exist
    pub is_open: bool,
    /// Every channel is wired and the handshake passed
    pub is_connected: bool,
}

/// Where and how to connect.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoints {
    pub local: String,
    pub remote: String,
    pub carrier: Carrier,
    pub rpc_timeout: Option<Duration>,
}

impl Endpoints {
    pub fn channel(&self, id: ChannelId) -> Channel {
        let carrier = match id {
            ChannelId::Rpc => Carrier::Tcp,
            _ => self.carrier,
        };
        Channel::new(id, &self.local, &self.remote, carrier)
    }
}

/// Run `$body` once per streaming port of a `ChannelSet`, with its `ChannelId`.
macro_rules! for_each_port {
    ($set:expr, |$id:ident, $port:ident| $body:expr) => {{
        {
            let ($id, $port) = (ChannelId::FixationCommand, &*$set.fixation_cmd);
            $body;
        }
        {
            let ($id, $port) = (ChannelId::AnglesCommand, &*$set.angles_cmd);
            $body;
        }
        {
            let ($id, $port) = (ChannelId::MonoCommand, &*$set.mono_cmd);
            $body;
        }
        {
            let ($id, $port) = (ChannelId::StereoCommand, &*$set.stereo_cmd);
            $body;
        }
        {
            let ($id, $port) = (ChannelId::FixationState, &*$set.fixation_state);
            $body;
        }
        {
            let ($id, $port) = (ChannelId::AnglesState, &*$set.angles_state);
            $body;
        }
        {
            let ($id, $port) = (ChannelId::HeadState, &*$set.head_state);
            $body;
        }
        {
            let ($id, $port) = (ChannelId::Events, &*$set.events);
            $body;
        }
    }};
}

/// All nine local endpoints of a client.
pub struct ChannelSet {
    pub fixation_cmd: Box<dyn StreamWriter>,
    pub angles_cmd: Box<dyn StreamWriter>,
    pub mono_cmd: Box<dyn StreamWriter>,
    pub stereo_cmd: Box<dyn StreamWriter>,
    pub fixation_state: Box<dyn StreamReader>,
    pub angles_state: Box<dyn StreamReader>,
    pub head_state: Box<dyn StreamReader>,
    pub events: Arc<dyn EventReader>,
    pub rpc: RpcChannel,
    channels: Vec<Channel>,
}

impl ChannelSet {
    /// Open all local endpoints, wire the control channel, check the server version, then
    /// wire the streaming channels.
    ///
    /// Nothing stays open or connected when this fails.
    pub fn connect(network: &dyn GazeNetwork, endpoints: &Endpoints) -> Result<(Self, ServerInfo)> {
        let set = Self::open_ports(network, endpoints)?;
        match set.wire(network) {
            Ok(info) => Ok((set, info)),
            Err(e) => {
                set.shutdown();
                Err(e)
            }
        }
    }

    fn open_ports(network: &dyn GazeNetwork, endpoints: &Endpoints) -> Result<Self> {
        let channels: Vec<Channel> = ChannelId::ALL
            .iter()
            .map(|id| endpoints.channel(*id))
            .collect();
        let name = |id: ChannelId| format!("{}{}", endpoints.local, id.local_suffix());

        // Each box closes its port when dropped, so an early return releases what was opened.
        Ok(Self {
            fixation_cmd: network.open_writer(&name(ChannelId::FixationCommand))?,
            angles_cmd: network.open_writer(&name(ChannelId::AnglesCommand))?,
            mono_cmd: network.open_writer(&name(ChannelId::MonoCommand))?,
            stereo_cmd: network.open_writer(&name(ChannelId::StereoCommand))?,
            fixation_state: network.open_reader(&name(ChannelId::FixationState))?,
            angles_state: network.open_reader(&name(ChannelId::AnglesState))?,
            head_state: network.open_reader(&name(ChannelId::HeadState))?,
            events: Arc::from(network.open_event_reader(&name(ChannelId::Events))?),
            rpc: RpcChannel::new(
                network.open_requester(&name(ChannelId::Rpc))?,
                endpoints.rpc_timeout,
            ),
            channels,
        })
    }

    fn wire(&self, network: &dyn GazeNetwork) -> Result<ServerInfo> {
        let rpc = self.channel(ChannelId::Rpc);
        let (from, to) = rpc.link();
        if let Err(e) = network.connect(from, to, rpc.carrier) {
            error!("[CONNECT] unable to connect to the server rpc port {}: {}", to, e);
            return Err(e.into());
        }

        let info = self.handshake()?;

        for id in ChannelId::STREAMS {
            let channel = self.channel(id);
            let (from, to) = channel.link();
            if let Err(e) = network.connect(from, to, channel.carrier) {
                error!("[CONNECT] unable to connect {} -> {}: {}", from, to, e);
                return Err(e.into());
            }
            debug!("[CONNECT] {} -> {} ({})", from, to, channel.carrier);
        }
        Ok(info)
    }

    /// Query `get info` and compare versions. A missing version is only a warning.
    fn handshake(&self) -> Result<ServerInfo> {
        let info = match self.rpc.call(&Command::get("info")) {
            Ok(reply) => ServerInfo::new(reply.list().cloned().unwrap_or_default()),
            Err(e @ GazeClientError::Transport(_)) => return Err(e),
            Err(e) => {
                warn!("[CONNECT] unable to retrieve server info: {}", e);
                ServerInfo::default()
            }
        };

        match info.version() {
            Some(server) if !versions_match(server, CLIENT_PROTOCOL_VERSION) => {
                error!(
                    "[CONNECT] version mismatch => server({}) != client({})",
                    server, CLIENT_PROTOCOL_VERSION
                );
                Err(GazeClientError::VersionMismatch {
                    server,
                    client: CLIENT_PROTOCOL_VERSION,
                })
            }
            Some(server) => {
                info!("[CONNECT] server version {}", server);
                Ok(info)
            }
            None => {
                warn!("[CONNECT] unable to retrieve server version; please update the server");
                Ok(info)
            }
        }
    }

    pub fn channel(&self, id: ChannelId) -> &Channel {
        // `channels` holds every id in `ChannelId::ALL` order
        &self.channels[id as usize]
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Port state of every channel, `ChannelId::ALL` order.
    pub fn port_states(&self) -> Vec<(ChannelId, PortState)> {
        let mut states = Vec::with_capacity(ChannelId::ALL.len());
        for_each_port!(self, |id, port| states.push((id, port.state())));
        states.push((ChannelId::Rpc, self.rpc.state()));
        states
    }

    /// Interrupt every port, then close them all.
    pub fn shutdown(&self) {
        for_each_port!(self, |_id, port| port.interrupt());
        self.rpc.interrupt();
        for_each_port!(self, |_id, port| port.close());
        self.rpc.close();
        debug!("[CONNECT] all channels closed");
    }
}
