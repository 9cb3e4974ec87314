// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The nine named endpoints a client talks through.

use gazectl_io::Carrier;
use std::fmt::{Display, Formatter};

/// How a channel is used by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelRole {
    /// Client -> server, latest-value, fire-and-forget
    StreamOut,
    /// Server -> client, latest-value, polled without blocking
    StreamIn,
    /// Server -> client, strict, delivered on a background thread
    EventIn,
    /// Bidirectional request/reply
    Rpc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChannelId {
    FixationCommand,
    AnglesCommand,
    MonoCommand,
    StereoCommand,
    FixationState,
    AnglesState,
    HeadState,
    Events,
    Rpc,
}

impl ChannelId {
    pub const ALL: [ChannelId; 9] = [
        ChannelId::FixationCommand,
        ChannelId::AnglesCommand,
        ChannelId::MonoCommand,
        ChannelId::StereoCommand,
        ChannelId::FixationState,
        ChannelId::AnglesState,
        ChannelId::HeadState,
        ChannelId::Events,
        ChannelId::Rpc,
    ];

    /// Streaming channels wired after the handshake, in wiring order.
    pub const STREAMS: [ChannelId; 8] = [
        ChannelId::FixationCommand,
        ChannelId::AnglesCommand,
        ChannelId::MonoCommand,
        ChannelId::StereoCommand,
        ChannelId::FixationState,
        ChannelId::AnglesState,
        ChannelId::HeadState,
        ChannelId::Events,
    ];

    pub fn role(&self) -> ChannelRole {
        match self {
            ChannelId::FixationCommand
            | ChannelId::AnglesCommand
            | ChannelId::MonoCommand
            | ChannelId::StereoCommand => ChannelRole::StreamOut,
            ChannelId::FixationState | ChannelId::AnglesState | ChannelId::HeadState => {
                ChannelRole::StreamIn
            }
            ChannelId::Events => ChannelRole::EventIn,
            ChannelId::Rpc => ChannelRole::Rpc,
        }
    }

    /// Suffix appended to the client's prefix.
    pub fn local_suffix(&self) -> &'static str {
        match self {
            ChannelId::FixationCommand => "/xd:o",
            ChannelId::AnglesCommand => "/angles:o",
            ChannelId::MonoCommand => "/mono:o",
            ChannelId::StereoCommand => "/stereo:o",
            ChannelId::FixationState => "/x:i",
            ChannelId::AnglesState => "/angles:i",
            ChannelId::HeadState => "/q:i",
            ChannelId::Events => "/events:i",
            ChannelId::Rpc => "/rpc",
        }
    }

    /// Suffix appended to the server's prefix for the peer endpoint.
    pub fn remote_suffix(&self) -> &'static str {
        match self {
            ChannelId::FixationCommand => "/xd:i",
            ChannelId::AnglesCommand => "/angles:i",
            ChannelId::MonoCommand => "/mono:i",
            ChannelId::StereoCommand => "/stereo:i",
            ChannelId::FixationState => "/x:o",
            ChannelId::AnglesState => "/angles:o",
            ChannelId::HeadState => "/q:o",
            ChannelId::Events => "/events:o",
            ChannelId::Rpc => "/rpc",
        }
    }
}

impl Display for ChannelId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.local_suffix())
    }
}

/// A channel bound to concrete endpoint names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: ChannelId,
    pub local: String,
    pub remote: String,
    pub carrier: Carrier,
}

impl Channel {
    pub fn new(id: ChannelId, local_prefix: &str, remote_prefix: &str, carrier: Carrier) -> Self {
        Self {
            id,
            local: format!("{}{}", local_prefix, id.local_suffix()),
            remote: format!("{}{}", remote_prefix, id.remote_suffix()),
            carrier,
        }
    }

    pub fn role(&self) -> ChannelRole {
        self.id.role()
    }

    /// `(from, to)` in data-flow direction. The RPC channel connects from the client.
    pub fn link(&self) -> (&str, &str) {
        match self.role() {
            ChannelRole::StreamOut | ChannelRole::Rpc => (&self.local, &self.remote),
            ChannelRole::StreamIn | ChannelRole::EventIn => (&self.remote, &self.local),
        }
    }
}
