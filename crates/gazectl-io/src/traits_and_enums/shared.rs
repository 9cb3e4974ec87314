//! Shared types for gazectl networking traits.

use crate::GazeNetworkError;
use gazectl_structures::{Bottle, Stamp};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Lifecycle of a named port.
///
/// ```text
/// ┌────────┐  open_*   ┌──────┐  connect   ┌───────────┐
/// │ Closed │ ────────► │ Open │ ─────────► │ Connected │
/// └────────┘           └──────┘ ◄───────── └───────────┘
///      ▲                  │     disconnect        │
///      └──────────────────┴───── close ───────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortState {
    Closed,
    Open,
    Connected,
}

/// What a port does, which also decides which connections are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortKind {
    /// Streaming output (latest-value, fire-and-forget)
    StreamWriter,
    /// Streaming input polled without blocking
    StreamReader,
    /// Strict, queued input consumed by a background delivery path
    EventReader,
    /// Client side of a synchronous request/reply exchange
    Requester,
    /// Server side of a synchronous request/reply exchange
    Responder,
}

impl PortKind {
    /// Whether a connection `self -> to` makes sense.
    pub fn can_connect_to(&self, to: PortKind) -> bool {
        matches!(
            (self, to),
            (PortKind::StreamWriter, PortKind::StreamReader)
                | (PortKind::StreamWriter, PortKind::EventReader)
                | (PortKind::Requester, PortKind::Responder)
        )
    }
}

/// Transport mode requested for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Carrier {
    /// Best-effort, unordered delivery
    #[default]
    Udp,
    /// Reliable, ordered delivery
    Tcp,
    /// In-process delivery
    Local,
}

impl Carrier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Carrier::Udp => "udp",
            Carrier::Tcp => "tcp",
            Carrier::Local => "local",
        }
    }

    pub fn is_reliable(&self) -> bool {
        !matches!(self, Carrier::Udp)
    }
}

impl Display for Carrier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Carrier {
    type Err = GazeNetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "udp" => Ok(Carrier::Udp),
            "tcp" => Ok(Carrier::Tcp),
            "local" => Ok(Carrier::Local),
            other => Err(GazeNetworkError::GeneralFailure(format!(
                "Unknown carrier '{}'",
                other
            ))),
        }
    }
}

/// A stamped message as it travels on a streaming or event port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub stamp: Stamp,
    pub payload: Bottle,
}

impl Envelope {
    pub fn new(stamp: Stamp, payload: Bottle) -> Self {
        Self { stamp, payload }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_carrier_parsing() {
        assert_eq!("udp".parse::<Carrier>().unwrap(), Carrier::Udp);
        assert_eq!(" TCP ".parse::<Carrier>().unwrap(), Carrier::Tcp);
        assert!("carrier-pigeon".parse::<Carrier>().is_err());
        assert_eq!(Carrier::default(), Carrier::Udp);
        assert!(!Carrier::Udp.is_reliable());
    }

    #[test]
    fn test_connection_directions() {
        assert!(PortKind::StreamWriter.can_connect_to(PortKind::StreamReader));
        assert!(PortKind::StreamWriter.can_connect_to(PortKind::EventReader));
        assert!(PortKind::Requester.can_connect_to(PortKind::Responder));
        assert!(!PortKind::StreamReader.can_connect_to(PortKind::StreamWriter));
        assert!(!PortKind::Requester.can_connect_to(PortKind::StreamReader));
    }
}
