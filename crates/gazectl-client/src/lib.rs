//! gazectl client - Rust client library for remote gaze controllers
//!
//! A gaze server exposes nine channels: four streaming command outputs, three streaming state
//! inputs, an event feed and a request/reply control channel. [`GazeClient`] composes them
//! into one object with an all-or-nothing connection lifecycle.
//!
//! # Features
//! - Atomic open/close of all channels with a protocol version handshake
//! - Freshness-tracked state reads (fixation point, angles, head joints)
//! - ACK/NACK control protocol behind typed methods
//! - Client-side mirror of server contexts, released on close
//! - Event subscriptions dispatched from a background thread
//!
//! # Quick Start
//!
//! ```ignore
//! use gazectl_client::{GazeClient, GazeClientConfig};
//!
//! let config = GazeClientConfig::new("/gaze", "/app").with_timeout(0.2);
//! let mut client = GazeClient::connect(network, &config)?;
//!
//! client.look_at_abs_angles(&[10.0, 0.0, 0.0])?;
//! let reading = client.get_angles()?;
//! if reading.fresh {
//!     println!("angles: {:?}", reading.value);
//! }
//!
//! // Contexts and event subscriptions are released on drop
//! ```
//!
//! # Error Handling
//!
//! Every operation returns `Result<T, GazeClientError>`. [`GazeClientError::kind`] tells
//! precondition, transport, protocol and version failures apart.
//!
//! # Thread Safety
//!
//! The control channel is serialized internally, so `&GazeClient` methods may be called from
//! several threads. Event handlers run on the `gazectl-events` thread.

pub mod channels;
pub mod clock;
pub mod connection;
pub mod contexts;
pub mod error;
pub mod event_listener;
pub mod events;
pub mod rpc;
pub mod staleness;
pub mod types;

mod client;

#[cfg(feature = "sim")]
pub mod sim;

pub use channels::{Channel, ChannelId, ChannelRole};
pub use client::GazeClient;
pub use clock::{Clock, ManualClock, SystemClock};
pub use connection::ConnectionState;
pub use contexts::ContextId;
pub use error::{ErrorKind, GazeClientError, Result};
pub use events::{EventKey, EventParameters, GazeEvent, GazeEventHandler};
pub use staleness::StateReading;
pub use types::{
    AngleMode, CameraSelector, ControlMode, NeckJoint, Pose, PoseSelector, ServerInfo, Tunable,
    CLIENT_PROTOCOL_VERSION,
};

#[cfg(feature = "sim")]
pub use sim::SimulatedGazeServer;

// Re-export the types callers need to configure and feed the client
pub use gazectl_config::GazeClientConfig;
pub use gazectl_structures::{Bottle, Stamp, Value};

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
