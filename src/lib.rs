//! # gazectl - client façade for remote gaze controllers
//!
//! A gaze controller steers the head and eyes of a robot towards points in space, angles or
//! image pixels. It runs as a server exposing nine channels; this crate gives applications
//! one typed client object over all of them.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! gazectl = "0.1"  # Default: client + simulated server + logging
//! ```
//!
//! ## Feature Flags
//!
//! - **`client`** (default): [`GazeClient`] and its protocol engine
//! - **`sim`** (default): [`SimulatedGazeServer`] over the in-process transport
//! - **`observability`** (default): logging initialization and per-crate debug flags
//! - **`file-logging`**: timestamped log folders on disk
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use gazectl::prelude::*;
//! use std::sync::Arc;
//!
//! let network = Arc::new(LocalNetwork::new());
//! let server = SimulatedGazeServer::start(network.as_ref(), "/gaze")?;
//!
//! let config = GazeClientConfig::new("/gaze", "/app").with_timeout(0.2);
//! let mut client = GazeClient::connect(network, &config)?;
//!
//! let ctx = client.store_context()?;
//! client.set_tracking_mode(true)?;
//! client.look_at_abs_angles(&[10.0, 0.0, 0.0])?;
//! client.restore_context(ctx)?;
//!
//! client.close()?;
//! # drop(server);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: gazectl-structures, gazectl-config         │
//! │  (Bottles, vocabs, stamps, client options)              │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  I/O: gazectl-io                                        │
//! │  (Named ports, connect by name, in-process transport)   │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Protocol: gazectl-client                               │
//! │  (Channels, RPC, contexts, events, typed wrappers)      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

// Re-export foundation
pub use gazectl_config as config;
pub use gazectl_io as io;
pub use gazectl_structures as structures;

// Re-export protocol layer
#[cfg(feature = "client")]
pub use gazectl_client as client;

#[cfg(feature = "client")]
pub use gazectl_client::GazeClient;

#[cfg(feature = "sim")]
pub use gazectl_client::SimulatedGazeServer;

#[cfg(feature = "observability")]
pub use gazectl_observability as observability;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::config::GazeClientConfig;
    pub use crate::io::{GazeNetwork, LocalNetwork};
    pub use crate::structures::{Bottle, Stamp, Value};

    #[cfg(feature = "client")]
    pub use crate::client::{
        AngleMode, CameraSelector, ContextId, ControlMode, ErrorKind, EventParameters,
        GazeClient, GazeClientError, GazeEvent, NeckJoint, PoseSelector, StateReading, Tunable,
    };

    #[cfg(feature = "sim")]
    pub use crate::client::SimulatedGazeServer;
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_facade_imports() {
        use crate::prelude::*;
        let config = GazeClientConfig::new("/gaze", "/app");
        assert_eq!(config.remote.as_deref(), Some("/gaze"));
        assert!(Bottle::new().is_empty());
    }
}
