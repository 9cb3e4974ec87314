// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration structs mapping to sections of `gazectl.toml`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Name of the configuration file searched for on disk.
pub const CONFIG_FILE_NAME: &str = "gazectl.toml";

/// Carriers the client knows how to request.
pub const KNOWN_CARRIERS: [&str; 3] = ["udp", "tcp", "local"];

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GazectlConfig {
    pub client: GazeClientConfig,
}

/// Options recognized by `GazeClient::open`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GazeClientConfig {
    /// Prefix of the server's endpoints, e.g. `/gaze`
    pub remote: Option<String>,
    /// Prefix for this client's endpoints, e.g. `/app`
    pub local: Option<String>,
    /// Carrier used for the streaming connections
    pub carrier: String,
    /// Freshness window of the streaming inputs, in seconds
    pub timeout: f64,
    /// Bound on one control-channel exchange; 0 blocks until the transport answers
    pub rpc_timeout_ms: u64,
}

impl Default for GazeClientConfig {
    fn default() -> Self {
        Self {
            remote: None,
            local: None,
            carrier: "udp".to_string(),
            timeout: 0.1,
            rpc_timeout_ms: 0,
        }
    }
}

impl GazeClientConfig {
    pub fn new(remote: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            remote: Some(remote.into()),
            local: Some(local.into()),
            ..Self::default()
        }
    }

    pub fn with_carrier(mut self, carrier: impl Into<String>) -> Self {
        self.carrier = carrier.into();
        self
    }

    pub fn with_timeout(mut self, timeout: f64) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_rpc_timeout_ms(mut self, rpc_timeout_ms: u64) -> Self {
        self.rpc_timeout_ms = rpc_timeout_ms;
        self
    }

    /// Freshness window as a `Duration`. Non-positive or non-finite values collapse to zero,
    /// values beyond `Duration::MAX` saturate.
    pub fn freshness_window(&self) -> Duration {
        if self.timeout.is_finite() && self.timeout > 0.0 {
            Duration::try_from_secs_f64(self.timeout).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        }
    }

    pub fn rpc_timeout(&self) -> Option<Duration> {
        (self.rpc_timeout_ms > 0).then(|| Duration::from_millis(self.rpc_timeout_ms))
    }
}
