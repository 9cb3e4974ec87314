// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for the gaze client

use crate::contexts::ContextId;
use gazectl_io::GazeNetworkError;

/// Result type alias using GazeClientError
pub type Result<T> = std::result::Result<T, GazeClientError>;

/// Coarse failure category, useful when the caller only wants to decide whether to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Detected locally; nothing was sent
    Precondition,
    /// The transport failed to deliver the request or the reply
    Transport,
    /// A reply arrived but was rejected or could not be decoded
    Protocol,
    /// The server speaks a different protocol version
    VersionMismatch,
}

#[derive(Debug, thiserror::Error)]
pub enum GazeClientError {
    /// Operation needs an open, connected client
    #[error("Client not connected - call open() first")]
    NotConnected,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Context id was never issued to this client or was already deleted
    #[error("Unknown context id {0}")]
    UnknownContext(ContextId),

    /// Required configuration option is absent
    #[error("Missing required option '{0}'")]
    MissingOption(&'static str),

    #[error("Transport error: {0}")]
    Transport(#[from] GazeNetworkError),

    /// Server replied with NACK
    #[error("Command '{command}' rejected by server")]
    Rejected { command: String },

    /// Reply was acknowledged but its payload is absent or malformed
    #[error("Malformed reply to '{command}': {reason}")]
    MalformedReply { command: String, reason: String },

    #[error("Version mismatch: server {server} != client {client}")]
    VersionMismatch { server: f64, client: f64 },
}

impl GazeClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GazeClientError::NotConnected
            | GazeClientError::InvalidArgument(_)
            | GazeClientError::UnknownContext(_)
            | GazeClientError::MissingOption(_) => ErrorKind::Precondition,
            GazeClientError::Transport(_) => ErrorKind::Transport,
            GazeClientError::Rejected { .. } | GazeClientError::MalformedReply { .. } => {
                ErrorKind::Protocol
            }
            GazeClientError::VersionMismatch { .. } => ErrorKind::VersionMismatch,
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transport)
    }

    pub(crate) fn malformed(command: impl ToString, reason: impl Into<String>) -> Self {
        GazeClientError::MalformedReply {
            command: command.to_string(),
            reason: reason.into(),
        }
    }
}
