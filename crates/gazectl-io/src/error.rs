use gazectl_structures::GazeDataError;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum GazeNetworkError {
    /// Failed to open a local port under the requested name
    CannotOpen(String),
    /// A port with this name is already open
    NameInUse(String),
    /// Failed to connect two ports
    CannotConnect(String),
    /// Failed to disconnect two ports
    CannotDisconnect(String),
    /// Failed to send data
    SendFailed(String),
    /// Failed to receive data
    ReceiveFailed(String),
    /// No reply arrived within the allotted time
    Timeout(String),
    /// The port was interrupted or closed
    PortClosed(String),
    /// General failure (e.g., configuration error, invalid state)
    GeneralFailure(String),
}

impl Display for GazeNetworkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GazeNetworkError::CannotOpen(msg) => {
                write!(f, "GazeNetworkError: Unable to open port: {}", msg)
            }
            GazeNetworkError::NameInUse(msg) => {
                write!(f, "GazeNetworkError: Port name already in use: {}", msg)
            }
            GazeNetworkError::CannotConnect(msg) => {
                write!(f, "GazeNetworkError: Unable to connect: {}", msg)
            }
            GazeNetworkError::CannotDisconnect(msg) => {
                write!(f, "GazeNetworkError: Unable to disconnect: {}", msg)
            }
            GazeNetworkError::SendFailed(msg) => {
                write!(f, "GazeNetworkError: Send failed: {}", msg)
            }
            GazeNetworkError::ReceiveFailed(msg) => {
                write!(f, "GazeNetworkError: Receive failed: {}", msg)
            }
            GazeNetworkError::Timeout(msg) => {
                write!(f, "GazeNetworkError: Timed out: {}", msg)
            }
            GazeNetworkError::PortClosed(msg) => {
                write!(f, "GazeNetworkError: Port closed: {}", msg)
            }
            GazeNetworkError::GeneralFailure(msg) => {
                write!(f, "GazeNetworkError: {}", msg)
            }
        }
    }
}

impl Error for GazeNetworkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl From<GazeDataError> for GazeNetworkError {
    fn from(err: GazeDataError) -> Self {
        match err {
            GazeDataError::SerializationError(msg) => GazeNetworkError::SendFailed(msg),
            GazeDataError::DeserializationError(msg) => GazeNetworkError::ReceiveFailed(msg),
            GazeDataError::BadParameters(msg) => {
                GazeNetworkError::GeneralFailure(format!("Bad parameters: {}", msg))
            }
        }
    }
}
