use std::error::Error;
use std::fmt::{Display, Formatter};

/// Common error type for gazectl data operations.
///
/// # Examples
/// ```
/// use gazectl_structures::GazeDataError;
///
/// fn require_triplet(values: &[f64]) -> Result<(), GazeDataError> {
///     if values.len() < 3 {
///         return Err(GazeDataError::BadParameters("need at least 3 values".into()));
///     }
///     Ok(())
/// }
///
/// assert!(require_triplet(&[1.0]).is_err());
/// assert!(require_triplet(&[1.0, 2.0, 3.0]).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum GazeDataError {
    /// Failed to deserialize bytes into data structures
    DeserializationError(String),
    /// Failed to serialize data structures into bytes
    SerializationError(String),
    /// Invalid parameters provided to a function
    BadParameters(String),
}

impl Display for GazeDataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GazeDataError::DeserializationError(msg) => {
                write!(f, "Failed to Deserialize Bytes: {}", msg)
            }
            GazeDataError::SerializationError(msg) => {
                write!(f, "Failed to Serialize Bytes: {}", msg)
            }
            GazeDataError::BadParameters(msg) => write!(f, "Bad Parameters: {}", msg),
        }
    }
}

impl Error for GazeDataError {}
