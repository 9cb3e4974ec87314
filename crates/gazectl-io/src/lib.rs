mod error;
pub mod implementations;
pub mod traits_and_enums;

pub use error::GazeNetworkError;
pub use traits_and_enums::{
    Carrier, Envelope, EventReader, GazeNetwork, GazePort, PortKind, PortState, RequestHandler,
    Requester, StreamReader, StreamWriter,
};

#[cfg(feature = "local-transport")]
pub use implementations::local::LocalNetwork;
