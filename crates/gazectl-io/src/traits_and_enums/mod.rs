pub mod network;
pub mod port;
pub mod shared;

pub use network::GazeNetwork;
pub use port::{EventReader, GazePort, RequestHandler, Requester, StreamReader, StreamWriter};
pub use shared::{Carrier, Envelope, PortKind, PortState};
