#![allow(dead_code)]

use gazectl_client::{ChannelId, ChannelRole, GazeClient, GazeClientConfig, SimulatedGazeServer};
use gazectl_io::{
    Carrier, GazeNetwork, GazePort, LocalNetwork, RequestHandler, Requester, StreamReader,
    StreamWriter,
};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Duration;

pub const REMOTE: &str = "/gaze";
pub const LOCAL: &str = "/app";
pub const BACKEND: &str = "/backend";

pub fn config() -> GazeClientConfig {
    GazeClientConfig::new(REMOTE, LOCAL)
}

pub fn start_server() -> (Arc<LocalNetwork>, SimulatedGazeServer) {
    let network = Arc::new(LocalNetwork::new());
    let server =
        SimulatedGazeServer::start(network.as_ref(), REMOTE).expect("simulated server starts");
    (network, server)
}

/// A client connected to a fresh simulated server, with the handshake traffic cleared.
pub fn connected() -> (Arc<LocalNetwork>, SimulatedGazeServer, GazeClient) {
    let (network, server) = start_server();
    let client = GazeClient::connect(network.clone(), &config()).expect("client connects");
    server.clear_requests();
    (network, server, client)
}

pub fn recv<T>(rx: &Receiver<T>) -> T {
    rx.recv_timeout(Duration::from_secs(2))
        .expect("event delivered in time")
}

/// Assert nothing else shows up for a short while.
pub fn assert_quiet<T: std::fmt::Debug>(rx: &Receiver<T>) {
    if let Ok(extra) = rx.recv_timeout(Duration::from_millis(150)) {
        panic!("unexpected extra delivery: {:?}", extra);
    }
}

/// Server endpoints under `REMOTE` whose control channel runs a custom handler. The streaming
/// endpoints are opened so a client can connect, but nothing is published on them.
pub struct ScriptedServer {
    _rpc: Box<dyn GazePort>,
    _readers: Vec<Box<dyn StreamReader>>,
    _writers: Vec<Box<dyn StreamWriter>>,
}

pub fn scripted_server(
    network: &LocalNetwork,
    handler: Arc<dyn RequestHandler>,
) -> ScriptedServer {
    let mut readers = Vec::new();
    let mut writers = Vec::new();
    for id in ChannelId::STREAMS {
        let name = format!("{}{}", REMOTE, id.remote_suffix());
        match id.role() {
            ChannelRole::StreamOut => {
                readers.push(network.open_reader(&name).expect("reader opens"))
            }
            _ => writers.push(network.open_writer(&name).expect("writer opens")),
        }
    }
    let rpc = network
        .open_responder(&format!("{}{}", REMOTE, ChannelId::Rpc.remote_suffix()), handler)
        .expect("responder opens");
    ScriptedServer {
        _rpc: rpc,
        _readers: readers,
        _writers: writers,
    }
}

/// A simulated server under `BACKEND` plus a requester wired to its control channel, for
/// scripted handlers that pass requests through.
pub fn backend(network: &LocalNetwork) -> (SimulatedGazeServer, Box<dyn Requester>) {
    let server = SimulatedGazeServer::start(network, BACKEND).expect("backend starts");
    let forward = network.open_requester("/forward/rpc").expect("requester opens");
    network
        .connect("/forward/rpc", &server.endpoint(ChannelId::Rpc), Carrier::Tcp)
        .expect("forward link");
    (server, forward)
}
