// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! In-process transport.
//!
//! `LocalNetwork` is a name registry shared by every port opened through it. Clients and
//! servers living in the same process (tests, simulations, demos) open ports by name and
//! connect them exactly as they would over a real network. Every message is pushed through
//! the byte codec on its way, so nothing relies on sharing memory with the peer.

mod mailbox;

use crate::traits_and_enums::{
    Carrier, Envelope, EventReader, GazeNetwork, GazePort, PortKind, PortState, RequestHandler,
    Requester, StreamReader, StreamWriter,
};
use crate::GazeNetworkError;
use gazectl_structures::{codec, Bottle, Stamp};
use mailbox::Mailbox;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// Queue depth of a latest-value streaming input.
pub const STREAM_QUEUE_CAPACITY: usize = 16;

/// Queue depth of a strict event input.
pub const EVENT_QUEUE_CAPACITY: usize = 1024;

struct PortCore {
    name: String,
    kind: PortKind,
    closed: AtomicBool,
    interrupted: AtomicBool,
    mailbox: Option<Arc<Mailbox>>,
    targets: Mutex<Vec<(String, Arc<Mailbox>)>>,
    service: Mutex<Option<(String, Arc<dyn RequestHandler>)>>,
    handler: Option<Arc<dyn RequestHandler>>,
    sequence: Mutex<Stamp>,
}

impl PortCore {
    fn new(name: &str, kind: PortKind, handler: Option<Arc<dyn RequestHandler>>) -> Self {
        let mailbox = match kind {
            PortKind::StreamReader => Some(Arc::new(Mailbox::new(STREAM_QUEUE_CAPACITY))),
            PortKind::EventReader => Some(Arc::new(Mailbox::new(EVENT_QUEUE_CAPACITY))),
            _ => None,
        };
        Self {
            name: name.to_string(),
            kind,
            closed: AtomicBool::new(false),
            interrupted: AtomicBool::new(false),
            mailbox,
            targets: Mutex::new(Vec::new()),
            service: Mutex::new(None),
            handler,
            sequence: Mutex::new(Stamp::default()),
        }
    }

    fn ensure_usable(&self) -> Result<(), GazeNetworkError> {
        if self.closed.load(Ordering::Acquire) || self.interrupted.load(Ordering::Acquire) {
            return Err(GazeNetworkError::PortClosed(self.name.clone()));
        }
        Ok(())
    }
}

#[derive(Default)]
struct Registry {
    ports: HashMap<String, Arc<PortCore>>,
    links: HashMap<(String, String), Carrier>,
    refused: HashSet<String>,
}

impl Registry {
    fn detach(&mut self, from: &str, to: &str) -> bool {
        if self
            .links
            .remove(&(from.to_string(), to.to_string()))
            .is_none()
        {
            return false;
        }
        if let Some(src) = self.ports.get(from) {
            src.targets.lock().retain(|(name, _)| name != to);
            let mut service = src.service.lock();
            if service.as_ref().map(|(name, _)| name == to).unwrap_or(false) {
                *service = None;
            }
        }
        true
    }

    fn links_of(&self, name: &str) -> Vec<(String, String)> {
        self.links
            .keys()
            .filter(|(from, to)| from == name || to == name)
            .cloned()
            .collect()
    }
}

/// In-process [`GazeNetwork`]. Cloning yields another handle onto the same registry.
#[derive(Clone)]
pub struct LocalNetwork {
    registry: Arc<Mutex<Registry>>,
    epoch: Instant,
}

impl Default for LocalNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalNetwork {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::default())),
            epoch: Instant::now(),
        }
    }

    /// Make every future connection involving `name` fail, as if the peer were unreachable.
    pub fn refuse_connections_to(&self, name: &str) {
        self.registry.lock().refused.insert(name.to_string());
    }

    pub fn accept_connections_to(&self, name: &str) {
        self.registry.lock().refused.remove(name);
    }

    pub fn is_open(&self, name: &str) -> bool {
        self.registry.lock().ports.contains_key(name)
    }

    /// Names of all open ports, sorted.
    pub fn port_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.registry.lock().ports.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of live connections touching `name`.
    pub fn connection_count(&self, name: &str) -> usize {
        self.registry.lock().links_of(name).len()
    }

    /// Carrier a live connection was made with.
    pub fn carrier_of(&self, from: &str, to: &str) -> Option<Carrier> {
        self.registry
            .lock()
            .links
            .get(&(from.to_string(), to.to_string()))
            .copied()
    }

    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    fn open(
        &self,
        name: &str,
        kind: PortKind,
        handler: Option<Arc<dyn RequestHandler>>,
    ) -> Result<LocalPort, GazeNetworkError> {
        if !name.starts_with('/') || name.len() < 2 {
            return Err(GazeNetworkError::CannotOpen(format!(
                "Port names must start with '/': '{}'",
                name
            )));
        }
        let mut registry = self.registry.lock();
        if registry.ports.contains_key(name) {
            return Err(GazeNetworkError::NameInUse(name.to_string()));
        }
        let core = Arc::new(PortCore::new(name, kind, handler));
        registry.ports.insert(name.to_string(), Arc::clone(&core));
        debug!("[LOCAL-NET] opened {:?} port {}", kind, name);
        Ok(LocalPort {
            core,
            network: self.clone(),
        })
    }

    fn release(&self, core: &Arc<PortCore>) {
        let mut registry = self.registry.lock();
        let owned = registry
            .ports
            .get(&core.name)
            .map(|p| Arc::ptr_eq(p, core))
            .unwrap_or(false);
        if !owned {
            return;
        }
        for (from, to) in registry.links_of(&core.name) {
            registry.detach(&from, &to);
        }
        registry.ports.remove(&core.name);
        debug!("[LOCAL-NET] closed port {}", core.name);
    }

    fn has_links(&self, name: &str) -> bool {
        let registry = self.registry.lock();
        registry
            .links
            .keys()
            .any(|(from, to)| from == name || to == name)
    }
}

impl GazeNetwork for LocalNetwork {
    fn open_writer(&self, name: &str) -> Result<Box<dyn StreamWriter>, GazeNetworkError> {
        Ok(Box::new(self.open(name, PortKind::StreamWriter, None)?))
    }

    fn open_reader(&self, name: &str) -> Result<Box<dyn StreamReader>, GazeNetworkError> {
        Ok(Box::new(self.open(name, PortKind::StreamReader, None)?))
    }

    fn open_event_reader(&self, name: &str) -> Result<Box<dyn EventReader>, GazeNetworkError> {
        Ok(Box::new(self.open(name, PortKind::EventReader, None)?))
    }

    fn open_requester(&self, name: &str) -> Result<Box<dyn Requester>, GazeNetworkError> {
        Ok(Box::new(self.open(name, PortKind::Requester, None)?))
    }

    fn open_responder(
        &self,
        name: &str,
        handler: Arc<dyn RequestHandler>,
    ) -> Result<Box<dyn GazePort>, GazeNetworkError> {
        Ok(Box::new(self.open(name, PortKind::Responder, Some(handler))?))
    }

    fn connect(&self, from: &str, to: &str, carrier: Carrier) -> Result<(), GazeNetworkError> {
        let mut registry = self.registry.lock();
        if registry.refused.contains(from) || registry.refused.contains(to) {
            return Err(GazeNetworkError::CannotConnect(format!(
                "{} -> {} refused",
                from, to
            )));
        }
        let src = registry.ports.get(from).cloned().ok_or_else(|| {
            GazeNetworkError::CannotConnect(format!("No such port: {}", from))
        })?;
        let dst = registry.ports.get(to).cloned().ok_or_else(|| {
            GazeNetworkError::CannotConnect(format!("No such port: {}", to))
        })?;
        if !src.kind.can_connect_to(dst.kind) {
            return Err(GazeNetworkError::CannotConnect(format!(
                "Cannot connect {:?} {} to {:?} {}",
                src.kind, from, dst.kind, to
            )));
        }
        let key = (from.to_string(), to.to_string());
        if registry.links.contains_key(&key) {
            return Ok(());
        }

        match dst.kind {
            PortKind::Responder => {
                let handler = dst.handler.clone().ok_or_else(|| {
                    GazeNetworkError::CannotConnect(format!("{} has no request handler", to))
                })?;
                *src.service.lock() = Some((to.to_string(), handler));
            }
            _ => {
                let mailbox = dst.mailbox.clone().ok_or_else(|| {
                    GazeNetworkError::CannotConnect(format!("{} cannot receive data", to))
                })?;
                src.targets.lock().push((to.to_string(), mailbox));
            }
        }
        registry.links.insert(key, carrier);
        debug!("[LOCAL-NET] connected {} -> {} ({})", from, to, carrier);
        Ok(())
    }

    fn disconnect(&self, from: &str, to: &str) -> Result<(), GazeNetworkError> {
        if self.registry.lock().detach(from, to) {
            debug!("[LOCAL-NET] disconnected {} -> {}", from, to);
            Ok(())
        } else {
            Err(GazeNetworkError::CannotDisconnect(format!(
                "{} -> {} is not connected",
                from, to
            )))
        }
    }

    fn is_connected(&self, from: &str, to: &str) -> bool {
        self.registry
            .lock()
            .links
            .contains_key(&(from.to_string(), to.to_string()))
    }
}

/// Handle onto one port of a [`LocalNetwork`]. Dropping it closes the port.
pub struct LocalPort {
    core: Arc<PortCore>,
    network: LocalNetwork,
}

impl LocalPort {
    fn mailbox(&self) -> Result<&Arc<Mailbox>, GazeNetworkError> {
        self.core.mailbox.as_ref().ok_or_else(|| {
            GazeNetworkError::GeneralFailure(format!("{} has no input queue", self.core.name))
        })
    }

    fn deliver(&self, envelope: &Envelope) -> Result<(), GazeNetworkError> {
        let bytes = codec::encode(envelope)?;
        let targets = self.core.targets.lock();
        for (target, mailbox) in targets.iter() {
            if mailbox.push(bytes.clone()) {
                trace!("[LOCAL-NET] {} overflowed, oldest message dropped", target);
            }
        }
        Ok(())
    }
}

impl GazePort for LocalPort {
    fn name(&self) -> &str {
        &self.core.name
    }

    fn kind(&self) -> PortKind {
        self.core.kind
    }

    fn state(&self) -> PortState {
        if self.core.closed.load(Ordering::Acquire) {
            PortState::Closed
        } else if self.network.has_links(&self.core.name) {
            PortState::Connected
        } else {
            PortState::Open
        }
    }

    fn interrupt(&self) {
        self.core.interrupted.store(true, Ordering::Release);
        if let Some(mailbox) = &self.core.mailbox {
            mailbox.interrupt();
        }
    }

    fn close(&self) {
        if self.core.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.interrupt();
        self.network.release(&self.core);
    }
}

impl StreamWriter for LocalPort {
    fn write(&self, payload: &Bottle) -> Result<Stamp, GazeNetworkError> {
        self.core.ensure_usable()?;
        let stamp = {
            let mut sequence = self.core.sequence.lock();
            *sequence = sequence.next(self.network.now());
            *sequence
        };
        self.deliver(&Envelope::new(stamp, payload.clone()))?;
        Ok(stamp)
    }

    fn write_stamped(&self, payload: &Bottle, stamp: Stamp) -> Result<(), GazeNetworkError> {
        self.core.ensure_usable()?;
        *self.core.sequence.lock() = stamp;
        self.deliver(&Envelope::new(stamp, payload.clone()))
    }
}

impl StreamReader for LocalPort {
    fn read_latest(&self) -> Result<Option<Envelope>, GazeNetworkError> {
        self.core.ensure_usable()?;
        match self.mailbox()?.take_latest() {
            Some(bytes) => Ok(Some(codec::decode(&bytes)?)),
            None => Ok(None),
        }
    }
}

impl EventReader for LocalPort {
    fn recv_timeout(&self, timeout: Duration) -> Result<Option<Envelope>, GazeNetworkError> {
        self.core.ensure_usable()?;
        let mailbox = self.mailbox()?;
        match mailbox.pop_timeout(timeout) {
            Ok(Some(bytes)) => Ok(Some(codec::decode(&bytes)?)),
            Ok(None) => Ok(None),
            Err(_) => Err(GazeNetworkError::PortClosed(self.core.name.clone())),
        }
    }
}

impl Requester for LocalPort {
    fn request(
        &self,
        request: &Bottle,
        timeout: Option<Duration>,
    ) -> Result<Bottle, GazeNetworkError> {
        self.core.ensure_usable()?;
        let handler = self
            .core
            .service
            .lock()
            .as_ref()
            .map(|(_, handler)| Arc::clone(handler))
            .ok_or_else(|| {
                GazeNetworkError::SendFailed(format!("{} is not connected", self.core.name))
            })?;

        let started = Instant::now();
        let wire: Bottle = codec::decode(&codec::encode(request)?)?;
        let reply = handler.respond(&wire).ok_or_else(|| {
            GazeNetworkError::ReceiveFailed(format!("No reply to '{}'", request))
        })?;
        if let Some(limit) = timeout {
            if started.elapsed() > limit {
                warn!(
                    "[LOCAL-NET] reply to '{}' arrived after {:?}",
                    request,
                    started.elapsed()
                );
                return Err(GazeNetworkError::Timeout(format!(
                    "No reply within {:?}",
                    limit
                )));
            }
        }
        if self.core.interrupted.load(Ordering::Acquire) {
            return Err(GazeNetworkError::PortClosed(self.core.name.clone()));
        }
        Ok(codec::decode(&codec::encode(&reply)?)?)
    }
}

impl Drop for LocalPort {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo_handler() -> Arc<dyn RequestHandler> {
        Arc::new(|request: &Bottle| Some(request.clone()))
    }

    #[test]
    fn test_stream_round_trip_keeps_latest() {
        let net = LocalNetwork::new();
        let writer = net.open_writer("/srv/x:o").unwrap();
        let reader = net.open_reader("/cli/x:i").unwrap();
        net.connect("/srv/x:o", "/cli/x:i", Carrier::Udp).unwrap();

        assert_eq!(writer.state(), PortState::Connected);
        assert_eq!(reader.state(), PortState::Connected);

        writer.write(&Bottle::from_f64s([1.0])).unwrap();
        let last = writer.write(&Bottle::from_f64s([2.0])).unwrap();

        let envelope = reader.read_latest().unwrap().unwrap();
        assert_eq!(envelope.payload, Bottle::from_f64s([2.0]));
        assert_eq!(envelope.stamp, last);
        assert!(reader.read_latest().unwrap().is_none());
    }

    #[test]
    fn test_event_reader_is_fifo() {
        let net = LocalNetwork::new();
        let writer = net.open_writer("/srv/events:o").unwrap();
        let reader = net.open_event_reader("/cli/events:i").unwrap();
        net.connect("/srv/events:o", "/cli/events:i", Carrier::Tcp)
            .unwrap();

        writer.write(&Bottle::from_f64s([1.0])).unwrap();
        writer.write(&Bottle::from_f64s([2.0])).unwrap();

        let first = reader.recv_timeout(Duration::from_millis(10)).unwrap();
        let second = reader.recv_timeout(Duration::from_millis(10)).unwrap();
        assert_eq!(first.unwrap().payload, Bottle::from_f64s([1.0]));
        assert_eq!(second.unwrap().payload, Bottle::from_f64s([2.0]));
    }

    #[test]
    fn test_request_reply() {
        let net = LocalNetwork::new();
        let _responder = net.open_responder("/srv/rpc", echo_handler()).unwrap();
        let requester = net.open_requester("/cli/rpc").unwrap();

        let mut request = Bottle::new();
        request.add_string("get").add_string("info");
        assert!(requester.request(&request, None).is_err());

        net.connect("/cli/rpc", "/srv/rpc", Carrier::Tcp).unwrap();
        assert_eq!(requester.request(&request, None).unwrap(), request);
    }

    #[test]
    fn test_connect_failures() {
        let net = LocalNetwork::new();
        let _writer = net.open_writer("/srv/x:o").unwrap();
        let _reader = net.open_reader("/cli/x:i").unwrap();

        assert!(net.connect("/srv/x:o", "/missing", Carrier::Udp).is_err());
        assert!(net.connect("/cli/x:i", "/srv/x:o", Carrier::Udp).is_err());

        net.refuse_connections_to("/cli/x:i");
        assert!(net.connect("/srv/x:o", "/cli/x:i", Carrier::Udp).is_err());
        net.accept_connections_to("/cli/x:i");
        assert!(net.connect("/srv/x:o", "/cli/x:i", Carrier::Udp).is_ok());
        assert_eq!(net.carrier_of("/srv/x:o", "/cli/x:i"), Some(Carrier::Udp));
    }

    #[test]
    fn test_duplicate_and_invalid_names() {
        let net = LocalNetwork::new();
        let _writer = net.open_writer("/srv/x:o").unwrap();
        assert!(matches!(
            net.open_reader("/srv/x:o"),
            Err(GazeNetworkError::NameInUse(_))
        ));
        assert!(matches!(
            net.open_reader("no-slash"),
            Err(GazeNetworkError::CannotOpen(_))
        ));
    }

    #[test]
    fn test_close_drops_connections() {
        let net = LocalNetwork::new();
        let writer = net.open_writer("/srv/x:o").unwrap();
        let reader = net.open_reader("/cli/x:i").unwrap();
        net.connect("/srv/x:o", "/cli/x:i", Carrier::Udp).unwrap();

        reader.close();
        reader.close();
        assert_eq!(reader.state(), PortState::Closed);
        assert!(!net.is_open("/cli/x:i"));
        assert_eq!(net.connection_count("/srv/x:o"), 0);
        assert_eq!(writer.state(), PortState::Open);
        // Writing with nobody listening is fine
        assert!(writer.write(&Bottle::new()).is_ok());
    }

    #[test]
    fn test_drop_releases_name() {
        let net = LocalNetwork::new();
        {
            let _reader = net.open_reader("/cli/x:i").unwrap();
            assert!(net.is_open("/cli/x:i"));
        }
        assert!(!net.is_open("/cli/x:i"));
        assert!(net.open_reader("/cli/x:i").is_ok());
    }

    #[test]
    fn test_interrupted_reader_fails() {
        let net = LocalNetwork::new();
        let reader = net.open_event_reader("/cli/events:i").unwrap();
        reader.interrupt();
        assert!(matches!(
            reader.recv_timeout(Duration::from_millis(1)),
            Err(GazeNetworkError::PortClosed(_))
        ));
    }

    #[test]
    fn test_silent_responder_is_receive_failure() {
        let net = LocalNetwork::new();
        let silent: Arc<dyn RequestHandler> = Arc::new(|_: &Bottle| None);
        let _responder = net.open_responder("/srv/rpc", silent).unwrap();
        let requester = net.open_requester("/cli/rpc").unwrap();
        net.connect("/cli/rpc", "/srv/rpc", Carrier::Tcp).unwrap();
        assert!(matches!(
            requester.request(&Bottle::new(), None),
            Err(GazeNetworkError::ReceiveFailed(_))
        ));
    }
}
