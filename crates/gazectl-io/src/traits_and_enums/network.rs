// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::traits_and_enums::port::{
    EventReader, GazePort, RequestHandler, Requester, StreamReader, StreamWriter,
};
use crate::traits_and_enums::shared::Carrier;
use crate::GazeNetworkError;
use std::sync::Arc;

/// Port factory and name-based connection broker.
///
/// Ports are opened under a fully qualified name (e.g. `/app/xd:o`) and connected by name,
/// source first. A connection is directional: writers connect to readers, requesters to
/// responders.
pub trait GazeNetwork: Send + Sync {
    fn open_writer(&self, name: &str) -> Result<Box<dyn StreamWriter>, GazeNetworkError>;

    fn open_reader(&self, name: &str) -> Result<Box<dyn StreamReader>, GazeNetworkError>;

    fn open_event_reader(&self, name: &str) -> Result<Box<dyn EventReader>, GazeNetworkError>;

    fn open_requester(&self, name: &str) -> Result<Box<dyn Requester>, GazeNetworkError>;

    fn open_responder(
        &self,
        name: &str,
        handler: Arc<dyn RequestHandler>,
    ) -> Result<Box<dyn GazePort>, GazeNetworkError>;

    fn connect(&self, from: &str, to: &str, carrier: Carrier) -> Result<(), GazeNetworkError>;

    fn disconnect(&self, from: &str, to: &str) -> Result<(), GazeNetworkError>;

    fn is_connected(&self, from: &str, to: &str) -> bool;
}
