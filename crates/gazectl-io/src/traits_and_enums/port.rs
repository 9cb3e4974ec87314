// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::traits_and_enums::shared::{Envelope, PortKind, PortState};
use crate::GazeNetworkError;
use gazectl_structures::{Bottle, Stamp};
use std::time::Duration;

/// Common surface of every named port.
pub trait GazePort: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> PortKind;

    fn state(&self) -> PortState;

    /// Unblock any pending read or request; later operations fail with `PortClosed`.
    fn interrupt(&self);

    /// Release the port and drop all its connections. Idempotent.
    fn close(&self);
}

/// Streaming output. Writes never block and are not acknowledged.
pub trait StreamWriter: GazePort {
    /// Send `payload` to every connected reader, stamping it with the port's own sequence.
    ///
    /// Writing with no connected reader is not an error.
    fn write(&self, payload: &Bottle) -> Result<Stamp, GazeNetworkError>;

    /// Send `payload` with an explicit envelope stamp.
    fn write_stamped(&self, payload: &Bottle, stamp: Stamp) -> Result<(), GazeNetworkError>;
}

/// Latest-value streaming input.
pub trait StreamReader: GazePort {
    /// Non-blocking poll. Returns the newest sample received since the last call and discards
    /// anything older; `None` when nothing new arrived.
    fn read_latest(&self) -> Result<Option<Envelope>, GazeNetworkError>;
}

/// Strict, queued input meant to be drained by a dedicated delivery thread.
pub trait EventReader: GazePort {
    /// Wait up to `timeout` for the next message in arrival order.
    fn recv_timeout(&self, timeout: Duration) -> Result<Option<Envelope>, GazeNetworkError>;
}

/// Client side of a synchronous request/reply exchange.
///
/// A requester supports one outstanding request at a time; callers sharing one must
/// serialize access themselves.
pub trait Requester: GazePort {
    /// Send `request` and block for the reply. `None` waits as long as the transport does.
    fn request(
        &self,
        request: &Bottle,
        timeout: Option<Duration>,
    ) -> Result<Bottle, GazeNetworkError>;
}

/// Server-side request processing attached to a responder port.
pub trait RequestHandler: Send + Sync {
    /// Produce the reply for `request`, or `None` to leave the requester without an answer.
    fn respond(&self, request: &Bottle) -> Option<Bottle>;
}

impl<F> RequestHandler for F
where
    F: Fn(&Bottle) -> Option<Bottle> + Send + Sync,
{
    fn respond(&self, request: &Bottle) -> Option<Bottle> {
        self(request)
    }
}
