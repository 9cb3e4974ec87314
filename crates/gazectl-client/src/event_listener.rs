// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Background delivery of the event channel into the dispatch table

use crate::error::{GazeClientError, Result};
use crate::events::{EventDispatcher, GazeEvent};
use gazectl_io::{EventReader, GazeNetworkError, GazePort};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// How long one wait on the event channel lasts before the running flag is checked again.
pub const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Event delivery thread
pub struct EventListener {
    /// Event input port (shared with the thread)
    reader: Arc<dyn EventReader>,

    /// Running flag
    running: Arc<AtomicBool>,

    /// Thread handle
    thread: Option<JoinHandle<()>>,
}

impl EventListener {
    /// Spawn the delivery thread.
    pub fn start(reader: Arc<dyn EventReader>, dispatcher: Arc<EventDispatcher>) -> Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let thread = {
            let reader = Arc::clone(&reader);
            let running = Arc::clone(&running);
            thread::Builder::new()
                .name("gazectl-events".to_string())
                .spawn(move || Self::run(reader.as_ref(), &dispatcher, &running))
                .map_err(|e| {
                    GazeClientError::Transport(GazeNetworkError::GeneralFailure(format!(
                        "Failed to spawn event thread: {}",
                        e
                    )))
                })?
        };

        Ok(Self {
            reader,
            running,
            thread: Some(thread),
        })
    }

    fn run(reader: &dyn EventReader, dispatcher: &EventDispatcher, running: &AtomicBool) {
        debug!("[EVENTS] delivery started on {}", reader.name());
        while running.load(Ordering::Acquire) {
            match reader.recv_timeout(EVENT_POLL_INTERVAL) {
                Ok(Some(envelope)) => match GazeEvent::from_bottle(&envelope.payload) {
                    Some(event) => {
                        let invoked = dispatcher.dispatch(&event);
                        trace!("[EVENTS] {} -> {} handler(s)", event.key(), invoked);
                    }
                    None => debug!("[EVENTS] ignoring malformed event: {}", envelope.payload),
                },
                Ok(None) => {}
                Err(GazeNetworkError::PortClosed(_)) => break,
                Err(e) => {
                    warn!("[EVENTS] receive failed: {}", e);
                    thread::sleep(EVENT_POLL_INTERVAL);
                }
            }
        }
        debug!("[EVENTS] delivery stopped on {}", reader.name());
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire) && self.thread.is_some()
    }

    fn thread_id(&self) -> Option<ThreadId> {
        self.thread.as_ref().map(|t| t.thread().id())
    }

    /// Stop delivery: clear the running flag, interrupt the port, join the thread.
    ///
    /// When called from a handler (i.e. on the delivery thread itself) the join is skipped.
    pub fn stop(&mut self) {
        if self.thread.is_none() {
            return;
        }
        self.running.store(false, Ordering::Release);
        self.reader.interrupt();

        if self.thread_id() == Some(thread::current().id()) {
            debug!("[EVENTS] stop requested from a handler; thread will exit on return");
            self.thread = None;
            return;
        }
        if let Some(thread) = self.thread.take() {
            if let Err(e) = thread.join() {
                warn!("[EVENTS] delivery thread panicked: {:?}", e);
            }
        }
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        self.stop();
    }
}
