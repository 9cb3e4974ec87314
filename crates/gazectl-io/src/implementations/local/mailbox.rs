// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Bounded byte queue behind every local input port. When full, the oldest message is dropped.
pub(crate) struct Mailbox {
    queue: Mutex<VecDeque<Vec<u8>>>,
    ready: Condvar,
    capacity: usize,
    interrupted: AtomicBool,
}

/// Returned when the owning port was interrupted while waiting.
pub(crate) struct Interrupted;

impl Mailbox {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            queue: Mutex::new(VecDeque::with_capacity(capacity.min(64))),
            ready: Condvar::new(),
            capacity: capacity.max(1),
            interrupted: AtomicBool::new(false),
        }
    }

    /// Returns `true` if an older message had to be dropped to make room.
    pub(crate) fn push(&self, bytes: Vec<u8>) -> bool {
        let mut queue = self.queue.lock();
        let mut dropped = false;
        while queue.len() >= self.capacity {
            queue.pop_front();
            dropped = true;
        }
        queue.push_back(bytes);
        self.ready.notify_one();
        dropped
    }

    /// Newest message, discarding everything older.
    pub(crate) fn take_latest(&self) -> Option<Vec<u8>> {
        let mut queue = self.queue.lock();
        let latest = queue.pop_back();
        queue.clear();
        latest
    }

    /// Oldest message, waiting up to `timeout` for one to arrive.
    pub(crate) fn pop_timeout(&self, timeout: Duration) -> Result<Option<Vec<u8>>, Interrupted> {
        let deadline = Instant::now() + timeout;
        let mut queue = self.queue.lock();
        loop {
            if self.interrupted.load(Ordering::Acquire) {
                return Err(Interrupted);
            }
            if let Some(bytes) = queue.pop_front() {
                return Ok(Some(bytes));
            }
            if self.ready.wait_until(&mut queue, deadline).timed_out() {
                if self.interrupted.load(Ordering::Acquire) {
                    return Err(Interrupted);
                }
                return Ok(queue.pop_front());
            }
        }
    }

    pub(crate) fn interrupt(&self) {
        self.interrupted.store(true, Ordering::Release);
        let _queue = self.queue.lock();
        self.ready.notify_all();
    }
}
