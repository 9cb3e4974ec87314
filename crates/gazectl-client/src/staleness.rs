// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Latest-value caching with a freshness window for streaming inputs.

use crate::error::Result;
use gazectl_io::{GazePort, StreamReader};
use gazectl_structures::{Bottle, Stamp};
use parking_lot::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

/// Last sample seen on a streaming input.
#[derive(Debug, Clone, PartialEq)]
pub struct StampedSample<T> {
    pub value: T,
    pub stamp: Stamp,
    /// Local arrival time; `None` until the first sample shows up
    pub arrival: Option<Instant>,
}

/// What a state read hands back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct StateReading<T> {
    pub value: T,
    pub stamp: Stamp,
    /// Whether `value` arrived within the freshness window
    pub fresh: bool,
}

pub struct StalenessTracker<T> {
    initial: T,
    sample: Mutex<StampedSample<T>>,
}

impl<T: Clone> StalenessTracker<T> {
    pub fn new(initial: T) -> Self {
        Self {
            sample: Mutex::new(StampedSample {
                value: initial.clone(),
                stamp: Stamp::default(),
                arrival: None,
            }),
            initial,
        }
    }

    /// Fold in `update` (if any) as arriving at `now`, then report the cached value.
    pub fn observe(
        &self,
        update: Option<(T, Stamp)>,
        now: Instant,
        window: Duration,
    ) -> StateReading<T> {
        let mut sample = self.sample.lock();
        if let Some((value, stamp)) = update {
            sample.value = value;
            sample.stamp = stamp;
            sample.arrival = Some(now);
        }
        StateReading {
            value: sample.value.clone(),
            stamp: sample.stamp,
            fresh: is_fresh(sample.arrival, now, window),
        }
    }

    /// Drain `reader` without blocking and report the cached value.
    ///
    /// Payloads `decode` rejects are dropped and leave the cache untouched.
    pub fn poll(
        &self,
        reader: &dyn StreamReader,
        decode: impl Fn(&Bottle) -> Option<T>,
        now: Instant,
        window: Duration,
    ) -> Result<StateReading<T>> {
        let update = match reader.read_latest()? {
            Some(envelope) => match decode(&envelope.payload) {
                Some(value) => Some((value, envelope.stamp)),
                None => {
                    debug!(
                        "[STATE] dropping malformed sample on {}: {}",
                        reader.name(),
                        envelope.payload
                    );
                    None
                }
            },
            None => None,
        };
        Ok(self.observe(update, now, window))
    }

    pub fn has_sample(&self) -> bool {
        self.sample.lock().arrival.is_some()
    }

    pub fn snapshot(&self) -> StampedSample<T> {
        self.sample.lock().clone()
    }

    /// Back to the initial value with no arrival recorded.
    pub fn reset(&self) {
        let mut sample = self.sample.lock();
        sample.value = self.initial.clone();
        sample.stamp = Stamp::default();
        sample.arrival = None;
    }
}

/// `now - arrival < window`; never fresh before the first arrival.
pub fn is_fresh(arrival: Option<Instant>, now: Instant, window: Duration) -> bool {
    arrival
        .map(|arrival| now.saturating_duration_since(arrival) < window)
        .unwrap_or(false)
}
