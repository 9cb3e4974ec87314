// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::{Bottle, Value};
use serde::{Deserialize, Serialize};

/// Envelope stamp attached by the sender: a sequence number plus the capture time in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Stamp {
    pub count: u32,
    pub time: f64,
}

impl Stamp {
    pub fn new(count: u32, time: f64) -> Self {
        Self { count, time }
    }

    /// A zero stamp means no sample has been stamped yet.
    pub fn is_valid(&self) -> bool {
        self.time > 0.0
    }

    /// Next stamp in a sequence, at `time`.
    pub fn next(&self, time: f64) -> Self {
        Self {
            count: self.count.wrapping_add(1),
            time,
        }
    }

    /// Parse an `(index time)` pair as carried by pose replies.
    pub fn from_bottle(pair: &Bottle) -> Option<Self> {
        let count = pair.get(0).and_then(Value::as_int32)?;
        let time = pair.get(1).and_then(Value::as_float64)?;
        Some(Self {
            count: count as u32,
            time,
        })
    }

    pub fn to_bottle(&self) -> Bottle {
        let mut pair = Bottle::new();
        pair.add_int32(self.count as i32).add_float64(self.time);
        pair
    }
}
