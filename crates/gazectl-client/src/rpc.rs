// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Verb/noun command encoding and ACK/NACK reply decoding over the control channel.

use crate::error::{GazeClientError, Result};
use gazectl_io::{GazePort, Requester};
use gazectl_structures::{Bottle, Stamp, Value, Vocab};
use parking_lot::Mutex;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::{debug, error, warn};

/// Reply tag for an accepted command.
pub const ACK: Vocab = Vocab::ACK;
/// Reply tag for a rejected command.
pub const NACK: Vocab = Vocab::NACK;

/// A command under construction: verb, optional noun, then arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    bottle: Bottle,
}

impl Command {
    pub fn new(verb: &str) -> Self {
        let mut bottle = Bottle::new();
        bottle.add_string(verb);
        Self { bottle }
    }

    pub fn get(noun: &str) -> Self {
        Self::new("get").noun(noun)
    }

    pub fn set(noun: &str) -> Self {
        Self::new("set").noun(noun)
    }

    pub fn noun(mut self, noun: &str) -> Self {
        self.bottle.add_string(noun);
        self
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.bottle.add(value);
        self
    }

    pub fn list(mut self, list: Bottle) -> Self {
        self.bottle.add_list(list);
        self
    }

    pub fn verb(&self) -> &str {
        self.bottle.get(0).and_then(Value::as_str).unwrap_or_default()
    }

    pub fn as_bottle(&self) -> &Bottle {
        &self.bottle
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.bottle)
    }
}

/// An acknowledged reply: `[ack payload? stamp?]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    command: String,
    bottle: Bottle,
}

impl Reply {
    /// Check the tag; NACK becomes `Rejected`, anything else untagged becomes `MalformedReply`.
    pub fn decode(command: &Command, bottle: Bottle) -> Result<Self> {
        match bottle.get(0).and_then(Value::as_vocab) {
            Some(tag) if tag == ACK => Ok(Self {
                command: command.to_string(),
                bottle,
            }),
            Some(tag) if tag == NACK => Err(GazeClientError::Rejected {
                command: command.to_string(),
            }),
            _ => Err(GazeClientError::malformed(
                command,
                format!("missing ACK/NACK tag in '{}'", bottle),
            )),
        }
    }

    pub fn raw(&self) -> &Bottle {
        &self.bottle
    }

    pub fn len(&self) -> usize {
        self.bottle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bottle.len() <= 1
    }

    /// Element `index` of the reply (0 is the tag).
    pub fn value(&self, index: usize) -> Result<&Value> {
        self.bottle
            .get(index)
            .ok_or_else(|| self.malformed(format!("expected an element at position {}", index)))
    }

    pub fn float_at(&self, index: usize) -> Result<f64> {
        self.value(index)?
            .as_float64()
            .ok_or_else(|| self.malformed(format!("element {} is not a number", index)))
    }

    pub fn int_at(&self, index: usize) -> Result<i32> {
        self.value(index)?
            .as_int32()
            .ok_or_else(|| self.malformed(format!("element {} is not an integer", index)))
    }

    pub fn float(&self) -> Result<f64> {
        self.float_at(1)
    }

    /// Integer payload read as a flag (`> 0`).
    pub fn flag(&self) -> Result<bool> {
        Ok(self.int_at(1)? > 0)
    }

    pub fn list(&self) -> Result<&Bottle> {
        self.value(1)?
            .as_list()
            .ok_or_else(|| self.malformed("payload is not a list"))
    }

    pub fn floats(&self) -> Result<Vec<f64>> {
        self.list()?
            .to_f64_vec()
            .ok_or_else(|| self.malformed("payload list is not numeric"))
    }

    /// Trailing `(count time)` pair, when the server sent one.
    pub fn stamp(&self) -> Option<Stamp> {
        self.bottle
            .get(2)
            .and_then(Value::as_list)
            .and_then(Stamp::from_bottle)
    }

    pub fn malformed(&self, reason: impl Into<String>) -> GazeClientError {
        GazeClientError::malformed(&self.command, reason)
    }
}

/// The control channel: one exchange at a time.
pub struct RpcChannel {
    requester: Mutex<Box<dyn Requester>>,
    timeout: Option<Duration>,
}

impl RpcChannel {
    pub fn new(requester: Box<dyn Requester>, timeout: Option<Duration>) -> Self {
        Self {
            requester: Mutex::new(requester),
            timeout,
        }
    }

    /// Send `command` and return the raw reply, whatever its tag.
    pub fn send(&self, command: &Command) -> Result<Bottle> {
        debug!("[RPC] -> {}", command);
        let reply = {
            let requester = self.requester.lock();
            requester.request(command.as_bottle(), self.timeout)
        };
        match reply {
            Ok(reply) => {
                debug!("[RPC] <- {}", reply);
                Ok(reply)
            }
            Err(e) => {
                error!("[RPC] unable to get reply from server for '{}': {}", command, e);
                Err(GazeClientError::Transport(e))
            }
        }
    }

    /// Send `command` and require an ACK.
    pub fn call(&self, command: &Command) -> Result<Reply> {
        let reply = Reply::decode(command, self.send(command)?);
        if let Err(e) = &reply {
            warn!("[RPC] {}", e);
        }
        reply
    }

    pub fn interrupt(&self) {
        self.requester.lock().interrupt();
    }

    pub fn close(&self) {
        self.requester.lock().close();
    }

    pub fn state(&self) -> gazectl_io::PortState {
        self.requester.lock().state()
    }
}
