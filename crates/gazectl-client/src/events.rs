// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Event keys, handlers and the dispatch table fed by the event channel.

use gazectl_structures::{Bottle, Value};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Key of the handler invoked for every event.
pub const WILDCARD: &str = "*";

/// The one event type that carries a checkpoint.
pub const MOTION_ONGOING: &str = "motion-ongoing";

pub const MOTION_ONSET: &str = "motion-onset";
pub const MOTION_DONE: &str = "motion-done";
pub const SACCADE_ONSET: &str = "saccade-onset";
pub const SACCADE_DONE: &str = "saccade-done";
pub const CLOSING: &str = "closing";

/// Checkpoint used when none is given for `motion-ongoing`.
pub const DEFAULT_CHECKPOINT: f64 = 0.5;

/// Lookup key of the dispatch table: a bare type, or `type-checkpoint` for `motion-ongoing`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventKey(String);

impl EventKey {
    pub fn for_type(event_type: &str) -> Self {
        EventKey(event_type.to_string())
    }

    pub fn with_checkpoint(event_type: &str, checkpoint: f64) -> Self {
        EventKey(format!("{}-{}", event_type, checkpoint))
    }

    pub fn wildcard() -> Self {
        Self::for_type(WILDCARD)
    }

    pub fn is_wildcard(&self) -> bool {
        self.0 == WILDCARD
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checkpoint carried by a `motion-ongoing` key.
    pub fn checkpoint(&self) -> Option<f64> {
        self.0
            .strip_prefix(MOTION_ONGOING)?
            .strip_prefix('-')?
            .parse()
            .ok()
    }
}

impl Display for EventKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a handler subscribes to.
#[derive(Debug, Clone, PartialEq)]
pub struct EventParameters {
    pub event_type: String,
    /// Only meaningful for `motion-ongoing`
    pub checkpoint: f64,
}

impl EventParameters {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            checkpoint: DEFAULT_CHECKPOINT,
        }
    }

    pub fn wildcard() -> Self {
        Self::new(WILDCARD)
    }

    pub fn motion_ongoing(checkpoint: f64) -> Self {
        Self {
            event_type: MOTION_ONGOING.to_string(),
            checkpoint,
        }
    }

    /// Whether the server has to be told about the subscription.
    pub fn is_parameterized(&self) -> bool {
        self.event_type == MOTION_ONGOING
    }

    pub fn key(&self) -> EventKey {
        if self.is_parameterized() {
            EventKey::with_checkpoint(&self.event_type, self.checkpoint)
        } else {
            EventKey::for_type(&self.event_type)
        }
    }
}

/// Immutable snapshot of one event, handed to every matching handler.
#[derive(Debug, Clone, PartialEq)]
pub struct GazeEvent {
    pub event_type: String,
    pub time: f64,
    /// Present for `motion-ongoing` only
    pub checkpoint: Option<f64>,
}

impl GazeEvent {
    /// Parse `[type time checkpoint?]`. Returns `None` when the type is missing.
    pub fn from_bottle(message: &Bottle) -> Option<Self> {
        let event_type = message.get(0).and_then(Value::as_str)?.to_string();
        let time = message.get(1).and_then(Value::as_float64).unwrap_or(0.0);
        let checkpoint = if event_type == MOTION_ONGOING {
            message
                .get(2)
                .and_then(Value::as_float64)
                .filter(|cp| *cp >= 0.0)
        } else {
            None
        };
        Some(Self {
            event_type,
            time,
            checkpoint,
        })
    }

    pub fn to_bottle(&self) -> Bottle {
        let mut message = Bottle::new();
        message.add_string(self.event_type.as_str()).add_float64(self.time);
        if let Some(checkpoint) = self.checkpoint {
            message.add_float64(checkpoint);
        }
        message
    }

    /// Key of the type-specific handler for this event.
    pub fn key(&self) -> EventKey {
        match self.checkpoint {
            Some(checkpoint) => EventKey::with_checkpoint(&self.event_type, checkpoint),
            None => EventKey::for_type(&self.event_type),
        }
    }
}

/// Callback invoked from the event delivery thread.
///
/// Handlers must not block for long: events queue up behind them.
pub trait GazeEventHandler: Send + Sync {
    fn on_event(&self, event: &GazeEvent);
}

impl<F> GazeEventHandler for F
where
    F: Fn(&GazeEvent) + Send + Sync,
{
    fn on_event(&self, event: &GazeEvent) {
        self(event)
    }
}

/// Event key -> handler table shared between the caller and the delivery thread.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: RwLock<HashMap<EventKey, Arc<dyn GazeEventHandler>>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `handler` under `key`, replacing any previous one.
    pub fn insert(&self, key: EventKey, handler: Arc<dyn GazeEventHandler>) {
        self.handlers.write().insert(key, handler);
    }

    pub fn remove(&self, key: &EventKey) -> Option<Arc<dyn GazeEventHandler>> {
        self.handlers.write().remove(key)
    }

    pub fn contains(&self, key: &EventKey) -> bool {
        self.handlers.read().contains_key(key)
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<EventKey> {
        let mut keys: Vec<EventKey> = self.handlers.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.handlers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.read().is_empty()
    }

    pub fn clear(&self) {
        self.handlers.write().clear();
    }

    /// Invoke the wildcard handler, then the type-specific one. Returns how many ran.
    ///
    /// Handlers run after the table lock is released, so they may register or unregister.
    pub fn dispatch(&self, event: &GazeEvent) -> usize {
        let targets: Vec<Arc<dyn GazeEventHandler>> = {
            let handlers = self.handlers.read();
            [EventKey::wildcard(), event.key()]
                .iter()
                .filter_map(|key| handlers.get(key).cloned())
                .collect()
        };
        for handler in &targets {
            handler.on_event(event);
        }
        targets.len()
    }
}
