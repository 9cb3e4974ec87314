// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Client-side mirror of the contexts the server stored for this client.

use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Identifier the server issues on `stor`. `0` is the default context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(pub u32);

impl ContextId {
    pub const DEFAULT: ContextId = ContextId(0);

    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }

    /// Wire form; ids beyond `i32::MAX` are never issued.
    pub fn to_wire(self) -> i32 {
        i32::try_from(self.0).unwrap_or(i32::MAX)
    }

    pub fn from_wire(raw: i32) -> Option<Self> {
        u32::try_from(raw).ok().map(ContextId)
    }
}

impl Display for ContextId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Set of outstanding context ids. The default context is never tracked.
#[derive(Debug, Default)]
pub struct ContextStack {
    ids: Mutex<BTreeSet<ContextId>>,
}

impl ContextStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a freshly issued id. Returns `false` for the default id or a duplicate.
    pub fn insert(&self, id: ContextId) -> bool {
        !id.is_default() && self.ids.lock().insert(id)
    }

    pub fn contains(&self, id: ContextId) -> bool {
        self.ids.lock().contains(&id)
    }

    /// Restorable ids: the default one plus everything tracked.
    pub fn is_restorable(&self, id: ContextId) -> bool {
        id.is_default() || self.contains(id)
    }

    pub fn remove(&self, id: ContextId) -> bool {
        self.ids.lock().remove(&id)
    }

    /// Tracked ids in ascending order.
    pub fn ids(&self) -> Vec<ContextId> {
        self.ids.lock().iter().copied().collect()
    }

    pub fn clear(&self) {
        self.ids.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.ids.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context_never_tracked() {
        let stack = ContextStack::new();
        assert!(!stack.insert(ContextId::DEFAULT));
        assert!(stack.is_empty());
        assert!(stack.is_restorable(ContextId::DEFAULT));
    }

    #[test]
    fn test_ids_unique_and_removed_once() {
        let stack = ContextStack::new();
        assert!(stack.insert(ContextId(1)));
        assert!(!stack.insert(ContextId(1)));
        assert!(stack.insert(ContextId(3)));
        assert_eq!(stack.ids(), vec![ContextId(1), ContextId(3)]);

        assert!(stack.is_restorable(ContextId(3)));
        assert!(!stack.is_restorable(ContextId(2)));

        assert!(stack.remove(ContextId(1)));
        assert!(!stack.remove(ContextId(1)));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_wire_conversion() {
        assert_eq!(ContextId::from_wire(4), Some(ContextId(4)));
        assert_eq!(ContextId::from_wire(-1), None);
        assert_eq!(ContextId(9).to_wire(), 9);
    }
}
