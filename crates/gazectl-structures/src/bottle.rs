// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Ordered, heterogeneous parameter list.
//!
//! Every command, reply, streamed sample and event exchanged with the gaze server is a
//! `Bottle`: a flat sequence of [`Value`]s where any item may itself be a nested list.
//! Key/value properties are expressed as nested two-item lists, e.g. `(server_version 1.2)`,
//! and looked up with [`Bottle::find`].

use crate::{Value, Vocab};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bottle {
    items: Vec<Value>,
}

impl Bottle {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a list of floats, e.g. a fixation point or a joint vector.
    pub fn from_f64s<I: IntoIterator<Item = f64>>(values: I) -> Self {
        Self {
            items: values.into_iter().map(Value::Float64).collect(),
        }
    }

    pub fn add(&mut self, value: impl Into<Value>) -> &mut Self {
        self.items.push(value.into());
        self
    }

    pub fn add_string(&mut self, value: impl Into<String>) -> &mut Self {
        self.items.push(Value::String(value.into()));
        self
    }

    pub fn add_float64(&mut self, value: f64) -> &mut Self {
        self.items.push(Value::Float64(value));
        self
    }

    pub fn add_int32(&mut self, value: i32) -> &mut Self {
        self.items.push(Value::Int32(value));
        self
    }

    pub fn add_vocab(&mut self, value: Vocab) -> &mut Self {
        self.items.push(Value::Vocab(value));
        self
    }

    /// Append an already built nested list.
    pub fn add_list(&mut self, list: Bottle) -> &mut Self {
        self.items.push(Value::List(list));
        self
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// Look up `key` among nested `(key value)` lists and return the value.
    pub fn find(&self, key: &str) -> Option<&Value> {
        self.items
            .iter()
            .filter_map(Value::as_list)
            .find(|entry| entry.get(0).and_then(Value::as_str) == Some(key))
            .and_then(|entry| entry.get(1))
    }

    pub fn check(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// All items as floats, or `None` if any item is not numeric.
    pub fn to_f64_vec(&self) -> Option<Vec<f64>> {
        self.items.iter().map(Value::as_float64).collect()
    }
}

impl Display for Bottle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", item)?;
        }
        Ok(())
    }
}

impl FromIterator<Value> for Bottle {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Bottle {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_display() {
        let mut cmd = Bottle::new();
        cmd.add_string("look")
            .add_string("3D")
            .add_list(Bottle::from_f64s([1.0, 2.0, 3.0]));
        assert_eq!(cmd.len(), 3);
        assert_eq!(cmd.to_string(), "look 3D (1.0 2.0 3.0)");
    }

    #[test]
    fn test_find_property_entries() {
        let mut version = Bottle::new();
        version.add_string("server_version").add_float64(1.2);
        let mut events = Bottle::new();
        events.add_string("events").add_list({
            let mut list = Bottle::new();
            list.add_string("motion-onset").add_string("*");
            list
        });
        let mut info = Bottle::new();
        info.add_list(version).add_list(events);

        assert!(info.check("server_version"));
        assert_eq!(info.find("server_version").and_then(Value::as_float64), Some(1.2));
        assert_eq!(
            info.find("events").and_then(Value::as_list).map(Bottle::len),
            Some(2)
        );
        assert!(!info.check("missing"));
    }

    #[test]
    fn test_to_f64_vec_rejects_non_numeric() {
        let mut mixed = Bottle::new();
        mixed.add_float64(1.0).add_string("ver");
        assert!(mixed.to_f64_vec().is_none());

        let mut ints = Bottle::new();
        ints.add_int32(1).add_float64(2.5);
        assert_eq!(ints.to_f64_vec(), Some(vec![1.0, 2.5]));
    }
}
