// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::Bottle;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A short tag (up to four ASCII characters) packed into a `u32`, first character in the
/// lowest byte. Reply tags such as `ack`/`nack` travel as vocabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vocab(u32);

impl Vocab {
    pub const ACK: Vocab = Vocab::encode("ack");
    pub const NACK: Vocab = Vocab::encode("nack");

    /// Pack up to the first four bytes of `tag`. Longer tags are truncated.
    pub const fn encode(tag: &str) -> Vocab {
        let bytes = tag.as_bytes();
        let mut code = 0u32;
        let mut i = 0;
        while i < bytes.len() && i < 4 {
            code |= (bytes[i] as u32) << (8 * i);
            i += 1;
        }
        Vocab(code)
    }

    pub const fn from_raw(code: u32) -> Vocab {
        Vocab(code)
    }

    pub const fn raw(&self) -> u32 {
        self.0
    }

    pub fn decode(&self) -> String {
        self.0
            .to_le_bytes()
            .iter()
            .take_while(|b| **b != 0)
            .map(|b| *b as char)
            .collect()
    }
}

impl Display for Vocab {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.decode())
    }
}

/// A single item of a [`Bottle`].
///
/// An integer reads fine as a float. A float reads as an integer only when it is integral and
/// fits in an `i32`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Int32(i32),
    Float64(f64),
    String(String),
    Vocab(Vocab),
    List(Bottle),
}

impl Value {
    pub fn as_float64(&self) -> Option<f64> {
        match self {
            Value::Float64(v) => Some(*v),
            Value::Int32(v) => Some(f64::from(*v)),
            _ => None,
        }
    }

    pub fn as_int32(&self) -> Option<i32> {
        match self {
            Value::Int32(v) => Some(*v),
            Value::Float64(v)
                if v.fract() == 0.0 && *v >= f64::from(i32::MIN) && *v <= f64::from(i32::MAX) =>
            {
                Some(*v as i32)
            }
            _ => None,
        }
    }

    /// Numeric flags: anything strictly positive is `true`.
    pub fn as_bool(&self) -> Option<bool> {
        self.as_float64().map(|v| v > 0.0)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_vocab(&self) -> Option<Vocab> {
        match self {
            Value::Vocab(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Bottle> {
        match self {
            Value::List(b) => Some(b),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int32(_) | Value::Float64(_))
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int32(v) => write!(f, "{}", v),
            Value::Float64(v) => write!(f, "{:?}", v),
            Value::String(s) => {
                if s.is_empty() || s.contains(char::is_whitespace) {
                    write!(f, "{:?}", s)
                } else {
                    write!(f, "{}", s)
                }
            }
            Value::Vocab(v) => write!(f, "{}", v),
            Value::List(b) => write!(f, "({})", b),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Int32(i32::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vocab> for Value {
    fn from(v: Vocab) -> Self {
        Value::Vocab(v)
    }
}

impl From<Bottle> for Value {
    fn from(v: Bottle) -> Self {
        Value::List(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocab_encode_decode() {
        assert_eq!(Vocab::ACK.decode(), "ack");
        assert_eq!(Vocab::NACK.decode(), "nack");
        assert_ne!(Vocab::ACK, Vocab::NACK);
        // Truncated to four characters
        assert_eq!(Vocab::encode("stored").decode(), "stor");
    }

    #[test]
    fn test_vocab_packs_first_char_lowest() {
        assert_eq!(Vocab::encode("a").raw(), 0x61);
        assert_eq!(Vocab::encode("ab").raw(), 0x6261);
    }

    #[test]
    fn test_numeric_accessors() {
        assert_eq!(Value::Int32(3).as_float64(), Some(3.0));
        assert_eq!(Value::Float64(2.0).as_int32(), Some(2));
        assert_eq!(Value::Float64(-7.0).as_int32(), Some(-7));
        assert_eq!(Value::Float64(2.9).as_int32(), None);
        assert_eq!(Value::Float64(1e12).as_int32(), None);
        assert_eq!(Value::Float64(f64::NAN).as_int32(), None);
        assert_eq!(Value::String("x".into()).as_float64(), None);
        assert_eq!(Value::Int32(1).as_bool(), Some(true));
        assert_eq!(Value::Int32(0).as_bool(), Some(false));
        assert_eq!(Value::Float64(0.5).as_bool(), Some(true));
    }
}
