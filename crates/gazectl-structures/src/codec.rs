// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Byte codec for anything that crosses a transport.
//!
//! The encoding is JSON; receivers never inspect it beyond decoding back into the typed
//! structure, so it can be swapped without touching the protocol engine.

use crate::GazeDataError;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, GazeDataError> {
    serde_json::to_vec(value).map_err(|e| GazeDataError::SerializationError(e.to_string()))
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, GazeDataError> {
    serde_json::from_slice(bytes).map_err(|e| GazeDataError::DeserializationError(e.to_string()))
}
