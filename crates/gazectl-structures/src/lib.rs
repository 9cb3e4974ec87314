// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The core data crate for gazectl. Defines the tagged list structure exchanged with a gaze
//! server (`Bottle`), its scalar items (`Value`, `Vocab`), the envelope stamp attached to
//! streamed samples, and the byte codec used to move them across a transport.

mod bottle;
pub mod codec;
mod error;
mod stamp;
mod value;

pub use bottle::Bottle;
pub use error::GazeDataError;
pub use stamp::Stamp;
pub use value::{Value, Vocab};

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
