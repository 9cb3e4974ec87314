// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # gazectl-observability
//!
//! Logging setup shared by every gazectl binary, with per-crate debug flags.
//!
//! ## Features
//! - `file-logging`: timestamped run folders with one log file per run (desktop only)

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

pub use cli::*;
pub use config::*;
pub use init::*;

/// Known gazectl crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "gazectl",
    "gazectl-structures",
    "gazectl-io",
    "gazectl-config",
    "gazectl-client",
];
