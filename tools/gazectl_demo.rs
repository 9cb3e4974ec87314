// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Gaze Client Demo

Runs a simulated gaze server in-process and drives it through a short session:
handshake, context snapshot, a few look commands, state reads and events.

Usage:
  cargo run --bin gazectl_demo -- [--config <gazectl.toml>] [--debug-all | --debug-<crate>]

Example:
  cargo run --bin gazectl_demo -- --debug-gazectl-client

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use anyhow::{Context, Result};
use gazectl::client::{ChannelId, EventParameters, GazeEvent, Tunable};
use gazectl::config::{apply_environment_overrides, load_config, validate_config, GazectlConfig};
use gazectl::observability::{init_logging, CrateDebugFlags};
use gazectl::prelude::*;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let debug_flags = CrateDebugFlags::from_args(args.iter().skip(1).cloned());
    init_logging(&debug_flags)?;

    let config = load_demo_config(&args)?;
    let client_config = config.client;
    let remote = client_config
        .remote
        .clone()
        .context("client.remote is required")?;

    println!("👁  gazectl demo");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📡 Server: {}", remote);
    println!(
        "📡 Client: {}",
        client_config.local.as_deref().unwrap_or("<unset>")
    );
    println!();

    let network = Arc::new(LocalNetwork::new());
    let server = SimulatedGazeServer::start(network.as_ref(), &remote)?;
    let mut client = GazeClient::connect(network.clone(), &client_config)?;
    info!("connected, server version {:?}", client.server_info().version());

    client.on_event(&EventParameters::wildcard(), |event: &GazeEvent| {
        println!("   🔔 event {} at t={:.3}", event.event_type, event.time);
    })?;
    client.register_event(
        &EventParameters::motion_ongoing(0.5),
        Arc::new(|event: &GazeEvent| {
            println!("   🔔 halfway through motion (checkpoint {:?})", event.checkpoint);
        }),
    )?;

    println!("💾 Storing the startup context...");
    let startup = client.store_context()?;
    println!("   ✅ context {}", startup);

    println!("🔧 Tuning the controller...");
    client.set_tracking_mode(true)?;
    client.set_tunable(Tunable::NeckTrajTime, 1.2)?;
    client.bind_neck_pitch(-20.0, 10.0)?;
    let (min, max) = client.get_neck_pitch_range()?;
    println!("   ✅ neck pitch bound to [{}, {}]", min, max);

    println!("🎯 Looking around...");
    client.look_at_abs_angles(&[10.0, 0.0, 5.0])?;
    if let Some(command) = server.take_command(ChannelId::AnglesCommand)? {
        println!("   server received: {}", command);
    }
    server.publish_angles(&[10.0, 0.0, 5.0])?;
    let angles = client.get_angles()?;
    println!("   angles {:?} (fresh: {})", angles.value, angles.fresh);

    client.look_at_fixation_point_sync(&[-0.5, 0.1, 0.3])?;
    server.emit_motion_ongoing(0.1)?;
    let settled = client.wait_motion_done(Duration::from_millis(20), Duration::from_secs(1))?;
    println!("   motion settled: {}", settled);

    let pose = client.get_head_pose()?;
    println!("   head at {:?}, orientation {:?}", pose.position, pose.orientation);

    println!("↩️  Restoring the startup context...");
    client.restore_context(startup)?;
    println!("   tracking mode: {}", client.get_tracking_mode()?);

    // Give the event thread a moment to print before tearing down
    std::thread::sleep(Duration::from_millis(50));

    client.close()?;
    println!();
    println!("✅ Session closed; server holds {} contexts", server.contexts().len());
    Ok(())
}

fn load_demo_config(args: &[String]) -> Result<GazectlConfig> {
    let config_path = args
        .iter()
        .position(|arg| arg == "--config")
        .and_then(|index| args.get(index + 1))
        .map(PathBuf::from);

    let config = match config_path {
        Some(path) => load_config(Some(path.as_path()), None)
            .with_context(|| format!("loading {}", path.display()))?,
        None => {
            let mut config = GazectlConfig {
                client: GazeClientConfig::new("/gaze", "/app").with_timeout(0.2),
            };
            apply_environment_overrides(&mut config);
            config
        }
    };
    validate_config(&config)?;
    Ok(config)
}
