// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Simulated gaze server
//!
//! Opens the nine server-side endpoints on any [`GazeNetwork`] and answers the control
//! protocol from an in-memory state table. Used by the integration tests and the demo.

mod responder;

use crate::channels::ChannelId;
use crate::events::GazeEvent;
use crate::types::{ControlMode, NeckJoint, Tunable};
use gazectl_io::{GazeNetwork, GazeNetworkError, GazePort, StreamReader, StreamWriter};
use gazectl_structures::{Bottle, Stamp};
use parking_lot::Mutex;
use responder::SimState;
use std::sync::Arc;
use tracing::{debug, info};

/// In-process stand-in for a gaze controller server.
///
/// # Example
/// ```ignore
/// let network = Arc::new(LocalNetwork::new());
/// let server = SimulatedGazeServer::start(network.as_ref(), "/gaze")?;
/// let client = GazeClient::connect(network, &GazeClientConfig::new("/gaze", "/app"))?;
///
/// server.publish_angles(&[10.0, 0.0, 5.0])?;
/// ```
pub struct SimulatedGazeServer {
    prefix: String,
    state: Arc<Mutex<SimState>>,
    rpc: Box<dyn GazePort>,
    fixation_cmd: Box<dyn StreamReader>,
    angles_cmd: Box<dyn StreamReader>,
    mono_cmd: Box<dyn StreamReader>,
    stereo_cmd: Box<dyn StreamReader>,
    fixation_state: Box<dyn StreamWriter>,
    angles_state: Box<dyn StreamWriter>,
    head_state: Box<dyn StreamWriter>,
    events: Box<dyn StreamWriter>,
}

impl SimulatedGazeServer {
    /// Open every server endpoint under `prefix`.
    pub fn start(network: &dyn GazeNetwork, prefix: &str) -> Result<Self, GazeNetworkError> {
        let state = Arc::new(Mutex::new(SimState::default()));
        let name = |id: ChannelId| format!("{}{}", prefix, id.remote_suffix());

        let handler_state = Arc::clone(&state);
        let rpc = network.open_responder(
            &name(ChannelId::Rpc),
            Arc::new(move |request: &Bottle| handler_state.lock().respond(request)),
        )?;

        let server = Self {
            prefix: prefix.to_string(),
            rpc,
            fixation_cmd: network.open_reader(&name(ChannelId::FixationCommand))?,
            angles_cmd: network.open_reader(&name(ChannelId::AnglesCommand))?,
            mono_cmd: network.open_reader(&name(ChannelId::MonoCommand))?,
            stereo_cmd: network.open_reader(&name(ChannelId::StereoCommand))?,
            fixation_state: network.open_writer(&name(ChannelId::FixationState))?,
            angles_state: network.open_writer(&name(ChannelId::AnglesState))?,
            head_state: network.open_writer(&name(ChannelId::HeadState))?,
            events: network.open_writer(&name(ChannelId::Events))?,
            state,
        };
        info!("[SIM] gaze server listening on {}", prefix);
        Ok(server)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Full name of the server endpoint that `id` connects to.
    pub fn endpoint(&self, id: ChannelId) -> String {
        format!("{}{}", self.prefix, id.remote_suffix())
    }

    /// Version reported by `get info`; `None` leaves it out entirely.
    pub fn set_version(&self, version: Option<f64>) {
        self.state.lock().version = version;
    }

    /// NACK every request matching `rule`: a bare verb (`"stor"`) or `"verb noun"`.
    pub fn reject(&self, rule: &str) {
        self.state.lock().rejected.insert(rule.to_string());
    }

    pub fn accept(&self, rule: &str) {
        self.state.lock().rejected.remove(rule);
    }

    /// Stop replying to requests altogether.
    pub fn set_silent(&self, silent: bool) {
        self.state.lock().silent = silent;
    }

    /// Number of `get done`/`get sdon` polls that report "moving" after each motion.
    pub fn set_settle_polls(&self, polls: u32) {
        self.state.lock().settle_polls = polls;
    }

    /// Start a motion as if a streaming command had arrived.
    pub fn start_motion(&self) {
        self.state.lock().start_motion();
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<Bottle> {
        self.state.lock().requests.clone()
    }

    /// How many requests started with `verb`.
    pub fn request_count(&self, verb: &str) -> usize {
        self.state
            .lock()
            .requests
            .iter()
            .filter(|r| r.get(0).and_then(|v| v.as_str()) == Some(verb))
            .count()
    }

    pub fn clear_requests(&self) {
        self.state.lock().requests.clear();
    }

    /// Ids of the contexts currently held.
    pub fn contexts(&self) -> Vec<i32> {
        self.state.lock().contexts.keys().copied().collect()
    }

    /// `motion-ongoing` checkpoints currently registered.
    pub fn checkpoints(&self) -> Vec<f64> {
        self.state.lock().checkpoints.clone()
    }

    pub fn mode(&self, mode: ControlMode) -> Option<bool> {
        self.state.lock().settings.modes.get(mode.noun()).copied()
    }

    pub fn tunable(&self, tunable: Tunable) -> Option<f64> {
        self.state.lock().settings.tunables.get(tunable.noun()).copied()
    }

    pub fn neck_range(&self, joint: NeckJoint) -> Option<(f64, f64)> {
        self.state.lock().settings.ranges.get(joint.as_str()).copied()
    }

    pub fn blocked_vergence(&self) -> Option<f64> {
        self.state.lock().settings.blocked_vergence
    }

    /// Last fixation point accepted through `look 3D`.
    pub fn fixation_target(&self) -> Vec<f64> {
        self.state.lock().fixation_point.clone()
    }

    /// Newest command received on a streaming command channel since the last call.
    pub fn take_command(&self, id: ChannelId) -> Result<Option<Bottle>, GazeNetworkError> {
        let reader = match id {
            ChannelId::FixationCommand => &self.fixation_cmd,
            ChannelId::AnglesCommand => &self.angles_cmd,
            ChannelId::MonoCommand => &self.mono_cmd,
            ChannelId::StereoCommand => &self.stereo_cmd,
            other => {
                return Err(GazeNetworkError::GeneralFailure(format!(
                    "{} is not a command channel",
                    other
                )))
            }
        };
        let command = reader.read_latest()?.map(|envelope| envelope.payload);
        if command.is_some() {
            self.state.lock().start_motion();
        }
        Ok(command)
    }

    pub fn publish_fixation_point(&self, x: &[f64]) -> Result<Stamp, GazeNetworkError> {
        self.fixation_state.write(&Bottle::from_f64s(x.iter().copied()))
    }

    pub fn publish_angles(&self, ang: &[f64]) -> Result<Stamp, GazeNetworkError> {
        self.angles_state.write(&Bottle::from_f64s(ang.iter().copied()))
    }

    pub fn publish_head_joints(&self, q: &[f64]) -> Result<Stamp, GazeNetworkError> {
        self.head_state.write(&Bottle::from_f64s(q.iter().copied()))
    }

    pub fn emit_event(&self, event: &GazeEvent) -> Result<Stamp, GazeNetworkError> {
        debug!("[SIM] emitting {}", event.key());
        self.events.write(&event.to_bottle())
    }

    /// Emit one `motion-ongoing` event per registered checkpoint.
    pub fn emit_motion_ongoing(&self, time: f64) -> Result<usize, GazeNetworkError> {
        let checkpoints = self.checkpoints();
        for checkpoint in &checkpoints {
            self.emit_event(&GazeEvent {
                event_type: crate::events::MOTION_ONGOING.to_string(),
                time,
                checkpoint: Some(*checkpoint),
            })?;
        }
        Ok(checkpoints.len())
    }

    /// Close every endpoint. Idempotent.
    pub fn shutdown(&self) {
        self.rpc.close();
        for reader in [&self.fixation_cmd, &self.angles_cmd, &self.mono_cmd, &self.stereo_cmd] {
            reader.close();
        }
        for writer in [&self.fixation_state, &self.angles_state, &self.head_state, &self.events] {
            writer.close();
        }
        debug!("[SIM] gaze server {} closed", self.prefix);
    }
}

impl Drop for SimulatedGazeServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
