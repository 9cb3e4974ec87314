// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! In-memory controller state and the request handler of the simulated server.

use crate::events::{
    CLOSING, MOTION_DONE, MOTION_ONGOING, MOTION_ONSET, SACCADE_DONE, SACCADE_ONSET, WILDCARD,
};
use crate::rpc::{ACK, NACK};
use crate::types::{ControlMode, NeckJoint, Tunable, CLIENT_PROTOCOL_VERSION};
use gazectl_structures::{Bottle, Stamp, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Image centre of the fake pinhole cameras.
const CX: f64 = 160.0;
const CY: f64 = 120.0;
/// Focal length of the fake pinhole cameras, in pixels.
const FOCAL: f64 = 257.0;
/// Half the baseline between the eyes, in metres.
const HALF_BASELINE: f64 = 0.034;

/// Everything a context snapshot restores.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Settings {
    pub modes: BTreeMap<&'static str, bool>,
    pub tunables: BTreeMap<&'static str, f64>,
    pub ranges: BTreeMap<&'static str, (f64, f64)>,
    pub blocked_vergence: Option<f64>,
    pub stereo_options: Bottle,
    pub tweak: Bottle,
}

impl Default for Settings {
    fn default() -> Self {
        let modes = [ControlMode::Tracking, ControlMode::Stabilization, ControlMode::Saccades]
            .iter()
            .map(|mode| (mode.noun(), *mode == ControlMode::Saccades))
            .collect();
        let tunables = Tunable::ALL
            .iter()
            .map(|tunable| (tunable.noun(), default_tunable(*tunable)))
            .collect();
        let ranges = [
            (NeckJoint::Pitch.as_str(), (-37.0, 21.0)),
            (NeckJoint::Roll.as_str(), (-20.0, 20.0)),
            (NeckJoint::Yaw.as_str(), (-45.0, 45.0)),
        ]
        .into_iter()
        .collect();

        let mut stereo_options = Bottle::new();
        let mut gain = Bottle::new();
        gain.add_string("Kp").add_list(Bottle::from_f64s([0.0035, 0.0035]));
        stereo_options.add_list(gain);

        let mut tweak = Bottle::new();
        let mut camera_width = Bottle::new();
        camera_width.add_string("camera_width_left").add_int32(320);
        tweak.add_list(camera_width);

        Self {
            modes,
            tunables,
            ranges,
            blocked_vergence: None,
            stereo_options,
            tweak,
        }
    }
}

fn default_tunable(tunable: Tunable) -> f64 {
    match tunable {
        Tunable::NeckTrajTime => 0.75,
        Tunable::EyesTrajTime => 0.25,
        Tunable::VorGain => 1.0,
        Tunable::OcrGain => 0.0,
        Tunable::SaccadesInhibitionPeriod => 1.0,
        Tunable::SaccadesActivationAngle => 10.0,
        Tunable::NeckAngleUserTolerance => 0.0,
    }
}

/// State table behind the simulated `/rpc` port.
#[derive(Debug)]
pub(crate) struct SimState {
    pub version: Option<f64>,
    pub settings: Settings,
    pub contexts: BTreeMap<i32, Settings>,
    next_context: i32,
    pub checkpoints: Vec<f64>,
    /// `get done`/`get sdon` polls still answering "moving"
    pub pending_motion_polls: u32,
    pub pending_saccade_polls: u32,
    pub settle_polls: u32,
    pub rejected: BTreeSet<String>,
    pub silent: bool,
    pub requests: Vec<Bottle>,
    pub fixation_point: Vec<f64>,
    pose_stamp: Stamp,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            version: Some(CLIENT_PROTOCOL_VERSION),
            settings: Settings::default(),
            contexts: BTreeMap::new(),
            next_context: 1,
            checkpoints: Vec::new(),
            pending_motion_polls: 0,
            pending_saccade_polls: 0,
            settle_polls: 0,
            rejected: BTreeSet::new(),
            silent: false,
            requests: Vec::new(),
            fixation_point: vec![-1.0, 0.0, 0.3],
            pose_stamp: Stamp::default(),
        }
    }
}

fn ack() -> Bottle {
    let mut reply = Bottle::new();
    reply.add_vocab(ACK);
    reply
}

fn nack() -> Bottle {
    let mut reply = Bottle::new();
    reply.add_vocab(NACK);
    reply
}

fn ack_with(payload: impl Into<Value>) -> Bottle {
    let mut reply = ack();
    reply.add(payload);
    reply
}

fn ack_floats(values: &[f64]) -> Bottle {
    ack_with(Bottle::from_f64s(values.iter().copied()))
}

/// Numeric items of `list` starting at `from`.
fn floats_from(list: &Bottle, from: usize) -> Option<Vec<f64>> {
    list.iter().skip(from).map(Value::as_float64).collect()
}

impl SimState {
    /// Answer one request. `None` leaves the client without a reply.
    pub fn respond(&mut self, request: &Bottle) -> Option<Bottle> {
        self.requests.push(request.clone());
        if self.silent {
            debug!("[SIM] staying silent on '{}'", request);
            return None;
        }

        let verb = request.get(0).and_then(Value::as_str).unwrap_or_default();
        let noun = request.get(1).and_then(Value::as_str);
        if self.is_rejected(verb, noun) {
            debug!("[SIM] rejecting '{}'", request);
            return Some(nack());
        }

        let reply = match verb {
            "get" => noun.and_then(|noun| self.get(noun, request)),
            "set" => noun.and_then(|noun| self.set(noun, request)),
            "look" => self.look(request),
            "bind" => noun.and_then(|noun| self.bind(noun, request)),
            "clear" => noun.and_then(|noun| self.clear(noun)),
            "stop" => {
                self.pending_motion_polls = 0;
                self.pending_saccade_polls = 0;
                Some(ack())
            }
            "stor" => Some(self.store()),
            "rest" => self.restore(request),
            "del" => self.delete(request),
            "register" => self.register(request),
            "unregister" => self.unregister(request),
            _ => None,
        };
        Some(reply.unwrap_or_else(nack))
    }

    /// Rules name a bare verb or `verb noun`.
    fn is_rejected(&self, verb: &str, noun: Option<&str>) -> bool {
        self.rejected.contains(verb)
            || noun
                .map(|noun| self.rejected.contains(&format!("{} {}", verb, noun)))
                .unwrap_or(false)
    }

    fn get(&mut self, noun: &str, request: &Bottle) -> Option<Bottle> {
        if let Some(flag) = self.settings.modes.get(noun) {
            return Some(ack_with(i32::from(*flag)));
        }
        if let Some(value) = self.settings.tunables.get(noun) {
            return Some(ack_with(*value));
        }
        if let Some((min, max)) = self.settings.ranges.get(noun) {
            let mut reply = ack();
            reply.add_float64(*min).add_float64(*max);
            return Some(reply);
        }

        let payload = request.get(2).and_then(Value::as_list);
        match noun {
            "eyes" => Some(ack_with(self.settings.blocked_vergence.unwrap_or(0.0))),
            "info" => Some(ack_with(self.info())),
            "pose" => {
                let selector = request.get(2).and_then(Value::as_str)?;
                self.pose(selector)
            }
            "2D" => {
                let payload = payload?;
                let x = floats_from(payload, 1)?;
                let z = *x.get(2)?;
                if z.abs() < f64::EPSILON {
                    return None;
                }
                Some(ack_floats(&[CX + FOCAL * x[0] / z, CY + FOCAL * x[1] / z]))
            }
            "3D" => self.get_3d(request),
            "ang" => {
                let x = floats_from(payload?, 0)?;
                if x.len() < 3 {
                    return None;
                }
                let azi = x[1].atan2(-x[0]).to_degrees();
                let ele = x[2].atan2(x[0].hypot(x[1])).to_degrees();
                Some(ack_floats(&[azi, ele, 0.0]))
            }
            "des" | "vel" => Some(ack_floats(&[0.0; 6])),
            "done" => Some(ack_with(i32::from(Self::settle(&mut self.pending_motion_polls)))),
            "sdon" => Some(ack_with(i32::from(Self::settle(&mut self.pending_saccade_polls)))),
            "pid" => Some(ack_with(self.settings.stereo_options.clone())),
            "tweak" => Some(ack_with(self.settings.tweak.clone())),
            _ => None,
        }
    }

    fn get_3d(&mut self, request: &Bottle) -> Option<Bottle> {
        let submode = request.get(2).and_then(Value::as_str)?;
        let payload = request.get(3).and_then(Value::as_list)?;
        match submode {
            "mono" => {
                let v = floats_from(payload, 1)?;
                let (u, w, z) = (*v.first()?, *v.get(1)?, *v.get(2)?);
                Some(ack_floats(&[(u - CX) * z / FOCAL, (w - CY) * z / FOCAL, z]))
            }
            "proj" => {
                let v = floats_from(payload, 1)?;
                if v.len() < 6 {
                    return None;
                }
                let (u, w) = ((v[0] - CX) / FOCAL, (v[1] - CY) / FOCAL);
                let (a, b, c, d) = (v[2], v[3], v[4], v[5]);
                let denominator = a * u + b * w + c;
                if denominator.abs() < f64::EPSILON {
                    return None;
                }
                let z = -d / denominator;
                Some(ack_floats(&[u * z, w * z, z]))
            }
            "ang" => {
                let v = floats_from(payload, 1)?;
                if v.len() < 3 {
                    return None;
                }
                let (azi, ele) = (v[0].to_radians(), v[1].to_radians());
                Some(ack_floats(&[
                    -ele.cos() * azi.cos(),
                    ele.cos() * azi.sin(),
                    ele.sin(),
                ]))
            }
            "stereo" => {
                let v = floats_from(payload, 0)?;
                if v.len() < 4 {
                    return None;
                }
                let disparity = v[0] - v[2];
                if disparity.abs() < f64::EPSILON {
                    return None;
                }
                let z = 2.0 * HALF_BASELINE * FOCAL / disparity;
                Some(ack_floats(&[
                    ((v[0] + v[2]) / 2.0 - CX) * z / FOCAL,
                    ((v[1] + v[3]) / 2.0 - CY) * z / FOCAL,
                    z,
                ]))
            }
            _ => None,
        }
    }

    fn set(&mut self, noun: &str, request: &Bottle) -> Option<Bottle> {
        let arg = request.get(2)?;
        if let Some(flag) = self.settings.modes.get_mut(noun) {
            *flag = arg.as_bool()?;
            return Some(ack());
        }
        if let Some(value) = self.settings.tunables.get_mut(noun) {
            *value = arg.as_float64()?;
            return Some(ack());
        }
        match noun {
            "pid" => {
                self.settings.stereo_options = arg.as_list()?.clone();
                Some(ack())
            }
            "tweak" => {
                self.settings.tweak = arg.as_list()?.clone();
                Some(ack())
            }
            _ => None,
        }
    }

    fn look(&mut self, request: &Bottle) -> Option<Bottle> {
        let target = request.get(1).and_then(Value::as_str)?;
        let payload = request.get(2).and_then(Value::as_list)?;
        match target {
            "3D" => {
                let x = floats_from(payload, 0)?;
                if x.len() < 3 {
                    return None;
                }
                self.fixation_point = x[..3].to_vec();
            }
            "ang" | "mono" | "stereo" if !payload.is_empty() => {}
            _ => return None,
        }
        self.start_motion();
        Some(ack())
    }

    /// Arm the completion polls for a new motion.
    pub fn start_motion(&mut self) {
        self.pending_motion_polls = self.settle_polls;
        self.pending_saccade_polls = self.settle_polls;
    }

    fn settle(pending: &mut u32) -> bool {
        if *pending == 0 {
            return true;
        }
        *pending -= 1;
        false
    }

    fn bind(&mut self, noun: &str, request: &Bottle) -> Option<Bottle> {
        if noun == "eyes" {
            self.settings.blocked_vergence = Some(request.get(2)?.as_float64()?);
            return Some(ack());
        }
        let min = request.get(2)?.as_float64()?;
        let max = request.get(3)?.as_float64()?;
        let range = self.settings.ranges.get_mut(noun)?;
        *range = (min, max);
        Some(ack())
    }

    fn clear(&mut self, noun: &str) -> Option<Bottle> {
        if noun == "eyes" {
            self.settings.blocked_vergence = None;
            return Some(ack());
        }
        let defaults = Settings::default();
        let (joint, range) = defaults.ranges.get_key_value(noun)?;
        self.settings.ranges.insert(*joint, *range);
        Some(ack())
    }

    fn store(&mut self) -> Bottle {
        let id = self.next_context;
        self.next_context += 1;
        self.contexts.insert(id, self.settings.clone());
        ack_with(id)
    }

    fn restore(&mut self, request: &Bottle) -> Option<Bottle> {
        let id = request.get(1)?.as_int32()?;
        self.settings = match id {
            0 => Settings::default(),
            id => self.contexts.get(&id)?.clone(),
        };
        Some(ack())
    }

    fn delete(&mut self, request: &Bottle) -> Option<Bottle> {
        let ids = request.get(1)?.as_list()?;
        let mut all_known = true;
        for id in ids.iter().filter_map(Value::as_int32) {
            all_known &= self.contexts.remove(&id).is_some();
        }
        all_known.then(ack)
    }

    fn register(&mut self, request: &Bottle) -> Option<Bottle> {
        let checkpoint = self.checkpoint_of(request)?;
        if !self.checkpoints.contains(&checkpoint) {
            self.checkpoints.push(checkpoint);
        }
        Some(ack())
    }

    fn unregister(&mut self, request: &Bottle) -> Option<Bottle> {
        let checkpoint = self.checkpoint_of(request)?;
        let index = self.checkpoints.iter().position(|cp| *cp == checkpoint)?;
        self.checkpoints.remove(index);
        Some(ack())
    }

    fn checkpoint_of(&self, request: &Bottle) -> Option<f64> {
        if request.get(1).and_then(Value::as_str) != Some("ongoing") {
            return None;
        }
        request.get(2)?.as_float64().filter(|cp| *cp >= 0.0)
    }

    fn pose(&mut self, selector: &str) -> Option<Bottle> {
        let x_offset = match selector {
            "left" => -HALF_BASELINE,
            "right" => HALF_BASELINE,
            "head" => 0.0,
            _ => return None,
        };
        self.pose_stamp = self.pose_stamp.next(self.pose_stamp.time + 0.01);
        let mut reply = ack_floats(&[-0.06, x_offset, 0.34, 0.0, 0.0, 1.0, 0.0]);
        reply.add_list(self.pose_stamp.to_bottle());
        Some(reply)
    }

    fn info(&self) -> Bottle {
        let mut info = Bottle::new();
        if let Some(version) = self.version {
            let mut entry = Bottle::new();
            entry.add_string("server_version").add_float64(version);
            info.add_list(entry);
        }
        let mut head_version = Bottle::new();
        head_version.add_string("head_version").add_float64(2.0);
        info.add_list(head_version);

        let mut events = Bottle::new();
        for event in [
            MOTION_ONSET,
            MOTION_DONE,
            MOTION_ONGOING,
            SACCADE_ONSET,
            SACCADE_DONE,
            CLOSING,
            WILDCARD,
        ] {
            events.add_string(event);
        }
        let mut entry = Bottle::new();
        entry.add_string("events").add_list(events);
        info.add_list(entry);
        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::Command;

    fn send(state: &mut SimState, command: Command) -> Bottle {
        state.respond(command.as_bottle()).unwrap()
    }

    fn is_ack(reply: &Bottle) -> bool {
        reply.get(0).and_then(Value::as_vocab) == Some(ACK)
    }

    #[test]
    fn test_context_ids_start_at_one() {
        let mut state = SimState::default();
        let first = send(&mut state, Command::new("stor"));
        let second = send(&mut state, Command::new("stor"));
        assert_eq!(first.get(1).and_then(Value::as_int32), Some(1));
        assert_eq!(second.get(1).and_then(Value::as_int32), Some(2));
    }

    #[test]
    fn test_restore_brings_back_settings() {
        let mut state = SimState::default();
        send(&mut state, Command::new("stor"));
        assert!(is_ack(&send(&mut state, Command::set("vor").arg(0.2))));
        assert!(is_ack(&send(&mut state, Command::new("rest").arg(1))));
        assert_eq!(state.settings.tunables["vor"], 1.0);
        assert!(!is_ack(&send(&mut state, Command::new("rest").arg(7))));
    }

    #[test]
    fn test_rejection_rules() {
        let mut state = SimState::default();
        state.rejected.insert("get vor".to_string());
        assert!(!is_ack(&send(&mut state, Command::get("vor"))));
        assert!(is_ack(&send(&mut state, Command::get("ocr"))));
        state.rejected.insert("stor".to_string());
        assert!(!is_ack(&send(&mut state, Command::new("stor"))));
        assert_eq!(state.requests.len(), 3);
    }

    #[test]
    fn test_motion_settles_after_polls() {
        let mut state = SimState::default();
        state.settle_polls = 2;
        state.start_motion();
        let done = |state: &mut SimState| {
            send(state, Command::get("done"))
                .get(1)
                .and_then(Value::as_int32)
        };
        assert_eq!(done(&mut state), Some(0));
        assert_eq!(done(&mut state), Some(0));
        assert_eq!(done(&mut state), Some(1));
    }

    #[test]
    fn test_checkpoint_bookkeeping() {
        let mut state = SimState::default();
        assert!(is_ack(&send(&mut state, Command::new("register").noun("ongoing").arg(0.5))));
        assert_eq!(state.checkpoints, vec![0.5]);
        assert!(is_ack(&send(&mut state, Command::new("unregister").noun("ongoing").arg(0.5))));
        assert!(!is_ack(&send(&mut state, Command::new("unregister").noun("ongoing").arg(0.5))));
    }

    #[test]
    fn test_unknown_command_is_nacked() {
        let mut state = SimState::default();
        assert!(!is_ack(&send(&mut state, Command::new("dance"))));
        assert!(!is_ack(&send(&mut state, Command::get("nothing"))));
    }
}
