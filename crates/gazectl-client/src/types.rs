// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Small typed selectors and results of the public API.

use crate::events::WILDCARD;
use gazectl_structures::{Bottle, Stamp, Value};

/// Protocol version this client speaks.
pub const CLIENT_PROTOCOL_VERSION: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraSelector {
    Left,
    Right,
}

impl CameraSelector {
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraSelector::Left => "left",
            CameraSelector::Right => "right",
        }
    }
}

/// Whether angles are absolute or relative to the current gaze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AngleMode {
    Absolute,
    Relative,
}

impl AngleMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AngleMode::Absolute => "abs",
            AngleMode::Relative => "rel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoseSelector {
    LeftEye,
    RightEye,
    Head,
}

impl PoseSelector {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoseSelector::LeftEye => "left",
            PoseSelector::RightEye => "right",
            PoseSelector::Head => "head",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NeckJoint {
    Pitch,
    Roll,
    Yaw,
}

impl NeckJoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            NeckJoint::Pitch => "pitch",
            NeckJoint::Roll => "roll",
            NeckJoint::Yaw => "yaw",
        }
    }

    /// Position of this joint in the head joint vector.
    pub fn head_index(&self) -> usize {
        match self {
            NeckJoint::Pitch => 3,
            NeckJoint::Roll => 4,
            NeckJoint::Yaw => 5,
        }
    }
}

/// Boolean controller modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlMode {
    Tracking,
    Stabilization,
    Saccades,
}

impl ControlMode {
    pub fn noun(&self) -> &'static str {
        match self {
            ControlMode::Tracking => "track",
            ControlMode::Stabilization => "stab",
            ControlMode::Saccades => "sacc",
        }
    }
}

/// Scalar controller parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tunable {
    NeckTrajTime,
    EyesTrajTime,
    VorGain,
    OcrGain,
    SaccadesInhibitionPeriod,
    SaccadesActivationAngle,
    NeckAngleUserTolerance,
}

impl Tunable {
    pub const ALL: [Tunable; 7] = [
        Tunable::NeckTrajTime,
        Tunable::EyesTrajTime,
        Tunable::VorGain,
        Tunable::OcrGain,
        Tunable::SaccadesInhibitionPeriod,
        Tunable::SaccadesActivationAngle,
        Tunable::NeckAngleUserTolerance,
    ];

    pub fn noun(&self) -> &'static str {
        match self {
            Tunable::NeckTrajTime => "Tneck",
            Tunable::EyesTrajTime => "Teyes",
            Tunable::VorGain => "vor",
            Tunable::OcrGain => "ocr",
            Tunable::SaccadesInhibitionPeriod => "sinh",
            Tunable::SaccadesActivationAngle => "sact",
            Tunable::NeckAngleUserTolerance => "ntol",
        }
    }
}

/// Position plus axis-angle orientation of an eye or the head.
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    pub position: Vec<f64>,
    pub orientation: Vec<f64>,
    pub stamp: Option<Stamp>,
}

/// Server self-description returned by `get info`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerInfo {
    raw: Bottle,
}

impl ServerInfo {
    pub fn new(raw: Bottle) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &Bottle {
        &self.raw
    }

    pub fn version(&self) -> Option<f64> {
        self.raw.find("server_version").and_then(Value::as_float64)
    }

    /// Event types the server can emit, wildcard included.
    pub fn events(&self) -> Vec<String> {
        self.raw
            .find("events")
            .and_then(Value::as_list)
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn supports_event(&self, event_type: &str) -> bool {
        event_type == WILDCARD || self.events().iter().any(|e| e == event_type)
    }
}

/// Two versions are the same when they agree to the precision they are published with.
pub fn versions_match(server: f64, client: f64) -> bool {
    (server - client).abs() < 1e-9
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(version: Option<f64>) -> ServerInfo {
        let mut raw = Bottle::new();
        if let Some(version) = version {
            let mut entry = Bottle::new();
            entry.add_string("server_version").add_float64(version);
            raw.add_list(entry);
        }
        let mut events = Bottle::new();
        events.add_string("motion-onset").add_string("motion-done");
        let mut entry = Bottle::new();
        entry.add_string("events").add_list(events);
        raw.add_list(entry);
        ServerInfo::new(raw)
    }

    #[test]
    fn test_server_info() {
        let with_version = info(Some(1.2));
        assert_eq!(with_version.version(), Some(1.2));
        assert_eq!(with_version.events(), vec!["motion-onset", "motion-done"]);
        assert!(with_version.supports_event("motion-done"));
        assert!(with_version.supports_event(WILDCARD));
        assert!(!with_version.supports_event("closing"));

        assert_eq!(info(None).version(), None);
    }

    #[test]
    fn test_versions_match() {
        assert!(versions_match(1.2, CLIENT_PROTOCOL_VERSION));
        assert!(!versions_match(1.1, CLIENT_PROTOCOL_VERSION));
    }

    #[test]
    fn test_selectors() {
        assert_eq!(CameraSelector::Right.as_str(), "right");
        assert_eq!(AngleMode::Relative.as_str(), "rel");
        assert_eq!(PoseSelector::LeftEye.as_str(), "left");
        assert_eq!(NeckJoint::Yaw.head_index(), 5);
        assert_eq!(Tunable::SaccadesActivationAngle.noun(), "sact");
        assert_eq!(ControlMode::Stabilization.noun(), "stab");
    }
}
