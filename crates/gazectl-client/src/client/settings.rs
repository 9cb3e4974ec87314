// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Controller modes, scalar tunables and opaque option lists.

use super::GazeClient;
use crate::error::Result;
use crate::rpc::Command;
use crate::types::{ControlMode, Tunable};
use gazectl_structures::Bottle;

impl GazeClient {
    pub fn get_mode(&self, mode: ControlMode) -> Result<bool> {
        self.call(Command::get(mode.noun()))?.flag()
    }

    pub fn set_mode(&self, mode: ControlMode, enabled: bool) -> Result<()> {
        self.call(Command::set(mode.noun()).arg(i32::from(enabled)))?;
        Ok(())
    }

    pub fn get_tunable(&self, tunable: Tunable) -> Result<f64> {
        self.call(Command::get(tunable.noun()))?.float()
    }

    pub fn set_tunable(&self, tunable: Tunable, value: f64) -> Result<()> {
        self.call(Command::set(tunable.noun()).arg(value))?;
        Ok(())
    }

    /// Keep the gaze on the target while the body moves.
    pub fn set_tracking_mode(&self, enabled: bool) -> Result<()> {
        self.set_mode(ControlMode::Tracking, enabled)
    }

    pub fn get_tracking_mode(&self) -> Result<bool> {
        self.get_mode(ControlMode::Tracking)
    }

    pub fn set_stabilization_mode(&self, enabled: bool) -> Result<()> {
        self.set_mode(ControlMode::Stabilization, enabled)
    }

    pub fn get_stabilization_mode(&self) -> Result<bool> {
        self.get_mode(ControlMode::Stabilization)
    }

    pub fn set_saccades_mode(&self, enabled: bool) -> Result<()> {
        self.set_mode(ControlMode::Saccades, enabled)
    }

    pub fn get_saccades_mode(&self) -> Result<bool> {
        self.get_mode(ControlMode::Saccades)
    }

    /// Neck point-to-point time in seconds.
    pub fn get_neck_traj_time(&self) -> Result<f64> {
        self.get_tunable(Tunable::NeckTrajTime)
    }

    pub fn set_neck_traj_time(&self, t: f64) -> Result<()> {
        self.set_tunable(Tunable::NeckTrajTime, t)
    }

    pub fn get_eyes_traj_time(&self) -> Result<f64> {
        self.get_tunable(Tunable::EyesTrajTime)
    }

    pub fn set_eyes_traj_time(&self, t: f64) -> Result<()> {
        self.set_tunable(Tunable::EyesTrajTime, t)
    }

    pub fn get_vor_gain(&self) -> Result<f64> {
        self.get_tunable(Tunable::VorGain)
    }

    pub fn set_vor_gain(&self, gain: f64) -> Result<()> {
        self.set_tunable(Tunable::VorGain, gain)
    }

    pub fn get_ocr_gain(&self) -> Result<f64> {
        self.get_tunable(Tunable::OcrGain)
    }

    pub fn set_ocr_gain(&self, gain: f64) -> Result<()> {
        self.set_tunable(Tunable::OcrGain, gain)
    }

    pub fn get_saccades_inhibition_period(&self) -> Result<f64> {
        self.get_tunable(Tunable::SaccadesInhibitionPeriod)
    }

    pub fn set_saccades_inhibition_period(&self, period: f64) -> Result<()> {
        self.set_tunable(Tunable::SaccadesInhibitionPeriod, period)
    }

    pub fn get_saccades_activation_angle(&self) -> Result<f64> {
        self.get_tunable(Tunable::SaccadesActivationAngle)
    }

    pub fn set_saccades_activation_angle(&self, angle: f64) -> Result<()> {
        self.set_tunable(Tunable::SaccadesActivationAngle, angle)
    }

    pub fn get_neck_angle_user_tolerance(&self) -> Result<f64> {
        self.get_tunable(Tunable::NeckAngleUserTolerance)
    }

    pub fn set_neck_angle_user_tolerance(&self, angle: f64) -> Result<()> {
        self.set_tunable(Tunable::NeckAngleUserTolerance, angle)
    }

    /// Gains of the stereo servoing loop.
    pub fn get_stereo_options(&self) -> Result<Bottle> {
        Ok(self.call(Command::get("pid"))?.list()?.clone())
    }

    pub fn set_stereo_options(&self, options: &Bottle) -> Result<()> {
        self.call(Command::set("pid").list(options.clone()))?;
        Ok(())
    }

    /// Low-level parameters the server exposes as an opaque property list.
    pub fn tweak_get(&self) -> Result<Bottle> {
        Ok(self.call(Command::get("tweak"))?.list()?.clone())
    }

    pub fn tweak_set(&self, options: &Bottle) -> Result<()> {
        self.call(Command::set("tweak").list(options.clone()))?;
        Ok(())
    }
}
