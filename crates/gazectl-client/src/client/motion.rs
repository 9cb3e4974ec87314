// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Motion commands and completion polling.
//!
//! Plain `look_at_*` calls are fire-and-forget writes on the streaming command channels.
//! The `*_sync` variants go through the control channel and return once the server accepted
//! the target, not when the motion completes.

use super::{list_of, require_len, GazeClient};
use crate::error::Result;
use crate::rpc::Command;
use crate::types::{AngleMode, CameraSelector};
use gazectl_structures::Bottle;
use std::time::Duration;
use tracing::debug;

fn angles_payload(mode: AngleMode, ang: &[f64]) -> Bottle {
    let mut payload = Bottle::new();
    payload.add_string(mode.as_str());
    for a in ang {
        payload.add_float64(*a);
    }
    payload
}

fn mono_payload(cam: CameraSelector, px: &[f64], z: f64) -> Bottle {
    let mut payload = Bottle::new();
    payload
        .add_string(cam.as_str())
        .add_float64(px[0])
        .add_float64(px[1])
        .add_float64(z);
    payload
}

fn mono_vergence_payload(cam: CameraSelector, px: &[f64], ver: f64) -> Bottle {
    let mut payload = Bottle::new();
    payload
        .add_string(cam.as_str())
        .add_float64(px[0])
        .add_float64(px[1])
        .add_string("ver")
        .add_float64(ver);
    payload
}

fn stereo_payload(pxl: &[f64], pxr: &[f64]) -> Bottle {
    list_of(&[pxl[0], pxl[1], pxr[0], pxr[1]])
}

impl GazeClient {
    /// Move the gaze to the Cartesian point `fp` (first three values).
    pub fn look_at_fixation_point(&self, fp: &[f64]) -> Result<()> {
        let channels = self.link()?;
        require_len("fixation point", fp, 3)?;
        channels.fixation_cmd.write(&list_of(&fp[..3]))?;
        Ok(())
    }

    pub fn look_at_abs_angles(&self, ang: &[f64]) -> Result<()> {
        self.look_at_angles(AngleMode::Absolute, ang)
    }

    pub fn look_at_rel_angles(&self, ang: &[f64]) -> Result<()> {
        self.look_at_angles(AngleMode::Relative, ang)
    }

    /// Azimuth, elevation, vergence in degrees.
    pub fn look_at_angles(&self, mode: AngleMode, ang: &[f64]) -> Result<()> {
        let channels = self.link()?;
        require_len("angles", ang, 3)?;
        channels.angles_cmd.write(&angles_payload(mode, &ang[..3]))?;
        Ok(())
    }

    /// Look at pixel `px` of one camera, at depth `z` along the optical axis.
    pub fn look_at_mono_pixel(&self, cam: CameraSelector, px: &[f64], z: f64) -> Result<()> {
        let channels = self.link()?;
        require_len("pixel", px, 2)?;
        channels.mono_cmd.write(&mono_payload(cam, px, z))?;
        Ok(())
    }

    pub fn look_at_mono_pixel_with_vergence(
        &self,
        cam: CameraSelector,
        px: &[f64],
        ver: f64,
    ) -> Result<()> {
        let channels = self.link()?;
        require_len("pixel", px, 2)?;
        channels.mono_cmd.write(&mono_vergence_payload(cam, px, ver))?;
        Ok(())
    }

    pub fn look_at_stereo_pixels(&self, pxl: &[f64], pxr: &[f64]) -> Result<()> {
        let channels = self.link()?;
        require_len("left pixel", pxl, 2)?;
        require_len("right pixel", pxr, 2)?;
        channels.stereo_cmd.write(&stereo_payload(pxl, pxr))?;
        Ok(())
    }

    pub fn look_at_fixation_point_sync(&self, fp: &[f64]) -> Result<()> {
        self.link()?;
        require_len("fixation point", fp, 3)?;
        self.call(Command::new("look").noun("3D").list(list_of(&fp[..3])))?;
        Ok(())
    }

    pub fn look_at_abs_angles_sync(&self, ang: &[f64]) -> Result<()> {
        self.look_at_angles_sync(AngleMode::Absolute, ang)
    }

    pub fn look_at_rel_angles_sync(&self, ang: &[f64]) -> Result<()> {
        self.look_at_angles_sync(AngleMode::Relative, ang)
    }

    /// Every value of `ang` is forwarded; the server reads the first three.
    pub fn look_at_angles_sync(&self, mode: AngleMode, ang: &[f64]) -> Result<()> {
        self.link()?;
        require_len("angles", ang, 3)?;
        self.call(Command::new("look").noun("ang").list(angles_payload(mode, ang)))?;
        Ok(())
    }

    pub fn look_at_mono_pixel_sync(&self, cam: CameraSelector, px: &[f64], z: f64) -> Result<()> {
        self.link()?;
        require_len("pixel", px, 2)?;
        self.call(Command::new("look").noun("mono").list(mono_payload(cam, px, z)))?;
        Ok(())
    }

    pub fn look_at_mono_pixel_with_vergence_sync(
        &self,
        cam: CameraSelector,
        px: &[f64],
        ver: f64,
    ) -> Result<()> {
        self.link()?;
        require_len("pixel", px, 2)?;
        self.call(
            Command::new("look")
                .noun("mono")
                .list(mono_vergence_payload(cam, px, ver)),
        )?;
        Ok(())
    }

    pub fn look_at_stereo_pixels_sync(&self, pxl: &[f64], pxr: &[f64]) -> Result<()> {
        self.link()?;
        require_len("left pixel", pxl, 2)?;
        require_len("right pixel", pxr, 2)?;
        self.call(Command::new("look").noun("stereo").list(stereo_payload(pxl, pxr)))?;
        Ok(())
    }

    pub fn check_motion_done(&self) -> Result<bool> {
        self.call(Command::get("done"))?.flag()
    }

    pub fn check_saccade_done(&self) -> Result<bool> {
        self.call(Command::get("sdon"))?.flag()
    }

    /// Poll `get done` every `period` until the motion completes.
    ///
    /// Returns `Ok(false)` once more than `timeout` elapsed; a zero `timeout` waits forever.
    pub fn wait_motion_done(&self, period: Duration, timeout: Duration) -> Result<bool> {
        self.wait_until_done(period, timeout, || self.check_motion_done())
    }

    pub fn wait_saccade_done(&self, period: Duration, timeout: Duration) -> Result<bool> {
        self.wait_until_done(period, timeout, || self.check_saccade_done())
    }

    fn wait_until_done(
        &self,
        period: Duration,
        timeout: Duration,
        check: impl Fn() -> Result<bool>,
    ) -> Result<bool> {
        self.link()?;
        let t0 = self.clock.now();
        loop {
            self.clock.sleep(period);
            if check()? {
                return Ok(true);
            }
            let elapsed = self.clock.now().saturating_duration_since(t0);
            if !timeout.is_zero() && elapsed > timeout {
                debug!("[CLIENT] gave up waiting after {:?}", elapsed);
                return Ok(false);
            }
        }
    }

    /// Halt the controller wherever it is.
    pub fn stop_control(&self) -> Result<()> {
        self.call(Command::new("stop"))?;
        Ok(())
    }
}
