// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Read-only geometric and state queries. The geometry is computed by the server; payloads
//! are passed through as is.

use super::{list_of, require_len, GazeClient};
use crate::error::Result;
use crate::rpc::Command;
use crate::types::{AngleMode, CameraSelector, Pose, PoseSelector, ServerInfo};
use gazectl_structures::Bottle;

const POSE_MIN_LEN: usize = 7;

fn cam_payload(cam: CameraSelector, values: &[f64]) -> Bottle {
    let mut payload = Bottle::new();
    payload.add_string(cam.as_str());
    for v in values {
        payload.add_float64(*v);
    }
    payload
}

impl GazeClient {
    /// Position (3 values) and axis-angle orientation (the rest) of an eye or the head.
    pub fn get_pose(&self, selector: PoseSelector) -> Result<Pose> {
        let reply = self.call(Command::get("pose").noun(selector.as_str()))?;
        let values = reply.floats()?;
        if values.len() < POSE_MIN_LEN {
            return Err(reply.malformed(format!(
                "pose needs {} values, got {}",
                POSE_MIN_LEN,
                values.len()
            )));
        }
        Ok(Pose {
            position: values[..3].to_vec(),
            orientation: values[3..].to_vec(),
            stamp: reply.stamp(),
        })
    }

    pub fn get_left_eye_pose(&self) -> Result<Pose> {
        self.get_pose(PoseSelector::LeftEye)
    }

    pub fn get_right_eye_pose(&self) -> Result<Pose> {
        self.get_pose(PoseSelector::RightEye)
    }

    pub fn get_head_pose(&self) -> Result<Pose> {
        self.get_pose(PoseSelector::Head)
    }

    /// Project the 3D point `x` onto the image plane of `cam`.
    pub fn get_2d_pixel(&self, cam: CameraSelector, x: &[f64]) -> Result<Vec<f64>> {
        self.link()?;
        require_len("point", x, 3)?;
        self.call(Command::get("2D").list(cam_payload(cam, &x[..3])))?
            .floats()
    }

    /// Back-project pixel `px` of `cam` at depth `z`.
    pub fn get_3d_point(&self, cam: CameraSelector, px: &[f64], z: f64) -> Result<Vec<f64>> {
        self.link()?;
        require_len("pixel", px, 2)?;
        self.call(
            Command::get("3D")
                .noun("mono")
                .list(cam_payload(cam, &[px[0], px[1], z])),
        )?
        .floats()
    }

    /// Intersect the ray through pixel `px` with the plane `a*x + b*y + c*z + d = 0`.
    pub fn get_3d_point_on_plane(
        &self,
        cam: CameraSelector,
        px: &[f64],
        plane: &[f64],
    ) -> Result<Vec<f64>> {
        self.link()?;
        require_len("pixel", px, 2)?;
        require_len("plane", plane, 4)?;
        let values = [px[0], px[1], plane[0], plane[1], plane[2], plane[3]];
        self.call(Command::get("3D").noun("proj").list(cam_payload(cam, &values)))?
            .floats()
    }

    pub fn get_3d_point_from_angles(&self, mode: AngleMode, ang: &[f64]) -> Result<Vec<f64>> {
        self.link()?;
        require_len("angles", ang, 3)?;
        let mut payload = Bottle::new();
        payload.add_string(mode.as_str());
        for a in &ang[..3] {
            payload.add_float64(*a);
        }
        self.call(Command::get("3D").noun("ang").list(payload))?
            .floats()
    }

    /// Absolute angles that would fixate the point `x`.
    pub fn get_angles_from_3d_point(&self, x: &[f64]) -> Result<Vec<f64>> {
        self.link()?;
        require_len("point", x, 3)?;
        self.call(Command::get("ang").list(list_of(&x[..3])))?
            .floats()
    }

    pub fn triangulate_3d_point(&self, pxl: &[f64], pxr: &[f64]) -> Result<Vec<f64>> {
        self.link()?;
        require_len("left pixel", pxl, 2)?;
        require_len("right pixel", pxr, 2)?;
        self.call(
            Command::get("3D")
                .noun("stereo")
                .list(list_of(&[pxl[0], pxl[1], pxr[0], pxr[1]])),
        )?
        .floats()
    }

    /// Joint targets the controller is currently driving towards.
    pub fn get_joints_desired(&self) -> Result<Vec<f64>> {
        self.call(Command::get("des"))?.floats()
    }

    pub fn get_joints_velocities(&self) -> Result<Vec<f64>> {
        self.call(Command::get("vel"))?.floats()
    }

    /// Ask the server for a fresh copy of its info list.
    pub fn get_info(&self) -> Result<ServerInfo> {
        let reply = self.call(Command::get("info"))?;
        Ok(ServerInfo::new(reply.list()?.clone()))
    }

    /// Event types the server can emit.
    pub fn supported_events(&self) -> Result<Vec<String>> {
        Ok(self.get_info()?.events())
    }
}
