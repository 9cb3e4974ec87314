// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Range restrictions on the neck joints and the eyes vergence.

use super::GazeClient;
use crate::error::{GazeClientError, Result};
use crate::rpc::Command;
use crate::types::NeckJoint;

const EYES: &str = "eyes";

/// Index of the vergence in the head joint vector.
const VERGENCE_INDEX: usize = 5;

impl GazeClient {
    /// Restrict `joint` to `[min, max]` degrees.
    pub fn bind_neck_joint(&self, joint: NeckJoint, min: f64, max: f64) -> Result<()> {
        self.call(Command::new("bind").noun(joint.as_str()).arg(min).arg(max))?;
        Ok(())
    }

    /// Hold `joint` at `value` degrees.
    pub fn block_neck_joint(&self, joint: NeckJoint, value: f64) -> Result<()> {
        self.bind_neck_joint(joint, value, value)
    }

    /// Hold `joint` where the latest head sample says it is.
    pub fn block_neck_joint_here(&self, joint: NeckJoint) -> Result<()> {
        let value = self.head_joint(joint.head_index())?;
        self.block_neck_joint(joint, value)
    }

    pub fn get_neck_joint_range(&self, joint: NeckJoint) -> Result<(f64, f64)> {
        let reply = self.call(Command::get(joint.as_str()))?;
        Ok((reply.float_at(1)?, reply.float_at(2)?))
    }

    pub fn clear_neck_joint(&self, joint: NeckJoint) -> Result<()> {
        self.call(Command::new("clear").noun(joint.as_str()))?;
        Ok(())
    }

    pub fn bind_neck_pitch(&self, min: f64, max: f64) -> Result<()> {
        self.bind_neck_joint(NeckJoint::Pitch, min, max)
    }

    pub fn block_neck_pitch(&self, value: f64) -> Result<()> {
        self.block_neck_joint(NeckJoint::Pitch, value)
    }

    pub fn block_neck_pitch_here(&self) -> Result<()> {
        self.block_neck_joint_here(NeckJoint::Pitch)
    }

    pub fn get_neck_pitch_range(&self) -> Result<(f64, f64)> {
        self.get_neck_joint_range(NeckJoint::Pitch)
    }

    pub fn clear_neck_pitch(&self) -> Result<()> {
        self.clear_neck_joint(NeckJoint::Pitch)
    }

    pub fn bind_neck_roll(&self, min: f64, max: f64) -> Result<()> {
        self.bind_neck_joint(NeckJoint::Roll, min, max)
    }

    pub fn block_neck_roll(&self, value: f64) -> Result<()> {
        self.block_neck_joint(NeckJoint::Roll, value)
    }

    pub fn block_neck_roll_here(&self) -> Result<()> {
        self.block_neck_joint_here(NeckJoint::Roll)
    }

    pub fn get_neck_roll_range(&self) -> Result<(f64, f64)> {
        self.get_neck_joint_range(NeckJoint::Roll)
    }

    pub fn clear_neck_roll(&self) -> Result<()> {
        self.clear_neck_joint(NeckJoint::Roll)
    }

    pub fn bind_neck_yaw(&self, min: f64, max: f64) -> Result<()> {
        self.bind_neck_joint(NeckJoint::Yaw, min, max)
    }

    pub fn block_neck_yaw(&self, value: f64) -> Result<()> {
        self.block_neck_joint(NeckJoint::Yaw, value)
    }

    pub fn block_neck_yaw_here(&self) -> Result<()> {
        self.block_neck_joint_here(NeckJoint::Yaw)
    }

    pub fn get_neck_yaw_range(&self) -> Result<(f64, f64)> {
        self.get_neck_joint_range(NeckJoint::Yaw)
    }

    pub fn clear_neck_yaw(&self) -> Result<()> {
        self.clear_neck_joint(NeckJoint::Yaw)
    }

    /// Hold the vergence at `ver` degrees.
    pub fn block_eyes(&self, ver: f64) -> Result<()> {
        self.call(Command::new("bind").noun(EYES).arg(ver))?;
        Ok(())
    }

    pub fn block_eyes_here(&self) -> Result<()> {
        let ver = self.head_joint(VERGENCE_INDEX)?;
        self.block_eyes(ver)
    }

    pub fn get_blocked_vergence(&self) -> Result<f64> {
        self.call(Command::get(EYES))?.float()
    }

    pub fn clear_eyes(&self) -> Result<()> {
        self.call(Command::new("clear").noun(EYES))?;
        Ok(())
    }

    fn head_joint(&self, index: usize) -> Result<f64> {
        let joints = self.latest_head_joints()?;
        joints.get(index).copied().ok_or_else(|| {
            GazeClientError::InvalidArgument(format!(
                "head sample has {} joints, need index {}",
                joints.len(),
                index
            ))
        })
    }
}
