// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use super::GazeClient;
use crate::channels::ChannelId;
use crate::error::{GazeClientError, Result};
use crate::staleness::{StalenessTracker, StateReading};
use gazectl_io::StreamReader;
use gazectl_structures::Bottle;

/// Numeric samples of at least `min` values.
fn decode_min(min: usize) -> impl Fn(&Bottle) -> Option<Vec<f64>> {
    move |payload: &Bottle| payload.to_f64_vec().filter(|values| values.len() >= min)
}

impl GazeClient {
    /// Current fixation point in the root frame.
    pub fn get_fixation_point(&self) -> Result<StateReading<Vec<f64>>> {
        self.read_state(ChannelId::FixationState)
    }

    /// Current azimuth, elevation and vergence.
    pub fn get_angles(&self) -> Result<StateReading<Vec<f64>>> {
        self.read_state(ChannelId::AnglesState)
    }

    /// Current head joint vector (neck pitch/roll/yaw at 3/4/5, vergence at 5 of 6).
    pub fn get_head_joints(&self) -> Result<StateReading<Vec<f64>>> {
        self.read_state(ChannelId::HeadState)
    }

    /// Poll one streaming input and report the cached sample with its freshness.
    pub fn read_state(&self, id: ChannelId) -> Result<StateReading<Vec<f64>>> {
        let channels = self.link()?;
        let (reader, tracker, min): (&dyn StreamReader, &StalenessTracker<Vec<f64>>, usize) =
            match id {
                ChannelId::FixationState => (&*channels.fixation_state, &self.fixation, 3),
                ChannelId::AnglesState => (&*channels.angles_state, &self.angles, 3),
                ChannelId::HeadState => (&*channels.head_state, &self.head, 1),
                other => {
                    return Err(GazeClientError::InvalidArgument(format!(
                        "{} is not a state channel",
                        other
                    )))
                }
            };
        tracker.poll(reader, decode_min(min), self.clock.now(), self.freshness_window)
    }

    /// Latest head joint vector, or an error when none has arrived yet.
    pub(super) fn latest_head_joints(&self) -> Result<Vec<f64>> {
        let reading = self.get_head_joints()?;
        if !self.head.has_sample() {
            return Err(GazeClientError::InvalidArgument(
                "no head joint sample received yet".to_string(),
            ));
        }
        Ok(reading.value)
    }
}
