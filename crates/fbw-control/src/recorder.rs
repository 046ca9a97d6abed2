// ─────────────────────────────────────────────────────────────────────
// SCPN Flight Control Core — Frame Recorder
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Fixed-capacity ring of recent frame summaries.
//! Storage is allocated once; recording never reallocates.

use fbw_types::error::{FbwError, FbwResult};
use fbw_types::frame::{FrameOutput, SurfaceCommands};
use serde::{Deserialize, Serialize};

/// Compact record of one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameSummary {
    pub simulation_time: f64,
    pub surfaces: SurfaceCommands,
    pub on_ground: bool,
    pub alpha_floor_active: bool,
    pub high_aoa_active: bool,
    pub high_speed_active: bool,
    pub any_protection_active: bool,
}

impl FrameSummary {
    pub fn from_output(out: &FrameOutput, simulation_time: f64) -> Self {
        let p = &out.protections;
        Self {
            simulation_time,
            surfaces: out.output,
            on_ground: out.modes.on_ground,
            alpha_floor_active: p.alpha_floor_active,
            high_aoa_active: p.high_aoa_active,
            high_speed_active: p.high_speed_active,
            any_protection_active: p.any_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RecorderSnapshot")]
pub struct FrameRecorder {
    frames: Vec<FrameSummary>,
    capacity: usize,
    head: usize,
    count: usize,
}

/// Serialized recorder, checked before it becomes a live ring.
#[derive(Deserialize)]
struct RecorderSnapshot {
    frames: Vec<FrameSummary>,
    capacity: usize,
    head: usize,
    count: usize,
}

impl TryFrom<RecorderSnapshot> for FrameRecorder {
    type Error = FbwError;

    fn try_from(s: RecorderSnapshot) -> FbwResult<Self> {
        if s.capacity == 0 || s.frames.len() != s.capacity {
            return Err(FbwError::ConfigError(format!(
                "frame recorder capacity {} does not match {} stored frames",
                s.capacity,
                s.frames.len()
            )));
        }
        if s.head >= s.capacity || s.count > s.capacity {
            return Err(FbwError::ConfigError(format!(
                "frame recorder cursor out of range: head {}, count {}, capacity {}",
                s.head, s.count, s.capacity
            )));
        }
        Ok(Self {
            frames: s.frames,
            capacity: s.capacity,
            head: s.head,
            count: s.count,
        })
    }
}

impl FrameRecorder {
    pub fn new(capacity: usize) -> FbwResult<Self> {
        if capacity == 0 {
            return Err(FbwError::ConfigError(
                "frame recorder capacity must be > 0".to_string(),
            ));
        }
        Ok(Self {
            frames: vec![FrameSummary::default(); capacity],
            capacity,
            head: 0,
            count: 0,
        })
    }

    pub fn record(&mut self, out: &FrameOutput, simulation_time: f64) {
        self.frames[self.head] = FrameSummary::from_output(out, simulation_time);
        self.head = (self.head + 1) % self.capacity;
        if self.count < self.capacity {
            self.count += 1;
        }
    }

    pub fn latest(&self) -> Option<&FrameSummary> {
        if self.count == 0 {
            return None;
        }
        let idx = if self.head == 0 {
            self.capacity - 1
        } else {
            self.head - 1
        };
        self.frames.get(idx)
    }

    /// Recorded frames, oldest first.
    pub fn history(&self) -> Vec<FrameSummary> {
        let mut result = Vec::with_capacity(self.count);
        if self.count < self.capacity {
            result.extend_from_slice(&self.frames[..self.count]);
        } else {
            result.extend_from_slice(&self.frames[self.head..]);
            result.extend_from_slice(&self.frames[..self.head]);
        }
        result
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.count = 0;
    }
}
