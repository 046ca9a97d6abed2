// ─────────────────────────────────────────────────────────────────────
// SCPN Flight Control Core — Persistent State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Everything that survives from one frame to the next.
//!
//! The whole record is a plain value: cloning it snapshots the computer,
//! and two computers fed the same frames from equal states produce
//! identical outputs.

use crate::air_data::AirDataState;
use crate::modes::ModeState;
use crate::pitch_law::PitchLawState;
use crate::protections::ProtectionState;
use crate::roll_law::RollLawState;
use crate::yaw_law::YawLawState;
use fbw_math::limiters::RateLimiter;
use serde::{Deserialize, Serialize};

/// Surface slew limiters applied to the blended commands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputState {
    pub eta: RateLimiter,
    pub xi: RateLimiter,
    pub zeta: RateLimiter,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistentState {
    /// Sum of every `dt` since the last reset.
    pub monotonic_time: f64,
    /// Ground/air decision of the previous frame.
    pub prev_on_ground: bool,
    pub air_data: AirDataState,
    pub modes: ModeState,
    pub protections: ProtectionState,
    pub pitch: PitchLawState,
    pub roll: RollLawState,
    pub yaw: YawLawState,
    pub output: OutputState,
}

impl PersistentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True before the first frame has been processed.
    #[cfg(test)]
    pub(crate) fn is_fresh(&self) -> bool {
        self.modes.ground_air.is_none()
    }
}
