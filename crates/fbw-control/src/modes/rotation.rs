// ─────────────────────────────────────────────────────────────────────
// SCPN Flight Control Core — Rotation Arm
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Take-off rotation latch.

use super::log_transition;
use fbw_types::params::ModeThresholds;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationArm {
    Off,
    On,
}

impl RotationArm {
    pub fn in_rotation(self) -> bool {
        self == RotationArm::On
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationInputs {
    /// Rate-limited pitch in-flight gain.
    pub in_flight_gain: f64,
    pub v_tas_kn: f64,
    pub thrust_lever_pos: [f64; 2],
    pub h_radio_ft: f64,
}

pub fn rotation_arm(prev: Option<RotationArm>, inp: &RotationInputs, th: &ModeThresholds) -> RotationArm {
    let tl = th.rotation_thrust_lever_deg;
    let next = match prev {
        None => RotationArm::Off,
        Some(RotationArm::Off) => {
            let takeoff_thrust = inp.thrust_lever_pos.iter().any(|&p| p >= tl);
            if inp.in_flight_gain < 1.0 && inp.v_tas_kn > th.rotation_v_tas_kn && takeoff_thrust {
                RotationArm::On
            } else {
                RotationArm::Off
            }
        }
        Some(RotationArm::On) => {
            let thrust_reduced = inp.thrust_lever_pos.iter().any(|&p| p < tl);
            if inp.in_flight_gain == 1.0
                || inp.h_radio_ft > th.flight_radio_ft
                || (inp.v_tas_kn < th.rotation_v_tas_kn && thrust_reduced)
            {
                RotationArm::Off
            } else {
                RotationArm::On
            }
        }
    };
    log_transition("rotation_arm", prev.as_ref(), &next);
    next
}
