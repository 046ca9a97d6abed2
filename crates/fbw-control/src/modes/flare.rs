// ─────────────────────────────────────────────────────────────────────
// SCPN Flight Control Core — Flare Sequencer
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Landing flare.
//!
//! Below the flare height the current (filtered) pitch attitude is
//! stored, a reduction rate is computed that brings it to the final
//! attitude over a fixed time, and once below the reduction height the
//! attitude target is switched to the final value. The normal law
//! follows the rate-limited target while `in_flare` is set.

use super::log_transition;
use fbw_types::params::ModeThresholds;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlarePhase {
    Ground,
    FlightLow,
    FlightHigh,
    StoreTheta,
    SetRate,
    ReduceTheta,
}

/// Sequencer phase together with the attitude target it publishes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlareState {
    pub phase: FlarePhase,
    pub in_flare: bool,
    pub theta_c_deg: f64,
    pub theta_c_rate_deg_s: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlareInputs {
    pub in_flight: bool,
    pub h_radio_ft: f64,
    /// Lag-filtered pitch attitude.
    pub theta_filtered_deg: f64,
    pub manual_arm: bool,
    pub manual_reduce: bool,
}

pub fn flare_sequencer(prev: Option<FlareState>, inp: &FlareInputs, th: &ModeThresholds) -> FlareState {
    let idle = |phase| FlareState {
        phase,
        in_flare: false,
        theta_c_deg: inp.theta_filtered_deg,
        theta_c_rate_deg_s: th.flare_initial_rate_deg_s,
    };
    let above_flare = inp.h_radio_ft > th.flare_high_ft && !inp.manual_arm;

    let next = match prev {
        None => idle(FlarePhase::Ground),
        Some(s) => match s.phase {
            FlarePhase::Ground => {
                if inp.in_flight {
                    idle(FlarePhase::FlightLow)
                } else {
                    idle(FlarePhase::Ground)
                }
            }
            FlarePhase::FlightLow => {
                if inp.h_radio_ft > th.flare_high_ft {
                    idle(FlarePhase::FlightHigh)
                } else {
                    idle(FlarePhase::FlightLow)
                }
            }
            FlarePhase::FlightHigh => {
                if inp.h_radio_ft <= th.flare_high_ft || inp.manual_arm {
                    FlareState {
                        phase: FlarePhase::StoreTheta,
                        in_flare: true,
                        theta_c_deg: inp.theta_filtered_deg,
                        theta_c_rate_deg_s: s.theta_c_rate_deg_s,
                    }
                } else {
                    idle(FlarePhase::FlightHigh)
                }
            }
            FlarePhase::StoreTheta => {
                if above_flare {
                    idle(FlarePhase::FlightLow)
                } else {
                    let rate = if th.flare_reduce_time_s > 0.0 {
                        -(inp.theta_filtered_deg - th.flare_final_theta_deg) / th.flare_reduce_time_s
                    } else {
                        s.theta_c_rate_deg_s
                    };
                    FlareState {
                        phase: FlarePhase::SetRate,
                        theta_c_rate_deg_s: rate,
                        ..s
                    }
                }
            }
            FlarePhase::SetRate => {
                if inp.h_radio_ft <= th.flare_reduce_ft || inp.manual_reduce {
                    FlareState {
                        phase: FlarePhase::ReduceTheta,
                        in_flare: true,
                        theta_c_deg: th.flare_final_theta_deg,
                        theta_c_rate_deg_s: s.theta_c_rate_deg_s,
                    }
                } else if above_flare {
                    idle(FlarePhase::FlightLow)
                } else {
                    s
                }
            }
            FlarePhase::ReduceTheta => {
                if !inp.in_flight {
                    idle(FlarePhase::Ground)
                } else if above_flare {
                    idle(FlarePhase::FlightLow)
                } else {
                    FlareState {
                        in_flare: true,
                        theta_c_deg: th.flare_final_theta_deg,
                        ..s
                    }
                }
            }
        },
    };
    log_transition("flare", prev.as_ref().map(|s| &s.phase), &next.phase);
    next
}
