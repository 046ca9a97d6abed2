// ─────────────────────────────────────────────────────────────────────
// SCPN Flight Control Core — Ground & Flight Phase Machines
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Ground/air detection, landing-phase classification, the pitch
//! flight/ground transition and the roll flight-mode latch.

use super::log_transition;
use fbw_types::params::ModeThresholds;
use serde::{Deserialize, Serialize};

// ── Ground / Air ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroundAir {
    OnGround,
    InAir,
}

impl GroundAir {
    pub fn on_ground(self) -> bool {
        self == GroundAir::OnGround
    }
}

/// `mains` are the left and right main-gear strut compressions.
///
/// Any main strut above the threshold means ground; leaving the ground
/// needs both struts fully extended.
pub fn ground_air(prev: Option<GroundAir>, mains: [f64; 2], th: &ModeThresholds) -> GroundAir {
    let next = match prev {
        None => GroundAir::OnGround,
        Some(GroundAir::InAir) => {
            if mains.iter().any(|&c| c > th.gear_on_ground) {
                GroundAir::OnGround
            } else {
                GroundAir::InAir
            }
        }
        Some(GroundAir::OnGround) => {
            if mains.iter().all(|&c| c == 0.0) {
                GroundAir::InAir
            } else {
                GroundAir::OnGround
            }
        }
    };
    log_transition("ground_air", prev.as_ref(), &next);
    next
}

// ── Landing phase ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LandingPhase {
    Flying,
    Landed,
    Landing100ft,
    Takeoff100ft,
}

impl LandingPhase {
    /// Alpha-floor is inhibited on the ground and on final approach.
    pub fn alpha_floor_inhibited(self) -> bool {
        matches!(self, LandingPhase::Landed | LandingPhase::Landing100ft)
    }

    /// Autopilot disconnect on alpha_max exceedance, armed on final.
    pub fn ap_special_disc(self) -> bool {
        self == LandingPhase::Landing100ft
    }
}

pub fn landing_phase(
    prev: Option<LandingPhase>,
    on_ground: bool,
    h_radio_ft: f64,
    th: &ModeThresholds,
) -> LandingPhase {
    let h = th.landing_radio_ft;
    let next = match prev {
        None => LandingPhase::Landed,
        Some(LandingPhase::Flying) => {
            if h_radio_ft < h {
                LandingPhase::Landing100ft
            } else if on_ground {
                LandingPhase::Landed
            } else {
                LandingPhase::Flying
            }
        }
        Some(LandingPhase::Landed) => {
            if !on_ground {
                LandingPhase::Takeoff100ft
            } else {
                LandingPhase::Landed
            }
        }
        Some(LandingPhase::Landing100ft) => {
            if h_radio_ft > h {
                LandingPhase::Flying
            } else if on_ground {
                LandingPhase::Landed
            } else {
                LandingPhase::Landing100ft
            }
        }
        Some(LandingPhase::Takeoff100ft) => {
            if on_ground {
                LandingPhase::Landed
            } else if h_radio_ft > h {
                LandingPhase::Flying
            } else {
                LandingPhase::Takeoff100ft
            }
        }
    };
    log_transition("landing_phase", prev.as_ref(), &next);
    next
}

// ── Flight / Ground transition ───────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FlightPhase {
    Flight,
    /// Settling on the ground; `on_ground_time` is when contact began.
    FlightToGroundTransition { on_ground_time: f64 },
    Ground,
}

impl FlightPhase {
    /// The transition state keeps the flight output until it settles.
    pub fn in_flight(self) -> bool {
        !matches!(self, FlightPhase::Ground)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightPhaseInputs {
    pub on_ground: bool,
    pub theta_deg: f64,
    pub h_radio_ft: f64,
    pub simulation_time: f64,
}

pub fn flight_phase(
    prev: Option<FlightPhase>,
    inp: &FlightPhaseInputs,
    th: &ModeThresholds,
) -> FlightPhase {
    let next = match prev {
        None => FlightPhase::Ground,
        Some(FlightPhase::Flight) => {
            if inp.on_ground && inp.theta_deg < th.ground_theta_deg {
                FlightPhase::FlightToGroundTransition {
                    on_ground_time: inp.simulation_time,
                }
            } else {
                FlightPhase::Flight
            }
        }
        Some(FlightPhase::FlightToGroundTransition { on_ground_time }) => {
            if inp.simulation_time - on_ground_time >= th.ground_settle_s {
                FlightPhase::Ground
            } else if !inp.on_ground || inp.theta_deg >= th.ground_theta_deg {
                FlightPhase::Flight
            } else {
                FlightPhase::FlightToGroundTransition { on_ground_time }
            }
        }
        Some(FlightPhase::Ground) => {
            if lift_off(inp.on_ground, inp.theta_deg, inp.h_radio_ft, th) {
                FlightPhase::Flight
            } else {
                FlightPhase::Ground
            }
        }
    };
    log_transition("flight_phase", prev.as_ref(), &next);
    next
}

fn lift_off(on_ground: bool, theta_deg: f64, h_radio_ft: f64, th: &ModeThresholds) -> bool {
    (!on_ground && theta_deg > th.flight_theta_deg) || h_radio_ft > th.flight_radio_ft
}

// ── Roll flight mode ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollMode {
    GroundMode,
    FlightMode,
}

impl RollMode {
    pub fn in_flight(self) -> bool {
        self == RollMode::FlightMode
    }
}

pub fn roll_mode(
    prev: Option<RollMode>,
    on_ground: bool,
    theta_deg: f64,
    h_radio_ft: f64,
    th: &ModeThresholds,
) -> RollMode {
    let next = match prev {
        None => RollMode::GroundMode,
        Some(RollMode::FlightMode) => {
            if on_ground {
                RollMode::GroundMode
            } else {
                RollMode::FlightMode
            }
        }
        Some(RollMode::GroundMode) => {
            if lift_off(on_ground, theta_deg, h_radio_ft, th) {
                RollMode::FlightMode
            } else {
                RollMode::GroundMode
            }
        }
    };
    log_transition("roll_mode", prev.as_ref(), &next);
    next
}
