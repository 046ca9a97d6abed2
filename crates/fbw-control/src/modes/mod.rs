// ─────────────────────────────────────────────────────────────────────
// SCPN Flight Control Core — Phase & Mode Machines
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Flight-phase and mode state machines.
//!
//! Every machine is a pure function `(Option<State>, inputs) -> State`.
//! `None` means the machine has never run; the first call activates it
//! in its designated initial state without evaluating any guard. When no
//! guard matches, the current state is kept. Outputs are functions of
//! the resulting state, exposed as methods on the state types.

pub mod flare;
pub mod ground;
pub mod rotation;
pub mod trim;

pub use flare::{flare_sequencer, FlareInputs, FlarePhase, FlareState};
pub use ground::{
    flight_phase, ground_air, landing_phase, roll_mode, FlightPhase, FlightPhaseInputs, GroundAir,
    LandingPhase, RollMode,
};
pub use rotation::{rotation_arm, RotationArm, RotationInputs};
pub use trim::{pitch_config, trim_freeze, trim_mode, PitchConfig, TrimFreeze, TrimMode, TrimModeOutput};

use fbw_math::filters::LagFilter;
use fbw_math::limiters::RateLimiter;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::mem::discriminant;
use tracing::debug;

/// Current state of every machine plus the rate-limited gains derived
/// from their flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModeState {
    pub ground_air: Option<GroundAir>,
    pub landing: Option<LandingPhase>,
    pub flight_phase: Option<FlightPhase>,
    pub rotation: Option<RotationArm>,
    pub flare: Option<FlareState>,
    pub pitch_config: Option<PitchConfig>,
    pub trim_freeze: Option<TrimFreeze>,
    pub trim_mode: Option<TrimMode>,
    pub roll_mode: Option<RollMode>,
    /// Attitude filter feeding the flare sequencer.
    pub flare_theta_lag: LagFilter,
    /// Rate-limited flare attitude target.
    pub flare_command: Option<f64>,
    pub in_flight_gain: RateLimiter,
    pub in_rotation_gain: RateLimiter,
    pub lateral_in_flight_gain: RateLimiter,
    pub nz_limit_up: RateLimiter,
    pub nz_limit_lo: RateLimiter,
}

/// Emit a debug event when `next` differs in kind from `prev`.
pub(crate) fn log_transition<S: Debug>(machine: &'static str, prev: Option<&S>, next: &S) {
    match prev {
        None => debug!(machine, to = ?next, "state machine activated"),
        Some(p) if discriminant(p) != discriminant(next) => {
            debug!(machine, from = ?p, to = ?next, "state transition")
        }
        Some(_) => {}
    }
}
