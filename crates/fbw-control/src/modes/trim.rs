// ─────────────────────────────────────────────────────────────────────
// SCPN Flight Control Core — Pitch Configuration & Trim Modes
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Flap-dependent pitch configuration, automatic-trim freeze and trim
//! mode selection.

use super::log_transition;
use fbw_types::params::{Limits, ModeThresholds, PitchConfigParams};
use serde::{Deserialize, Serialize};

// ── Pitch configuration ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PitchConfig {
    Ground,
    Clean,
    Flaps,
}

impl PitchConfig {
    /// Auto-trim rate (deg/s) in this configuration.
    pub fn trim_rate_deg_s(self, p: &PitchConfigParams) -> f64 {
        match self {
            PitchConfig::Clean => p.clean_trim_rate_deg_s,
            PitchConfig::Ground | PitchConfig::Flaps => p.flaps_trim_rate_deg_s,
        }
    }

    /// Load-factor envelope before rate limiting.
    pub fn nz_limits(self, p: &PitchConfigParams) -> Limits {
        match self {
            PitchConfig::Clean => p.clean_nz_limits,
            PitchConfig::Ground | PitchConfig::Flaps => p.flaps_nz_limits,
        }
    }
}

pub fn pitch_config(prev: Option<PitchConfig>, in_flight: bool, flaps_handle_index: f64) -> PitchConfig {
    let clean = flaps_handle_index == 0.0;
    let next = match prev {
        None => PitchConfig::Ground,
        Some(PitchConfig::Clean) => {
            if !clean {
                PitchConfig::Flaps
            } else if !in_flight {
                PitchConfig::Ground
            } else {
                PitchConfig::Clean
            }
        }
        Some(PitchConfig::Flaps) => {
            if clean {
                PitchConfig::Clean
            } else if !in_flight {
                PitchConfig::Ground
            } else {
                PitchConfig::Flaps
            }
        }
        Some(PitchConfig::Ground) => match (in_flight, clean) {
            (true, true) => PitchConfig::Clean,
            (true, false) => PitchConfig::Flaps,
            (false, _) => PitchConfig::Ground,
        },
    };
    log_transition("pitch_config", prev.as_ref(), &next);
    next
}

// ── Trim freeze ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrimFreeze {
    Running,
    Frozen,
}

impl TrimFreeze {
    pub fn should_freeze(self) -> bool {
        self == TrimFreeze::Frozen
    }
}

pub fn trim_freeze(
    prev: Option<TrimFreeze>,
    in_flare: bool,
    nz_g: f64,
    phi_deg: f64,
    th: &ModeThresholds,
) -> TrimFreeze {
    let nominal = !in_flare
        && nz_g > th.trim_freeze_nz_lo_g
        && nz_g < th.trim_freeze_nz_hi_g
        && phi_deg.abs() <= th.trim_freeze_phi_deg;
    let next = match prev {
        None => TrimFreeze::Running,
        Some(_) if nominal => TrimFreeze::Running,
        Some(_) => TrimFreeze::Frozen,
    };
    log_transition("trim_freeze", prev.as_ref(), &next);
    next
}

// ── Trim mode ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrimMode {
    Automatic,
    Manual,
    Reset,
    Tracking,
}

/// Per-state trim integrator control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimModeOutput {
    pub reset: bool,
    pub reset_deg: f64,
    pub should_write: bool,
}

impl TrimMode {
    /// `measured_trim_deg` is the converted stabiliser position.
    pub fn output(self, measured_trim_deg: f64) -> TrimModeOutput {
        let (reset, reset_deg, should_write) = match self {
            TrimMode::Automatic => (false, measured_trim_deg, true),
            TrimMode::Manual => (true, measured_trim_deg, false),
            TrimMode::Reset => (true, 0.0, true),
            TrimMode::Tracking => (true, measured_trim_deg, false),
        };
        TrimModeOutput {
            reset,
            reset_deg,
            should_write,
        }
    }
}

pub fn trim_mode(
    prev: Option<TrimMode>,
    in_flight: bool,
    tracking_mode_on: bool,
    measured_trim_deg: f64,
) -> TrimMode {
    let next = match prev {
        None => TrimMode::Manual,
        Some(TrimMode::Automatic) => {
            if !in_flight {
                TrimMode::Reset
            } else if tracking_mode_on {
                TrimMode::Tracking
            } else {
                TrimMode::Automatic
            }
        }
        Some(TrimMode::Manual) => {
            if in_flight {
                TrimMode::Automatic
            } else {
                TrimMode::Manual
            }
        }
        Some(TrimMode::Reset) => {
            if !in_flight && measured_trim_deg == 0.0 {
                TrimMode::Manual
            } else {
                TrimMode::Reset
            }
        }
        Some(TrimMode::Tracking) => {
            if !tracking_mode_on {
                TrimMode::Automatic
            } else {
                TrimMode::Tracking
            }
        }
    };
    log_transition("trim_mode", prev.as_ref(), &next);
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_config_follows_flaps() {
        let p = PitchConfigParams::default();
        let s = pitch_config(None, true, 0.0);
        assert_eq!(s, PitchConfig::Ground, "Activation ignores guards");
        let s = pitch_config(Some(s), true, 0.0);
        assert_eq!(s, PitchConfig::Clean);
        assert_eq!(s.trim_rate_deg_s(&p), 0.3);
        assert_eq!(s.nz_limits(&p), Limits::new(-1.0, 2.5));
        let s = pitch_config(Some(s), true, 2.0);
        assert_eq!(s, PitchConfig::Flaps);
        assert_eq!(s.nz_limits(&p), Limits::new(0.0, 2.0));
        let s = pitch_config(Some(s), false, 2.0);
        assert_eq!(s, PitchConfig::Ground);
        assert_eq!(s.trim_rate_deg_s(&p), 0.7);
    }

    #[test]
    fn test_trim_freeze_envelope() {
        let th = ModeThresholds::default();
        let s = trim_freeze(None, false, 3.0, 0.0, &th);
        assert_eq!(s, TrimFreeze::Running);
        let s = trim_freeze(Some(s), false, 1.3, 0.0, &th);
        assert!(s.should_freeze());
        let s = trim_freeze(Some(s), false, 1.0, 10.0, &th);
        assert!(!s.should_freeze());
        let s = trim_freeze(Some(s), false, 1.0, -31.0, &th);
        assert!(s.should_freeze(), "Bank beyond 30 deg freezes");
        let s = trim_freeze(Some(s), true, 1.0, 0.0, &th);
        assert!(s.should_freeze(), "Flare freezes");
        let s = trim_freeze(Some(s), false, 0.5, 0.0, &th);
        assert!(s.should_freeze(), "Lower bound is exclusive");
    }

    #[test]
    fn test_trim_mode_cycle() {
        let s = trim_mode(None, true, false, 1.0);
        assert_eq!(s, TrimMode::Manual);
        let o = s.output(1.0);
        assert!(o.reset && !o.should_write);

        let s = trim_mode(Some(s), true, false, 1.0);
        assert_eq!(s, TrimMode::Automatic);
        let o = s.output(1.0);
        assert!(!o.reset && o.should_write);

        let s = trim_mode(Some(s), true, true, 1.0);
        assert_eq!(s, TrimMode::Tracking);
        let s = trim_mode(Some(s), true, false, 1.0);
        assert_eq!(s, TrimMode::Automatic);

        let s = trim_mode(Some(s), false, false, 2.0);
        assert_eq!(s, TrimMode::Reset);
        assert_eq!(s.output(2.0).reset_deg, 0.0);
        let s = trim_mode(Some(s), false, false, 0.4);
        assert_eq!(s, TrimMode::Reset, "Waits for the trim to reach zero");
        let s = trim_mode(Some(s), false, false, 0.0);
        assert_eq!(s, TrimMode::Manual);
    }
}
