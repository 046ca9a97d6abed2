// ─────────────────────────────────────────────────────────────────────
// SCPN Flight Control Core — Envelope Protections
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! High angle-of-attack, alpha-floor and high-speed latches, the
//! autopilot-disconnect discriminator, trim-limit freezing and the
//! bank-angle roll-rate schedule.
//!
//! Latches are evaluated set-then-clear, so a clear condition that holds
//! in the same frame as a set condition wins.

use fbw_math::interp::lookup1;
use fbw_math::limiters::LimitFreeze;
use fbw_types::frame::{AirDataStatus, ProtectionStatus};
use fbw_types::params::ProtectionParams;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtectionState {
    high_aoa: bool,
    alpha_floor: bool,
    high_speed: bool,
    /// Last time the stick was released or alpha reached alpha_max.
    high_aoa_reset_time: Option<f64>,
    /// Last time the speed was below the high-speed timer threshold.
    high_speed_event_time: Option<f64>,
    trim_lo_freeze: LimitFreeze,
    trim_up_freeze: LimitFreeze,
}

/// Per-frame inputs, already converted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProtectionInputs {
    pub simulation_time: f64,
    pub monotonic_time: f64,
    pub on_ground: bool,
    pub ap_custom: bool,
    pub alpha_floor_inhibited: bool,
    pub ap_special_disc: bool,
    pub delta_eta_pos: f64,
    pub h_radio_ft: f64,
    pub v_ias_kn: f64,
    pub v_mach: f64,
    pub theta_deg: f64,
    pub phi_deg: f64,
    /// Unfiltered angle of attack, used for the flight-path estimate.
    pub alpha_deg: f64,
    pub flaps_handle_index: f64,
    pub eta_trim_deg: f64,
}

/// Dynamic trim-limit pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimLimits {
    pub lower: f64,
    pub upper: f64,
}

/// Indicated airspeed that corresponds to `mach_target` at the current
/// speed/Mach ratio.
pub fn ias_for_mach(v_ias_kn: f64, v_mach: f64, mach_target: f64, mach_floor: f64) -> f64 {
    v_ias_kn / v_mach.max(mach_floor) * mach_target
}

fn log_latch(name: &'static str, before: bool, after: bool) {
    if before != after {
        info!(protection = name, active = after, "protection latch changed");
    }
}

impl ProtectionState {
    #[cfg(test)]
    fn high_aoa_active(&self) -> bool {
        self.high_aoa
    }

    pub fn update(
        &mut self,
        inp: &ProtectionInputs,
        air: &AirDataStatus,
        p: &ProtectionParams,
        mach_floor: f64,
    ) -> (ProtectionStatus, TrimLimits) {
        let t = inp.simulation_time;
        let armed = inp.monotonic_time > p.arm_after_s;
        let alpha_f = air.alpha_filtered_deg;

        // high angle of attack
        let before = self.high_aoa;
        let reset = self.high_aoa_reset_time.get_or_insert(t);
        if inp.delta_eta_pos >= p.high_aoa_stick_release || alpha_f >= air.alpha_max_deg || *reset == 0.0 {
            *reset = t;
        }
        if !inp.on_ground && !inp.ap_custom && alpha_f > air.alpha_prot_deg && armed {
            self.high_aoa = true;
        }
        let low_and_recovering = inp.h_radio_ft < p.high_aoa_low_radio_ft
            && inp.delta_eta_pos < p.high_aoa_low_stick
            && alpha_f < air.alpha_prot_deg - p.high_aoa_low_alpha_margin_deg;
        if t - *reset > p.high_aoa_exit_timeout_s
            || inp.delta_eta_pos < p.high_aoa_stick_exit
            || low_and_recovering
            || inp.on_ground
        {
            self.high_aoa = false;
        }
        log_latch("high_aoa", before, self.high_aoa);

        // alpha floor
        let before = self.alpha_floor;
        let mut set = false;
        if !inp.alpha_floor_inhibited && inp.v_mach < p.alpha_floor_mach_max {
            let trend_floor = if inp.flaps_handle_index >= p.alpha_floor_flaps_index {
                p.alpha_floor_speed_trend_floor
            } else {
                0.0
            };
            let margin = air.v_ias_dot_kn_s.max(trend_floor).min(0.0);
            set = alpha_f > air.alpha_floor_deg + margin && armed;
        }
        if set {
            self.alpha_floor = true;
        } else if inp.alpha_floor_inhibited || !self.high_aoa {
            self.alpha_floor = false;
        }
        log_latch("alpha_floor", before, self.alpha_floor);

        // high speed
        let before = self.high_speed;
        let v = inp.v_ias_kn;
        let v_hsp_low = p.vmo_kn.min(ias_for_mach(v, inp.v_mach, p.mmo, mach_floor));
        let v_hsp_high = p.vmo_max_kn.min(ias_for_mach(v, inp.v_mach, p.mmo_max, mach_floor));
        let fpa = inp.theta_deg - inp.phi_deg.to_radians().cos() * inp.alpha_deg;
        let activation = lookup1(&p.high_speed_activation_kn, fpa).min(ias_for_mach(
            v,
            inp.v_mach,
            lookup1(&p.high_speed_activation_mach, fpa),
            mach_floor,
        ));
        if !inp.ap_custom && v > activation {
            self.high_speed = true;
        }
        if v < v_hsp_low || inp.ap_custom {
            self.high_speed = false;
        }
        log_latch("high_speed", before, self.high_speed);

        let event = self.high_speed_event_time.get_or_insert(t);
        let timer_threshold = p.high_speed_timer_cap_kn.min(ias_for_mach(
            v,
            inp.v_mach,
            lookup1(&p.high_speed_timer_mach, fpa) + p.high_speed_timer_mach_margin,
            mach_floor,
        ));
        if v <= timer_threshold || *event == 0.0 {
            *event = t;
        }
        let overspeed_persisting = t - *event > p.high_speed_timer_s;

        let alpha_exceeded = !inp.on_ground
            && ((inp.ap_special_disc && alpha_f > air.alpha_max_deg)
                || alpha_f > air.alpha_prot_deg + p.ap_disc_alpha_margin_deg);
        let any_active = alpha_exceeded || overspeed_persisting || self.high_speed || self.high_aoa;

        let lower = if self.high_aoa {
            self.trim_lo_freeze.step(inp.eta_trim_deg, true)
        } else {
            self.trim_lo_freeze.step(inp.eta_trim_deg, false);
            p.trim_limit_lo_deg
        };
        let upper = if self.high_speed {
            self.trim_up_freeze.step(inp.eta_trim_deg, true)
        } else {
            self.trim_up_freeze.step(inp.eta_trim_deg, false);
            p.trim_limit_up_deg
        };

        let status = ProtectionStatus {
            alpha_floor_active: self.alpha_floor,
            high_aoa_active: self.high_aoa,
            high_speed_active: self.high_speed,
            any_active,
            v_hsp_low_kn: v_hsp_low,
            v_hsp_high_kn: v_hsp_high,
            v_target_kn: 0.0,
            alpha_c_deg: 0.0,
            bank_rate_deg_s: self.bank_angle_rate(inp.phi_deg, p),
        };
        (status, TrimLimits { lower, upper })
    }

    /// Roll-rate demand that returns the aircraft toward the permitted
    /// bank range of the active protection.
    pub fn bank_angle_rate(&self, phi_deg: f64, p: &ProtectionParams) -> f64 {
        let table = if self.high_speed {
            &p.bank_angle_high_speed
        } else if self.high_aoa {
            &p.bank_angle_high_aoa
        } else {
            &p.bank_angle_normal
        };
        lookup1(table, phi_deg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cruise(t: f64) -> ProtectionInputs {
        ProtectionInputs {
            simulation_time: t,
            monotonic_time: t,
            on_ground: false,
            ap_custom: false,
            alpha_floor_inhibited: false,
            ap_special_disc: false,
            delta_eta_pos: 0.0,
            h_radio_ft: 3000.0,
            v_ias_kn: 250.0,
            v_mach: 0.5,
            theta_deg: 2.0,
            phi_deg: 0.0,
            alpha_deg: 3.0,
            flaps_handle_index: 0.0,
            eta_trim_deg: 2.0,
        }
    }

    fn air(alpha: f64) -> AirDataStatus {
        AirDataStatus {
            alpha_filtered_deg: alpha,
            alpha_max_deg: 15.0,
            alpha_prot_deg: 12.0,
            alpha_floor_deg: 13.5,
            ..AirDataStatus::default()
        }
    }

    #[test]
    fn test_nominal_cruise_is_quiet() {
        let p = ProtectionParams::default();
        let mut s = ProtectionState::default();
        let (st, lim) = s.update(&cruise(20.0), &air(3.0), &p, 0.01);
        assert!(!st.any_active, "{st:?}");
        assert_eq!(lim.lower, p.trim_limit_lo_deg);
        assert_eq!(lim.upper, p.trim_limit_up_deg);
    }

    #[test]
    fn test_high_aoa_requires_arming_time() {
        let p = ProtectionParams::default();
        let mut s = ProtectionState::default();
        let mut inp = cruise(5.0);
        inp.delta_eta_pos = 0.6;
        let (st, _) = s.update(&inp, &air(12.5), &p, 0.01);
        assert!(!st.high_aoa_active, "Not armed before 10 s");
        inp.simulation_time = 10.5;
        inp.monotonic_time = 10.5;
        let (st, _) = s.update(&inp, &air(12.5), &p, 0.01);
        assert!(st.high_aoa_active);
        assert!(st.any_active);
    }

    #[test]
    fn test_high_aoa_clears_after_stick_release_timeout() {
        let p = ProtectionParams::default();
        let mut s = ProtectionState::default();
        let mut inp = cruise(20.0);
        inp.delta_eta_pos = -0.2;
        s.update(&inp, &air(12.5), &p, 0.01);
        assert!(s.high_aoa_active());
        // stick held slightly nose-up: reset timer stops refreshing
        inp.simulation_time = 20.3;
        s.update(&inp, &air(12.5), &p, 0.01);
        assert!(s.high_aoa_active());
        inp.simulation_time = 20.6;
        s.update(&inp, &air(12.5), &p, 0.01);
        assert!(!s.high_aoa_active(), "Cleared after 0.5 s");
    }

    #[test]
    fn test_alpha_floor_latches_and_clears_with_high_aoa() {
        let p = ProtectionParams::default();
        let mut s = ProtectionState::default();
        let mut inp = cruise(20.0);
        inp.delta_eta_pos = 0.8;
        let (st, _) = s.update(&inp, &air(14.0), &p, 0.01);
        assert!(st.alpha_floor_active && st.high_aoa_active);

        // alpha back below the floor but high-AoA still active: latch holds
        let (st, _) = s.update(&inp, &air(12.5), &p, 0.01);
        assert!(st.alpha_floor_active, "Latched");

        inp.delta_eta_pos = -0.6;
        let (st, _) = s.update(&inp, &air(12.5), &p, 0.01);
        assert!(!st.high_aoa_active);
        assert!(!st.alpha_floor_active, "Cleared together with high-AoA");
    }

    #[test]
    fn test_alpha_floor_inhibited_on_final() {
        let p = ProtectionParams::default();
        let mut s = ProtectionState::default();
        let mut inp = cruise(20.0);
        inp.alpha_floor_inhibited = true;
        let (st, _) = s.update(&inp, &air(14.0), &p, 0.01);
        assert!(!st.alpha_floor_active);
    }

    #[test]
    fn test_high_speed_latch_and_trim_freeze() {
        let p = ProtectionParams::default();
        let mut s = ProtectionState::default();
        let mut inp = cruise(20.0);
        inp.v_ias_kn = 370.0;
        inp.v_mach = 0.7;
        inp.eta_trim_deg = 1.25;
        let (st, lim) = s.update(&inp, &air(2.0), &p, 0.01);
        assert!(st.high_speed_active);
        assert!(st.any_active);
        assert_eq!(lim.upper, 1.25, "Upper trim limit frozen at current trim");
        assert_eq!(lim.lower, p.trim_limit_lo_deg);

        inp.eta_trim_deg = 3.0;
        let (_, lim) = s.update(&inp, &air(2.0), &p, 0.01);
        assert_eq!(lim.upper, 1.25, "Stays frozen");

        inp.v_ias_kn = 300.0;
        let (st, lim) = s.update(&inp, &air(2.0), &p, 0.01);
        assert!(!st.high_speed_active);
        assert_eq!(lim.upper, p.trim_limit_up_deg);
    }

    #[test]
    fn test_ap_custom_suppresses_high_speed() {
        let p = ProtectionParams::default();
        let mut s = ProtectionState::default();
        let mut inp = cruise(20.0);
        inp.v_ias_kn = 370.0;
        inp.v_mach = 0.7;
        inp.ap_custom = true;
        let (st, _) = s.update(&inp, &air(2.0), &p, 0.01);
        assert!(!st.high_speed_active);
    }

    #[test]
    fn test_overspeed_timer_raises_any_active_under_ap_custom() {
        let p = ProtectionParams::default();
        let mut s = ProtectionState::default();
        let mut inp = cruise(20.0);
        inp.ap_custom = true;
        inp.v_ias_kn = 370.0;
        inp.v_mach = 0.7;
        for i in 0..=29 {
            inp.simulation_time = 20.0 + i as f64 * 0.1;
            let (st, _) = s.update(&inp, &air(2.0), &p, 0.01);
            assert!(!st.high_speed_active, "Latch suppressed by AP custom");
            assert!(!st.any_active, "Not persisting yet at t={}", inp.simulation_time);
        }
        inp.simulation_time = 23.1;
        let (st, _) = s.update(&inp, &air(2.0), &p, 0.01);
        assert!(!st.high_speed_active);
        assert!(st.any_active, "Overspeed beyond 3 s requests disconnect");
    }

    #[test]
    fn test_overspeed_timer_restarts_below_threshold() {
        let p = ProtectionParams::default();
        let mut s = ProtectionState::default();
        let mut inp = cruise(20.0);
        inp.ap_custom = true;
        inp.v_ias_kn = 370.0;
        inp.v_mach = 0.7;
        s.update(&inp, &air(2.0), &p, 0.01);

        // back to the 365 kn cap refreshes the event time
        inp.simulation_time = 22.0;
        inp.v_ias_kn = 365.0;
        let (st, _) = s.update(&inp, &air(2.0), &p, 0.01);
        assert!(!st.any_active);

        inp.v_ias_kn = 370.0;
        inp.simulation_time = 24.5;
        let (st, _) = s.update(&inp, &air(2.0), &p, 0.01);
        assert!(!st.any_active, "Only 2.5 s since the restart");
        inp.simulation_time = 25.1;
        let (st, _) = s.update(&inp, &air(2.0), &p, 0.01);
        assert!(st.any_active);
    }

    #[test]
    fn test_special_disconnect_uses_alpha_max() {
        let p = ProtectionParams::default();
        let air = AirDataStatus {
            alpha_filtered_deg: 12.2,
            alpha_max_deg: 12.1,
            alpha_prot_deg: 12.0,
            alpha_floor_deg: 13.5,
            ..AirDataStatus::default()
        };
        let mut inp = cruise(20.0);
        inp.ap_custom = true;

        let mut s = ProtectionState::default();
        let (st, _) = s.update(&inp, &air, &p, 0.01);
        assert!(!st.any_active, "Inside alpha_prot + margin without the special discrete");

        inp.ap_special_disc = true;
        let mut s = ProtectionState::default();
        let (st, _) = s.update(&inp, &air, &p, 0.01);
        assert!(!st.high_aoa_active);
        assert!(st.any_active, "Beyond alpha_max with the special discrete");

        inp.on_ground = true;
        let mut s = ProtectionState::default();
        let (st, _) = s.update(&inp, &air, &p, 0.01);
        assert!(!st.any_active, "Never on ground");
    }

    #[test]
    fn test_alpha_beyond_prot_margin_requests_disconnect() {
        let p = ProtectionParams::default();
        let mut inp = cruise(20.0);
        inp.ap_custom = true;

        let mut s = ProtectionState::default();
        let (st, _) = s.update(&inp, &air(12.2), &p, 0.01);
        assert!(!st.any_active, "Within the 0.25 deg margin");

        let mut s = ProtectionState::default();
        let (st, _) = s.update(&inp, &air(12.5), &p, 0.01);
        assert!(!st.high_aoa_active, "AP custom keeps the latch off");
        assert!(st.any_active);

        inp.on_ground = true;
        let mut s = ProtectionState::default();
        let (st, _) = s.update(&inp, &air(12.5), &p, 0.01);
        assert!(!st.any_active, "Never on ground");
    }

    #[test]
    fn test_bank_angle_schedule_selection() {
        let p = ProtectionParams::default();
        let s = ProtectionState::default();
        assert_eq!(s.bank_angle_rate(20.0, &p), 0.0);
        assert!(s.bank_angle_rate(50.0, &p) < 0.0, "Rolls back beyond 33 deg");
        let s = ProtectionState {
            high_aoa: true,
            ..ProtectionState::default()
        };
        assert!(s.bank_angle_rate(30.0, &p) < 0.0, "Tighter range at high AoA");
    }

    #[test]
    fn test_ias_for_mach_floor() {
        assert!(ias_for_mach(0.0, 0.0, 0.82, 0.01).is_finite());
        assert!((ias_for_mach(250.0, 0.5, 0.82, 0.01) - 410.0).abs() < 1e-9);
    }
}
