// ─────────────────────────────────────────────────────────────────────
// SCPN Flight Control Core — Roll Law
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Rate-command / attitude-hold roll law.
//!
//! Stick deflection plus the bank-angle protection rate form a roll-rate
//! demand that is integrated into a bank command. The aileron law places
//! the closed-loop roll mode at a speed-scheduled natural frequency using
//! the aircraft's roll-damping and aileron-effectiveness derivatives.

use fbw_math::integrator::ReloadIntegrator;
use fbw_math::interp::{lookup1, lookup1_or_zero};
use fbw_math::limiters::{saturate_to, RateLimiter};
use fbw_types::constants::{HALF_RHO, KNOT_TO_MS};
use fbw_types::frame::{AutopilotInput, ConvertedData};
use fbw_types::params::RollLawParams;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollLawState {
    phi_integrator: ReloadIntegrator,
    phi_c: RateLimiter,
    /// Aileron law output of the previous frame.
    prev_xi_deg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollLawInputs<'a> {
    pub data: &'a ConvertedData,
    pub autopilot: &'a AutopilotInput,
    pub dt: f64,
    pub v_ias_kn: f64,
    /// Rate-limited lateral in-flight gain.
    pub roll_gain: f64,
    pub tracking_mode_on: bool,
    /// Bank-angle protection roll rate.
    pub bank_rate_deg_s: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RollLawOutput {
    pub pk_c_deg_s: f64,
    pub phi_c_deg: f64,
    /// Normal-law aileron command.
    pub xi_deg: f64,
    /// Direct-law aileron command.
    pub xi_direct_deg: f64,
}

impl RollLawState {
    pub fn step(&mut self, inp: &RollLawInputs<'_>, p: &RollLawParams) -> RollLawOutput {
        let d = inp.data;
        let dt = inp.dt;

        let pk_c = saturate_to(
            p.pk_stick_gain * d.delta_xi_pos + inp.bank_rate_deg_s,
            &p.pk_demand_limits,
        );
        // Roll-rate authority collapses to the measured rate once the
        // aileron saturates in that direction.
        let mut upper = p.pk_limits.upper;
        let mut lower = p.pk_limits.lower;
        if self.prev_xi_deg >= p.xi_saturation_deg {
            lower = d.pk_deg_s;
        } else if self.prev_xi_deg <= -p.xi_saturation_deg {
            upper = d.pk_deg_s;
        }
        let pk_limited = (pk_c * inp.roll_gain).max(lower).min(upper);

        let reload = inp.roll_gain == 0.0 || inp.tracking_mode_on || inp.autopilot.custom_on;
        let phi_integrated = self.phi_integrator.step(
            pk_limited * p.phi_integrator_gain * dt,
            reload,
            d.phi_deg,
            p.phi_integrator_limits.lower,
            p.phi_integrator_limits.upper,
        );
        let mut phi_c = self
            .phi_c
            .step(saturate_to(phi_integrated, &p.phi_c_limits), &p.phi_c_rate, dt);
        if inp.autopilot.custom_on {
            phi_c = if inp.tracking_mode_on {
                d.phi_deg
            } else {
                inp.autopilot.phi_c_deg
            };
        }

        let xi = aileron_law(inp.v_ias_kn, d.pk_deg_s, d.phi_deg, phi_c, dt, p);
        self.prev_xi_deg = xi;

        RollLawOutput {
            pk_c_deg_s: pk_c,
            phi_c_deg: phi_c,
            xi_deg: xi,
            xi_direct_deg: p.direct_xi_gain * d.delta_xi_pos,
        }
    }

    pub fn end_frame(&mut self) {
        self.phi_integrator.end_frame();
    }
}

/// Aileron command that drives Φ toward Φc with the scheduled roll-mode
/// frequency.
pub fn aileron_law(v_ias_kn: f64, pk: f64, phi: f64, phi_c: f64, dt: f64, p: &RollLawParams) -> f64 {
    let v = v_ias_kn.max(p.min_speed_kn) * KNOT_TO_MS;
    let q = v * v * HALF_RHO;
    let s = p.wing_area_m2;
    let b = p.wing_span_m;
    let l_xi = q * s * b * p.aileron_effectiveness_clxi / p.roll_inertia_scale;
    if l_xi == 0.0 {
        return 0.0;
    }
    let l_p = q / v * s * b * b * p.roll_damping_clp / p.roll_inertia_scale;
    let omega = lookup1_or_zero(&p.omega_schedule, v_ias_kn);
    let k_phi = -omega * omega / l_xi;

    let damping = -(l_p + p.damping_factor * omega) / l_xi * (p.pk_feedback_gain * pk);
    (damping + p.phi_feedback_gain * phi * k_phi + p.phi_c_gain * phi_c * -k_phi)
        * lookup1(&p.dt_schedule, dt)
        * p.output_gain
}
