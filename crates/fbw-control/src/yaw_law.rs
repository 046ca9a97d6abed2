// ─────────────────────────────────────────────────────────────────────
// SCPN Flight Control Core — Yaw Law
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Yaw damper, turn coordination, sideslip law, rudder travel limit and
//! rudder trim.

use fbw_math::filters::LagFilter;
use fbw_math::integrator::ReloadIntegrator;
use fbw_math::interp::lookup1;
use fbw_math::limiters::{saturate, saturate_to, RateLimiter};
use fbw_types::constants::{DEG_TO_RAD, G, HALF_RHO, KNOT_TO_MS, RAD_TO_DEG};
use fbw_types::frame::{AutopilotInput, ConvertedData, SensorData};
use fbw_types::params::YawLawParams;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YawLawState {
    thrust_lag: LagFilter,
    thrust_alpha_lag: LagFilter,
    thrust_cross_lag: LagFilter,
    tc_blend: RateLimiter,
    ground_blend: RateLimiter,
    beta_lag: LagFilter,
    trim_integrator: ReloadIntegrator,
    trim_command: RateLimiter,
    /// Rudder command of the previous frame, feeds the sideslip estimate.
    prev_zeta_deg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YawLawInputs<'a> {
    pub data: &'a ConvertedData,
    pub sensors: &'a SensorData,
    pub autopilot: &'a AutopilotInput,
    pub dt: f64,
    /// Body yaw rate (deg/s).
    pub r_deg_s: f64,
    pub on_ground: bool,
    pub tracking_mode_on: bool,
    pub phi_c_deg: f64,
    pub wing_area_m2: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct YawLawOutput {
    pub beta_target_deg: f64,
    pub rudder_travel_limit_deg: f64,
    /// Pedal command limited to the rudder travel.
    pub zeta_pedal_deg: f64,
    pub zeta_tc_yd_deg: f64,
    /// Normal-law rudder command.
    pub zeta_deg: f64,
    pub zeta_trim_deg: f64,
}

/// Engine-out sideslip target from thrust asymmetry.
fn beta_target(state: &mut YawLawState, s: &SensorData, dt: f64, p: &YawLawParams) -> f64 {
    let asym = s.engine_2_thrust_lbf - s.engine_1_thrust_lbf;
    let thrust = state.thrust_lag.step(asym, p.thrust_lag_c1, dt);
    let alpha = state
        .thrust_alpha_lag
        .step(saturate_to(s.alpha_deg, &p.beta_alpha_limits), p.thrust_alpha_lag_c1, dt);
    let cross = state.thrust_cross_lag.step(-asym, p.thrust_cross_lag_c1, dt);
    let v = saturate_to(s.v_ias_kn, &p.beta_speed_limits);
    (alpha * cross * p.beta_alpha_thrust_gain + p.beta_thrust_gain * thrust) / v / v * p.beta_target_gain
}

impl YawLawState {
    pub fn step(&mut self, inp: &YawLawInputs<'_>, p: &YawLawParams) -> YawLawOutput {
        let d = inp.data;
        let s = inp.sensors;
        let ap = inp.autopilot;
        let dt = inp.dt;
        let v_tas = s.v_tas_kn;
        let v_ias = s.v_ias_kn;

        let travel = lookup1(&p.rudder_travel, v_tas);
        let zeta_pedal = saturate(
            p.pedal_gain * d.delta_zeta_pos,
            travel * p.rudder_travel_lower_gain,
            travel,
        );

        let beta_t = beta_target(self, s, dt, p);

        // turn coordination and yaw damper
        let v_tc = saturate_to(v_tas, &p.tc_v_tas_limits) * KNOT_TO_MS;
        let tc = saturate_to(
            (inp.r_deg_s
                - (inp.phi_c_deg * DEG_TO_RAD).sin() * G * (d.theta_deg * DEG_TO_RAD).cos() / v_tc
                    * RAD_TO_DEG)
                * lookup1(&p.tc_schedule, v_tas),
            &p.tc_limits,
        );
        let yd = saturate_to(inp.r_deg_s * lookup1(&p.yd_schedule, v_tas), &p.yd_limits);
        let tc_gain = saturate(
            self.tc_blend
                .step(if inp.on_ground { 0.0 } else { 1.0 }, &p.tc_blend_rate, dt),
            0.0,
            1.0,
        );
        let zeta_tc_yd = (1.0 - tc_gain) * yd + tc * tc_gain;

        let ground_gain = saturate(
            self.ground_blend
                .step(if inp.on_ground { 1.0 } else { 0.0 }, &p.ground_blend_rate, dt),
            0.0,
            1.0,
        );

        let beta_demand = if ap.custom_on {
            ap.beta_c_deg + beta_t
        } else {
            d.delta_zeta_pos * lookup1(&p.pedal_beta_schedule, v_ias)
        };
        let (beta_dot_est, beta_meas) = if v_ias >= p.beta_estimate_min_kn {
            (self.beta_rate_estimate(inp, p), s.beta_deg)
        } else {
            (0.0, 0.0)
        };
        let lagged = self.beta_lag.step(
            (beta_demand - beta_meas) * lookup1(&p.beta_error_schedule, v_ias) - beta_dot_est,
            p.beta_lag_c1,
            dt,
        );
        let zeta_beta = saturate_to(
            beta_demand * lookup1(&p.beta_feedforward_schedule, v_ias) + lagged,
            &p.beta_limits,
        );
        let zeta_law = (1.0 - ground_gain) * zeta_beta + ap.beta_c_deg * ground_gain + zeta_tc_yd;

        // rudder trim
        let x = if s.h_radio_ft <= p.trim_min_radio_ft { 0.0 } else { zeta_law };
        let trim_target = self.trim_integrator.step(
            p.trim_input_gain * x * p.trim_integrator_gain * dt,
            !ap.custom_on || inp.tracking_mode_on,
            d.zeta_trim_deg,
            p.trim_limits.lower,
            p.trim_limits.upper,
        );
        let zeta_trim = self.trim_command.step(trim_target, &p.trim_rate, dt);

        YawLawOutput {
            beta_target_deg: beta_t,
            rudder_travel_limit_deg: travel,
            zeta_pedal_deg: zeta_pedal,
            zeta_tc_yd_deg: zeta_tc_yd,
            zeta_deg: zeta_law,
            zeta_trim_deg: zeta_trim,
        }
    }

    /// Sideslip rate from the lateral force balance (deg/s).
    fn beta_rate_estimate(&self, inp: &YawLawInputs<'_>, p: &YawLawParams) -> f64 {
        let s = inp.sensors;
        let v_ias_ms = s.v_ias_kn * KNOT_TO_MS;
        let v_tas_ms = s.v_tas_kn.max(p.tc_v_tas_limits.lower) * KNOT_TO_MS;
        let q_s_mv = v_ias_ms * v_ias_ms * HALF_RHO * inp.wing_area_m2 / (p.mass_kg * v_tas_ms);
        let rate = q_s_mv * p.side_force_beta * s.beta_deg * DEG_TO_RAD - inp.r_deg_s * DEG_TO_RAD
            + inp.phi_c_deg * DEG_TO_RAD * (G / v_tas_ms)
            + q_s_mv * p.side_force_zeta * (self.prev_zeta_deg / p.zeta_max_deg) * DEG_TO_RAD;
        rate * RAD_TO_DEG
    }

    /// Clear pending reloads and remember the final rudder command.
    pub fn end_frame(&mut self, zeta_deg: f64) {
        self.trim_integrator.end_frame();
        self.prev_zeta_deg = zeta_deg;
    }
}
