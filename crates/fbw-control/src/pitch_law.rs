// ─────────────────────────────────────────────────────────────────────
// SCPN Flight Control Core — Pitch Law
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Elevator and stabiliser-trim command.
//!
//! Four stages run every frame, whether or not their output is blended in:
//!
//! 1. **Rotation law**: stick → pitch-rate demand (optionally attenuated
//!    by tailstrike protection), PD plus predictor terms integrated into
//!    an elevator increment; the direct stick term is added on ground.
//! 2. **Normal law**: C* load-factor demand with autopilot attitude
//!    tracking, high-speed protection, flare attitude and pitch-attitude
//!    protection, clamped to the configuration's nz limits.
//! 3. **High-AoA law**: alpha demand between alpha_prot and alpha_max,
//!    blended against the nz tracker by the rate-limited high-AoA flag.
//! 4. **Trim**: the elevator integrator drives the stabiliser integrator,
//!    bounded by the dynamic trim limits and slewed at the trim rate.
//!
//! The elevator command blends direct → rotation → normal law by the
//! rotation and in-flight gains.

use fbw_math::filters::{DerivativeLag, DiscreteDerivative, LagFilter, WashoutFilter};
use fbw_math::integrator::ReloadIntegrator;
use fbw_math::interp::{lookup1, lookup2};
use fbw_math::limiters::{rate_limit_step, saturate, saturate_to, RateLimiter};
use fbw_types::frame::{AutopilotInput, ConvertedData, SensorData};
use fbw_types::params::{NormalLawParams, ParameterTable, RotationLawParams, TrimParams};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PitchLawState {
    // rotation
    rot_stick: RateLimiter,
    rot_qk_c_deriv: DiscreteDerivative,
    rot_error_deriv: DiscreteDerivative,
    rot_predictor: LagFilter,
    rot_integrator: ReloadIntegrator,
    // normal law
    hsp_stick: RateLimiter,
    ap_theta: RateLimiter,
    theta_max: RateLimiter,
    nz_stick: RateLimiter,
    hsp_precontrol: DerivativeLag,
    hsp_v_dot: DerivativeLag,
    hsp_gain: RateLimiter,
    // high-AoA law
    alpha_stick: RateLimiter,
    alpha_lag: LagFilter,
    alpha_washout: WashoutFilter,
    alpha_precontrol: DerivativeLag,
    alpha_v_dot: DerivativeLag,
    aoa_gain: RateLimiter,
    // nz tracking
    qk_deriv: DiscreteDerivative,
    d_term_deriv: DiscreteDerivative,
    v_tas_deriv: DiscreteDerivative,
    v_tas_dot_lag: LagFilter,
    spoiler_washout: WashoutFilter,
    eta_integrator: ReloadIntegrator,
    // trim
    trim_integrator: ReloadIntegrator,
    trim_command: Option<f64>,
}

/// Mode flags and limits feeding the pitch law.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchLawInputs<'a> {
    pub data: &'a ConvertedData,
    pub sensors: &'a SensorData,
    pub autopilot: &'a AutopilotInput,
    pub dt: f64,
    pub tailstrike_protection_on: bool,
    pub on_ground: bool,
    pub tracking_mode_on: bool,
    pub in_flight: bool,
    pub in_flight_gain: f64,
    pub in_rotation_gain: f64,
    pub high_aoa_active: bool,
    pub high_speed_active: bool,
    pub in_flare: bool,
    /// Rate-limited flare attitude target.
    pub flare_theta_c_deg: f64,
    pub nz_limit_up_g: f64,
    pub nz_limit_lo_g: f64,
    pub v_hsp_low_kn: f64,
    pub v_hsp_high_kn: f64,
    pub alpha_max_deg: f64,
    pub alpha_prot_deg: f64,
    pub trim_should_freeze: bool,
    pub trim_reset: bool,
    pub trim_reset_deg: f64,
    pub trim_rate_deg_s: f64,
    pub trim_limit_lo_deg: f64,
    pub trim_limit_up_deg: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PitchLawOutput {
    pub rotation_qk_c_deg_s: f64,
    pub rotation_eta_deg: f64,
    pub cstar_g: f64,
    pub nz_c_g: f64,
    pub eta_dot_deg_s: f64,
    pub eta_integrated_deg: f64,
    pub eta_deg: f64,
    pub eta_trim_deg: f64,
    pub v_target_kn: f64,
    pub alpha_c_deg: f64,
}

impl PitchLawState {
    pub fn step(&mut self, inp: &PitchLawInputs<'_>, params: &ParameterTable) -> PitchLawOutput {
        let delta_eta_deg = params.normal_law.direct_eta_gain * inp.data.delta_eta_pos;
        let (rotation_qk_c, rotation_eta) = self.rotation(inp, &params.rotation, delta_eta_deg);
        let normal = self.normal_law(inp, &params.normal_law);
        let (alpha_c, alpha_law) = self.high_aoa_law(inp, &params.normal_law);
        let (eta_dot, eta_integrated) =
            self.nz_tracking(inp, &params.normal_law, normal, alpha_law, delta_eta_deg);

        let fg = saturate(inp.in_flight_gain, 0.0, 1.0);
        let rg = saturate(inp.in_rotation_gain, 0.0, 1.0);
        let eta_deg = ((1.0 - rg) * delta_eta_deg + rotation_eta * rg) * (1.0 - fg) + eta_integrated * fg;

        let eta_trim_deg = self.trim(inp, &params.trim, eta_integrated);

        PitchLawOutput {
            rotation_qk_c_deg_s: rotation_qk_c,
            rotation_eta_deg: rotation_eta,
            cstar_g: normal.cstar_g,
            nz_c_g: normal.nz_c_g,
            eta_dot_deg_s: eta_dot,
            eta_integrated_deg: eta_integrated,
            eta_deg,
            eta_trim_deg,
            v_target_kn: normal.v_target_kn,
            alpha_c_deg: alpha_c,
        }
    }

    /// Clear pending integrator reloads once the frame is assembled.
    pub fn end_frame(&mut self) {
        self.rot_integrator.end_frame();
        self.eta_integrator.end_frame();
        self.trim_integrator.end_frame();
    }

    fn rotation(
        &mut self,
        inp: &PitchLawInputs<'_>,
        p: &RotationLawParams,
        delta_eta_deg: f64,
    ) -> (f64, f64) {
        let d = inp.data;
        let dt = inp.dt;
        let stick = self.rot_stick.step(d.delta_eta_pos, &p.stick_rate, dt);
        let tailstrike = if inp.tailstrike_protection_on { 1.0 } else { 0.0 };
        let attenuation = tailstrike
            * lookup2(&p.tailstrike, d.theta_deg, inp.sensors.h_radio_ft)
            * saturate_to(stick, &p.stick_limits);
        let qk_c = lookup1(&p.pitch_rate_demand, attenuation + stick);

        let qk_c_dot = self.rot_qk_c_deriv.step(qk_c, p.qk_c_deriv_gain, dt);
        let error = d.qk_deg_s - qk_c;
        let error_dot = self
            .rot_error_deriv
            .step(error, p.error_gain * p.error_deriv_gain, dt);
        let predicted = self.rot_predictor.step(
            d.qk_deg_s + p.predictor_qk_dot_gain * d.qk_dot_deg_s2,
            p.predictor_lag_c1,
            dt,
        );

        let law = ((error_dot + p.p_gain * error) * p.pd_gain
            + qk_c_dot * p.feedforward_gain
            + (predicted - qk_c) * p.predictor_gain
            + p.qk_dot_gain * d.qk_dot_deg_s2)
            * (1.0 - inp.in_flight_gain);
        let reload = (d.delta_eta_pos <= p.reload_stick_threshold && inp.on_ground)
            || inp.in_rotation_gain == 0.0
            || inp.tracking_mode_on;
        let integrated = self.rot_integrator.step(
            law * p.integrator_gain * dt,
            reload,
            0.0,
            p.integrator_limits.lower,
            p.integrator_limits.upper,
        );

        let direct = if inp.on_ground {
            saturate_to(delta_eta_deg, &p.ground_eta_limits)
        } else {
            0.0
        };
        (qk_c, integrated + direct)
    }

    fn normal_law(&mut self, inp: &PitchLawInputs<'_>, p: &NormalLawParams) -> NormalLawOutput {
        let d = inp.data;
        let s = inp.sensors;
        let dt = inp.dt;

        let cos_theta = d.theta_deg.to_radians().cos();
        let cos_phi = d.phi_deg.to_radians().cos();
        let d1 = cos_theta / cos_phi;
        let cstar = d.qk_deg_s * p.cstar_q_gain * p.cstar_crossover_speed_ms + (s.nz_g - d1);

        let hsp_stick = self.hsp_stick.step(d.delta_eta_pos, &p.hsp_stick_rate, dt);
        let v_target =
            ((inp.v_hsp_low_kn - inp.v_hsp_high_kn) * hsp_stick).max(0.0) + inp.v_hsp_low_kn;

        let phi_limited = saturate_to(d.phi_deg, &p.phi_limits);
        let d_ke = cos_theta / phi_limited.to_radians().cos();

        let ap_theta = self.ap_theta.step(inp.autopilot.theta_c_deg, &p.ap_theta_rate, dt);

        let full_flap = s.flaps_handle_index == p.full_flap_index;
        let theta_max_base = if full_flap {
            p.theta_max_full_flap_deg
        } else {
            p.theta_max_deg
        };
        let vls_reduction = saturate(
            p.vls_reduction_max_deg - (s.v_ias_kn - (s.vls_kn + p.vls_margin_kn)) * p.vls_reduction_gain,
            0.0,
            p.vls_reduction_max_deg,
        );
        let theta_max = self
            .theta_max
            .step(theta_max_base - vls_reduction, &p.theta_max_rate, dt);

        let nz_stick = self.nz_stick.step(d.delta_eta_pos, &p.stick_rate, dt);
        let hsp_precontrol = self.hsp_precontrol.step(v_target, &p.hsp_precontrol, dt);
        let hsp_v_dot = self.hsp_v_dot.step(s.v_ias_kn, &p.hsp_v_dot, dt);
        let hsp_gain = saturate(
            self.hsp_gain
                .step(bool_gain(inp.high_speed_active), &p.hsp_gain_rate, dt),
            0.0,
            1.0,
        );

        let demand = if inp.autopilot.custom_on {
            (ap_theta - d.theta_deg) * p.ap_theta_gain
        } else {
            let pilot = lookup1(&p.load_demand, nz_stick);
            let hsp = if inp.high_speed_active {
                saturate_to(pilot, &p.hsp_load_limits)
                    + saturate_to(
                        ((v_target - s.v_ias_kn) * p.hsp_v_error_gain
                            + p.hsp_precontrol_gain * hsp_precontrol
                            + p.hsp_v_dot_gain * hsp_v_dot
                            + p.hsp_qk_gain * d.qk_deg_s
                            + p.hsp_qk_dot_gain * d.qk_dot_deg_s2)
                            * p.hsp_output_gain,
                        &p.hsp_limits,
                    )
            } else {
                0.0
            };
            let load = (1.0 - hsp_gain) * pilot + hsp * hsp_gain;

            let flare = if inp.in_flare {
                saturate_to((inp.flare_theta_c_deg - d.theta_deg) * p.flare_gain, &p.flare_limits)
            } else {
                0.0
            };

            let bank_correction = d1 - d_ke;
            let upper = lookup1(
                &p.load_demand_theta_max,
                saturate_to(theta_max - d.theta_deg, &p.theta_margin_limits),
            ) + bank_correction;
            let protected = if load > upper {
                upper
            } else {
                let lower = lookup1(
                    &p.load_demand_theta_min,
                    saturate_to(p.theta_min_deg - d.theta_deg, &p.theta_margin_limits),
                ) + bank_correction;
                load.max(lower)
            };
            flare + protected
        };

        NormalLawOutput {
            cstar_g: cstar,
            d1,
            nz_c_g: saturate(demand + d_ke, inp.nz_limit_lo_g, inp.nz_limit_up_g),
            v_target_kn: v_target,
        }
    }

    /// Returns the alpha demand and the law output.
    fn high_aoa_law(&mut self, inp: &PitchLawInputs<'_>, p: &NormalLawParams) -> (f64, f64) {
        let d = inp.data;
        let dt = inp.dt;
        let stick = self.alpha_stick.step(d.delta_eta_pos, &p.alpha_stick_rate, dt);
        let alpha_demand = (inp.alpha_max_deg - inp.alpha_prot_deg) * stick;

        let alpha_lagged = self.alpha_lag.step(inp.sensors.alpha_deg, p.alpha_lag_c1, dt);
        let washout_in = (d.theta_deg - p.alpha_washout_theta_deg)
            .max((d.phi_deg.abs() - p.alpha_washout_phi_deg) / p.alpha_washout_phi_divisor)
            .max(0.0);
        let washout = self.alpha_washout.step(washout_in, p.alpha_washout_c1, dt);
        let error = alpha_demand - (alpha_lagged - inp.alpha_prot_deg) - washout;

        let precontrol = self.alpha_precontrol.step(error, &p.alpha_precontrol, dt);
        let v_dot = self.alpha_v_dot.step(inp.sensors.v_ias_kn, &p.alpha_v_dot, dt);
        let law = saturate_to(
            p.alpha_precontrol_gain * precontrol
                + p.alpha_error_gain * error
                + p.alpha_v_dot_gain * v_dot
                + p.alpha_qk_gain * d.qk_deg_s
                + p.alpha_qk_dot_gain * d.qk_dot_deg_s2,
            &p.alpha_law_limits,
        );
        (inp.alpha_prot_deg + alpha_demand, law)
    }

    /// Returns eta_dot and the integrated elevator command.
    fn nz_tracking(
        &mut self,
        inp: &PitchLawInputs<'_>,
        p: &NormalLawParams,
        normal: NormalLawOutput,
        alpha_law: f64,
        delta_eta_deg: f64,
    ) -> (f64, f64) {
        let d = inp.data;
        let s = inp.sensors;
        let dt = inp.dt;
        let v_tas = s.v_tas_kn;

        let error = normal.cstar_g
            - (lookup1(&p.nz_error_schedule, v_tas) / (p.nz_error_gain * saturate_to(v_tas, &p.v_tas_limits))
                + p.nz_error_bias)
                * (normal.nz_c_g - normal.d1);
        let d_term = self
            .d_term_deriv
            .step(error * lookup1(&p.d_schedule, v_tas), p.d_gain, dt);
        let qk_term = self.qk_deriv.step(d.qk_deg_s, p.qk_deriv_gain, dt) * p.qk_deriv_term_gain;

        let v_tas_rate = self.v_tas_deriv.step(v_tas, p.v_tas_dot.gain, dt);
        let v_tas_dot = saturate_to(
            self.v_tas_dot_lag.step(v_tas_rate, p.v_tas_dot.c1, dt),
            &p.v_tas_dot_limits,
        );
        let spoilers = saturate_to(
            self.spoiler_washout.step(
                s.spoilers_left_pos.min(s.spoilers_right_pos),
                p.spoiler_washout_c1,
                dt,
            ),
            &p.spoiler_limits,
        );

        let law = saturate_to(
            qk_term
                + error * lookup1(&p.p_schedule, v_tas)
                + d_term
                + p.v_tas_dot_gain * v_tas_dot
                + spoilers * lookup1(&p.spoiler_schedule, s.h_radio_ft),
            &p.normal_law_limits,
        );

        let aoa_gain = saturate(
            self.aoa_gain
                .step(bool_gain(inp.high_aoa_active), &p.aoa_gain_rate, dt),
            0.0,
            1.0,
        );
        let eta_dot = (1.0 - aoa_gain) * law + alpha_law * aoa_gain;

        let reload = inp.in_flight_gain == 0.0 || inp.tracking_mode_on;
        let target = if inp.in_flight { d.eta_deg } else { delta_eta_deg };
        let integrated = self.eta_integrator.step(
            p.integrator_gain * eta_dot * lookup1(&p.dt_schedule, dt) * dt,
            reload,
            target,
            p.integrator_limits.lower,
            p.integrator_limits.upper,
        );
        (eta_dot, integrated)
    }

    fn trim(&mut self, inp: &PitchLawInputs<'_>, p: &TrimParams, eta_integrated: f64) -> f64 {
        let dt = inp.dt;
        let x = if inp.trim_should_freeze { 0.0 } else { eta_integrated };
        let target = self.trim_integrator.step(
            p.input_gain * x * p.integrator_gain * dt,
            inp.trim_reset,
            inp.trim_reset_deg,
            inp.trim_limit_lo_deg,
            inp.trim_limit_up_deg,
        );
        let y = self.trim_command.get_or_insert(p.rate_initial_deg);
        rate_limit_step(y, target, inp.trim_rate_deg_s, inp.trim_rate_deg_s, dt)
    }
}

#[derive(Debug, Clone, Copy)]
struct NormalLawOutput {
    cstar_g: f64,
    d1: f64,
    nz_c_g: f64,
    v_target_kn: f64,
}

fn bool_gain(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        data: ConvertedData,
        sensors: SensorData,
        autopilot: AutopilotInput,
    }

    impl Fixture {
        fn level_flight() -> Self {
            let sensors = SensorData {
                nz_g: 1.0,
                v_ias_kn: 250.0,
                v_tas_kn: 300.0,
                v_mach: 0.5,
                h_radio_ft: 3000.0,
                alpha_deg: 3.0,
                vls_kn: 130.0,
                ..SensorData::default()
            };
            Self {
                data: ConvertedData::default(),
                sensors,
                autopilot: AutopilotInput::default(),
            }
        }

        fn inputs(&self) -> PitchLawInputs<'_> {
            PitchLawInputs {
                data: &self.data,
                sensors: &self.sensors,
                autopilot: &self.autopilot,
                dt: 0.02,
                tailstrike_protection_on: false,
                on_ground: false,
                tracking_mode_on: false,
                in_flight: true,
                in_flight_gain: 1.0,
                in_rotation_gain: 0.0,
                high_aoa_active: false,
                high_speed_active: false,
                in_flare: false,
                flare_theta_c_deg: 0.0,
                nz_limit_up_g: 2.5,
                nz_limit_lo_g: -1.0,
                v_hsp_low_kn: 350.0,
                v_hsp_high_kn: 365.0,
                alpha_max_deg: 15.0,
                alpha_prot_deg: 12.0,
                trim_should_freeze: false,
                trim_reset: false,
                trim_reset_deg: 0.0,
                trim_rate_deg_s: 0.3,
                trim_limit_lo_deg: -4.0,
                trim_limit_up_deg: 13.5,
            }
        }
    }

    #[test]
    fn test_level_flight_has_no_load_error() {
        let f = Fixture::level_flight();
        let params = ParameterTable::default();
        let mut s = PitchLawState::default();
        let out = s.step(&f.inputs(), &params);
        assert!(out.cstar_g.abs() < 1e-12, "C* {}", out.cstar_g);
        assert!((out.nz_c_g - 1.0).abs() < 1e-12, "nz_c {}", out.nz_c_g);
    }

    #[test]
    fn test_first_frame_reloads_elevator_to_measured() {
        let mut f = Fixture::level_flight();
        f.data.eta_deg = 2.5;
        let params = ParameterTable::default();
        let mut s = PitchLawState::default();
        let out = s.step(&f.inputs(), &params);
        assert_eq!(out.eta_integrated_deg, 2.5, "Integrator starts at the measured elevator");
        assert_eq!(out.eta_deg, 2.5, "Full in-flight gain selects the integrator");
    }

    #[test]
    fn test_ground_uses_direct_law() {
        let mut f = Fixture::level_flight();
        f.data.delta_eta_pos = 0.5;
        let params = ParameterTable::default();
        let mut s = PitchLawState::default();
        let mut inp = f.inputs();
        inp.in_flight = false;
        inp.in_flight_gain = 0.0;
        inp.on_ground = true;
        let out = s.step(&inp, &params);
        assert!((out.eta_deg - 15.0).abs() < 1e-12, "30 deg per unit stick: {}", out.eta_deg);
    }

    #[test]
    fn test_stick_pull_demands_load() {
        let mut f = Fixture::level_flight();
        f.data.delta_eta_pos = 1.0;
        let params = ParameterTable::default();
        let mut s = PitchLawState::default();
        let mut out = PitchLawOutput::default();
        for _ in 0..100 {
            out = s.step(&f.inputs(), &params);
            s.end_frame();
        }
        assert!((out.nz_c_g - 2.5).abs() < 1e-9, "nz_c {}", out.nz_c_g);
    }

    #[test]
    fn test_nz_demand_respects_limits() {
        let mut f = Fixture::level_flight();
        f.data.delta_eta_pos = 1.0;
        let params = ParameterTable::default();
        let mut s = PitchLawState::default();
        let mut inp = f.inputs();
        inp.nz_limit_up_g = 1.8;
        let mut out = PitchLawOutput::default();
        for _ in 0..100 {
            out = s.step(&inp, &params);
            s.end_frame();
        }
        assert!(out.nz_c_g <= 1.8 + 1e-12);
    }

    #[test]
    fn test_trim_holds_while_frozen() {
        let mut f = Fixture::level_flight();
        f.data.eta_deg = 5.0;
        let params = ParameterTable::default();
        let mut s = PitchLawState::default();
        let mut inp = f.inputs();
        inp.trim_reset = true;
        inp.trim_reset_deg = 1.0;
        inp.trim_rate_deg_s = 100.0;
        let out = s.step(&inp, &params);
        assert_eq!(out.eta_trim_deg, 1.0);
        s.end_frame();

        inp.trim_reset = false;
        inp.trim_should_freeze = true;
        let out = s.step(&inp, &params);
        assert_eq!(out.eta_trim_deg, 1.0, "No trim motion while frozen");
        s.end_frame();

        inp.trim_should_freeze = false;
        let out = s.step(&inp, &params);
        assert!(out.eta_trim_deg > 1.0, "Trims toward the elevator offset");
    }

    #[test]
    fn test_ap_custom_tracks_theta_target() {
        let mut f = Fixture::level_flight();
        f.autopilot.custom_on = true;
        f.autopilot.theta_c_deg = 5.0;
        let params = ParameterTable::default();
        let mut s = PitchLawState::default();
        let mut out = PitchLawOutput::default();
        for _ in 0..200 {
            out = s.step(&f.inputs(), &params);
            s.end_frame();
        }
        assert!((out.nz_c_g - 1.5).abs() < 1e-9, "(5 - 0) * 0.1 + 1: {}", out.nz_c_g);
    }

    #[test]
    fn test_alpha_demand_spans_prot_to_max() {
        let mut f = Fixture::level_flight();
        f.data.delta_eta_pos = 1.0;
        let params = ParameterTable::default();
        let mut s = PitchLawState::default();
        let mut out = PitchLawOutput::default();
        for _ in 0..100 {
            out = s.step(&f.inputs(), &params);
            s.end_frame();
        }
        assert!((out.alpha_c_deg - 15.0).abs() < 1e-9, "alpha_c {}", out.alpha_c_deg);
    }
}
