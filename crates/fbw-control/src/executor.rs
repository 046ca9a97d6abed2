// ─────────────────────────────────────────────────────────────────────
// SCPN Flight Control Core — Step Executor
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! One control frame, start to finish.
//!
//! Stage order is fixed: input conversion, ground/air, air data, landing
//! phase, protections, pitch-axis machines, pitch law, roll machine, roll
//! law, yaw law, output assembly. Every stage runs every frame whatever
//! the current blend gains are, so filters and integrators that are
//! blended out keep tracking and hand over without a jump.

use crate::inputs::{body_rates, convert};
use crate::modes::{
    flare_sequencer, flight_phase, ground_air, landing_phase, pitch_config, roll_mode,
    rotation_arm, trim_freeze, trim_mode, FlareInputs, FlightPhaseInputs, RotationInputs,
};
use crate::pitch_law::{PitchLawInputs, PitchLawOutput};
use crate::protections::ProtectionInputs;
use crate::roll_law::{RollLawInputs, RollLawOutput};
use crate::state::PersistentState;
use crate::yaw_law::{YawLawInputs, YawLawOutput};
use fbw_math::limiters::{rate_limit_step, saturate, saturate_to};
use fbw_types::error::FbwResult;
use fbw_types::frame::{
    FrameInput, FrameOutput, LateralStatus, ModeStatus, PitchStatus, SurfaceCommands,
};
use fbw_types::params::ParameterTable;
use tracing::{info, trace};

fn bool_gain(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

/// Advance `state` by one frame.
///
/// Infallible: every computed signal is bounded by a saturation or a
/// table clamp, and every machine keeps its state on unmatched guards.
pub fn step(params: &ParameterTable, state: &mut PersistentState, frame: &FrameInput) -> FrameOutput {
    let dt = frame.time.dt;
    let t = frame.time.simulation_time;
    let s = &frame.data;
    let ap = &frame.autopilot;
    let disc = &frame.discretes;
    let th = &params.modes;

    state.monotonic_time += dt;
    let data = convert(frame, state.monotonic_time, &params.input);
    let body = body_rates(frame, &params.input);

    // ground / air and air data
    let ga = ground_air(
        state.modes.ground_air,
        [data.gear_compression[1], data.gear_compression[2]],
        th,
    );
    state.modes.ground_air = Some(ga);
    let on_ground = ga.on_ground();

    let air = state
        .air_data
        .update(s, &frame.time, state.prev_on_ground, &params.air_data);

    let landing = landing_phase(state.modes.landing, on_ground, s.h_radio_ft, th);
    state.modes.landing = Some(landing);

    let tracking_mode_on =
        ap.master_on || disc.slew_on || disc.pause_on || disc.tracking_mode_on_override;

    // protections
    let (mut protections, trim_limits) = state.protections.update(
        &ProtectionInputs {
            simulation_time: t,
            monotonic_time: state.monotonic_time,
            on_ground,
            ap_custom: ap.custom_on,
            alpha_floor_inhibited: landing.alpha_floor_inhibited(),
            ap_special_disc: landing.ap_special_disc(),
            delta_eta_pos: data.delta_eta_pos,
            h_radio_ft: s.h_radio_ft,
            v_ias_kn: s.v_ias_kn,
            v_mach: s.v_mach,
            theta_deg: data.theta_deg,
            phi_deg: data.phi_deg,
            alpha_deg: s.alpha_deg,
            flaps_handle_index: s.flaps_handle_index,
            eta_trim_deg: data.eta_trim_deg,
        },
        &air,
        &params.protections,
        params.air_data.mach_floor,
    );

    // pitch-axis machines
    let modes = &mut state.modes;
    let phase = flight_phase(
        modes.flight_phase,
        &FlightPhaseInputs {
            on_ground,
            theta_deg: data.theta_deg,
            h_radio_ft: s.h_radio_ft,
            simulation_time: t,
        },
        th,
    );
    modes.flight_phase = Some(phase);
    let in_flight = phase.in_flight();
    let in_flight_gain = saturate(
        modes.in_flight_gain.step(bool_gain(in_flight), &th.in_flight_rate, dt),
        0.0,
        1.0,
    );

    let rotation = rotation_arm(
        modes.rotation,
        &RotationInputs {
            in_flight_gain,
            v_tas_kn: s.v_tas_kn,
            thrust_lever_pos: [s.thrust_lever_1_pos, s.thrust_lever_2_pos],
            h_radio_ft: s.h_radio_ft,
        },
        th,
    );
    modes.rotation = Some(rotation);
    let in_rotation_gain = saturate(
        modes
            .in_rotation_gain
            .step(bool_gain(rotation.in_rotation()), &th.in_rotation_rate, dt),
        0.0,
        1.0,
    );

    let theta_lagged = modes.flare_theta_lag.step(data.theta_deg, th.flare_theta_lag_c1, dt);
    let flare = flare_sequencer(
        modes.flare,
        &FlareInputs {
            in_flight,
            h_radio_ft: s.h_radio_ft,
            theta_filtered_deg: theta_lagged,
            manual_arm: disc.flare_manual_arm,
            manual_reduce: disc.flare_manual_reduce,
        },
        th,
    );
    modes.flare = Some(flare);
    let flare_rate = flare.theta_c_rate_deg_s.abs();
    let flare_command = modes.flare_command.get_or_insert(th.flare_theta_initial_deg);
    let flare_theta_c = rate_limit_step(flare_command, flare.theta_c_deg, flare_rate, flare_rate, dt);

    let config = pitch_config(modes.pitch_config, in_flight, s.flaps_handle_index);
    modes.pitch_config = Some(config);
    let trim_rate = config.trim_rate_deg_s(&params.pitch_config);
    let nz_limits = config.nz_limits(&params.pitch_config);
    let nz_limit_up = modes
        .nz_limit_up
        .step(nz_limits.upper, &params.pitch_config.nz_limit_up_rate, dt);
    let nz_limit_lo = modes
        .nz_limit_lo
        .step(nz_limits.lower, &params.pitch_config.nz_limit_lo_rate, dt);

    let freeze = trim_freeze(modes.trim_freeze, flare.in_flare, s.nz_g, data.phi_deg, th);
    modes.trim_freeze = Some(freeze);

    let tmode = trim_mode(modes.trim_mode, in_flight, tracking_mode_on, data.eta_trim_deg);
    modes.trim_mode = Some(tmode);
    let trim_ctl = tmode.output(data.eta_trim_deg);

    // pitch law
    let pitch: PitchLawOutput = state.pitch.step(
        &PitchLawInputs {
            data: &data,
            sensors: s,
            autopilot: ap,
            dt,
            tailstrike_protection_on: disc.tailstrike_protection_on,
            on_ground,
            tracking_mode_on,
            in_flight,
            in_flight_gain,
            in_rotation_gain,
            high_aoa_active: protections.high_aoa_active,
            high_speed_active: protections.high_speed_active,
            in_flare: flare.in_flare,
            flare_theta_c_deg: flare_theta_c,
            nz_limit_up_g: nz_limit_up,
            nz_limit_lo_g: nz_limit_lo,
            v_hsp_low_kn: protections.v_hsp_low_kn,
            v_hsp_high_kn: protections.v_hsp_high_kn,
            alpha_max_deg: air.alpha_max_deg,
            alpha_prot_deg: air.alpha_prot_deg,
            trim_should_freeze: freeze.should_freeze(),
            trim_reset: trim_ctl.reset,
            trim_reset_deg: trim_ctl.reset_deg,
            trim_rate_deg_s: trim_rate,
            trim_limit_lo_deg: trim_limits.lower,
            trim_limit_up_deg: trim_limits.upper,
        },
        params,
    );
    protections.v_target_kn = pitch.v_target_kn;
    protections.alpha_c_deg = pitch.alpha_c_deg;

    // lateral
    let modes = &mut state.modes;
    let rmode = roll_mode(modes.roll_mode, on_ground, data.theta_deg, s.h_radio_ft, th);
    modes.roll_mode = Some(rmode);
    let lateral_gain = saturate(
        modes
            .lateral_in_flight_gain
            .step(bool_gain(rmode.in_flight()), &th.lateral_in_flight_rate, dt),
        0.0,
        1.0,
    );

    let roll: RollLawOutput = state.roll.step(
        &RollLawInputs {
            data: &data,
            autopilot: ap,
            dt,
            v_ias_kn: s.v_ias_kn,
            roll_gain: lateral_gain,
            tracking_mode_on,
            bank_rate_deg_s: protections.bank_rate_deg_s,
        },
        &params.roll,
    );

    let yaw: YawLawOutput = state.yaw.step(
        &YawLawInputs {
            data: &data,
            sensors: s,
            autopilot: ap,
            dt,
            r_deg_s: body.r,
            on_ground,
            tracking_mode_on,
            phi_c_deg: roll.phi_c_deg,
            wing_area_m2: params.roll.wing_area_m2,
        },
        &params.yaw,
    );

    let g = saturate(lateral_gain + bool_gain(ap.custom_on), 0.0, 1.0);
    let xi_deg = (1.0 - g) * roll.xi_direct_deg + roll.xi_deg * g;
    let zeta_deg = (1.0 - g) * yaw.zeta_pedal_deg + yaw.zeta_deg * g;

    // output assembly
    let out = &params.output;
    let eta_limited = state.output.eta.step(pitch.eta_deg, &out.eta_rate, dt);
    let xi_limited = state.output.xi.step(xi_deg, &out.xi_rate, dt);
    let zeta_limited = state.output.zeta.step(zeta_deg, &out.zeta_rate, dt);

    let surfaces = SurfaceCommands {
        eta_pos: saturate_to(out.eta_pos_gain * eta_limited, &out.eta_pos_limits),
        eta_trim_deg: saturate_to(out.eta_trim_gain * pitch.eta_trim_deg, &out.eta_trim_limits),
        eta_trim_deg_should_write: trim_ctl.should_write,
        xi_pos: saturate_to(out.xi_pos_gain * xi_limited, &out.xi_pos_limits),
        zeta_pos: saturate_to(out.zeta_pos_gain * zeta_limited, &out.zeta_pos_limits),
        zeta_trim_pos: saturate_to(out.zeta_trim_gain * yaw.zeta_trim_deg, &out.zeta_trim_limits),
        zeta_trim_pos_should_write: ap.custom_on,
    };

    // end of frame
    state.pitch.end_frame();
    state.roll.end_frame();
    state.yaw.end_frame(zeta_deg);
    state.prev_on_ground = on_ground;

    trace!(
        t,
        on_ground,
        in_flight_gain,
        eta_pos = surfaces.eta_pos,
        xi_pos = surfaces.xi_pos,
        zeta_pos = surfaces.zeta_pos,
        any_protection = protections.any_active,
        "frame"
    );

    FrameOutput {
        data,
        air_data: air,
        modes: ModeStatus {
            on_ground,
            tracking_mode_on,
            alpha_floor_inhibited: landing.alpha_floor_inhibited(),
            ap_special_disc: landing.ap_special_disc(),
        },
        protections,
        pitch: PitchStatus {
            in_flight,
            in_flight_gain,
            in_rotation: rotation.in_rotation(),
            in_rotation_gain,
            in_flare: flare.in_flare,
            flare_theta_c_deg: flare_theta_c,
            flare_theta_c_rate_deg_s: flare.theta_c_rate_deg_s,
            trim_should_freeze: freeze.should_freeze(),
            trim_reset: trim_ctl.reset,
            trim_reset_deg: trim_ctl.reset_deg,
            trim_should_write: trim_ctl.should_write,
            trim_rate_up_deg_s: trim_rate,
            trim_rate_lo_deg_s: -trim_rate,
            nz_limit_up_g: nz_limit_up,
            nz_limit_lo_g: nz_limit_lo,
            eta_trim_limit_up_deg: trim_limits.upper,
            eta_trim_limit_lo_deg: trim_limits.lower,
            rotation_qk_c_deg_s: pitch.rotation_qk_c_deg_s,
            rotation_eta_deg: pitch.rotation_eta_deg,
            cstar_g: pitch.cstar_g,
            nz_c_g: pitch.nz_c_g,
            eta_dot_deg_s: pitch.eta_dot_deg_s,
            eta_integrated_deg: pitch.eta_integrated_deg,
            eta_deg: pitch.eta_deg,
            eta_trim_deg: pitch.eta_trim_deg,
        },
        lateral: LateralStatus {
            in_flight: rmode.in_flight(),
            in_flight_gain: lateral_gain,
            pk_c_deg_s: roll.pk_c_deg_s,
            phi_c_deg: roll.phi_c_deg,
            xi_deg,
            beta_target_deg: yaw.beta_target_deg,
            rudder_travel_limit_deg: yaw.rudder_travel_limit_deg,
            zeta_tc_yd_deg: yaw.zeta_tc_yd_deg,
            zeta_deg,
            zeta_trim_deg: yaw.zeta_trim_deg,
        },
        output: surfaces,
    }
}

/// Owns the parameter table and the persistent state.
#[derive(Debug, Clone)]
pub struct FlightControlComputer {
    params: ParameterTable,
    state: PersistentState,
}

impl FlightControlComputer {
    /// Validate `params` and build a computer in its initial state.
    pub fn new(params: ParameterTable) -> FbwResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            state: PersistentState::new(),
        })
    }

    /// Return every machine, filter and integrator to its unprimed state.
    pub fn initialize(&mut self) {
        self.state = PersistentState::new();
        info!("flight control computer initialized");
    }

    pub fn step(&mut self, frame: &FrameInput) -> FrameOutput {
        step(&self.params, &mut self.state, frame)
    }

    pub fn state(&self) -> &PersistentState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbw_types::frame::{FrameTime, SensorData};

    fn frame(t: f64, gear: f64) -> FrameInput {
        FrameInput {
            time: FrameTime {
                dt: 0.02,
                simulation_time: t,
            },
            data: SensorData {
                nz_g: 1.0,
                v_ias_kn: 140.0,
                v_tas_kn: 140.0,
                v_mach: 0.21,
                gear_compression: [gear; 3],
                ..SensorData::default()
            },
            ..FrameInput::default()
        }
    }

    #[test]
    fn test_first_frame_starts_on_ground() {
        let mut fcc = FlightControlComputer::new(ParameterTable::default()).unwrap();
        let out = fcc.step(&frame(0.0, 0.5));
        assert!(out.modes.on_ground);
        assert!(!out.pitch.in_flight);
        assert_eq!(out.pitch.in_flight_gain, 0.0);
        assert!(!out.protections.any_active);
    }

    #[test]
    fn test_monotonic_time_accumulates() {
        let mut fcc = FlightControlComputer::new(ParameterTable::default()).unwrap();
        for i in 0..10 {
            fcc.step(&frame(i as f64 * 0.02, 0.5));
        }
        assert!((fcc.state().monotonic_time - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_initialize_resets_state() {
        let mut fcc = FlightControlComputer::new(ParameterTable::default()).unwrap();
        fcc.step(&frame(0.0, 0.5));
        assert!(!fcc.state().is_fresh());
        fcc.initialize();
        assert!(fcc.state().is_fresh());
        assert_eq!(fcc.state().monotonic_time, 0.0);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let mut params = ParameterTable::default();
        params.yaw.rudder_travel.values.pop();
        assert!(FlightControlComputer::new(params).is_err());
    }

    #[test]
    fn test_ground_outputs_within_limits() {
        let mut fcc = FlightControlComputer::new(ParameterTable::default()).unwrap();
        let mut f = frame(0.0, 0.5);
        f.input.delta_eta_pos = 1.0;
        f.input.delta_xi_pos = -1.0;
        f.input.delta_zeta_pos = 1.0;
        let mut out = FrameOutput::default();
        for i in 0..200 {
            f.time.simulation_time = i as f64 * 0.02;
            out = fcc.step(&f);
        }
        let o = out.output;
        for v in [o.eta_pos, o.xi_pos, o.zeta_pos, o.zeta_trim_pos] {
            assert!(v.is_finite() && v.abs() <= 1.0, "Surface command out of range: {v}");
        }
        assert!((-4.0..=13.5).contains(&o.eta_trim_deg), "trim {}", o.eta_trim_deg);
        assert!(!o.zeta_trim_pos_should_write);
    }
}
