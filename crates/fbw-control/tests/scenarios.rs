// ─────────────────────────────────────────────────────────────────────
// SCPN Flight Control Core — Frame Scenarios
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Multi-frame scenarios through the full executor.

use fbw_control::modes::{FlightPhase, GroundAir};
use fbw_control::{step, FlightControlComputer, FrameRecorder, PersistentState};
use fbw_types::frame::{FrameInput, FrameOutput, FrameTime, SensorData};
use fbw_types::params::ParameterTable;

const DT: f64 = 0.02;

fn frame(i: usize, gear: [f64; 3]) -> FrameInput {
    FrameInput {
        time: FrameTime {
            dt: DT,
            simulation_time: i as f64 * DT,
        },
        data: SensorData {
            nz_g: 1.0,
            alpha_deg: 3.0,
            v_ias_kn: 150.0,
            v_tas_kn: 155.0,
            v_mach: 0.23,
            gear_compression: gear,
            ..SensorData::default()
        },
        ..FrameInput::default()
    }
}

fn computer() -> FlightControlComputer {
    FlightControlComputer::new(ParameterTable::default()).unwrap()
}

#[test]
fn test_single_compressed_main_strut_keeps_on_ground() {
    let mut fcc = computer();
    fcc.step(&frame(0, [0.0, 0.0, 0.0]));
    assert_eq!(fcc.state().modes.ground_air, Some(GroundAir::OnGround));

    let out = fcc.step(&frame(1, [0.0, 0.15, 0.0]));
    assert!(out.modes.on_ground, "One strut above 0.1 holds OnGround");
    assert_eq!(fcc.state().modes.ground_air, Some(GroundAir::OnGround));

    let out = fcc.step(&frame(2, [0.0, 0.0, 0.0]));
    assert!(!out.modes.on_ground, "Both mains extended lifts off");
}

#[test]
fn test_steep_attitude_skips_to_flight() {
    let mut fcc = computer();
    fcc.step(&frame(0, [0.5; 3]));
    assert_eq!(fcc.state().modes.flight_phase, Some(FlightPhase::Ground));

    let mut f = frame(1, [0.0; 3]);
    f.data.theta_deg = 9.0;
    let out = fcc.step(&f);
    assert_eq!(fcc.state().modes.flight_phase, Some(FlightPhase::Flight));
    assert!(out.pitch.in_flight);
    assert!(
        out.pitch.in_flight_gain > 0.0 && out.pitch.in_flight_gain < 1.0,
        "Gain ramps, got {}",
        out.pitch.in_flight_gain
    );
}

#[test]
fn test_equal_state_and_frame_give_equal_results() {
    let params = ParameterTable::default();
    let mut state = PersistentState::new();
    for i in 0..300 {
        let mut f = frame(i, if i < 100 { [0.4; 3] } else { [0.0; 3] });
        f.data.theta_deg = (i as f64 * 0.05).min(12.0);
        f.data.h_radio_ft = (i as f64 - 100.0).max(0.0) * 3.0;
        f.input.delta_eta_pos = ((i as f64) * 0.1).sin() * 0.5;
        f.input.delta_xi_pos = ((i as f64) * 0.07).cos() * 0.3;
        step(&params, &mut state, &f);
    }

    let mut a = state.clone();
    let mut b = state.clone();
    let mut f = frame(300, [0.0; 3]);
    f.data.phi_deg = 12.0;
    f.input.delta_zeta_pos = 0.2;
    let out_a = step(&params, &mut a, &f);
    let out_b = step(&params, &mut b, &f);
    assert_eq!(out_a, out_b);
    assert_eq!(a, b);
    assert_ne!(a, state, "State mutates every frame");
}

#[test]
fn test_ground_trim_reloads_to_measured_trim() {
    let mut fcc = computer();
    let mut out = FrameOutput::default();
    for i in 0..400 {
        let mut f = frame(i, [0.5; 3]);
        f.data.eta_trim_deg = 2.0;
        out = fcc.step(&f);
    }
    assert!(out.pitch.trim_reset);
    assert_eq!(out.pitch.trim_reset_deg, 2.0);
    assert_eq!(out.pitch.eta_trim_deg, 2.0, "Slewed onto the reload target");
    assert_eq!(out.output.eta_trim_deg, 2.0);
    assert!(!out.output.eta_trim_deg_should_write, "Manual trim on ground");
}

#[test]
fn test_protections_wait_for_arming_time() {
    let mut fcc = computer();
    let mut out = FrameOutput::default();
    for i in 0..200 {
        let mut f = frame(i, [0.0; 3]);
        f.data.h_radio_ft = 2000.0;
        f.data.alpha_deg = 25.0;
        out = fcc.step(&f);
    }
    assert!(out.data.monotonic_time < 10.0);
    assert!(!out.protections.high_aoa_active, "Not armed yet");
    assert!(!out.protections.alpha_floor_active, "Not armed yet");
}

#[test]
fn test_autopilot_master_sets_tracking() {
    let mut fcc = computer();
    let mut f = frame(0, [0.5; 3]);
    f.autopilot.master_on = true;
    let out = fcc.step(&f);
    assert!(out.modes.tracking_mode_on);
    f.autopilot.master_on = false;
    f.time.simulation_time = DT;
    let out = fcc.step(&f);
    assert!(!out.modes.tracking_mode_on);
}

#[test]
fn test_rudder_trim_written_only_under_ap_custom() {
    let mut fcc = computer();
    let mut f = frame(0, [0.0; 3]);
    f.data.h_radio_ft = 3000.0;
    let out = fcc.step(&f);
    assert!(!out.output.zeta_trim_pos_should_write);
    f.autopilot.custom_on = true;
    f.time.simulation_time = DT;
    let out = fcc.step(&f);
    assert!(out.output.zeta_trim_pos_should_write);
}

#[test]
fn test_recorder_keeps_last_frames() {
    let mut fcc = computer();
    let mut rec = FrameRecorder::new(50).unwrap();
    for i in 0..120 {
        let f = frame(i, [0.5; 3]);
        let out = fcc.step(&f);
        rec.record(&out, f.time.simulation_time);
    }
    let hist = rec.history();
    assert_eq!(hist.len(), 50);
    assert!((hist[0].simulation_time - 70.0 * DT).abs() < 1e-12);
    assert!(hist.iter().all(|s| s.on_ground));
    let last = rec.latest().unwrap();
    assert!((last.simulation_time - 119.0 * DT).abs() < 1e-12);
}
