// ─────────────────────────────────────────────────────────────────────
// SCPN Flight Control Core — Frame Records
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Per-frame input snapshot and output bus.
//!
//! `FrameInput` is what the host samples once per tick, in host units
//! and host sign conventions. `FrameOutput` carries the surface commands
//! plus the diagnostic signals downstream consumers read.

use serde::{Deserialize, Serialize};

/// Frame timing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameTime {
    /// Step length (s).
    pub dt: f64,
    /// Monotonic simulation clock (s).
    pub simulation_time: f64,
}

/// Sensed aircraft state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorData {
    pub nz_g: f64,
    pub theta_deg: f64,
    pub phi_deg: f64,
    pub q_rad_s: f64,
    pub r_rad_s: f64,
    pub p_rad_s: f64,
    pub q_dot_rad_s2: f64,
    pub r_dot_rad_s2: f64,
    pub p_dot_rad_s2: f64,
    /// Measured elevator position, host units.
    pub eta_pos: f64,
    /// Measured stabiliser trim, host units.
    pub eta_trim_deg: f64,
    /// Measured rudder trim, host units.
    pub zeta_trim_pos: f64,
    pub alpha_deg: f64,
    pub beta_deg: f64,
    pub beta_dot_deg_s: f64,
    pub v_ias_kn: f64,
    pub v_tas_kn: f64,
    pub v_mach: f64,
    pub h_ft: f64,
    pub h_ind_ft: f64,
    pub h_radio_ft: f64,
    /// Strut compression, nose then left/right main. 0 = extended.
    pub gear_compression: [f64; 3],
    pub flaps_handle_index: f64,
    pub spoilers_left_pos: f64,
    pub spoilers_right_pos: f64,
    pub engine_1_thrust_lbf: f64,
    pub engine_2_thrust_lbf: f64,
    pub thrust_lever_1_pos: f64,
    pub thrust_lever_2_pos: f64,
    /// Lowest selectable speed (kn).
    pub vls_kn: f64,
}

/// Autopilot engagement and targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotInput {
    pub master_on: bool,
    /// Autopilot drives the attitude targets below through these laws.
    pub custom_on: bool,
    pub theta_c_deg: f64,
    pub phi_c_deg: f64,
    pub beta_c_deg: f64,
}

/// Host discretes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Discretes {
    pub slew_on: bool,
    pub pause_on: bool,
    pub tracking_mode_on_override: bool,
    pub tailstrike_protection_on: bool,
    /// Forces the flare sequencer to store the attitude and hold flare.
    pub flare_manual_arm: bool,
    /// Forces the flare sequencer into the attitude reduction phase.
    pub flare_manual_reduce: bool,
}

/// Side-stick and pedal deflections, host units (-1..1).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PilotInput {
    pub delta_eta_pos: f64,
    pub delta_xi_pos: f64,
    pub delta_zeta_pos: f64,
}

/// One frame of host input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameInput {
    pub time: FrameTime,
    pub data: SensorData,
    pub autopilot: AutopilotInput,
    pub discretes: Discretes,
    pub input: PilotInput,
}

// ── Output bus ───────────────────────────────────────────────────────

/// Sensor values after sign and unit conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvertedData {
    pub theta_deg: f64,
    pub phi_deg: f64,
    pub qk_deg_s: f64,
    pub rk_deg_s: f64,
    pub pk_deg_s: f64,
    pub qk_dot_deg_s2: f64,
    pub rk_dot_deg_s2: f64,
    pub pk_dot_deg_s2: f64,
    pub eta_deg: f64,
    pub eta_trim_deg: f64,
    pub zeta_trim_deg: f64,
    pub delta_eta_pos: f64,
    pub delta_xi_pos: f64,
    pub delta_zeta_pos: f64,
    pub gear_compression: [f64; 3],
    /// Sum of all `dt` since `initialize`.
    pub monotonic_time: f64,
}

/// Angle-of-attack limits and their speed equivalents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AirDataStatus {
    pub alpha_filtered_deg: f64,
    pub alpha0_deg: f64,
    pub alpha_max_deg: f64,
    pub alpha_prot_deg: f64,
    pub alpha_floor_deg: f64,
    pub v_alpha_max_kn: f64,
    pub v_alpha_prot_kn: f64,
    pub v_ias_dot_kn_s: f64,
}

/// Mode flags shared by all laws.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModeStatus {
    pub on_ground: bool,
    pub tracking_mode_on: bool,
    pub alpha_floor_inhibited: bool,
    pub ap_special_disc: bool,
}

/// Envelope protection latches and limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtectionStatus {
    pub alpha_floor_active: bool,
    pub high_aoa_active: bool,
    pub high_speed_active: bool,
    /// OR of every protection; requests autopilot disconnect.
    pub any_active: bool,
    pub v_hsp_low_kn: f64,
    pub v_hsp_high_kn: f64,
    pub v_target_kn: f64,
    pub alpha_c_deg: f64,
    pub bank_rate_deg_s: f64,
}

/// Pitch-axis modes and law internals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PitchStatus {
    pub in_flight: bool,
    pub in_flight_gain: f64,
    pub in_rotation: bool,
    pub in_rotation_gain: f64,
    pub in_flare: bool,
    pub flare_theta_c_deg: f64,
    pub flare_theta_c_rate_deg_s: f64,
    pub trim_should_freeze: bool,
    pub trim_reset: bool,
    pub trim_reset_deg: f64,
    pub trim_should_write: bool,
    pub trim_rate_up_deg_s: f64,
    pub trim_rate_lo_deg_s: f64,
    pub nz_limit_up_g: f64,
    pub nz_limit_lo_g: f64,
    pub eta_trim_limit_up_deg: f64,
    pub eta_trim_limit_lo_deg: f64,
    pub rotation_qk_c_deg_s: f64,
    pub rotation_eta_deg: f64,
    pub cstar_g: f64,
    pub nz_c_g: f64,
    pub eta_dot_deg_s: f64,
    pub eta_integrated_deg: f64,
    pub eta_deg: f64,
    pub eta_trim_deg: f64,
}

/// Roll and yaw modes and law internals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LateralStatus {
    pub in_flight: bool,
    pub in_flight_gain: f64,
    pub pk_c_deg_s: f64,
    pub phi_c_deg: f64,
    pub xi_deg: f64,
    pub beta_target_deg: f64,
    pub rudder_travel_limit_deg: f64,
    pub zeta_tc_yd_deg: f64,
    pub zeta_deg: f64,
    pub zeta_trim_deg: f64,
}

/// Surface commands in host units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceCommands {
    pub eta_pos: f64,
    pub eta_trim_deg: f64,
    pub eta_trim_deg_should_write: bool,
    pub xi_pos: f64,
    pub zeta_pos: f64,
    pub zeta_trim_pos: f64,
    pub zeta_trim_pos_should_write: bool,
}

/// One frame of output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameOutput {
    pub data: ConvertedData,
    pub air_data: AirDataStatus,
    pub modes: ModeStatus,
    pub protections: ProtectionStatus,
    pub pitch: PitchStatus,
    pub lateral: LateralStatus,
    pub output: SurfaceCommands,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_input_partial_json() {
        let json = r#"{
            "time": { "dt": 0.02, "simulation_time": 1.5 },
            "data": { "v_ias_kn": 140.0, "gear_compression": [0.5, 0.5, 0.5] },
            "input": { "delta_eta_pos": -0.25 }
        }"#;
        let frame: FrameInput = serde_json::from_str(json).unwrap();
        assert!((frame.time.dt - 0.02).abs() < 1e-12);
        assert!((frame.data.v_ias_kn - 140.0).abs() < 1e-12);
        assert_eq!(frame.data.gear_compression, [0.5, 0.5, 0.5]);
        assert!(!frame.autopilot.master_on, "Missing sections default");
        assert!((frame.input.delta_eta_pos + 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_frame_output_serializes() {
        let out = FrameOutput::default();
        let json = serde_json::to_string(&out).unwrap();
        assert!(json.contains("eta_trim_deg_should_write"));
    }
}
