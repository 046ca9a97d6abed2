// ─────────────────────────────────────────────────────────────────────
// SCPN Flight Control Core — Parameter Table
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Immutable tuning data for the control laws.
//!
//! Every record carries `#[serde(default)]`, so a JSON file only needs
//! the entries it overrides. The defaults describe a narrow-body twin
//! with the host using nose-up / right-wing-down positive conventions.

use crate::error::{FbwError, FbwResult};
use ndarray::{array, Array2};
use serde::{Deserialize, Serialize};

// ── Building blocks ──────────────────────────────────────────────────

/// 1-D breakpoint/value table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lut1 {
    pub breakpoints: Vec<f64>,
    pub values: Vec<f64>,
}

impl Lut1 {
    pub fn new(breakpoints: Vec<f64>, values: Vec<f64>) -> Self {
        Self {
            breakpoints,
            values,
        }
    }

    pub fn validate(&self, name: &str) -> FbwResult<()> {
        if self.breakpoints.is_empty() {
            return Err(FbwError::ConfigError(format!("table '{name}' is empty")));
        }
        if self.breakpoints.len() != self.values.len() {
            return Err(FbwError::TableShape {
                name: name.to_string(),
                expected: format!("{} values", self.breakpoints.len()),
                found: format!("{} values", self.values.len()),
            });
        }
        check_breakpoints(name, &self.breakpoints)?;
        check_finite(name, &self.values)
    }
}

/// 2-D table. `values[[i, j]]` belongs to `(row_breakpoints[i], col_breakpoints[j])`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lut2 {
    pub row_breakpoints: Vec<f64>,
    pub col_breakpoints: Vec<f64>,
    pub values: Array2<f64>,
}

impl Lut2 {
    pub fn new(row_breakpoints: Vec<f64>, col_breakpoints: Vec<f64>, values: Array2<f64>) -> Self {
        Self {
            row_breakpoints,
            col_breakpoints,
            values,
        }
    }

    pub fn validate(&self, name: &str) -> FbwResult<()> {
        let expected = (self.row_breakpoints.len(), self.col_breakpoints.len());
        if expected.0 == 0 || expected.1 == 0 {
            return Err(FbwError::ConfigError(format!("table '{name}' is empty")));
        }
        if self.values.dim() != expected {
            return Err(FbwError::TableShape {
                name: name.to_string(),
                expected: format!("{}x{}", expected.0, expected.1),
                found: format!("{}x{}", self.values.nrows(), self.values.ncols()),
            });
        }
        check_breakpoints(&format!("{name}.rows"), &self.row_breakpoints)?;
        check_breakpoints(&format!("{name}.cols"), &self.col_breakpoints)?;
        if self.values.iter().any(|v| !v.is_finite()) {
            return Err(FbwError::ConfigError(format!(
                "table '{name}' contains non-finite values"
            )));
        }
        Ok(())
    }
}

/// Slew rates (per second, magnitudes) and the value used on first call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateLimit {
    pub up: f64,
    pub lo: f64,
    pub initial: f64,
}

impl RateLimit {
    pub fn new(up: f64, lo: f64, initial: f64) -> Self {
        Self { up, lo, initial }
    }

    pub fn symmetric(rate: f64, initial: f64) -> Self {
        Self::new(rate, rate, initial)
    }

    fn validate(&self, name: &str) -> FbwResult<()> {
        if !self.up.is_finite() || !self.lo.is_finite() || !self.initial.is_finite() {
            return Err(FbwError::ConfigError(format!(
                "rate limit '{name}' must be finite"
            )));
        }
        if self.up < 0.0 || self.lo < 0.0 {
            return Err(FbwError::ConfigError(format!(
                "rate limit '{name}' slew rates must be >= 0"
            )));
        }
        Ok(())
    }
}

/// Saturation bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    pub lower: f64,
    pub upper: f64,
}

impl Limits {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub fn symmetric(bound: f64) -> Self {
        Self::new(-bound, bound)
    }

    fn validate(&self, name: &str) -> FbwResult<()> {
        if !(self.lower <= self.upper) {
            return Err(FbwError::ConfigError(format!(
                "limits '{name}' require lower <= upper (got {} > {})",
                self.lower, self.upper
            )));
        }
        Ok(())
    }
}

/// First-order filter corner and scaling for a filtered derivative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilteredDerivative {
    pub gain: f64,
    pub c1: f64,
}

impl FilteredDerivative {
    pub fn new(gain: f64, c1: f64) -> Self {
        Self { gain, c1 }
    }
}

fn check_breakpoints(name: &str, bp: &[f64]) -> FbwResult<()> {
    check_finite(name, bp)?;
    for i in 1..bp.len() {
        if bp[i] < bp[i - 1] {
            return Err(FbwError::NonMonotonicBreakpoints {
                name: name.to_string(),
                index: i,
            });
        }
    }
    Ok(())
}

fn check_finite(name: &str, values: &[f64]) -> FbwResult<()> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(FbwError::ConfigError(format!(
            "table '{name}' contains non-finite values"
        )));
    }
    Ok(())
}

// ── Input conversion ─────────────────────────────────────────────────

/// Host sign conventions and unit scales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputScaling {
    pub theta_gain: f64,
    pub phi_gain: f64,
    /// Body rates are converted from rad/s to deg/s, then scaled.
    pub q_gain: f64,
    pub r_gain: f64,
    pub p_gain: f64,
    /// Measured elevator position to degrees.
    pub eta_deg_gain: f64,
    pub eta_trim_gain: f64,
    /// Measured rudder trim position to degrees.
    pub zeta_trim_deg_gain: f64,
    pub delta_eta_gain: f64,
    pub delta_xi_gain: f64,
    pub delta_zeta_gain: f64,
    pub gear_compression: Limits,
}

impl Default for InputScaling {
    fn default() -> Self {
        Self {
            theta_gain: 1.0,
            phi_gain: 1.0,
            q_gain: 1.0,
            r_gain: 1.0,
            p_gain: 1.0,
            eta_deg_gain: 30.0,
            eta_trim_gain: 1.0,
            zeta_trim_deg_gain: 20.0,
            delta_eta_gain: 1.0,
            delta_xi_gain: 1.0,
            delta_zeta_gain: 1.0,
            gear_compression: Limits::new(0.0, 1.0),
        }
    }
}

// ── Air data ─────────────────────────────────────────────────────────

/// Angle-of-attack limit schedules and speed trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirDataParams {
    pub alpha_lag_c1: f64,
    /// (Mach, flap handle) → alpha_max.
    pub alpha_max: Lut2,
    pub alpha_max_rate: RateLimit,
    /// Flap handle → zero-lift alpha.
    pub alpha0: Lut1,
    pub alpha0_rate: RateLimit,
    pub alpha_prot: Lut2,
    pub alpha_prot_rate: RateLimit,
    pub alpha_floor: Lut2,
    pub alpha_floor_rate: RateLimit,
    /// alpha_prot is held at alpha_max this long after ground contact (s).
    pub alpha_prot_hold_s: f64,
    pub v_ias_dot: FilteredDerivative,
    /// Lower bound on Mach wherever it divides.
    pub mach_floor: f64,
}

impl Default for AirDataParams {
    fn default() -> Self {
        let mach = vec![0.0, 0.5, 0.6, 0.8];
        let flaps = vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        Self {
            alpha_lag_c1: 2.0,
            alpha_max: Lut2::new(
                mach.clone(),
                flaps.clone(),
                array![
                    [9.5, 15.0, 15.0, 15.0, 14.5, 14.0],
                    [9.5, 15.0, 15.0, 15.0, 14.5, 14.0],
                    [8.5, 13.0, 13.0, 13.0, 12.5, 12.0],
                    [5.5, 9.0, 9.0, 9.0, 8.5, 8.0],
                ],
            ),
            alpha_max_rate: RateLimit::symmetric(1.5, 9.5),
            alpha0: Lut1::new(flaps.clone(), vec![-2.0, -3.0, -4.0, -5.0, -6.0, -7.0]),
            alpha0_rate: RateLimit::symmetric(1.5, -2.0),
            alpha_prot: Lut2::new(
                mach.clone(),
                flaps.clone(),
                array![
                    [8.0, 12.0, 12.0, 12.0, 11.5, 11.0],
                    [8.0, 12.0, 12.0, 12.0, 11.5, 11.0],
                    [7.0, 10.5, 10.5, 10.5, 10.0, 9.5],
                    [4.5, 7.5, 7.5, 7.5, 7.0, 6.5],
                ],
            ),
            alpha_prot_rate: RateLimit::symmetric(1.5, 8.0),
            alpha_floor: Lut2::new(
                mach,
                flaps,
                array![
                    [8.5, 13.5, 13.5, 13.5, 13.0, 12.5],
                    [8.5, 13.5, 13.5, 13.5, 13.0, 12.5],
                    [7.5, 11.5, 11.5, 11.5, 11.0, 10.5],
                    [5.0, 8.0, 8.0, 8.0, 7.5, 7.0],
                ],
            ),
            alpha_floor_rate: RateLimit::symmetric(1.5, 8.5),
            alpha_prot_hold_s: 10.0,
            v_ias_dot: FilteredDerivative::new(1.0, 2.0),
            mach_floor: 0.01,
        }
    }
}

// ── Mode logic ───────────────────────────────────────────────────────

/// Tuned thresholds for the phase and mode machines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeThresholds {
    /// A main strut above this compression means ground contact.
    pub gear_on_ground: f64,
    pub landing_radio_ft: f64,
    pub flight_theta_deg: f64,
    pub ground_theta_deg: f64,
    pub flight_radio_ft: f64,
    pub ground_settle_s: f64,
    pub in_flight_rate: RateLimit,
    pub rotation_v_tas_kn: f64,
    pub rotation_thrust_lever_deg: f64,
    pub in_rotation_rate: RateLimit,
    pub flare_theta_lag_c1: f64,
    pub flare_high_ft: f64,
    pub flare_reduce_ft: f64,
    pub flare_final_theta_deg: f64,
    /// Time over which the stored attitude is brought to the final attitude (s).
    pub flare_reduce_time_s: f64,
    pub flare_initial_rate_deg_s: f64,
    pub flare_theta_initial_deg: f64,
    pub trim_freeze_nz_lo_g: f64,
    pub trim_freeze_nz_hi_g: f64,
    pub trim_freeze_phi_deg: f64,
    pub lateral_in_flight_rate: RateLimit,
}

impl Default for ModeThresholds {
    fn default() -> Self {
        Self {
            gear_on_ground: 0.1,
            landing_radio_ft: 100.0,
            flight_theta_deg: 8.0,
            ground_theta_deg: 2.5,
            flight_radio_ft: 400.0,
            ground_settle_s: 5.0,
            in_flight_rate: RateLimit::symmetric(0.5, 0.0),
            rotation_v_tas_kn: 70.0,
            rotation_thrust_lever_deg: 35.0,
            in_rotation_rate: RateLimit::symmetric(0.5, 0.0),
            flare_theta_lag_c1: 2.0,
            flare_high_ft: 50.0,
            flare_reduce_ft: 30.0,
            flare_final_theta_deg: -2.0,
            flare_reduce_time_s: 8.0,
            flare_initial_rate_deg_s: -3.0,
            flare_theta_initial_deg: 0.0,
            trim_freeze_nz_lo_g: 0.5,
            trim_freeze_nz_hi_g: 1.25,
            trim_freeze_phi_deg: 30.0,
            lateral_in_flight_rate: RateLimit::symmetric(0.5, 0.0),
        }
    }
}

/// Trim rate and nz limits per pitch configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchConfigParams {
    pub clean_trim_rate_deg_s: f64,
    pub flaps_trim_rate_deg_s: f64,
    pub clean_nz_limits: Limits,
    pub flaps_nz_limits: Limits,
    pub nz_limit_up_rate: RateLimit,
    pub nz_limit_lo_rate: RateLimit,
}

impl Default for PitchConfigParams {
    fn default() -> Self {
        Self {
            clean_trim_rate_deg_s: 0.3,
            flaps_trim_rate_deg_s: 0.7,
            clean_nz_limits: Limits::new(-1.0, 2.5),
            flaps_nz_limits: Limits::new(0.0, 2.0),
            nz_limit_up_rate: RateLimit::symmetric(0.5, 2.0),
            nz_limit_lo_rate: RateLimit::symmetric(0.5, 0.0),
        }
    }
}

// ── Protections ──────────────────────────────────────────────────────

/// Envelope protection thresholds and schedules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtectionParams {
    /// Protections may only latch after this much monotonic time (s).
    pub arm_after_s: f64,
    pub high_aoa_stick_release: f64,
    pub high_aoa_stick_exit: f64,
    pub high_aoa_exit_timeout_s: f64,
    pub high_aoa_low_radio_ft: f64,
    pub high_aoa_low_stick: f64,
    pub high_aoa_low_alpha_margin_deg: f64,
    pub alpha_floor_mach_max: f64,
    pub alpha_floor_flaps_index: f64,
    pub alpha_floor_speed_trend_floor: f64,
    pub ap_disc_alpha_margin_deg: f64,
    pub vmo_kn: f64,
    pub mmo: f64,
    pub vmo_max_kn: f64,
    pub mmo_max: f64,
    /// Flight-path angle → activation speed (kn).
    pub high_speed_activation_kn: Lut1,
    /// Flight-path angle → activation Mach.
    pub high_speed_activation_mach: Lut1,
    /// Flight-path angle → Mach above which the persistence timer runs.
    pub high_speed_timer_mach: Lut1,
    pub high_speed_timer_mach_margin: f64,
    pub high_speed_timer_cap_kn: f64,
    pub high_speed_timer_s: f64,
    /// Bank → roll-rate demand with no speed protection active.
    pub bank_angle_normal: Lut1,
    pub bank_angle_high_aoa: Lut1,
    pub bank_angle_high_speed: Lut1,
    pub trim_limit_up_deg: f64,
    pub trim_limit_lo_deg: f64,
}

impl Default for ProtectionParams {
    fn default() -> Self {
        let fpa = vec![-10.0, -5.0, 0.0, 5.0];
        Self {
            arm_after_s: 10.0,
            high_aoa_stick_release: -0.03125,
            high_aoa_stick_exit: -0.5,
            high_aoa_exit_timeout_s: 0.5,
            high_aoa_low_radio_ft: 200.0,
            high_aoa_low_stick: 0.5,
            high_aoa_low_alpha_margin_deg: 2.0,
            alpha_floor_mach_max: 0.6,
            alpha_floor_flaps_index: 4.0,
            alpha_floor_speed_trend_floor: -3.0,
            ap_disc_alpha_margin_deg: 0.25,
            vmo_kn: 350.0,
            mmo: 0.82,
            vmo_max_kn: 365.0,
            mmo_max: 0.86,
            high_speed_activation_kn: Lut1::new(fpa.clone(), vec![356.0, 358.0, 362.0, 365.0]),
            high_speed_activation_mach: Lut1::new(fpa.clone(), vec![0.83, 0.835, 0.84, 0.85]),
            high_speed_timer_mach: Lut1::new(fpa, vec![0.82, 0.82, 0.83, 0.84]),
            high_speed_timer_mach_margin: 0.01,
            high_speed_timer_cap_kn: 365.0,
            high_speed_timer_s: 3.0,
            bank_angle_normal: Lut1::new(
                vec![-90.0, -67.0, -33.0, 33.0, 67.0, 90.0],
                vec![15.0, 15.0, 0.0, 0.0, -15.0, -15.0],
            ),
            bank_angle_high_aoa: Lut1::new(
                vec![-90.0, -45.0, -25.0, 25.0, 45.0, 90.0],
                vec![15.0, 15.0, 0.0, 0.0, -15.0, -15.0],
            ),
            bank_angle_high_speed: Lut1::new(
                vec![-90.0, -45.0, 0.0, 45.0, 90.0],
                vec![15.0, 10.0, 0.0, -10.0, -15.0],
            ),
            trim_limit_up_deg: 13.5,
            trim_limit_lo_deg: -4.0,
        }
    }
}

// ── Pitch law ────────────────────────────────────────────────────────

/// Take-off rotation law.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationLawParams {
    pub stick_rate: RateLimit,
    pub stick_limits: Limits,
    /// (Theta, H_radio) → stick attenuation when tailstrike protection is on.
    pub tailstrike: Lut2,
    /// Stick → pitch-rate demand (deg/s).
    pub pitch_rate_demand: Lut1,
    pub qk_c_deriv_gain: f64,
    pub error_gain: f64,
    pub error_deriv_gain: f64,
    pub predictor_lag_c1: f64,
    pub predictor_qk_dot_gain: f64,
    pub p_gain: f64,
    pub pd_gain: f64,
    pub feedforward_gain: f64,
    pub predictor_gain: f64,
    pub qk_dot_gain: f64,
    pub integrator_gain: f64,
    pub integrator_limits: Limits,
    /// Integrator reloads on ground while stick is at or below this.
    pub reload_stick_threshold: f64,
    pub ground_eta_limits: Limits,
}

impl Default for RotationLawParams {
    fn default() -> Self {
        Self {
            stick_rate: RateLimit::symmetric(2.0, 0.0),
            stick_limits: Limits::symmetric(1.0),
            tailstrike: Lut2::new(
                vec![0.0, 8.0, 11.0],
                vec![0.0, 10.0, 20.0],
                array![[0.0, 0.0, 0.0], [-0.3, -0.15, 0.0], [-0.8, -0.5, 0.0]],
            ),
            pitch_rate_demand: Lut1::new(vec![-1.0, 0.0, 1.0], vec![-3.0, 0.0, 5.0]),
            qk_c_deriv_gain: 1.0,
            error_gain: 1.0,
            error_deriv_gain: 1.0,
            predictor_lag_c1: 5.0,
            predictor_qk_dot_gain: 0.2,
            p_gain: 1.2,
            pd_gain: 1.0,
            feedforward_gain: 0.3,
            predictor_gain: 0.5,
            qk_dot_gain: 0.1,
            integrator_gain: 1.0,
            integrator_limits: Limits::symmetric(30.0),
            reload_stick_threshold: 0.0,
            ground_eta_limits: Limits::symmetric(30.0),
        }
    }
}

/// C* normal law, high-speed and high-AoA blends, attitude protection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalLawParams {
    /// Direct-law elevator gain (stick → deg).
    pub direct_eta_gain: f64,
    /// Pitch-rate term of C* (per deg/s per m/s).
    pub cstar_q_gain: f64,
    /// Crossover speed weighting the pitch-rate term of C* (m/s).
    pub cstar_crossover_speed_ms: f64,
    pub phi_limits: Limits,
    pub stick_rate: RateLimit,
    pub load_demand: Lut1,
    pub ap_theta_rate: RateLimit,
    pub ap_theta_gain: f64,
    // attitude protection
    pub theta_max_deg: f64,
    pub theta_max_full_flap_deg: f64,
    pub full_flap_index: f64,
    pub vls_margin_kn: f64,
    pub vls_reduction_gain: f64,
    pub vls_reduction_max_deg: f64,
    pub theta_max_rate: RateLimit,
    pub theta_min_deg: f64,
    pub theta_margin_limits: Limits,
    pub load_demand_theta_max: Lut1,
    pub load_demand_theta_min: Lut1,
    // high-speed protection
    pub hsp_stick_rate: RateLimit,
    pub hsp_gain_rate: RateLimit,
    pub hsp_precontrol: FilteredDerivative,
    pub hsp_v_dot: FilteredDerivative,
    pub hsp_v_error_gain: f64,
    pub hsp_precontrol_gain: f64,
    pub hsp_v_dot_gain: f64,
    pub hsp_qk_gain: f64,
    pub hsp_qk_dot_gain: f64,
    pub hsp_output_gain: f64,
    pub hsp_load_limits: Limits,
    pub hsp_limits: Limits,
    // flare
    pub flare_gain: f64,
    pub flare_limits: Limits,
    // high-AoA law
    pub alpha_stick_rate: RateLimit,
    pub alpha_lag_c1: f64,
    pub alpha_washout_c1: f64,
    pub alpha_washout_theta_deg: f64,
    pub alpha_washout_phi_deg: f64,
    pub alpha_washout_phi_divisor: f64,
    pub alpha_precontrol: FilteredDerivative,
    pub alpha_error_gain: f64,
    pub alpha_v_dot: FilteredDerivative,
    pub alpha_precontrol_gain: f64,
    pub alpha_v_dot_gain: f64,
    pub alpha_qk_gain: f64,
    pub alpha_qk_dot_gain: f64,
    pub alpha_law_limits: Limits,
    pub aoa_gain_rate: RateLimit,
    // nz tracking
    pub qk_deriv_gain: f64,
    pub qk_deriv_term_gain: f64,
    pub v_tas_limits: Limits,
    pub nz_error_schedule: Lut1,
    pub nz_error_gain: f64,
    pub nz_error_bias: f64,
    pub p_schedule: Lut1,
    pub d_schedule: Lut1,
    pub d_gain: f64,
    pub v_tas_dot: FilteredDerivative,
    pub v_tas_dot_gain: f64,
    pub v_tas_dot_limits: Limits,
    pub spoiler_washout_c1: f64,
    pub spoiler_limits: Limits,
    pub spoiler_schedule: Lut1,
    pub normal_law_limits: Limits,
    /// Step length → eta_dot gain.
    pub dt_schedule: Lut1,
    pub integrator_gain: f64,
    pub integrator_limits: Limits,
}

impl Default for NormalLawParams {
    fn default() -> Self {
        Self {
            direct_eta_gain: 30.0,
            cstar_q_gain: 0.001_779_1,
            cstar_crossover_speed_ms: 125.0,
            phi_limits: Limits::symmetric(33.0),
            stick_rate: RateLimit::symmetric(2.0, 0.0),
            load_demand: Lut1::new(vec![-1.0, 0.0, 1.0], vec![-2.0, 0.0, 1.5]),
            ap_theta_rate: RateLimit::symmetric(2.0, 0.0),
            ap_theta_gain: 0.1,
            theta_max_deg: 30.0,
            theta_max_full_flap_deg: 25.0,
            full_flap_index: 5.0,
            vls_margin_kn: 5.0,
            vls_reduction_gain: 0.25,
            vls_reduction_max_deg: 5.0,
            theta_max_rate: RateLimit::symmetric(1.0, 30.0),
            theta_min_deg: -15.0,
            theta_margin_limits: Limits::symmetric(15.0),
            load_demand_theta_max: Lut1::new(vec![-2.0, 0.0, 6.0], vec![-0.5, 0.0, 2.5]),
            load_demand_theta_min: Lut1::new(vec![-6.0, 0.0, 2.0], vec![-3.0, 0.0, 0.5]),
            hsp_stick_rate: RateLimit::symmetric(2.0, 0.0),
            hsp_gain_rate: RateLimit::symmetric(0.5, 0.0),
            hsp_precontrol: FilteredDerivative::new(1.0, 1.0),
            hsp_v_dot: FilteredDerivative::new(1.0, 1.0),
            hsp_v_error_gain: 0.02,
            hsp_precontrol_gain: 0.05,
            hsp_v_dot_gain: -0.05,
            hsp_qk_gain: -0.1,
            hsp_qk_dot_gain: -0.02,
            hsp_output_gain: 1.0,
            hsp_load_limits: Limits::new(-2.0, 0.0),
            hsp_limits: Limits::new(0.0, 1.5),
            flare_gain: 0.25,
            flare_limits: Limits::symmetric(0.5),
            alpha_stick_rate: RateLimit::symmetric(2.0, 0.0),
            alpha_lag_c1: 4.0,
            alpha_washout_c1: 0.5,
            alpha_washout_theta_deg: 22.5,
            alpha_washout_phi_deg: 3.0,
            alpha_washout_phi_divisor: 6.0,
            alpha_precontrol: FilteredDerivative::new(1.0, 2.0),
            alpha_error_gain: 1.5,
            alpha_v_dot: FilteredDerivative::new(1.0, 2.0),
            alpha_precontrol_gain: 0.5,
            alpha_v_dot_gain: -0.1,
            alpha_qk_gain: -0.8,
            alpha_qk_dot_gain: -0.1,
            alpha_law_limits: Limits::symmetric(10.0),
            aoa_gain_rate: RateLimit::symmetric(0.5, 0.0),
            qk_deriv_gain: 1.0,
            qk_deriv_term_gain: -0.1,
            v_tas_limits: Limits::new(60.0, 600.0),
            nz_error_schedule: Lut1::new(vec![60.0, 200.0, 400.0], vec![0.0, 0.0, 0.0]),
            nz_error_gain: 1.0,
            nz_error_bias: 1.0,
            p_schedule: Lut1::new(vec![60.0, 150.0, 300.0, 500.0], vec![6.0, 4.0, 2.5, 1.5]),
            d_schedule: Lut1::new(vec![60.0, 150.0, 300.0, 500.0], vec![1.2, 1.0, 0.6, 0.4]),
            d_gain: 1.0,
            v_tas_dot: FilteredDerivative::new(1.0, 2.0),
            v_tas_dot_gain: 0.0,
            v_tas_dot_limits: Limits::symmetric(10.0),
            spoiler_washout_c1: 1.0,
            spoiler_limits: Limits::symmetric(1.0),
            spoiler_schedule: Lut1::new(vec![0.0, 50.0, 400.0], vec![0.0, 2.0, 4.0]),
            normal_law_limits: Limits::symmetric(10.0),
            dt_schedule: Lut1::new(vec![0.0, 0.05, 0.1], vec![1.0, 1.0, 0.5]),
            integrator_gain: 1.0,
            integrator_limits: Limits::new(-17.0, 30.0),
        }
    }
}

/// Stabiliser trim integrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimParams {
    pub input_gain: f64,
    pub integrator_gain: f64,
    pub rate_initial_deg: f64,
}

impl Default for TrimParams {
    fn default() -> Self {
        Self {
            input_gain: 0.1,
            integrator_gain: 1.0,
            rate_initial_deg: 0.0,
        }
    }
}

// ── Lateral laws ─────────────────────────────────────────────────────

/// Roll normal law.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollLawParams {
    /// Direct-law aileron gain (stick → deg).
    pub direct_xi_gain: f64,
    pub pk_stick_gain: f64,
    pub pk_limits: Limits,
    pub pk_demand_limits: Limits,
    /// Aileron command beyond which the roll-rate demand is capped.
    pub xi_saturation_deg: f64,
    pub phi_integrator_gain: f64,
    pub phi_integrator_limits: Limits,
    pub phi_c_limits: Limits,
    pub phi_c_rate: RateLimit,
    /// IAS → roll-mode natural frequency; zero outside the breakpoints.
    pub omega_schedule: Lut1,
    pub min_speed_kn: f64,
    pub wing_area_m2: f64,
    pub wing_span_m: f64,
    pub roll_damping_clp: f64,
    pub aileron_effectiveness_clxi: f64,
    pub roll_inertia_scale: f64,
    pub damping_factor: f64,
    pub pk_feedback_gain: f64,
    pub phi_feedback_gain: f64,
    pub phi_c_gain: f64,
    pub dt_schedule: Lut1,
    pub output_gain: f64,
}

impl Default for RollLawParams {
    fn default() -> Self {
        Self {
            direct_xi_gain: 25.0,
            pk_stick_gain: 15.0,
            pk_limits: Limits::symmetric(15.0),
            pk_demand_limits: Limits::symmetric(15.0),
            xi_saturation_deg: 25.0,
            phi_integrator_gain: 1.0,
            phi_integrator_limits: Limits::symmetric(67.0),
            phi_c_limits: Limits::symmetric(67.0),
            phi_c_rate: RateLimit::symmetric(30.0, 0.0),
            omega_schedule: Lut1::new(vec![0.0, 120.0, 320.0, 400.0], vec![1.0, 2.0, 3.0, 3.0]),
            min_speed_kn: 80.0,
            wing_area_m2: 122.0,
            wing_span_m: 17.9,
            roll_damping_clp: -0.487,
            aileron_effectiveness_clxi: -0.0903,
            roll_inertia_scale: 1.0e6,
            damping_factor: 1.414,
            pk_feedback_gain: 1.0,
            phi_feedback_gain: 1.0,
            phi_c_gain: 1.0,
            dt_schedule: Lut1::new(vec![0.0, 0.05, 0.1], vec![1.0, 1.0, 0.5]),
            output_gain: 1.0,
        }
    }
}

/// Yaw damper, turn coordination, sideslip law and rudder trim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YawLawParams {
    pub pedal_gain: f64,
    /// V_tas → rudder travel limit (deg).
    pub rudder_travel: Lut1,
    pub rudder_travel_lower_gain: f64,
    pub thrust_lag_c1: f64,
    pub thrust_alpha_lag_c1: f64,
    pub thrust_cross_lag_c1: f64,
    pub beta_alpha_limits: Limits,
    pub beta_speed_limits: Limits,
    pub beta_alpha_thrust_gain: f64,
    pub beta_thrust_gain: f64,
    pub beta_target_gain: f64,
    pub tc_v_tas_limits: Limits,
    pub tc_schedule: Lut1,
    pub yd_schedule: Lut1,
    pub tc_limits: Limits,
    pub yd_limits: Limits,
    pub tc_blend_rate: RateLimit,
    pub ground_blend_rate: RateLimit,
    /// IAS → sideslip demand per unit pedal.
    pub pedal_beta_schedule: Lut1,
    pub beta_estimate_min_kn: f64,
    pub mass_kg: f64,
    pub side_force_beta: f64,
    pub side_force_zeta: f64,
    pub zeta_max_deg: f64,
    pub beta_error_schedule: Lut1,
    pub beta_lag_c1: f64,
    pub beta_feedforward_schedule: Lut1,
    pub beta_limits: Limits,
    pub trim_min_radio_ft: f64,
    pub trim_input_gain: f64,
    pub trim_integrator_gain: f64,
    pub trim_limits: Limits,
    pub trim_rate: RateLimit,
}

impl Default for YawLawParams {
    fn default() -> Self {
        let ias = vec![60.0, 150.0, 250.0, 350.0];
        Self {
            pedal_gain: 30.0,
            rudder_travel: Lut1::new(vec![0.0, 160.0, 250.0, 380.0], vec![30.0, 25.0, 9.0, 3.5]),
            rudder_travel_lower_gain: -1.0,
            thrust_lag_c1: 0.5,
            thrust_alpha_lag_c1: 1.0,
            thrust_cross_lag_c1: 0.5,
            beta_alpha_limits: Limits::new(-5.0, 15.0),
            beta_speed_limits: Limits::new(60.0, 400.0),
            beta_alpha_thrust_gain: 0.001,
            beta_thrust_gain: 0.01,
            beta_target_gain: 1.0,
            tc_v_tas_limits: Limits::new(60.0, 600.0),
            tc_schedule: Lut1::new(vec![0.0, 100.0, 500.0], vec![0.0, 0.5, 0.5]),
            yd_schedule: Lut1::new(vec![0.0, 100.0, 500.0], vec![0.0, 1.0, 1.0]),
            tc_limits: Limits::symmetric(5.0),
            yd_limits: Limits::symmetric(5.0),
            tc_blend_rate: RateLimit::symmetric(0.5, 0.0),
            ground_blend_rate: RateLimit::symmetric(0.5, 1.0),
            pedal_beta_schedule: Lut1::new(ias.clone(), vec![15.0, 10.0, 4.0, 2.0]),
            beta_estimate_min_kn: 60.0,
            mass_kg: 70000.0,
            side_force_beta: 0.814,
            side_force_zeta: 3.172,
            zeta_max_deg: 25.0,
            beta_error_schedule: Lut1::new(ias.clone(), vec![0.5, 0.4, 0.3, 0.2]),
            beta_lag_c1: 1.0,
            beta_feedforward_schedule: Lut1::new(ias, vec![1.0, 0.8, 0.5, 0.3]),
            beta_limits: Limits::symmetric(30.0),
            trim_min_radio_ft: 50.0,
            trim_input_gain: 0.1,
            trim_integrator_gain: 1.0,
            trim_limits: Limits::symmetric(20.0),
            trim_rate: RateLimit::symmetric(1.0, 0.0),
        }
    }
}

// ── Output assembly ──────────────────────────────────────────────────

/// Final rate limits, gains and saturations per surface channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputParams {
    pub eta_rate: RateLimit,
    pub xi_rate: RateLimit,
    pub zeta_rate: RateLimit,
    pub eta_pos_gain: f64,
    pub eta_pos_limits: Limits,
    pub eta_trim_gain: f64,
    pub eta_trim_limits: Limits,
    pub xi_pos_gain: f64,
    pub xi_pos_limits: Limits,
    pub zeta_pos_gain: f64,
    pub zeta_pos_limits: Limits,
    pub zeta_trim_gain: f64,
    pub zeta_trim_limits: Limits,
}

impl Default for OutputParams {
    fn default() -> Self {
        Self {
            eta_rate: RateLimit::symmetric(60.0, 0.0),
            xi_rate: RateLimit::symmetric(60.0, 0.0),
            zeta_rate: RateLimit::symmetric(60.0, 0.0),
            eta_pos_gain: 1.0 / 30.0,
            eta_pos_limits: Limits::symmetric(1.0),
            eta_trim_gain: 1.0,
            eta_trim_limits: Limits::new(-4.0, 13.5),
            xi_pos_gain: 1.0 / 25.0,
            xi_pos_limits: Limits::symmetric(1.0),
            zeta_pos_gain: 1.0 / 30.0,
            zeta_pos_limits: Limits::symmetric(1.0),
            zeta_trim_gain: 1.0 / 20.0,
            zeta_trim_limits: Limits::symmetric(1.0),
        }
    }
}

// ── Top level ────────────────────────────────────────────────────────

/// Complete tuning table, loaded once before the first step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterTable {
    pub input: InputScaling,
    pub air_data: AirDataParams,
    pub modes: ModeThresholds,
    pub pitch_config: PitchConfigParams,
    pub protections: ProtectionParams,
    pub rotation: RotationLawParams,
    pub normal_law: NormalLawParams,
    pub trim: TrimParams,
    pub roll: RollLawParams,
    pub yaw: YawLawParams,
    pub output: OutputParams,
}

impl ParameterTable {
    /// Load overrides from a JSON file on top of the defaults.
    pub fn from_file(path: &str) -> FbwResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let table = Self::from_json_str(&contents)?;
        tracing::info!(path, "parameter table loaded");
        Ok(table)
    }

    pub fn from_json_str(json: &str) -> FbwResult<Self> {
        let table: Self = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// Check every table, rate limit and saturation for consistency.
    pub fn validate(&self) -> FbwResult<()> {
        let lut1: &[(&str, &Lut1)] = &[
            ("air_data.alpha0", &self.air_data.alpha0),
            ("protections.high_speed_activation_kn", &self.protections.high_speed_activation_kn),
            ("protections.high_speed_activation_mach", &self.protections.high_speed_activation_mach),
            ("protections.high_speed_timer_mach", &self.protections.high_speed_timer_mach),
            ("protections.bank_angle_normal", &self.protections.bank_angle_normal),
            ("protections.bank_angle_high_aoa", &self.protections.bank_angle_high_aoa),
            ("protections.bank_angle_high_speed", &self.protections.bank_angle_high_speed),
            ("rotation.pitch_rate_demand", &self.rotation.pitch_rate_demand),
            ("normal_law.load_demand", &self.normal_law.load_demand),
            ("normal_law.load_demand_theta_max", &self.normal_law.load_demand_theta_max),
            ("normal_law.load_demand_theta_min", &self.normal_law.load_demand_theta_min),
            ("normal_law.nz_error_schedule", &self.normal_law.nz_error_schedule),
            ("normal_law.p_schedule", &self.normal_law.p_schedule),
            ("normal_law.d_schedule", &self.normal_law.d_schedule),
            ("normal_law.spoiler_schedule", &self.normal_law.spoiler_schedule),
            ("normal_law.dt_schedule", &self.normal_law.dt_schedule),
            ("roll.omega_schedule", &self.roll.omega_schedule),
            ("roll.dt_schedule", &self.roll.dt_schedule),
            ("yaw.rudder_travel", &self.yaw.rudder_travel),
            ("yaw.tc_schedule", &self.yaw.tc_schedule),
            ("yaw.yd_schedule", &self.yaw.yd_schedule),
            ("yaw.pedal_beta_schedule", &self.yaw.pedal_beta_schedule),
            ("yaw.beta_error_schedule", &self.yaw.beta_error_schedule),
            ("yaw.beta_feedforward_schedule", &self.yaw.beta_feedforward_schedule),
        ];
        for (name, lut) in lut1 {
            lut.validate(name)?;
        }

        self.air_data.alpha_max.validate("air_data.alpha_max")?;
        self.air_data.alpha_prot.validate("air_data.alpha_prot")?;
        self.air_data.alpha_floor.validate("air_data.alpha_floor")?;
        self.rotation.tailstrike.validate("rotation.tailstrike")?;

        let rates: &[(&str, &RateLimit)] = &[
            ("air_data.alpha_max_rate", &self.air_data.alpha_max_rate),
            ("air_data.alpha0_rate", &self.air_data.alpha0_rate),
            ("air_data.alpha_prot_rate", &self.air_data.alpha_prot_rate),
            ("air_data.alpha_floor_rate", &self.air_data.alpha_floor_rate),
            ("modes.in_flight_rate", &self.modes.in_flight_rate),
            ("modes.in_rotation_rate", &self.modes.in_rotation_rate),
            ("modes.lateral_in_flight_rate", &self.modes.lateral_in_flight_rate),
            ("pitch_config.nz_limit_up_rate", &self.pitch_config.nz_limit_up_rate),
            ("pitch_config.nz_limit_lo_rate", &self.pitch_config.nz_limit_lo_rate),
            ("rotation.stick_rate", &self.rotation.stick_rate),
            ("normal_law.stick_rate", &self.normal_law.stick_rate),
            ("normal_law.ap_theta_rate", &self.normal_law.ap_theta_rate),
            ("normal_law.theta_max_rate", &self.normal_law.theta_max_rate),
            ("normal_law.hsp_stick_rate", &self.normal_law.hsp_stick_rate),
            ("normal_law.hsp_gain_rate", &self.normal_law.hsp_gain_rate),
            ("normal_law.alpha_stick_rate", &self.normal_law.alpha_stick_rate),
            ("normal_law.aoa_gain_rate", &self.normal_law.aoa_gain_rate),
            ("roll.phi_c_rate", &self.roll.phi_c_rate),
            ("yaw.tc_blend_rate", &self.yaw.tc_blend_rate),
            ("yaw.ground_blend_rate", &self.yaw.ground_blend_rate),
            ("yaw.trim_rate", &self.yaw.trim_rate),
            ("output.eta_rate", &self.output.eta_rate),
            ("output.xi_rate", &self.output.xi_rate),
            ("output.zeta_rate", &self.output.zeta_rate),
        ];
        for (name, rate) in rates {
            rate.validate(name)?;
        }

        let limits: &[(&str, &Limits)] = &[
            ("input.gear_compression", &self.input.gear_compression),
            ("pitch_config.clean_nz_limits", &self.pitch_config.clean_nz_limits),
            ("pitch_config.flaps_nz_limits", &self.pitch_config.flaps_nz_limits),
            ("rotation.integrator_limits", &self.rotation.integrator_limits),
            ("normal_law.integrator_limits", &self.normal_law.integrator_limits),
            ("roll.pk_limits", &self.roll.pk_limits),
            ("roll.pk_demand_limits", &self.roll.pk_demand_limits),
            ("roll.phi_integrator_limits", &self.roll.phi_integrator_limits),
            ("yaw.trim_limits", &self.yaw.trim_limits),
            ("output.eta_pos_limits", &self.output.eta_pos_limits),
            ("output.xi_pos_limits", &self.output.xi_pos_limits),
            ("output.zeta_pos_limits", &self.output.zeta_pos_limits),
            ("output.eta_trim_limits", &self.output.eta_trim_limits),
        ];
        for (name, lim) in limits {
            lim.validate(name)?;
        }

        if self.protections.trim_limit_lo_deg > self.protections.trim_limit_up_deg {
            return Err(FbwError::ConfigError(
                "protections.trim_limit_lo_deg must not exceed trim_limit_up_deg".to_string(),
            ));
        }
        if !self.air_data.mach_floor.is_finite() || self.air_data.mach_floor <= 0.0 {
            return Err(FbwError::ConfigError(
                "air_data.mach_floor must be finite and > 0".to_string(),
            ));
        }
        if !self.roll.min_speed_kn.is_finite() || self.roll.min_speed_kn <= 0.0 {
            return Err(FbwError::ConfigError(
                "roll.min_speed_kn must be finite and > 0".to_string(),
            ));
        }
        Ok(())
    }
}
