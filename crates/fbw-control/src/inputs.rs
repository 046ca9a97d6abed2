// ─────────────────────────────────────────────────────────────────────
// SCPN Flight Control Core — Input Conversion
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Host units and sign conventions to control-law units.
//!
//! Body-axis rates are resolved into Euler-angle rates:
//!
//! ```text
//! pk = p + sinΦ·tanΘ·q + cosΦ·tanΘ·r
//! qk = cosΦ·q − sinΦ·r
//! rk = (sinΦ·q + cosΦ·r) / cosΘ
//! ```
//!
//! The same transform is applied to the body accelerations.

use fbw_math::limiters::saturate_to;
use fbw_types::constants::{DEG_TO_RAD, RAD_TO_DEG};
use fbw_types::frame::{ConvertedData, FrameInput};
use fbw_types::params::InputScaling;

/// Body-axis rates in deg/s after scaling.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BodyRates {
    pub q: f64,
    pub r: f64,
    pub p: f64,
}

/// Euler-angle rates (pk, qk, rk).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EulerRates {
    pub pk: f64,
    pub qk: f64,
    pub rk: f64,
}

/// Resolve body rates into Euler rates at attitude (Θ, Φ) in degrees.
pub fn euler_rates(body: BodyRates, theta_deg: f64, phi_deg: f64) -> EulerRates {
    let (sin_phi, cos_phi) = (phi_deg * DEG_TO_RAD).sin_cos();
    let theta = theta_deg * DEG_TO_RAD;
    let tan_theta = theta.tan();
    let cos_theta = theta.cos();
    EulerRates {
        pk: body.p + sin_phi * tan_theta * body.q + cos_phi * tan_theta * body.r,
        qk: cos_phi * body.q - sin_phi * body.r,
        rk: (sin_phi * body.q + cos_phi * body.r) / cos_theta,
    }
}

pub fn body_rates(input: &FrameInput, s: &InputScaling) -> BodyRates {
    let d = &input.data;
    BodyRates {
        q: d.q_rad_s * RAD_TO_DEG * s.q_gain,
        r: d.r_rad_s * RAD_TO_DEG * s.r_gain,
        p: d.p_rad_s * RAD_TO_DEG * s.p_gain,
    }
}

fn body_accelerations(input: &FrameInput, s: &InputScaling) -> BodyRates {
    let d = &input.data;
    BodyRates {
        q: d.q_dot_rad_s2 * RAD_TO_DEG * s.q_gain,
        r: d.r_dot_rad_s2 * RAD_TO_DEG * s.r_gain,
        p: d.p_dot_rad_s2 * RAD_TO_DEG * s.p_gain,
    }
}

/// Convert one frame. `monotonic_time` is the already-advanced clock.
pub fn convert(input: &FrameInput, monotonic_time: f64, s: &InputScaling) -> ConvertedData {
    let d = &input.data;
    let theta_deg = s.theta_gain * d.theta_deg;
    let phi_deg = s.phi_gain * d.phi_deg;
    let rates = euler_rates(body_rates(input, s), theta_deg, phi_deg);
    let accel = euler_rates(body_accelerations(input, s), theta_deg, phi_deg);

    ConvertedData {
        theta_deg,
        phi_deg,
        qk_deg_s: rates.qk,
        rk_deg_s: rates.rk,
        pk_deg_s: rates.pk,
        qk_dot_deg_s2: accel.qk,
        rk_dot_deg_s2: accel.rk,
        pk_dot_deg_s2: accel.pk,
        eta_deg: s.eta_deg_gain * d.eta_pos,
        eta_trim_deg: s.eta_trim_gain * d.eta_trim_deg,
        zeta_trim_deg: s.zeta_trim_deg_gain * d.zeta_trim_pos,
        delta_eta_pos: s.delta_eta_gain * input.input.delta_eta_pos,
        delta_xi_pos: s.delta_xi_gain * input.input.delta_xi_pos,
        delta_zeta_pos: s.delta_zeta_gain * input.input.delta_zeta_pos,
        gear_compression: d.gear_compression.map(|c| saturate_to(c, &s.gear_compression)),
        monotonic_time,
    }
}
