// ─────────────────────────────────────────────────────────────────────
// SCPN Flight Control Core — Air Data
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Angle-of-attack limits, their speed equivalents and the airspeed trend.

use fbw_math::filters::{DiscreteDerivative, LagFilter};
use fbw_math::interp::{lookup1, lookup2};
use fbw_math::limiters::RateLimiter;
use fbw_types::frame::{AirDataStatus, FrameTime, SensorData};
use fbw_types::params::AirDataParams;
use serde::{Deserialize, Serialize};

/// Smallest alpha span (deg) used as the V-alpha denominator.
const MIN_ALPHA_SPAN_DEG: f64 = 1e-3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirDataState {
    alpha_lag: LagFilter,
    alpha_max: RateLimiter,
    alpha0: RateLimiter,
    alpha_prot: RateLimiter,
    alpha_floor: RateLimiter,
    /// Last time the aircraft was seen on ground.
    ground_event_time: Option<f64>,
    v_ias_derivative: DiscreteDerivative,
    v_ias_dot_lag: LagFilter,
}

/// Airspeed at which the filtered alpha would reach `alpha_limit`.
///
/// `alpha0` is the zero-lift angle. Lift scales with `V²·(α − α0)`, so
/// `V_lim = V·sqrt(|α − α0| / (α_lim − α0))`.
pub fn speed_at_alpha(v_ias_kn: f64, alpha_deg: f64, alpha0_deg: f64, alpha_limit_deg: f64) -> f64 {
    let span = (alpha_limit_deg - alpha0_deg).max(MIN_ALPHA_SPAN_DEG);
    ((alpha_deg - alpha0_deg).abs() / span).sqrt() * v_ias_kn
}

impl AirDataState {
    pub fn update(
        &mut self,
        d: &SensorData,
        time: &FrameTime,
        prev_on_ground: bool,
        p: &AirDataParams,
    ) -> AirDataStatus {
        let dt = time.dt;
        let t = time.simulation_time;
        let flaps = d.flaps_handle_index;

        let alpha_f = self.alpha_lag.step(d.alpha_deg, p.alpha_lag_c1, dt);
        let alpha_max = self.alpha_max.step(
            lookup2(&p.alpha_max, d.v_mach, flaps),
            &p.alpha_max_rate,
            dt,
        );
        let alpha0 = self.alpha0.step(lookup1(&p.alpha0, flaps), &p.alpha0_rate, dt);

        let event = self.ground_event_time.get_or_insert(t);
        if prev_on_ground || *event == 0.0 {
            *event = t;
        }
        let scheduled_prot = self.alpha_prot.step(
            lookup2(&p.alpha_prot, d.v_mach, flaps),
            &p.alpha_prot_rate,
            dt,
        );
        let alpha_prot = if t - *event <= p.alpha_prot_hold_s {
            alpha_max
        } else {
            scheduled_prot
        };
        let alpha_floor = self.alpha_floor.step(
            lookup2(&p.alpha_floor, d.v_mach, flaps),
            &p.alpha_floor_rate,
            dt,
        );

        let trend = self.v_ias_derivative.step(d.v_ias_kn, p.v_ias_dot.gain, dt);
        let v_ias_dot = self.v_ias_dot_lag.step(trend, p.v_ias_dot.c1, dt);

        AirDataStatus {
            alpha_filtered_deg: alpha_f,
            alpha0_deg: alpha0,
            alpha_max_deg: alpha_max,
            alpha_prot_deg: alpha_prot,
            alpha_floor_deg: alpha_floor,
            v_alpha_max_kn: speed_at_alpha(d.v_ias_kn, alpha_f, alpha0, alpha_max),
            v_alpha_prot_kn: speed_at_alpha(d.v_ias_kn, alpha_f, alpha0, alpha_prot),
            v_ias_dot_kn_s: v_ias_dot,
        }
    }
}
