// ─────────────────────────────────────────────────────────────────────
// SCPN Flight Control Core — Limiters
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Saturation, slew-rate limiting and limit freezing.

use fbw_types::params::{Limits, RateLimit};
use serde::{Deserialize, Serialize};

/// Clamp `u` to `[lower, upper]`.
///
/// The upper bound is checked first, so an inverted pair yields
/// `upper` instead of panicking like `f64::clamp`.
#[inline]
pub fn saturate(u: f64, lower: f64, upper: f64) -> f64 {
    if u > upper {
        upper
    } else if u < lower {
        lower
    } else {
        u
    }
}

/// [`saturate`] against a parameter-table bound pair.
#[inline]
pub fn saturate_to(u: f64, limits: &Limits) -> f64 {
    saturate(u, limits.lower, limits.upper)
}

/// Advance `y` toward `target` by at most `|up| * dt` upward and
/// `|lo| * dt` downward. Returns the new value.
#[inline]
pub fn rate_limit_step(y: &mut f64, target: f64, up: f64, lo: f64, dt: f64) -> f64 {
    let delta = (target - *y).min(up.abs() * dt).max(-lo.abs() * dt);
    *y += delta;
    *y
}

/// Rate limiter seeded with the configured initial condition on the
/// first call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RateLimiter {
    y: Option<f64>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&mut self, u: f64, rate: &RateLimit, dt: f64) -> f64 {
        let y = self.y.get_or_insert(rate.initial);
        rate_limit_step(y, u, rate.up, rate.lo, dt)
    }
}

/// Holds a value while a trigger is asserted.
///
/// While `trigger` is false the output follows the input; while it is
/// true the output is the last value seen with the trigger released.
/// A trigger on the very first call freezes at that call's input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LimitFreeze {
    frozen: Option<f64>,
}

impl LimitFreeze {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&mut self, u: f64, trigger: bool) -> f64 {
        match self.frozen {
            Some(held) if trigger => held,
            _ => {
                self.frozen = Some(u);
                u
            }
        }
    }
}
