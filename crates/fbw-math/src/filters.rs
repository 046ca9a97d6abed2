// ─────────────────────────────────────────────────────────────────────
// SCPN Flight Control Core — Discrete Filters
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! First-order filters discretised with the bilinear (Tustin) transform,
//! plus the discrete derivative used by the rate and speed-trend terms.
//!
//! Filters hold only their memory; the corner `c1` and step `dt` are
//! passed on every call so the same state works with any tuning table.
//! Lag and washout filters prime themselves on the first call: input
//! and output memory are both seeded with the first input, so a
//! constant signal produces no start-up transient.

use fbw_types::params::FilteredDerivative;
use serde::{Deserialize, Serialize};

/// Input/output memory of a primed first-order filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Primed {
    pub u: f64,
    pub y: f64,
}

/// Low-pass `c1 / (s + c1)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LagFilter {
    state: Option<Primed>,
}

impl LagFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&mut self, u: f64, c1: f64, dt: f64) -> f64 {
        let prev = *self.state.get_or_insert(Primed { u, y: u });
        let d = dt * c1;
        let denom = d + 2.0;
        let ca = d / denom;
        let y = (2.0 - d) / denom * prev.y + u * ca + prev.u * ca;
        self.state = Some(Primed { u, y });
        y
    }

    #[cfg(test)]
    fn output(&self) -> Option<f64> {
        self.state.map(|s| s.y)
    }
}

/// High-pass `s / (s + c1)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WashoutFilter {
    state: Option<Primed>,
}

impl WashoutFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&mut self, u: f64, c1: f64, dt: f64) -> f64 {
        let prev = *self.state.get_or_insert(Primed { u, y: u });
        let d = dt * c1;
        let denom = d + 2.0;
        let ca = 2.0 / denom;
        let y = (2.0 - d) / denom * prev.y + u * ca - prev.u * ca;
        self.state = Some(Primed { u, y });
        y
    }
}

/// `(gain * u[n] - gain * u[n-1]) / dt`.
///
/// Unlike the filters this one is not primed: the remembered scaled
/// input starts at zero. A non-positive `dt` yields zero and still
/// updates the memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscreteDerivative {
    prev_scaled: f64,
}

impl DiscreteDerivative {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&mut self, u: f64, gain: f64, dt: f64) -> f64 {
        let scaled = gain * u;
        let y = if dt > 0.0 {
            (scaled - self.prev_scaled) / dt
        } else {
            0.0
        };
        self.prev_scaled = scaled;
        y
    }

    #[cfg(test)]
    fn previous(&self) -> f64 {
        self.prev_scaled
    }
}

/// Discrete derivative followed by a Tustin lag, all memory seeded at 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivativeLag {
    derivative: DiscreteDerivative,
    prev_rate: f64,
    y: f64,
}

impl DerivativeLag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&mut self, u: f64, cfg: &FilteredDerivative, dt: f64) -> f64 {
        let rate = self.derivative.step(u, cfg.gain, dt);
        let d = dt * cfg.c1;
        let denom = d + 2.0;
        self.y = (2.0 - d) / denom * self.y + (rate + self.prev_rate) * (d / denom);
        self.prev_rate = rate;
        self.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 0.02;

    #[test]
    fn test_lag_primes_on_first_input() {
        let mut f = LagFilter::new();
        assert!(f.output().is_none());
        let y = f.step(4.2, 2.0, DT);
        assert!((y - 4.2).abs() < 1e-12, "First output equals input: {y}");
        let y = f.step(4.2, 2.0, DT);
        assert!((y - 4.2).abs() < 1e-12, "Constant input holds: {y}");
    }

    #[test]
    fn test_lag_step_response_converges() {
        let mut f = LagFilter::new();
        f.step(0.0, 1.0, DT);
        let mut y = 0.0;
        for _ in 0..1000 {
            y = f.step(1.0, 1.0, DT);
        }
        // 20 s at c1 = 1 rad/s is 20 time constants
        assert!((y - 1.0).abs() < 1e-6, "Lag steady state: {y}");
    }

    #[test]
    fn test_lag_is_monotonic_on_step() {
        let mut f = LagFilter::new();
        f.step(0.0, 2.0, DT);
        let mut prev = 0.0;
        for _ in 0..200 {
            let y = f.step(1.0, 2.0, DT);
            assert!(y >= prev - 1e-15 && y <= 1.0 + 1e-12, "y={y} prev={prev}");
            prev = y;
        }
    }

    #[test]
    fn test_washout_rejects_constant() {
        let mut f = WashoutFilter::new();
        let y0 = f.step(5.0, 1.0, DT);
        assert!((y0 - 5.0).abs() < 1e-12, "Primed output is the input: {y0}");
        let mut y = y0;
        for _ in 0..2000 {
            y = f.step(5.0, 1.0, DT);
        }
        assert!(y.abs() < 1e-6, "Washout steady state: {y}");
    }

    #[test]
    fn test_washout_passes_step_edge() {
        let mut f = WashoutFilter::new();
        f.step(0.0, 0.5, DT);
        let mut y = f.step(0.0, 0.5, DT);
        assert!(y.abs() < 1e-12);
        y = f.step(1.0, 0.5, DT);
        assert!(y > 0.95, "Edge passes through: {y}");
    }

    #[test]
    fn test_derivative_of_ramp() {
        let mut d = DiscreteDerivative::new();
        d.step(0.0, 1.0, DT);
        for k in 1..10 {
            let y = d.step(k as f64 * 0.1, 1.0, DT);
            assert!((y - 5.0).abs() < 1e-9, "Ramp slope 0.1/0.02: {y}");
        }
    }

    #[test]
    fn test_derivative_zero_dt() {
        let mut d = DiscreteDerivative::new();
        let y = d.step(3.0, 2.0, 0.0);
        assert_eq!(y, 0.0);
        assert!((d.previous() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_derivative_lag_settles_on_ramp_slope() {
        let cfg = FilteredDerivative::new(1.0, 2.0);
        let mut f = DerivativeLag::new();
        f.step(0.0, &cfg, DT);
        let mut y = 0.0;
        for k in 1..1500 {
            y = f.step(k as f64 * DT * 3.0, &cfg, DT);
        }
        assert!((y - 3.0).abs() < 1e-6, "Filtered slope: {y}");
    }
}
