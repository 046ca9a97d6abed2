// ─────────────────────────────────────────────────────────────────────
// SCPN Flight Control Core — Reload Integrator
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Bounded forward-Euler accumulator with an edge-triggered reload.
//!
//! When a reload is requested the accumulator is re-seeded to
//! `target - increment`, so after this frame's increment it equals
//! `target` exactly (before the bound is applied). The integrator also
//! reloads on its very first frame. Callers clear the pending reload
//! with [`ReloadIntegrator::end_frame`] once the frame is complete.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReloadIntegrator {
    value: f64,
    reload_pending: bool,
}

impl Default for ReloadIntegrator {
    fn default() -> Self {
        Self {
            value: 0.0,
            reload_pending: true,
        }
    }
}

impl ReloadIntegrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate `increment`, reloading to `target` when `reload` is set
    /// or a reload is still pending, then clamp to `[lower, upper]`.
    pub fn step(&mut self, increment: f64, reload: bool, target: f64, lower: f64, upper: f64) -> f64 {
        self.reload_pending |= reload;
        if self.reload_pending {
            // Equivalent to re-seeding at `target - increment` and
            // accumulating, without the round-off.
            self.value = target;
        } else {
            self.value += increment;
        }
        if self.value > upper {
            self.value = upper;
        } else if self.value < lower {
            self.value = lower;
        }
        self.value
    }

    #[cfg(test)]
    fn reload_pending(&self) -> bool {
        self.reload_pending
    }

    pub fn end_frame(&mut self) {
        self.reload_pending = false;
    }
}
