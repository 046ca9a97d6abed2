// ─────────────────────────────────────────────────────────────────────
// SCPN Flight Control Core — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Standard gravity (m/s²) as used by the turn-coordination terms.
pub const G: f64 = 9.81;

/// Knots to metres per second.
pub const KNOT_TO_MS: f64 = 0.5144;

/// Half the sea-level air density (kg/m³), so `q = HALF_RHO * v²`.
pub const HALF_RHO: f64 = 0.6125;

/// Radians to degrees.
pub const RAD_TO_DEG: f64 = 57.295_779_513_082_323;

/// Degrees to radians.
pub const DEG_TO_RAD: f64 = 0.017_453_292_519_943_295;
