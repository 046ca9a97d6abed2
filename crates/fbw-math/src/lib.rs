// ─────────────────────────────────────────────────────────────────────
// SCPN Flight Control Core — Math
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Table lookup and discrete-time signal primitives.

pub mod filters;
pub mod integrator;
pub mod interp;
pub mod limiters;
