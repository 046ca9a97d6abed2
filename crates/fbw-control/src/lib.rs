// ─────────────────────────────────────────────────────────────────────
// SCPN Flight Control Core — Flight Control
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Fly-by-wire control laws.
//!
//! Mode machines, envelope protections, pitch/roll/yaw laws and the
//! frame executor that ties them together.

pub mod air_data;
pub mod executor;
pub mod inputs;
pub mod modes;
pub mod pitch_law;
pub mod protections;
pub mod recorder;
pub mod roll_law;
pub mod state;
pub mod yaw_law;

pub use executor::{step, FlightControlComputer};
pub use recorder::{FrameRecorder, FrameSummary};
pub use state::PersistentState;
