// ─────────────────────────────────────────────────────────────────────
// SCPN Flight Control Core — Errors
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FbwError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Table '{name}' has mismatched shape: expected {expected}, found {found}")]
    TableShape {
        name: String,
        expected: String,
        found: String,
    },

    #[error("Table '{name}' breakpoints decrease at index {index}")]
    NonMonotonicBreakpoints { name: String, index: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type FbwResult<T> = Result<T, FbwError>;
