// ─────────────────────────────────────────────────────────────────────
// SCPN Flight Control Core — Interpolation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Piecewise-linear table lookup with clamped edges.
//!
//! Breakpoints are assumed non-decreasing (checked when the parameter
//! table is loaded). Queries outside the range return the edge value.

use fbw_types::params::{Lut1, Lut2};
use ndarray::Array2;

/// Locate `u` in `bp` by bisection.
///
/// Returns `(i, t)` with `bp[i] <= u <= bp[i + 1]` and `t` the fraction
/// along that interval, clamped to `[0, 1]`. A single breakpoint gives
/// `(0, 0.0)`.
pub fn bracket(bp: &[f64], u: f64) -> (usize, f64) {
    let n = bp.len();
    if n < 2 || u <= bp[0] {
        return (0, 0.0);
    }
    if u >= bp[n - 1] {
        return (n - 2, 1.0);
    }

    let mut lo = 0usize;
    let mut hi = n - 1;
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if u >= bp[mid] {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let width = bp[lo + 1] - bp[lo];
    let t = if width > 0.0 { (u - bp[lo]) / width } else { 0.0 };
    (lo, t.clamp(0.0, 1.0))
}

/// 1-D lookup over parallel breakpoint/value slices.
pub fn interp1(bp: &[f64], values: &[f64], u: f64) -> f64 {
    match values.len() {
        0 => 0.0,
        1 => values[0],
        _ => {
            let (i, t) = bracket(bp, u);
            if t == 0.0 {
                values[i]
            } else if t == 1.0 {
                values[i + 1]
            } else {
                values[i] + t * (values[i + 1] - values[i])
            }
        }
    }
}

/// 2-D lookup: bracket the row query, then interpolate both bracketing
/// rows along the column axis and blend.
pub fn interp2(
    row_bp: &[f64],
    col_bp: &[f64],
    values: &Array2<f64>,
    u_row: f64,
    u_col: f64,
) -> f64 {
    let (nrows, ncols) = values.dim();
    if nrows == 0 || ncols == 0 {
        return 0.0;
    }
    let (i, ti) = bracket(row_bp, u_row);
    let (j, tj) = bracket(col_bp, u_col);
    let i1 = (i + 1).min(nrows - 1);
    let j1 = (j + 1).min(ncols - 1);

    let along = |row: usize| {
        let v0 = values[[row, j]];
        if tj == 0.0 {
            v0
        } else {
            v0 + tj * (values[[row, j1]] - v0)
        }
    };

    let y0 = along(i);
    if ti == 0.0 {
        y0
    } else {
        y0 + ti * (along(i1) - y0)
    }
}

/// Evaluate a 1-D parameter table.
pub fn lookup1(lut: &Lut1, u: f64) -> f64 {
    interp1(&lut.breakpoints, &lut.values, u)
}

/// Evaluate a 2-D parameter table at `(row, col)`.
pub fn lookup2(lut: &Lut2, u_row: f64, u_col: f64) -> f64 {
    interp2(
        &lut.row_breakpoints,
        &lut.col_breakpoints,
        &lut.values,
        u_row,
        u_col,
    )
}

/// 1-D lookup that yields zero outside the breakpoint range.
pub fn lookup1_or_zero(lut: &Lut1, u: f64) -> f64 {
    match (lut.breakpoints.first(), lut.breakpoints.last()) {
        (Some(&lo), Some(&hi)) if u >= lo && u <= hi => lookup1(lut, u),
        _ => 0.0,
    }
}
