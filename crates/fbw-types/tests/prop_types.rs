// ─────────────────────────────────────────────────────────────────────
// SCPN Flight Control Core — Property-Based Tests (proptest) for fbw-types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for fbw-types using proptest.
//!
//! Covers: table validation invariants, partial JSON overrides,
//! loading from disk.

use fbw_types::error::FbwError;
use fbw_types::params::{Lut1, ParameterTable};
use proptest::prelude::*;
use std::io::Write;

fn sorted_breakpoints() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-500.0f64..500.0, 1..16).prop_map(|mut v| {
        v.sort_by(|a, b| a.partial_cmp(b).unwrap());
        v
    })
}

// ── Lut1 Validation ──────────────────────────────────────────────────

proptest! {
    /// Sorted breakpoints with matching values always validate.
    #[test]
    fn sorted_tables_validate(bp in sorted_breakpoints(), seed in -10.0f64..10.0) {
        let values: Vec<f64> = bp.iter().map(|x| x * seed).collect();
        let lut = Lut1::new(bp, values);
        prop_assert!(lut.validate("t").is_ok());
    }

    /// A strict decrease anywhere is reported at its index.
    #[test]
    fn decreasing_pair_is_rejected(
        bp in sorted_breakpoints().prop_filter("need 2+ distinct", |v| {
            v.len() >= 2 && v[v.len() - 1] > v[0]
        }),
    ) {
        let mut bp = bp;
        let n = bp.len();
        bp[n - 1] = bp[0] - 1.0;
        let lut = Lut1::new(bp.clone(), vec![0.0; n]);
        match lut.validate("t") {
            Err(FbwError::NonMonotonicBreakpoints { index, .. }) => {
                prop_assert!(index >= 1 && index < n, "index {} out of 1..{}", index, n);
                prop_assert!(bp[index] < bp[index - 1]);
            }
            other => prop_assert!(false, "expected NonMonotonicBreakpoints, got {:?}", other),
        }
    }

    /// Value count must equal breakpoint count.
    #[test]
    fn length_mismatch_is_rejected(bp in sorted_breakpoints(), extra in 1usize..4) {
        let values = vec![0.0; bp.len() + extra];
        let lut = Lut1::new(bp, values);
        let is_shape_error = matches!(lut.validate("t"), Err(FbwError::TableShape { .. }));
        prop_assert!(is_shape_error);
    }
}

// ── Partial Overrides ────────────────────────────────────────────────

proptest! {
    /// Overriding one threshold leaves every other record at its default.
    #[test]
    fn single_override_keeps_defaults(gear in 0.01f64..0.9, radio in 10.0f64..2000.0) {
        let json = format!(
            r#"{{ "modes": {{ "gear_on_ground": {gear}, "flight_radio_ft": {radio} }} }}"#
        );
        let table = ParameterTable::from_json_str(&json).unwrap();
        let defaults = ParameterTable::default();

        prop_assert!((table.modes.gear_on_ground - gear).abs() < 1e-12);
        prop_assert!((table.modes.flight_radio_ft - radio).abs() < 1e-9);
        prop_assert_eq!(table.modes.ground_settle_s, defaults.modes.ground_settle_s);
        prop_assert_eq!(&table.air_data, &defaults.air_data);
        prop_assert_eq!(&table.yaw, &defaults.yaw);
    }
}

#[test]
fn load_from_temp_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, r#"{{ "protections": {{ "vmo_kn": 340.0 }} }}"#).unwrap();
    let path = file.path().to_string_lossy().to_string();

    let table = ParameterTable::from_file(&path).unwrap();
    assert!((table.protections.vmo_kn - 340.0).abs() < 1e-12);
    assert!((table.protections.mmo - 0.82).abs() < 1e-12);
}

#[test]
fn malformed_json_is_json_error() {
    let err = ParameterTable::from_json_str("{ \"modes\": ").unwrap_err();
    assert!(matches!(err, FbwError::Json(_)), "{err}");
}
