use criterion::{criterion_group, criterion_main, Criterion};
use fbw_control::{step, PersistentState};
use fbw_types::frame::{FrameInput, FrameTime, SensorData};
use fbw_types::params::ParameterTable;
use std::hint::black_box;

fn cruise_frame(i: usize) -> FrameInput {
    let mut f = FrameInput {
        time: FrameTime {
            dt: 0.02,
            simulation_time: i as f64 * 0.02,
        },
        data: SensorData {
            nz_g: 1.0,
            theta_deg: 2.5,
            alpha_deg: 2.5,
            v_ias_kn: 280.0,
            v_tas_kn: 420.0,
            v_mach: 0.72,
            h_radio_ft: 8000.0,
            ..SensorData::default()
        },
        ..FrameInput::default()
    };
    f.input.delta_eta_pos = ((i as f64) * 0.05).sin() * 0.3;
    f.input.delta_xi_pos = ((i as f64) * 0.03).cos() * 0.2;
    f
}

fn bench_single_step(c: &mut Criterion) {
    let params = ParameterTable::default();
    let mut state = PersistentState::new();
    for i in 0..500 {
        step(&params, &mut state, &cruise_frame(i));
    }
    let frame = cruise_frame(500);

    c.bench_function("fbw_step_cruise", |b| {
        b.iter(|| {
            let mut s = state.clone();
            black_box(step(&params, &mut s, black_box(&frame)))
        })
    });
}

fn bench_one_second(c: &mut Criterion) {
    let params = ParameterTable::default();
    let frames: Vec<FrameInput> = (0..50).map(cruise_frame).collect();

    let mut group = c.benchmark_group("fbw_step_sequence");
    group.sample_size(50);
    group.bench_function("50_frames_from_initialize", |b| {
        b.iter(|| {
            let mut state = PersistentState::new();
            let mut eta = 0.0;
            for f in &frames {
                eta = step(&params, &mut state, f).output.eta_pos;
            }
            black_box(eta);
        })
    });
    group.finish();
}

criterion_group!(benches, bench_single_step, bench_one_second);
criterion_main!(benches);
