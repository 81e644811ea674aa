#[macro_use]
extern crate criterion;
extern crate pendulabrot;

use criterion::{black_box, Criterion};
use pendulabrot::physics::{self, PendulumParams, PendulumState};
use pendulabrot::{AdaptiveConfig, AdaptiveRenderer, AnglePoint, PlaneMapper, RegionGrid};
use std::f64::consts::{PI, TAU};

fn bench_rk4_step(c: &mut Criterion) {
    let params = PendulumParams::standard();
    c.bench_function("rk4_step", move |b| {
        let mut state = PendulumState::at_rest(PI, PI / 2.0);
        b.iter(|| {
            state = physics::step(black_box(&state), &params, 0.01);
        })
    });
}

fn bench_engine_tick(c: &mut Criterion) {
    c.bench_function("engine_tick_64", move |b| {
        let mapper =
            PlaneMapper::new(256, 256, AnglePoint(0.0, 0.0), AnglePoint(TAU, PI)).unwrap();
        let grid = RegionGrid::with_uniform_grid(mapper, 8, 8).unwrap();
        let mut engine =
            AdaptiveRenderer::new(grid, PendulumParams::standard(), AdaptiveConfig::standard())
                .unwrap();
        b.iter(|| {
            black_box(engine.tick());
        })
    });
}

criterion_group!(benches, bench_rk4_step, bench_engine_tick);
criterion_main!(benches);
