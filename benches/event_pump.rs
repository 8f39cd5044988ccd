// SPDX-License-Identifier: MPL-2.0
//! Benchmarks for engine event processing.
//!
//! Measures the performance of:
//! - Draining a burst of `timeupdate` events through the state machine
//! - A full controller tick (events, controls timer, seek indicator)

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use stream_lens::application::port::TimeRanges;
use stream_lens::domain::video::PlaybackMode;
use stream_lens::infrastructure::{AutoplayPolicy, SimulatedEngineFactory, SimulatedEngineHandle};
use stream_lens::player::{Message, PlaybackController, TransportSettings};
use std::hint::black_box;
use std::time::Instant;

const BURST: usize = 256;

/// Builds a playing on-demand controller with a one-hour window.
fn playing_controller() -> (PlaybackController, SimulatedEngineHandle) {
    let factory = SimulatedEngineFactory::new(AutoplayPolicy::Allow);
    let mut controller = PlaybackController::new(
        TransportSettings::new(PlaybackMode::OnDemand),
        Box::new(factory.clone()),
    );
    let now = Instant::now();
    controller.update(Message::Attach("https://cdn.example/bench.mp4".into()), now);
    let engine = factory
        .latest()
        .expect("controller should create an engine on attach");
    engine.set_seekable(0.0, 3_600.0);
    engine.set_duration(3_600.0);
    engine.set_buffered(TimeRanges::single(0.0, 120.0));
    engine.load_metadata();
    controller.tick(now);
    (controller, engine)
}

/// Benchmark pumping a burst of time updates.
fn bench_time_update_burst(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_pump");

    group.bench_function("time_update_burst", |b| {
        b.iter_batched(
            || {
                let (controller, engine) = playing_controller();
                for i in 0..BURST {
                    engine.tick(i as f64 * 0.25);
                }
                (controller, engine)
            },
            |(mut controller, engine)| {
                black_box(controller.pump(Instant::now()));
                black_box(&engine);
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

/// Benchmark an idle controller tick.
fn bench_idle_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_pump");
    let (mut controller, _engine) = playing_controller();

    group.bench_function("idle_tick", |b| {
        b.iter(|| black_box(controller.tick(Instant::now())));
    });

    group.finish();
}

criterion_group!(benches, bench_time_update_burst, bench_idle_tick);
criterion_main!(benches);
