//! Round benchmarks: a full autopilot knockout and a replay of it.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use slash_duel::{runtime::simulate_round, GameConfig, SimTime};

fn bench_round(c: &mut Criterion) {
    let deadline = SimTime::from_secs(120);

    c.bench_function("simulate_autopilot_round", |b| {
        b.iter(|| simulate_round(black_box(GameConfig::default()), deadline))
    });

    let recording = simulate_round(GameConfig::default(), deadline).recording;
    c.bench_function("replay_recording", |b| {
        b.iter_batched(
            || recording.clone(),
            |recording| recording.replay(),
            BatchSize::SmallInput,
        )
    });

    // Time-up round: a minute of clock, sway and frames with no input.
    c.bench_function("advance_idle_round", |b| {
        b.iter(|| {
            let mut controller = slash_duel::HeadlessController::headless(GameConfig::default());
            let _ = controller.start(SimTime::ZERO);
            controller.advance_to(SimTime::from_secs(63));
            controller.state().compute_hash()
        })
    });
}

criterion_group!(benches, bench_round);
criterion_main!(benches);
