use arete_core::{
    AttainmentLevel, FactorLevel, FactorScores, GoalOutcome, ALL_ATTAINMENT_LEVELS, ALL_FACTORS,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_factor_total(c: &mut Criterion) {
    let mut scores = FactorScores::uniform(FactorLevel::Basic);
    for (i, factor) in ALL_FACTORS.iter().enumerate() {
        let level = FactorLevel::try_from((i % 4 + 1) as u8).unwrap();
        scores.set(*factor, level);
    }

    c.bench_function("factor_scores_total", |b| {
        b.iter(|| black_box(&scores).total())
    });
}

fn bench_goal_outcome_grid(c: &mut Criterion) {
    c.bench_function("goal_outcome_grid", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for level in ALL_ATTAINMENT_LEVELS {
                for programmed in [0.0, 80.0, 100.0, 1250.5] {
                    acc += GoalOutcome::from_selection(level, black_box(programmed)).real;
                }
            }
            acc
        })
    });
}

fn bench_tier_lookup(c: &mut Criterion) {
    c.bench_function("attainment_tier_lookup", |b| {
        b.iter(|| {
            let mut sum = 0u32;
            for raw in 1u8..=4 {
                let level = AttainmentLevel::try_from(black_box(raw)).unwrap();
                sum += level.percent() as u32;
            }
            sum
        })
    });
}

criterion_group!(
    benches,
    bench_factor_total,
    bench_goal_outcome_grid,
    bench_tier_lookup
);
criterion_main!(benches);
