use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::DVec2;
use obstalign_match::{
    assignment::linear_sum_assignment, cost::build_cost_matrix, match_obstacles, MatchingParams,
    Obstacle,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn create_scene(rng: &mut StdRng, num: usize) -> Vec<Obstacle> {
    (0..num)
        .map(|i| {
            Obstacle::new(
                i.to_string(),
                rng.random_range(-300.0..300.0),
                rng.random_range(-300.0..300.0),
                0.0,
                rng.random_range(1.0..6.0),
                rng.random_range(0.5..2.5),
                rng.random_range(1.0..3.0),
            )
        })
        .collect()
}

fn bench_assignment(c: &mut Criterion) {
    let mut group = c.benchmark_group("linear_sum_assignment");
    let mut rng = StdRng::seed_from_u64(0);

    for num in [10, 50, 200].iter() {
        let src = create_scene(&mut rng, *num);
        let dst = create_scene(&mut rng, *num);
        let cost = build_cost_matrix(&src, &dst, DVec2::ZERO, 50.0, 100.0);

        group.bench_with_input(BenchmarkId::new("square", num), &cost, |b, cost| {
            b.iter(|| black_box(linear_sum_assignment(cost)))
        });
    }
}

fn bench_match_obstacles(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_obstacles");
    let mut rng = StdRng::seed_from_u64(1);

    for num in [10, 100].iter() {
        let src = create_scene(&mut rng, *num);
        let dst = src
            .iter()
            .map(|o| Obstacle::new(o.id.clone(), o.x + 5.0, o.y - 3.0, 0.0, o.length, o.width, o.height))
            .collect::<Vec<_>>();

        group.bench_with_input(
            BenchmarkId::new("translated", num),
            &(src, dst),
            |b, (src, dst)| b.iter(|| black_box(match_obstacles(src, dst, &MatchingParams::default()))),
        );
    }
}

criterion_group!(benches, bench_assignment, bench_match_obstacles);
criterion_main!(benches);
