//! Benchmark the edge-checking strategies against each other.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

use setu_plan::space::{Config, EuclideanSpace, Obstacle, SharedSpace};
use setu_plan::{
    BisectionEpsilonEdgePlanner, EdgePlanner, EpsilonEdgeChecker, ObstacleDistanceEdgeChecker,
};

/// Corridor-like space: a long free lane between two walls of spheres.
fn corridor() -> SharedSpace {
    let mut space = EuclideanSpace::new(vec![0.0, 0.0], vec![10.0, 2.0]).expect("valid domain");
    for i in 0..10 {
        let x = i as f32 + 0.5;
        space = space
            .with_obstacle(Obstacle::sphere(&[x, 0.2], 0.15))
            .with_obstacle(Obstacle::sphere(&[x, 1.8], 0.15));
    }
    Arc::new(space)
}

fn lane_segment() -> (Config, Config) {
    (Config::new(vec![0.5, 1.0]), Config::new(vec![9.5, 1.0]))
}

fn bench_free_edge(c: &mut Criterion) {
    let space = corridor();
    let (a, b) = lane_segment();
    let mut group = c.benchmark_group("free_edge");

    for epsilon in [0.05f32, 0.01, 0.005].iter() {
        group.bench_with_input(
            BenchmarkId::new("epsilon", epsilon),
            epsilon,
            |bench, &eps| {
                bench.iter(|| {
                    let mut checker = EpsilonEdgeChecker::new(
                        Arc::clone(&space),
                        a.clone(),
                        b.clone(),
                        eps,
                    );
                    black_box(checker.is_visible())
                })
            },
        );
        group.bench_with_input(
            BenchmarkId::new("bisection", epsilon),
            epsilon,
            |bench, &eps| {
                bench.iter(|| {
                    let mut planner = BisectionEpsilonEdgePlanner::new(
                        Arc::clone(&space),
                        a.clone(),
                        b.clone(),
                        eps,
                    );
                    black_box(planner.is_visible())
                })
            },
        );
    }

    group.bench_function("obstacle_distance", |bench| {
        bench.iter(|| {
            let mut checker =
                ObstacleDistanceEdgeChecker::new(Arc::clone(&space), a.clone(), b.clone());
            black_box(checker.is_visible())
        })
    });

    group.finish();
}

fn bench_obstructed_edge(c: &mut Criterion) {
    let space: SharedSpace = Arc::new(
        EuclideanSpace::unit_square().with_obstacle(Obstacle::aabb(&[0.4, 0.4], &[0.6, 0.6])),
    );
    let a = Config::new(vec![0.0, 0.5]);
    let b = Config::new(vec![1.0, 0.5]);
    let mut group = c.benchmark_group("obstructed_edge");

    group.bench_function("epsilon", |bench| {
        bench.iter(|| {
            let mut checker =
                EpsilonEdgeChecker::new(Arc::clone(&space), a.clone(), b.clone(), 0.005);
            black_box(checker.is_visible())
        })
    });
    group.bench_function("bisection", |bench| {
        bench.iter(|| {
            let mut planner =
                BisectionEpsilonEdgePlanner::new(Arc::clone(&space), a.clone(), b.clone(), 0.005);
            black_box(planner.is_visible())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_free_edge, bench_obstructed_edge);
criterion_main!(benches);
