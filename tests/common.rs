//! Test utilities for the edge-planning suites.
//!
//! Provides shared spaces, segments, and drivers for exercising every
//! planner variant the same way.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use setu_plan::space::{CSpace, Config, EuclideanSpace, Obstacle, SharedSpace};
use setu_plan::EdgePlanner;

/// Unit square with no obstacles.
pub fn free_square() -> SharedSpace {
    Arc::new(EuclideanSpace::unit_square())
}

/// Unit square with a box blocking `x in [0.4, 0.6]` at mid height.
pub fn blocked_square() -> SharedSpace {
    Arc::new(
        EuclideanSpace::unit_square().with_obstacle(Obstacle::aabb(&[0.4, 0.4], &[0.6, 0.6])),
    )
}

/// Unit square with several scattered sphere obstacles.
pub fn cluttered_square() -> SharedSpace {
    Arc::new(
        EuclideanSpace::unit_square()
            .with_obstacle(Obstacle::sphere(&[0.3, 0.3], 0.08))
            .with_obstacle(Obstacle::sphere(&[0.7, 0.4], 0.1))
            .with_obstacle(Obstacle::sphere(&[0.45, 0.75], 0.09)),
    )
}

/// Horizontal unit-length segment across the middle of the square.
pub fn horizontal_segment() -> (Config, Config) {
    (Config::new(vec![0.0, 0.5]), Config::new(vec![1.0, 0.5]))
}

/// Segment that stays clear of every obstacle in [`cluttered_square`].
pub fn clear_segment() -> (Config, Config) {
    (Config::new(vec![0.05, 0.05]), Config::new(vec![0.95, 0.05]))
}

/// Drive a planner to completion, panicking if it exceeds `budget` steps.
///
/// Returns the visibility verdict.
pub fn drive(planner: &mut dyn EdgePlanner, budget: usize) -> bool {
    let mut steps = 0;
    while !planner.done() {
        planner.plan();
        steps += 1;
        assert!(steps <= budget, "planner did not finish within {} steps", budget);
    }
    !planner.failed()
}

/// Space wrapper counting feasibility queries.
pub struct CountingSpace {
    inner: SharedSpace,
    feasibility_calls: AtomicUsize,
}

impl CountingSpace {
    pub fn new(inner: SharedSpace) -> Self {
        Self {
            inner,
            feasibility_calls: AtomicUsize::new(0),
        }
    }

    pub fn feasibility_calls(&self) -> usize {
        self.feasibility_calls.load(Ordering::Relaxed)
    }
}

impl CSpace for CountingSpace {
    fn is_feasible(&self, q: &Config) -> bool {
        self.feasibility_calls.fetch_add(1, Ordering::Relaxed);
        self.inner.is_feasible(q)
    }

    fn distance(&self, a: &Config, b: &Config) -> f32 {
        self.inner.distance(a, b)
    }

    fn interpolate(&self, a: &Config, b: &Config, u: f32) -> Config {
        self.inner.interpolate(a, b, u)
    }

    fn obstacle_distance(&self, q: &Config) -> Option<f32> {
        self.inner.obstacle_distance(q)
    }

    fn visibility_epsilon(&self) -> f32 {
        self.inner.visibility_epsilon()
    }
}
