//! Shared helpers for the in-crate unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::space::{CSpace, Config, SharedSpace};

/// Space wrapper that counts feasibility queries, for asserting how much
/// sampling a checker actually performed.
pub(crate) struct CountingSpace {
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
