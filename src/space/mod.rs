//! Configuration-space abstractions.
//!
//! A configuration space supplies the three queries every edge checker is
//! built on — a feasibility predicate, a distance metric, and straight-line
//! interpolation — plus an optional obstacle-clearance oracle used by the
//! certificate-based checker.
//!
//! Spaces are shared read-only between all the edge planners built against
//! them, so the crate passes them around as [`SharedSpace`]
//! (`Arc<dyn CSpace>`). A planner never owns its space exclusively; the
//! space is released when the last planner referencing it is dropped.

pub mod euclidean;

pub use euclidean::{EuclideanSpace, Obstacle, SpaceError};

use serde::{Deserialize, Serialize};
use std::ops::Index;
use std::sync::Arc;

/// A configuration: a point in the configuration space.
///
/// Stored as a fixed-dimension `f32` vector. Configurations are opaque
/// values — they are only ever compared through a space's
/// [`distance`](CSpace::distance) and produced by
/// [`interpolate`](CSpace::interpolate).
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Config(Vec<f32>);

impl Config {
    /// Create a configuration from raw coordinates.
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    /// Zero configuration of the given dimension.
    pub fn zeros(dim: usize) -> Self {
        Self(vec![0.0; dim])
    }

    /// Number of dimensions.
    #[inline]
    pub fn dim(&self) -> usize {
        self.0.len()
    }

    /// True for the zero-dimension configuration.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw coordinate slice.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Euclidean distance to another configuration.
    #[inline]
    pub fn euclidean_distance(&self, other: &Config) -> f32 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f32>()
            .sqrt()
    }

    /// Component-wise linear interpolation, `u=0` giving `self`.
    pub fn lerp(&self, other: &Config, u: f32) -> Config {
        Config(
            self.0
                .iter()
                .zip(other.0.iter())
                .map(|(a, b)| a + (b - a) * u)
                .collect(),
        )
    }
}

impl From<Vec<f32>> for Config {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

impl From<&[f32]> for Config {
    fn from(values: &[f32]) -> Self {
        Self(values.to_vec())
    }
}

impl Index<usize> for Config {
    type Output = f32;

    #[inline]
    fn index(&self, i: usize) -> &f32 {
        &self.0[i]
    }
}

/// Configuration-space interface consumed by the edge planners.
///
/// Queries must be read-only and reentrant: distinct planners over the same
/// space may be advanced from different threads, and the planners rely on
/// the feasibility predicate being deterministic for copy/reverse
/// determinism.
pub trait CSpace: Send + Sync {
    /// Feasibility (collision-freeness) of a single configuration.
    fn is_feasible(&self, q: &Config) -> bool;

    /// Distance under the space's metric. Must be non-negative.
    fn distance(&self, a: &Config, b: &Config) -> f32;

    /// Interpolate between two configurations, `u` in `[0,1]`.
    fn interpolate(&self, a: &Config, b: &Config, u: f32) -> Config;

    /// Midpoint shorthand for `interpolate(a, b, 0.5)`.
    fn midpoint(&self, a: &Config, b: &Config) -> Config {
        self.interpolate(a, b, 0.5)
    }

    /// Lower bound on the distance from `q` to the nearest infeasible
    /// region, if the space implements a clearance oracle.
    ///
    /// Required only by the clearance-certificate checker; spaces without a
    /// sound bound must return `None` rather than guess.
    fn obstacle_distance(&self, _q: &Config) -> Option<f32> {
        None
    }

    /// Recommended resolution for edge checks in this space.
    fn visibility_epsilon(&self) -> f32 {
        0.01
    }

    /// Number of independent feasibility constraints this space is composed
    /// of. Spaces without per-constraint structure report 1.
    fn num_constraints(&self) -> usize {
        1
    }

    /// Feasibility with respect to a single constraint.
    ///
    /// The default treats the space as one monolithic constraint.
    fn is_feasible_constraint(&self, q: &Config, _index: usize) -> bool {
        self.is_feasible(q)
    }
}

/// Shared handle to a configuration space.
pub type SharedSpace = Arc<dyn CSpace>;

/// View of a parent space restricted to a single feasibility constraint.
///
/// Metric and interpolation are the parent's; only the feasibility
/// predicate narrows. Used to check an edge against one obstacle at a time,
/// with [`EdgePlannerWithCSpaceContainer`](crate::edge::EdgePlannerWithCSpaceContainer)
/// keeping the view alive alongside the planners built against it.
pub struct SubsetSpace {
    parent: SharedSpace,
    constraint: usize,
}

impl SubsetSpace {
    /// Restrict `parent` to the constraint at `constraint`.
    ///
    /// An out-of-range index is a construction misuse: it is logged here,
    /// and the view then reports every configuration feasible.
    pub fn new(parent: SharedSpace, constraint: usize) -> Self {
        if constraint >= parent.num_constraints() {
            log::warn!(
                "[SubsetSpace] constraint index {} out of range (space has {})",
                constraint,
                parent.num_constraints()
            );
        }
        Self { parent, constraint }
    }

    /// The constraint index this view checks.
    pub fn constraint(&self) -> usize {
        self.constraint
    }
}

impl CSpace for SubsetSpace {
    fn is_feasible(&self, q: &Config) -> bool {
        if self.constraint >= self.parent.num_constraints() {
            return true;
        }
        self.parent.is_feasible_constraint(q, self.constraint)
    }

    fn distance(&self, a: &Config, b: &Config) -> f32 {
        self.parent.distance(a, b)
    }

    fn interpolate(&self, a: &Config, b: &Config, u: f32) -> Config {
        self.parent.interpolate(a, b, u)
    }

    fn obstacle_distance(&self, q: &Config) -> Option<f32> {
        // The parent's bound covers every constraint, so it is a valid
        // (conservative) lower bound for the single-constraint view.
        self.parent.obstacle_distance(q)
    }

    fn visibility_epsilon(&self) -> f32 {
        self.parent.visibility_epsilon()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_basics() {
        let q = Config::new(vec![1.0, 2.0]);
        assert_eq!(q.dim(), 2);
        assert_eq!(q[1], 2.0);
        assert_eq!(q.as_slice(), &[1.0, 2.0]);
        assert!(!q.is_empty());
        assert!(Config::default().is_empty());
    }

    #[test]
    fn test_config_distance_and_lerp() {
        let a = Config::new(vec![0.0, 0.0]);
        let b = Config::new(vec![3.0, 4.0]);
        assert!((a.euclidean_distance(&b) - 5.0).abs() < 1e-6);

        let mid = a.lerp(&b, 0.5);
        assert_eq!(mid, Config::new(vec![1.5, 2.0]));
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
    }

    #[test]
    fn test_subset_space_narrows_feasibility() {
        let space = EuclideanSpace::unit_square()
            .with_obstacle(Obstacle::sphere(&[0.25, 0.5], 0.1))
            .with_obstacle(Obstacle::sphere(&[0.75, 0.5], 0.1));
        let shared: SharedSpace = Arc::new(space);

        let in_first = Config::new(vec![0.25, 0.5]);
        assert!(!shared.is_feasible(&in_first));

        // The view over the second obstacle does not see the first.
        let second = SubsetSpace::new(Arc::clone(&shared), 1);
        assert!(second.is_feasible(&in_first));
        assert!(!second.is_feasible(&Config::new(vec![0.75, 0.5])));
    }
}
