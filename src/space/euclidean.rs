//! Bounded Euclidean configuration space with analytic obstacles.
//!
//! The reference space used by tests, benches, and examples: an
//! axis-aligned box domain in `R^n` with solid sphere and box obstacles.
//! Feasibility, metric, interpolation, and the obstacle-distance lower
//! bound all have exact closed forms, so checker behavior is easy to reason
//! about in tests.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{CSpace, Config};

/// Errors constructing a [`EuclideanSpace`].
#[derive(Debug, Error)]
pub enum SpaceError {
    /// Domain bound vectors differ in dimension.
    #[error("domain bounds have mismatched dimensions: {lower} vs {upper}")]
    DimensionMismatch { lower: usize, upper: usize },

    /// Domain is empty along some axis.
    #[error("domain is empty along axis {axis}: lower {lower} > upper {upper}")]
    EmptyDomain { axis: usize, lower: f32, upper: f32 },

    /// Zero-dimensional domain.
    #[error("domain must have at least one dimension")]
    ZeroDimensional,
}

/// An analytic obstacle: containment and boundary distance in closed form.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Obstacle {
    /// Solid sphere.
    Sphere { center: Vec<f32>, radius: f32 },
    /// Solid axis-aligned box.
    Box { min: Vec<f32>, max: Vec<f32> },
}

impl Obstacle {
    /// Solid sphere obstacle.
    pub fn sphere(center: &[f32], radius: f32) -> Self {
        Self::Sphere {
            center: center.to_vec(),
            radius,
        }
    }

    /// Solid axis-aligned box obstacle.
    pub fn aabb(min: &[f32], max: &[f32]) -> Self {
        Self::Box {
            min: min.to_vec(),
            max: max.to_vec(),
        }
    }

    /// Whether the configuration lies on or inside the obstacle.
    pub fn contains(&self, q: &Config) -> bool {
        match self {
            Self::Sphere { center, radius } => {
                let d2: f32 = center
                    .iter()
                    .zip(q.as_slice())
                    .map(|(c, x)| (x - c) * (x - c))
                    .sum();
                d2 <= radius * radius
            }
            Self::Box { min, max } => min
                .iter()
                .zip(max.iter())
                .zip(q.as_slice())
                .all(|((lo, hi), x)| *x >= *lo && *x <= *hi),
        }
    }

    /// Signed distance from `q` to the obstacle surface.
    ///
    /// Positive outside, zero on the boundary, negative inside.
    pub fn distance(&self, q: &Config) -> f32 {
        match self {
            Self::Sphere { center, radius } => {
                let d2: f32 = center
                    .iter()
                    .zip(q.as_slice())
                    .map(|(c, x)| (x - c) * (x - c))
                    .sum();
                d2.sqrt() - radius
            }
            Self::Box { min, max } => {
                // Distance to an AABB: project onto the box, measure the
                // residual; inside, the (negative) distance is the smallest
                // margin to any face.
                let mut outside2 = 0.0f32;
                let mut inside_margin = f32::INFINITY;
                for ((lo, hi), x) in min.iter().zip(max.iter()).zip(q.as_slice()) {
                    if *x < *lo {
                        outside2 += (lo - x) * (lo - x);
                    } else if *x > *hi {
                        outside2 += (x - hi) * (x - hi);
                    } else {
                        inside_margin = inside_margin.min((x - lo).min(hi - x));
                    }
                }
                if outside2 > 0.0 {
                    outside2.sqrt()
                } else {
                    -inside_margin
                }
            }
        }
    }
}

/// Bounded Euclidean space with analytic obstacles.
///
/// Each obstacle is an independent feasibility constraint, so edges can
/// also be checked against a single obstacle through
/// [`SubsetSpace`](super::SubsetSpace).
pub struct EuclideanSpace {
    lower: Vec<f32>,
    upper: Vec<f32>,
    obstacles: Vec<Obstacle>,
    visibility_epsilon: f32,
}

impl EuclideanSpace {
    /// Create a space with the given axis-aligned domain bounds.
    pub fn new(lower: Vec<f32>, upper: Vec<f32>) -> Result<Self, SpaceError> {
        if lower.len() != upper.len() {
            return Err(SpaceError::DimensionMismatch {
                lower: lower.len(),
                upper: upper.len(),
            });
        }
        if lower.is_empty() {
            return Err(SpaceError::ZeroDimensional);
        }
        for (axis, (lo, hi)) in lower.iter().zip(upper.iter()).enumerate() {
            if lo > hi {
                return Err(SpaceError::EmptyDomain {
                    axis,
                    lower: *lo,
                    upper: *hi,
                });
            }
        }
        Ok(Self {
            lower,
            upper,
            obstacles: Vec::new(),
            visibility_epsilon: 0.01,
        })
    }

    /// The unit square `[0,1]^2`, the domain used throughout the tests.
    pub fn unit_square() -> Self {
        Self {
            lower: vec![0.0, 0.0],
            upper: vec![1.0, 1.0],
            obstacles: Vec::new(),
            visibility_epsilon: 0.01,
        }
    }

    /// Builder-style: add an obstacle.
    pub fn with_obstacle(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    /// Builder-style: set the recommended edge-check resolution.
    pub fn with_visibility_epsilon(mut self, epsilon: f32) -> Self {
        self.visibility_epsilon = epsilon;
        self
    }

    /// Domain dimension.
    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    /// The obstacles in this space.
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    fn in_domain(&self, q: &Config) -> bool {
        q.dim() == self.dim()
            && self
                .lower
                .iter()
                .zip(self.upper.iter())
                .zip(q.as_slice())
                .all(|((lo, hi), x)| *x >= *lo && *x <= *hi)
    }

    /// Smallest margin from `q` to any domain face.
    fn domain_margin(&self, q: &Config) -> f32 {
        self.lower
            .iter()
            .zip(self.upper.iter())
            .zip(q.as_slice())
            .map(|((lo, hi), x)| (x - lo).min(hi - x))
            .fold(f32::INFINITY, f32::min)
    }
}

impl CSpace for EuclideanSpace {
    fn is_feasible(&self, q: &Config) -> bool {
        self.in_domain(q) && !self.obstacles.iter().any(|o| o.contains(q))
    }

    fn distance(&self, a: &Config, b: &Config) -> f32 {
        a.euclidean_distance(b)
    }

    fn interpolate(&self, a: &Config, b: &Config, u: f32) -> Config {
        a.lerp(b, u)
    }

    fn obstacle_distance(&self, q: &Config) -> Option<f32> {
        let clearance = self
            .obstacles
            .iter()
            .map(|o| o.distance(q))
            .fold(self.domain_margin(q), f32::min);
        Some(clearance)
    }

    fn visibility_epsilon(&self) -> f32 {
        self.visibility_epsilon
    }

    fn num_constraints(&self) -> usize {
        self.obstacles.len().max(1)
    }

    fn is_feasible_constraint(&self, q: &Config, index: usize) -> bool {
        if !self.in_domain(q) {
            return false;
        }
        match self.obstacles.get(index) {
            Some(obstacle) => !obstacle.contains(q),
            None => true,
        }
    }
}
