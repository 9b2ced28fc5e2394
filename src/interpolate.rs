//! Path interpolators.
//!
//! An interpolator is the geometric side of an edge: a curve through
//! configuration space parameterized over `[param_start, param_end]`
//! (usually `[0,1]`). Edge planners share interpolators immutably
//! (`Arc<dyn Interpolator>`), so a planner, its copies, and any decorators
//! all evaluate the same curve without duplicating it.

use std::sync::Arc;

use crate::space::{CSpace, Config, SharedSpace};

/// A parameterized path through configuration space.
pub trait Interpolator: Send + Sync {
    /// Evaluate the path at parameter `u`.
    fn eval(&self, u: f32) -> Config;

    /// First configuration of the path.
    fn start(&self) -> &Config;

    /// Last configuration of the path.
    fn end(&self) -> &Config;

    /// Lower end of the parameter range.
    fn param_start(&self) -> f32 {
        0.0
    }

    /// Upper end of the parameter range.
    fn param_end(&self) -> f32 {
        1.0
    }

    /// Path length under the owning space's metric.
    fn length(&self) -> f32;
}

/// Shared handle to an interpolator.
pub type SharedInterpolator = Arc<dyn Interpolator>;

/// Straight-line path between two configurations, interpolated by the
/// space's own [`interpolate`](crate::space::CSpace::interpolate).
pub struct CSpaceInterpolator {
    space: SharedSpace,
    a: Config,
    b: Config,
}

impl CSpaceInterpolator {
    /// Straight-line path from `a` to `b` in `space`.
    pub fn new(space: SharedSpace, a: Config, b: Config) -> Self {
        Self { space, a, b }
    }
}

impl Interpolator for CSpaceInterpolator {
    fn eval(&self, u: f32) -> Config {
        self.space.interpolate(&self.a, &self.b, u)
    }

    fn start(&self) -> &Config {
        &self.a
    }

    fn end(&self) -> &Config {
        &self.b
    }

    fn length(&self) -> f32 {
        self.space.distance(&self.a, &self.b)
    }
}

/// Direction-flipped view of another interpolator.
///
/// `eval(u)` maps to the inner path at `param_start + param_end - u`, so
/// start and end swap while the traced curve stays identical.
pub struct ReverseInterpolator {
    inner: SharedInterpolator,
}

impl ReverseInterpolator {
    /// Reverse the direction of `inner`.
    pub fn new(inner: SharedInterpolator) -> Self {
        Self { inner }
    }
}

impl Interpolator for ReverseInterpolator {
    fn eval(&self, u: f32) -> Config {
        let flipped = self.inner.param_start() + self.inner.param_end() - u;
        self.inner.eval(flipped)
    }

    fn start(&self) -> &Config {
        self.inner.end()
    }

    fn end(&self) -> &Config {
        self.inner.start()
    }

    fn param_start(&self) -> f32 {
        self.inner.param_start()
    }

    fn param_end(&self) -> f32 {
        self.inner.param_end()
    }

    fn length(&self) -> f32 {
        self.inner.length()
    }
}
