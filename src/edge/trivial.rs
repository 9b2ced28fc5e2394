//! Trivial edge checkers: constant verdicts and endpoint-only checks.
//!
//! Used as stubs in tests and as default wiring where a planner slot must
//! be filled but discretized checking happens elsewhere.

use std::sync::Arc;

use crate::interpolate::{CSpaceInterpolator, Interpolator, ReverseInterpolator, SharedInterpolator};
use crate::space::{CSpace, Config, SharedSpace};

use super::{checked_param, EdgePlanner};

/// Always-visible stub: every edge is reported feasible without any work.
pub struct TrueEdgeChecker {
    space: SharedSpace,
    path: SharedInterpolator,
}

impl TrueEdgeChecker {
    /// Stub checker over the straight-line path from `a` to `b`.
    pub fn new(space: SharedSpace, a: Config, b: Config) -> Self {
        let path = Arc::new(CSpaceInterpolator::new(Arc::clone(&space), a, b));
        Self { space, path }
    }

    /// Stub checker over an existing path.
    pub fn from_path(space: SharedSpace, path: SharedInterpolator) -> Self {
        Self { space, path }
    }
}

impl EdgePlanner for TrueEdgeChecker {
    fn space(&self) -> &SharedSpace {
        &self.space
    }

    fn eval(&self, u: f32) -> Config {
        self.path.eval(checked_param(u, "TrueEdgeChecker"))
    }

    fn length(&self) -> f32 {
        self.path.length()
    }

    fn start(&self) -> &Config {
        self.path.start()
    }

    fn end(&self) -> &Config {
        self.path.end()
    }

    fn priority(&self) -> f32 {
        0.0
    }

    fn plan(&mut self) -> bool {
        false
    }

    fn done(&self) -> bool {
        true
    }

    fn failed(&self) -> bool {
        false
    }

    fn copy(&self) -> Box<dyn EdgePlanner> {
        Box::new(Self::from_path(
            Arc::clone(&self.space),
            Arc::clone(&self.path),
        ))
    }

    fn reverse_copy(&self) -> Box<dyn EdgePlanner> {
        Box::new(Self::from_path(
            Arc::clone(&self.space),
            Arc::new(ReverseInterpolator::new(Arc::clone(&self.path))),
        ))
    }
}

/// Always-infeasible stub: every edge is reported obstructed.
pub struct FalseEdgeChecker {
    space: SharedSpace,
    path: SharedInterpolator,
}

impl FalseEdgeChecker {
    /// Stub checker over the straight-line path from `a` to `b`.
    pub fn new(space: SharedSpace, a: Config, b: Config) -> Self {
        let path = Arc::new(CSpaceInterpolator::new(Arc::clone(&space), a, b));
        Self { space, path }
    }

    /// Stub checker over an existing path.
    pub fn from_path(space: SharedSpace, path: SharedInterpolator) -> Self {
        Self { space, path }
    }
}

impl EdgePlanner for FalseEdgeChecker {
    fn space(&self) -> &SharedSpace {
        &self.space
    }

    fn eval(&self, u: f32) -> Config {
        self.path.eval(checked_param(u, "FalseEdgeChecker"))
    }

    fn length(&self) -> f32 {
        self.path.length()
    }

    fn start(&self) -> &Config {
        self.path.start()
    }

    fn end(&self) -> &Config {
        self.path.end()
    }

    fn priority(&self) -> f32 {
        0.0
    }

    fn plan(&mut self) -> bool {
        false
    }

    fn done(&self) -> bool {
        true
    }

    fn failed(&self) -> bool {
        true
    }

    fn copy(&self) -> Box<dyn EdgePlanner> {
        Box::new(Self::from_path(
            Arc::clone(&self.space),
            Arc::clone(&self.path),
        ))
    }

    fn reverse_copy(&self) -> Box<dyn EdgePlanner> {
        Box::new(Self::from_path(
            Arc::clone(&self.space),
            Arc::new(ReverseInterpolator::new(Arc::clone(&self.path))),
        ))
    }
}

/// Checks only the feasibility of the path's terminal configuration.
///
/// The weakest meaningful check, used when discretized checking is handled
/// elsewhere (e.g. the start was verified by the previous edge in a chain).
pub struct EndpointEdgeChecker {
    space: SharedSpace,
    path: SharedInterpolator,
    /// Cached verdict once the endpoint has been tested.
    visible: Option<bool>,
}

impl EndpointEdgeChecker {
    /// Endpoint checker over the straight-line path from `a` to `b`.
    pub fn new(space: SharedSpace, a: Config, b: Config) -> Self {
        let path = Arc::new(CSpaceInterpolator::new(Arc::clone(&space), a, b));
        Self::from_path(space, path)
    }

    /// Endpoint checker over an existing path.
    pub fn from_path(space: SharedSpace, path: SharedInterpolator) -> Self {
        Self {
            space,
            path,
            visible: None,
        }
    }
}

impl EdgePlanner for EndpointEdgeChecker {
    fn space(&self) -> &SharedSpace {
        &self.space
    }

    fn eval(&self, u: f32) -> Config {
        self.path.eval(checked_param(u, "EndpointEdgeChecker"))
    }

    fn length(&self) -> f32 {
        self.path.length()
    }

    fn start(&self) -> &Config {
        self.path.start()
    }

    fn end(&self) -> &Config {
        self.path.end()
    }

    fn priority(&self) -> f32 {
        if self.done() {
            0.0
        } else {
            self.path.length()
        }
    }

    fn plan(&mut self) -> bool {
        if self.visible.is_none() {
            self.visible = Some(self.space.is_feasible(self.path.end()));
        }
        false
    }

    fn done(&self) -> bool {
        self.visible.is_some()
    }

    fn failed(&self) -> bool {
        self.visible == Some(false)
    }

    fn copy(&self) -> Box<dyn EdgePlanner> {
        Box::new(Self {
            space: Arc::clone(&self.space),
            path: Arc::clone(&self.path),
            visible: self.visible,
        })
    }

    fn reverse_copy(&self) -> Box<dyn EdgePlanner> {
        // The checked endpoint changes under reversal, so the cached
        // verdict does not transfer.
        Box::new(Self::from_path(
            Arc::clone(&self.space),
            Arc::new(ReverseInterpolator::new(Arc::clone(&self.path))),
        ))
    }
}
