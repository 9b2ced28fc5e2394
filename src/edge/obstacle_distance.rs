//! Clearance-certificate edge checking.

use std::sync::Arc;

use log::warn;

use crate::interpolate::{CSpaceInterpolator, Interpolator, ReverseInterpolator, SharedInterpolator};
use crate::space::{CSpace, Config, SharedSpace};

use super::{checked_param, EdgePlanner};

/// Clearances closer to zero than this are treated as a broken oracle
/// rather than a usable bound.
const CLEARANCE_EPSILON: f32 = 1e-5;

/// Edge checker that exploits an obstacle-distance lower bound.
///
/// If both segment endpoints have clearance at least the segment length,
/// the clearance ball around the nearer-to-obstacle endpoint covers the
/// whole segment and it is certified feasible without sampling a single
/// interior point. Otherwise the segment is bisected and both halves are
/// checked recursively with their own clearances.
///
/// Soundness (no missed collision) rests entirely on the space's
/// [`obstacle_distance`](crate::space::CSpace::obstacle_distance) being a
/// true lower bound; a space without one makes this checker report the
/// edge infeasible and log the misuse.
pub struct ObstacleDistanceEdgeChecker {
    space: SharedSpace,
    path: SharedInterpolator,
    /// Cached verdict once the recursion has run.
    visible: Option<bool>,
}

impl ObstacleDistanceEdgeChecker {
    /// Checker for the straight-line path from `a` to `b`.
    pub fn new(space: SharedSpace, a: Config, b: Config) -> Self {
        let path = Arc::new(CSpaceInterpolator::new(Arc::clone(&space), a, b));
        Self::from_path(space, path)
    }

    /// Checker over an existing path.
    pub fn from_path(space: SharedSpace, path: SharedInterpolator) -> Self {
        Self {
            space,
            path,
            visible: None,
        }
    }

    fn check(&self) -> bool {
        let a = self.path.start();
        let b = self.path.end();
        let (Some(da), Some(db)) = (
            self.space.obstacle_distance(a),
            self.space.obstacle_distance(b),
        ) else {
            warn!(
                "[ObstacleDistanceEdgeChecker] space does not implement an obstacle-distance \
                 oracle, reporting edge infeasible"
            );
            return false;
        };
        self.check_visibility(
            self.path.param_start(),
            self.path.param_end(),
            a,
            b,
            da,
            db,
        )
    }

    /// Recursive certificate check over the sub-path `[ua, ub]`.
    fn check_visibility(&self, ua: f32, ub: f32, a: &Config, b: &Config, da: f32, db: f32) -> bool {
        let dmin = da.min(db);
        if dmin <= 0.0 {
            warn!(
                "[ObstacleDistanceEdgeChecker] clearance {} is non-positive; the space does not \
                 properly implement obstacle distance",
                dmin
            );
            return false;
        }
        if dmin < CLEARANCE_EPSILON {
            warn!(
                "[ObstacleDistanceEdgeChecker] clearance {} is within numerical epsilon of zero",
                dmin
            );
            return false;
        }
        let r = self.space.distance(a, b);
        if r < 0.0 {
            warn!("[ObstacleDistanceEdgeChecker] negative segment distance {}", r);
            return false;
        }
        if dmin > r {
            // Certificate: the clearance ball covers the whole segment.
            return true;
        }
        let um = 0.5 * (ua + ub);
        let m = self.path.eval(um);
        if !self.space.is_feasible(&m) {
            return false;
        }
        let ram = self.space.distance(a, &m);
        let rbm = self.space.distance(&m, b);
        if !(ram > r * 0.1 && ram < r * 0.9) || !(rbm > r * 0.1 && rbm < r * 0.9) {
            warn!(
                "[ObstacleDistanceEdgeChecker] midpoint splits segment of length {} into {} and \
                 {}; metric and interpolation are inconsistent",
                r, ram, rbm
            );
            return false;
        }
        let Some(dm) = self.space.obstacle_distance(&m) else {
            warn!("[ObstacleDistanceEdgeChecker] obstacle-distance oracle vanished mid-check");
            return false;
        };
        self.check_visibility(ua, um, a, &m, da, dm) && self.check_visibility(um, ub, &m, b, dm, db)
    }
}

impl EdgePlanner for ObstacleDistanceEdgeChecker {
    fn space(&self) -> &SharedSpace {
        &self.space
    }

    fn eval(&self, u: f32) -> Config {
        self.path.eval(checked_param(u, "ObstacleDistanceEdgeChecker"))
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
            self.visible = Some(self.check());
        }
        false
    }

    fn done(&self) -> bool {
        self.visible.is_some()
    }

    fn failed(&self) -> bool {
        self.visible == Some(false)
    }

    fn is_visible(&mut self) -> bool {
        self.plan();
        self.visible == Some(true)
    }

    fn copy(&self) -> Box<dyn EdgePlanner> {
        Box::new(Self {
            space: Arc::clone(&self.space),
            path: Arc::clone(&self.path),
            visible: self.visible,
        })
    }

    fn reverse_copy(&self) -> Box<dyn EdgePlanner> {
        // The recursion is re-run for the reversed direction.
        Box::new(Self::from_path(
            Arc::clone(&self.space),
            Arc::new(ReverseInterpolator::new(Arc::clone(&self.path))),
        ))
    }
}
