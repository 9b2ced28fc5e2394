//! Anytime edge-feasibility checking.
//!
//! An *edge* is a candidate continuous path between two configurations. An
//! [`EdgePlanner`] decides whether that path is collision-free, and does so
//! under an anytime discipline: the check advances in bounded units of work
//! ([`plan`](EdgePlanner::plan)) so that a planning algorithm with many
//! pending edges can interleave partial checks instead of blocking fully on
//! one. [`priority`](EdgePlanner::priority) estimates the remaining work on
//! an edge, letting an external scheduler pick which pending edge to
//! advance next.
//!
//! # State machine
//!
//! Every variant follows the same lifecycle:
//!
//! ```text
//!   Unstarted ──plan()──► Checking ──► Done(visible)
//!                            │
//!                            └───────► Done(failed)
//! ```
//!
//! [`is_visible`](EdgePlanner::is_visible) is sugar for draining the
//! incremental protocol in one blocking call and returning `!failed()`.
//! After `done()` reports true, `plan()` keeps returning `false` without
//! changing state, and `failed()` distinguishes an obstructed (or aborted)
//! edge from a verified one.
//!
//! # Variants
//!
//! - [`EpsilonEdgeChecker`]: uniform-resolution doubling bisection down to a
//!   fixed tolerance.
//! - [`ObstacleDistanceEdgeChecker`]: clearance-certificate recursion over a
//!   space with an obstacle-distance oracle.
//! - [`BisectionEpsilonEdgePlanner`]: adaptive longest-segment-first
//!   refinement driven by a priority queue; the most capable variant.
//! - [`PathEdgeChecker`] / [`MultiEdgePlanner`]: sequential composition of
//!   per-segment planners.
//! - [`PiggybackEdgePlanner`], [`IncrementalizedEdgePlanner`],
//!   [`EdgePlannerWithCSpaceContainer`]: decorators that override path
//!   metadata, adapt blocking checks to the incremental contract, and tie a
//!   derived space's lifetime to its planners.
//! - [`TrueEdgeChecker`], [`FalseEdgeChecker`], [`EndpointEdgeChecker`]:
//!   trivial checkers for default wiring and tests.

mod bisection;
mod epsilon;
mod obstacle_distance;
mod path;
mod piggyback;
mod trivial;

pub use bisection::{BisectionConfig, BisectionConfigError, BisectionEpsilonEdgePlanner};
pub use epsilon::EpsilonEdgeChecker;
pub use obstacle_distance::ObstacleDistanceEdgeChecker;
pub use path::{MultiEdgePlanner, PathEdgeChecker};
pub use piggyback::{
    EdgePlannerWithCSpaceContainer, IncrementalizedEdgePlanner, PiggybackEdgePlanner,
};
pub use trivial::{EndpointEdgeChecker, FalseEdgeChecker, TrueEdgeChecker};

use std::sync::Arc;

use log::warn;

use crate::space::{CSpace, Config, SharedSpace, SubsetSpace};

/// One directed edge-feasibility check.
///
/// A planner is created per candidate edge, advanced only by its own
/// `plan()`/`is_visible()` calls, and dropped when the owning planning
/// process accepts or rejects the edge. Repeated `plan()` calls on one
/// instance must be sequential; distinct instances over the same space may
/// be advanced concurrently because space queries are read-only.
pub trait EdgePlanner: Send {
    /// The configuration space this edge is checked in.
    fn space(&self) -> &SharedSpace;

    /// Evaluate the underlying path at `u` in `[0,1]`.
    ///
    /// Out-of-range or NaN parameters are a caller contract violation:
    /// they are logged and clamped, never silently corrupting the result.
    fn eval(&self, u: f32) -> Config;

    /// Accumulated path length under the space's metric.
    fn length(&self) -> f32;

    /// First endpoint; constant for the planner's lifetime.
    fn start(&self) -> &Config;

    /// Second endpoint; constant for the planner's lifetime.
    fn end(&self) -> &Config;

    /// Estimate of the remaining work on this edge (larger = check sooner).
    ///
    /// Non-negative, and exactly 0 once [`done`](Self::done) holds.
    fn priority(&self) -> f32;

    /// Advance the check by one bounded unit of work.
    ///
    /// Returns `true` while further work remains profitable, `false` once
    /// the check converged or found a violation. Safe to call repeatedly
    /// in the terminal state.
    fn plan(&mut self) -> bool;

    /// Whether the check has reached a terminal state.
    fn done(&self) -> bool;

    /// Whether the terminal state is an obstruction or an abort.
    ///
    /// `failed()` implies `done()`.
    fn failed(&self) -> bool;

    /// Blocking check: drain the incremental protocol to completion.
    ///
    /// Idempotent; equivalent to calling [`plan`](Self::plan) until
    /// [`done`](Self::done) and returning `!failed()`.
    fn is_visible(&mut self) -> bool {
        while !self.done() {
            self.plan();
        }
        !self.failed()
    }

    /// Independent planner with the same accumulated progress.
    fn copy(&self) -> Box<dyn EdgePlanner>;

    /// Planner for the same path traversed in the opposite direction.
    ///
    /// Direction-dependent refinement state does not transfer; such
    /// components restart fresh.
    fn reverse_copy(&self) -> Box<dyn EdgePlanner>;
}

/// Validate an evaluation parameter, reporting misuse and clamping.
///
/// NaN maps to 0 (the path start) after a warning.
pub(crate) fn checked_param(u: f32, component: &str) -> f32 {
    if u.is_nan() {
        warn!("[{}] eval called with NaN parameter, using path start", component);
        return 0.0;
    }
    if !(0.0..=1.0).contains(&u) {
        warn!("[{}] eval parameter {} outside [0,1], clamping", component, u);
        return u.clamp(0.0, 1.0);
    }
    u
}

/// Default checker for an edge in `space`: a uniform-resolution check at
/// the space's recommended visibility epsilon.
pub fn edge_checker(space: SharedSpace, a: &Config, b: &Config) -> EpsilonEdgeChecker {
    let epsilon = space.visibility_epsilon();
    EpsilonEdgeChecker::new(space, a.clone(), b.clone(), epsilon)
}

/// Checker for an edge against a single constraint of `space`.
///
/// Builds a [`SubsetSpace`] view for the constraint and wraps the checker
/// in an [`EdgePlannerWithCSpaceContainer`] so the view stays alive exactly
/// as long as the planners referencing it.
pub fn constraint_edge_checker(
    space: SharedSpace,
    a: &Config,
    b: &Config,
    constraint: usize,
) -> EdgePlannerWithCSpaceContainer {
    let epsilon = space.visibility_epsilon();
    let subset: SharedSpace = Arc::new(SubsetSpace::new(space, constraint));
    let checker = EpsilonEdgeChecker::new(Arc::clone(&subset), a.clone(), b.clone(), epsilon);
    EdgePlannerWithCSpaceContainer::new(subset, Box::new(checker))
}
