//! # Setu-Plan: Anytime Edge Feasibility for Motion Planning
//!
//! The incremental feasibility-checking core of a sampling-based motion
//! planner: given two configurations in an abstract configuration space,
//! decide whether the straight (or supplied) path between them is
//! collision-free — and do it under an *anytime* discipline, so a planner
//! growing a roadmap or tree can interleave partial checks across many
//! candidate edges instead of blocking fully on each one.
//!
//! ## Features
//!
//! - **One contract, many strategies**: every checker implements the same
//!   [`EdgePlanner`] protocol (`plan`/`priority`/`done`/`failed`), so
//!   schedulers never care which strategy runs underneath
//! - **Uniform-resolution checking**: doubling bisection to a fixed
//!   tolerance with no sample evaluated twice
//! - **Clearance certificates**: segments proven safe from endpoint
//!   clearances alone, without interior sampling
//! - **Adaptive refinement**: longest-segment-first bisection driven by a
//!   priority queue, with bounded-effort degeneracy guards
//! - **Composition**: sequence per-segment planners, override path
//!   metadata, incrementalize blocking checks, extend derived-space
//!   lifetimes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use setu_plan::{BisectionEpsilonEdgePlanner, EdgePlanner};
//! use setu_plan::space::{Config, EuclideanSpace, Obstacle, SharedSpace};
//!
//! let space: SharedSpace = Arc::new(
//!     EuclideanSpace::unit_square().with_obstacle(Obstacle::sphere(&[0.5, 0.5], 0.1)),
//! );
//!
//! let mut edge = BisectionEpsilonEdgePlanner::new(
//!     Arc::clone(&space),
//!     Config::new(vec![0.1, 0.1]),
//!     Config::new(vec![0.9, 0.9]),
//!     0.01,
//! );
//!
//! // Incremental protocol: advance the most promising edge first.
//! while !edge.done() {
//!     edge.plan();
//! }
//! println!("visible: {}", !edge.failed());
//! ```
//!
//! ## Architecture
//!
//! - [`space`]: the configuration-space contract ([`space::CSpace`]), the
//!   [`space::Config`] value type, a bounded Euclidean sample space, and
//!   single-constraint subset views
//! - [`interpolate`]: path parameterization ([`interpolate::Interpolator`]),
//!   straight-line and reversed paths
//! - [`edge`]: the [`EdgePlanner`] contract and every checking strategy
//!
//! ## Checking protocol
//!
//! ```text
//!                      ┌─────────────────┐
//!                      │ candidate edge  │
//!                      │     (a, b)      │
//!                      └────────┬────────┘
//!                               │ build one EdgePlanner
//!                               ▼
//!        blocking ┌──────────────────────────┐ incremental
//!      ┌──────────┤   strategy of choice     ├───────────┐
//!      │          └──────────────────────────┘           │
//!      ▼                                                 ▼
//!  is_visible()                            loop: pick pending edge with
//!      │                                   largest priority(), call plan()
//!      │                                   until done()
//!      └──────────────► done() + failed() ◄──────────────┘
//!                  visible / obstructed / aborted
//! ```
//!
//! Checks are resolution-complete, not exact: a visible verdict means no
//! infeasible region wider than the tolerance was missed.

pub mod edge;
pub mod interpolate;
pub mod space;

#[cfg(test)]
mod test_util;

// Re-export the planning contract and every planner variant at crate root.
pub use edge::{
    constraint_edge_checker, edge_checker, BisectionConfig, BisectionConfigError,
    BisectionEpsilonEdgePlanner, EdgePlanner, EdgePlannerWithCSpaceContainer,
    EndpointEdgeChecker, EpsilonEdgeChecker, FalseEdgeChecker, IncrementalizedEdgePlanner,
    MultiEdgePlanner, ObstacleDistanceEdgeChecker, PathEdgeChecker, PiggybackEdgePlanner,
    TrueEdgeChecker,
};
pub use interpolate::{CSpaceInterpolator, Interpolator, ReverseInterpolator, SharedInterpolator};
pub use space::{CSpace, Config, SharedSpace, SubsetSpace};
