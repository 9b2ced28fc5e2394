//! Adaptive edge checking by longest-segment-first bisection.

use std::collections::BinaryHeap;
use std::sync::Arc;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::space::{CSpace, Config, SharedSpace};

use super::{checked_param, EdgePlanner};

/// Errors validating a [`BisectionConfig`].
#[derive(Debug, Error)]
pub enum BisectionConfigError {
    /// The refinement-effort ratio must be positive.
    #[error("degeneracy ratio must be positive, got {0}")]
    NonPositiveRatio(f32),

    /// The guard must run at least occasionally.
    #[error("degeneracy check interval must be nonzero")]
    ZeroInterval,
}

/// Tuning for the adaptive planner's bounded-refinement guard.
///
/// A well-behaved metric needs about `length / epsilon` refinement steps to
/// converge. When the pending-segment queue grows past `degeneracy_ratio`
/// times that estimate, the metric or interpolation is behaving
/// non-uniformly and refinement is aborted instead of running forever.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BisectionConfig {
    /// Multiple of the naive iteration estimate tolerated before aborting.
    /// Default: 4.0
    pub degeneracy_ratio: f32,

    /// Number of refinement steps between guard evaluations.
    /// Default: 100
    pub degeneracy_check_interval: usize,
}

impl Default for BisectionConfig {
    fn default() -> Self {
        Self {
            degeneracy_ratio: 4.0,
            degeneracy_check_interval: 100,
        }
    }
}

impl BisectionConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for the refinement-effort ratio.
    pub fn with_degeneracy_ratio(mut self, ratio: f32) -> Self {
        self.degeneracy_ratio = ratio;
        self
    }

    /// Builder-style setter for the guard interval.
    pub fn with_check_interval(mut self, interval: usize) -> Self {
        self.degeneracy_check_interval = interval;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), BisectionConfigError> {
        if self.degeneracy_ratio <= 0.0 {
            return Err(BisectionConfigError::NonPositiveRatio(self.degeneracy_ratio));
        }
        if self.degeneracy_check_interval == 0 {
            return Err(BisectionConfigError::ZeroInterval);
        }
        Ok(())
    }
}

/// Waypoint node in the insert-only arena.
struct Node {
    config: Config,
    next: Option<usize>,
}

/// Ordered waypoint sequence backed by an index-stable arena.
///
/// Waypoints are only ever inserted, never removed, so an arena index
/// remains a valid handle for the planner's whole lifetime even though the
/// backing `Vec` reallocates.
struct WaypointChain {
    nodes: Vec<Node>,
    head: usize,
    tail: usize,
}

impl WaypointChain {
    fn new(a: Config, b: Config) -> Self {
        Self {
            nodes: vec![
                Node {
                    config: a,
                    next: Some(1),
                },
                Node {
                    config: b,
                    next: None,
                },
            ],
            head: 0,
            tail: 1,
        }
    }

    /// Rebuild a chain from an already-ordered sequence of at least two
    /// configurations; arena indices equal sequence positions.
    fn from_ordered(configs: Vec<Config>) -> Self {
        let count = configs.len();
        let nodes = configs
            .into_iter()
            .enumerate()
            .map(|(i, config)| Node {
                config,
                next: if i + 1 < count { Some(i + 1) } else { None },
            })
            .collect();
        Self {
            nodes,
            head: 0,
            tail: count.saturating_sub(1),
        }
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn config(&self, idx: usize) -> &Config {
        &self.nodes[idx].config
    }

    fn next_of(&self, idx: usize) -> Option<usize> {
        self.nodes[idx].next
    }

    fn front(&self) -> &Config {
        &self.nodes[self.head].config
    }

    fn back(&self) -> &Config {
        &self.nodes[self.tail].config
    }

    /// Splice a new waypoint after `idx`, returning its handle.
    fn insert_after(&mut self, idx: usize, config: Config) -> usize {
        let new_idx = self.nodes.len();
        let next = self.nodes[idx].next;
        self.nodes.push(Node { config, next });
        self.nodes[idx].next = Some(new_idx);
        if next.is_none() {
            self.tail = new_idx;
        }
        new_idx
    }

    /// Waypoints in path order.
    fn iter(&self) -> ChainIter<'_> {
        ChainIter {
            chain: self,
            current: Some(self.head),
        }
    }
}

impl Clone for WaypointChain {
    fn clone(&self) -> Self {
        Self {
            nodes: self
                .nodes
                .iter()
                .map(|n| Node {
                    config: n.config.clone(),
                    next: n.next,
                })
                .collect(),
            head: self.head,
            tail: self.tail,
        }
    }
}

struct ChainIter<'a> {
    chain: &'a WaypointChain,
    current: Option<usize>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = &'a Config;

    fn next(&mut self) -> Option<&'a Config> {
        let idx = self.current?;
        self.current = self.chain.next_of(idx);
        Some(self.chain.config(idx))
    }
}

/// Pending sub-interval: the waypoint it starts at plus its metric length.
///
/// An infinite length marks a confirmed failure or degeneracy and sorts the
/// segment to the top of the queue, so failures are discovered immediately.
#[derive(Clone, Debug)]
struct Segment {
    prev: usize,
    length: f32,
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length
    }
}

impl Eq for Segment {}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Max-heap: longest pending segment first.
        self.length
            .partial_cmp(&other.length)
            .unwrap_or(std::cmp::Ordering::Equal)
    }
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Adaptive incremental edge checker.
///
/// The path is an append-only waypoint sequence starting as `[a, b]`; a
/// max-heap of pending sub-intervals keyed by length drives refinement.
/// Each [`plan`](EdgePlanner::plan) call pops the longest interval, tests
/// its midpoint, splices it into the sequence on success, and requeues the
/// two halves while they still exceed the tolerance. Because the longest
/// interval is always refined next, [`priority`](EdgePlanner::priority) —
/// the top interval's length — is an honest measure of the remaining work,
/// which is what lets an external scheduler interleave many of these
/// planners effectively.
pub struct BisectionEpsilonEdgePlanner {
    space: SharedSpace,
    epsilon: f32,
    config: BisectionConfig,
    chain: WaypointChain,
    queue: BinaryHeap<Segment>,
    /// Refinement steps taken, for the periodic degeneracy guard.
    pops: usize,
}

impl BisectionEpsilonEdgePlanner {
    /// Planner for the edge from `a` to `b` at tolerance `epsilon`.
    pub fn new(space: SharedSpace, a: Config, b: Config, epsilon: f32) -> Self {
        Self::with_config(space, a, b, epsilon, BisectionConfig::default())
    }

    /// Planner with explicit refinement tuning.
    pub fn with_config(
        space: SharedSpace,
        a: Config,
        b: Config,
        epsilon: f32,
        config: BisectionConfig,
    ) -> Self {
        let mut epsilon = epsilon;
        if epsilon <= 0.0 {
            warn!(
                "[BisectionEpsilonEdgePlanner] non-positive epsilon {}, clamping to 1e-6",
                epsilon
            );
            epsilon = 1e-6;
        }
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                warn!(
                    "[BisectionEpsilonEdgePlanner] invalid refinement config ({}), using defaults",
                    err
                );
                BisectionConfig::default()
            }
        };
        let length = space.distance(&a, &b);
        let chain = WaypointChain::new(a, b);
        let mut queue = BinaryHeap::new();
        queue.push(Segment {
            prev: chain.head,
            length,
        });
        Self {
            space,
            epsilon,
            config,
            chain,
            queue,
            pops: 0,
        }
    }

    /// Tolerance this planner refines down to.
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Waypoints of the current path representation, in order.
    pub fn waypoints(&self) -> impl Iterator<Item = &Config> {
        self.chain.iter()
    }

    /// One refinement step that also reports the bracketing waypoints of
    /// the processed interval, so a caller can tell *where* an
    /// infeasibility was found.
    ///
    /// Returns the same advancement flag as [`plan`](EdgePlanner::plan);
    /// the bracket is `None` only when the planner was already done.
    pub fn plan_with_bracket(&mut self) -> (bool, Option<(Config, Config)>) {
        let (advanced, bracket) = self.step();
        let bracket = bracket.map(|(i, j)| {
            (
                self.chain.config(i).clone(),
                self.chain.config(j).clone(),
            )
        });
        (advanced, bracket)
    }

    /// Pop and refine the longest pending interval.
    fn step(&mut self) -> (bool, Option<(usize, usize)>) {
        if self.done() {
            return (false, None);
        }
        let Some(mut seg) = self.queue.pop() else {
            return (false, None);
        };
        let a_idx = seg.prev;
        let Some(b_idx) = self.chain.next_of(a_idx) else {
            // A segment handle without a successor cannot happen while the
            // chain is insert-only; fail closed if it does.
            warn!("[BisectionEpsilonEdgePlanner] dangling segment handle, aborting edge");
            seg.length = f32::INFINITY;
            self.queue.push(seg);
            return (false, None);
        };
        self.pops += 1;

        let mid = self
            .space
            .midpoint(self.chain.config(a_idx), self.chain.config(b_idx));
        if !self.space.is_feasible(&mid) {
            seg.length = f32::INFINITY;
            self.queue.push(seg);
            return (false, Some((a_idx, b_idx)));
        }
        let m_idx = self.chain.insert_after(a_idx, mid);

        if self.pops % self.config.degeneracy_check_interval == 0 {
            let direct = self.space.distance(self.chain.front(), self.chain.back());
            if self.queue.len() as f32 * self.epsilon > self.config.degeneracy_ratio * direct {
                warn!(
                    "[BisectionEpsilonEdgePlanner] over {}x as many pending segments as a \
                     uniform metric needs (direct length {}, epsilon {}), aborting edge",
                    self.config.degeneracy_ratio, direct, self.epsilon
                );
                seg.length = f32::INFINITY;
                self.queue.push(seg);
                return (false, Some((a_idx, b_idx)));
            }
        }

        let l1 = self
            .space
            .distance(self.chain.config(a_idx), self.chain.config(m_idx));
        let l2 = self
            .space
            .distance(self.chain.config(m_idx), self.chain.config(b_idx));
        if l1 > 0.9 * seg.length || l2 > 0.9 * seg.length {
            warn!(
                "[BisectionEpsilonEdgePlanner] midpoint split {} into {} and {}; metric and \
                 interpolation are inconsistent, aborting edge",
                seg.length, l1, l2
            );
            seg.length = f32::INFINITY;
            self.queue.push(seg);
            return (false, Some((a_idx, b_idx)));
        }

        if l1 > self.epsilon {
            self.queue.push(Segment {
                prev: a_idx,
                length: l1,
            });
        }
        if l2 > self.epsilon {
            self.queue.push(Segment {
                prev: m_idx,
                length: l2,
            });
        }
        (true, Some((a_idx, b_idx)))
    }

    /// Re-seed a queue with one segment per interval of `chain` still
    /// longer than `epsilon`.
    fn reseed(space: &SharedSpace, chain: &WaypointChain, epsilon: f32) -> BinaryHeap<Segment> {
        let mut queue = BinaryHeap::new();
        let mut idx = chain.head;
        while let Some(next) = chain.next_of(idx) {
            let length = space.distance(chain.config(idx), chain.config(next));
            if length > epsilon {
                queue.push(Segment { prev: idx, length });
            }
            idx = next;
        }
        queue
    }
}

impl EdgePlanner for BisectionEpsilonEdgePlanner {
    fn space(&self) -> &SharedSpace {
        &self.space
    }

    fn eval(&self, u: f32) -> Config {
        let u = checked_param(u, "BisectionEpsilonEdgePlanner");
        let dt = 1.0 / (self.chain.len() - 1) as f32;
        let mut t = 0.0;
        let mut idx = self.chain.head;
        while t + dt < u {
            t += dt;
            match self.chain.next_of(idx) {
                Some(next) => idx = next,
                None => return self.chain.back().clone(),
            }
        }
        match self.chain.next_of(idx) {
            Some(next) => {
                self.space
                    .interpolate(self.chain.config(idx), self.chain.config(next), (u - t) / dt)
            }
            None => self.chain.config(idx).clone(),
        }
    }

    fn length(&self) -> f32 {
        let mut total = 0.0;
        let mut idx = self.chain.head;
        while let Some(next) = self.chain.next_of(idx) {
            total += self
                .space
                .distance(self.chain.config(idx), self.chain.config(next));
            idx = next;
        }
        total
    }

    fn start(&self) -> &Config {
        self.chain.front()
    }

    fn end(&self) -> &Config {
        self.chain.back()
    }

    fn priority(&self) -> f32 {
        if self.done() {
            return 0.0;
        }
        match self.queue.peek() {
            Some(seg) => seg.length,
            None => 0.0,
        }
    }

    fn plan(&mut self) -> bool {
        self.step().0
    }

    fn done(&self) -> bool {
        match self.queue.peek() {
            None => true,
            Some(top) => top.length <= self.epsilon || top.length.is_infinite(),
        }
    }

    fn failed(&self) -> bool {
        match self.queue.peek() {
            None => false,
            Some(top) => top.length.is_infinite(),
        }
    }

    fn copy(&self) -> Box<dyn EdgePlanner> {
        let chain = self.chain.clone();
        let queue = if self.failed() {
            // Keep the poisoned segment so the copy stays failed.
            let mut queue = BinaryHeap::new();
            queue.push(Segment {
                prev: self.queue.peek().map(|s| s.prev).unwrap_or(chain.head),
                length: f32::INFINITY,
            });
            queue
        } else if !self.done() {
            warn!(
                "[BisectionEpsilonEdgePlanner] copying a planner that is not done; \
                 re-seeding {} waypoints into a fresh queue",
                chain.len()
            );
            Self::reseed(&self.space, &chain, self.epsilon)
        } else {
            BinaryHeap::new()
        };
        Box::new(Self {
            space: Arc::clone(&self.space),
            epsilon: self.epsilon,
            config: self.config.clone(),
            chain,
            queue,
            pops: 0,
        })
    }

    fn reverse_copy(&self) -> Box<dyn EdgePlanner> {
        let mut configs: Vec<Config> = self.chain.iter().cloned().collect();
        configs.reverse();
        let chain = WaypointChain::from_ordered(configs);
        // Segment bookkeeping is directional, so refinement restarts over
        // the reversed sequence; a confirmed failure carries over.
        let mut queue = Self::reseed(&self.space, &chain, self.epsilon);
        if self.failed() {
            queue.push(Segment {
                prev: chain.head,
                length: f32::INFINITY,
            });
        }
        Box::new(Self {
            space: Arc::clone(&self.space),
            epsilon: self.epsilon,
            config: self.config.clone(),
            chain,
            queue,
            pops: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::{CSpace, EuclideanSpace, Obstacle};

    fn free_space() -> SharedSpace {
        Arc::new(EuclideanSpace::unit_square())
    }

    fn blocked_space() -> SharedSpace {
        Arc::new(
            EuclideanSpace::unit_square()
                .with_obstacle(Obstacle::aabb(&[0.4, 0.4], &[0.6, 0.6])),
        )
    }

    fn unit_segment(space: SharedSpace, epsilon: f32) -> BisectionEpsilonEdgePlanner {
        BisectionEpsilonEdgePlanner::new(
            space,
            Config::new(vec![0.0, 0.5]),
            Config::new(vec![1.0, 0.5]),
            epsilon,
        )
    }

    #[test]
    fn test_converges_on_free_segment() {
        let mut p = unit_segment(free_space(), 0.01);
        let mut steps = 0;
        while !p.done() {
            assert!(p.plan());
            steps += 1;
            assert!(steps < 300, "refinement did not converge");
        }
        assert!(!p.failed());
        // Every interval of the final representation is below tolerance.
        let waypoints: Vec<_> = p.waypoints().cloned().collect();
        for pair in waypoints.windows(2) {
            assert!(pair[0].euclidean_distance(&pair[1]) <= 0.01);
        }
        // The refined length of a straight segment matches the metric.
        assert!((p.length() - 1.0).abs() < 0.01);
        assert_eq!(p.priority(), 0.0);
    }

    #[test]
    fn test_detects_obstacle_with_bracket() {
        let mut p = unit_segment(blocked_space(), 0.001);
        let bracket = loop {
            let (advanced, b) = p.plan_with_bracket();
            if !advanced {
                break b;
            }
        };
        assert!(p.done());
        assert!(p.failed());
        let (pre, post) = bracket.expect("failing step reports a bracket");
        // The bracketing waypoints straddle the obstructed interval.
        assert!(pre[0] < 0.4, "pre = {:?}", pre);
        assert!(post[0] > 0.6, "post = {:?}", post);
    }

    #[test]
    fn test_is_visible_blocking() {
        let mut free = unit_segment(free_space(), 0.01);
        assert!(free.is_visible());
        let mut blocked = unit_segment(blocked_space(), 0.001);
        assert!(!blocked.is_visible());
    }

    #[test]
    fn test_plan_idempotent_after_done() {
        let mut p = unit_segment(blocked_space(), 0.01);
        assert!(!p.is_visible());
        assert!(p.failed());
        assert!(!p.plan());
        assert!(!p.plan());
        assert!(p.failed());
        assert!(p.done());
        assert_eq!(p.priority(), 0.0);
    }

    #[test]
    fn test_priority_tracks_longest_interval() {
        let mut p = unit_segment(free_space(), 0.01);
        assert!((p.priority() - 1.0).abs() < 1e-6);
        p.plan();
        assert!((p.priority() - 0.5).abs() < 1e-6);
        p.plan();
        assert!((p.priority() - 0.5).abs() < 1e-6);
        p.plan();
        assert!((p.priority() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_eval_after_convergence() {
        let mut p = unit_segment(free_space(), 0.01);
        assert!(p.is_visible());
        let q = p.eval(0.25);
        assert!((q[0] - 0.25).abs() < 0.02);
        assert!((q[1] - 0.5).abs() < 1e-5);
        assert_eq!(p.eval(0.0), Config::new(vec![0.0, 0.5]));
        assert_eq!(p.eval(1.0), Config::new(vec![1.0, 0.5]));
    }

    #[test]
    fn test_copy_unfinished_same_verdict() {
        // Partial progress on a free segment transfers to the copy.
        let mut original = unit_segment(free_space(), 0.005);
        original.plan();
        original.plan();
        let mut copied = original.copy();
        assert!(!copied.done());
        assert_eq!(original.is_visible(), copied.is_visible());
    }

    #[test]
    fn test_copy_preserves_failure() {
        let mut p = unit_segment(blocked_space(), 0.01);
        assert!(!p.is_visible());
        let copied = p.copy();
        assert!(copied.done());
        assert!(copied.failed());
    }

    #[test]
    fn test_reverse_copy_swaps_and_agrees() {
        let mut p = unit_segment(free_space(), 0.01);
        p.plan();
        let mut r = p.reverse_copy();
        assert_eq!(r.start(), &Config::new(vec![1.0, 0.5]));
        assert_eq!(r.end(), &Config::new(vec![0.0, 0.5]));
        assert_eq!(p.is_visible(), r.is_visible());

        let mut blocked = unit_segment(blocked_space(), 0.01);
        assert!(!blocked.is_visible());
        let mut rb = blocked.reverse_copy();
        assert!(rb.failed());
        assert!(!rb.is_visible());
    }

    /// Metric that grows as the square root of Euclidean distance: short
    /// intervals stop shrinking usefully, so refinement effort explodes.
    struct WarpedSpace(EuclideanSpace);

    impl CSpace for WarpedSpace {
        fn is_feasible(&self, q: &Config) -> bool {
            self.0.is_feasible(q)
        }
        fn distance(&self, a: &Config, b: &Config) -> f32 {
            a.euclidean_distance(b).sqrt()
        }
        fn interpolate(&self, a: &Config, b: &Config, u: f32) -> Config {
            a.lerp(b, u)
        }
    }

    #[test]
    fn test_degeneracy_guard_aborts_pathological_metric() {
        let space: SharedSpace = Arc::new(WarpedSpace(EuclideanSpace::unit_square()));
        let mut p = unit_segment(space, 0.01);
        let mut steps = 0;
        while p.plan() {
            steps += 1;
            assert!(steps < 5000, "degeneracy guard never fired");
        }
        assert!(p.done());
        assert!(p.failed());
    }

    /// Metric under which midpoints do not shorten segments at all.
    struct ConstantMetricSpace;

    impl CSpace for ConstantMetricSpace {
        fn is_feasible(&self, _q: &Config) -> bool {
            true
        }
        fn distance(&self, a: &Config, b: &Config) -> f32 {
            if a == b {
                0.0
            } else {
                1.0
            }
        }
        fn interpolate(&self, a: &Config, b: &Config, u: f32) -> Config {
            a.lerp(b, u)
        }
    }

    #[test]
    fn test_inconsistent_metric_aborts_immediately() {
        let space: SharedSpace = Arc::new(ConstantMetricSpace);
        let mut p = BisectionEpsilonEdgePlanner::new(
            space,
            Config::new(vec![0.0, 0.0]),
            Config::new(vec![1.0, 0.0]),
            0.01,
        );
        assert!(!p.plan());
        assert!(p.failed());
    }

    #[test]
    fn test_config_validation() {
        assert!(BisectionConfig::default().validate().is_ok());
        assert!(matches!(
            BisectionConfig::new()
                .with_degeneracy_ratio(0.0)
                .validate(),
            Err(BisectionConfigError::NonPositiveRatio(_))
        ));
        assert!(matches!(
            BisectionConfig::new().with_check_interval(0).validate(),
            Err(BisectionConfigError::ZeroInterval)
        ));
    }
}
