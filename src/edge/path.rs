//! Sequential composition of per-segment edge planners.

use std::sync::Arc;

use log::warn;

use crate::interpolate::SharedInterpolator;
use crate::space::{Config, SharedSpace};

use super::{checked_param, EdgePlanner, PiggybackEdgePlanner};

/// Checks a multi-segment path by running its child planners in order.
///
/// Each of the `n` children owns an equal `1/n`-wide slice of the
/// composite parameter range, and a monotone `progress` cursor records how
/// many have been confirmed visible. One [`plan`](EdgePlanner::plan) call
/// drives one child to completion; the first infeasible child
/// short-circuits the rest.
pub struct PathEdgeChecker {
    space: SharedSpace,
    children: Vec<Box<dyn EdgePlanner>>,
    progress: usize,
    found_infeasible: bool,
    start: Config,
    end: Config,
}

impl PathEdgeChecker {
    /// Composite checker over `children`, in path order.
    ///
    /// An empty child list is a construction misuse: it is logged and the
    /// checker behaves as an already-verified empty path.
    pub fn new(space: SharedSpace, children: Vec<Box<dyn EdgePlanner>>) -> Self {
        if children.is_empty() {
            warn!("[PathEdgeChecker] constructed with no children");
        }
        let start = children
            .first()
            .map(|c| c.start().clone())
            .unwrap_or_default();
        let end = children
            .last()
            .map(|c| c.end().clone())
            .unwrap_or_default();
        Self {
            space,
            children,
            progress: 0,
            found_infeasible: false,
            start,
            end,
        }
    }

    /// Number of children confirmed visible so far.
    pub fn progress(&self) -> usize {
        self.progress
    }

    /// Number of child planners.
    pub fn num_children(&self) -> usize {
        self.children.len()
    }
}

impl EdgePlanner for PathEdgeChecker {
    fn space(&self) -> &SharedSpace {
        &self.space
    }

    fn eval(&self, u: f32) -> Config {
        let u = checked_param(u, "PathEdgeChecker");
        if self.children.is_empty() {
            return self.start.clone();
        }
        let t = u * self.children.len() as f32;
        let seg = (t.floor() as usize).min(self.children.len() - 1);
        self.children[seg].eval(t - seg as f32)
    }

    fn length(&self) -> f32 {
        self.children.iter().map(|c| c.length()).sum()
    }

    fn start(&self) -> &Config {
        &self.start
    }

    fn end(&self) -> &Config {
        &self.end
    }

    fn priority(&self) -> f32 {
        if self.done() {
            0.0
        } else {
            (self.children.len() - self.progress) as f32
        }
    }

    fn plan(&mut self) -> bool {
        if self.found_infeasible {
            return false;
        }
        if self.progress < self.children.len() {
            if !self.children[self.progress].is_visible() {
                self.found_infeasible = true;
                return false;
            }
            self.progress += 1;
        }
        self.progress < self.children.len()
    }

    fn done(&self) -> bool {
        self.progress >= self.children.len() || self.found_infeasible
    }

    fn failed(&self) -> bool {
        self.found_infeasible
    }

    fn is_visible(&mut self) -> bool {
        while self.progress < self.children.len() {
            if !self.children[self.progress].is_visible() {
                self.found_infeasible = true;
                return false;
            }
            self.progress += 1;
        }
        !self.found_infeasible
    }

    fn copy(&self) -> Box<dyn EdgePlanner> {
        Box::new(Self {
            space: Arc::clone(&self.space),
            children: self.children.iter().map(|c| c.copy()).collect(),
            progress: self.progress,
            found_infeasible: self.found_infeasible,
            start: self.start.clone(),
            end: self.end.clone(),
        })
    }

    fn reverse_copy(&self) -> Box<dyn EdgePlanner> {
        // Child order and each child's direction both flip; the progress
        // cursor is directional and restarts.
        let children: Vec<Box<dyn EdgePlanner>> = self
            .children
            .iter()
            .rev()
            .map(|c| c.reverse_copy())
            .collect();
        Box::new(Self {
            space: Arc::clone(&self.space),
            children,
            progress: 0,
            found_infeasible: false,
            start: self.end.clone(),
            end: self.start.clone(),
        })
    }
}

/// Composite of independently-checkable components with whole-path
/// geometry: a [`PathEdgeChecker`] piggybacked under a supplied
/// interpolator.
pub struct MultiEdgePlanner {
    inner: PiggybackEdgePlanner,
}

impl MultiEdgePlanner {
    /// Composite planner over `components` with `path` as the reported
    /// geometry.
    pub fn new(
        space: SharedSpace,
        path: SharedInterpolator,
        components: Vec<Box<dyn EdgePlanner>>,
    ) -> Self {
        let checker = PathEdgeChecker::new(Arc::clone(&space), components);
        Self {
            inner: PiggybackEdgePlanner::with_path(space, path, Box::new(checker)),
        }
    }
}

impl EdgePlanner for MultiEdgePlanner {
    fn space(&self) -> &SharedSpace {
        self.inner.space()
    }

    fn eval(&self, u: f32) -> Config {
        self.inner.eval(u)
    }

    fn length(&self) -> f32 {
        self.inner.length()
    }

    fn start(&self) -> &Config {
        self.inner.start()
    }

    fn end(&self) -> &Config {
        self.inner.end()
    }

    fn priority(&self) -> f32 {
        self.inner.priority()
    }

    fn plan(&mut self) -> bool {
        self.inner.plan()
    }

    fn done(&self) -> bool {
        self.inner.done()
    }

    fn failed(&self) -> bool {
        self.inner.failed()
    }

    fn is_visible(&mut self) -> bool {
        self.inner.is_visible()
    }

    fn copy(&self) -> Box<dyn EdgePlanner> {
        self.inner.copy()
    }

    fn reverse_copy(&self) -> Box<dyn EdgePlanner> {
        self.inner.reverse_copy()
    }
}
