//! Decorator planners: metadata override, incrementalization, and space
//! lifetime extension.

use std::sync::Arc;

use crate::interpolate::{Interpolator, ReverseInterpolator, SharedInterpolator};
use crate::space::{Config, SharedSpace};

use super::{checked_param, EdgePlanner};

/// Decorates a wrapped planner, optionally overriding its path metadata.
///
/// With a distinct interpolator supplied, evaluation, length, and endpoints
/// come from that interpolator while the feasibility protocol still runs on
/// the wrapped planner — useful when the wrapped planner checks a
/// discretized or re-parameterized version of the real path. Without one,
/// every query delegates.
pub struct PiggybackEdgePlanner {
    space: SharedSpace,
    path: Option<SharedInterpolator>,
    inner: Box<dyn EdgePlanner>,
}

impl PiggybackEdgePlanner {
    /// Pure delegation: all metadata comes from the wrapped planner.
    pub fn new(inner: Box<dyn EdgePlanner>) -> Self {
        Self {
            space: Arc::clone(inner.space()),
            path: None,
            inner,
        }
    }

    /// Decorate `inner` with explicit path metadata.
    pub fn with_path(
        space: SharedSpace,
        path: SharedInterpolator,
        inner: Box<dyn EdgePlanner>,
    ) -> Self {
        Self {
            space,
            path: Some(path),
            inner,
        }
    }
}

impl EdgePlanner for PiggybackEdgePlanner {
    fn space(&self) -> &SharedSpace {
        &self.space
    }

    fn eval(&self, u: f32) -> Config {
        match &self.path {
            Some(path) => path.eval(checked_param(u, "PiggybackEdgePlanner")),
            None => self.inner.eval(u),
        }
    }

    fn length(&self) -> f32 {
        match &self.path {
            Some(path) => path.length(),
            None => self.inner.length(),
        }
    }

    fn start(&self) -> &Config {
        match &self.path {
            Some(path) => path.start(),
            None => self.inner.start(),
        }
    }

    fn end(&self) -> &Config {
        match &self.path {
            Some(path) => path.end(),
            None => self.inner.end(),
        }
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
        Box::new(Self {
            space: Arc::clone(&self.space),
            path: self.path.clone(),
            inner: self.inner.copy(),
        })
    }

    fn reverse_copy(&self) -> Box<dyn EdgePlanner> {
        Box::new(Self {
            space: Arc::clone(&self.space),
            path: self
                .path
                .as_ref()
                .map(|p| Arc::new(ReverseInterpolator::new(Arc::clone(p))) as SharedInterpolator),
            inner: self.inner.reverse_copy(),
        })
    }
}

/// Adapts a blocking-only planner to the incremental contract.
///
/// The whole blocking check runs on the first [`plan`](EdgePlanner::plan)
/// call and the verdict is cached; not truly incremental, but every
/// contract guarantee holds, so schedulers need not special-case blocking
/// checkers.
pub struct IncrementalizedEdgePlanner {
    inner: Box<dyn EdgePlanner>,
    checked: bool,
    visible: bool,
}

impl IncrementalizedEdgePlanner {
    /// Wrap a blocking planner.
    pub fn new(inner: Box<dyn EdgePlanner>) -> Self {
        Self {
            inner,
            checked: false,
            visible: false,
        }
    }
}

impl EdgePlanner for IncrementalizedEdgePlanner {
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
        if self.checked {
            0.0
        } else {
            self.inner.length()
        }
    }

    fn plan(&mut self) -> bool {
        if !self.checked {
            self.visible = self.inner.is_visible();
            self.checked = true;
        }
        false
    }

    fn done(&self) -> bool {
        self.checked
    }

    fn failed(&self) -> bool {
        self.checked && !self.visible
    }

    fn is_visible(&mut self) -> bool {
        self.plan();
        self.visible
    }

    fn copy(&self) -> Box<dyn EdgePlanner> {
        Box::new(Self {
            inner: self.inner.copy(),
            checked: self.checked,
            visible: self.visible,
        })
    }

    fn reverse_copy(&self) -> Box<dyn EdgePlanner> {
        // The cached verdict is direction-independent.
        Box::new(Self {
            inner: self.inner.reverse_copy(),
            checked: self.checked,
            visible: self.visible,
        })
    }
}

/// Ties a shared space handle to a wrapped planner's lifetime.
///
/// Planners built against a derived or temporary space (such as a
/// [`SubsetSpace`](crate::space::SubsetSpace) view for one obstacle) hold
/// only a shared reference into it; this decorator carries the owning
/// handle so the space lives exactly as long as the planners that
/// reference it.
pub struct EdgePlannerWithCSpaceContainer {
    space: SharedSpace,
    inner: Box<dyn EdgePlanner>,
}

impl EdgePlannerWithCSpaceContainer {
    /// Pair `space` with a planner built against it.
    pub fn new(space: SharedSpace, inner: Box<dyn EdgePlanner>) -> Self {
        Self { space, inner }
    }
}

impl EdgePlanner for EdgePlannerWithCSpaceContainer {
    fn space(&self) -> &SharedSpace {
        &self.space
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
        Box::new(Self {
            space: Arc::clone(&self.space),
            inner: self.inner.copy(),
        })
    }

    fn reverse_copy(&self) -> Box<dyn EdgePlanner> {
        Box::new(Self {
            space: Arc::clone(&self.space),
            inner: self.inner.reverse_copy(),
        })
    }
}
