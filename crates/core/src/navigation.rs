use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::models::route::Route;

/// Receives redirect signals from the gateway, guard and account service.
///
/// A browser front-end would change `window.location`; the terminal
/// client just records where it was sent.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Redirects a [`RouteRecorder`] keeps before dropping the oldest.
pub const ROUTE_HISTORY_LIMIT: usize = 64;

/// Navigator that keeps the most recent redirects in order.
#[derive(Debug, Default)]
pub struct RouteRecorder {
    history: Mutex<VecDeque<Route>>,
}

impl RouteRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent redirect, if any.
    #[must_use]
    pub fn last(&self) -> Option<Route> {
        self.history.lock().ok()?.back().copied()
    }

    /// Retained redirects, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<Route> {
        self.history
            .lock()
            .map(|h| h.iter().copied().collect())
            .unwrap_or_default()
    }

    /// How many retained redirects went to `route`.
    #[must_use]
    pub fn count(&self, route: Route) -> usize {
        self.history
            .lock()
            .map(|h| h.iter().filter(|r| **r == route).count())
            .unwrap_or(0)
    }

    /// Drain the history, returning what was recorded.
    pub fn take(&self) -> Vec<Route> {
        self.history
            .lock()
            .map(|mut h| h.drain(..).collect())
            .unwrap_or_default()
    }
}

impl Navigator for RouteRecorder {
    fn navigate(&self, route: Route) {
        tracing::debug!(%route, "Navigating");
        if let Ok(mut history) = self.history.lock() {
            if history.len() == ROUTE_HISTORY_LIMIT {
                history.pop_front();
            }
            history.push_back(route);
        }
    }
}

/// Forwards to the front-end's navigator while keeping a copy of each
/// redirect, so the controller can report them as effects.
pub(crate) struct CapturingNavigator {
    inner: Arc<dyn Navigator>,
    captured: RouteRecorder,
}

impl CapturingNavigator {
    pub(crate) fn new(inner: Arc<dyn Navigator>) -> Self {
        Self {
            inner,
            captured: RouteRecorder::new(),
        }
    }

    pub(crate) fn drain(&self) -> Vec<Route> {
        self.captured.take()
    }
}

impl Navigator for CapturingNavigator {
    fn navigate(&self, route: Route) {
        self.captured.navigate(route);
        self.inner.navigate(route);
    }
}
