use std::sync::Mutex;

use crate::routes::Route;

/// How a redirect is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    /// In-app transition that keeps the session object alive.
    Push,
    /// Hard reload; any in-memory state is expected to be rebuilt.
    FullReload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: Route,
    pub mode: NavigationMode,
}

/// Redirect sink. The console records redirects and reports them after a
/// command finishes.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route, mode: NavigationMode);
}

#[derive(Debug, Default)]
pub struct History {
    entries: Mutex<Vec<Navigation>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Navigation> {
        self.lock().clone()
    }

    pub fn last(&self) -> Option<Navigation> {
        self.lock().last().cloned()
    }

    pub fn count_to(&self, route: &Route) -> usize {
        self.lock().iter().filter(|n| &n.route == route).count()
    }

    pub fn take(&self) -> Vec<Navigation> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Navigation>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Navigator for History {
    fn navigate(&self, route: Route, mode: NavigationMode) {
        tracing::debug!("navigate {:?} -> {}", mode, route);
        self.lock().push(Navigation { route, mode });
    }
}
