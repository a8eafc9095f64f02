//! Consumer-side lifetime scope for data that arrives asynchronously.
//!
//! The loader is shared and outlives any single consumer. A consumer owns a
//! [`ViewScope`]; once the scope is torn down, results that arrive later are
//! discarded instead of being applied.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> ViewState<T> {
    pub fn from_result<E: fmt::Display>(resource: &str, result: Result<T, E>) -> Self {
        match failure_message(resource, result) {
            Ok(value) => ViewState::Ready(value),
            Err(message) => ViewState::Failed(message),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }
}

impl<T> From<Result<T, String>> for ViewState<T> {
    fn from(result: Result<T, String>) -> Self {
        match result {
            Ok(value) => ViewState::Ready(value),
            Err(message) => ViewState::Failed(message),
        }
    }
}

fn failure_message<T, E: fmt::Display>(resource: &str, result: Result<T, E>) -> Result<T, String> {
    result.map_err(|err| format!("Failed to load {resource}: {err}"))
}

#[derive(Debug)]
pub struct ViewScope {
    alive: Arc<AtomicBool>,
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewScope {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn guard(&self) -> ScopeGuard {
        ScopeGuard {
            alive: Arc::clone(&self.alive),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    pub fn teardown(&self) {
        self.alive.store(false, Ordering::Release);
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Handle carried by in-flight work on behalf of a [`ViewScope`].
#[derive(Debug, Clone)]
pub struct ScopeGuard {
    alive: Arc<AtomicBool>,
}

impl ScopeGuard {
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Awaits `fut`. `None` if the scope was torn down meanwhile, otherwise the
    /// value or the user-facing failure message.
    pub async fn resolve<T, E, F>(&self, resource: &str, fut: F) -> Option<Result<T, String>>
    where
        E: fmt::Display,
        F: Future<Output = Result<T, E>>,
    {
        let result = fut.await;
        if !self.is_alive() {
            debug!(resource, "scope torn down, discarding late result");
            return None;
        }
        Some(failure_message(resource, result))
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/view.rs"]
mod tests;
