//! ObservationScope for automatic begin/complete logging
//!
//! - Logs `{name}_BEGIN` on creation
//! - Logs `{name}_COMPLETE` with elapsed time on `complete()`
//! - Logs `{name}_FAILED` on `fail()`
//! - Logs `{name}_INCOMPLETE` on drop if neither was called

use std::time::Instant;

use tracing::Span;

/// A scope that logs the lifecycle of one operation
///
/// # Usage
///
/// ```ignore
/// let scope = ObservationScope::new("LOAD");
/// // ... do work ...
/// scope.complete(); // logs LOAD_COMPLETE
/// ```
pub struct ObservationScope {
    name: &'static str,
    span: Span,
    started: Instant,
    completed: bool,
}

impl ObservationScope {
    /// Create a new observation scope
    ///
    /// Logs `{name}_BEGIN` immediately.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!("scope", name);
        span.in_scope(|| tracing::info!(event = %format!("{}_BEGIN", name)));

        Self {
            name,
            span,
            started: Instant::now(),
            completed: false,
        }
    }

    /// Milliseconds since the scope began
    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Mark the scope as successfully completed
    ///
    /// Returns the elapsed milliseconds.
    pub fn complete(mut self) -> u64 {
        self.completed = true;
        let elapsed_ms = self.elapsed_ms();
        self.span.in_scope(|| {
            tracing::info!(event = %format!("{}_COMPLETE", self.name), elapsed_ms);
        });
        elapsed_ms
    }

    /// Mark the scope as failed with a reason
    pub fn fail(mut self, reason: &str) {
        self.completed = true;
        let elapsed_ms = self.elapsed_ms();
        self.span.in_scope(|| {
            tracing::error!(event = %format!("{}_FAILED", self.name), elapsed_ms, reason);
        });
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        if !self.completed {
            self.span.in_scope(|| {
                tracing::warn!(
                    event = %format!("{}_INCOMPLETE", self.name),
                    reason = "scope dropped without completion",
                );
            });
        }
    }
}
