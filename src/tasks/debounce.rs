//! Debounce
//!
//! Collapses a burst of calls into one delayed invocation carrying the
//! arguments of the last call.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

struct DebounceInner<A> {
    func: Box<dyn Fn(A) + Send + Sync>,
    delay: Duration,
    /// Scheduled invocation that has not run yet
    pending: Mutex<Option<JoinHandle<()>>>,
}

/// A debounced wrapper around a function. Clones share the same schedule.
pub struct Debounced<A> {
    inner: Arc<DebounceInner<A>>,
}

impl<A> Clone for Debounced<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Wraps `func` so that it only runs once `delay` has passed without a
/// further call.
///
/// # Example
/// ```ignore
/// let save = debounce(|text: String| println!("{text}"), Duration::from_millis(300));
/// save.call("a".into());
/// save.call("ab".into()); // only "ab" is printed, 300 ms later
/// ```
pub fn debounce<A, F>(func: F, delay: Duration) -> Debounced<A>
where
    A: Send + 'static,
    F: Fn(A) + Send + Sync + 'static,
{
    Debounced {
        inner: Arc::new(DebounceInner {
            func: Box::new(func),
            delay,
            pending: Mutex::new(None),
        }),
    }
}

impl<A: Send + 'static> Debounced<A> {
    /// Reschedules the wrapped function with `args`.
    ///
    /// Any invocation scheduled by an earlier call and not yet run is
    /// cancelled. Must be called from within a Tokio runtime.
    pub fn call(&self, args: A) {
        let mut pending = self
            .inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let inner = Arc::clone(&self.inner);
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(inner.delay).await;
            (inner.func)(args);
        }));
    }

    /// Drops the scheduled invocation, if any.
    pub fn cancel(&self) {
        let mut pending = self
            .inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(previous) = pending.take() {
            previous.abort();
        }
    }

    /// Whether an invocation is scheduled and has not finished.
    pub fn is_pending(&self) -> bool {
        self.inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn delay(&self) -> Duration {
        self.inner.delay
    }
}
