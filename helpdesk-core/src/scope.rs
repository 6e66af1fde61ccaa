//! Per-view request lifetime.
//!
//! A view creates one `ViewScope` when it mounts and closes it on teardown.
//! Requests wrapped with [`ViewScope::guard`] are aborted on close, and a
//! result that races the close is dropped instead of reaching a dead view.

use futures::future::{AbortHandle, Abortable};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

#[derive(Clone, Debug)]
pub struct ViewScope {
    inner: Arc<ScopeInner>,
}

#[derive(Debug)]
struct ScopeInner {
    alive: AtomicBool,
    next_id: AtomicU64,
    /// Requests still in flight, keyed by the id handed out in `guard`.
    pending: Mutex<HashMap<u64, AbortHandle>>,
}

impl ScopeInner {
    fn pending(&self) -> MutexGuard<'_, HashMap<u64, AbortHandle>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Drops the registry entry when the guarded future finishes or is dropped.
struct PendingEntry {
    inner: Arc<ScopeInner>,
    id: u64,
}

impl Drop for PendingEntry {
    fn drop(&mut self) {
        self.inner.pending().remove(&self.id);
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewScope {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                alive: AtomicBool::new(true),
                next_id: AtomicU64::new(0),
                pending: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.inner.alive.load(Ordering::Acquire)
    }

    /// Wrap `fut` so it resolves to `None` if the scope closes first.
    pub fn guard<F: Future>(&self, fut: F) -> impl Future<Output = Option<F::Output>> {
        let (handle, registration) = AbortHandle::new_pair();
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        {
            let mut pending = self.inner.pending();
            if self.is_alive() {
                pending.insert(id, handle);
            } else {
                handle.abort();
            }
        }

        let entry = PendingEntry {
            inner: Arc::clone(&self.inner),
            id,
        };
        async move {
            let result = Abortable::new(fut, registration).await;
            let alive = entry.inner.alive.load(Ordering::Acquire);
            drop(entry);
            match result {
                Ok(value) if alive => Some(value),
                Ok(_) => {
                    debug!("discarding result for closed view scope");
                    None
                }
                Err(_aborted) => None,
            }
        }
    }

    pub fn close(&self) {
        if !self.inner.alive.swap(false, Ordering::AcqRel) {
            return;
        }
        let pending = std::mem::take(&mut *self.inner.pending());
        debug!(aborted = pending.len(), "view scope closed");
        for handle in pending.into_values() {
            handle.abort();
        }
    }

    #[cfg(test)]
    fn pending_len(&self) -> usize {
        self.inner.pending().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::block_on;

    #[test]
    fn live_scope_passes_results_through() {
        let scope = ViewScope::new();
        assert_eq!(block_on(scope.guard(async { 7 })), Some(7));
    }

    #[test]
    fn closing_aborts_pending_request() {
        let scope = ViewScope::new();
        let (tx, rx) = oneshot::channel::<u32>();
        let guarded = scope.guard(rx);
        scope.close();
        drop(tx);
        assert_eq!(block_on(guarded), None);
        assert!(!scope.is_alive());
    }

    #[test]
    fn guard_after_close_never_yields() {
        let scope = ViewScope::new();
        scope.close();
        assert_eq!(block_on(scope.guard(async { "late" })), None);
    }

    #[test]
    fn finished_requests_leave_no_handles_behind() {
        let scope = ViewScope::new();
        for n in 0..100 {
            assert_eq!(block_on(scope.guard(async move { n })), Some(n));
        }
        assert_eq!(scope.pending_len(), 0);

        let (_tx, rx) = oneshot::channel::<u32>();
        let waiting = scope.guard(rx);
        assert_eq!(scope.pending_len(), 1);
        drop(waiting);
        assert_eq!(scope.pending_len(), 0);
    }

    #[test]
    fn close_is_idempotent() {
        let scope = ViewScope::new();
        let clone = scope.clone();
        scope.close();
        clone.close();
        assert!(!clone.is_alive());
    }
}
