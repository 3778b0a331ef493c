// ── Ordered reactive entity collection ──
//
// Insertion-ordered storage with push-based change notification via
// `watch` channels. Readers only ever see whole snapshots.

use std::sync::Arc;

use tokio::sync::watch;

/// A reactive, ordered collection for a single entity type.
///
/// The snapshot itself is the storage: every mutation builds a new
/// `Arc<Vec<Arc<T>>>`, bumps the version counter and publishes the
/// snapshot to subscribers. Lookups are linear scans.
pub(crate) struct EntityCollection<T: Send + Sync + 'static> {
    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,

    /// Current contents in insertion order.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self { version, snapshot }
    }

    /// Replace the whole collection.
    pub(crate) fn replace(&self, items: Vec<T>) {
        let values: Vec<Arc<T>> = items.into_iter().map(Arc::new).collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
        self.bump_version();
    }

    /// Append one entity.
    pub(crate) fn push(&self, item: T) -> Arc<T> {
        let item = Arc::new(item);
        self.snapshot.send_modify(|snap| {
            let mut values = Vec::with_capacity(snap.len() + 1);
            values.extend(snap.iter().cloned());
            values.push(Arc::clone(&item));
            *snap = Arc::new(values);
        });
        self.bump_version();
        item
    }

    /// First entity matching the predicate.
    pub(crate) fn find(&self, pred: impl Fn(&T) -> bool) -> Option<Arc<T>> {
        self.snapshot.borrow().iter().find(|e| pred(e)).cloned()
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn version(&self) -> u64 {
        *self.version.borrow()
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Increment the version counter.
    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}
