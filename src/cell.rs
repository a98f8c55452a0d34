//! Mutable state cells with change notification.
//!
//! The form controller keeps its field map in a [`StateCell`]: a cell that
//! hands out snapshots, applies replacements computed from the previous value,
//! and notifies listeners after each replacement. Hosts with their own
//! reactive container implement the trait; [`SharedCell`] is the default.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Callback invoked with the new value after every replacement.
pub type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Replacement computed from the previous value.
pub type Update<'a, T> = Box<dyn FnOnce(&T) -> T + 'a>;

/// Handle returned by [`StateCell::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A mutable state cell.
///
/// Contract: `update` applies the replacement before it returns, so the next
/// `get` (and the next event the host processes) observes it.
pub trait StateCell<T>: Send + Sync {
    /// Snapshot of the current value.
    fn get(&self) -> T;

    /// Replace the value with a function of the previous value.
    fn update(&self, update: Update<'_, T>);

    /// Register a listener for replacements.
    fn subscribe(&self, listener: Listener<T>) -> SubscriptionId;

    /// Remove a listener. Returns `false` if it was not registered.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// Thread-safe cell backed by `Arc<RwLock<T>>`.
///
/// Clones share the value and the listeners.
///
/// # Example
///
/// ```rust
/// use formstate::cell::{SharedCell, StateCell};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// let cell = SharedCell::new(1);
/// let seen = Arc::new(AtomicUsize::new(0));
/// let seen_by_listener = Arc::clone(&seen);
/// cell.subscribe(Arc::new(move |v: &i32| {
///     seen_by_listener.store(*v as usize, Ordering::SeqCst);
/// }));
///
/// cell.update(Box::new(|v: &i32| v + 41));
///
/// assert_eq!(cell.get(), 42);
/// assert_eq!(seen.load(Ordering::SeqCst), 42);
/// ```
pub struct SharedCell<T> {
    inner: Arc<RwLock<T>>,
    listeners: Arc<RwLock<Vec<(SubscriptionId, Listener<T>)>>>,
    next_id: Arc<AtomicU64>,
}

impl<T> SharedCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(value)),
            listeners: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    fn listeners(&self) -> Vec<Listener<T>> {
        self.listeners
            .read()
            .map(|guard| guard.iter().map(|(_, l)| Arc::clone(l)).collect())
            .unwrap_or_else(|poisoned| {
                poisoned
                    .into_inner()
                    .iter()
                    .map(|(_, l)| Arc::clone(l))
                    .collect()
            })
    }
}

impl<T> Clone for SharedCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            listeners: Arc::clone(&self.listeners),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

impl<T: Clone + Send + Sync> StateCell<T> for SharedCell<T> {
    fn get(&self) -> T {
        self.inner
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    fn update(&self, update: Update<'_, T>) {
        // Listeners run with no lock held so they may read or update the cell.
        let next = {
            let mut guard = self
                .inner
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let next = update(&*guard);
            *guard = next;
            guard.clone()
        };
        for listener in self.listeners() {
            listener(&next);
        }
    }

    fn subscribe(&self, listener: Listener<T>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((id, listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }
}
