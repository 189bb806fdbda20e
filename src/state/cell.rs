//! Generic observable cell with synchronous subscriber notification.
//!
//! This module provides the `ObservableCell` primitive used for all shared
//! storefront state: a single value slot plus an insertion-ordered list of
//! subscriber callbacks, guarded by one lock per cell.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use {parking_lot::Mutex, tracing::debug};

/// Subscriber callback invoked with the cell's new value.
type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Interior of a cell: the slot and its subscriber list share one lock so a
/// read-modify-write in `update` observes a consistent pair.
struct CellInner<T> {
    /// Current value. Always present; a cell is never "unset".
    value: T,
    /// Next subscription id to hand out.
    next_id: u64,
    /// Subscribers in registration order.
    subscribers: Vec<(u64, Callback<T>)>,
}

/// A single mutable value slot that notifies registered callbacks whenever
/// the value changes.
///
/// Cloning an `ObservableCell` yields another handle to the same slot and
/// subscriber list. Notifications are dispatched after the lock is released,
/// so a subscriber may read, set, subscribe, or unsubscribe on the same cell
/// from inside its callback without deadlocking.
pub struct ObservableCell<T> {
    inner: Arc<Mutex<CellInner<T>>>,
}

impl<T> Clone for ObservableCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Debug> Debug for ObservableCell<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let inner = self.inner.lock();
        f.debug_struct("ObservableCell")
            .field("value", &inner.value)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> ObservableCell<T> {
    /// Creates a cell holding the given initial value.
    ///
    /// # Arguments
    ///
    /// * `initial` - Value the cell starts with.
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CellInner {
                value: initial,
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Gets a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.lock().value.clone()
    }

    /// Replaces the current value and notifies subscribers in registration
    /// order.
    ///
    /// Setting a value equal to the current one is a no-op: the slot is left
    /// untouched and no notification fires.
    ///
    /// # Arguments
    ///
    /// * `value` - New value for the cell.
    pub fn set(&self, value: T) {
        self.update(move |_| value);
    }

    /// Derives the new value from the current one and applies it with the
    /// same notification and deduplication contract as [`set`](Self::set).
    ///
    /// The function runs under the cell lock and must not touch the cell
    /// itself; subscribers are notified after the lock is released.
    ///
    /// # Arguments
    ///
    /// * `f` - Pure function from the current value to the new value.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let (value, snapshot) = {
            let mut inner = self.inner.lock();
            let next = f(&inner.value);
            if inner.value == next {
                return;
            }
            inner.value = next.clone();
            (next, inner.subscribers.clone())
        };

        debug!(
            "ObservableCell: value changed, notifying {} subscriber(s)",
            snapshot.len()
        );
        for (_, callback) in &snapshot {
            callback(&value);
        }
    }

    /// Registers a callback and returns its deregistration handle.
    ///
    /// The callback is invoked once immediately with the current value, then
    /// again on every accepted change. Subscribers registered earlier are
    /// notified before subscribers registered later.
    ///
    /// # Arguments
    ///
    /// * `callback` - Invoked with the cell's value on registration and on
    ///   every subsequent change.
    ///
    /// # Returns
    ///
    /// A [`Subscription`] handle for deregistering the callback.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let callback: Callback<T> = Arc::new(callback);

        let (id, current) = {
            let mut inner = self.inner.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push((id, Arc::clone(&callback)));
            (id, inner.value.clone())
        };
        debug!("ObservableCell: subscriber {} registered", id);

        // Initial delivery happens outside the lock, like any notification.
        callback(&current);

        let inner = Arc::downgrade(&self.inner);
        Subscription {
            cancel: Box::new(move || {
                if let Some(inner) = inner.upgrade() {
                    inner.lock().subscribers.retain(|(sid, _)| *sid != id);
                    debug!("ObservableCell: subscriber {} deregistered", id);
                }
            }),
        }
    }

    /// Gets the number of currently registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }
}

/// Deregistration handle returned by [`ObservableCell::subscribe`].
///
/// The handle is a capability, not a guard: dropping it leaves the
/// subscriber registered for the cell's lifetime. Call
/// [`unsubscribe`](Self::unsubscribe) to deregister.
pub struct Subscription {
    cancel: Box<dyn Fn() + Send + Sync>,
}

impl Subscription {
    /// Removes the subscriber from its cell.
    ///
    /// Idempotent: calling this more than once is harmless. Takes effect
    /// before any notification triggered after it completes; a notification
    /// already in flight may still be delivered.
    pub fn unsubscribe(&self) {
        (self.cancel)();
    }
}

impl Debug for Subscription {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Subscription").finish()
    }
}
