//! Observable value holder.
//!
//! A [`Reactive`] owns a single value and notifies every subscribed
//! receiver when the value is mutated. Notifications are delivered through
//! a [`tokio::sync::watch`] channel, so receivers always see the latest
//! value and intermediate changes coalesce if an observer falls behind.

use std::fmt;

use tokio::sync::watch;

/// A value whose mutations can be observed.
pub struct Reactive<V> {
    tx: watch::Sender<V>,
}

impl<V> Reactive<V> {
    /// Create a holder with an initial value.
    pub fn new(value: V) -> Self {
        let (tx, _) = watch::channel(value);
        Self { tx }
    }

    /// Borrow the current value.
    ///
    /// The borrow holds a read lock on the value; drop it before mutating.
    pub fn get(&self) -> watch::Ref<'_, V> {
        self.tx.borrow()
    }

    /// Mutate the value in place and notify observers.
    pub fn update(&self, f: impl FnOnce(&mut V)) {
        self.tx.send_modify(f);
    }

    /// Register a new observer.
    ///
    /// The receiver starts with the current value marked as seen. Dropping
    /// it unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<V> {
        self.tx.subscribe()
    }
}

impl<V: PartialEq> Reactive<V> {
    /// Store a new value, notifying observers only if it differs from the
    /// current one. Returns whether the value changed.
    pub fn set(&self, value: V) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        })
    }
}

impl<V: fmt::Debug> fmt::Debug for Reactive<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reactive")
            .field("value", &*self.tx.borrow())
            .field("observers", &self.tx.receiver_count())
            .finish()
    }
}
