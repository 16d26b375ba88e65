//! Single-slot replaying broadcast cell.
//!
//! # Responsibility
//! - Hold the latest snapshot of a store and push it to subscribers.
//! - Replay the current snapshot to every new subscriber.
//!
//! # Invariants
//! - Delivery is synchronous and happens on the publishing thread.
//! - Subscribers are notified in subscription order.
//! - A listener may subscribe or unsubscribe from inside a callback; the
//!   change takes effect after the current delivery round.
//! - A publish from inside a callback is delivered to every subscriber in a
//!   follow-up round, so all subscribers end on the latest value.

use std::cell::RefCell;
use std::fmt::{Debug, Formatter};

/// Handle returned by `SnapshotSubject::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener<T> = Box<dyn FnMut(&T)>;

struct Inner<T> {
    value: T,
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener<T>)>,
    delivering: bool,
    /// A publish arrived while a round was running.
    redeliver: bool,
    /// Listeners detached for the running round.
    delivering_ids: Vec<SubscriptionId>,
    removed_during_delivery: Vec<SubscriptionId>,
}

/// Latest-value cell with synchronous fan-out.
pub struct SnapshotSubject<T> {
    inner: RefCell<Inner<T>>,
}

impl<T: Clone> SnapshotSubject<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: RefCell::new(Inner {
                value: initial,
                next_id: 0,
                listeners: Vec::new(),
                delivering: false,
                redeliver: false,
                delivering_ids: Vec::new(),
                removed_during_delivery: Vec::new(),
            }),
        }
    }

    /// Returns a clone of the latest published value.
    pub fn value(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Runs `f` against the latest value without cloning it.
    pub fn with_value<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Registers `listener` and immediately replays the current value to it.
    pub fn subscribe(&self, listener: impl FnMut(&T) + 'static) -> SubscriptionId {
        let mut listener: Listener<T> = Box::new(listener);
        let (id, current) = {
            let mut inner = self.inner.borrow_mut();
            let id = SubscriptionId(inner.next_id);
            inner.next_id += 1;
            (id, inner.value.clone())
        };

        listener(&current);
        self.inner.borrow_mut().listeners.push((id, listener));
        id
    }

    /// Removes a listener. Returns `false` when the id is unknown or was
    /// already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|(listener_id, _)| *listener_id != id);
        if inner.listeners.len() != before {
            return true;
        }
        if inner.delivering_ids.contains(&id) && !inner.removed_during_delivery.contains(&id) {
            inner.removed_during_delivery.push(id);
            return true;
        }
        false
    }

    /// Replaces the current value and notifies every subscriber.
    ///
    /// A publish from inside a listener only stores the value; the running
    /// publish delivers the latest value in one more round once the current
    /// round ends.
    pub fn publish(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.value = value;
            if inner.delivering {
                inner.redeliver = true;
                return;
            }
            inner.delivering = true;
        }

        loop {
            let (snapshot, mut listeners) = {
                let mut inner = self.inner.borrow_mut();
                inner.redeliver = false;
                let listeners = std::mem::take(&mut inner.listeners);
                inner.delivering_ids = listeners.iter().map(|(id, _)| *id).collect();
                (inner.value.clone(), listeners)
            };

            for (id, listener) in listeners.iter_mut() {
                if self.inner.borrow().removed_during_delivery.contains(id) {
                    continue;
                }
                listener(&snapshot);
            }

            let mut inner = self.inner.borrow_mut();
            listeners.append(&mut inner.listeners);
            let removed = std::mem::take(&mut inner.removed_during_delivery);
            listeners.retain(|(id, _)| !removed.contains(id));
            inner.listeners = listeners;
            inner.delivering_ids.clear();
            if !inner.redeliver {
                inner.delivering = false;
                return;
            }
        }
    }
}

impl<T: Debug> Debug for SnapshotSubject<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SnapshotSubject")
            .field("value", &inner.value)
            .field("subscribers", &inner.listeners.len())
            .finish()
    }
}
