#![forbid(unsafe_code)]

//! Observer list with RAII subscriptions.
//!
//! # Design
//!
//! [`Signal<A>`] keeps its subscribers as `Weak` callback pointers. The
//! strong side lives inside the [`Subscription`] guard returned by
//! [`Signal::subscribe`], so dropping the guard is the unsubscribe.
//!
//! Emission snapshots the weak list and upgrades each entry just before
//! calling it. A callback may therefore subscribe, unsubscribe, or emit
//! again on the same signal without tripping a `RefCell` borrow, and a
//! subscription dropped during an emission is not called for the
//! remainder of that emission.
//!
//! # Performance
//!
//! | Operation     | Complexity                 |
//! |---------------|----------------------------|
//! | `subscribe()` | O(1) amortized             |
//! | `emit()`      | O(S) where S = subscribers |
//!
//! # Failure Modes
//!
//! - **Subscriber leak**: guards stored indefinitely keep their callbacks
//!   alive. Dead weak entries are pruned lazily during `emit()`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type CallbackRc<A> = Rc<dyn Fn(&A)>;
type CallbackWeak<A> = Weak<dyn Fn(&A)>;

/// A single-threaded observer list.
///
/// # Invariants
///
/// 1. Subscribers are called in registration order.
/// 2. A dropped [`Subscription`] is never called by an emission that reaches
///    it after the drop.
/// 3. Dead subscribers are pruned lazily.
pub struct Signal<A> {
    subscribers: RefCell<Vec<CallbackWeak<A>>>,
}

impl<A> Default for Signal<A> {
    fn default() -> Self {
        Self {
            subscribers: RefCell::new(Vec::new()),
        }
    }
}

impl<A> std::fmt::Debug for Signal<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let subscribers = self.subscribers.borrow();
        f.debug_struct("Signal")
            .field("subscriber_count", &subscribers.len())
            .field(
                "live_subscriber_count",
                &subscribers.iter().filter(|w| w.strong_count() > 0).count(),
            )
            .finish()
    }
}

impl<A: 'static> Signal<A> {
    /// Create a signal with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback`. It stays registered until the returned guard is
    /// dropped.
    pub fn subscribe(&self, callback: impl Fn(&A) + 'static) -> Subscription {
        let strong: CallbackRc<A> = Rc::new(callback);
        let weak = Rc::downgrade(&strong);
        self.subscribers.borrow_mut().push(weak);
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Call every live subscriber with `args`.
    pub fn emit(&self, args: &A) {
        let snapshot: Vec<CallbackWeak<A>> = {
            let mut subscribers = self.subscribers.borrow_mut();
            subscribers.retain(|w| w.strong_count() > 0);
            subscribers.clone()
        };
        for weak in &snapshot {
            if let Some(callback) = weak.upgrade() {
                callback(args);
            }
        }
    }

    /// Registered subscribers, including dead ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Subscribers whose guards are still alive.
    #[must_use]
    pub fn live_subscriber_count(&self) -> usize {
        self.subscribers
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }
}

/// RAII guard for a [`Signal`] callback.
///
/// Dropping the `Subscription` drops the strong callback pointer, so the
/// `Weak` held by the signal fails to upgrade from then on.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl Subscription {
    /// Unsubscribe now. Equivalent to dropping the guard.
    pub fn unsubscribe(self) {}
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
