#![forbid(unsafe_code)]

//! Chained binding: a watched head segment plus a rewired child.
//!
//! A [`ChainedBinding`] resolves `head.tail...` by watching `head` with a
//! [`ChangeNotifier`] and delegating `tail` to a child binding built by the
//! factory against the head's current value. Every head change tears the
//! child down and builds a new one.
//!
//! # State machine
//!
//! | State | Meaning | `get_value()` |
//! |-------|---------|---------------|
//! | `Unbound` | head is null or unset, no child | `Unset` |
//! | `Bound` | child built from the current head value | child's value |
//! | `Faulted` | reading the head failed | the access error, after one re-read |
//! | `Disposed` | torn down | `Unset` |
//!
//! # Rewire order
//!
//! 1. Drop the subscription to the old child, then dispose it.
//! 2. Stop if the notifier is gone.
//! 3. Read the head. Null or unset leaves the binding `Unbound`.
//! 4. Otherwise build the child from `(head value, tail)` and subscribe.
//!
//! The head value is held next to the child for as long as the child lives,
//! so an intermediate built on demand by a getter survives the rewire. The
//! root source is never held.
//!
//! The binding's own `changed` fires only after the rewire completed, so
//! handlers always observe the new child.
//!
//! # Failure Modes
//!
//! - **Re-entrant head change**: a handler that changes the head again while
//!   the binding is firing triggers a nested rewire; the last completed
//!   rewire wins. No `RefCell` borrow is held across callbacks.
//! - **Leaf errors**: propagate unchanged from any depth.
//! - **Unreadable head**: the error is kept until the next rewire. Reads and
//!   writes in `Faulted` re-read the head first, so a head that became
//!   readable without raising a change event is picked up.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use pathbind_core::{
    BindingConfig, BindingError, PropertyAccessError, PropertyToken, Subscription, Value,
    ValueType, display_path,
};

use crate::binding::{BindingKind, ChangedSignal, SourceBinding};
use crate::diagnostics::warn_if_suspicious_indexed_value_tail;
use crate::factory::SourceBindingFactory;
use crate::notifier::ChangeNotifier;

/// Observable state of a [`ChainedBinding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainState {
    Unbound,
    Bound,
    Faulted,
    Disposed,
}

struct ChildSlot {
    binding: Rc<dyn SourceBinding>,
    subscription: Subscription,
    // released after the child is disposed
    source: Value,
}

struct ChainedInner {
    notifier: RefCell<Option<ChangeNotifier>>,
    head_subscription: RefCell<Option<Subscription>>,
    child: RefCell<Option<ChildSlot>>,
    head_error: RefCell<Option<PropertyAccessError>>,
    tail: Rc<[PropertyToken]>,
    factory: Rc<dyn SourceBindingFactory>,
    changed: ChangedSignal,
    disposed: Cell<bool>,
    rewires: Cell<u64>,
}

/// Binding for a path of two or more segments.
pub struct ChainedBinding {
    inner: Rc<ChainedInner>,
}

impl ChainedBinding {
    /// Build a chained binding over `notifier` (the head segment) and
    /// `tail`, resolving the tail through `factory`.
    ///
    /// Runs the indexed-value diagnostic once, then performs the first
    /// rewire.
    pub fn new(
        notifier: ChangeNotifier,
        tail: impl Into<Rc<[PropertyToken]>>,
        factory: Rc<dyn SourceBindingFactory>,
        config: &BindingConfig,
    ) -> Self {
        let tail = tail.into();
        warn_if_suspicious_indexed_value_tail(&tail, config);

        let inner = Rc::new(ChainedInner {
            notifier: RefCell::new(None),
            head_subscription: RefCell::new(None),
            child: RefCell::new(None),
            head_error: RefCell::new(None),
            tail,
            factory,
            changed: ChangedSignal::new(),
            disposed: Cell::new(false),
            rewires: Cell::new(0),
        });

        let weak = Rc::downgrade(&inner);
        let head_subscription = notifier.changed().subscribe(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.on_head_changed();
            }
        });
        *inner.head_subscription.borrow_mut() = Some(head_subscription);
        *inner.notifier.borrow_mut() = Some(notifier);

        ChainedInner::update_child_binding(&inner);
        Self { inner }
    }

    #[must_use]
    pub fn state(&self) -> ChainState {
        if self.inner.disposed.get() {
            ChainState::Disposed
        } else if self.inner.head_error.borrow().is_some() {
            ChainState::Faulted
        } else if self.inner.child.borrow().is_some() {
            ChainState::Bound
        } else {
            ChainState::Unbound
        }
    }

    /// Unresolved tail tokens.
    #[must_use]
    pub fn tail(&self) -> &[PropertyToken] {
        &self.inner.tail
    }

    /// Head segment, if the notifier is still attached.
    #[must_use]
    pub fn head(&self) -> Option<PropertyToken> {
        self.inner
            .notifier
            .borrow()
            .as_ref()
            .map(|n| n.segment().clone())
    }

    #[must_use]
    pub fn has_child(&self) -> bool {
        self.inner.child.borrow().is_some()
    }

    /// Kind of the current child, if any.
    #[must_use]
    pub fn child_kind(&self) -> Option<BindingKind> {
        self.inner.current_child().map(|child| child.kind())
    }

    /// Number of rewires performed, including the initial one.
    #[must_use]
    pub fn rewire_count(&self) -> u64 {
        self.inner.rewires.get()
    }

    /// Number of live subscriptions to this binding's own `changed`.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.changed.live_subscriber_count()
    }
}

impl ChainedInner {
    fn current_child(&self) -> Option<Rc<dyn SourceBinding>> {
        self.child
            .borrow()
            .as_ref()
            .map(|slot| Rc::clone(&slot.binding))
    }

    fn on_head_changed(self: &Rc<Self>) {
        if self.disposed.get() {
            return;
        }
        Self::update_child_binding(self);
        self.changed.emit(&());
    }

    fn on_child_changed(&self) {
        self.changed.emit(&());
    }

    /// Unsubscribe from and dispose the current child, if any.
    fn release_child(&self) {
        let slot = self.child.borrow_mut().take();
        if let Some(ChildSlot {
            binding,
            subscription,
            source,
        }) = slot
        {
            drop(subscription);
            binding.dispose();
            drop(source);
            tracing::debug!(tail = %display_path(&self.tail), "released child binding");
        }
    }

    fn update_child_binding(this: &Rc<Self>) {
        this.release_child();
        this.head_error.borrow_mut().take();
        this.rewires.set(this.rewires.get() + 1);
        tracing::debug!(
            tail = %display_path(&this.tail),
            rewire = this.rewires.get(),
            "rewiring chained binding"
        );

        let head_value = match this.notifier.borrow().as_ref() {
            None => return,
            Some(notifier) => notifier.value(),
        };

        let head_value = match head_value {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(error = %err, tail = %display_path(&this.tail), "chained head unreadable");
                *this.head_error.borrow_mut() = Some(err);
                return;
            }
        };

        if head_value.is_missing() {
            // consumers fall back to their own default while unbound
            tracing::trace!(tail = %display_path(&this.tail), "chained head is null, no child");
            return;
        }

        let binding: Rc<dyn SourceBinding> =
            Rc::from(this.factory.create_binding(&head_value, &this.tail));
        let weak: Weak<Self> = Rc::downgrade(this);
        let subscription = binding.changed().subscribe(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.on_child_changed();
            }
        });
        *this.child.borrow_mut() = Some(ChildSlot {
            binding,
            subscription,
            source: head_value,
        });
    }

    /// Retry a faulted head. Returns the error if the head is still unreadable.
    fn refresh_fault(this: &Rc<Self>) -> Result<(), BindingError> {
        if this.disposed.get() || this.head_error.borrow().is_none() {
            return Ok(());
        }
        Self::update_child_binding(this);
        match this.head_error.borrow().as_ref() {
            Some(err) => Err(err.clone().into()),
            None => Ok(()),
        }
    }

    fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        self.release_child();
        self.head_subscription.borrow_mut().take();
        if let Some(notifier) = self.notifier.borrow_mut().take() {
            notifier.dispose();
        }
        self.head_error.borrow_mut().take();
    }
}

impl SourceBinding for ChainedBinding {
    fn kind(&self) -> BindingKind {
        BindingKind::Chained
    }

    fn source_value_type(&self) -> ValueType {
        self.inner
            .current_child()
            .map_or(ValueType::Unknown, |child| child.source_value_type())
    }

    fn get_value(&self) -> Result<Value, BindingError> {
        ChainedInner::refresh_fault(&self.inner)?;
        match self.inner.current_child() {
            Some(child) => child.get_value(),
            None => Ok(Value::Unset),
        }
    }

    fn set_value(&self, value: Value) -> Result<(), BindingError> {
        ChainedInner::refresh_fault(&self.inner)?;
        match self.inner.current_child() {
            Some(child) => child.set_value(value),
            None => {
                tracing::warn!(
                    tail = %display_path(&self.inner.tail),
                    "SetValue ignored in binding - target property path missing"
                );
                Ok(())
            }
        }
    }

    fn changed(&self) -> &ChangedSignal {
        &self.inner.changed
    }

    fn dispose(&self) {
        self.inner.dispose();
    }

    fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }
}

impl Drop for ChainedBinding {
    fn drop(&mut self) {
        self.inner.dispose();
    }
}

impl std::fmt::Debug for ChainedBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainedBinding")
            .field("head", &self.head())
            .field("tail", &display_path(&self.inner.tail))
            .field("state", &self.state())
            .field("rewires", &self.inner.rewires.get())
            .finish()
    }
}
