#![forbid(unsafe_code)]

//! Spying binding factory.
//!
//! [`SpyFactory`] wraps another factory and hands out [`SpyBinding`]s that
//! delegate to the real bindings while recording how they are used. Each
//! binding gets a [`BindingProbe`] that outlives it, so tests can check
//! disposal and subscription counts after a chained binding has already
//! discarded the child.
//!
//! Only explicit `dispose()` calls are counted; drops are recorded
//! separately.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use pathbind_core::{BindingError, PropertyToken, Subscription, Value, ValueType, display_path};
use pathbind_runtime::{BindingKind, ChangedSignal, SourceBinding, SourceBindingFactory};

/// Usage counters for one [`SpyBinding`].
#[derive(Debug)]
pub struct BindingProbe {
    path: String,
    kind: BindingKind,
    dispose_calls: Cell<u32>,
    subscribers_at_dispose: Cell<Option<usize>>,
    dropped: Cell<bool>,
    changed: RefCell<Weak<ChangedSignal>>,
}

impl BindingProbe {
    /// Display form of the token sequence the binding was built for.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn kind(&self) -> BindingKind {
        self.kind
    }

    /// Explicit `dispose()` calls, including repeats.
    #[must_use]
    pub fn dispose_calls(&self) -> u32 {
        self.dispose_calls.get()
    }

    /// Live subscribers to `changed` when `dispose()` was last called.
    #[must_use]
    pub fn subscribers_at_dispose(&self) -> Option<usize> {
        self.subscribers_at_dispose.get()
    }

    #[must_use]
    pub fn is_dropped(&self) -> bool {
        self.dropped.get()
    }

    /// Live subscribers to the binding's `changed`; zero once dropped.
    #[must_use]
    pub fn live_subscribers(&self) -> usize {
        self.changed
            .borrow()
            .upgrade()
            .map_or(0, |signal| signal.live_subscriber_count())
    }
}

/// Binding that forwards to an inner binding and reports to a probe.
pub struct SpyBinding {
    inner: Box<dyn SourceBinding>,
    changed: Rc<ChangedSignal>,
    probe: Rc<BindingProbe>,
    _forward: Subscription,
}

impl SpyBinding {
    fn new(inner: Box<dyn SourceBinding>, probe: Rc<BindingProbe>) -> Self {
        let changed = Rc::new(ChangedSignal::new());
        let weak = Rc::downgrade(&changed);
        let forward = inner.changed().subscribe(move |_| {
            if let Some(signal) = weak.upgrade() {
                signal.emit(&());
            }
        });
        *probe.changed.borrow_mut() = Rc::downgrade(&changed);
        Self {
            inner,
            changed,
            probe,
            _forward: forward,
        }
    }

    #[must_use]
    pub fn probe(&self) -> &Rc<BindingProbe> {
        &self.probe
    }
}

impl SourceBinding for SpyBinding {
    fn kind(&self) -> BindingKind {
        self.inner.kind()
    }

    fn source_value_type(&self) -> ValueType {
        self.inner.source_value_type()
    }

    fn get_value(&self) -> Result<Value, BindingError> {
        self.inner.get_value()
    }

    fn set_value(&self, value: Value) -> Result<(), BindingError> {
        self.inner.set_value(value)
    }

    fn changed(&self) -> &ChangedSignal {
        &self.changed
    }

    fn dispose(&self) {
        self.probe.dispose_calls.set(self.probe.dispose_calls.get() + 1);
        self.probe
            .subscribers_at_dispose
            .set(Some(self.changed.live_subscriber_count()));
        self.inner.dispose();
    }

    fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }
}

impl Drop for SpyBinding {
    fn drop(&mut self) {
        self.probe.dropped.set(true);
    }
}

/// Factory that wraps every binding produced by `inner` in a [`SpyBinding`].
pub struct SpyFactory {
    inner: Rc<dyn SourceBindingFactory>,
    created: RefCell<Vec<Rc<BindingProbe>>>,
}

impl SpyFactory {
    #[must_use]
    pub fn new(inner: Rc<dyn SourceBindingFactory>) -> Rc<Self> {
        Rc::new(Self {
            inner,
            created: RefCell::new(Vec::new()),
        })
    }

    /// Probes for every binding created so far, in creation order.
    #[must_use]
    pub fn created(&self) -> Vec<Rc<BindingProbe>> {
        self.created.borrow().clone()
    }

    #[must_use]
    pub fn created_count(&self) -> usize {
        self.created.borrow().len()
    }

    /// Probes whose bindings have not been dropped yet.
    #[must_use]
    pub fn live(&self) -> Vec<Rc<BindingProbe>> {
        self.created
            .borrow()
            .iter()
            .filter(|probe| !probe.is_dropped())
            .cloned()
            .collect()
    }
}

impl SourceBindingFactory for SpyFactory {
    fn create_binding(&self, source: &Value, tokens: &[PropertyToken]) -> Box<dyn SourceBinding> {
        let inner = self.inner.create_binding(source, tokens);
        let probe = Rc::new(BindingProbe {
            path: display_path(tokens),
            kind: inner.kind(),
            dispose_calls: Cell::new(0),
            subscribers_at_dispose: Cell::new(None),
            dropped: Cell::new(false),
            changed: RefCell::new(Weak::new()),
        });
        self.created.borrow_mut().push(Rc::clone(&probe));
        Box::new(SpyBinding::new(inner, probe))
    }
}
