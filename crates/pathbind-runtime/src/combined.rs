#![forbid(unsafe_code)]

//! Multi-source binding merged through a [`ValueCombiner`].
//!
//! # Invariants
//!
//! 1. The combined binding holds exactly one subscription per child until
//!    disposed, and fires `changed` whenever any child fires.
//! 2. If any child yields [`Value::Unset`], the combined value is `Unset`
//!    and the combiner is not consulted.
//! 3. The first child read error is returned unchanged.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pathbind_core::{BindingError, Subscription, Value, ValueType};

use crate::binding::{BindingKind, ChangedSignal, SourceBinding};
use crate::combiner::ValueCombiner;

struct CombinedInner {
    combiner: Rc<dyn ValueCombiner>,
    children: Vec<Rc<dyn SourceBinding>>,
    subscriptions: RefCell<Vec<Subscription>>,
    changed: ChangedSignal,
    disposed: Cell<bool>,
}

/// Binding whose value is computed from several child bindings.
pub struct CombinedBinding {
    inner: Rc<CombinedInner>,
}

impl CombinedBinding {
    #[must_use]
    pub fn new(combiner: Rc<dyn ValueCombiner>, children: Vec<Rc<dyn SourceBinding>>) -> Self {
        let inner = Rc::new(CombinedInner {
            combiner,
            children,
            subscriptions: RefCell::new(Vec::new()),
            changed: ChangedSignal::new(),
            disposed: Cell::new(false),
        });

        let subscriptions = inner
            .children
            .iter()
            .map(|child| {
                let weak = Rc::downgrade(&inner);
                child.changed().subscribe(move |_| {
                    if let Some(inner) = weak.upgrade() {
                        inner.changed.emit(&());
                    }
                })
            })
            .collect();
        *inner.subscriptions.borrow_mut() = subscriptions;

        Self { inner }
    }

    #[must_use]
    pub fn combiner_name(&self) -> &'static str {
        self.inner.combiner.name()
    }

    #[must_use]
    pub fn children(&self) -> &[Rc<dyn SourceBinding>] {
        &self.inner.children
    }
}

impl SourceBinding for CombinedBinding {
    fn kind(&self) -> BindingKind {
        BindingKind::Combined
    }

    fn source_value_type(&self) -> ValueType {
        let types: Vec<ValueType> = self
            .inner
            .children
            .iter()
            .map(|child| child.source_value_type())
            .collect();
        self.inner.combiner.source_type(&types)
    }

    fn get_value(&self) -> Result<Value, BindingError> {
        let mut values = Vec::with_capacity(self.inner.children.len());
        for child in &self.inner.children {
            let value = child.get_value()?;
            if value.is_unset() {
                return Ok(Value::Unset);
            }
            values.push(value);
        }
        self.inner.combiner.combine(&values)
    }

    fn set_value(&self, value: Value) -> Result<(), BindingError> {
        self.inner.combiner.combine_back(value, &self.inner.children)
    }

    fn changed(&self) -> &ChangedSignal {
        &self.inner.changed
    }

    fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        self.inner.subscriptions.borrow_mut().clear();
        for child in &self.inner.children {
            child.dispose();
        }
    }

    fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }
}

impl Drop for CombinedBinding {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for CombinedBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombinedBinding")
            .field("combiner", &self.combiner_name())
            .field("children", &self.inner.children.len())
            .field("disposed", &self.inner.disposed.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combiner::ValueCombinerRegistry;
    use crate::factory::{PathSourceBindingFactory, create_combined_binding};
    use pathbind_core::{BindableObject, BindingConfig, PropertyBag, PropertyToken};

    fn sum_binding(bag: &Rc<PropertyBag>, paths: &[Vec<PropertyToken>]) -> CombinedBinding {
        let factory = PathSourceBindingFactory::new(BindingConfig::new());
        let registry = ValueCombinerRegistry::with_builtins();
        create_combined_binding(
            factory.as_ref(),
            &registry,
            "Add",
            &Value::from(Rc::clone(bag)),
            paths,
        )
        .unwrap()
    }

    #[test]
    fn combines_and_tracks_children() {
        let bag = Rc::new(PropertyBag::new("Root").with("A", 2).with("B", 3));
        let binding = sum_binding(
            &bag,
            &[vec![PropertyToken::name("A")], vec![PropertyToken::name("B")]],
        );
        let fired = Rc::new(Cell::new(0));
        let f = Rc::clone(&fired);
        let _sub = binding.changed().subscribe(move |_| f.set(f.get() + 1));

        assert_eq!(binding.combiner_name(), "Add");
        assert_eq!(binding.get_value(), Ok(Value::Int(5)));
        assert_eq!(binding.source_value_type(), ValueType::Int);

        bag.set("B", 10).unwrap();
        assert_eq!(fired.get(), 1);
        assert_eq!(binding.get_value(), Ok(Value::Int(12)));
    }

    #[test]
    fn unset_child_short_circuits() {
        let bag = Rc::new(PropertyBag::new("Root").with("A", 2).with("Inner", Value::Null));
        let binding = sum_binding(
            &bag,
            &[
                vec![PropertyToken::name("A")],
                vec![PropertyToken::name("Inner"), PropertyToken::name("X")],
            ],
        );
        assert_eq!(binding.get_value(), Ok(Value::Unset));
    }

    #[test]
    fn child_errors_propagate() {
        let bag = Rc::new(PropertyBag::new("Root").with("A", 2));
        let binding = sum_binding(&bag, &[vec![PropertyToken::name("Missing")]]);
        assert!(matches!(binding.get_value(), Err(BindingError::PropertyAccess(_))));
    }

    #[test]
    fn dispose_releases_children() {
        let bag = Rc::new(PropertyBag::new("Root").with("A", 2).with("B", 3));
        let binding = sum_binding(
            &bag,
            &[vec![PropertyToken::name("A")], vec![PropertyToken::name("B")]],
        );
        assert_eq!(bag.property_changed().unwrap().live_subscriber_count(), 2);

        binding.dispose();
        binding.dispose();
        assert!(binding.is_disposed());
        assert!(binding.children().iter().all(|child| child.is_disposed()));
        assert_eq!(bag.property_changed().unwrap().live_subscriber_count(), 0);
    }
}
