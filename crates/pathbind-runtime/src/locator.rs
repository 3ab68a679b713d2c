#![forbid(unsafe_code)]

//! Per-thread shared [`SourceBindingFactory`].
//!
//! Bindings that need "the" factory (rather than one passed in explicitly)
//! resolve it here. The composition root installs its factory once with
//! [`install_factory`]; until then a [`PathSourceBindingFactory`] built
//! from [`BindingConfig::process_default`] is created on first use.
//!
//! Tests swap the factory for a scope with [`with_factory`], which restores
//! the previous one on return, even on panic.
//!
//! # Invariants
//!
//! 1. **Thread isolation**: each thread sees its own factory.
//! 2. **Stable identity**: repeated lookups return the same `Rc` until the
//!    factory is replaced or [`reset`].

use std::cell::RefCell;
use std::rc::Rc;

use pathbind_core::{BindingConfig, PropertyToken, Value};

use crate::binding::SourceBinding;
use crate::factory::{PathSourceBindingFactory, SourceBindingFactory};

thread_local! {
    static FACTORY: RefCell<Option<Rc<dyn SourceBindingFactory>>> = const { RefCell::new(None) };
}

/// Install `factory` for this thread, returning the one it replaces.
pub fn install_factory(factory: Rc<dyn SourceBindingFactory>) -> Option<Rc<dyn SourceBindingFactory>> {
    FACTORY.with(|slot| slot.borrow_mut().replace(factory))
}

/// The factory for this thread, created with defaults if none is installed.
#[must_use]
pub fn source_binding_factory() -> Rc<dyn SourceBindingFactory> {
    FACTORY.with(|slot| {
        let mut slot = slot.borrow_mut();
        match slot.as_ref() {
            Some(factory) => Rc::clone(factory),
            None => {
                tracing::debug!("installing default source binding factory");
                let factory: Rc<dyn SourceBindingFactory> =
                    PathSourceBindingFactory::new(BindingConfig::process_default());
                *slot = Some(Rc::clone(&factory));
                factory
            }
        }
    })
}

/// Whether a factory is installed on this thread.
#[must_use]
pub fn is_installed() -> bool {
    FACTORY.with(|slot| slot.borrow().is_some())
}

/// Forget this thread's factory.
pub fn reset() {
    let previous = FACTORY.with(|slot| slot.borrow_mut().take());
    drop(previous);
}

/// Build a binding through this thread's factory.
#[must_use]
pub fn create_binding(source: &Value, tokens: &[PropertyToken]) -> Box<dyn SourceBinding> {
    source_binding_factory().create_binding(source, tokens)
}

/// Restores the previously installed factory when dropped.
#[must_use = "the factory is restored as soon as the guard is dropped"]
pub struct FactoryGuard {
    previous: Option<Rc<dyn SourceBindingFactory>>,
}

impl Drop for FactoryGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        let replaced = FACTORY.with(|slot| std::mem::replace(&mut *slot.borrow_mut(), previous));
        drop(replaced);
    }
}

/// Install `factory` until the returned guard is dropped.
pub fn push_factory(factory: Rc<dyn SourceBindingFactory>) -> FactoryGuard {
    FactoryGuard {
        previous: install_factory(factory),
    }
}

/// Run `f` with `factory` installed, then restore the previous one.
pub fn with_factory<F, R>(factory: Rc<dyn SourceBindingFactory>, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = push_factory(factory);
    f()
}
